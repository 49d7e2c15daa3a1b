//! Marker-block codec
//!
//! A thread is stored as a payload between two marker lines somewhere in the
//! host document's text:
//!
//! ```text
//! ...unrelated page text...
//! == AjaxComments:DataStart ==
//! {"4fe9...":{"parent":null,"author":"Alice","date":1340668800,"text":"Hi","replies":[]}}
//! == AjaxComments:DataEnd ==
//! ```
//!
//! Only the first block is ever read or replaced. Everything outside it is
//! carried through encode byte for byte.

use crate::{legacy, Result, StoreError};
use regex_lite::{Match, Regex};
use std::ops::Range;
use std::sync::LazyLock;
use thread_model::Thread;

/// Marker line opening the payload block
pub const DATA_START: &str = "== AjaxComments:DataStart ==";

/// Marker line closing the payload block
pub const DATA_END: &str = "== AjaxComments:DataEnd ==";

static START_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"==[ \t]*AjaxComments:DataStart[ \t]*==").expect("start marker pattern")
});

static END_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"==[ \t]*AjaxComments:DataEnd[ \t]*==").expect("end marker pattern")
});

/// Location of the marker block inside a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerBlock<'a> {
    /// Byte range from the start marker through the end marker
    pub range: Range<usize>,
    /// Payload between the markers, surrounding whitespace trimmed
    pub payload: &'a str,
}

/// Find the first marker block in `raw`
///
/// The block ends at the first end marker that has a start marker before it;
/// the start marker nearest to that end marker opens it.
pub fn find_block(raw: &str) -> Option<MarkerBlock<'_>> {
    END_MARKER.find_iter(raw).find_map(|end| {
        START_MARKER
            .find_iter(&raw[..end.start()])
            .last()
            .map(|start| block_between(raw, start, end))
    })
}

fn block_between<'a>(raw: &'a str, start: Match<'_>, end: Match<'_>) -> MarkerBlock<'a> {
    MarkerBlock {
        range: start.start()..end.end(),
        payload: raw[start.end()..end.start()].trim(),
    }
}

/// Decode the thread stored in `raw`
///
/// Returns `Ok(None)` when the document has no marker block and
/// `StoreError::MalformedPayload` when the block cannot be read.
pub fn try_decode(raw: &str) -> Result<Option<Thread>> {
    let Some(block) = find_block(raw) else {
        return Ok(None);
    };

    if block.payload.is_empty() {
        return Ok(Some(Thread::new()));
    }

    let thread = if legacy::is_legacy_payload(block.payload) {
        legacy::parse_thread(block.payload)?
    } else {
        serde_json::from_str::<Thread>(block.payload)
            .map_err(|e| StoreError::MalformedPayload(e.to_string()))?
    };

    Ok(Some(thread))
}

/// Decode the thread stored in `raw`, never failing
///
/// A missing block yields an empty thread. So does a block that cannot be
/// read, which is logged since it may mean the stored data is corrupt.
pub fn decode(raw: &str) -> Thread {
    match try_decode(raw) {
        Ok(Some(thread)) => thread,
        Ok(None) => Thread::new(),
        Err(e) => {
            tracing::warn!("Ignoring unreadable comment data, using an empty thread: {}", e);
            Thread::new()
        }
    }
}

/// Serialize `thread` into the payload format
///
/// `=` can only occur inside JSON strings, so escaping every `==` keeps a
/// comment body from ever reproducing a marker line.
pub fn encode_payload(thread: &Thread) -> Result<String> {
    let json = serde_json::to_string(thread)?;
    Ok(json.replace("==", "=\\u003d"))
}

/// Merge `thread` into `raw`
///
/// Replaces the first marker block if there is one, otherwise appends a new
/// block on its own line. Text outside the block is returned unchanged.
pub fn encode(thread: &Thread, raw: &str) -> Result<String> {
    let block = format!("{DATA_START}\n{}\n{DATA_END}", encode_payload(thread)?);

    let merged = match find_block(raw) {
        Some(existing) => {
            let mut merged = String::with_capacity(raw.len() + block.len());
            merged.push_str(&raw[..existing.range.start]);
            merged.push_str(&block);
            merged.push_str(&raw[existing.range.end..]);
            merged
        }
        None => format!("{raw}\n{block}"),
    };

    Ok(merged)
}
