//! Reader for legacy serialized-array payloads
//!
//! Pages written by the first generation of the comments extension hold the
//! thread as a serialized associative array rather than JSON:
//!
//! ```text
//! a:1:{s:13:"4fe9a1b2c3d4e";a:5:{i:4;b:0;i:1;s:5:"Alice";i:2;i:1340668800;i:3;s:2:"Hi";i:5;a:0:{}}}
//! ```
//!
//! Each comment is an array keyed by small integers: 1 user, 2 date,
//! 3 text, 4 parent (`false` for a top-level comment), 5 reply ids. These
//! payloads are only ever read; the next write stores JSON.

use crate::{Result, StoreError};
use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexMap;
use thread_model::{Comment, CommentId, Thread};

const FIELD_USER: i64 = 1;
const FIELD_DATE: i64 = 2;
const FIELD_TEXT: i64 = 3;
const FIELD_PARENT: i64 = 4;
const FIELD_REPLIES: i64 = 5;

/// Thread arrays nest three deep; anything far deeper is not a thread.
const MAX_DEPTH: usize = 16;

/// Whether `payload` looks like a serialized array rather than JSON
pub(crate) fn is_legacy_payload(payload: &str) -> bool {
    payload.starts_with("a:")
}

/// Parse a legacy payload into a thread
pub(crate) fn parse_thread(payload: &str) -> Result<Thread> {
    let mut parser = Parser::new(payload.as_bytes());
    let value = parser.value(0)?;
    parser.expect_end()?;

    let Value::Array(entries) = value else {
        return Err(malformed("top level is not an array"));
    };

    let mut comments = IndexMap::with_capacity(entries.len());
    for (key, value) in entries {
        let id = CommentId::from(key.into_id()?);
        let comment = comment_from(value)?;
        comments.insert(id, comment);
    }

    Ok(Thread::from_comments(comments))
}

fn comment_from(value: Value) -> Result<Comment> {
    let Value::Array(fields) = value else {
        return Err(malformed("comment is not an array"));
    };

    let mut author = None;
    let mut date = None;
    let mut text = None;
    let mut parent = None;
    let mut replies = Vec::new();

    for (key, value) in fields {
        let Value::Int(field) = key else {
            continue;
        };
        match field {
            FIELD_USER => author = Some(value.into_text()?),
            FIELD_DATE => date = Some(timestamp_from(value)?),
            FIELD_TEXT => text = Some(value.into_text()?),
            FIELD_PARENT => {
                parent = match value {
                    Value::Bool(false) | Value::Null => None,
                    other => Some(CommentId::from(other.into_id()?)),
                }
            }
            FIELD_REPLIES => {
                let Value::Array(items) = value else {
                    return Err(malformed("reply list is not an array"));
                };
                replies = items
                    .into_iter()
                    .map(|(_, id)| id.into_id().map(CommentId::from))
                    .collect::<Result<Vec<_>>>()?;
            }
            _ => {}
        }
    }

    let author = author.ok_or_else(|| malformed("comment without user"))?;
    let date = date.ok_or_else(|| malformed("comment without date"))?;
    let text = text.ok_or_else(|| malformed("comment without text"))?;

    Ok(Comment::new(parent, author, date, text).with_replies(replies))
}

fn timestamp_from(value: Value) -> Result<DateTime<Utc>> {
    let secs = match value {
        Value::Int(secs) => secs,
        Value::Float(secs) => secs as i64,
        Value::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| malformed("date is not a number"))?,
        _ => return Err(malformed("date is not a number")),
    };
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| malformed("date out of range"))
}

fn malformed(reason: &str) -> StoreError {
    StoreError::MalformedPayload(format!("legacy payload: {reason}"))
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Vec<(Value, Value)>),
}

impl Value {
    fn into_text(self) -> Result<String> {
        match self {
            Value::Str(s) => Ok(s),
            Value::Int(i) => Ok(i.to_string()),
            _ => Err(malformed("expected a string")),
        }
    }

    /// Ids are strings, but all-digit ids were stored as integer keys
    fn into_id(self) -> Result<String> {
        match self {
            Value::Str(s) => Ok(s),
            Value::Int(i) => Ok(i.to_string()),
            _ => Err(malformed("expected an id")),
        }
    }
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn value(&mut self, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(malformed("nesting too deep"));
        }

        let tag = self.next_byte()?;
        match tag {
            b'N' => {
                self.expect(b';')?;
                Ok(Value::Null)
            }
            b'b' => {
                self.expect(b':')?;
                let flag = self.until(b';')?;
                match flag {
                    "0" => Ok(Value::Bool(false)),
                    "1" => Ok(Value::Bool(true)),
                    _ => Err(malformed("bad boolean")),
                }
            }
            b'i' => {
                self.expect(b':')?;
                let digits = self.until(b';')?;
                digits
                    .parse()
                    .map(Value::Int)
                    .map_err(|_| malformed("bad integer"))
            }
            b'd' => {
                self.expect(b':')?;
                let digits = self.until(b';')?;
                digits
                    .parse()
                    .map(Value::Float)
                    .map_err(|_| malformed("bad float"))
            }
            b's' => {
                self.expect(b':')?;
                let len = self.length(b':')?;
                self.expect(b'"')?;
                let bytes = self.take(len)?;
                let text = std::str::from_utf8(bytes)
                    .map_err(|_| malformed("string is not UTF-8"))?
                    .to_string();
                self.expect(b'"')?;
                self.expect(b';')?;
                Ok(Value::Str(text))
            }
            b'a' => {
                self.expect(b':')?;
                let count = self.length(b':')?;
                self.expect(b'{')?;
                let mut entries = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    let key = self.value(depth + 1)?;
                    if !matches!(key, Value::Int(_) | Value::Str(_)) {
                        return Err(malformed("bad array key"));
                    }
                    let value = self.value(depth + 1)?;
                    entries.push((key, value));
                }
                self.expect(b'}')?;
                Ok(Value::Array(entries))
            }
            _ => Err(malformed("unknown value tag")),
        }
    }

    fn next_byte(&mut self) -> Result<u8> {
        let byte = *self
            .input
            .get(self.pos)
            .ok_or_else(|| malformed("unexpected end of input"))?;
        self.pos += 1;
        Ok(byte)
    }

    fn expect(&mut self, wanted: u8) -> Result<()> {
        if self.next_byte()? == wanted {
            Ok(())
        } else {
            Err(malformed("unexpected character"))
        }
    }

    /// Read up to (and consume) `terminator`, returning the text before it
    fn until(&mut self, terminator: u8) -> Result<&'a str> {
        let rest = &self.input[self.pos..];
        let len = rest
            .iter()
            .position(|&b| b == terminator)
            .ok_or_else(|| malformed("unterminated value"))?;
        let text =
            std::str::from_utf8(&rest[..len]).map_err(|_| malformed("value is not UTF-8"))?;
        self.pos += len + 1;
        Ok(text)
    }

    fn length(&mut self, terminator: u8) -> Result<usize> {
        self.until(terminator)?
            .parse()
            .map_err(|_| malformed("bad length"))
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.input.len())
            .ok_or_else(|| malformed("string runs past end of input"))?;
        let bytes = &self.input[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn expect_end(&self) -> Result<()> {
        if self.pos == self.input.len() {
            Ok(())
        } else {
            Err(malformed("trailing data after thread"))
        }
    }
}
