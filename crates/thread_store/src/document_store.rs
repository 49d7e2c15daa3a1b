//! Host document storage abstraction
//!
//! The comment core never owns the documents it writes into. The
//! `DocumentStore` trait is the seam to whatever system does: it fetches the
//! raw text of a document and writes new text back with a change summary.
//!
//! There is no optimistic concurrency check. Two requests that fetch the
//! same text and both write back race, and the later write wins.

use crate::Result;
use thread_model::DocumentRef;

/// Trait for host document backends
///
/// Methods take `&self` so implementations can be shared behind `Arc`;
/// backends use interior locking where they need it.
pub trait DocumentStore: Send + Sync {
    /// Fetch the current text of a document
    ///
    /// Returns `Ok(None)` when the document does not exist yet.
    fn fetch(&self, document: &DocumentRef) -> Result<Option<String>>;

    /// Replace the text of a document, creating it if needed
    ///
    /// A backend that refuses the write reports `StoreError::WriteConflict`.
    fn write(&self, document: &DocumentRef, text: &str, summary: &str) -> Result<()>;
}
