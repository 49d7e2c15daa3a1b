//! In-memory document store
//!
//! Keeps document text in a `RwLock`-protected map. Used in tests and by
//! hosts that manage persistence themselves.

use crate::{DocumentStore, Result, StoreError};
use std::collections::HashMap;
use std::sync::RwLock;
use thread_model::DocumentRef;

/// One stored document
#[derive(Debug, Clone, Default)]
struct StoredDocument {
    text: String,
    /// Number of writes since the document was created
    revision: u64,
    /// Summary passed with the most recent write
    last_summary: Option<String>,
}

/// In-memory implementation of `DocumentStore`
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<DocumentRef, StoredDocument>>,
    /// When set, every write is rejected with this reason
    reject_writes: RwLock<Option<String>>,
}

impl MemoryDocumentStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document without counting it as a revision
    pub fn with_document(self, document: impl Into<DocumentRef>, text: impl Into<String>) -> Self {
        if let Ok(mut docs) = self.documents.write() {
            docs.insert(
                document.into(),
                StoredDocument {
                    text: text.into(),
                    ..StoredDocument::default()
                },
            );
        }
        self
    }

    /// Make every subsequent write fail with `StoreError::WriteConflict`
    pub fn reject_writes(&self, reason: impl Into<String>) {
        if let Ok(mut reject) = self.reject_writes.write() {
            *reject = Some(reason.into());
        }
    }

    /// Accept writes again
    pub fn accept_writes(&self) {
        if let Ok(mut reject) = self.reject_writes.write() {
            *reject = None;
        }
    }

    /// Number of writes a document has received
    pub fn revision(&self, document: &DocumentRef) -> u64 {
        self.documents
            .read()
            .ok()
            .and_then(|docs| docs.get(document).map(|d| d.revision))
            .unwrap_or(0)
    }

    /// Change summary of the most recent write to a document
    pub fn last_summary(&self, document: &DocumentRef) -> Option<String> {
        self.documents
            .read()
            .ok()
            .and_then(|docs| docs.get(document).and_then(|d| d.last_summary.clone()))
    }

    /// Number of documents in the store
    pub fn document_count(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or(0)
    }
}

fn poisoned() -> StoreError {
    StoreError::Internal("document store lock poisoned".to_string())
}

impl DocumentStore for MemoryDocumentStore {
    fn fetch(&self, document: &DocumentRef) -> Result<Option<String>> {
        let docs = self.documents.read().map_err(|_| poisoned())?;
        Ok(docs.get(document).map(|d| d.text.clone()))
    }

    fn write(&self, document: &DocumentRef, text: &str, summary: &str) -> Result<()> {
        if let Some(reason) = self.reject_writes.read().map_err(|_| poisoned())?.clone() {
            return Err(StoreError::WriteConflict {
                document: document.to_string(),
                reason,
            });
        }

        let mut docs = self.documents.write().map_err(|_| poisoned())?;
        let stored = docs.entry(document.clone()).or_default();
        stored.text = text.to_string();
        stored.revision += 1;
        stored.last_summary = Some(summary.to_string());
        Ok(())
    }
}
