//! File-based document store
//!
//! Stores each host document as a UTF-8 text file:
//!
//! ```text
//! data/
//! ├── Talk%3AMain%20Page.txt
//! └── Talk%3AHelp.txt
//! ```
//!
//! File names are the percent-encoded document reference, so any reference
//! maps to a single file inside the base directory. Writes go to a temp file
//! that is then renamed over the document.

use crate::{DocumentStore, Result, StoreError};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thread_model::DocumentRef;

const DOCUMENT_EXTENSION: &str = "txt";

/// File-based implementation of `DocumentStore`
#[derive(Debug)]
pub struct FileDocumentStore {
    /// Directory holding one file per document
    base_path: PathBuf,
    /// Serializes the write-then-rename sequence
    write_lock: Mutex<()>,
}

impl FileDocumentStore {
    /// Create a store rooted at `base_path`, creating the directory if needed
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self {
            base_path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the file backing `document`
    pub fn document_path(&self, document: &DocumentRef) -> PathBuf {
        let name = urlencoding::encode(document.as_str());
        self.base_path
            .join(format!("{name}.{DOCUMENT_EXTENSION}"))
    }
}

impl DocumentStore for FileDocumentStore {
    fn fetch(&self, document: &DocumentRef) -> Result<Option<String>> {
        match fs::read_to_string(self.document_path(document)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, document: &DocumentRef, text: &str, summary: &str) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Internal("document write lock poisoned".to_string()))?;

        let path = self.document_path(document);
        let temp_path = path.with_extension("txt.tmp");

        if let Err(e) = write_and_replace(&temp_path, &path, text) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        tracing::debug!("Wrote {} ({} bytes): {}", document, text.len(), summary);
        Ok(())
    }
}

/// Write `text` to `temp_path`, then move it over `path`
fn write_and_replace(temp_path: &Path, path: &Path, text: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(temp_path)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()?;
    fs::rename(temp_path, path)
}
