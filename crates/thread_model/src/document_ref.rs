//! Reference to the host document that stores a thread

use serde::{Deserialize, Serialize};

/// Host document identifier
///
/// The thread is persisted inside the text of this document. The core never
/// interprets the reference, it only hands it to the document store and the
/// rich-text transform.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentRef(pub String);

impl DocumentRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentRef {
    fn from(s: &str) -> Self {
        DocumentRef(s.to_string())
    }
}

impl From<String> for DocumentRef {
    fn from(s: String) -> Self {
        DocumentRef(s)
    }
}

impl std::fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
