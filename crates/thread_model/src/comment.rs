//! Comment model - a single node in the comment forest
//!
//! A comment carries:
//! - An opaque identifier, also used as the markup anchor
//! - An optional parent link (`None` for top-level comments)
//! - Author and creation timestamp, fixed at creation
//! - A mutable body
//! - The ids of its replies, newest first

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a comment
///
/// Freshly created comments get a hex UUID, but ids read back from storage
/// are kept verbatim whatever their shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(String);

impl CommentId {
    /// Generate a new random CommentId
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CommentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CommentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A comment in a thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Owning comment, `None` for a top-level comment
    parent: Option<CommentId>,
    /// Who wrote the comment
    author: String,
    /// When the comment was created. Edits do not change this.
    #[serde(rename = "date", with = "chrono::serde::ts_seconds")]
    timestamp: DateTime<Utc>,
    /// Raw comment text
    #[serde(rename = "text")]
    body: String,
    /// Reply ids, most recently added first
    #[serde(default)]
    replies: Vec<CommentId>,
}

impl Comment {
    /// Create a new comment without replies
    ///
    /// The timestamp is truncated to whole seconds, the precision it is
    /// stored with.
    pub fn new(
        parent: Option<CommentId>,
        author: impl Into<String>,
        timestamp: DateTime<Utc>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            parent,
            author: author.into(),
            timestamp: timestamp.trunc_subsecs(0),
            body: body.into(),
            replies: Vec::new(),
        }
    }

    /// Rebuild a comment with an existing reply list (for storage readers)
    pub fn with_replies(mut self, replies: Vec<CommentId>) -> Self {
        self.replies = replies;
        self
    }

    pub fn parent(&self) -> Option<&CommentId> {
        self.parent.as_ref()
    }

    /// Whether this comment starts a top-level thread
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub(crate) fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn replies(&self) -> &[CommentId] {
        &self.replies
    }

    pub fn has_replies(&self) -> bool {
        !self.replies.is_empty()
    }

    pub(crate) fn prepend_reply(&mut self, id: CommentId) {
        self.replies.insert(0, id);
    }

    /// Remove a reply id, returning whether it was listed
    pub(crate) fn remove_reply(&mut self, id: &CommentId) -> bool {
        if let Some(pos) = self.replies.iter().position(|r| r == id) {
            self.replies.remove(pos);
            true
        } else {
            false
        }
    }

    /// Raw author/date/text record for client-side edit pre-fill
    pub fn source(&self) -> CommentSource {
        CommentSource {
            user: self.author.clone(),
            date: self.timestamp.timestamp(),
            text: self.body.clone(),
        }
    }
}

/// Raw fields of a comment as handed to an editing client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSource {
    pub user: String,
    /// Creation time in unix seconds
    pub date: i64,
    pub text: String,
}
