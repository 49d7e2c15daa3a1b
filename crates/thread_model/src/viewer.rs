//! Viewer identity and capabilities
//!
//! The identity provider decides who the current viewer is; this crate only
//! consumes the answer. The capability gates that depend on the thread's
//! shape live here so the renderer and any other caller agree on them.

use crate::Comment;
use serde::{Deserialize, Serialize};

/// The person looking at (or acting on) a thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    /// Display name, recorded as author on new comments
    pub name: String,
    /// Whether the viewer may write comments at all
    pub can_author: bool,
    /// Elevated privileges: may edit or delete anything
    pub is_moderator: bool,
}

impl Viewer {
    /// A viewer who is not logged in
    pub fn anonymous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            can_author: false,
            is_moderator: false,
        }
    }

    /// A logged-in viewer without elevated privileges
    pub fn member(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            can_author: true,
            is_moderator: false,
        }
    }

    /// A logged-in viewer with elevated privileges
    pub fn moderator(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            can_author: true,
            is_moderator: true,
        }
    }

    /// Whether a reply affordance should be offered
    pub fn can_reply(&self) -> bool {
        self.can_author
    }

    /// Whether edit and delete affordances should be offered for `comment`
    ///
    /// Moderators always qualify. An author qualifies only while the comment
    /// has no replies; any reply, even the author's own, revokes it.
    pub fn can_modify(&self, comment: &Comment) -> bool {
        if !self.can_author {
            return false;
        }
        self.is_moderator || (comment.author() == self.name && !comment.has_replies())
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::anonymous("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommentId;
    use chrono::Utc;

    #[test]
    fn test_author_loses_modify_once_replied() {
        let alice = Viewer::member("Alice");
        let mut comment = Comment::new(None, "Alice", Utc::now(), "hi");
        assert!(alice.can_modify(&comment));

        comment = comment.with_replies(vec![CommentId::from("r")]);
        assert!(!alice.can_modify(&comment));
        assert!(Viewer::moderator("Mod").can_modify(&comment));
    }

    #[test]
    fn test_other_members_cannot_modify() {
        let comment = Comment::new(None, "Alice", Utc::now(), "hi");
        assert!(!Viewer::member("Bob").can_modify(&comment));
        assert!(Viewer::member("Bob").can_reply());
    }

    #[test]
    fn test_anonymous_gets_nothing() {
        let comment = Comment::new(None, "127.0.0.1", Utc::now(), "hi");
        let anon = Viewer::anonymous("127.0.0.1");
        assert!(!anon.can_reply());
        assert!(!anon.can_modify(&comment));
    }
}
