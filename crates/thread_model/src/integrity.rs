//! Thread integrity checking
//!
//! Stored threads are trusted on load. This module reports where a thread
//! breaks the forest invariants so callers can log it; nothing here repairs
//! or rejects data.

use crate::{CommentId, Thread};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A violated forest invariant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IntegrityIssue {
    /// A reply list names an id that is not in the thread
    DanglingReply {
        comment_id: CommentId,
        reply_id: CommentId,
    },
    /// A parent link names an id that is not in the thread
    MissingParent {
        comment_id: CommentId,
        parent_id: CommentId,
    },
    /// The parent exists but does not list this comment as a reply
    UnlistedReply {
        comment_id: CommentId,
        parent_id: CommentId,
    },
    /// Following parent links from this comment never reaches a root
    ParentCycle { comment_id: CommentId },
}

impl std::fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityIssue::DanglingReply {
                comment_id,
                reply_id,
            } => write!(f, "comment {comment_id} lists unknown reply {reply_id}"),
            IntegrityIssue::MissingParent {
                comment_id,
                parent_id,
            } => write!(f, "comment {comment_id} has unknown parent {parent_id}"),
            IntegrityIssue::UnlistedReply {
                comment_id,
                parent_id,
            } => write!(f, "comment {comment_id} is not listed by its parent {parent_id}"),
            IntegrityIssue::ParentCycle { comment_id } => {
                write!(f, "comment {comment_id} is part of a parent cycle")
            }
        }
    }
}

impl Thread {
    /// Collect every invariant violation in the thread
    pub fn integrity_issues(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();

        for (id, comment) in self.comments() {
            for reply in comment.replies() {
                if !self.contains(reply) {
                    issues.push(IntegrityIssue::DanglingReply {
                        comment_id: id.clone(),
                        reply_id: reply.clone(),
                    });
                }
            }

            if let Some(parent_id) = comment.parent() {
                match self.get(parent_id) {
                    None => issues.push(IntegrityIssue::MissingParent {
                        comment_id: id.clone(),
                        parent_id: parent_id.clone(),
                    }),
                    Some(parent) if !parent.replies().contains(id) => {
                        issues.push(IntegrityIssue::UnlistedReply {
                            comment_id: id.clone(),
                            parent_id: parent_id.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }

            if self.has_parent_cycle(id) {
                issues.push(IntegrityIssue::ParentCycle {
                    comment_id: id.clone(),
                });
            }
        }

        issues
    }

    /// Whether the thread satisfies all forest invariants
    pub fn is_consistent(&self) -> bool {
        self.integrity_issues().is_empty()
    }

    fn has_parent_cycle(&self, start: &CommentId) -> bool {
        let mut seen = HashSet::new();
        let mut current = start;
        while let Some(parent) = self.get(current).and_then(|c| c.parent()) {
            if !seen.insert(current) {
                return true;
            }
            current = parent;
        }
        false
    }
}
