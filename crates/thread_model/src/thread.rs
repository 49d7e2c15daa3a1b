//! Thread - the full comment forest attached to one host document
//!
//! The thread is a flat map from id to comment. Tree structure is implied by
//! each comment's parent link and reply list. The map keeps insertion order,
//! which is what "most recently added" means for top-level comments.
//!
//! A thread is rebuilt from stored text for every request, mutated by at most
//! one command, and then either encoded back or dropped. The dirty flag
//! records whether a command changed anything.

use crate::{Comment, CommentId, ModelError, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The comment forest of one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Thread {
    /// Comments indexed by ID, in insertion order
    comments: IndexMap<CommentId, Comment>,
    /// Set by the first successful mutation
    #[serde(skip)]
    dirty: bool,
}

impl Thread {
    /// Create a new empty thread
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a clean thread from already-stored comments
    pub fn from_comments(comments: IndexMap<CommentId, Comment>) -> Self {
        Self {
            comments,
            dirty: false,
        }
    }

    pub fn comments(&self) -> &IndexMap<CommentId, Comment> {
        &self.comments
    }

    pub fn get(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.get(id)
    }

    pub fn contains(&self, id: &CommentId) -> bool {
        self.comments.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Whether a command has changed the thread since it was loaded
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Top-level comments in insertion order
    pub fn roots(&self) -> impl Iterator<Item = (&CommentId, &Comment)> {
        self.comments.iter().filter(|(_, c)| c.is_root())
    }

    /// Top-level comments, most recently added first
    pub fn roots_newest_first(&self) -> Vec<&CommentId> {
        self.comments
            .iter()
            .rev()
            .filter(|(_, c)| c.is_root())
            .map(|(id, _)| id)
            .collect()
    }

    fn lookup(&self, id: &CommentId) -> Result<&Comment> {
        self.comments
            .get(id)
            .ok_or_else(|| ModelError::UnknownComment(id.clone()))
    }

    /// Add a new top-level comment
    pub fn add(
        &mut self,
        body: impl Into<String>,
        author: impl Into<String>,
        now: DateTime<Utc>,
    ) -> CommentId {
        let id = self.fresh_id();
        self.comments
            .insert(id.clone(), Comment::new(None, author, now, body));
        self.dirty = true;
        id
    }

    /// Add a reply to an existing comment
    ///
    /// The new id is listed first among the parent's replies.
    pub fn reply(
        &mut self,
        parent: &CommentId,
        body: impl Into<String>,
        author: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<CommentId> {
        self.lookup(parent)?;
        let id = self.fresh_id();
        self.comments.insert(
            id.clone(),
            Comment::new(Some(parent.clone()), author, now, body),
        );
        if let Some(parent) = self.comments.get_mut(parent) {
            parent.prepend_reply(id.clone());
        }
        self.dirty = true;
        Ok(id)
    }

    /// Replace a comment's body, leaving author and timestamp alone
    pub fn edit(&mut self, id: &CommentId, body: impl Into<String>) -> Result<CommentId> {
        let comment = self
            .comments
            .get_mut(id)
            .ok_or_else(|| ModelError::UnknownComment(id.clone()))?;
        comment.set_body(body);
        self.dirty = true;
        Ok(id.clone())
    }

    /// Delete a comment together with all of its descendants
    ///
    /// Deleting an unknown id is a no-op and leaves the dirty flag alone.
    /// Returns the number of comments removed.
    pub fn delete(&mut self, id: &CommentId) -> usize {
        if !self.contains(id) {
            return 0;
        }

        let mut removed = 0;
        for target in self.post_order(id) {
            let Some(comment) = self.comments.shift_remove(&target) else {
                continue;
            };
            if let Some(parent) = comment.parent() {
                if let Some(parent) = self.comments.get_mut(parent) {
                    parent.remove_reply(&target);
                }
            }
            removed += 1;
        }

        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// Subtree of `id`, children before their parent
    ///
    /// Uses an explicit stack over snapshots of each reply list, so depth is
    /// not limited by the call stack. Dangling ids are skipped and no comment
    /// is visited twice.
    fn post_order(&self, id: &CommentId) -> Vec<CommentId> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![(id.clone(), false)];

        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                order.push(current);
                continue;
            }
            let Some(comment) = self.comments.get(&current) else {
                continue;
            };
            if !seen.insert(current.clone()) {
                continue;
            }
            let children = comment.replies().to_vec();
            stack.push((current, true));
            stack.extend(children.into_iter().rev().map(|child| (child, false)));
        }

        order
    }

    fn fresh_id(&self) -> CommentId {
        loop {
            let id = CommentId::generate();
            if !self.comments.contains_key(&id) {
                return id;
            }
        }
    }
}
