//! Comment commands
//!
//! The request layer decodes a client request into a `CommentCommand`. The
//! wire shape follows the client script's parameters: a `cmd` tag plus
//! `id` and `text` where the command needs them. Any unrecognised `cmd`
//! falls back to viewing the whole thread.

use serde::{Deserialize, Serialize};
use thread_model::CommentId;

/// A single request against a document's comment thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum CommentCommand {
    /// Start a new top-level comment
    Add { text: String },
    /// Reply to comment `id`
    Reply { id: CommentId, text: String },
    /// Replace the text of comment `id`
    Edit { id: CommentId, text: String },
    /// Delete comment `id` and all replies below it
    #[serde(rename = "del")]
    Delete { id: CommentId },
    /// Fetch the raw fields of comment `id` for editing
    #[serde(rename = "src")]
    Source { id: CommentId },
    /// Render the whole thread
    #[serde(other)]
    View,
}

/// Command discriminant, used to pick change summaries and for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Add,
    Reply,
    Edit,
    Delete,
    Source,
    View,
}

impl CommentCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            CommentCommand::Add { .. } => CommandKind::Add,
            CommentCommand::Reply { .. } => CommandKind::Reply,
            CommentCommand::Edit { .. } => CommandKind::Edit,
            CommentCommand::Delete { .. } => CommandKind::Delete,
            CommentCommand::Source { .. } => CommandKind::Source,
            CommentCommand::View => CommandKind::View,
        }
    }
}

impl CommandKind {
    /// Name of the command as sent by clients
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Add => "add",
            CommandKind::Reply => "reply",
            CommandKind::Edit => "edit",
            CommandKind::Delete => "del",
            CommandKind::Source => "src",
            CommandKind::View => "view",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
