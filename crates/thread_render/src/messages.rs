//! User-facing strings and display options

use serde::{Deserialize, Serialize};

/// Every piece of text the renderer shows
///
/// `signature` may contain `{author}` and `{date}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Messages {
    /// Heading above the whole thread
    pub heading: String,
    /// Shown when a page has no comments
    pub none: String,
    /// Shown instead of the add link to viewers who cannot comment
    pub anonymous: String,
    pub add: String,
    pub reply: String,
    pub edit: String,
    pub delete: String,
    pub signature: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            heading: "Comments".to_string(),
            none: "There are no comments on this page.".to_string(),
            anonymous: "You must be logged in to add comments.".to_string(),
            add: "Add comment".to_string(),
            reply: "Reply".to_string(),
            edit: "Edit".to_string(),
            delete: "Delete".to_string(),
            signature: "Posted by {author} at {date}".to_string(),
        }
    }
}

/// Display options for rendered comments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderOptions {
    /// `strftime`-style format for comment timestamps
    pub date_format: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            date_format: "%H:%M, %-d %B %Y".to_string(),
        }
    }
}
