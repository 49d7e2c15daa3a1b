//! Rich-text transform for comment bodies
//!
//! The host system decides how comment text becomes markup (wiki syntax,
//! markdown, ...). The renderer only needs the `RichText` trait; `PlainText`
//! is the fallback used when no host transform is configured.

use crate::Result;
use thread_model::DocumentRef;

/// Turns a raw comment body into markup
///
/// `context` is the document the thread is stored in, for transforms that
/// resolve relative links or templates against it.
pub trait RichText: Send + Sync {
    fn render(&self, body: &str, context: &DocumentRef) -> Result<String>;
}

/// Escapes the body and keeps its line breaks
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl RichText for PlainText {
    fn render(&self, body: &str, _context: &DocumentRef) -> Result<String> {
        Ok(escape_html(body).replace('\n', "<br />\n"))
    }
}

/// Escape text for use in HTML content and quoted attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
