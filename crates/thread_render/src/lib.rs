//! Thread Render - Comment thread to HTML conversion
//!
//! This crate walks a comment thread and produces the nested markup shown
//! under a page, with reply/edit/delete affordances gated on the viewer's
//! capabilities. Comment bodies go through a pluggable rich-text transform.

mod error;
mod messages;
mod renderer;
mod rich_text;

pub use error::*;
pub use messages::*;
pub use renderer::*;
pub use rich_text::*;
