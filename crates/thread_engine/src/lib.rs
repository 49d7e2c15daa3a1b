//! Thread Engine - Comment command handling
//!
//! This crate ties the comment core together. A `CommentService` is built
//! with its collaborators (document store, identity provider, rich-text
//! transform, clock) and handles one `CommentCommand` per request:
//! fetch the document, decode its thread, apply the command, render the
//! response, and write the document back only if the thread changed.

mod clock;
mod command;
mod error;
mod identity;
mod service;
mod settings;

pub use clock::*;
pub use command::*;
pub use error::*;
pub use identity::*;
pub use service::*;
pub use settings::*;
