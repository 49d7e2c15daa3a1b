//! Thread Model - Comment forest and its mutating commands
//!
//! This crate provides the in-memory comment thread attached to a host
//! document: a flat, insertion-ordered map of comments forming an implicit
//! forest through parent links and reply lists.

mod comment;
mod document_ref;
mod error;
mod integrity;
mod thread;
mod viewer;

pub use comment::*;
pub use document_ref::*;
pub use error::*;
pub use integrity::*;
pub use thread::*;
pub use viewer::*;
