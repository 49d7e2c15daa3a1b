//! Thread Store - Comment thread persistence inside host documents
//!
//! This crate embeds a serialized comment thread in a delimited block of an
//! arbitrary text document and reads it back, leaving every byte outside the
//! block untouched. It also defines the document store collaborator that
//! fetches and writes host document text, with in-memory and file backends.

mod codec;
mod document_store;
mod error;
mod file_store;
mod legacy;
mod memory_store;

pub use codec::*;
pub use document_store::*;
pub use error::*;
pub use file_store::*;
pub use memory_store::*;
