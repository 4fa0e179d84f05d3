//! Transfer model - maps nested wire payloads to Author/Post records and back.
//!
//! Validation always runs to completion before any store call, so a payload
//! that fails never leaves rows behind.

mod author;
mod fields;
mod post;

pub use author::{AuthorChanges, AuthorSerializer};
pub use post::{PostChanges, PostSerializer, ValidatedPost};
