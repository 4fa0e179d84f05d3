//! # Blog Shared
//!
//! Wire types shared by the transfer model and the HTTP layer.
//! Every shape lists its fields by hand; nothing is derived from the records.

pub mod dto;
pub mod response;

pub use dto::{AuthorRepresentation, AuthorWrite, PostRepresentation, PostWrite};
pub use response::ErrorResponse;
