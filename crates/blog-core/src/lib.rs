//! # Blog Core
//!
//! The domain layer of the blog backend: records, repository ports and the
//! transfer model that maps nested wire payloads onto Author/Post records.
//! No infrastructure dependencies live here.

pub mod domain;
pub mod error;
pub mod ports;
pub mod serializer;

pub use error::{DomainError, RepoError, ValidationErrors};
pub use serializer::{AuthorSerializer, PostSerializer};
