//! Ports - trait definitions the record store must implement.

mod repository;

pub use repository::{
    AuthorRepository, BaseRepository, PostColumn, PostFilter, PostRepository,
};
