//! In-memory record store - used when no database is configured, and in tests.

mod store;

pub use store::{InMemoryAuthorRepository, InMemoryPostRepository, InMemoryStore};
