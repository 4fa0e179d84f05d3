//! Domain entities - the core business objects.

mod author;
mod post;

pub use author::{AUTHOR_NAME_MAX_LEN, Author, NewAuthor};
pub use post::{NewPost, POST_TITLE_MAX_LEN, POST_TITLE_MIN_LEN, Post, PostWithAuthor};
