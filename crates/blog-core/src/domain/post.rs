use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Author;

/// Longest accepted post title, in characters.
pub const POST_TITLE_MAX_LEN: usize = 200;

/// Shortest accepted post title, in characters.
pub const POST_TITLE_MIN_LEN: usize = 5;

/// Post entity - always belongs to exactly one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub author_id: i32,
    pub title: String,
    pub content: String,
    pub published_at: DateTime<Utc>,
    pub is_published: bool,
}

/// A post that has not been stored yet.
///
/// Carries no author reference: the store links it either to an existing
/// author or to one inserted in the same transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub is_published: bool,
    pub published_at: DateTime<Utc>,
}

impl NewPost {
    /// Create a new post stamped with the current time.
    pub fn new(title: impl Into<String>, content: impl Into<String>, is_published: bool) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            is_published,
            published_at: Utc::now(),
        }
    }

    /// Attach the store-assigned id and the owning author.
    pub fn into_post(self, id: i32, author_id: i32) -> Post {
        Post {
            id,
            author_id,
            title: self.title,
            content: self.content,
            published_at: self.published_at,
            is_published: self.is_published,
        }
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A post loaded together with its author, the unit the transfer model works on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithAuthor {
    pub post: Post,
    pub author: Author,
}
