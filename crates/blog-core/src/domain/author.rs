use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest accepted author name, in characters.
pub const AUTHOR_NAME_MAX_LEN: usize = 100;

/// Author entity - owns zero or more posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An author that has not been stored yet; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuthor {
    pub name: String,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewAuthor {
    /// Create a new author stamped with the current time.
    pub fn new(name: impl Into<String>, bio: Option<String>) -> Self {
        Self {
            name: name.into(),
            bio,
            created_at: Utc::now(),
        }
    }

    /// Attach the id handed out by the store.
    pub fn into_author(self, id: i32) -> Author {
        Author {
            id,
            name: self.name,
            bio: self.bio,
            created_at: self.created_at,
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
