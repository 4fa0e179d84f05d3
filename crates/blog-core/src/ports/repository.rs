use async_trait::async_trait;

use crate::domain::{Author, NewAuthor, NewPost, Post, PostWithAuthor};
use crate::error::RepoError;

/// Generic repository trait defining the operations every record shares.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Load every entity, ordered by ID.
    async fn find_all(&self) -> Result<Vec<T>, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Author repository.
#[async_trait]
pub trait AuthorRepository: BaseRepository<Author, i32> {
    /// Insert an author directly, outside the nested post path.
    async fn insert(&self, author: NewAuthor) -> Result<Author, RepoError>;

    /// Delete an author together with every post referencing it, atomically.
    ///
    /// Returns the number of posts removed.
    async fn delete_cascade(&self, id: i32) -> Result<u64, RepoError>;
}

/// Searchable and filterable post columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostColumn {
    Title,
    Content,
}

impl PostColumn {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(PostColumn::Title),
            "content" => Some(PostColumn::Content),
            _ => None,
        }
    }

    /// The column's value on a post.
    pub fn value(self, post: &Post) -> &str {
        match self {
            PostColumn::Title => &post.title,
            PostColumn::Content => &post.content,
        }
    }
}

/// Listing criteria for posts.
///
/// `search` matches case-insensitively as a substring of any `search_in`
/// column; every `equals` pair must match exactly.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub search: Option<String>,
    pub search_in: Vec<PostColumn>,
    pub equals: Vec<(PostColumn, String)>,
}

impl PostFilter {
    /// Whether a post satisfies this filter.
    pub fn matches(&self, post: &Post) -> bool {
        let searched = match &self.search {
            Some(term) if !self.search_in.is_empty() => {
                let term = term.to_lowercase();
                self.search_in
                    .iter()
                    .any(|column| column.value(post).to_lowercase().contains(&term))
            }
            _ => true,
        };

        searched
            && self
                .equals
                .iter()
                .all(|(column, value)| column.value(post) == value)
    }
}

/// Post repository, including the nested author writes.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    /// Insert a post for an existing author.
    ///
    /// Fails with [`RepoError::Constraint`] when the author does not exist.
    async fn insert(&self, author_id: i32, post: NewPost) -> Result<Post, RepoError>;

    /// Insert a new author and a post referencing it in one transaction.
    async fn insert_with_author(
        &self,
        author: NewAuthor,
        post: NewPost,
    ) -> Result<PostWithAuthor, RepoError>;

    /// Persist the mutable post columns and, when given, the linked author's
    /// name, in one transaction. Never re-links the post.
    async fn update_with_author(
        &self,
        post: Post,
        author: Option<Author>,
    ) -> Result<PostWithAuthor, RepoError>;

    /// Find a post together with its author.
    async fn find_with_author(&self, id: i32) -> Result<Option<PostWithAuthor>, RepoError>;

    /// List posts with their authors, ordered by ID.
    async fn list_with_authors(&self, filter: &PostFilter)
    -> Result<Vec<PostWithAuthor>, RepoError>;

    /// All posts written by one author, ordered by ID.
    async fn find_by_author_id(&self, author_id: i32) -> Result<Vec<Post>, RepoError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, content: &str) -> Post {
        NewPost::new(title, content, false).into_post(1, 1)
    }

    #[test]
    fn test_search_is_case_insensitive_across_columns() {
        let filter = PostFilter {
            search: Some("RUST".to_string()),
            search_in: vec![PostColumn::Title, PostColumn::Content],
            equals: Vec::new(),
        };
        assert!(filter.matches(&post("Hello World", "written in rust")));
        assert!(!filter.matches(&post("Hello World", "written in go")));
    }

    #[test]
    fn test_equals_requires_exact_match() {
        let filter = PostFilter {
            equals: vec![(PostColumn::Title, "Hello World".to_string())],
            ..Default::default()
        };
        assert!(filter.matches(&post("Hello World", "body")));
        assert!(!filter.matches(&post("hello world", "body")));
    }

    #[test]
    fn test_search_without_columns_matches_everything() {
        let filter = PostFilter {
            search: Some("anything".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&post("Hello World", "body")));
    }
}
