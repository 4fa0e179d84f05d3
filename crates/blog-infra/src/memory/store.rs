//! In-memory record store with the same referential rules as the SQL schema.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::domain::{Author, NewAuthor, NewPost, Post, PostWithAuthor};
use blog_core::error::RepoError;
use blog_core::ports::{AuthorRepository, BaseRepository, PostFilter, PostRepository};

#[derive(Default)]
struct Tables {
    authors: BTreeMap<i32, Author>,
    posts: BTreeMap<i32, Post>,
    last_author_id: i32,
    last_post_id: i32,
}

impl Tables {
    fn insert_author(&mut self, author: NewAuthor) -> Author {
        self.last_author_id += 1;
        let author = author.into_author(self.last_author_id);
        self.authors.insert(author.id, author.clone());
        author
    }

    fn insert_post(&mut self, author_id: i32, post: NewPost) -> Result<Post, RepoError> {
        if !self.authors.contains_key(&author_id) {
            return Err(RepoError::Constraint(format!(
                "author {author_id} does not exist"
            )));
        }
        self.last_post_id += 1;
        let post = post.into_post(self.last_post_id, author_id);
        self.posts.insert(post.id, post.clone());
        Ok(post)
    }

    fn join(&self, post: &Post) -> Result<PostWithAuthor, RepoError> {
        let author = self.authors.get(&post.author_id).ok_or_else(|| {
            RepoError::Constraint(format!("post {} references a missing author", post.id))
        })?;
        Ok(PostWithAuthor {
            post: post.clone(),
            author: author.clone(),
        })
    }

    fn delete_posts_of(&mut self, author_id: i32) -> u64 {
        let before = self.posts.len();
        self.posts.retain(|_, post| post.author_id != author_id);
        (before - self.posts.len()) as u64
    }
}

/// Shared tables behind both in-memory repositories.
///
/// Every operation takes the write lock for its whole duration, so the
/// multi-row writes are atomic with respect to other callers.
/// Note: Data is lost on process restart.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authors(&self) -> InMemoryAuthorRepository {
        InMemoryAuthorRepository {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: Arc::clone(&self.tables),
        }
    }
}

/// In-memory author repository.
pub struct InMemoryAuthorRepository {
    tables: Arc<RwLock<Tables>>,
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<Author, i32> for InMemoryAuthorRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Author>, RepoError> {
        Ok(self.tables.read().await.authors.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Author>, RepoError> {
        Ok(self.tables.read().await.authors.values().cloned().collect())
    }

    /// Mirrors `ON DELETE CASCADE`: the author's posts go too.
    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        self.delete_cascade(id).await.map(|_| ())
    }
}

#[async_trait]
impl AuthorRepository for InMemoryAuthorRepository {
    async fn insert(&self, author: NewAuthor) -> Result<Author, RepoError> {
        let author = self.tables.write().await.insert_author(author);
        tracing::debug!(author_id = author.id, "Author inserted");
        Ok(author)
    }

    async fn delete_cascade(&self, id: i32) -> Result<u64, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.authors.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        let removed = tables.delete_posts_of(id);
        tracing::debug!(author_id = id, posts_deleted = removed, "Author deleted with posts");
        Ok(removed)
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.tables.read().await.posts.values().cloned().collect())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        match self.tables.write().await.posts.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, author_id: i32, post: NewPost) -> Result<Post, RepoError> {
        let post = self.tables.write().await.insert_post(author_id, post)?;
        tracing::debug!(post_id = post.id, author_id, "Post inserted");
        Ok(post)
    }

    async fn insert_with_author(
        &self,
        author: NewAuthor,
        post: NewPost,
    ) -> Result<PostWithAuthor, RepoError> {
        let mut tables = self.tables.write().await;
        let author = tables.insert_author(author);
        let post = tables.insert_post(author.id, post)?;
        Ok(PostWithAuthor { post, author })
    }

    async fn update_with_author(
        &self,
        post: Post,
        author: Option<Author>,
    ) -> Result<PostWithAuthor, RepoError> {
        let mut tables = self.tables.write().await;

        let current = tables.posts.get(&post.id).ok_or(RepoError::NotFound)?;
        let author_id = current.author_id;
        let published_at = current.published_at;

        if let Some(author) = author {
            if author.id != author_id {
                return Err(RepoError::Constraint(format!(
                    "post {} belongs to author {author_id}, not {}",
                    post.id, author.id
                )));
            }
            let stored = tables
                .authors
                .get_mut(&author_id)
                .ok_or(RepoError::NotFound)?;
            stored.name = author.name;
        }

        // Author link and publication time are immutable.
        let post = Post {
            author_id,
            published_at,
            ..post
        };
        tables.posts.insert(post.id, post.clone());
        tables.join(&post)
    }

    async fn find_with_author(&self, id: i32) -> Result<Option<PostWithAuthor>, RepoError> {
        let tables = self.tables.read().await;
        tables.posts.get(&id).map(|post| tables.join(post)).transpose()
    }

    async fn list_with_authors(
        &self,
        filter: &PostFilter,
    ) -> Result<Vec<PostWithAuthor>, RepoError> {
        let tables = self.tables.read().await;
        tables
            .posts
            .values()
            .filter(|post| filter.matches(post))
            .map(|post| tables.join(post))
            .collect()
    }

    async fn find_by_author_id(&self, author_id: i32) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|post| post.author_id == author_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use blog_core::PostSerializer;
    use blog_core::error::DomainError;
    use blog_shared::dto::PostWrite;
    use serde_json::{Value, json};

    use super::*;

    fn body(value: Value) -> PostWrite {
        serde_json::from_value(value).unwrap()
    }

    fn hello_world() -> PostWrite {
        body(json!({
            "title": "Hello World",
            "content": "body text",
            "is_published": false,
            "author": {"name": "Jane Doe"}
        }))
    }

    #[tokio::test]
    async fn test_create_inserts_fresh_author_each_time() {
        let store = InMemoryStore::new();
        let posts = store.posts();
        let serializer = PostSerializer::new(&posts);

        let first = serializer
            .create(PostSerializer::validate_create(&hello_world()).unwrap())
            .await
            .unwrap();
        let second = serializer
            .create(PostSerializer::validate_create(&hello_world()).unwrap())
            .await
            .unwrap();

        assert_eq!(first.author.name, "Jane Doe");
        assert_eq!(first.post.author_id, first.author.id);
        assert_ne!(first.author.id, second.author.id);
        assert_eq!(store.authors().find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_short_title_persists_nothing() {
        let store = InMemoryStore::new();
        let payload = body(json!({"title": "Hi", "content": "x", "author": {"name": "A"}}));

        let errors = PostSerializer::validate_create(&payload).unwrap_err();
        assert_eq!(errors.get("title"), ["Title must be at least 5 characters"]);

        assert!(store.authors().find_all().await.unwrap().is_empty());
        assert!(store.posts().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_renames_existing_author() {
        let store = InMemoryStore::new();
        let posts = store.posts();
        let serializer = PostSerializer::new(&posts);
        let created = serializer
            .create(PostSerializer::validate_create(&hello_world()).unwrap())
            .await
            .unwrap();

        let payload = body(json!({"title": "New Title", "author": {"name": "New Author Name"}}));
        let changes = PostSerializer::validate_update(&payload, true).unwrap();
        let instance = serializer.get(created.post.id).await.unwrap();
        let updated = serializer.update(instance, changes).await.unwrap();

        assert_eq!(updated.post.title, "New Title");
        assert_eq!(updated.author.id, created.author.id);
        assert_eq!(updated.author.name, "New Author Name");

        let authors = store.authors().find_all().await.unwrap();
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].name, "New Author Name");
    }

    #[tokio::test]
    async fn test_update_is_published_only() {
        let store = InMemoryStore::new();
        let posts = store.posts();
        let serializer = PostSerializer::new(&posts);
        let created = serializer
            .create(PostSerializer::validate_create(&hello_world()).unwrap())
            .await
            .unwrap();

        let changes =
            PostSerializer::validate_update(&body(json!({"is_published": true})), true).unwrap();
        let updated = serializer.update(created.clone(), changes).await.unwrap();

        assert!(updated.post.is_published);
        assert_eq!(updated.post.title, created.post.title);
        assert_eq!(updated.post.content, created.post.content);
        assert_eq!(updated.author, created.author);
    }

    #[tokio::test]
    async fn test_get_missing_post() {
        let store = InMemoryStore::new();
        let posts = store.posts();
        let err = PostSerializer::new(&posts).get(99).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                entity_type: "Post",
                id: 99
            }
        ));
    }

    #[tokio::test]
    async fn test_direct_post_insert_requires_author() {
        let store = InMemoryStore::new();
        let err = store
            .posts()
            .insert(42, NewPost::new("Orphan post", "body", false))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_delete_author_cascades_to_posts() {
        let store = InMemoryStore::new();
        let authors = store.authors();
        let posts = store.posts();

        let jane = authors.insert(NewAuthor::new("Jane Doe", None)).await.unwrap();
        let john = authors.insert(NewAuthor::new("John Roe", None)).await.unwrap();
        posts
            .insert(jane.id, NewPost::new("First post", "body", false))
            .await
            .unwrap();
        posts
            .insert(jane.id, NewPost::new("Second post", "body", true))
            .await
            .unwrap();
        let kept = posts
            .insert(john.id, NewPost::new("Other post", "body", false))
            .await
            .unwrap();

        assert_eq!(authors.delete_cascade(jane.id).await.unwrap(), 2);

        let remaining = posts.find_all().await.unwrap();
        assert_eq!(remaining, vec![kept]);
        assert!(matches!(
            authors.delete_cascade(jane.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_list_filters_by_search_and_title() {
        let store = InMemoryStore::new();
        let authors = store.authors();
        let posts = store.posts();
        let jane = authors.insert(NewAuthor::new("Jane Doe", None)).await.unwrap();
        posts
            .insert(jane.id, NewPost::new("Rust ownership", "borrowing", false))
            .await
            .unwrap();
        posts
            .insert(jane.id, NewPost::new("Gardening", "tomatoes and rust spots", false))
            .await
            .unwrap();
        posts
            .insert(jane.id, NewPost::new("Cooking", "pasta", false))
            .await
            .unwrap();

        let search = PostFilter {
            search: Some("rust".to_string()),
            search_in: vec![
                blog_core::ports::PostColumn::Title,
                blog_core::ports::PostColumn::Content,
            ],
            equals: Vec::new(),
        };
        let found = posts.list_with_authors(&search).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|row| row.author.name == "Jane Doe"));

        let exact = PostFilter {
            equals: vec![(blog_core::ports::PostColumn::Title, "Cooking".to_string())],
            ..Default::default()
        };
        let found = posts.list_with_authors(&exact).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].post.title, "Cooking");
    }
}
