use blog_shared::dto::{PostRepresentation, PostWrite};

use crate::domain::{
    Author, NewAuthor, NewPost, POST_TITLE_MAX_LEN, POST_TITLE_MIN_LEN, Post, PostWithAuthor,
};
use crate::error::{DomainError, ValidationErrors};
use crate::ports::PostRepository;

use super::author::{AuthorChanges, AuthorSerializer};
use super::fields::{CharField, NULL, REQUIRED};

const TITLE_TOO_SHORT: &str = "Title must be at least 5 characters";

/// A fully validated create payload: the nested author plus the post fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPost {
    pub author: NewAuthor,
    pub post: NewPost,
}

/// Validated change set for an existing post.
///
/// `author` is `Some` whenever the payload carried an author object, even an
/// empty one; the linked author is then re-persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_published: Option<bool>,
    pub author: Option<AuthorChanges>,
}

impl PostChanges {
    /// Merge onto the current records. The post keeps its author link and
    /// timestamps; only declared writable fields move.
    pub fn apply(self, instance: PostWithAuthor) -> (Post, Option<Author>) {
        let PostWithAuthor { mut post, author } = instance;

        let author = self.author.map(|changes| changes.apply(author));

        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(is_published) = self.is_published {
            post.is_published = is_published;
        }

        (post, author)
    }
}

/// Transfer model for posts:
/// `{id, title, content, published_at, is_published, author: {id, name}}`.
pub struct PostSerializer<'a> {
    posts: &'a dyn PostRepository,
}

impl<'a> PostSerializer<'a> {
    pub fn new(posts: &'a dyn PostRepository) -> Self {
        Self { posts }
    }

    /// Read path: the post with its author embedded by value.
    pub fn to_representation(instance: &PostWithAuthor) -> PostRepresentation {
        let PostWithAuthor { post, author } = instance;
        PostRepresentation {
            id: post.id,
            title: post.title.clone(),
            content: post.content.clone(),
            published_at: post.published_at,
            is_published: post.is_published,
            author: AuthorSerializer::to_representation(author),
        }
    }

    /// Title rule on top of the generic field checks.
    pub fn validate_title(title: &str) -> Result<(), String> {
        if title.chars().count() < POST_TITLE_MIN_LEN {
            return Err(TITLE_TOO_SHORT.to_string());
        }
        Ok(())
    }

    fn clean_title(
        payload: &PostWrite,
        required: bool,
        errors: &mut ValidationErrors,
    ) -> Option<String> {
        let title = CharField::new("title")
            .max_len(POST_TITLE_MAX_LEN)
            .required(required)
            .clean(payload.title.as_ref().map(Option::as_deref), errors)?;

        if let Err(message) = Self::validate_title(&title) {
            errors.add("title", message);
            return None;
        }
        Some(title)
    }

    fn clean_content(
        payload: &PostWrite,
        required: bool,
        errors: &mut ValidationErrors,
    ) -> Option<String> {
        CharField::new("content")
            .required(required)
            .clean(payload.content.as_ref().map(Option::as_deref), errors)
    }

    /// The flag may be omitted but never null.
    fn clean_is_published(payload: &PostWrite, errors: &mut ValidationErrors) -> Option<bool> {
        match payload.is_published {
            Some(Some(value)) => Some(value),
            Some(None) => {
                errors.add("is_published", NULL);
                None
            }
            None => None,
        }
    }

    /// Validate the post's own fields, ignoring any nested author.
    pub fn validate_new_post(payload: &PostWrite) -> Result<NewPost, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = Self::clean_title(payload, true, &mut errors);
        let content = Self::clean_content(payload, true, &mut errors);
        let is_published = Self::clean_is_published(payload, &mut errors).unwrap_or(false);

        match (title, content) {
            (Some(title), Some(content)) if errors.is_empty() => {
                Ok(NewPost::new(title, content, is_published))
            }
            _ => Err(errors),
        }
    }

    /// Validate a create payload. The nested author and its name are required.
    pub fn validate_create(payload: &PostWrite) -> Result<ValidatedPost, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = Self::clean_title(payload, true, &mut errors);
        let content = Self::clean_content(payload, true, &mut errors);
        let is_published = Self::clean_is_published(payload, &mut errors).unwrap_or(false);

        let author = match &payload.author {
            Some(Some(author)) => AuthorSerializer::clean_new(author, "author.name", &mut errors),
            Some(None) => {
                errors.add("author", NULL);
                None
            }
            None => {
                errors.add("author", REQUIRED);
                None
            }
        };

        match (title, content, author) {
            (Some(title), Some(content), Some(author)) if errors.is_empty() => Ok(ValidatedPost {
                author,
                post: NewPost::new(title, content, is_published),
            }),
            _ => Err(errors),
        }
    }

    /// Validate an update payload.
    ///
    /// With `partial` unset (full replacement) the same fields as on create
    /// are required.
    pub fn validate_update(
        payload: &PostWrite,
        partial: bool,
    ) -> Result<PostChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = Self::clean_title(payload, !partial, &mut errors);
        let content = Self::clean_content(payload, !partial, &mut errors);
        let is_published = Self::clean_is_published(payload, &mut errors);

        let author = match &payload.author {
            Some(Some(author)) => {
                let changes = AuthorSerializer::clean_changes(author, "author.name", &mut errors);
                if !partial && author.name.is_none() {
                    errors.add("author.name", REQUIRED);
                }
                Some(changes)
            }
            Some(None) => {
                errors.add("author", NULL);
                None
            }
            None => {
                if !partial {
                    errors.add("author", REQUIRED);
                }
                None
            }
        };

        errors.into_result()?;

        Ok(PostChanges {
            title,
            content,
            is_published,
            author,
        })
    }

    /// Nested create: always inserts a fresh author, then the post linked to
    /// it. Both rows are written in one store transaction.
    pub async fn create(&self, data: ValidatedPost) -> Result<PostWithAuthor, DomainError> {
        let ValidatedPost { author, post } = data;
        let created = self.posts.insert_with_author(author, post).await?;

        tracing::info!(
            post_id = created.post.id,
            author_id = created.author.id,
            "Post created with nested author"
        );
        Ok(created)
    }

    /// Nested update: mutates the linked author's name in place, never
    /// re-linking the post or creating an author.
    pub async fn update(
        &self,
        instance: PostWithAuthor,
        changes: PostChanges,
    ) -> Result<PostWithAuthor, DomainError> {
        let post_id = instance.post.id;
        let (post, author) = changes.apply(instance);
        let updated = self.posts.update_with_author(post, author).await?;

        tracing::info!(post_id, author_id = updated.author.id, "Post updated");
        Ok(updated)
    }

    /// Load a post with its author or fail with `NotFound`.
    pub async fn get(&self, id: i32) -> Result<PostWithAuthor, DomainError> {
        self.posts
            .find_with_author(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "Post",
                id,
            })
    }
}

#[cfg(test)]
mod tests {
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

    fn instance() -> PostWithAuthor {
        let author = NewAuthor::new("Jane Doe", None).into_author(1);
        let post = NewPost::new("Hello World", "body text", false).into_post(10, author.id);
        PostWithAuthor { post, author }
    }

    #[test]
    fn test_validate_title_rule() {
        assert_eq!(
            PostSerializer::validate_title("Hi"),
            Err("Title must be at least 5 characters".to_string())
        );
        assert!(PostSerializer::validate_title("Hello").is_ok());
    }

    #[test]
    fn test_validate_create_accepts_nested_author() {
        let data = PostSerializer::validate_create(&hello_world()).unwrap();
        assert_eq!(data.author.name, "Jane Doe");
        assert_eq!(data.post.title, "Hello World");
        assert!(!data.post.is_published);
    }

    #[test]
    fn test_validate_create_rejects_short_title() {
        let errors = PostSerializer::validate_create(&body(json!({
            "title": "Hi",
            "content": "x",
            "author": {"name": "A"}
        })))
        .unwrap_err();
        assert_eq!(errors.get("title"), ["Title must be at least 5 characters"]);
        assert!(errors.get("content").is_empty());
    }

    #[test]
    fn test_validate_create_requires_author_name() {
        let errors = PostSerializer::validate_create(&body(json!({
            "title": "Hello World",
            "content": "body text",
            "author": {}
        })))
        .unwrap_err();
        assert_eq!(errors.get("author.name"), ["This field is required."]);
    }

    #[test]
    fn test_validate_create_requires_author() {
        let errors = PostSerializer::validate_create(&body(json!({
            "title": "Hello World",
            "content": "body text"
        })))
        .unwrap_err();
        assert_eq!(errors.get("author"), ["This field is required."]);
    }

    #[test]
    fn test_validate_create_collects_every_error() {
        let errors = PostSerializer::validate_create(&body(json!({
            "title": "x".repeat(POST_TITLE_MAX_LEN + 1),
            "content": " "
        })))
        .unwrap_err();
        assert_eq!(
            errors.get("title"),
            ["Ensure this field has no more than 200 characters."]
        );
        assert_eq!(errors.get("content"), ["This field may not be blank."]);
        assert_eq!(errors.get("author"), ["This field is required."]);
    }

    #[test]
    fn test_validate_create_rejects_nulls() {
        let errors = PostSerializer::validate_create(&body(json!({
            "title": null,
            "content": "body text",
            "is_published": null,
            "author": null
        })))
        .unwrap_err();
        assert_eq!(errors.get("title"), ["This field may not be null."]);
        assert_eq!(errors.get("is_published"), ["This field may not be null."]);
        assert_eq!(errors.get("author"), ["This field may not be null."]);
    }

    #[test]
    fn test_partial_update_validates_only_supplied_fields() {
        let changes =
            PostSerializer::validate_update(&body(json!({"is_published": true})), true).unwrap();
        assert_eq!(
            changes,
            PostChanges {
                is_published: Some(true),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_partial_update_rejects_short_title() {
        let errors =
            PostSerializer::validate_update(&body(json!({"title": "Hi"})), true).unwrap_err();
        assert_eq!(errors.get("title"), ["Title must be at least 5 characters"]);
    }

    #[test]
    fn test_partial_update_rejects_null_fields() {
        let errors = PostSerializer::validate_update(
            &body(json!({"title": null, "author": {"name": null}})),
            true,
        )
        .unwrap_err();
        assert_eq!(errors.get("title"), ["This field may not be null."]);
        assert_eq!(errors.get("author.name"), ["This field may not be null."]);
    }

    #[test]
    fn test_full_update_requires_create_fields() {
        let errors =
            PostSerializer::validate_update(&body(json!({"title": "New Title"})), false)
                .unwrap_err();
        assert_eq!(errors.get("content"), ["This field is required."]);
        assert_eq!(errors.get("author"), ["This field is required."]);
    }

    #[test]
    fn test_apply_updates_title_and_existing_author_name() {
        let changes = PostSerializer::validate_update(
            &body(json!({"title": "New Title", "author": {"name": "New Author Name"}})),
            true,
        )
        .unwrap();
        let (post, author) = changes.apply(instance());

        assert_eq!(post.title, "New Title");
        assert_eq!(post.content, "body text");
        assert_eq!(post.author_id, 1);
        let author = author.unwrap();
        assert_eq!(author.id, 1);
        assert_eq!(author.name, "New Author Name");
    }

    #[test]
    fn test_apply_without_author_leaves_author_untouched() {
        let changes = PostChanges {
            is_published: Some(true),
            ..Default::default()
        };
        let before = instance();
        let (post, author) = changes.apply(before.clone());

        assert!(post.is_published);
        assert_eq!(post.title, before.post.title);
        assert_eq!(post.content, before.post.content);
        assert_eq!(post.published_at, before.post.published_at);
        assert!(author.is_none());
    }

    #[test]
    fn test_representation_embeds_author() {
        let repr = PostSerializer::to_representation(&instance());
        assert_eq!(repr.id, 10);
        assert_eq!(repr.author.id, 1);
        assert_eq!(repr.author.name, "Jane Doe");
    }
}
