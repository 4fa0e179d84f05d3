//! Data Transfer Objects - the nested wire shapes of the posts resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An author embedded by value inside a post. Bio and timestamps stay off the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRepresentation {
    pub id: i32,
    pub name: String,
}

/// Read form of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRepresentation {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub published_at: DateTime<Utc>,
    pub is_published: bool,
    pub author: AuthorRepresentation,
}

/// Nested author payload accepted on writes.
///
/// `id` is read-only and silently dropped if a client sends it. `bio` is a
/// nullable column, so an explicit `null` simply clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorWrite {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub name: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Write form of a post, shared by create, full update and partial update.
///
/// Each field distinguishes "absent" (`None`) from an explicit `null`
/// (`Some(None)`). Which fields are required, and that none may be null, is
/// decided by the validation mode, not by deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWrite {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub title: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub content: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub is_published: Option<Option<bool>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub author: Option<Option<AuthorWrite>>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_null_is_kept_apart_from_absent() {
        let body: PostWrite =
            serde_json::from_value(json!({"title": null, "author": {"name": null}})).unwrap();

        assert_eq!(body.title, Some(None));
        assert_eq!(body.content, None);
        assert_eq!(body.author, Some(Some(AuthorWrite { name: Some(None), bio: None })));
    }

    #[test]
    fn test_read_only_author_id_is_ignored() {
        let body: AuthorWrite = serde_json::from_value(json!({"id": 9, "name": "Jane Doe"})).unwrap();
        assert_eq!(body.name, Some(Some("Jane Doe".to_string())));
    }
}
