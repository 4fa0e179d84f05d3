use blog_shared::dto::{AuthorRepresentation, AuthorWrite};

use crate::domain::{AUTHOR_NAME_MAX_LEN, Author, NewAuthor};
use crate::error::{DomainError, ValidationErrors};
use crate::ports::AuthorRepository;

use super::fields::CharField;

/// Validated change set for an existing author. Only the name is writable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorChanges {
    pub name: Option<String>,
}

impl AuthorChanges {
    /// Apply onto the current record, keeping the stored name when absent.
    pub fn apply(self, mut author: Author) -> Author {
        if let Some(name) = self.name {
            author.name = name;
        }
        author
    }
}

/// Transfer model for authors: `{id, name}` on the wire.
pub struct AuthorSerializer<'a> {
    authors: &'a dyn AuthorRepository,
}

impl<'a> AuthorSerializer<'a> {
    pub fn new(authors: &'a dyn AuthorRepository) -> Self {
        Self { authors }
    }

    pub fn to_representation(author: &Author) -> AuthorRepresentation {
        AuthorRepresentation {
            id: author.id,
            name: author.name.clone(),
        }
    }

    /// Validate an author payload for insertion. `name_path` is the error
    /// key for the name, `author.name` when the author is nested.
    pub(crate) fn clean_new(
        payload: &AuthorWrite,
        name_path: &'static str,
        errors: &mut ValidationErrors,
    ) -> Option<NewAuthor> {
        let name = Self::name_field(name_path).clean(Self::submitted_name(payload), errors)?;
        Some(NewAuthor::new(name, payload.bio.clone()))
    }

    /// Validate an author payload as a partial change set.
    pub(crate) fn clean_changes(
        payload: &AuthorWrite,
        name_path: &'static str,
        errors: &mut ValidationErrors,
    ) -> AuthorChanges {
        let name = Self::name_field(name_path)
            .required(false)
            .clean(Self::submitted_name(payload), errors);
        AuthorChanges { name }
    }

    fn submitted_name(payload: &AuthorWrite) -> Option<Option<&str>> {
        payload.name.as_ref().map(Option::as_deref)
    }

    fn name_field(path: &'static str) -> CharField {
        CharField::new(path).max_len(AUTHOR_NAME_MAX_LEN)
    }

    /// Validate a standalone author payload.
    pub fn validate_create(payload: &AuthorWrite) -> Result<NewAuthor, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let author = Self::clean_new(payload, "name", &mut errors);
        match author {
            Some(author) if errors.is_empty() => Ok(author),
            _ => Err(errors),
        }
    }

    /// Insert a validated author directly into the store.
    pub async fn create(&self, author: NewAuthor) -> Result<Author, DomainError> {
        let author = self.authors.insert(author).await?;
        tracing::info!(author_id = author.id, "Author created");
        Ok(author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_representation_hides_bio() {
        let author = NewAuthor::new("Jane Doe", Some("Writes things".to_string())).into_author(7);
        let repr = AuthorSerializer::to_representation(&author);
        assert_eq!(
            repr,
            AuthorRepresentation {
                id: 7,
                name: "Jane Doe".to_string()
            }
        );
    }

    #[test]
    fn test_validate_create_requires_name() {
        let errors = AuthorSerializer::validate_create(&AuthorWrite::default()).unwrap_err();
        assert_eq!(errors.get("name"), ["This field is required."]);
    }

    #[test]
    fn test_validate_create_rejects_long_name() {
        let payload = AuthorWrite {
            name: Some(Some("x".repeat(AUTHOR_NAME_MAX_LEN + 1))),
            bio: None,
        };
        let errors = AuthorSerializer::validate_create(&payload).unwrap_err();
        assert_eq!(
            errors.get("name"),
            ["Ensure this field has no more than 100 characters."]
        );
    }

    #[test]
    fn test_validate_create_rejects_null_name() {
        let payload = AuthorWrite {
            name: Some(None),
            bio: None,
        };
        let errors = AuthorSerializer::validate_create(&payload).unwrap_err();
        assert_eq!(errors.get("name"), ["This field may not be null."]);
    }

    #[test]
    fn test_changes_keep_current_name_when_absent() {
        let author = NewAuthor::new("Jane Doe", None).into_author(1);
        let updated = AuthorChanges::default().apply(author.clone());
        assert_eq!(updated, author);
    }
}
