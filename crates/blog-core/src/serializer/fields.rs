//! Checks shared by every declared char field.

use crate::error::ValidationErrors;

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const BLANK: &str = "This field may not be blank.";
pub(crate) const NULL: &str = "This field may not be null.";

pub(crate) fn max_length_message(max_len: usize) -> String {
    format!("Ensure this field has no more than {max_len} characters.")
}

/// Declared constraints of a char field.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CharField {
    pub path: &'static str,
    pub max_len: Option<usize>,
    pub required: bool,
}

impl CharField {
    pub const fn new(path: &'static str) -> Self {
        Self {
            path,
            max_len: None,
            required: true,
        }
    }

    pub const fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Partial updates declare every field as not required.
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Trim and check a submitted value. The outer `Option` is presence,
    /// the inner one an explicit `null`.
    ///
    /// Returns the cleaned value, or `None` when it was absent or rejected;
    /// rejections are recorded in `errors`.
    pub fn clean(
        &self,
        value: Option<Option<&str>>,
        errors: &mut ValidationErrors,
    ) -> Option<String> {
        let raw = match value {
            Some(Some(raw)) => raw,
            Some(None) => {
                errors.add(self.path, NULL);
                return None;
            }
            None => {
                if self.required {
                    errors.add(self.path, REQUIRED);
                }
                return None;
            }
        };

        let value = raw.trim();
        if value.is_empty() {
            errors.add(self.path, BLANK);
            return None;
        }

        if let Some(max_len) = self.max_len {
            if value.chars().count() > max_len {
                errors.add(self.path, max_length_message(max_len));
                return None;
            }
        }

        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_field() {
        let mut errors = ValidationErrors::new();
        assert_eq!(CharField::new("name").clean(None, &mut errors), None);
        assert_eq!(errors.get("name"), [REQUIRED]);
    }

    #[test]
    fn test_missing_optional_field_is_silent() {
        let mut errors = ValidationErrors::new();
        let field = CharField::new("name").required(false);
        assert_eq!(field.clean(None, &mut errors), None);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_null_is_rejected_even_when_optional() {
        let mut errors = ValidationErrors::new();
        let field = CharField::new("title").required(false);
        assert_eq!(field.clean(Some(None), &mut errors), None);
        assert_eq!(errors.get("title"), [NULL]);
    }

    #[test]
    fn test_whitespace_is_blank() {
        let mut errors = ValidationErrors::new();
        assert_eq!(CharField::new("name").clean(Some(Some("   ")), &mut errors), None);
        assert_eq!(errors.get("name"), [BLANK]);
    }

    #[test]
    fn test_max_length_counts_characters() {
        let mut errors = ValidationErrors::new();
        let field = CharField::new("name").max_len(3);
        assert_eq!(field.clean(Some(Some("żół")), &mut errors), Some("żół".to_string()));
        assert_eq!(field.clean(Some(Some("żółw")), &mut errors), None);
        assert_eq!(errors.get("name"), [max_length_message(3)]);
    }

    #[test]
    fn test_value_is_trimmed() {
        let mut errors = ValidationErrors::new();
        let cleaned = CharField::new("name").clean(Some(Some("  Jane Doe ")), &mut errors);
        assert_eq!(cleaned.as_deref(), Some("Jane Doe"));
    }
}
