use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::validators;

pub const TITLE_MAX_LENGTH: usize = 200;

/// Group entity - a slug-addressed category of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    /// Create a new group. The slug must be URL-safe.
    pub fn new(title: String, slug: String, description: String) -> Result<Self, DomainError> {
        if title.trim().is_empty() || title.chars().count() > TITLE_MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "Group title must be 1..={TITLE_MAX_LENGTH} characters"
            )));
        }
        if !Self::is_valid_slug(&slug) {
            return Err(DomainError::Validation(format!("Invalid slug: {slug}")));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            slug,
            description,
        })
    }

    /// ASCII letters, digits, hyphens and underscores, at most
    /// [`validators::SLUG_MAX_LENGTH`] of them.
    pub fn is_valid_slug(slug: &str) -> bool {
        validators::is_valid_slug(slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_group() {
        let group = Group::new("Test group".into(), "test-slug".into(), "About".into()).unwrap();
        assert_eq!(group.slug, "test-slug");
    }

    #[test]
    fn test_rejects_bad_slug() {
        let result = Group::new("Title".into(), "not a slug".into(), String::new());
        assert!(matches!(result, Err(DomainError::Validation(_))));

        let result = Group::new("Title".into(), "тест".into(), String::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_slug_longer_than_column() {
        let slug = "s".repeat(validators::SLUG_MAX_LENGTH + 1);
        assert!(Group::new("Title".into(), slug, String::new()).is_err());
    }

    #[test]
    fn test_rejects_blank_title() {
        assert!(Group::new("  ".into(), "slug".into(), String::new()).is_err());
    }
}
