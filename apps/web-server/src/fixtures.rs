//! Initial data loaded at startup from Django-style JSON fixtures.
//!
//! A fixture file is a list of records:
//!
//! ```json
//! [
//!   {
//!     "model": "posts.group",
//!     "pk": "7d1f0c7e-3b7a-4b55-9d0b-5c1f3f0f3a10",
//!     "fields": { "title": "Leo Tolstoy", "slug": "leo", "description": "..." }
//!   }
//! ]
//! ```
//!
//! Only groups are loaded; they have no other way into the site. Loading is
//! idempotent: a group whose slug already exists is left untouched.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use uuid::Uuid;

use yatube_core::DomainError;
use yatube_core::domain::Group;
use yatube_core::error::RepoError;
use yatube_core::ports::BaseRepository;

use crate::state::AppState;

const GROUP_MODEL: &str = "posts.group";

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed fixture: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid group {slug}: {source}")]
    Invalid { slug: String, source: DomainError },

    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// One record of a fixture file.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureRecord {
    pub model: String,
    #[serde(default)]
    pub pk: Option<Uuid>,
    pub fields: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GroupFields {
    title: String,
    slug: String,
    #[serde(default)]
    description: String,
}

/// Parse a fixture document.
pub fn parse(json: &str) -> Result<Vec<FixtureRecord>, FixtureError> {
    Ok(serde_json::from_str(json)?)
}

/// Save the group records that are not stored yet. Returns how many were added.
pub async fn load(state: &AppState, records: &[FixtureRecord]) -> Result<usize, FixtureError> {
    let mut loaded = 0;

    for record in records {
        if record.model != GROUP_MODEL {
            tracing::warn!(model = %record.model, "Skipping fixture record of unknown model");
            continue;
        }

        let fields: GroupFields = serde_json::from_value(record.fields.clone())?;
        if state.groups.find_by_slug(&fields.slug).await?.is_some() {
            tracing::debug!(slug = %fields.slug, "Group already present");
            continue;
        }

        let slug = fields.slug.clone();
        let mut group = Group::new(fields.title, fields.slug, fields.description)
            .map_err(|source| FixtureError::Invalid { slug, source })?;
        if let Some(pk) = record.pk {
            group.id = pk;
        }

        state.groups.save(group).await?;
        loaded += 1;
    }

    Ok(loaded)
}

/// Read and load one fixture file.
pub async fn load_file(state: &AppState, path: &Path) -> Result<usize, FixtureError> {
    let json = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    load(state, &parse(&json)?).await
}

/// Load every configured fixture, logging failures instead of aborting startup.
pub async fn load_all(state: &AppState, paths: &[PathBuf]) {
    for path in paths {
        match load_file(state, path).await {
            Ok(count) => tracing::info!(path = %path.display(), count, "Fixture loaded"),
            Err(e) => tracing::error!(path = %path.display(), error = %e, "Failed to load fixture"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use yatube_core::forms::PostForm;
    use yatube_infra::{AuthConfig, InMemoryMailer};

    use super::*;

    const FIXTURE: &str = r#"[
        {
            "model": "posts.group",
            "pk": "7d1f0c7e-3b7a-4b55-9d0b-5c1f3f0f3a10",
            "fields": {"title": "Leo Tolstoy", "slug": "leo", "description": "War and peace"}
        },
        {
            "model": "posts.group",
            "fields": {"title": "Anton Chekhov", "slug": "chekhov"}
        },
        {
            "model": "auth.user",
            "fields": {"username": "admin"}
        }
    ]"#;

    fn state() -> AppState {
        AppState::in_memory(
            AuthConfig::default(),
            Arc::new(InMemoryMailer::new()),
            "http://testserver".to_string(),
        )
    }

    #[actix_web::test]
    async fn test_seeded_groups_become_post_form_choices() {
        let state = state();

        let loaded = load(&state, &parse(FIXTURE).unwrap()).await.unwrap();
        assert_eq!(loaded, 2);

        let groups = state.groups.list_all().await.unwrap();
        let form = PostForm::unbound(&groups);
        let labels: Vec<&str> = form
            .field("group")
            .unwrap()
            .choices
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert!(labels.contains(&"Leo Tolstoy"));
        assert!(labels.contains(&"Anton Chekhov"));

        let leo = state.groups.find_by_slug("leo").await.unwrap().unwrap();
        assert_eq!(leo.id.to_string(), "7d1f0c7e-3b7a-4b55-9d0b-5c1f3f0f3a10");
        assert_eq!(leo.description, "War and peace");
    }

    #[actix_web::test]
    async fn test_loading_twice_keeps_existing_groups() {
        let state = state();
        let records = parse(FIXTURE).unwrap();

        load(&state, &records).await.unwrap();
        assert_eq!(load(&state, &records).await.unwrap(), 0);
        assert_eq!(state.groups.list_all().await.unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_invalid_slug_is_reported() {
        let state = state();
        let records = parse(
            r#"[{"model": "posts.group", "fields": {"title": "Bad", "slug": "not a slug"}}]"#,
        )
        .unwrap();

        let result = load(&state, &records).await;
        assert!(matches!(result, Err(FixtureError::Invalid { .. })));
    }

    #[actix_web::test]
    async fn test_bundled_groups_fixture() {
        let state = state();
        let records = parse(include_str!("../fixtures/groups.json")).unwrap();

        assert_eq!(load(&state, &records).await.unwrap(), 2);
        assert!(state.groups.find_by_slug("leo").await.unwrap().is_some());
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(parse("{not json"), Err(FixtureError::Parse(_))));
    }

    #[actix_web::test]
    async fn test_missing_file() {
        let result = load_file(&state(), Path::new("/nonexistent/groups.json")).await;
        assert!(matches!(result, Err(FixtureError::Io { .. })));
    }
}
