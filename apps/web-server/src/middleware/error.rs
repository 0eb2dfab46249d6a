//! Error handling - every failure becomes an HTML page or a redirect.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use yatube_core::error::{DomainError, RepoError};
use yatube_core::ports::{AuthError, MailError};

use crate::render::{error_page, redirect};

/// Application-level error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Anonymous access to a page that needs a login.
    #[error("Login required for {next}")]
    LoginRequired { next: String },

    #[error("Forbidden")]
    Forbidden,

    #[error("Failed to render {template}: {source}")]
    Template {
        template: &'static str,
        source: tera::Error,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

/// Login page URL that returns to `next` afterwards.
pub fn login_url(next: &str) -> String {
    match serde_urlencoded::to_string([("next", next)]) {
        Ok(query) => format!("/login/?{query}"),
        Err(_) => "/login/".to_string(),
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::LoginRequired { .. } => StatusCode::FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Template { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound(what) => {
                tracing::debug!(%what, "Not found");
                error_page(StatusCode::NOT_FOUND, "core/404.html")
            }
            AppError::LoginRequired { next } => redirect(login_url(next)),
            AppError::Forbidden => error_page(StatusCode::FORBIDDEN, "core/403.html"),
            AppError::Template { .. } | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                error_page(StatusCode::INTERNAL_SERVER_ERROR, "core/500.html")
            }
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{entity_type} {key}"))
            }
            DomainError::PermissionDenied => AppError::Forbidden,
            // Forms validate input before it reaches the domain.
            e @ (DomainError::Validation(_)
            | DomainError::Duplicate(_)
            | DomainError::Internal(_)) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Constraint(msg) => AppError::Internal(msg),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
