//! Session cookie authentication and extractors.

use std::future::Future;
use std::pin::Pin;

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use serde::Serialize;
use uuid::Uuid;

use yatube_core::domain::User;
use yatube_core::ports::BaseRepository;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Name of the cookie holding the signed session token.
pub const SESSION_COOKIE: &str = "sessionid";

/// Logged-in user.
///
/// Use this in handlers to require authentication; anonymous requests are
/// redirected to the login page:
/// ```ignore
/// async fn post_create(identity: Identity) -> AppResult<HttpResponse> {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
        }
    }
}

/// Resolve the session cookie to a stored user.
///
/// A session is anonymous when the token does not verify, the user no longer
/// exists, or the password changed after the token was issued.
async fn authenticate(req: HttpRequest) -> AppResult<Option<Identity>> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        return Err(AppError::Internal("AppState not found in app data".into()));
    };
    let Some(cookie) = req.cookie(SESSION_COOKIE) else {
        return Ok(None);
    };

    let claims = match state.tokens.validate_token(cookie.value()) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(reason = %e, "Rejected session token");
            return Ok(None);
        }
    };

    let Some(user) = state.users.find_by_id(claims.user_id).await? else {
        tracing::debug!(user_id = %claims.user_id, "Session user no longer exists");
        return Ok(None);
    };

    if state.tokens.session_hash(&user)? != claims.session_hash {
        tracing::debug!(user_id = %user.id, "Session predates a password change");
        return Ok(None);
    }

    Ok(Some(user.into()))
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            match authenticate(req.clone()).await? {
                Some(identity) => Ok(identity),
                None => {
                    tracing::debug!(path = %req.path(), "Login required");
                    let next = req
                        .uri()
                        .path_and_query()
                        .map(|pq| pq.as_str())
                        .unwrap_or_else(|| req.path());
                    Err(AppError::LoginRequired {
                        next: next.to_string(),
                    })
                }
            }
        })
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

impl FromRequest for OptionalIdentity {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { authenticate(req).await.map(OptionalIdentity) })
    }
}

/// Issue a session cookie for `user`.
pub fn login(state: &AppState, user: &User) -> AppResult<Cookie<'static>> {
    let token = state.tokens.generate_token(user)?;
    tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

    Ok(Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(state.tokens.expiration_seconds()))
        .finish())
}

/// A cookie that clears the session.
pub fn logout() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// `next` target after login: local absolute paths that fit in a header.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.map(str::trim).filter(|n| {
        n.starts_with('/')
            && !n.starts_with("//")
            && !n.starts_with("/\\")
            && !n.chars().any(char::is_control)
    })
}
