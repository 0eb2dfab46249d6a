//! Authentication ports: password hashing, sessions and reset links.

use uuid::Uuid;

use crate::domain::User;

/// Claims carried by a session token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
    /// Fingerprint of the password hash the session was issued against.
    pub session_hash: String,
    pub exp: i64,
}

/// Session token service: the signed value stored in the session cookie.
///
/// A session is bound to the user's password: once the password changes,
/// [`TokenService::session_hash`] no longer matches the one in older tokens.
pub trait TokenService: Send + Sync {
    /// Generate a session token for a user.
    fn generate_token(&self, user: &User) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Keyed fingerprint of the user's current password hash.
    fn session_hash(&self, user: &User) -> Result<String, AuthError>;

    /// Session lifetime, used as the cookie max-age.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// One-time password reset tokens.
///
/// A token is bound to the user's current password hash, so it stops
/// verifying as soon as the password changes.
pub trait PasswordResetTokenService: Send + Sync {
    fn make_token(&self, user: &User) -> Result<String, AuthError>;

    fn check_token(&self, user: &User, token: &str) -> bool;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Not logged in")]
    MissingSession,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
