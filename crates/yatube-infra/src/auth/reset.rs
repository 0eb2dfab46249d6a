//! Password reset links: `/reset/<uidb64>/<token>/`.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use yatube_core::domain::User;
use yatube_core::ports::{AuthError, PasswordResetTokenService};

use super::AuthConfig;

const PURPOSE: &str = "password_reset";

/// URL-safe base64 of a user id.
pub fn encode_uid(user_id: Uuid) -> String {
    URL_SAFE_NO_PAD.encode(user_id.as_bytes())
}

/// Inverse of [`encode_uid`]; `None` for anything malformed.
pub fn decode_uid(uidb64: &str) -> Option<Uuid> {
    let bytes = URL_SAFE_NO_PAD.decode(uidb64).ok()?;
    Uuid::from_slice(&bytes).ok()
}

#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    sub: String,
    purpose: String,
    exp: i64,
    iat: i64,
}

/// Reset tokens signed with the server secret plus the user's password hash.
pub struct JwtPasswordResetTokenService {
    config: AuthConfig,
}

impl JwtPasswordResetTokenService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    fn key_material(&self, user: &User) -> Vec<u8> {
        format!("{}:{}", self.config.secret, user.password_hash).into_bytes()
    }
}

impl PasswordResetTokenService for JwtPasswordResetTokenService {
    fn make_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::seconds(self.config.password_reset_timeout_secs);

        let claims = ResetClaims {
            sub: user.id.to_string(),
            purpose: PURPOSE.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.key_material(user)),
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn check_token(&self, user: &User, token: &str) -> bool {
        let key = DecodingKey::from_secret(&self.key_material(user));

        match decode::<ResetClaims>(token, &key, &Validation::default()) {
            Ok(data) => data.claims.purpose == PURPOSE && data.claims.sub == user.id.to_string(),
            Err(e) => {
                tracing::debug!(user_id = %user.id, error = %e, "Rejected password reset token");
                false
            }
        }
    }
}
