//! Signing configuration shared by sessions and password reset links.

const DEFAULT_SECRET: &str = "change-me-in-production";

/// Token signing configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub issuer: String,
    pub session_ttl_hours: i64,
    /// Lifetime of a password reset link.
    pub password_reset_timeout_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            issuer: "yatube".to_string(),
            session_ttl_hours: 24 * 14,
            password_reset_timeout_secs: 60 * 60 * 24 * 3,
        }
    }
}

impl AuthConfig {
    /// Load from `SECRET_KEY`, `SESSION_TTL_HOURS` and `PASSWORD_RESET_TIMEOUT`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let secret = std::env::var("SECRET_KEY").unwrap_or_else(|_| DEFAULT_SECRET.to_string());

        // Warn if using default secret in production
        if secret == DEFAULT_SECRET {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default secret key in production! Set SECRET_KEY environment variable."
                );
            } else {
                tracing::warn!("Using default secret key. Set SECRET_KEY for production use.");
            }
        }

        Self {
            secret,
            issuer: defaults.issuer,
            session_ttl_hours: std::env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.session_ttl_hours),
            password_reset_timeout_secs: std::env::var("PASSWORD_RESET_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.password_reset_timeout_secs),
        }
    }
}
