//! Authentication implementations.

mod config;
mod jwt;
mod password;
mod reset;

pub use config::AuthConfig;
pub use jwt::JwtTokenService;
pub use password::Argon2PasswordService;
pub use reset::{JwtPasswordResetTokenService, decode_uid, encode_uid};
