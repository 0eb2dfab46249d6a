//! # Yatube Infrastructure
//!
//! Concrete implementations of the ports defined in `yatube-core`:
//! repositories, password hashing, session and reset tokens, mail delivery.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No database driver, in-memory repositories only
//! - `postgres` - PostgreSQL repositories via SeaORM

pub mod auth;
pub mod database;
pub mod mail;

// Re-exports - In-Memory
pub use database::{InMemoryGroupRepository, InMemoryPostRepository, InMemoryUserRepository};
pub use mail::{ConsoleMailer, InMemoryMailer};

pub use auth::{
    Argon2PasswordService, AuthConfig, JwtPasswordResetTokenService, JwtTokenService, decode_uid,
    encode_uid,
};

#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConfig, DatabaseConnections, PostgresGroupRepository, PostgresPostRepository,
    PostgresUserRepository,
};
