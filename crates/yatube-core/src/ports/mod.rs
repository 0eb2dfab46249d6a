//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod mail;
mod repository;

pub use auth::{AuthError, PasswordResetTokenService, PasswordService, TokenClaims, TokenService};
pub use mail::{EmailMessage, MailError, Mailer};
pub use repository::{
    BaseRepository, GroupRepository, PostFilter, PostRepository, UserRepository,
};
