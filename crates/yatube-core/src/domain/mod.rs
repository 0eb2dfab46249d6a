//! Domain entities - the core business objects.

mod group;
mod post;
mod user;

pub use group::Group;
pub use post::Post;
pub use user::{USERNAME_MAX_LENGTH, User};
