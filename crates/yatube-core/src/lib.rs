//! # Yatube Core
//!
//! The domain layer of Yatube: posts, groups and users, the ports the
//! infrastructure implements, pagination and form validation.
//! This crate has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;
pub mod validators;

pub use error::DomainError;
pub use pagination::{POSTS_PER_PAGE, Page, PageRequest, Paginator};
