//! SeaORM entities and their conversions to domain types.

pub mod group;
pub mod post;
pub mod user;
