use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validators;

/// Longest username accepted at signup.
pub const USERNAME_MAX_LENGTH: usize = 150;

/// User entity - an authenticated author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            first_name: String::new(),
            last_name: String::new(),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_name(mut self, first_name: String, last_name: String) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self
    }

    /// "First Last", or the username when no name was given.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    /// Letters, digits and `@ . + - _`, like Django's username validator.
    pub fn is_valid_username(username: &str) -> bool {
        validators::is_valid_username(username, USERNAME_MAX_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_username() {
        let user = User::new("leo".into(), String::new(), "hash".into());
        assert_eq!(user.display_name(), "leo");

        let user = user.with_name("Leo".into(), "Tolstoy".into());
        assert_eq!(user.display_name(), "Leo Tolstoy");
    }

    #[test]
    fn test_username_validation() {
        assert!(User::is_valid_username("User"));
        assert!(User::is_valid_username("user.name+tag@host_1-2"));
        assert!(!User::is_valid_username(""));
        assert!(!User::is_valid_username("has space"));
        assert!(!User::is_valid_username("slash/"));
        assert!(!User::is_valid_username(&"a".repeat(151)));
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User::new("leo".into(), String::new(), "secret-hash".into());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
