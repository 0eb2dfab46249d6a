//! Data Transfer Objects - form payloads and query strings.
//!
//! Browsers submit forms as `application/x-www-form-urlencoded`; missing
//! fields deserialize to empty strings so validation can report them.

use serde::{Deserialize, Serialize};

/// `?page=N` on listing pages. Kept as a raw string: bad input falls back to page 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// `?next=/path/` carried through the login flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Create/edit post submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFormData {
    #[serde(default)]
    pub text: String,
    /// Group id; empty string means "no group".
    #[serde(default)]
    pub group: Option<String>,
}

/// Request to register a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignupFormData {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

/// Request to login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginFormData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasswordChangeFormData {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password1: String,
    #[serde(default)]
    pub new_password2: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasswordResetFormData {
    #[serde(default)]
    pub email: String,
}

/// New password chosen from a reset link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetPasswordFormData {
    #[serde(default)]
    pub new_password1: String,
    #[serde(default)]
    pub new_password2: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_form_without_group() {
        let data: PostFormData = serde_urlencoded::from_str("text=hello").unwrap();
        assert_eq!(data.text, "hello");
        assert!(data.group.is_none());
    }

    #[test]
    fn test_post_form_empty_group() {
        let data: PostFormData = serde_urlencoded::from_str("text=hi&group=").unwrap();
        assert_eq!(data.group.as_deref(), Some(""));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let data: SignupFormData = serde_urlencoded::from_str("username=leo").unwrap();
        assert_eq!(data.username, "leo");
        assert!(data.password1.is_empty());
    }
}
