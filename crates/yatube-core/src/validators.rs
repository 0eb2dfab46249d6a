//! Character-class validators for usernames, slugs and email addresses.

use std::sync::LazyLock;

use regex::Regex;

/// Longest slug a group may carry.
pub const SLUG_MAX_LENGTH: usize = 50;

// Letters, digits and `@ . + - _`. `\w` is Unicode-aware.
static USERNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.@+-]+$").expect("USERNAME_REGEX: invalid regex pattern")
});

// ASCII letters, digits, hyphens and underscores.
static SLUG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-a-zA-Z0-9_]+$").expect("SLUG_REGEX: invalid regex pattern")
});

// Dot-atom local part: no leading, trailing or doubled dots.
static EMAIL_USER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-!#$%&'*+/=?^_`{}|~0-9A-Za-z]+(\.[-!#$%&'*+/=?^_`{}|~0-9A-Za-z]+)*$")
        .expect("EMAIL_USER_REGEX: invalid regex pattern")
});

// Dotted hostname labels without edge hyphens; the top-level label has
// at least two characters.
static EMAIL_DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9][A-Za-z0-9-]{0,61}[A-Za-z0-9]$",
    )
    .expect("EMAIL_DOMAIN_REGEX: invalid regex pattern")
});

const EMAIL_DOMAIN_ALLOWLIST: &[&str] = &["localhost"];

pub fn is_valid_username(username: &str, max_length: usize) -> bool {
    username.chars().count() <= max_length && USERNAME_REGEX.is_match(username)
}

pub fn is_valid_slug(slug: &str) -> bool {
    slug.len() <= SLUG_MAX_LENGTH && SLUG_REGEX.is_match(slug)
}

/// Email address check following Django's `EmailValidator`: the local part
/// is a dot-atom and the domain a hostname or an allowlisted name.
pub fn is_valid_email(email: &str) -> bool {
    let Some((user, domain)) = email.rsplit_once('@') else {
        return false;
    };

    EMAIL_USER_REGEX.is_match(user)
        && (EMAIL_DOMAIN_ALLOWLIST.contains(&domain) || EMAIL_DOMAIN_REGEX.is_match(domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        for email in [
            "user@example.com",
            "first.last+tag@mail.example.org",
            "o'brien@example.co",
            "root@localhost",
        ] {
            assert!(is_valid_email(email), "{email}");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "",
            "user",
            "@example.com",
            "user@",
            "a@.",
            "a@b..c",
            "a@b.c",
            "a@-b.com",
            "a@b-.com",
            ".user@example.com",
            "us..er@example.com",
            "user@exa mple.com",
            "us er@example.com",
            "a@b@example.com",
        ] {
            assert!(!is_valid_email(email), "{email}");
        }
    }

    #[test]
    fn test_slug_charset_and_length() {
        assert!(is_valid_slug("test-slug_1"));
        assert!(is_valid_slug(&"s".repeat(SLUG_MAX_LENGTH)));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("not a slug"));
        assert!(!is_valid_slug("тест"));
        assert!(!is_valid_slug(&"s".repeat(SLUG_MAX_LENGTH + 1)));
    }

    #[test]
    fn test_username_charset() {
        assert!(is_valid_username("Лев_Толстой", 150));
        assert!(is_valid_username("user.name+tag@host-1", 150));
        assert!(!is_valid_username("", 150));
        assert!(!is_valid_username("has space", 150));
        assert!(!is_valid_username("abc", 2));
    }
}
