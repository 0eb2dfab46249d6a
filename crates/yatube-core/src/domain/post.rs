use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a short text written by a user, optionally in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post.
    pub fn new(author_id: Uuid, text: String, group_id: Option<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            group_id,
            text,
            pub_date: now,
            updated_at: now,
        }
    }

    /// Change text and group. The author is fixed at creation.
    pub fn edit(&mut self, text: String, group_id: Option<Uuid>) {
        self.text = text;
        self.group_id = group_id;
        self.updated_at = Utc::now();
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_keeps_author_and_date() {
        let author = Uuid::new_v4();
        let mut post = Post::new(author, "first".into(), None);
        let pub_date = post.pub_date;
        let group = Uuid::new_v4();

        post.edit("second".into(), Some(group));

        assert_eq!(post.text, "second");
        assert_eq!(post.group_id, Some(group));
        assert_eq!(post.author_id, author);
        assert_eq!(post.pub_date, pub_date);
        assert!(post.is_authored_by(author));
        assert!(!post.is_authored_by(Uuid::new_v4()));
    }
}
