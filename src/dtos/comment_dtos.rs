use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::FieldError;
use crate::models::comment::Comment;

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        if self.text.trim().is_empty() {
            return Err(vec![FieldError::new(
                "text",
                "comment text must not be empty",
            )]);
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CommentOut {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: String,
    pub author_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl From<Comment> for CommentOut {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author: comment.author_username,
            author_id: comment.author_id,
            text: comment.text,
            created: comment.created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_comment_is_rejected() {
        let form = CommentForm { text: "  ".into() };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors[0].field, "text");
    }

    #[test]
    fn plain_comment_passes() {
        let form = CommentForm { text: "nice post".into() };
        assert!(form.validate().is_ok());
    }
}
