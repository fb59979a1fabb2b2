use chrono::{DateTime, Utc};
use tokio_postgres::Row;
use uuid::Uuid;

/// A reply attached to a post, joined with its author's username.
/// Comments cascade-delete with their post.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl Comment {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            post_id: row.get("post_id"),
            author_id: row.get("author_id"),
            author_username: row.get("author_username"),
            text: row.get("text"),
            created: row.get("created"),
        }
    }
}
