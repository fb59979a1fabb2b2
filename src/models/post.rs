use chrono::{DateTime, Utc};
use tokio_postgres::Row;
use uuid::Uuid;

/// A post as the listing queries return it: the `posts` row joined with its
/// author's username and, when affiliated, its group's slug and title.
/// `pub_date` is set once at insert and never updated.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
    pub group_id: Option<Uuid>,
    pub group_slug: Option<String>,
    pub group_title: Option<String>,
    pub image: Option<String>,
}

impl Post {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            text: row.get("text"),
            pub_date: row.get("pub_date"),
            author_id: row.get("author_id"),
            author_username: row.get("author_username"),
            group_id: row.get("group_id"),
            group_slug: row.get("group_slug"),
            group_title: row.get("group_title"),
            image: row.get("image"),
        }
    }
}
