use tokio_postgres::Row;
use uuid::Uuid;

/// A directed subscription edge: `user` follows `author`. The schema
/// enforces uniqueness per (user, author) pair and forbids user == author.
#[derive(Debug, Clone)]
pub struct Follow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_id: Uuid,
}

impl Follow {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            user_id: row.get("user_id"),
            author_id: row.get("author_id"),
        }
    }
}
