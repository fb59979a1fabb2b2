use serde::Serialize;
use tokio_postgres::Row;
use uuid::Uuid;

/// A named category posts can belong to. Groups are referenced by posts,
/// never owned by them: deleting a group clears the affiliation.
#[derive(Debug, Clone, Serialize)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl Group {
    pub fn from_row(row: &Row) -> Self {
        Self {
            id: row.get("id"),
            title: row.get("title"),
            slug: row.get("slug"),
            description: row.get("description"),
        }
    }
}
