use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::post::Post;
use crate::pagination::PageSpec;

/// Shared join for every post read: the row plus its author's username and
/// the group's slug/title when affiliated. Ordering is always newest-first.
const POST_SELECT: &str = "SELECT p.id, p.text, p.pub_date, p.author_id, \
        u.username AS author_username, \
        p.group_id, g.slug AS group_slug, g.title AS group_title, p.image \
     FROM posts p \
     JOIN users u ON u.id = p.author_id \
     LEFT JOIN groups g ON g.id = p.group_id";

pub struct PostRepository;

impl PostRepository {
    pub async fn count_all(pool: &Pool) -> Result<i64, AppError> {
        let client = pool.get().await?;
        let row = client.query_one("SELECT COUNT(*) FROM posts", &[]).await?;
        Ok(row.get(0))
    }

    pub async fn list_page(pool: &Pool, spec: PageSpec) -> Result<Vec<Post>, AppError> {
        let client = pool.get().await?;
        let sql = format!("{} ORDER BY p.pub_date DESC LIMIT $1 OFFSET $2", POST_SELECT);
        let rows = client.query(sql.as_str(), &[&spec.limit, &spec.offset]).await?;
        Ok(rows.iter().map(Post::from_row).collect())
    }

    pub async fn count_by_group(pool: &Pool, group_id: Uuid) -> Result<i64, AppError> {
        let client = pool.get().await?;
        let row = client
            .query_one("SELECT COUNT(*) FROM posts WHERE group_id = $1", &[&group_id])
            .await?;
        Ok(row.get(0))
    }

    pub async fn list_by_group(
        pool: &Pool,
        group_id: Uuid,
        spec: PageSpec,
    ) -> Result<Vec<Post>, AppError> {
        let client = pool.get().await?;
        let sql = format!(
            "{} WHERE p.group_id = $1 ORDER BY p.pub_date DESC LIMIT $2 OFFSET $3",
            POST_SELECT
        );
        let rows = client
            .query(sql.as_str(), &[&group_id, &spec.limit, &spec.offset])
            .await?;
        Ok(rows.iter().map(Post::from_row).collect())
    }

    pub async fn count_by_author(pool: &Pool, author_id: Uuid) -> Result<i64, AppError> {
        let client = pool.get().await?;
        let row = client
            .query_one("SELECT COUNT(*) FROM posts WHERE author_id = $1", &[&author_id])
            .await?;
        Ok(row.get(0))
    }

    pub async fn list_by_author(
        pool: &Pool,
        author_id: Uuid,
        spec: PageSpec,
    ) -> Result<Vec<Post>, AppError> {
        let client = pool.get().await?;
        let sql = format!(
            "{} WHERE p.author_id = $1 ORDER BY p.pub_date DESC LIMIT $2 OFFSET $3",
            POST_SELECT
        );
        let rows = client
            .query(sql.as_str(), &[&author_id, &spec.limit, &spec.offset])
            .await?;
        Ok(rows.iter().map(Post::from_row).collect())
    }

    /// Posts authored by anyone the given user follows.
    pub async fn count_feed(pool: &Pool, user_id: Uuid) -> Result<i64, AppError> {
        let client = pool.get().await?;
        let row = client
            .query_one(
                "SELECT COUNT(*) FROM posts p \
                 JOIN follows f ON f.author_id = p.author_id \
                 WHERE f.user_id = $1",
                &[&user_id],
            )
            .await?;
        Ok(row.get(0))
    }

    pub async fn list_feed(
        pool: &Pool,
        user_id: Uuid,
        spec: PageSpec,
    ) -> Result<Vec<Post>, AppError> {
        let client = pool.get().await?;
        let sql = format!(
            "{} JOIN follows f ON f.author_id = p.author_id \
             WHERE f.user_id = $1 ORDER BY p.pub_date DESC LIMIT $2 OFFSET $3",
            POST_SELECT
        );
        let rows = client
            .query(sql.as_str(), &[&user_id, &spec.limit, &spec.offset])
            .await?;
        Ok(rows.iter().map(Post::from_row).collect())
    }

    pub async fn get(pool: &Pool, id: Uuid) -> Result<Option<Post>, AppError> {
        let client = pool.get().await?;
        let sql = format!("{} WHERE p.id = $1", POST_SELECT);
        let row = client.query_opt(sql.as_str(), &[&id]).await?;
        Ok(row.map(|r| Post::from_row(&r)))
    }

    pub async fn create(
        pool: &Pool,
        id: Uuid,
        author_id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        image: Option<&str>,
    ) -> Result<(), AppError> {
        let client = pool.get().await?;
        client
            .execute(
                "INSERT INTO posts (id, text, author_id, group_id, image) \
                 VALUES ($1, $2, $3, $4, $5)",
                &[&id, &text, &author_id, &group_id, &image],
            )
            .await?;
        Ok(())
    }

    /// Updates the submitted fields only. `pub_date` is immutable; the image
    /// is kept when no new one was uploaded.
    pub async fn update(
        pool: &Pool,
        id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        image: Option<&str>,
    ) -> Result<(), AppError> {
        let client = pool.get().await?;
        client
            .execute(
                "UPDATE posts SET text = $2, group_id = $3, image = COALESCE($4, image) \
                 WHERE id = $1",
                &[&id, &text, &group_id, &image],
            )
            .await?;
        Ok(())
    }
}
