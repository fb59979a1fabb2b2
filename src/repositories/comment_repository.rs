use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::comment::Comment;

const COMMENT_SELECT: &str = "SELECT c.id, c.post_id, c.author_id, \
        u.username AS author_username, c.text, c.created \
     FROM comments c \
     JOIN users u ON u.id = c.author_id";

pub struct CommentRepository;

impl CommentRepository {
    pub async fn create(
        pool: &Pool,
        post_id: Uuid,
        author_id: Uuid,
        text: &str,
    ) -> Result<Comment, AppError> {
        let client = pool.get().await?;
        let id = Uuid::new_v4();
        client
            .execute(
                "INSERT INTO comments (id, post_id, author_id, text) VALUES ($1, $2, $3, $4)",
                &[&id, &post_id, &author_id, &text],
            )
            .await?;
        let sql = format!("{} WHERE c.id = $1", COMMENT_SELECT);
        let row = client.query_one(sql.as_str(), &[&id]).await?;
        Ok(Comment::from_row(&row))
    }

    /// Comments for a post, oldest first.
    pub async fn list_for_post(pool: &Pool, post_id: Uuid) -> Result<Vec<Comment>, AppError> {
        let client = pool.get().await?;
        let sql = format!("{} WHERE c.post_id = $1 ORDER BY c.created ASC", COMMENT_SELECT);
        let rows = client.query(sql.as_str(), &[&post_id]).await?;
        Ok(rows.iter().map(Comment::from_row).collect())
    }
}
