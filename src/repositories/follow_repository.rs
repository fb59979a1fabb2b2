use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::follow::Follow;

pub struct FollowRepository;

impl FollowRepository {
    /// Idempotent create; returns the new edge, or None when it already
    /// existed. The unique constraint absorbs duplicates, the check
    /// constraint is the backstop against self-follows that slip past the
    /// handler.
    pub async fn follow(
        pool: &Pool,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<Option<Follow>, AppError> {
        let client = pool.get().await?;
        let id = Uuid::new_v4();
        let row = client
            .query_opt(
                "INSERT INTO follows (id, user_id, author_id) VALUES ($1, $2, $3) \
                 ON CONFLICT (user_id, author_id) DO NOTHING \
                 RETURNING id, user_id, author_id",
                &[&id, &user_id, &author_id],
            )
            .await?;
        Ok(row.map(|r| Follow::from_row(&r)))
    }

    /// Idempotent delete; returns true if an edge was removed.
    pub async fn unfollow(pool: &Pool, user_id: Uuid, author_id: Uuid) -> Result<bool, AppError> {
        let client = pool.get().await?;
        let affected = client
            .execute(
                "DELETE FROM follows WHERE user_id = $1 AND author_id = $2",
                &[&user_id, &author_id],
            )
            .await?;
        Ok(affected > 0)
    }

    pub async fn exists(pool: &Pool, user_id: Uuid, author_id: Uuid) -> Result<bool, AppError> {
        let client = pool.get().await?;
        let row = client
            .query_opt(
                "SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2",
                &[&user_id, &author_id],
            )
            .await?;
        Ok(row.is_some())
    }

    pub async fn count_followers(pool: &Pool, author_id: Uuid) -> Result<i64, AppError> {
        let client = pool.get().await?;
        let row = client
            .query_one("SELECT COUNT(*) FROM follows WHERE author_id = $1", &[&author_id])
            .await?;
        Ok(row.get(0))
    }

    pub async fn count_following(pool: &Pool, user_id: Uuid) -> Result<i64, AppError> {
        let client = pool.get().await?;
        let row = client
            .query_one("SELECT COUNT(*) FROM follows WHERE user_id = $1", &[&user_id])
            .await?;
        Ok(row.get(0))
    }
}
