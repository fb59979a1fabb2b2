use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::errors::{AppError, FieldError};
use crate::models::group::Group;
use crate::repositories::is_unique_violation;

pub struct GroupRepository;

impl GroupRepository {
    pub async fn create(
        pool: &Pool,
        title: &str,
        slug: &str,
        description: &str,
    ) -> Result<Group, AppError> {
        let client = pool.get().await?;
        let id = Uuid::new_v4();
        let row = client
            .query_one(
                "INSERT INTO groups (id, title, slug, description) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, title, slug, description",
                &[&id, &title, &slug, &description],
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Validation(vec![FieldError::new("slug", "slug is already taken")])
                } else {
                    AppError::Db(e)
                }
            })?;
        Ok(Group::from_row(&row))
    }

    pub async fn find_by_slug(pool: &Pool, slug: &str) -> Result<Option<Group>, AppError> {
        let client = pool.get().await?;
        let row = client
            .query_opt(
                "SELECT id, title, slug, description FROM groups WHERE slug = $1",
                &[&slug],
            )
            .await?;
        Ok(row.map(|r| Group::from_row(&r)))
    }

    pub async fn exists(pool: &Pool, id: Uuid) -> Result<bool, AppError> {
        let client = pool.get().await?;
        let row = client
            .query_opt("SELECT 1 FROM groups WHERE id = $1", &[&id])
            .await?;
        Ok(row.is_some())
    }
}
