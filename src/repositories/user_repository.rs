use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::errors::{AppError, FieldError};
use crate::models::user::User;
use crate::repositories::is_unique_violation;

pub struct UserRepository;

impl UserRepository {
    pub async fn create(
        pool: &Pool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let client = pool.get().await?;
        let id = Uuid::new_v4();
        let row = client
            .query_one(
                "INSERT INTO users (id, username, email, password_hash) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, username, email, password_hash, created_at",
                &[&id, &username, &email, &password_hash],
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Validation(vec![FieldError::new(
                        "username",
                        "username or email is already taken",
                    )])
                } else {
                    AppError::Db(e)
                }
            })?;
        Ok(User::from_row(&row))
    }

    pub async fn find_by_username(pool: &Pool, username: &str) -> Result<Option<User>, AppError> {
        let client = pool.get().await?;
        let row = client
            .query_opt(
                "SELECT id, username, email, password_hash, created_at \
                 FROM users WHERE username = $1",
                &[&username],
            )
            .await?;
        Ok(row.map(|r| User::from_row(&r)))
    }
}
