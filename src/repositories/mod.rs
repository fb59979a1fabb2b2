pub mod comment_repository;
pub mod follow_repository;
pub mod group_repository;
pub mod post_repository;
pub mod user_repository;

use tokio_postgres::error::SqlState;

pub fn is_unique_violation(e: &tokio_postgres::Error) -> bool {
    e.code() == Some(&SqlState::UNIQUE_VIOLATION)
}
