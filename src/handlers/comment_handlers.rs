use actix_web::{HttpResponse, post, web};
use uuid::Uuid;

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::comment_dtos::{CommentForm, CommentOut};
use crate::errors::AppError;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::repositories::comment_repository::CommentRepository;
use crate::repositories::post_repository::PostRepository;

#[post("/posts/{id}/comment/")]
pub async fn add_comment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<CommentForm>,
) -> Result<HttpResponse, AppError> {
    let post_id =
        Uuid::parse_str(&path).map_err(|_| AppError::NotFound("post".into()))?;
    if PostRepository::get(&state.pg_pool, post_id).await?.is_none() {
        return Err(AppError::NotFound("post".into()));
    }

    let form = body.into_inner();
    form.validate().map_err(AppError::Validation)?;

    let comment =
        CommentRepository::create(&state.pg_pool, post_id, user.user_id, form.text.trim()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok("comment added", CommentOut::from(comment))))
}
