use actix_web::{HttpResponse, get, web};
use serde::Serialize;

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::post_dtos::PostOut;
use crate::errors::{AppError, FieldError};
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::pagination::{PageQuery, Paginated, Paginator};
use crate::repositories::follow_repository::FollowRepository;
use crate::repositories::post_repository::PostRepository;
use crate::repositories::user_repository::UserRepository;

#[derive(Debug, Serialize)]
struct FollowStateOut {
    author: String,
    following: bool,
}

/// Subscribe to an author. Following someone you already follow is a no-op;
/// following yourself is rejected before the database's check constraint
/// gets a say.
#[get("/profile/{username}/follow/")]
pub async fn profile_follow(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let author = UserRepository::find_by_username(&state.pg_pool, &path)
        .await?
        .ok_or_else(|| AppError::NotFound("profile".into()))?;
    if author.id == user.user_id {
        return Err(AppError::Validation(vec![FieldError::new(
            "author",
            "you cannot follow yourself",
        )]));
    }

    let created = FollowRepository::follow(&state.pg_pool, user.user_id, author.id).await?;
    if let Some(edge) = &created {
        log::debug!(
            "follow edge {}: {} -> {}",
            edge.id,
            edge.user_id,
            edge.author_id
        );
    }
    let message = if created.is_some() { "now following" } else { "already following" };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        message,
        FollowStateOut {
            author: author.username,
            following: true,
        },
    )))
}

/// Unsubscribe. Unfollowing an author you never followed is a no-op.
#[get("/profile/{username}/unfollow/")]
pub async fn profile_unfollow(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let author = UserRepository::find_by_username(&state.pg_pool, &path)
        .await?
        .ok_or_else(|| AppError::NotFound("profile".into()))?;

    let removed = FollowRepository::unfollow(&state.pg_pool, user.user_id, author.id).await?;
    let message = if removed { "unfollowed" } else { "was not following" };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        message,
        FollowStateOut {
            author: author.username,
            following: false,
        },
    )))
}

/// Paginated feed of posts by authors the caller follows.
#[get("/follow/")]
pub async fn follow_feed(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let pager = Paginator::new(state.settings.page_size);
    let count = PostRepository::count_feed(&state.pg_pool, user.user_id).await?;
    let spec = pager.page(count, query.number());
    let posts = PostRepository::list_feed(&state.pg_pool, user.user_id, spec).await?;

    let page = Paginated::new(posts.into_iter().map(PostOut::from).collect(), spec);
    Ok(HttpResponse::Ok().json(ApiResponse::ok("feed retrieved", page)))
}
