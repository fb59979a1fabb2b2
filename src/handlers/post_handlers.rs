use actix_web::{HttpRequest, HttpResponse, get, post, web};
use uuid::Uuid;

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::group_dtos::{GroupOut, GroupPageOut, ProfileOut};
use crate::dtos::post_dtos::{PostDetailOut, PostForm, PostOut};
use crate::errors::{AppError, FieldError};
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::post::Post;
use crate::pagination::{PageQuery, PageSpec, Paginated, Paginator};
use crate::repositories::comment_repository::CommentRepository;
use crate::repositories::follow_repository::FollowRepository;
use crate::repositories::group_repository::GroupRepository;
use crate::repositories::post_repository::PostRepository;
use crate::repositories::user_repository::UserRepository;

fn json_body(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(mime::APPLICATION_JSON)
        .body(body)
}

fn to_page(posts: Vec<Post>, spec: PageSpec) -> Paginated<PostOut> {
    Paginated::new(posts.into_iter().map(PostOut::from).collect(), spec)
}

/// Home listing. The whole rendered response is cached per path+query for
/// the configured TTL; edits stay invisible here until expiry or an
/// explicit operator clear.
#[get("/")]
pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let cache_key = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    if let Some(body) = state.page_cache.get(&cache_key) {
        return Ok(json_body(body));
    }

    let pager = Paginator::new(state.settings.page_size);
    let count = PostRepository::count_all(&state.pg_pool).await?;
    let spec = pager.page(count, query.number());
    let posts = PostRepository::list_page(&state.pg_pool, spec).await?;

    let envelope = ApiResponse::ok("posts retrieved", to_page(posts, spec));
    let body = serde_json::to_string(&envelope)?;
    state.page_cache.put(cache_key, body.clone());
    Ok(json_body(body))
}

#[get("/group/{slug}/")]
pub async fn group_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let slug = path.into_inner();
    let group = GroupRepository::find_by_slug(&state.pg_pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("group".into()))?;

    let pager = Paginator::new(state.settings.page_size);
    let count = PostRepository::count_by_group(&state.pg_pool, group.id).await?;
    let spec = pager.page(count, query.number());
    let posts = PostRepository::list_by_group(&state.pg_pool, group.id, spec).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "group posts retrieved",
        GroupPageOut {
            group: GroupOut::from(group),
            posts: to_page(posts, spec),
        },
    )))
}

#[get("/profile/{username}/")]
pub async fn profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
    viewer: Option<AuthenticatedUser>,
) -> Result<HttpResponse, AppError> {
    let username = path.into_inner();
    let user = UserRepository::find_by_username(&state.pg_pool, &username)
        .await?
        .ok_or_else(|| AppError::NotFound("profile".into()))?;

    let pager = Paginator::new(state.settings.page_size);
    let count = PostRepository::count_by_author(&state.pg_pool, user.id).await?;
    let spec = pager.page(count, query.number());
    let posts = PostRepository::list_by_author(&state.pg_pool, user.id, spec).await?;

    let followers_count = FollowRepository::count_followers(&state.pg_pool, user.id).await?;
    let following_count = FollowRepository::count_following(&state.pg_pool, user.id).await?;
    let following = match viewer {
        Some(v) => Some(FollowRepository::exists(&state.pg_pool, v.user_id, user.id).await?),
        None => None,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "profile retrieved",
        ProfileOut {
            user: user.public(),
            joined: user.created_at,
            posts: to_page(posts, spec),
            followers_count,
            following_count,
            following,
        },
    )))
}

#[get("/posts/{id}/")]
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_post_id(&path)?;
    let post = PostRepository::get(&state.pg_pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("post".into()))?;
    let comments = CommentRepository::list_for_post(&state.pg_pool, id).await?;

    let comments: Vec<_> = comments.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "post retrieved",
        PostDetailOut {
            post: PostOut::from(post),
            comments_count: comments.len(),
            comments,
        },
    )))
}

#[post("/create/")]
pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<PostForm>,
) -> Result<HttpResponse, AppError> {
    let form = body.into_inner();
    form.validate().map_err(AppError::Validation)?;
    check_group(&state, form.group_id).await?;

    let post_id = Uuid::new_v4();
    let image_path = store_image(&state, post_id, &form).await?;
    let inserted = PostRepository::create(
        &state.pg_pool,
        post_id,
        user.user_id,
        form.text.trim(),
        form.group_id,
        image_path.as_deref(),
    )
    .await;
    if let Err(e) = inserted {
        // Do not leave the image orphaned on disk when the row never made it.
        if let Some(path) = &image_path {
            if let Err(cleanup) = state.media.remove_post_image(path).await {
                log::warn!("image cleanup after failed insert: {}", cleanup);
            }
        }
        return Err(e);
    }

    let post = PostRepository::get(&state.pg_pool, post_id)
        .await?
        .ok_or_else(|| AppError::Internal("created post vanished".into()))?;
    log::info!("post {} created by {}", post_id, user.username);
    Ok(HttpResponse::Created().json(ApiResponse::ok("post created", PostOut::from(post))))
}

/// Author-only edit. Identifier and publication date survive the update.
#[post("/posts/{id}/edit/")]
pub async fn edit_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<PostForm>,
) -> Result<HttpResponse, AppError> {
    let id = parse_post_id(&path)?;
    let existing = PostRepository::get(&state.pg_pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("post".into()))?;
    if existing.author_id != user.user_id {
        return Err(AppError::Forbidden("only the author may edit a post".into()));
    }

    let form = body.into_inner();
    form.validate().map_err(AppError::Validation)?;
    check_group(&state, form.group_id).await?;

    let image_path = store_image(&state, id, &form).await?;
    PostRepository::update(
        &state.pg_pool,
        id,
        form.text.trim(),
        form.group_id,
        image_path.as_deref(),
    )
    .await?;

    let post = PostRepository::get(&state.pg_pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("post".into()))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("post updated", PostOut::from(post))))
}

fn parse_post_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("post".into()))
}

async fn check_group(state: &AppState, group_id: Option<Uuid>) -> Result<(), AppError> {
    if let Some(gid) = group_id {
        if !GroupRepository::exists(&state.pg_pool, gid).await? {
            return Err(AppError::Validation(vec![FieldError::new(
                "group_id",
                "group does not exist",
            )]));
        }
    }
    Ok(())
}

async fn store_image(
    state: &AppState,
    post_id: Uuid,
    form: &PostForm,
) -> Result<Option<String>, AppError> {
    let Some(image) = &form.image else {
        return Ok(None);
    };
    // validate() already vetted the content type and encoding.
    let ext = image
        .extension()
        .ok_or_else(|| AppError::Internal("image extension missing after validation".into()))?;
    let bytes = image.decode().map_err(|e| AppError::Validation(vec![e]))?;
    let path = state.media.save_post_image(post_id, ext, &bytes).await?;
    Ok(Some(path))
}
