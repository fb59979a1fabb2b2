use actix_web::{HttpRequest, HttpResponse, post, web};

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::group_dtos::{GroupForm, GroupOut};
use crate::errors::AppError;
use crate::repositories::group_repository::GroupRepository;

/// Operator routes are gated by a shared token, not user auth.
fn require_admin(req: &HttpRequest, state: &AppState) -> Result<(), AppError> {
    let Some(expected) = &state.settings.admin_token else {
        return Err(AppError::Forbidden("operator routes are disabled".into()));
    };
    let presented = req
        .headers()
        .get("X-Admin-Token")
        .and_then(|h| h.to_str().ok());
    if presented != Some(expected.as_str()) {
        return Err(AppError::Forbidden("invalid operator token".into()));
    }
    Ok(())
}

/// Explicit page-cache invalidation. This is the only way a home-page edit
/// becomes visible before the TTL runs out.
#[post("/internal/cache/clear/")]
pub async fn clear_page_cache(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &state)?;
    state.page_cache.clear();
    log::info!("page cache cleared by operator");
    Ok(HttpResponse::Ok().json(ApiResponse::ok("page cache cleared", ())))
}

/// Group creation, the piece the original leaves to its admin UI.
#[post("/internal/groups/")]
pub async fn create_group(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<GroupForm>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &state)?;
    let form = body.into_inner();
    form.validate().map_err(AppError::Validation)?;

    let group = GroupRepository::create(
        &state.pg_pool,
        form.title.trim(),
        form.slug.trim(),
        form.description.trim(),
    )
    .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok("group created", GroupOut::from(group))))
}
