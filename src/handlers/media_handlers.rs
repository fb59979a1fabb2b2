use actix_web::{HttpResponse, get, web};

use crate::AppState;
use crate::errors::AppError;
use crate::services::media_services::MediaStore;

#[get("/media/posts/{filename}")]
pub async fn serve_post_image(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let filename = path.into_inner();
    let bytes = state.media.read_post_image(&filename).await?;
    Ok(HttpResponse::Ok()
        .content_type(MediaStore::content_type_for(&filename))
        .body(bytes))
}
