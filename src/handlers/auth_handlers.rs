use actix_web::{HttpResponse, post, web};

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::auth_dtos::{LoginIn, SessionOut, SignupIn};
use crate::errors::AppError;
use crate::services::auth_services::AuthService;
use crate::repositories::user_repository::UserRepository;

#[post("/signup/")]
pub async fn signup(
    state: web::Data<AppState>,
    auth: web::Data<AuthService>,
    body: web::Json<SignupIn>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner();
    input.validate().map_err(AppError::Validation)?;

    let password_hash = auth
        .hash_password(&input.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let user = UserRepository::create(
        &state.pg_pool,
        input.username.trim(),
        input.email.trim(),
        &password_hash,
    )
    .await?;
    log::info!("user {} signed up ({})", user.username, user.email);

    let token = auth
        .issue_token(&user)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(
        "account created",
        SessionOut {
            token,
            user: user.public(),
        },
    )))
}

#[post("/login/")]
pub async fn login(
    state: web::Data<AppState>,
    auth: web::Data<AuthService>,
    body: web::Json<LoginIn>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner();
    // A missing user and a bad password are indistinguishable on purpose.
    let user = UserRepository::find_by_username(&state.pg_pool, input.username.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;
    auth.verify_password(&input.password, &user.password_hash)
        .map_err(|_| AppError::Unauthorized)?;

    let token = auth
        .issue_token(&user)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "logged in",
        SessionOut {
            token,
            user: user.public(),
        },
    )))
}
