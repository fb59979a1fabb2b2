use actix_web::{HttpResponse, http::StatusCode};
use serde::Serialize;
use thiserror::Error;

/// A single form-level validation failure, reported back to the client
/// alongside the field it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    Forbidden(String),
    #[error("invalid credentials")]
    Unauthorized,
    #[error("pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
    #[error("database error: {0}")]
    Db(#[from] tokio_postgres::Error),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Pool(_) | AppError::Db(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("internal error: {}", self);
        }
        let errors = match self {
            AppError::Validation(errs) => Some(errs.as_slice()),
            _ => None,
        };
        // Storage faults keep their detail in the log, not the response.
        let message = match self {
            AppError::Pool(_) | AppError::Db(_) | AppError::Internal(_) => {
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody {
            status: "error",
            message,
            errors,
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(format!("serialization error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::body::MessageBody;

    fn body_string(resp: HttpResponse) -> String {
        let bytes = resp.into_body().try_into_bytes().unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = AppError::NotFound("post".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(body_string(err.error_response()).contains("post not found"));
    }

    #[test]
    fn validation_maps_to_400_with_field_errors() {
        let err = AppError::Validation(vec![FieldError::new("text", "required")]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let body = body_string(err.error_response());
        assert!(body.contains("\"field\":\"text\""));
        assert!(body.contains("\"message\":\"required\""));
    }

    #[test]
    fn forbidden_maps_to_403() {
        let err = AppError::Forbidden("only the author may edit a post".into());
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_detail_is_not_leaked() {
        let err = AppError::Internal("secret detail".into());
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(resp);
        assert!(!body.contains("secret detail"));
        assert!(body.contains("internal server error"));
    }
}
