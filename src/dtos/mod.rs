pub mod auth_dtos;
pub mod comment_dtos;
pub mod group_dtos;
pub mod post_dtos;

use serde::Serialize;

/// Response envelope used by every handler.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }
}
