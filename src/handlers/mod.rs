pub mod auth_handlers;
pub mod comment_handlers;
pub mod follow_handlers;
pub mod internal_handlers;
pub mod media_handlers;
pub mod post_handlers;
