pub mod auth_services;
pub mod media_services;
