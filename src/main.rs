mod cache;
mod config;
mod dtos;
mod errors;
mod handlers;
mod middleware;
mod models;
mod pagination;
mod repositories;
mod services;

use std::env;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use deadpool_postgres::Pool;
use log::{error, info};

use crate::cache::PageCache;
use crate::config::Settings;
use crate::handlers::auth_handlers::{login, signup};
use crate::handlers::comment_handlers::add_comment;
use crate::handlers::follow_handlers::{follow_feed, profile_follow, profile_unfollow};
use crate::handlers::internal_handlers::{clear_page_cache, create_group};
use crate::handlers::media_handlers::serve_post_image;
use crate::handlers::post_handlers::{
    create_post, edit_post, group_posts, index, post_detail, profile,
};
use crate::services::auth_services::AuthService;
use crate::services::media_services::MediaStore;

pub struct AppState {
    pub pg_pool: Pool,
    pub page_cache: PageCache,
    pub media: MediaStore,
    pub settings: Settings,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    dotenv::dotenv().ok();

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("failed to load settings: {}", e);
            std::process::exit(1);
        }
    };

    let pg_pool = match config::get_pg_pool() {
        Ok(p) => p,
        Err(e) => {
            error!("failed to create PG pool: {}", e);
            std::process::exit(1);
        }
    };

    let auth_service = match AuthService::new_from_env(settings.token_ttl_secs) {
        Ok(a) => a,
        Err(e) => {
            error!("failed to init auth: {}", e);
            std::process::exit(1);
        }
    };
    let auth_data = web::Data::new(auth_service);

    let state = web::Data::new(AppState {
        pg_pool,
        page_cache: PageCache::new(settings.cache_ttl),
        media: MediaStore::new(settings.media_root.clone()),
        settings,
    });

    let allowed_origins = env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".into());

    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_address = format!("0.0.0.0:{}", port);

    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                "authorization",
                "content-type",
                "accept",
                "x-admin-token",
            ])
            .supports_credentials()
            .max_age(3600);

        for origin in allowed_origins.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()) {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(auth_data.clone())
            .service(
                web::scope("/auth")
                    .service(signup) // POST /auth/signup/
                    .service(login), // POST /auth/login/
            )
            .service(index) // GET /
            .service(group_posts) // GET /group/{slug}/
            .service(create_post) // POST /create/
            .service(follow_feed) // GET /follow/
            .service(profile_follow) // GET /profile/{username}/follow/
            .service(profile_unfollow) // GET /profile/{username}/unfollow/
            .service(profile) // GET /profile/{username}/
            .service(post_detail) // GET /posts/{id}/
            .service(edit_post) // POST /posts/{id}/edit/
            .service(add_comment) // POST /posts/{id}/comment/
            .service(serve_post_image) // GET /media/posts/{filename}
            .service(clear_page_cache) // POST /internal/cache/clear/
            .service(create_group) // POST /internal/groups/
    })
    .bind(&bind_address)?
    .run()
    .await
}
