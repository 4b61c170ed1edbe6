//! Nera site backend
//!
//! Content store for the Nera marketing site with a cached gallery selector,
//! served as a JSON API over SQLite.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod gallery;
mod models;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use gallery::GalleryCache;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub gallery: Arc<GalleryCache<Repository>>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Nera site backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!(
        ttl_secs = config.gallery_ttl.as_secs(),
        max_count = config.gallery_max_count,
        "Gallery cache configured"
    );

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (NERA_API_PSK). Admin routes are open!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Repository::new(pool);

    // The gallery reads through its own handle; the pool is shared
    let gallery = Arc::new(GalleryCache::new(repo.clone(), config.gallery_ttl));

    let state = AppState {
        repo: Arc::new(repo),
        gallery,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // Read-only routes used by the site pages, plus the contact form
    let public_routes = Router::new()
        .route("/projects", get(api::list_projects))
        .route("/projects/{key}", get(api::get_project))
        .route("/blog", get(api::list_blog_posts))
        .route("/blog/{key}", get(api::get_blog_post))
        .route("/team", get(api::list_team_members))
        .route("/team/{id}", get(api::get_team_member))
        .route("/faq", get(api::list_faqs))
        .route("/faq/{id}", get(api::get_faq))
        .route("/media", get(api::list_media))
        .route("/media/{id}", get(api::get_media))
        .route("/gallery/unique", get(api::gallery_unique))
        .route("/gallery/random", get(api::gallery_random))
        .route("/gallery/videos", get(api::gallery_videos))
        .route("/gallery/any", get(api::gallery_any))
        .route("/contact", post(api::submit_contact_message))
        .route("/settings", get(api::get_settings))
        .route("/page-images/{page}", get(api::get_page_images))
        .route("/home", get(api::get_home_content))
        .route("/catalog", get(api::get_catalog));

    let admin_routes = Router::new()
        .route("/revision", get(api::get_revision))
        // Projects
        .route("/projects", post(api::create_project))
        .route(
            "/projects/{key}",
            put(api::update_project).delete(api::delete_project),
        )
        // Blog
        .route("/blog", post(api::create_blog_post))
        .route(
            "/blog/{key}",
            put(api::update_blog_post).delete(api::delete_blog_post),
        )
        // Team and FAQ
        .route("/team", post(api::create_team_member))
        .route(
            "/team/{id}",
            put(api::update_team_member).delete(api::delete_team_member),
        )
        .route("/faq", post(api::create_faq))
        .route("/faq/{id}", put(api::update_faq).delete(api::delete_faq))
        // Media
        .route("/media", post(api::create_media))
        .route(
            "/media/{id}",
            put(api::update_media).delete(api::delete_media),
        )
        // Contact inbox
        .route("/contact", get(api::list_contact_messages))
        .route(
            "/contact/{id}",
            get(api::get_contact_message).delete(api::delete_contact_message),
        )
        .route("/contact/{id}/read", put(api::mark_contact_message_read))
        // Site content
        .route("/settings", put(api::update_settings))
        .route("/page-images/{page}", put(api::update_page_images))
        .route("/home", put(api::update_home_content))
        .route(
            "/catalog",
            put(api::update_catalog).delete(api::clear_catalog),
        )
        // Gallery cache control
        .route("/gallery/invalidate", post(api::invalidate_gallery))
        .route(
            "/gallery/reset-exclusions",
            post(api::reset_gallery_exclusions),
        )
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::admin_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api/admin", admin_routes)
        .nest("/api", public_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
