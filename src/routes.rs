//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`          - Landing page with the shortening form
//! - `GET  /public/*`  - Static assets
//! - `GET  /health`    - Health check
//! - `/api/*`          - Shortening and redirect API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin may call the API
//! - **Compat** - Optional 200 status for rejected API requests
//! - **Path normalization** - Trailing slash handling

use std::path::Path;

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{compat, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::{ServeDir, ServeFile};

/// Locations of the files served outside the API.
#[derive(Debug, Clone)]
pub struct AssetDirs {
    pub static_dir: String,
    pub views_dir: String,
}

impl Default for AssetDirs {
    fn default() -> Self {
        Self {
            static_dir: "public".to_string(),
            views_dir: "views".to_string(),
        }
    }
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `assets` - directories for the landing page and static files
pub fn router(state: AppState, assets: &AssetDirs) -> Router {
    let api_router = api::routes::api_routes()
        .layer(middleware::from_fn_with_state(state.clone(), compat::layer));

    let index = ServeFile::new(Path::new(&assets.views_dir).join("index.html"));

    Router::new()
        .route_service("/", index)
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .nest_service("/public", ServeDir::new(&assets.static_dir))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(tracing::layer())
}

/// [`router`] wrapped so `/api/shorturl/` and `/api/shorturl` match the same route.
pub fn app_router(state: AppState, assets: &AssetDirs) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state, assets))
}
