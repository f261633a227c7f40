//! API route configuration.

use crate::api::handlers::{hello_handler, redirect_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All API routes.
///
/// # Endpoints
///
/// - `GET  /hello`           - Fixed greeting
/// - `POST /shorturl`        - Register a URL (JSON or form body)
/// - `GET  /shorturl/{ref}`  - Redirect to the URL registered under `ref`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/hello", get(hello_handler))
        .route("/shorturl", post(shorten_handler))
        .route("/shorturl/{ref}", get(redirect_handler))
}
