//! Status-code compatibility for clients that expect `200` on rejected requests.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

use crate::error::ExpectedFailure;
use crate::state::AppState;

/// Rewrites expected failures (invalid input, unknown reference) to
/// `200 OK` when compat mode is on. The `{"error": ...}` body is unchanged.
///
/// Storage failures and responses not produced by [`crate::error::AppError`]
/// keep their status.
///
/// # Integration
///
/// ```rust,ignore
/// let api = api::routes::api_routes()
///     .layer(middleware::from_fn_with_state(state.clone(), compat::layer));
/// ```
pub async fn layer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    if state.compat_mode && response.extensions().get::<ExpectedFailure>().is_some() {
        *response.status_mut() = StatusCode::OK;
    }

    response
}
