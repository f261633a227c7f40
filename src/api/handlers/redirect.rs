//! Handler for short reference redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short reference to its original URL.
///
/// # Endpoint
///
/// `GET /api/shorturl/{ref}`
///
/// Responds `302 Found` with the stored URL in `Location`.
///
/// # Errors
///
/// - 400 `{"error": "Invalid Url Reference"}` if `ref` is not a decimal number
/// - 404 `{"error": "no url has been registered to that reference id yet"}`
///   if no record holds `ref`
pub async fn redirect_handler(
    Path(ref_text): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let url = state.shortening_service.resolve_redirect(&ref_text).await?;

    debug!(reference = %ref_text, target = %url, "Redirecting");

    Ok((StatusCode::FOUND, [(header::LOCATION, url)]))
}
