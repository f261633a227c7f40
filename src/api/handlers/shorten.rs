//! Handler for URL shortening endpoint.

use axum::{Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::extract::JsonOrForm;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a URL, or returns its existing reference.
///
/// # Endpoint
///
/// `POST /api/shorturl`
///
/// # Request Body
///
/// `url=https://www.example.com` (urlencoded form) or
///
/// ```json
/// { "url": "https://www.example.com" }
/// ```
///
/// # Response
///
/// ```json
/// { "original_url": "https://www.example.com", "short_url": 1 }
/// ```
///
/// # Errors
///
/// Returns 400 `{"error": "invalid url"}` when the URL is malformed, not
/// http(s), or its host does not resolve. Returns 500 on storage failures.
pub async fn shorten_handler(
    State(state): State<AppState>,
    JsonOrForm(payload): JsonOrForm<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let record = state.shortening_service.shorten(&payload.url).await?;

    Ok(Json(record.into()))
}
