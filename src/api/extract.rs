//! Body extractor accepting either JSON or urlencoded form data.

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{AppError, INVALID_URL};

/// Deserializes the body as JSON when `Content-Type` is `application/json`,
/// otherwise as `application/x-www-form-urlencoded`.
///
/// The landing page posts a plain HTML form while API clients send JSON;
/// both reach the same handler. Unreadable bodies are rejected as
/// `invalid url`.
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
                debug!(error = %e, "Rejected JSON body");
                AppError::bad_request(INVALID_URL)
            })?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state).await.map_err(|e| {
                debug!(error = %e, "Rejected form body");
                AppError::bad_request(INVALID_URL)
            })?;
            Ok(Self(value))
        }
    }
}
