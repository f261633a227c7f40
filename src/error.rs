//! HTTP error type and its mapping from core errors.
//!
//! Every error body has the shape `{"error": "<message>"}`, with fixed messages
//! that clients match on.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::services::{ResolveError, ShortenError};

pub const INVALID_URL: &str = "invalid url";
pub const INVALID_REFERENCE: &str = "Invalid Url Reference";
pub const REFERENCE_NOT_FOUND: &str = "no url has been registered to that reference id yet";
pub const STORAGE_FAILURE: &str = "storage failure";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Response extension marking an expected, caller-caused failure.
///
/// Read by [`crate::api::middleware::compat`] to downgrade the status code.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedFailure;

#[derive(Debug)]
pub enum AppError {
    Validation { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Validation { message }
            | AppError::NotFound { message }
            | AppError::Internal { message } => message,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, expected, message) = match self {
            AppError::Validation { message } => (StatusCode::BAD_REQUEST, true, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, true, message),
            AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, false, message)
            }
        };

        let mut response = (status, Json(ErrorBody { error: message })).into_response();
        if expected {
            response.extensions_mut().insert(ExpectedFailure);
        }
        response
    }
}

impl From<ShortenError> for AppError {
    fn from(e: ShortenError) -> Self {
        match e {
            ShortenError::InvalidUrl(_) => AppError::bad_request(INVALID_URL),
            ShortenError::StorageFailure(_) => AppError::internal(STORAGE_FAILURE),
        }
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::InvalidReference(_) => AppError::bad_request(INVALID_REFERENCE),
            ResolveError::ReferenceNotFound(_) => AppError::not_found(REFERENCE_NOT_FOUND),
            ResolveError::StorageFailure(_) => AppError::internal(STORAGE_FAILURE),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(_: validator::ValidationErrors) -> Self {
        AppError::bad_request(INVALID_URL)
    }
}
