//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{HealthChecks, HealthResponse, HealthState, StorageCheck};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Storage reachable
/// - **503 Service Unavailable**: Storage degraded
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "storage": { "status": "ok", "message": "Connected, 2 urls registered" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let storage_check = check_storage(&state).await;

    let healthy = storage_check.is_ok();

    let response = HealthResponse {
        status: if healthy {
            HealthState::Healthy
        } else {
            HealthState::Degraded
        },
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks {
            storage: storage_check,
        },
    };

    if healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks storage connectivity by counting records.
async fn check_storage(state: &AppState) -> StorageCheck {
    match state.shortening_service.registered_count().await {
        Ok(count) => StorageCheck {
            status: "ok",
            message: Some(format!("Connected, {} urls registered", count)),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Storage health check failed");
            StorageCheck {
                status: "error",
                message: Some(format!("Storage error: {}", e)),
            }
        }
    }
}
