//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::ShorteningService;

#[derive(Clone)]
pub struct AppState {
    pub shortening_service: Arc<ShorteningService>,
    /// Return HTTP 200 for rejected requests instead of 400/404.
    pub compat_mode: bool,
}

impl AppState {
    pub fn new(shortening_service: Arc<ShorteningService>, compat_mode: bool) -> Self {
        Self {
            shortening_service,
            compat_mode,
        }
    }
}
