//! Application layer implementing the shortening workflow.
//!
//! Components, leaves first:
//!
//! - [`validator`] - Syntax, scheme and host-resolution checks on submitted URLs
//! - [`resolver`] - Lookups by URL (dedup path) and by reference (redirect path)
//! - [`services::shortening_service::ShorteningService`] - Get-or-create orchestration
//!   and redirect resolution

pub mod resolver;
pub mod services;
pub mod validator;
