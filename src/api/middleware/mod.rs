//! HTTP middleware for request processing.
//!
//! Provides error status compatibility and observability middleware.

pub mod compat;
pub mod tracing;
