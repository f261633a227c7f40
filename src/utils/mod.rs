//! Utility functions shared across layers.
//!
//! - [`db_error`] - Mapping of SQLx errors onto store errors

pub mod db_error;
