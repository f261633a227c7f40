//! Core domain entities.
//!
//! The service has exactly one entity: [`UrlRecord`], the mapping between an
//! original URL and its numeric short reference.

pub mod url_record;

pub use url_record::UrlRecord;
