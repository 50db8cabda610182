//! Core domain entities.
//!
//! - [`UrlMapping`] - A short code to original URL mapping

pub mod url_mapping;

pub use url_mapping::UrlMapping;
