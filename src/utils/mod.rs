//! Utility functions for code generation, URL validation, and database errors.
//!
//! - [`code_generator`] - Seeded short code generation
//! - [`url_validator`] - Absolute URL validation
//! - [`db_error`] - PostgreSQL constraint classification

pub mod code_generator;
pub mod db_error;
pub mod url_validator;
