//! Infrastructure layer for external integrations.
//!
//! Implements the storage interfaces defined by the domain layer.
//!
//! - [`persistence`] - In-memory and PostgreSQL repository implementations

pub mod persistence;
