//! # Sharelist Shared Library
//!
//! This crate contains shared types, utilities, and business logic used by
//! the Sharelist API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and repository functions
//! - `auth`: Token issuance, session validity, and access control
//! - `db`: Connection pooling and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Sharelist shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
