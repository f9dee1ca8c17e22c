//! # orgdoc_core
//!
//! Core domain logic for Orgdoc.

pub mod auth;
pub mod authz;
pub mod constraint;
pub mod db;
pub mod documents;
pub mod migrate;
pub mod models;
pub mod org;
pub mod roles;
pub mod seed;
pub mod users;
pub mod validate;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
