//! Domain models shared across Orgdoc subsystems.
//!
//! These are internal domain models, distinct from API-specific request
//! and response types (which carry `#[serde(rename_all = "camelCase")]`).

pub mod auth;
pub mod document;
pub mod org;
pub mod role;
pub mod user;
