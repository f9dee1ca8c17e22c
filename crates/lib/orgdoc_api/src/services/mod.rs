//! Business flows shared across handlers.

pub mod auth;
pub mod cookies;
pub mod email;
