//! Request handlers.

pub mod auth;
pub mod departments;
pub mod divisions;
pub mod documents;
pub mod roles;
pub mod units;
pub mod users;
