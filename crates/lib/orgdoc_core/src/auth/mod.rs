//! Authentication logic.
//!
//! Provides credential verification, password hashing, JWT issuance and
//! verification, and the password-reset flow, shared between
//! `orgdoc_api` and the server binary.

pub mod credentials;
pub mod password;
pub mod queries;
pub mod reset;
pub mod tokens;

use thiserror::Error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong username, wrong password, or inactive account. One variant
    /// for all three so callers cannot build an account-enumeration
    /// oracle out of the error kind.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Token expired")]
    TokenExpired,

    #[error("Malformed token")]
    TokenMalformed,

    #[error("Token error: {0}")]
    Token(String),

    /// Reset token unknown, expired, or already consumed. Deliberately
    /// one variant; which of the three happened is not disclosed.
    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Hashing error: {0}")]
    Hash(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}
