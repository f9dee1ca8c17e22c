//! Delivery channel for password reset tokens.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use orgdoc_core::models::user::UserRow;

/// Email delivery error.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

/// Trait for reset token delivery channels.
///
/// The plaintext reset token exists only between minting and delivery;
/// implementations must not persist it.
#[async_trait]
pub trait ResetMailer: Send + Sync {
    /// Deliver a password reset token to the account's email address.
    async fn send_reset_token(&self, user: &UserRow, token: &str) -> Result<(), MailError>;
}

/// Mailer that writes the token to the log instead of sending mail.
///
/// Default for local development. The token is logged at info level so
/// the reset flow can be exercised without an SMTP setup.
pub struct LogMailer;

#[async_trait]
impl ResetMailer for LogMailer {
    async fn send_reset_token(&self, user: &UserRow, token: &str) -> Result<(), MailError> {
        info!(
            user_id = %user.id,
            email = %user.email,
            token,
            "password reset token (log delivery)"
        );
        Ok(())
    }
}
