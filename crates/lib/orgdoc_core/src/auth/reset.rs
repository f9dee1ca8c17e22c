//! Password-reset token lifecycle.
//!
//! Per user the states are: no pending reset, pending reset (digest +
//! expiry stored), then back to no pending reset on confirm or expiry.
//! Only a keyed digest of the token is ever persisted; the plaintext
//! goes to the email collaborator and nowhere else.

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use sha2::Sha256;
use sqlx::PgPool;

use super::password::PasswordDigest;
use super::{AuthError, queries};
use crate::models::user::UserRow;
use crate::validate;

type HmacSha256 = Hmac<Sha256>;

/// Reset token length in characters.
const RESET_TOKEN_LEN: usize = 64;

/// Reset token lifetime: 1 hour.
pub const RESET_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Mints and digests password-reset tokens.
///
/// The HMAC key is dedicated to this flow and passed in at
/// construction; compromising the JWT secret does not let an attacker
/// forge reset-token digests, and vice versa.
#[derive(Clone)]
pub struct ResetTokens {
    key: Vec<u8>,
    ttl: Duration,
}

impl ResetTokens {
    /// Build with the standard 1 hour lifetime.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::seconds(RESET_TOKEN_TTL_SECS))
    }

    /// Build with an explicit lifetime. Tests shrink it to exercise
    /// expiry without sleeping.
    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        Self {
            key: secret.to_vec(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Generate a fresh token; returns `(plaintext, digest)`.
    pub fn mint(&self) -> (String, String) {
        let token: String = rng()
            .sample_iter(&Alphanumeric)
            .take(RESET_TOKEN_LEN)
            .map(char::from)
            .collect();
        let digest = self.digest(&token);
        (token, digest)
    }

    /// Keyed digest of a token (HMAC-SHA256, lowercase hex).
    pub fn digest(&self, token: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("hmac accepts any key length");
        mac.update(token.as_bytes());
        format!("{:x}", mac.finalize().into_bytes())
    }
}

/// Issue a reset token for the account registered under `email`.
///
/// Fails with [`AuthError::UserNotFound`] when no active account
/// matches; the HTTP layer masks that as a generic success message, but
/// the distinction stays visible here. Returns the user and the
/// plaintext token for the email collaborator. A second initiate for
/// the same user overwrites the pending digest, so only the newest
/// token stays redeemable.
pub async fn initiate(
    pool: &PgPool,
    tokens: &ResetTokens,
    email: &str,
) -> Result<(UserRow, String), AuthError> {
    let email = validate::normalize_email(email);
    let Some(user) = queries::find_active_by_email(pool, &email).await? else {
        return Err(AuthError::UserNotFound);
    };
    let (plaintext, digest) = tokens.mint();
    let expires_at = Utc::now() + tokens.ttl();
    queries::store_reset_token(pool, user.id, &digest, expires_at).await?;
    Ok((user, plaintext))
}

/// Redeem a reset token and set a new password.
///
/// The new password is validated and hashed before the store is
/// touched, so a rejected password leaves the token redeemable. The
/// consumption itself is a single statement; replaying the token fails
/// with [`AuthError::InvalidResetToken`].
pub async fn confirm(
    pool: &PgPool,
    tokens: &ResetTokens,
    token: &str,
    new_password: &str,
) -> Result<UserRow, AuthError> {
    let new_digest = PasswordDigest::from_plaintext_blocking(new_password.to_string()).await?;
    let token_digest = tokens.digest(token);
    queries::consume_reset_token(pool, &token_digest, new_digest.as_str())
        .await?
        .ok_or(AuthError::InvalidResetToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic_per_key() {
        let tokens = ResetTokens::new(b"reset-secret");
        assert_eq!(tokens.digest("abc"), tokens.digest("abc"));
        assert_ne!(tokens.digest("abc"), tokens.digest("abd"));
    }

    #[test]
    fn digest_depends_on_key() {
        let a = ResetTokens::new(b"key-a");
        let b = ResetTokens::new(b"key-b");
        assert_ne!(a.digest("abc"), b.digest("abc"));
    }

    #[test]
    fn mint_produces_matching_digest() {
        let tokens = ResetTokens::new(b"reset-secret");
        let (plaintext, digest) = tokens.mint();
        assert_eq!(plaintext.len(), RESET_TOKEN_LEN);
        assert!(plaintext.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(tokens.digest(&plaintext), digest);
    }

    #[test]
    fn minted_tokens_are_unique() {
        let tokens = ResetTokens::new(b"reset-secret");
        let (a, _) = tokens.mint();
        let (b, _) = tokens.mint();
        assert_ne!(a, b);
    }

    #[test]
    fn digest_is_hex_encoded_sha256_width() {
        let tokens = ResetTokens::new(b"reset-secret");
        let digest = tokens.digest("abc");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
