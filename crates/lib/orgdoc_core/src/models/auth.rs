//! Authentication domain models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminator embedded in every JWT so an access token can never be
/// presented where a refresh token is expected, or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Access,
    Refresh,
}

/// Claims embedded in short-lived access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject, the user ID (standard JWT `sub` claim).
    pub sub: Uuid,
    /// Username at issue time.
    pub username: String,
    /// Role at issue time.
    pub role_id: Uuid,
    /// Always [`TokenUse::Access`].
    pub token_use: TokenUse,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

/// Claims embedded in long-lived refresh tokens.
///
/// Deliberately minimal: everything else is re-read from the database
/// when the token is redeemed, so stale usernames or roles never leak
/// into freshly minted access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject, the user ID (standard JWT `sub` claim).
    pub sub: Uuid,
    /// Always [`TokenUse::Refresh`].
    pub token_use: TokenUse,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}
