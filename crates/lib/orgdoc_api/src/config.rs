//! API server configuration.

/// Configuration for the API server.
///
/// Plain data. The binary assembles it from CLI flags and environment
/// variables and passes it in; the library never reads the environment
/// itself.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:3200").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// HMAC key for password reset token digests.
    pub reset_secret: String,
    /// Access token lifetime in seconds.
    pub access_token_ttl_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_ttl_secs: i64,
}
