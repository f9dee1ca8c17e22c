//! JWT issuance and verification.
//!
//! Access and refresh tokens are both HS256 JWTs signed with the same
//! secret and told apart by the `token_use` claim. The refresh token
//! carries only the user ID; role and username are re-read from the
//! database when it is redeemed, so role changes propagate within one
//! refresh cycle.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;

use super::AuthError;
use crate::models::auth::{AccessClaims, RefreshClaims, TokenUse};
use crate::models::user::UserRow;

/// Access token lifetime: 1 hour.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Refresh token lifetime: 7 days.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Issues and verifies the access/refresh token pair.
///
/// Holds the signing secret passed in at construction; nothing in this
/// module reads the process environment.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Build a service with the standard lifetimes.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_lifetimes(
            secret,
            Duration::seconds(ACCESS_TOKEN_TTL_SECS),
            Duration::seconds(REFRESH_TOKEN_TTL_SECS),
        )
    }

    /// Build a service with explicit lifetimes. Tests shrink these to
    /// exercise expiry without sleeping.
    pub fn with_lifetimes(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Sign an access token carrying {sub, username, role_id}.
    pub fn issue_access_token(&self, user: &UserRow) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.id,
            username: user.username.clone(),
            role_id: user.role_id,
            token_use: TokenUse::Access,
            exp: (now + self.access_ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Token(format!("jwt encode: {e}")))
    }

    /// Sign a refresh token carrying only {sub}.
    pub fn issue_refresh_token(&self, user: &UserRow) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user.id,
            token_use: TokenUse::Refresh,
            exp: (now + self.refresh_ttl).timestamp(),
            iat: now.timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Token(format!("jwt encode: {e}")))
    }

    /// Verify an access token. [`AuthError::TokenExpired`] past expiry,
    /// [`AuthError::TokenMalformed`] for bad signature, bad structure,
    /// or a refresh token presented in an access slot.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let claims: AccessClaims = self.decode_claims(token)?;
        if claims.token_use != TokenUse::Access {
            return Err(AuthError::TokenMalformed);
        }
        Ok(claims)
    }

    /// Verify a refresh token, with the same error split as
    /// [`Self::verify_access`].
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        let claims: RefreshClaims = self.decode_claims(token)?;
        if claims.token_use != TokenUse::Refresh {
            return Err(AuthError::TokenMalformed);
        }
        Ok(claims)
    }

    fn decode_claims<T: DeserializeOwned>(&self, token: &str) -> Result<T, AuthError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        // Callers distinguish expired from malformed; a leeway window
        // would blur the boundary.
        validation.leeway = 0;
        decode::<T>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenMalformed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user_fixture() -> UserRow {
        let now = Utc::now();
        UserRow {
            id: Uuid::new_v4(),
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password_hash: "$2b$10$fake".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            role_id: Uuid::new_v4(),
            department_id: None,
            division_id: None,
            unit_id: None,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn access_token_round_trip() {
        let svc = TokenService::new(b"test-secret");
        let user = user_fixture();
        let token = svc.issue_access_token(&user).unwrap();
        let claims = svc.verify_access(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.username, user.username);
        assert_eq!(claims.role_id, user.role_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_reports_expired() {
        let svc = TokenService::with_lifetimes(
            b"test-secret",
            Duration::seconds(-10),
            Duration::seconds(-10),
        );
        let user = user_fixture();
        let token = svc.issue_access_token(&user).unwrap();
        assert!(matches!(
            svc.verify_access(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn wrong_secret_reports_malformed() {
        let issuer = TokenService::new(b"secret-a");
        let verifier = TokenService::new(b"secret-b");
        let token = issuer.issue_access_token(&user_fixture()).unwrap();
        assert!(matches!(
            verifier.verify_access(&token),
            Err(AuthError::TokenMalformed)
        ));
    }

    #[test]
    fn garbage_reports_malformed() {
        let svc = TokenService::new(b"test-secret");
        assert!(matches!(
            svc.verify_access("not-a-token"),
            Err(AuthError::TokenMalformed)
        ));
    }

    #[test]
    fn refresh_token_rejected_in_access_slot() {
        let svc = TokenService::new(b"test-secret");
        let token = svc.issue_refresh_token(&user_fixture()).unwrap();
        assert!(matches!(
            svc.verify_access(&token),
            Err(AuthError::TokenMalformed)
        ));
    }

    #[test]
    fn access_token_rejected_in_refresh_slot() {
        let svc = TokenService::new(b"test-secret");
        let token = svc.issue_access_token(&user_fixture()).unwrap();
        assert!(matches!(
            svc.verify_refresh(&token),
            Err(AuthError::TokenMalformed)
        ));
    }

    #[test]
    fn refresh_claims_carry_only_subject() {
        let svc = TokenService::new(b"test-secret");
        let user = user_fixture();
        let token = svc.issue_refresh_token(&user).unwrap();
        let claims = svc.verify_refresh(&token).unwrap();
        assert_eq!(claims.sub, user.id);
    }
}
