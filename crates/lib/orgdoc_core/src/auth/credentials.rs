//! Credential verification and password mutation flows.

use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use super::password::{self, PasswordDigest};
use super::{AuthError, queries};
use crate::models::user::UserRow;
use crate::validate;

/// Verify a username/password pair against the store.
///
/// Unknown usernames, wrong passwords and deactivated accounts all fail
/// with [`AuthError::InvalidCredentials`]. On success the last-login
/// stamp is updated best-effort; a failure there is logged and does not
/// block the login.
pub async fn authenticate(
    pool: &PgPool,
    username: &str,
    password: &str,
) -> Result<UserRow, AuthError> {
    let username = validate::normalize_username(username);
    let Some(user) = queries::find_active_by_username(pool, &username).await? else {
        return Err(AuthError::InvalidCredentials);
    };
    let ok = password::verify_password_blocking(password.to_string(), user.password_hash.clone())
        .await?;
    if !ok {
        return Err(AuthError::InvalidCredentials);
    }
    if let Err(e) = queries::record_login(pool, user.id).await {
        warn!(user_id = %user.id, error = %e, "failed to record last login");
    }
    Ok(user)
}

/// Replace a user's password after verifying the current one.
pub async fn change_password(
    pool: &PgPool,
    user_id: Uuid,
    current_password: &str,
    new_password: &str,
) -> Result<(), AuthError> {
    let Some(user) = queries::find_by_id(pool, user_id).await? else {
        return Err(AuthError::UserNotFound);
    };
    let ok = password::verify_password_blocking(
        current_password.to_string(),
        user.password_hash.clone(),
    )
    .await?;
    if !ok {
        return Err(AuthError::InvalidCredentials);
    }
    set_password(pool, user_id, new_password).await
}

/// The single digest-write path: policy check, hash, store. Reset
/// confirm bypasses this only because its token consumption and digest
/// write must be one statement; it still builds the digest through
/// [`PasswordDigest`].
pub async fn set_password(
    pool: &PgPool,
    user_id: Uuid,
    new_password: &str,
) -> Result<(), AuthError> {
    let digest = PasswordDigest::from_plaintext_blocking(new_password.to_string()).await?;
    queries::update_password(pool, user_id, digest.as_str()).await
}
