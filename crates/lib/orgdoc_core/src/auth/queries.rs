//! Auth-facing database queries over the `users` table.
//!
//! Lookups here expect already-normalized usernames and emails; the
//! flow functions in [`super::credentials`] and [`super::reset`]
//! normalize before calling in.

use sqlx::PgPool;
use uuid::Uuid;

use super::AuthError;
use crate::models::user::UserRow;

/// Fetch an active user by normalized username.
pub async fn find_active_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserRow>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, email, password_hash, first_name, last_name,
               role_id, department_id, division_id, unit_id,
               is_active, last_login, created_at, updated_at
        FROM users
        WHERE username = $1 AND is_active = true
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Fetch an active user by normalized email.
pub async fn find_active_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<UserRow>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, email, password_hash, first_name, last_name,
               role_id, department_id, division_id, unit_id,
               is_active, last_login, created_at, updated_at
        FROM users
        WHERE email = $1 AND is_active = true
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Fetch a user by ID, active or not.
pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRow>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, email, password_hash, first_name, last_name,
               role_id, department_id, division_id, unit_id,
               is_active, last_login, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Stamp last-login with the current time.
pub async fn record_login(pool: &PgPool, user_id: Uuid) -> Result<(), AuthError> {
    sqlx::query("UPDATE users SET last_login = now(), updated_at = now() WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Replace the password digest. Any pending reset token is cleared in
/// the same statement, so changing a password invalidates outstanding
/// reset links.
pub async fn update_password(pool: &PgPool, user_id: Uuid, digest: &str) -> Result<(), AuthError> {
    sqlx::query(
        r#"
        UPDATE users
        SET password_hash = $2,
            reset_token_hash = NULL,
            reset_token_expires = NULL,
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(digest)
    .execute(pool)
    .await?;
    Ok(())
}

/// Store a reset-token digest and its expiry, replacing any pending
/// one. Last write wins: at most one reset token is valid per user.
pub async fn store_reset_token(
    pool: &PgPool,
    user_id: Uuid,
    token_digest: &str,
    expires_at: chrono::DateTime<chrono::Utc>,
) -> Result<(), AuthError> {
    sqlx::query(
        r#"
        UPDATE users
        SET reset_token_hash = $2, reset_token_expires = $3, updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(token_digest)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Atomically consume a pending reset token: match the digest, require
/// the expiry to be in the future, swap in the new password digest and
/// clear the reset fields in one statement. Returns `None` when no row
/// matched, which covers unknown, expired and already-consumed tokens
/// alike. Concurrent confirms race on the row update, so exactly one
/// caller gets the row back.
pub async fn consume_reset_token(
    pool: &PgPool,
    token_digest: &str,
    new_password_digest: &str,
) -> Result<Option<UserRow>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET password_hash = $2,
            reset_token_hash = NULL,
            reset_token_expires = NULL,
            updated_at = now()
        WHERE reset_token_hash = $1
          AND reset_token_expires > now()
          AND is_active = true
        RETURNING id, username, email, password_hash, first_name, last_name,
                  role_id, department_id, division_id, unit_id,
                  is_active, last_login, created_at, updated_at
        "#,
    )
    .bind(token_digest)
    .bind(new_password_digest)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}
