//! Authentication service, login and refresh and reset flows delegating
//! to `orgdoc_core::auth`.

use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use orgdoc_core::auth::AuthError;
use orgdoc_core::models::role::RoleRow;
use orgdoc_core::models::user::UserRow;

use crate::AppState;
use crate::error::{AppError, AppResult};

/// Authenticate with username + password and issue a token pair.
///
/// Returns the user row alongside the access and refresh tokens.
pub async fn login(
    state: &AppState,
    username: &str,
    password: &str,
) -> AppResult<(UserRow, String, String)> {
    let user = orgdoc_core::auth::credentials::authenticate(&state.pool, username, password).await?;
    let access = state.tokens.issue_access_token(&user)?;
    let refresh = state.tokens.issue_refresh_token(&user)?;
    Ok((user, access, refresh))
}

/// Exchange a refresh token for a fresh access token.
///
/// The access token is minted from the current user row, not from the
/// refresh token's claims, so role and placement changes take effect at
/// the next refresh rather than the next login.
pub async fn refresh(state: &AppState, refresh_token: &str) -> AppResult<(UserRow, String)> {
    let claims = state.tokens.verify_refresh(refresh_token)?;

    let user = orgdoc_core::auth::queries::find_by_id(&state.pool, claims.sub)
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| {
            AppError::Unauthorized("malformed_token", "Unknown or inactive account".into())
        })?;

    let access = state.tokens.issue_access_token(&user)?;
    Ok((user, access))
}

/// Start a password reset for the account behind `email`.
///
/// Always succeeds from the caller's point of view. Whether the account
/// exists, and whether delivery worked, is not revealed; failures are
/// logged server-side only.
pub async fn request_password_reset(state: &AppState, email: &str) -> AppResult<()> {
    match orgdoc_core::auth::reset::initiate(&state.pool, &state.reset_tokens, email).await {
        Ok((user, token)) => {
            if let Err(e) = state.mailer.send_reset_token(&user, &token).await {
                error!(user_id = %user.id, error = %e, "failed to deliver password reset token");
            }
            Ok(())
        }
        Err(AuthError::UserNotFound) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Redeem a reset token and set a new password.
pub async fn confirm_password_reset(
    state: &AppState,
    token: &str,
    new_password: &str,
) -> AppResult<UserRow> {
    let user =
        orgdoc_core::auth::reset::confirm(&state.pool, &state.reset_tokens, token, new_password)
            .await?;
    Ok(user)
}

/// Load the current user row and role for an authenticated principal.
///
/// Returns `NotFound` if the account has been removed or deactivated
/// since the token was issued.
pub async fn load_principal(pool: &PgPool, user_id: Uuid) -> AppResult<(UserRow, RoleRow)> {
    match orgdoc_core::users::get_user_with_role(pool, user_id).await? {
        Some((user, role)) if user.is_active => Ok((user, role)),
        _ => Err(AppError::NotFound("User not found".into())),
    }
}
