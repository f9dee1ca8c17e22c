//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::handlers::users::UserResponse;
use crate::middleware::auth::CurrentUser;
use crate::services::{auth, cookies};

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResetRequest {
    pub email: String,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResetRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /api/auth/login` — authenticate with username + password.
///
/// The access token travels in the body; the refresh token only in a
/// httpOnly cookie scoped to the auth endpoints.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<TokenResponse>)> {
    let (user, access, refresh) = auth::login(&state, &body.username, &body.password).await?;

    let jar = jar.add(cookies::refresh_cookie(
        &refresh,
        state.tokens.refresh_ttl().num_seconds(),
    ));

    Ok((
        jar,
        Json(TokenResponse {
            access_token: access,
            expires_in: state.tokens.access_ttl().num_seconds(),
            token_type: "Bearer".to_string(),
            user: UserResponse::from_row(user),
        }),
    ))
}

/// `POST /api/auth/refresh` — mint a fresh access token from the
/// refresh cookie.
pub async fn refresh_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<Json<TokenResponse>> {
    let token = jar
        .get(cookies::REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| {
            AppError::Unauthorized("missing_token", "Missing refresh token cookie".into())
        })?;

    let (user, access) = auth::refresh(&state, &token).await?;

    Ok(Json(TokenResponse {
        access_token: access,
        expires_in: state.tokens.access_ttl().num_seconds(),
        token_type: "Bearer".to_string(),
        user: UserResponse::from_row(user),
    }))
}

/// `POST /api/auth/logout` — clear the refresh cookie.
///
/// Refresh tokens are not tracked server-side, so logout is purely a
/// client-state operation; the access token runs out on its own.
pub async fn logout_handler(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    let jar = jar.add(cookies::clear_refresh_cookie());
    (jar, Json(serde_json::json!({ "success": true })))
}

/// `POST /api/auth/reset-password` — start a password reset.
///
/// The response is identical whether or not the address matches an
/// account.
pub async fn request_reset_handler(
    State(state): State<AppState>,
    Json(body): Json<RequestResetRequest>,
) -> AppResult<Json<serde_json::Value>> {
    auth::request_password_reset(&state, &body.email).await?;
    Ok(Json(serde_json::json!({
        "message": "If the account exists, a password reset link has been sent."
    })))
}

/// `POST /api/auth/reset-password/confirm` — redeem a reset token.
pub async fn confirm_reset_handler(
    State(state): State<AppState>,
    Json(body): Json<ConfirmResetRequest>,
) -> AppResult<Json<serde_json::Value>> {
    auth::confirm_password_reset(&state, &body.token, &body.new_password).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// `GET /api/auth/me` — the authenticated user with their role.
pub async fn me_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<CurrentUser>,
) -> AppResult<Json<UserResponse>> {
    let (row, role) = auth::load_principal(&state.pool, user.id).await?;
    Ok(Json(UserResponse::with_role(row, role)))
}

/// `POST /api/auth/change-password` — change the password of the
/// authenticated user. Requires the current password.
pub async fn change_password_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<CurrentUser>,
    Json(body): Json<ChangePasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    orgdoc_core::auth::credentials::change_password(
        &state.pool,
        user.id,
        &body.current_password,
        &body.new_password,
    )
    .await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
