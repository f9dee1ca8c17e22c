//! Authentication middleware, Bearer token extraction and JWT verification.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use orgdoc_core::auth::AuthError;

use crate::AppState;
use crate::error::AppError;

/// Authenticated principal stored in request extensions.
///
/// Carries only what the access token asserts. Placement and
/// capabilities are loaded from the database where a handler needs
/// them, so a stale token never grants stale visibility.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub role_id: Uuid,
}

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the JWT,
/// and injects `CurrentUser` into request extensions.
///
/// The three failure modes are distinguishable by reason code:
/// `missing_token`, `malformed_token`, `expired_token`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Unauthorized("missing_token", "Missing authorization header".into())
        })?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("malformed_token", "Invalid authorization scheme".into())
    })?;

    let claims = state.tokens.verify_access(token).map_err(|e| match e {
        AuthError::TokenExpired => {
            AppError::Unauthorized("expired_token", "Access token has expired".into())
        }
        _ => AppError::Unauthorized("malformed_token", "Access token is invalid".into()),
    })?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        username: claims.username,
        role_id: claims.role_id,
    });

    Ok(next.run(request).await)
}
