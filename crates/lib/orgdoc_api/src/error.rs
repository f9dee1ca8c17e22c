//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use orgdoc_core::auth::AuthError;
use orgdoc_core::documents::DocumentError;
use orgdoc_core::org::OrgError;
use orgdoc_core::roles::RoleError;
use orgdoc_core::users::UserError;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// JSON body for all error responses.
#[derive(Debug, serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Application-level errors with HTTP status mapping.
///
/// Each variant maps to a stable machine-readable code in the response
/// body. `Unauthorized` carries its code explicitly so clients can tell
/// a missing credential from a malformed one from an expired one.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    #[error("Unauthorized: {1}")]
    Unauthorized(&'static str, String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Has dependents: {0}")]
    HasDependents(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "validation_error".into(), m),
            AppError::InvalidReference(m) => {
                (StatusCode::BAD_REQUEST, "invalid_reference".into(), m)
            }
            AppError::InvalidResetToken => (
                StatusCode::BAD_REQUEST,
                "invalid_reset_token".into(),
                "Invalid or expired reset token".into(),
            ),
            AppError::Unauthorized(code, m) => (StatusCode::UNAUTHORIZED, code.to_string(), m),
            AppError::Forbidden(m) => (StatusCode::FORBIDDEN, "forbidden".into(), m),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found".into(), m),
            AppError::AlreadyExists(m) => (StatusCode::CONFLICT, "already_exists".into(), m),
            AppError::HasDependents(m) => (StatusCode::CONFLICT, "has_dependents".into(), m),
            AppError::Internal(detail) => {
                // Log the detail, return only an opaque reference.
                let reference = Uuid::new_v4();
                error!(%reference, detail = %detail, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error".into(),
                    format!("Internal server error (reference {reference})"),
                )
            }
        };
        let body = Json(ErrorResponse { error, message });
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".into()),
            _ => AppError::Internal(e.to_string()),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => AppError::Unauthorized(
                "invalid_credentials",
                "Invalid username or password".into(),
            ),
            AuthError::UserNotFound => AppError::NotFound("User not found".into()),
            AuthError::TokenExpired => {
                AppError::Unauthorized("expired_token", "Token has expired".into())
            }
            AuthError::TokenMalformed => {
                AppError::Unauthorized("malformed_token", "Token is malformed".into())
            }
            AuthError::Token(msg) => AppError::Internal(msg),
            AuthError::InvalidResetToken => AppError::InvalidResetToken,
            AuthError::Validation(msg) => AppError::Validation(msg),
            AuthError::Hash(msg) => AppError::Internal(msg),
            AuthError::Db(e) => AppError::from(e),
        }
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound => AppError::NotFound(e.to_string()),
            UserError::AlreadyExists(_) => AppError::AlreadyExists(e.to_string()),
            UserError::InvalidReference(_) => AppError::InvalidReference(e.to_string()),
            UserError::Validation(msg) => AppError::Validation(msg),
            UserError::Auth(inner) => AppError::from(inner),
            UserError::Db(e) => AppError::from(e),
        }
    }
}

impl From<RoleError> for AppError {
    fn from(e: RoleError) -> Self {
        match e {
            RoleError::NotFound => AppError::NotFound(e.to_string()),
            RoleError::AlreadyExists => AppError::AlreadyExists(e.to_string()),
            RoleError::HasDependents => AppError::HasDependents(e.to_string()),
            RoleError::Validation(msg) => AppError::Validation(msg),
            RoleError::Db(e) => AppError::from(e),
        }
    }
}

impl From<OrgError> for AppError {
    fn from(e: OrgError) -> Self {
        match e {
            OrgError::NotFound(_) => AppError::NotFound(e.to_string()),
            OrgError::InvalidParent(_) => AppError::InvalidReference(e.to_string()),
            OrgError::AlreadyExists(_) => AppError::AlreadyExists(e.to_string()),
            OrgError::HasDependents(_) => AppError::HasDependents(e.to_string()),
            OrgError::Validation(msg) => AppError::Validation(msg),
            OrgError::Db(e) => AppError::from(e),
        }
    }
}

impl From<DocumentError> for AppError {
    fn from(e: DocumentError) -> Self {
        match e {
            DocumentError::NotFound => AppError::NotFound(e.to_string()),
            DocumentError::AlreadyExists(_) => AppError::AlreadyExists(e.to_string()),
            DocumentError::InvalidReference(_) => AppError::InvalidReference(e.to_string()),
            DocumentError::Validation(msg) => AppError::Validation(msg),
            DocumentError::Db(e) => AppError::from(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    async fn body_code(err: AppError) -> (StatusCode, String) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("body");
        let json: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        (status, json["error"].as_str().expect("error code").to_string())
    }

    #[tokio::test]
    async fn each_kind_keeps_its_own_code() {
        let cases = [
            (AppError::Validation("v".into()), 400, "validation_error"),
            (AppError::InvalidReference("r".into()), 400, "invalid_reference"),
            (AppError::InvalidResetToken, 400, "invalid_reset_token"),
            (
                AppError::Unauthorized("expired_token", "e".into()),
                401,
                "expired_token",
            ),
            (AppError::Forbidden("f".into()), 403, "forbidden"),
            (AppError::NotFound("n".into()), 404, "not_found"),
            (AppError::AlreadyExists("a".into()), 409, "already_exists"),
            (AppError::HasDependents("h".into()), 409, "has_dependents"),
        ];
        for (err, status, code) in cases {
            let (got_status, got_code) = body_code(err).await;
            assert_eq!(got_status.as_u16(), status);
            assert_eq!(got_code, code);
        }
    }

    #[tokio::test]
    async fn internal_errors_hide_the_detail() {
        let resp = AppError::Internal("connection pool exhausted".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("body");
        let json: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        let message = json["message"].as_str().expect("message");
        assert!(!message.contains("pool"));
        assert!(message.contains("reference"));
    }
}
