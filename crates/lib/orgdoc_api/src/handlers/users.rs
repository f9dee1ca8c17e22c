//! User management request handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use orgdoc_core::models::role::RoleRow;
use orgdoc_core::models::user::{NewUser, UserFilter, UserRow, UserUpdate};
use orgdoc_core::users;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::handlers::roles::RoleResponse;

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: Uuid,
    pub department_id: Option<Uuid>,
    pub division_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
}

/// Placement fields distinguish "leave unchanged" (absent) from
/// "clear" (explicit null), hence the nested `Option`.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role_id: Option<Uuid>,
    #[serde(default)]
    pub department_id: Option<Option<Uuid>>,
    #[serde(default)]
    pub division_id: Option<Option<Uuid>>,
    #[serde(default)]
    pub unit_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUsersQuery {
    pub role_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub division_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: Uuid,
    pub department_id: Option<Uuid>,
    pub division_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleResponse>,
}

impl UserResponse {
    pub fn from_row(user: UserRow) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role_id: user.role_id,
            department_id: user.department_id,
            division_id: user.division_id,
            unit_id: user.unit_id,
            is_active: user.is_active,
            last_login: user.last_login,
            role: None,
        }
    }

    pub fn with_role(user: UserRow, role: RoleRow) -> Self {
        let mut resp = Self::from_row(user);
        resp.role = Some(role.into());
        resp
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/users` — list users, optionally filtered by role or placement.
pub async fn list_users_handler(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let filter = UserFilter {
        role_id: query.role_id,
        department_id: query.department_id,
        division_id: query.division_id,
        unit_id: query.unit_id,
        is_active: query.is_active,
    };
    let users: Vec<UserResponse> = users::list_users(&state.pool, &filter)
        .await?
        .into_iter()
        .map(UserResponse::from_row)
        .collect();
    Ok(Json(serde_json::json!({ "users": users })))
}

/// `POST /api/users` — create a user account.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = users::create_user(
        &state.pool,
        NewUser {
            username: body.username,
            email: body.email,
            password: body.password,
            first_name: body.first_name,
            last_name: body.last_name,
            role_id: body.role_id,
            department_id: body.department_id,
            division_id: body.division_id,
            unit_id: body.unit_id,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from_row(user))))
}

/// `GET /api/users/{id}` — fetch a user with their role.
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let (user, role) = users::get_user_with_role(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(UserResponse::with_role(user, role)))
}

/// `PUT /api/users/{id}` — update a user.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = users::update_user(
        &state.pool,
        user_id,
        UserUpdate {
            username: body.username,
            email: body.email,
            first_name: body.first_name,
            last_name: body.last_name,
            role_id: body.role_id,
            department_id: body.department_id,
            division_id: body.division_id,
            unit_id: body.unit_id,
            is_active: body.is_active,
        },
    )
    .await?;
    Ok(Json(UserResponse::from_row(user)))
}

/// `DELETE /api/users/{id}` — deactivate a user account.
///
/// Accounts are never physically deleted; documents keep a valid
/// creator reference.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    users::deactivate_user(&state.pool, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
