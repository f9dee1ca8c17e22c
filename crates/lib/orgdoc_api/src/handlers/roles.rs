//! Role request handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use orgdoc_core::models::role::{NewRole, RoleRow, RoleUpdate};
use orgdoc_core::roles;

use crate::AppState;
use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub can_upload_document: bool,
    #[serde(default)]
    pub can_delete_document: bool,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub can_upload_document: Option<bool>,
    pub can_delete_document: Option<bool>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub can_upload_document: bool,
    pub can_delete_document: bool,
}

impl From<RoleRow> for RoleResponse {
    fn from(r: RoleRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            can_upload_document: r.can_upload_document,
            can_delete_document: r.can_delete_document,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/roles` — list roles.
pub async fn list_roles_handler(
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let roles: Vec<RoleResponse> = roles::list_roles(&state.pool)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(serde_json::json!({ "roles": roles })))
}

/// `POST /api/roles` — create a role.
pub async fn create_role_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateRoleRequest>,
) -> AppResult<(StatusCode, Json<RoleResponse>)> {
    let role = roles::create_role(
        &state.pool,
        NewRole {
            name: body.name,
            description: body.description,
            can_upload_document: body.can_upload_document,
            can_delete_document: body.can_delete_document,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(role.into())))
}

/// `GET /api/roles/{id}` — fetch a role.
pub async fn get_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
) -> AppResult<Json<RoleResponse>> {
    let role = roles::get_role(&state.pool, role_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Role not found".into()))?;
    Ok(Json(role.into()))
}

/// `PUT /api/roles/{id}` — update a role.
pub async fn update_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
    Json(body): Json<UpdateRoleRequest>,
) -> AppResult<Json<RoleResponse>> {
    let role = roles::update_role(
        &state.pool,
        role_id,
        RoleUpdate {
            name: body.name,
            description: body.description,
            can_upload_document: body.can_upload_document,
            can_delete_document: body.can_delete_document,
        },
    )
    .await?;
    Ok(Json(role.into()))
}

/// `DELETE /api/roles/{id}` — delete a role that no user references.
pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    roles::delete_role(&state.pool, role_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
