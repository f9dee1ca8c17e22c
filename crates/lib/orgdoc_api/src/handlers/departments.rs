//! Department request handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use orgdoc_core::models::org::{DepartmentRow, OrgNodeUpdate};
use orgdoc_core::org;

use crate::AppState;
use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDepartmentsQuery {
    pub is_active: Option<bool>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

impl From<DepartmentRow> for DepartmentResponse {
    fn from(r: DepartmentRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            is_active: r.is_active,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/departments` — list departments.
pub async fn list_departments_handler(
    State(state): State<AppState>,
    Query(query): Query<ListDepartmentsQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let departments: Vec<DepartmentResponse> =
        org::list_departments(&state.pool, query.is_active)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
    Ok(Json(serde_json::json!({ "departments": departments })))
}

/// `POST /api/departments` — create a department.
pub async fn create_department_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateDepartmentRequest>,
) -> AppResult<(StatusCode, Json<DepartmentResponse>)> {
    let department =
        org::create_department(&state.pool, &body.name, body.description.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(department.into())))
}

/// `GET /api/departments/{id}` — fetch a department.
pub async fn get_department_handler(
    State(state): State<AppState>,
    Path(department_id): Path<Uuid>,
) -> AppResult<Json<DepartmentResponse>> {
    let department = org::get_department(&state.pool, department_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Department not found".into()))?;
    Ok(Json(department.into()))
}

/// `PUT /api/departments/{id}` — update a department.
pub async fn update_department_handler(
    State(state): State<AppState>,
    Path(department_id): Path<Uuid>,
    Json(body): Json<UpdateDepartmentRequest>,
) -> AppResult<Json<DepartmentResponse>> {
    let department = org::update_department(
        &state.pool,
        department_id,
        OrgNodeUpdate {
            name: body.name,
            description: body.description,
            is_active: body.is_active,
        },
    )
    .await?;
    Ok(Json(department.into()))
}

/// `DELETE /api/departments/{id}` — delete a department with no
/// divisions, users, or documents attached.
pub async fn delete_department_handler(
    State(state): State<AppState>,
    Path(department_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    org::delete_department(&state.pool, department_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
