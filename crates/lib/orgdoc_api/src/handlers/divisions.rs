//! Division request handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use orgdoc_core::models::org::{DivisionRow, OrgNodeUpdate};
use orgdoc_core::org;

use crate::AppState;
use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDivisionRequest {
    pub name: String,
    pub description: Option<String>,
    pub department_id: Uuid,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDivisionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDivisionsQuery {
    pub department_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DivisionResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub department_id: Uuid,
    pub is_active: bool,
}

impl From<DivisionRow> for DivisionResponse {
    fn from(r: DivisionRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            department_id: r.department_id,
            is_active: r.is_active,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/divisions` — list divisions, optionally per department.
pub async fn list_divisions_handler(
    State(state): State<AppState>,
    Query(query): Query<ListDivisionsQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let divisions: Vec<DivisionResponse> =
        org::list_divisions(&state.pool, query.department_id, query.is_active)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
    Ok(Json(serde_json::json!({ "divisions": divisions })))
}

/// `POST /api/divisions` — create a division under a department.
pub async fn create_division_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateDivisionRequest>,
) -> AppResult<(StatusCode, Json<DivisionResponse>)> {
    let division = org::create_division(
        &state.pool,
        &body.name,
        body.description.as_deref(),
        body.department_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(division.into())))
}

/// `GET /api/divisions/{id}` — fetch a division.
pub async fn get_division_handler(
    State(state): State<AppState>,
    Path(division_id): Path<Uuid>,
) -> AppResult<Json<DivisionResponse>> {
    let division = org::get_division(&state.pool, division_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Division not found".into()))?;
    Ok(Json(division.into()))
}

/// `PUT /api/divisions/{id}` — update a division. The parent
/// department is fixed at creation.
pub async fn update_division_handler(
    State(state): State<AppState>,
    Path(division_id): Path<Uuid>,
    Json(body): Json<UpdateDivisionRequest>,
) -> AppResult<Json<DivisionResponse>> {
    let division = org::update_division(
        &state.pool,
        division_id,
        OrgNodeUpdate {
            name: body.name,
            description: body.description,
            is_active: body.is_active,
        },
    )
    .await?;
    Ok(Json(division.into()))
}

/// `DELETE /api/divisions/{id}` — delete a division with no units,
/// users, or documents attached.
pub async fn delete_division_handler(
    State(state): State<AppState>,
    Path(division_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    org::delete_division(&state.pool, division_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
