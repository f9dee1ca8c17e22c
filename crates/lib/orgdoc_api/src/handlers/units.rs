//! Unit request handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use orgdoc_core::models::org::{OrgNodeUpdate, UnitRow};
use orgdoc_core::org;

use crate::AppState;
use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUnitRequest {
    pub name: String,
    pub description: Option<String>,
    pub division_id: Uuid,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUnitRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUnitsQuery {
    pub division_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub division_id: Uuid,
    pub is_active: bool,
}

impl From<UnitRow> for UnitResponse {
    fn from(r: UnitRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            division_id: r.division_id,
            is_active: r.is_active,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/units` — list units, optionally per division.
pub async fn list_units_handler(
    State(state): State<AppState>,
    Query(query): Query<ListUnitsQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let units: Vec<UnitResponse> =
        org::list_units(&state.pool, query.division_id, query.is_active)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
    Ok(Json(serde_json::json!({ "units": units })))
}

/// `POST /api/units` — create a unit under a division.
pub async fn create_unit_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateUnitRequest>,
) -> AppResult<(StatusCode, Json<UnitResponse>)> {
    let unit = org::create_unit(
        &state.pool,
        &body.name,
        body.description.as_deref(),
        body.division_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(unit.into())))
}

/// `GET /api/units/{id}` — fetch a unit.
pub async fn get_unit_handler(
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<UnitResponse>> {
    let unit = org::get_unit(&state.pool, unit_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Unit not found".into()))?;
    Ok(Json(unit.into()))
}

/// `PUT /api/units/{id}` — update a unit. The parent division is
/// fixed at creation.
pub async fn update_unit_handler(
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
    Json(body): Json<UpdateUnitRequest>,
) -> AppResult<Json<UnitResponse>> {
    let unit = org::update_unit(
        &state.pool,
        unit_id,
        OrgNodeUpdate {
            name: body.name,
            description: body.description,
            is_active: body.is_active,
        },
    )
    .await?;
    Ok(Json(unit.into()))
}

/// `DELETE /api/units/{id}` — delete a unit with no users or
/// documents attached.
pub async fn delete_unit_handler(
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    org::delete_unit(&state.pool, unit_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
