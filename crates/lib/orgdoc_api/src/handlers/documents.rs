//! Document request handlers.
//!
//! Every read goes through the visibility predicate in
//! `orgdoc_core::documents`; a document the caller cannot see behaves
//! exactly like one that does not exist.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use orgdoc_core::authz::{self, DocumentAction};
use orgdoc_core::documents;
use orgdoc_core::models::document::{
    DocumentFilter, DocumentRow, NewDocument, NewDocumentVersion, PrivacyScope,
};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::services::auth::load_principal;

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub title: String,
    pub description: Option<String>,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
    pub privacy_scope: PrivacyScope,
    pub department_id: Option<Uuid>,
    pub division_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddVersionRequest {
    pub description: Option<String>,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsQuery {
    pub creator_id: Option<Uuid>,
    pub privacy_scope: Option<PrivacyScope>,
    pub department_id: Option<Uuid>,
    pub division_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub file_type: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocumentsQuery {
    pub q: String,
    pub creator_id: Option<Uuid>,
    pub privacy_scope: Option<PrivacyScope>,
    pub department_id: Option<Uuid>,
    pub division_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub file_type: Option<String>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
    pub creator_id: Uuid,
    pub privacy_scope: PrivacyScope,
    pub department_id: Option<Uuid>,
    pub division_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub version_number: i32,
}

impl From<DocumentRow> for DocumentResponse {
    fn from(r: DocumentRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            file_path: r.file_path,
            file_type: r.file_type,
            file_size: r.file_size,
            uploaded_at: r.uploaded_at,
            creator_id: r.creator_id,
            privacy_scope: r.privacy_scope,
            department_id: r.department_id,
            division_id: r.division_id,
            unit_id: r.unit_id,
            version_number: r.version_number,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/documents` — list documents visible to the caller.
pub async fn list_documents_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<CurrentUser>,
    Query(query): Query<ListDocumentsQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let (viewer, _role) = load_principal(&state.pool, user.id).await?;
    let filter = DocumentFilter {
        creator_id: query.creator_id,
        privacy_scope: query.privacy_scope,
        department_id: query.department_id,
        division_id: query.division_id,
        unit_id: query.unit_id,
        file_type: query.file_type,
    };
    let docs: Vec<DocumentResponse> = documents::list_documents(&state.pool, &viewer, &filter)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(serde_json::json!({ "documents": docs })))
}

/// `GET /api/documents/search` — search visible documents by title or
/// description.
pub async fn search_documents_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<CurrentUser>,
    Query(query): Query<SearchDocumentsQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let (viewer, _role) = load_principal(&state.pool, user.id).await?;
    let filter = DocumentFilter {
        creator_id: query.creator_id,
        privacy_scope: query.privacy_scope,
        department_id: query.department_id,
        division_id: query.division_id,
        unit_id: query.unit_id,
        file_type: query.file_type,
    };
    let docs: Vec<DocumentResponse> =
        documents::search_documents(&state.pool, &viewer, &query.q, &filter)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
    Ok(Json(serde_json::json!({ "documents": docs })))
}

/// `POST /api/documents` — register an uploaded document.
///
/// Requires the upload capability on the caller's role.
pub async fn create_document_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<CurrentUser>,
    Json(body): Json<CreateDocumentRequest>,
) -> AppResult<(StatusCode, Json<DocumentResponse>)> {
    let (viewer, role) = load_principal(&state.pool, user.id).await?;
    if !authz::can_perform(&role, DocumentAction::Upload) {
        return Err(AppError::Forbidden("Role cannot upload documents".into()));
    }

    let doc = documents::create_document(
        &state.pool,
        viewer.id,
        NewDocument {
            title: body.title,
            description: body.description,
            file_path: body.file_path,
            file_type: body.file_type,
            file_size: body.file_size,
            privacy_scope: body.privacy_scope,
            department_id: body.department_id,
            division_id: body.division_id,
            unit_id: body.unit_id,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(doc.into())))
}

/// `GET /api/documents/{id}` — fetch a document the caller can see.
pub async fn get_document_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<CurrentUser>,
    Path(document_id): Path<Uuid>,
) -> AppResult<Json<DocumentResponse>> {
    let (viewer, _role) = load_principal(&state.pool, user.id).await?;
    let doc = documents::get_document_visible(&state.pool, &viewer, document_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".into()))?;
    Ok(Json(doc.into()))
}

/// `POST /api/documents/{id}/versions` — add a new version of a
/// document.
///
/// Requires the upload capability and visibility of the source
/// document. The new version inherits title, scope, and placement.
pub async fn add_version_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<CurrentUser>,
    Path(document_id): Path<Uuid>,
    Json(body): Json<AddVersionRequest>,
) -> AppResult<(StatusCode, Json<DocumentResponse>)> {
    let (viewer, role) = load_principal(&state.pool, user.id).await?;
    if !authz::can_perform(&role, DocumentAction::Upload) {
        return Err(AppError::Forbidden("Role cannot upload documents".into()));
    }

    let source = documents::get_document_visible(&state.pool, &viewer, document_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".into()))?;

    let doc = documents::add_version(
        &state.pool,
        &source,
        viewer.id,
        NewDocumentVersion {
            description: body.description,
            file_path: body.file_path,
            file_type: body.file_type,
            file_size: body.file_size,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(doc.into())))
}

/// `GET /api/documents/{id}/versions` — all active versions sharing
/// the document's title, newest first.
pub async fn list_versions_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<CurrentUser>,
    Path(document_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let (viewer, _role) = load_principal(&state.pool, user.id).await?;
    let doc = documents::get_document_visible(&state.pool, &viewer, document_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".into()))?;

    let versions: Vec<DocumentResponse> =
        documents::list_versions(&state.pool, &viewer, &doc.title)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
    Ok(Json(serde_json::json!({ "versions": versions })))
}

/// `DELETE /api/documents/{id}` — deactivate a document.
///
/// Requires the delete capability, and visibility of the document; a
/// delete capability alone does not let anyone reach into scopes they
/// cannot see.
pub async fn delete_document_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<CurrentUser>,
    Path(document_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let (viewer, role) = load_principal(&state.pool, user.id).await?;

    let doc = documents::get_document_visible(&state.pool, &viewer, document_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".into()))?;

    if !authz::can_perform(&role, DocumentAction::Delete) {
        return Err(AppError::Forbidden("Role cannot delete documents".into()));
    }

    documents::deactivate_document(&state.pool, doc.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
