//! Document domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Privacy scope attached to every document.
///
/// Scoping is flat: a document scoped to a department is visible to
/// users placed in that department only, not to users placed merely in
/// one of its divisions or units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "privacy_scope", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PrivacyScope {
    Public,
    Department,
    Division,
    Unit,
}

/// Database row for `documents`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DocumentRow {
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
    pub is_active: bool,
}

/// Input for uploading a new document (version 1 of its title).
#[derive(Debug, Clone)]
pub struct NewDocument {
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

/// Input for adding a version to an existing document. Title, scope and
/// placement are inherited from the source document.
#[derive(Debug, Clone)]
pub struct NewDocumentVersion {
    pub description: Option<String>,
    pub file_path: String,
    pub file_type: String,
    pub file_size: i64,
}

/// Optional filters for listing and searching documents. Absent fields
/// do not constrain the result set; visibility rules always apply on
/// top of these.
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    pub creator_id: Option<Uuid>,
    pub privacy_scope: Option<PrivacyScope>,
    pub department_id: Option<Uuid>,
    pub division_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub file_type: Option<String>,
}
