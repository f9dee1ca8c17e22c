//! Role domain models.
//!
//! Roles are named bundles of capability flags. Placement in the
//! organisational hierarchy lives on the user, not the role.

use uuid::Uuid;

/// Database row for `roles`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoleRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub can_upload_document: bool,
    pub can_delete_document: bool,
}

/// Input for creating a role.
#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub description: Option<String>,
    pub can_upload_document: bool,
    pub can_delete_document: bool,
}

/// Partial update for a role. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub can_upload_document: Option<bool>,
    pub can_delete_document: Option<bool>,
}
