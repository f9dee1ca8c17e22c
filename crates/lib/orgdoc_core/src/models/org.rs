//! Organisational hierarchy domain models.
//!
//! The hierarchy is Department > Division > Unit. Each level references
//! its parent, and users or documents reference at most one node per
//! level. Names are unique among siblings, not globally.

use uuid::Uuid;

/// Database row for `departments` (top level, no parent).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DepartmentRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
}

/// Database row for `divisions`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DivisionRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub department_id: Uuid,
    pub is_active: bool,
}

/// Database row for `units`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UnitRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub division_id: Uuid,
    pub is_active: bool,
}

/// Partial update shared by all three hierarchy levels. Reparenting is
/// not supported; a mis-filed node is deleted and recreated.
#[derive(Debug, Clone, Default)]
pub struct OrgNodeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
