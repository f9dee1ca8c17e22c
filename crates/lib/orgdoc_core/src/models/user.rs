//! User registry domain models.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Database row for `users`.
///
/// Carries the bcrypt digest, so this type never leaves the core crate
/// in API responses; `orgdoc_api` builds its own views from it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: Uuid,
    pub department_id: Option<Uuid>,
    pub division_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user. `password` is the plaintext candidate; it
/// is checked against the complexity rules and hashed before anything
/// touches the database.
#[derive(Debug, Clone)]
pub struct NewUser {
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

/// Partial update for a user.
///
/// `None` leaves a field untouched. The placement fields use a second
/// `Option` so callers can clear a placement (`Some(None)`) as well as
/// reassign it (`Some(Some(id))`).
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role_id: Option<Uuid>,
    pub department_id: Option<Option<Uuid>>,
    pub division_id: Option<Option<Uuid>>,
    pub unit_id: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
}

/// Optional filters for listing users. Absent fields do not constrain
/// the result set.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub role_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub division_id: Option<Uuid>,
    pub unit_id: Option<Uuid>,
    pub is_active: Option<bool>,
}
