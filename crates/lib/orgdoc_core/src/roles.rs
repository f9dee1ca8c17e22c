//! Role registry: named bundles of capability flags.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::constraint;
use crate::models::role::{NewRole, RoleRow, RoleUpdate};

/// Role registry errors.
#[derive(Debug, Error)]
pub enum RoleError {
    #[error("Role not found")]
    NotFound,

    #[error("Role name already exists")]
    AlreadyExists,

    #[error("Role is still assigned to users")]
    HasDependents,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Create a role. Names are unique; the check here is advisory and the
/// unique index is authoritative.
pub async fn create_role(pool: &PgPool, input: NewRole) -> Result<RoleRow, RoleError> {
    let name = nonempty_name(&input.name)?;
    if role_name_exists(pool, &name).await? {
        return Err(RoleError::AlreadyExists);
    }
    let row = sqlx::query_as::<_, RoleRow>(
        r#"
        INSERT INTO roles (id, name, description, can_upload_document, can_delete_document)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, description, can_upload_document, can_delete_document
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(&input.description)
    .bind(input.can_upload_document)
    .bind(input.can_delete_document)
    .fetch_one(pool)
    .await
    .map_err(map_write_error)?;
    Ok(row)
}

/// Fetch a role by ID.
pub async fn get_role(pool: &PgPool, role_id: Uuid) -> Result<Option<RoleRow>, RoleError> {
    let row = sqlx::query_as::<_, RoleRow>(
        r#"
        SELECT id, name, description, can_upload_document, can_delete_document
        FROM roles
        WHERE id = $1
        "#,
    )
    .bind(role_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// List all roles, ordered by name.
pub async fn list_roles(pool: &PgPool) -> Result<Vec<RoleRow>, RoleError> {
    let rows = sqlx::query_as::<_, RoleRow>(
        r#"
        SELECT id, name, description, can_upload_document, can_delete_document
        FROM roles
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Update a role's fields. Only non-None fields change.
pub async fn update_role(
    pool: &PgPool,
    role_id: Uuid,
    update: RoleUpdate,
) -> Result<RoleRow, RoleError> {
    let name = match update.name {
        Some(raw) => Some(nonempty_name(&raw)?),
        None => None,
    };
    let row = sqlx::query_as::<_, RoleRow>(
        r#"
        UPDATE roles SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            can_upload_document = COALESCE($4, can_upload_document),
            can_delete_document = COALESCE($5, can_delete_document)
        WHERE id = $1
        RETURNING id, name, description, can_upload_document, can_delete_document
        "#,
    )
    .bind(role_id)
    .bind(name)
    .bind(update.description)
    .bind(update.can_upload_document)
    .bind(update.can_delete_document)
    .fetch_optional(pool)
    .await
    .map_err(map_write_error)?
    .ok_or(RoleError::NotFound)?;
    Ok(row)
}

/// Delete a role. Blocked while any user still references it.
pub async fn delete_role(pool: &PgPool, role_id: Uuid) -> Result<(), RoleError> {
    let result = sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(role_id)
        .execute(pool)
        .await
        .map_err(map_write_error)?;
    if result.rows_affected() == 0 {
        return Err(RoleError::NotFound);
    }
    Ok(())
}

/// Check whether a role name is taken.
pub async fn role_name_exists(pool: &PgPool, name: &str) -> Result<bool, RoleError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM roles WHERE name = $1)")
            .bind(name)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

fn nonempty_name(raw: &str) -> Result<String, RoleError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RoleError::Validation("Role name must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

fn map_write_error(e: sqlx::Error) -> RoleError {
    if constraint::is_unique_violation(&e) {
        return RoleError::AlreadyExists;
    }
    if constraint::is_foreign_key_violation(&e) {
        return RoleError::HasDependents;
    }
    RoleError::Db(e)
}
