//! Organisational hierarchy: departments, divisions, units.
//!
//! Division and unit creation checks that the parent resolves; name
//! uniqueness is scoped to the immediate parent (department names are
//! global). Deleting a node with dependents fails rather than
//! cascading. All of these are backed by schema constraints; the
//! read-before-write checks only improve the error messages.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::constraint;
use crate::models::org::{DepartmentRow, DivisionRow, OrgNodeUpdate, UnitRow};

/// Hierarchy errors.
#[derive(Debug, Error)]
pub enum OrgError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Parent {0} does not exist")]
    InvalidParent(&'static str),

    #[error("{0} name already exists in this scope")]
    AlreadyExists(&'static str),

    #[error("{0} still has dependent records")]
    HasDependents(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

// =============================================================================
// Departments
// =============================================================================

/// Create a department. Department names are globally unique.
pub async fn create_department(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
) -> Result<DepartmentRow, OrgError> {
    let name = nonempty_name(name, "Department")?;
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM departments WHERE name = $1)",
    )
    .bind(&name)
    .fetch_one(pool)
    .await?;
    if taken {
        return Err(OrgError::AlreadyExists("Department"));
    }
    let row = sqlx::query_as::<_, DepartmentRow>(
        r#"
        INSERT INTO departments (id, name, description, is_active)
        VALUES ($1, $2, $3, true)
        RETURNING id, name, description, is_active
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(description)
    .fetch_one(pool)
    .await
    .map_err(|e| map_write_error(e, "Department", None))?;
    Ok(row)
}

/// Fetch a department by ID.
pub async fn get_department(
    pool: &PgPool,
    department_id: Uuid,
) -> Result<Option<DepartmentRow>, OrgError> {
    let row = sqlx::query_as::<_, DepartmentRow>(
        "SELECT id, name, description, is_active FROM departments WHERE id = $1",
    )
    .bind(department_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// List departments by name, optionally filtered on the active flag.
pub async fn list_departments(
    pool: &PgPool,
    is_active: Option<bool>,
) -> Result<Vec<DepartmentRow>, OrgError> {
    let rows = sqlx::query_as::<_, DepartmentRow>(
        r#"
        SELECT id, name, description, is_active
        FROM departments
        WHERE ($1::boolean IS NULL OR is_active = $1)
        ORDER BY name
        "#,
    )
    .bind(is_active)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Update a department's fields. Only non-None fields change.
pub async fn update_department(
    pool: &PgPool,
    department_id: Uuid,
    update: OrgNodeUpdate,
) -> Result<DepartmentRow, OrgError> {
    let name = optional_name(update.name, "Department")?;
    let row = sqlx::query_as::<_, DepartmentRow>(
        r#"
        UPDATE departments SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            is_active = COALESCE($4, is_active)
        WHERE id = $1
        RETURNING id, name, description, is_active
        "#,
    )
    .bind(department_id)
    .bind(name)
    .bind(update.description)
    .bind(update.is_active)
    .fetch_optional(pool)
    .await
    .map_err(|e| map_write_error(e, "Department", None))?
    .ok_or(OrgError::NotFound("Department"))?;
    Ok(row)
}

/// Delete a department. Fails while any division, user or document
/// still references it, regardless of the dependents' active flags.
pub async fn delete_department(pool: &PgPool, department_id: Uuid) -> Result<(), OrgError> {
    let has_children = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM divisions WHERE department_id = $1)",
    )
    .bind(department_id)
    .fetch_one(pool)
    .await?;
    if has_children {
        return Err(OrgError::HasDependents("Department"));
    }
    let result = sqlx::query("DELETE FROM departments WHERE id = $1")
        .bind(department_id)
        .execute(pool)
        .await
        .map_err(|e| map_delete_error(e, "Department"))?;
    if result.rows_affected() == 0 {
        return Err(OrgError::NotFound("Department"));
    }
    Ok(())
}

// =============================================================================
// Divisions
// =============================================================================

/// Create a division under a department. The parent must exist but need
/// not be active; the name must be unique within the department.
pub async fn create_division(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
    department_id: Uuid,
) -> Result<DivisionRow, OrgError> {
    let name = nonempty_name(name, "Division")?;
    let parent_exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM departments WHERE id = $1)",
    )
    .bind(department_id)
    .fetch_one(pool)
    .await?;
    if !parent_exists {
        return Err(OrgError::InvalidParent("Department"));
    }
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM divisions WHERE department_id = $1 AND name = $2)",
    )
    .bind(department_id)
    .bind(&name)
    .fetch_one(pool)
    .await?;
    if taken {
        return Err(OrgError::AlreadyExists("Division"));
    }
    let row = sqlx::query_as::<_, DivisionRow>(
        r#"
        INSERT INTO divisions (id, name, description, department_id, is_active)
        VALUES ($1, $2, $3, $4, true)
        RETURNING id, name, description, department_id, is_active
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(description)
    .bind(department_id)
    .fetch_one(pool)
    .await
    .map_err(|e| map_write_error(e, "Division", Some("Department")))?;
    Ok(row)
}

/// Fetch a division by ID.
pub async fn get_division(
    pool: &PgPool,
    division_id: Uuid,
) -> Result<Option<DivisionRow>, OrgError> {
    let row = sqlx::query_as::<_, DivisionRow>(
        "SELECT id, name, description, department_id, is_active FROM divisions WHERE id = $1",
    )
    .bind(division_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// List divisions by name, optionally scoped to a department.
pub async fn list_divisions(
    pool: &PgPool,
    department_id: Option<Uuid>,
    is_active: Option<bool>,
) -> Result<Vec<DivisionRow>, OrgError> {
    let rows = sqlx::query_as::<_, DivisionRow>(
        r#"
        SELECT id, name, description, department_id, is_active
        FROM divisions
        WHERE ($1::uuid IS NULL OR department_id = $1)
          AND ($2::boolean IS NULL OR is_active = $2)
        ORDER BY name
        "#,
    )
    .bind(department_id)
    .bind(is_active)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Update a division's fields. Only non-None fields change; the parent
/// department is fixed at creation.
pub async fn update_division(
    pool: &PgPool,
    division_id: Uuid,
    update: OrgNodeUpdate,
) -> Result<DivisionRow, OrgError> {
    let name = optional_name(update.name, "Division")?;
    let row = sqlx::query_as::<_, DivisionRow>(
        r#"
        UPDATE divisions SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            is_active = COALESCE($4, is_active)
        WHERE id = $1
        RETURNING id, name, description, department_id, is_active
        "#,
    )
    .bind(division_id)
    .bind(name)
    .bind(update.description)
    .bind(update.is_active)
    .fetch_optional(pool)
    .await
    .map_err(|e| map_write_error(e, "Division", Some("Department")))?
    .ok_or(OrgError::NotFound("Division"))?;
    Ok(row)
}

/// Delete a division. Fails while any unit, user or document still
/// references it.
pub async fn delete_division(pool: &PgPool, division_id: Uuid) -> Result<(), OrgError> {
    let has_children =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM units WHERE division_id = $1)")
            .bind(division_id)
            .fetch_one(pool)
            .await?;
    if has_children {
        return Err(OrgError::HasDependents("Division"));
    }
    let result = sqlx::query("DELETE FROM divisions WHERE id = $1")
        .bind(division_id)
        .execute(pool)
        .await
        .map_err(|e| map_delete_error(e, "Division"))?;
    if result.rows_affected() == 0 {
        return Err(OrgError::NotFound("Division"));
    }
    Ok(())
}

// =============================================================================
// Units
// =============================================================================

/// Create a unit under a division. Same rules as divisions one level
/// down.
pub async fn create_unit(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
    division_id: Uuid,
) -> Result<UnitRow, OrgError> {
    let name = nonempty_name(name, "Unit")?;
    let parent_exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM divisions WHERE id = $1)")
            .bind(division_id)
            .fetch_one(pool)
            .await?;
    if !parent_exists {
        return Err(OrgError::InvalidParent("Division"));
    }
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM units WHERE division_id = $1 AND name = $2)",
    )
    .bind(division_id)
    .bind(&name)
    .fetch_one(pool)
    .await?;
    if taken {
        return Err(OrgError::AlreadyExists("Unit"));
    }
    let row = sqlx::query_as::<_, UnitRow>(
        r#"
        INSERT INTO units (id, name, description, division_id, is_active)
        VALUES ($1, $2, $3, $4, true)
        RETURNING id, name, description, division_id, is_active
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&name)
    .bind(description)
    .bind(division_id)
    .fetch_one(pool)
    .await
    .map_err(|e| map_write_error(e, "Unit", Some("Division")))?;
    Ok(row)
}

/// Fetch a unit by ID.
pub async fn get_unit(pool: &PgPool, unit_id: Uuid) -> Result<Option<UnitRow>, OrgError> {
    let row = sqlx::query_as::<_, UnitRow>(
        "SELECT id, name, description, division_id, is_active FROM units WHERE id = $1",
    )
    .bind(unit_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// List units by name, optionally scoped to a division.
pub async fn list_units(
    pool: &PgPool,
    division_id: Option<Uuid>,
    is_active: Option<bool>,
) -> Result<Vec<UnitRow>, OrgError> {
    let rows = sqlx::query_as::<_, UnitRow>(
        r#"
        SELECT id, name, description, division_id, is_active
        FROM units
        WHERE ($1::uuid IS NULL OR division_id = $1)
          AND ($2::boolean IS NULL OR is_active = $2)
        ORDER BY name
        "#,
    )
    .bind(division_id)
    .bind(is_active)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Update a unit's fields. Only non-None fields change; the parent
/// division is fixed at creation.
pub async fn update_unit(
    pool: &PgPool,
    unit_id: Uuid,
    update: OrgNodeUpdate,
) -> Result<UnitRow, OrgError> {
    let name = optional_name(update.name, "Unit")?;
    let row = sqlx::query_as::<_, UnitRow>(
        r#"
        UPDATE units SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            is_active = COALESCE($4, is_active)
        WHERE id = $1
        RETURNING id, name, description, division_id, is_active
        "#,
    )
    .bind(unit_id)
    .bind(name)
    .bind(update.description)
    .bind(update.is_active)
    .fetch_optional(pool)
    .await
    .map_err(|e| map_write_error(e, "Unit", Some("Division")))?
    .ok_or(OrgError::NotFound("Unit"))?;
    Ok(row)
}

/// Delete a unit. Fails while any user or document still references it.
pub async fn delete_unit(pool: &PgPool, unit_id: Uuid) -> Result<(), OrgError> {
    let result = sqlx::query("DELETE FROM units WHERE id = $1")
        .bind(unit_id)
        .execute(pool)
        .await
        .map_err(|e| map_delete_error(e, "Unit"))?;
    if result.rows_affected() == 0 {
        return Err(OrgError::NotFound("Unit"));
    }
    Ok(())
}

// =============================================================================
// Shared helpers
// =============================================================================

fn nonempty_name(raw: &str, entity: &'static str) -> Result<String, OrgError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(OrgError::Validation(format!(
            "{entity} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn optional_name(raw: Option<String>, entity: &'static str) -> Result<Option<String>, OrgError> {
    match raw {
        Some(name) => Ok(Some(nonempty_name(&name, entity)?)),
        None => Ok(None),
    }
}

fn map_write_error(e: sqlx::Error, entity: &'static str, parent: Option<&'static str>) -> OrgError {
    if constraint::is_unique_violation(&e) {
        return OrgError::AlreadyExists(entity);
    }
    if constraint::is_foreign_key_violation(&e) {
        if let Some(parent) = parent {
            return OrgError::InvalidParent(parent);
        }
    }
    OrgError::Db(e)
}

fn map_delete_error(e: sqlx::Error, entity: &'static str) -> OrgError {
    if constraint::is_foreign_key_violation(&e) {
        return OrgError::HasDependents(entity);
    }
    OrgError::Db(e)
}
