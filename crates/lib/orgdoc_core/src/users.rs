//! User registry: registration, lookup, update, deactivation.
//!
//! Deactivation is the terminal state; nothing here hard-deletes a
//! user, so documents keep a resolvable creator and audit trails stay
//! intact.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::AuthError;
use crate::auth::password::PasswordDigest;
use crate::constraint;
use crate::models::role::RoleRow;
use crate::models::user::{NewUser, UserFilter, UserRow, UserUpdate};
use crate::validate;

/// User registry errors.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("{0} does not exist")]
    InvalidReference(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Create a user. The referenced role must pre-exist; placements are
/// optional and independently nullable. The password is validated and
/// hashed before the insert.
pub async fn create_user(pool: &PgPool, input: NewUser) -> Result<UserRow, UserError> {
    let username = validate::normalize_username(&input.username);
    validate::validate_username(&username).map_err(UserError::Validation)?;
    let email = validate::normalize_email(&input.email);
    validate::validate_email(&email).map_err(UserError::Validation)?;
    let first_name = nonempty_name(&input.first_name, "First name")?;
    let last_name = nonempty_name(&input.last_name, "Last name")?;

    // Advisory fast path; the unique indexes are the real guarantee.
    if username_exists(pool, &username).await? {
        return Err(UserError::AlreadyExists("Username".to_string()));
    }
    if email_exists(pool, &email).await? {
        return Err(UserError::AlreadyExists("Email".to_string()));
    }

    let digest = PasswordDigest::from_plaintext_blocking(input.password).await?;

    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, username, email, password_hash, first_name, last_name,
                           role_id, department_id, division_id, unit_id, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, true)
        RETURNING id, username, email, password_hash, first_name, last_name,
                  role_id, department_id, division_id, unit_id,
                  is_active, last_login, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&username)
    .bind(&email)
    .bind(digest.as_str())
    .bind(&first_name)
    .bind(&last_name)
    .bind(input.role_id)
    .bind(input.department_id)
    .bind(input.division_id)
    .bind(input.unit_id)
    .fetch_one(pool)
    .await
    .map_err(map_write_error)?;
    Ok(row)
}

/// Fetch a user by ID.
pub async fn get_user(pool: &PgPool, user_id: Uuid) -> Result<Option<UserRow>, UserError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, email, password_hash, first_name, last_name,
               role_id, department_id, division_id, unit_id,
               is_active, last_login, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Fetch a user together with their role.
pub async fn get_user_with_role(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<(UserRow, RoleRow)>, UserError> {
    let Some(user) = get_user(pool, user_id).await? else {
        return Ok(None);
    };
    let role = sqlx::query_as::<_, RoleRow>(
        r#"
        SELECT id, name, description, can_upload_document, can_delete_document
        FROM roles
        WHERE id = $1
        "#,
    )
    .bind(user.role_id)
    .fetch_one(pool)
    .await?;
    Ok(Some((user, role)))
}

/// List users matching the filter, ordered by username.
pub async fn list_users(pool: &PgPool, filter: &UserFilter) -> Result<Vec<UserRow>, UserError> {
    let rows = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, username, email, password_hash, first_name, last_name,
               role_id, department_id, division_id, unit_id,
               is_active, last_login, created_at, updated_at
        FROM users
        WHERE ($1::uuid IS NULL OR role_id = $1)
          AND ($2::uuid IS NULL OR department_id = $2)
          AND ($3::uuid IS NULL OR division_id = $3)
          AND ($4::uuid IS NULL OR unit_id = $4)
          AND ($5::boolean IS NULL OR is_active = $5)
        ORDER BY username
        "#,
    )
    .bind(filter.role_id)
    .bind(filter.department_id)
    .bind(filter.division_id)
    .bind(filter.unit_id)
    .bind(filter.is_active)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Apply a partial update. Loads the row, merges the changed fields,
/// writes the full column set back. Password changes do not go through
/// here; they have their own paths in [`crate::auth`].
pub async fn update_user(
    pool: &PgPool,
    user_id: Uuid,
    update: UserUpdate,
) -> Result<UserRow, UserError> {
    let Some(current) = get_user(pool, user_id).await? else {
        return Err(UserError::NotFound);
    };

    let username = match update.username {
        Some(raw) => {
            let username = validate::normalize_username(&raw);
            validate::validate_username(&username).map_err(UserError::Validation)?;
            username
        }
        None => current.username,
    };
    let email = match update.email {
        Some(raw) => {
            let email = validate::normalize_email(&raw);
            validate::validate_email(&email).map_err(UserError::Validation)?;
            email
        }
        None => current.email,
    };
    let first_name = match update.first_name {
        Some(raw) => nonempty_name(&raw, "First name")?,
        None => current.first_name,
    };
    let last_name = match update.last_name {
        Some(raw) => nonempty_name(&raw, "Last name")?,
        None => current.last_name,
    };
    let role_id = update.role_id.unwrap_or(current.role_id);
    let department_id = update.department_id.unwrap_or(current.department_id);
    let division_id = update.division_id.unwrap_or(current.division_id);
    let unit_id = update.unit_id.unwrap_or(current.unit_id);
    let is_active = update.is_active.unwrap_or(current.is_active);

    let row = sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET username = $2, email = $3, first_name = $4, last_name = $5,
            role_id = $6, department_id = $7, division_id = $8, unit_id = $9,
            is_active = $10, updated_at = now()
        WHERE id = $1
        RETURNING id, username, email, password_hash, first_name, last_name,
                  role_id, department_id, division_id, unit_id,
                  is_active, last_login, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(&username)
    .bind(&email)
    .bind(&first_name)
    .bind(&last_name)
    .bind(role_id)
    .bind(department_id)
    .bind(division_id)
    .bind(unit_id)
    .bind(is_active)
    .fetch_optional(pool)
    .await
    .map_err(map_write_error)?
    .ok_or(UserError::NotFound)?;
    Ok(row)
}

/// Deactivate a user. Their documents stay; their tokens stop being
/// honored at the next refresh or protected request.
pub async fn deactivate_user(pool: &PgPool, user_id: Uuid) -> Result<(), UserError> {
    let result = sqlx::query("UPDATE users SET is_active = false, updated_at = now() WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(UserError::NotFound);
    }
    Ok(())
}

/// Check whether a normalized username is taken.
pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, UserError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

/// Check whether a normalized email is taken.
pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, UserError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

fn nonempty_name(raw: &str, field: &str) -> Result<String, UserError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UserError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn map_write_error(e: sqlx::Error) -> UserError {
    if constraint::is_unique_violation(&e) {
        let field = match constraint::constraint_name(&e) {
            Some("users_username_key") => "Username",
            Some("users_email_key") => "Email",
            _ => "User",
        };
        return UserError::AlreadyExists(field.to_string());
    }
    if constraint::is_foreign_key_violation(&e) {
        let field = match constraint::constraint_name(&e) {
            Some("users_role_id_fkey") => "Role",
            Some("users_department_id_fkey") => "Department",
            Some("users_division_id_fkey") => "Division",
            Some("users_unit_id_fkey") => "Unit",
            _ => "Referenced entity",
        };
        return UserError::InvalidReference(field.to_string());
    }
    UserError::Db(e)
}
