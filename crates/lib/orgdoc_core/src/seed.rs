//! Demo data seeding.
//!
//! Populates a database with a small organisation, a handful of
//! accounts, and a few documents for local development. Idempotent:
//! every insert is keyed on its natural unique constraint, so running
//! the seed twice leaves the data unchanged.

use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthError;
use crate::auth::password::PasswordDigest;
use crate::models::document::PrivacyScope;

/// Password shared by every demo account.
pub const DEMO_PASSWORD: &str = "Admin123!";

/// Errors that can occur while seeding demo data.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Seeds demo roles, the organisation tree, user accounts, and documents.
pub async fn seed_demo(pool: &PgPool) -> Result<(), SeedError> {
    let admin_role = ensure_role(pool, "admin", "Full document management", true, true).await?;
    let contributor_role =
        ensure_role(pool, "contributor", "Can upload documents", true, false).await?;
    let viewer_role = ensure_role(pool, "viewer", "Read-only access", false, false).await?;

    let engineering = ensure_department(pool, "Engineering").await?;
    let operations = ensure_department(pool, "Operations").await?;

    let platform = ensure_division(pool, engineering, "Platform").await?;
    let product = ensure_division(pool, engineering, "Product").await?;
    let logistics = ensure_division(pool, operations, "Logistics").await?;

    let storage = ensure_unit(pool, platform, "Storage").await?;
    ensure_unit(pool, platform, "Networking").await?;

    // One bcrypt run covers every demo account.
    let digest = PasswordDigest::from_plaintext_blocking(DEMO_PASSWORD.to_string()).await?;

    let admin = ensure_user(
        pool, &digest, "admin", "admin@orgdoc.local", "Ada", "Admin", admin_role, None, None, None,
    )
    .await?;
    let asmith = ensure_user(
        pool,
        &digest,
        "asmith",
        "asmith@orgdoc.local",
        "Alex",
        "Smith",
        contributor_role,
        Some(engineering),
        Some(platform),
        Some(storage),
    )
    .await?;
    ensure_user(
        pool,
        &digest,
        "bjones",
        "bjones@orgdoc.local",
        "Blair",
        "Jones",
        viewer_role,
        Some(engineering),
        Some(product),
        None,
    )
    .await?;
    ensure_user(
        pool,
        &digest,
        "cdavis",
        "cdavis@orgdoc.local",
        "Casey",
        "Davis",
        viewer_role,
        Some(operations),
        Some(logistics),
        None,
    )
    .await?;

    ensure_document(
        pool,
        "Employee handbook",
        "Policies and onboarding material",
        "/docs/employee-handbook.pdf",
        "application/pdf",
        482_133,
        admin,
        PrivacyScope::Public,
        None,
        None,
        None,
    )
    .await?;
    ensure_document(
        pool,
        "Platform roadmap",
        "Quarterly planning for the Platform division",
        "/docs/platform-roadmap.pdf",
        "application/pdf",
        204_800,
        asmith,
        PrivacyScope::Division,
        None,
        Some(platform),
        None,
    )
    .await?;
    ensure_document(
        pool,
        "Storage runbook",
        "Operational procedures for the Storage unit",
        "/docs/storage-runbook.md",
        "text/markdown",
        31_744,
        asmith,
        PrivacyScope::Unit,
        None,
        None,
        Some(storage),
    )
    .await?;

    info!("demo data seeded");
    Ok(())
}

async fn ensure_role(
    pool: &PgPool,
    name: &str,
    description: &str,
    can_upload: bool,
    can_delete: bool,
) -> Result<Uuid, SeedError> {
    sqlx::query(
        r#"
        INSERT INTO roles (id, name, description, can_upload_document, can_delete_document)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (name) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(description)
    .bind(can_upload)
    .bind(can_delete)
    .execute(pool)
    .await?;

    let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM roles WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn ensure_department(pool: &PgPool, name: &str) -> Result<Uuid, SeedError> {
    sqlx::query(
        r#"
        INSERT INTO departments (id, name)
        VALUES ($1, $2)
        ON CONFLICT (name) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .execute(pool)
    .await?;

    let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM departments WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn ensure_division(pool: &PgPool, department_id: Uuid, name: &str) -> Result<Uuid, SeedError> {
    sqlx::query(
        r#"
        INSERT INTO divisions (id, department_id, name)
        VALUES ($1, $2, $3)
        ON CONFLICT (department_id, name) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(department_id)
    .bind(name)
    .execute(pool)
    .await?;

    let id = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM divisions WHERE department_id = $1 AND name = $2",
    )
    .bind(department_id)
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn ensure_unit(pool: &PgPool, division_id: Uuid, name: &str) -> Result<Uuid, SeedError> {
    sqlx::query(
        r#"
        INSERT INTO units (id, division_id, name)
        VALUES ($1, $2, $3)
        ON CONFLICT (division_id, name) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(division_id)
    .bind(name)
    .execute(pool)
    .await?;

    let id =
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM units WHERE division_id = $1 AND name = $2")
            .bind(division_id)
            .bind(name)
            .fetch_one(pool)
            .await?;
    Ok(id)
}

#[allow(clippy::too_many_arguments)]
async fn ensure_user(
    pool: &PgPool,
    digest: &PasswordDigest,
    username: &str,
    email: &str,
    first_name: &str,
    last_name: &str,
    role_id: Uuid,
    department_id: Option<Uuid>,
    division_id: Option<Uuid>,
    unit_id: Option<Uuid>,
) -> Result<Uuid, SeedError> {
    sqlx::query(
        r#"
        INSERT INTO users (
            id, username, email, password_hash, first_name, last_name,
            role_id, department_id, division_id, unit_id, is_active
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, true)
        ON CONFLICT (username) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(digest.as_str())
    .bind(first_name)
    .bind(last_name)
    .bind(role_id)
    .bind(department_id)
    .bind(division_id)
    .bind(unit_id)
    .execute(pool)
    .await?;

    let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

#[allow(clippy::too_many_arguments)]
async fn ensure_document(
    pool: &PgPool,
    title: &str,
    description: &str,
    file_path: &str,
    file_type: &str,
    file_size: i64,
    creator_id: Uuid,
    privacy_scope: PrivacyScope,
    department_id: Option<Uuid>,
    division_id: Option<Uuid>,
    unit_id: Option<Uuid>,
) -> Result<(), SeedError> {
    sqlx::query(
        r#"
        INSERT INTO documents (
            id, title, description, file_path, file_type, file_size,
            creator_id, privacy_scope, department_id, division_id, unit_id,
            version_number, is_active
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 1, true)
        ON CONFLICT (title, version_number) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(description)
    .bind(file_path)
    .bind(file_type)
    .bind(file_size)
    .bind(creator_id)
    .bind(privacy_scope)
    .bind(department_id)
    .bind(division_id)
    .bind(unit_id)
    .execute(pool)
    .await?;
    Ok(())
}
