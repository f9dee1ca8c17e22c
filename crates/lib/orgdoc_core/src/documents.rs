//! Document store: upload, scoped retrieval, search, versioning,
//! soft delete.
//!
//! Every read path repeats the visibility predicate from
//! [`crate::authz`] in SQL, so a caller can never page past a document
//! the engine would deny. An invisible document behaves exactly like a
//! missing one.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::constraint;
use crate::models::document::{
    DocumentFilter, DocumentRow, NewDocument, NewDocumentVersion, PrivacyScope,
};
use crate::models::user::UserRow;

/// Document store errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document not found")]
    NotFound,

    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("{0} does not exist")]
    InvalidReference(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Create a document as version 1 of its title.
///
/// The title is the logical document identity, so a duplicate title
/// fails with `AlreadyExists`; new revisions of an existing title go
/// through [`add_version`].
pub async fn create_document(
    pool: &PgPool,
    creator_id: Uuid,
    input: NewDocument,
) -> Result<DocumentRow, DocumentError> {
    let title = validate_new_document(&input)?;
    let row = sqlx::query_as::<_, DocumentRow>(
        r#"
        INSERT INTO documents (id, title, description, file_path, file_type, file_size,
                               creator_id, privacy_scope, department_id, division_id, unit_id,
                               version_number, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 1, true)
        RETURNING id, title, description, file_path, file_type, file_size, uploaded_at,
                  creator_id, privacy_scope, department_id, division_id, unit_id,
                  version_number, is_active
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&title)
    .bind(&input.description)
    .bind(&input.file_path)
    .bind(&input.file_type)
    .bind(input.file_size)
    .bind(creator_id)
    .bind(input.privacy_scope)
    .bind(input.department_id)
    .bind(input.division_id)
    .bind(input.unit_id)
    .fetch_one(pool)
    .await
    .map_err(|e| map_write_error(e, "Document title"))?;
    Ok(row)
}

/// Fetch a document by ID if `viewer` may see it. Inactive or invisible
/// documents come back as `None`; the caller cannot tell which.
pub async fn get_document_visible(
    pool: &PgPool,
    viewer: &UserRow,
    document_id: Uuid,
) -> Result<Option<DocumentRow>, DocumentError> {
    let row = sqlx::query_as::<_, DocumentRow>(
        r#"
        SELECT id, title, description, file_path, file_type, file_size, uploaded_at,
               creator_id, privacy_scope, department_id, division_id, unit_id,
               version_number, is_active
        FROM documents
        WHERE id = $1
          AND is_active = true
          AND (
            privacy_scope = 'public'
            OR (privacy_scope = 'department' AND department_id = $2)
            OR (privacy_scope = 'division' AND division_id = $3)
            OR (privacy_scope = 'unit' AND unit_id = $4)
          )
        "#,
    )
    .bind(document_id)
    .bind(viewer.department_id)
    .bind(viewer.division_id)
    .bind(viewer.unit_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// List documents visible to `viewer`, newest first.
pub async fn list_documents(
    pool: &PgPool,
    viewer: &UserRow,
    filter: &DocumentFilter,
) -> Result<Vec<DocumentRow>, DocumentError> {
    let rows = sqlx::query_as::<_, DocumentRow>(
        r#"
        SELECT id, title, description, file_path, file_type, file_size, uploaded_at,
               creator_id, privacy_scope, department_id, division_id, unit_id,
               version_number, is_active
        FROM documents
        WHERE is_active = true
          AND ($1::uuid IS NULL OR creator_id = $1)
          AND ($2::privacy_scope IS NULL OR privacy_scope = $2)
          AND ($3::uuid IS NULL OR department_id = $3)
          AND ($4::uuid IS NULL OR division_id = $4)
          AND ($5::uuid IS NULL OR unit_id = $5)
          AND ($6::text IS NULL OR file_type = $6)
          AND (
            privacy_scope = 'public'
            OR (privacy_scope = 'department' AND department_id = $7)
            OR (privacy_scope = 'division' AND division_id = $8)
            OR (privacy_scope = 'unit' AND unit_id = $9)
          )
        ORDER BY uploaded_at DESC
        "#,
    )
    .bind(filter.creator_id)
    .bind(filter.privacy_scope)
    .bind(filter.department_id)
    .bind(filter.division_id)
    .bind(filter.unit_id)
    .bind(&filter.file_type)
    .bind(viewer.department_id)
    .bind(viewer.division_id)
    .bind(viewer.unit_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Search visible documents by a case-insensitive term over title and
/// description, with the same filters as [`list_documents`].
pub async fn search_documents(
    pool: &PgPool,
    viewer: &UserRow,
    term: &str,
    filter: &DocumentFilter,
) -> Result<Vec<DocumentRow>, DocumentError> {
    let pattern = like_pattern(term);
    let rows = sqlx::query_as::<_, DocumentRow>(
        r#"
        SELECT id, title, description, file_path, file_type, file_size, uploaded_at,
               creator_id, privacy_scope, department_id, division_id, unit_id,
               version_number, is_active
        FROM documents
        WHERE is_active = true
          AND (title ILIKE $1 OR description ILIKE $1)
          AND ($2::uuid IS NULL OR creator_id = $2)
          AND ($3::privacy_scope IS NULL OR privacy_scope = $3)
          AND ($4::uuid IS NULL OR department_id = $4)
          AND ($5::uuid IS NULL OR division_id = $5)
          AND ($6::uuid IS NULL OR unit_id = $6)
          AND ($7::text IS NULL OR file_type = $7)
          AND (
            privacy_scope = 'public'
            OR (privacy_scope = 'department' AND department_id = $8)
            OR (privacy_scope = 'division' AND division_id = $9)
            OR (privacy_scope = 'unit' AND unit_id = $10)
          )
        ORDER BY uploaded_at DESC
        "#,
    )
    .bind(&pattern)
    .bind(filter.creator_id)
    .bind(filter.privacy_scope)
    .bind(filter.department_id)
    .bind(filter.division_id)
    .bind(filter.unit_id)
    .bind(&filter.file_type)
    .bind(viewer.department_id)
    .bind(viewer.division_id)
    .bind(viewer.unit_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Add a revision of `source`. Title, scope and placement are copied
/// from the source row; the version number is computed as max+1 inside
/// the insert, so concurrent revisions of one title cannot both land on
/// the same number. The loser of that race gets `AlreadyExists` and can
/// retry.
pub async fn add_version(
    pool: &PgPool,
    source: &DocumentRow,
    creator_id: Uuid,
    input: NewDocumentVersion,
) -> Result<DocumentRow, DocumentError> {
    validate_file_fields(&input.file_path, &input.file_type, input.file_size)?;
    let row = sqlx::query_as::<_, DocumentRow>(
        r#"
        INSERT INTO documents (id, title, description, file_path, file_type, file_size,
                               creator_id, privacy_scope, department_id, division_id, unit_id,
                               version_number, is_active)
        SELECT $2, d.title, $3, $4, $5, $6, $7, d.privacy_scope,
               d.department_id, d.division_id, d.unit_id,
               (SELECT MAX(version_number) FROM documents WHERE title = d.title) + 1, true
        FROM documents d
        WHERE d.id = $1 AND d.is_active = true
        RETURNING id, title, description, file_path, file_type, file_size, uploaded_at,
                  creator_id, privacy_scope, department_id, division_id, unit_id,
                  version_number, is_active
        "#,
    )
    .bind(source.id)
    .bind(Uuid::new_v4())
    .bind(&input.description)
    .bind(&input.file_path)
    .bind(&input.file_type)
    .bind(input.file_size)
    .bind(creator_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| map_write_error(e, "Document version"))?
    .ok_or(DocumentError::NotFound)?;
    Ok(row)
}

/// List all visible versions of a title, newest version first.
pub async fn list_versions(
    pool: &PgPool,
    viewer: &UserRow,
    title: &str,
) -> Result<Vec<DocumentRow>, DocumentError> {
    let rows = sqlx::query_as::<_, DocumentRow>(
        r#"
        SELECT id, title, description, file_path, file_type, file_size, uploaded_at,
               creator_id, privacy_scope, department_id, division_id, unit_id,
               version_number, is_active
        FROM documents
        WHERE title = $1
          AND is_active = true
          AND (
            privacy_scope = 'public'
            OR (privacy_scope = 'department' AND department_id = $2)
            OR (privacy_scope = 'division' AND division_id = $3)
            OR (privacy_scope = 'unit' AND unit_id = $4)
          )
        ORDER BY version_number DESC
        "#,
    )
    .bind(title)
    .bind(viewer.department_id)
    .bind(viewer.division_id)
    .bind(viewer.unit_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Soft-delete a document. The row stays for version history; it
/// disappears from every visibility-checked read.
pub async fn deactivate_document(pool: &PgPool, document_id: Uuid) -> Result<(), DocumentError> {
    let result = sqlx::query("UPDATE documents SET is_active = false WHERE id = $1")
        .bind(document_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DocumentError::NotFound);
    }
    Ok(())
}

fn validate_new_document(input: &NewDocument) -> Result<String, DocumentError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(DocumentError::Validation(
            "Document title must not be empty".into(),
        ));
    }
    validate_file_fields(&input.file_path, &input.file_type, input.file_size)?;
    let missing = match input.privacy_scope {
        PrivacyScope::Public => None,
        PrivacyScope::Department if input.department_id.is_none() => Some("department"),
        PrivacyScope::Division if input.division_id.is_none() => Some("division"),
        PrivacyScope::Unit if input.unit_id.is_none() => Some("unit"),
        _ => None,
    };
    if let Some(level) = missing {
        return Err(DocumentError::Validation(format!(
            "A {level}-scoped document requires a {level} reference"
        )));
    }
    Ok(title.to_string())
}

fn validate_file_fields(
    file_path: &str,
    file_type: &str,
    file_size: i64,
) -> Result<(), DocumentError> {
    if file_path.trim().is_empty() {
        return Err(DocumentError::Validation(
            "File path must not be empty".into(),
        ));
    }
    if file_type.trim().is_empty() {
        return Err(DocumentError::Validation(
            "File type must not be empty".into(),
        ));
    }
    if file_size < 0 {
        return Err(DocumentError::Validation(
            "File size must not be negative".into(),
        ));
    }
    Ok(())
}

fn map_write_error(e: sqlx::Error, duplicate: &str) -> DocumentError {
    if constraint::is_unique_violation(&e) {
        return DocumentError::AlreadyExists(duplicate.to_string());
    }
    if constraint::is_foreign_key_violation(&e) {
        let field = match constraint::constraint_name(&e) {
            Some("documents_creator_id_fkey") => "Creator",
            Some("documents_department_id_fkey") => "Department",
            Some("documents_division_id_fkey") => "Division",
            Some("documents_unit_id_fkey") => "Unit",
            _ => "Referenced entity",
        };
        return DocumentError::InvalidReference(field.to_string());
    }
    DocumentError::Db(e)
}

/// Build an ILIKE pattern, escaping the wildcard characters so a
/// search for `100%` matches the literal string.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
