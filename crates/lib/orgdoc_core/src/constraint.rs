//! Classification of storage-constraint violations.
//!
//! Uniqueness and referential integrity live in the schema; the
//! read-before-write checks in the write paths are advisory only, for
//! friendlier messages. These predicates turn the authoritative
//! constraint errors into the matching domain errors.

use sqlx::error::ErrorKind;

/// True for a unique-constraint violation (duplicate username, email,
/// name within a parent, or title+version pair).
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if matches!(db.kind(), ErrorKind::UniqueViolation))
}

/// True for a foreign-key violation: an insert referencing a missing
/// row, or a delete blocked by dependents.
pub fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if matches!(db.kind(), ErrorKind::ForeignKeyViolation))
}

/// Constraint name reported by the database, when present. Used to
/// point error messages at the offending field.
pub fn constraint_name(e: &sqlx::Error) -> Option<&str> {
    match e {
        sqlx::Error::Database(db) => db.constraint(),
        _ => None,
    }
}
