//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)        ValidationError (acacia-core)        │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  DbError (this module) ← Adds context and categorization                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CoreError (when read through InventorySource)                          │
//! │       │   NotFound on an item  → ItemNotFound                           │
//! │       │   Validation           → InvalidArgument                        │
//! │       │   anything else        → DataAccess { operation, message }      │
//! │       ▼                                                                 │
//! │  Presentation layer maps to 400 / 404 / 500                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use acacia_core::{CoreError, ValidationError};
use thiserror::Error;

/// Entity label used for catalog rows in [`DbError::NotFound`].
pub const ITEM_ENTITY: &str = "InventoryItem";

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - ID doesn't exist
    /// - Update or soft delete touched zero rows
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a duplicate item name
    /// - A second snapshot for the same (item, date)
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Ledger entry or snapshot referencing a non-existent item
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Input rejected before touching the database.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns true for a unique constraint violation.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DbError::UniqueViolation { .. })
    }

    /// Converts into a [`CoreError`], tagging store failures with the
    /// collaborator operation that hit them.
    pub fn into_core(self, operation: &'static str) -> CoreError {
        match self {
            DbError::NotFound { entity, id } if entity == ITEM_ENTITY => {
                CoreError::ItemNotFound(id)
            }
            DbError::Validation(err) => CoreError::InvalidArgument(err),
            other => CoreError::data_access(operation, other.to_string()),
        }
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: <table>.<column>[, <table>.<column>]"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        err.into_core("database")
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_not_found_maps_to_core() {
        let err = DbError::not_found(ITEM_ENTITY, 42).into_core("get_item");
        assert!(matches!(err, CoreError::ItemNotFound(ref id) if id == "42"));
    }

    #[test]
    fn test_other_not_found_is_data_access() {
        let err = DbError::not_found("DailySnapshot", "abc").into_core("get_snapshot");
        match err {
            CoreError::DataAccess { operation, message } => {
                assert_eq!(operation, "get_snapshot");
                assert!(message.contains("DailySnapshot"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_validation_maps_to_invalid_argument() {
        let err: CoreError = DbError::from(ValidationError::Required {
            field: "name".to_string(),
        })
        .into();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_pool_errors_are_data_access() {
        let err: CoreError = DbError::from(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(err, CoreError::DataAccess { operation: "database", .. }));

        let err: CoreError = DbError::from(sqlx::Error::PoolClosed).into();
        assert!(matches!(err, CoreError::DataAccess { .. }));
    }

    #[test]
    fn test_duplicate_helper() {
        let err = DbError::duplicate("inventory_items.name", "Flour");
        assert!(err.is_duplicate());
        assert_eq!(
            err.to_string(),
            "Duplicate inventory_items.name: 'Flour' already exists"
        );
    }
}
