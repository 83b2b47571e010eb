//! # Error Types
//!
//! Domain-specific error types for acacia-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  acacia-core errors (this file)                                        │
//! │  ├── CoreError        - Engine / domain errors                         │
//! │  │   ├── InvalidArgument  (bad or missing target date, bad input)      │
//! │  │   └── DataAccess       (a collaborator read failed)                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  acacia-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError ← DbError → presentation layer      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Absence vs. Failure
//! A missing snapshot or an empty ledger is NOT an error: the engine has a
//! defined fallback for it. A collaborator that fails to answer is an error
//! and is surfaced as [`CoreError::DataAccess`], never papered over with
//! zeroes.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The caller supplied an argument the engine cannot work with.
    ///
    /// ## When This Occurs
    /// - Target date is missing or blank
    /// - Target date cannot be parsed
    /// - The previous day of the target date is not representable
    ///
    /// No collaborator is contacted when this is returned.
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    /// Inventory item cannot be found.
    #[error("Inventory item not found: {0}")]
    ItemNotFound(String),

    /// A collaborator (catalog, snapshot store, ledger) failed to answer.
    ///
    /// ## Retry Policy
    /// The engine does not retry. The caller decides.
    #[error("Data access failed during {operation}: {message}")]
    DataAccess {
        operation: &'static str,
        message: String,
    },
}

impl CoreError {
    /// Creates a DataAccess error for the named collaborator operation.
    pub fn data_access(operation: &'static str, message: impl Into<String>) -> Self {
        CoreError::DataAccess {
            operation,
            message: message.into(),
        }
    }

    /// Returns true if the caller sent something unusable.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, CoreError::InvalidArgument(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Stock quantities can never be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., unparsable date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
