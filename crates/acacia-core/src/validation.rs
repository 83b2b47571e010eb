//! # Validation Module
//!
//! Input validation for the catalog, the ledger and the snapshot store.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation layer (external)                                │
//! │  ├── Deserialization into NewItem / NewTransaction / ...               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE: business rule validation                        │
//! │  ├── Required text fields, length limits                               │
//! │  └── Counters and quantities never negative                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE(name), UNIQUE(item_id, date)                               │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use acacia_core::validation::{validate_item_name, validate_quantity};
//!
//! assert!(validate_item_name("Chicken Breast").is_ok());
//! assert!(validate_quantity(0).is_ok());
//! assert!(validate_quantity(-1).is_err());
//! ```

use crate::counts::StockCounts;
use crate::error::ValidationError;
use crate::types::{ItemUpdate, NewItem, NewSnapshot, NewTransaction};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of an item name.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a unit of measure.
pub const MAX_UNIT_LEN: usize = 30;

/// Maximum length of a category label.
pub const MAX_CATEGORY_LEN: usize = 50;

/// Maximum length of ledger notes.
pub const MAX_NOTES_LEN: usize = 500;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty
/// - At most 100 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_text("name", name, MAX_NAME_LEN)
}

/// Validates a unit of measure.
pub fn validate_unit(unit: &str) -> ValidationResult<()> {
    validate_text("unit", unit, MAX_UNIT_LEN)
}

/// Validates a category label.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    validate_text("category", category, MAX_CATEGORY_LEN)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a ledger quantity.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (a recorded "nothing happened")
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    validate_count("quantity", qty)
}

/// Validates one stock counter.
pub fn validate_count(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates all four counters.
pub fn validate_counts(counts: &StockCounts) -> ValidationResult<()> {
    validate_count("beginning", counts.beginning)?;
    validate_count("in", counts.received)?;
    validate_count("out", counts.dispensed)?;
    validate_count("spoilage", counts.spoilage)?;
    Ok(())
}

// =============================================================================
// Input Validators
// =============================================================================

/// Validates a new catalog item.
pub fn validate_new_item(input: &NewItem) -> ValidationResult<()> {
    validate_item_name(&input.name)?;
    validate_unit(&input.unit)?;
    validate_category(&input.category)?;
    validate_counts(&input.counts())
}

/// Validates the fields an update actually sets.
pub fn validate_item_update(update: &ItemUpdate) -> ValidationResult<()> {
    if let Some(name) = &update.name {
        validate_item_name(name)?;
    }
    if let Some(unit) = &update.unit {
        validate_unit(unit)?;
    }
    if let Some(category) = &update.category {
        validate_category(category)?;
    }

    let counters = [
        ("beginning", update.beginning),
        ("in", update.received),
        ("out", update.dispensed),
        ("spoilage", update.spoilage),
    ];
    for (field, value) in counters {
        if let Some(value) = value {
            validate_count(field, value)?;
        }
    }

    Ok(())
}

/// Validates a ledger entry.
pub fn validate_new_transaction(input: &NewTransaction) -> ValidationResult<()> {
    validate_quantity(input.quantity)?;

    if let Some(notes) = &input.notes {
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(ValidationError::TooLong {
                field: "notes".to_string(),
                max: MAX_NOTES_LEN,
            });
        }
    }

    Ok(())
}

/// Validates a day-close snapshot.
pub fn validate_new_snapshot(input: &NewSnapshot) -> ValidationResult<()> {
    validate_counts(&input.counts())
}

// =============================================================================
// Unit Tests
// =============================================================================
