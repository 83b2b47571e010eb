//! # acacia-core: Pure Business Logic for Acacia Inventory
//!
//! This crate is the **heart** of Acacia Inventory: the daily reconciliation
//! engine and everything it needs, as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Acacia Inventory Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Presentation layer (external HTTP API)            │   │
//! │  │       GET daily inventory ──► DailyInventoryReport (JSON)       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ acacia-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ reconcile │  │  report   │  │ low_stock │  │   │
//! │  │   │   Item    │  │  Engine   │  │  groups   │  │ classifier│  │   │
//! │  │   │ Snapshot  │  │ DayInputs │  │  summary  │  │           │  │   │
//! │  │   └───────────┘  └─────┬─────┘  └───────────┘  └───────────┘  │   │
//! │  │                        │ InventorySource (trait)               │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └────────────────────────┼────────────────────────────────────────┘   │
//! │                           │                                             │
//! │  ┌────────────────────────▼────────────────────────────────────────┐   │
//! │  │                  acacia-db (Database Layer)                     │   │
//! │  │        SQLite catalog, daily snapshots, transaction ledger      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, TransactionEvent, DailySnapshot, ...)
//! - [`counts`] - The four daily counters and their clamped arithmetic
//! - [`calendar`] - Operating timezone and calendar-day spans
//! - [`source`] - The collaborator trait the engine reads through
//! - [`reconcile`] - The reconciliation engine
//! - [`report`] - Grouping and summary projection
//! - [`low_stock`] - Low-stock classifier over catalog counters
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same inputs, same output, no side effects
//! 2. **No I/O**: collaborators are reached only through [`InventorySource`]
//! 3. **Integer Counts**: stock is whole units in `i64`, never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use acacia_core::StockCounts;
//!
//! // 30 carried over, 10 received, 5 dispensed
//! let counts = StockCounts::new(30, 10, 5, 0);
//!
//! assert_eq!(counts.total_inventory(), 40);
//! assert_eq!(counts.remaining(), 35);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calendar;
pub mod counts;
pub mod error;
pub mod low_stock;
pub mod reconcile;
pub mod report;
pub mod source;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calendar::{DayRange, OperatingTimezone};
pub use counts::StockCounts;
pub use error::{CoreError, CoreResult, ValidationError};
pub use reconcile::ReconciliationEngine;
pub use report::{DailyInventoryReport, InventorySummary};
pub use source::InventorySource;
pub use types::*;
