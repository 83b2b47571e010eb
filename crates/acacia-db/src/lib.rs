//! # acacia-db: Database Layer for Acacia Inventory
//!
//! SQLite persistence for the item catalog, daily snapshots and the
//! transaction ledger, plus the [`InventorySource`](acacia_core::InventorySource)
//! implementation the reconciliation engine reads through.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Acacia Inventory Data Flow                          │
//! │                                                                         │
//! │  Presentation layer: GET daily inventory for 2024-03-02                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ReconciliationEngine<Database>  (acacia-core)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     acacia-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐  ┌──────────────┐  │   │
//! │  │   │   Database    │    │   Repositories   │  │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                  │  │  (embedded)  │  │   │
//! │  │   │               │    │ ItemRepository   │  │              │  │   │
//! │  │   │ SqlitePool    │◄───│ SnapshotRepo     │  │ 001_initial_ │  │   │
//! │  │   │ + source impl │    │ TransactionRepo  │  │   schema.sql │  │   │
//! │  │   └───────────────┘    └──────────────────┘  └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (platform data dir, or ACACIA_DATABASE_PATH)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Configuration loading (file, environment, defaults)
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Catalog, snapshot and ledger repositories
//! - `source` - `InventorySource` for [`Database`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use acacia_db::{Database, InventoryConfig};
//!
//! let config = InventoryConfig::load(None)?;
//! let db = Database::new(config.db_config()).await?;
//!
//! let report = db.engine(config.timezone()?).daily_report("2024-03-02").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
mod source;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, InventoryConfig};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::item::ItemRepository;
pub use repository::snapshot::SnapshotRepository;
pub use repository::transaction::TransactionRepository;
