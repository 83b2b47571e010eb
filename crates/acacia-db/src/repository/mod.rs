//! # Repository Module
//!
//! Database repository implementations for Acacia Inventory.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Caller                                                                 │
//! │       │  db.items().list_active()                                       │
//! │       ▼                                                                 │
//! │  ItemRepository ─────── inventory_items         (catalog)               │
//! │  SnapshotRepository ─── daily_inventory         (closed days)           │
//! │  TransactionRepository ─ inventory_transactions (ledger)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  The reconciliation engine never sees these types. It reads through     │
//! │  InventorySource, which Database implements on top of them.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ItemRepository`](item::ItemRepository) - Catalog CRUD and low-stock listing
//! - [`SnapshotRepository`](snapshot::SnapshotRepository) - Day-close snapshots
//! - [`TransactionRepository`](transaction::TransactionRepository) - Ledger writes and day queries

pub mod item;
pub mod snapshot;
pub mod transaction;
