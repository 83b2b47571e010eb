//! # Inventory Source
//!
//! The read contract the reconciliation engine depends on.
//!
//! ## Collaborators
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ReconciliationEngine<S: InventorySource>                              │
//! │            │                                                            │
//! │            ├── list_active_items()      Item Catalog                    │
//! │            ├── list_snapshots(date)     Daily Snapshot Store (bulk)     │
//! │            ├── get_snapshot(id, date)   Daily Snapshot Store (single)   │
//! │            └── list_transactions(day)   Transaction Ledger              │
//! │                                                                         │
//! │   acacia-db implements this for its SQLite Database handle.            │
//! │   Tests implement it over plain vectors.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract
//! - Absence is not an error: no snapshot → `Ok(None)` / `Ok(vec![])`.
//! - A failed read is `Err(CoreError::DataAccess { .. })`.
//! - All reads made during one reconciliation are assumed to observe a
//!   consistent view of the stores.

use std::future::Future;

use chrono::NaiveDate;

use crate::calendar::DayRange;
use crate::error::CoreResult;
use crate::types::{DailySnapshot, Item, ItemId, TransactionEvent};

/// Read-only access to the catalog, the snapshot store and the ledger.
pub trait InventorySource {
    /// All active items, ordered by (category ASC, name ASC).
    fn list_active_items(&self) -> impl Future<Output = CoreResult<Vec<Item>>> + Send;

    /// The snapshot for one (item, date), if any.
    fn get_snapshot(
        &self,
        item_id: ItemId,
        date: NaiveDate,
    ) -> impl Future<Output = CoreResult<Option<DailySnapshot>>> + Send;

    /// Every snapshot recorded for `date`.
    fn list_snapshots(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = CoreResult<Vec<DailySnapshot>>> + Send;

    /// Every ledger event whose instant falls inside `range` (inclusive).
    fn list_transactions(
        &self,
        range: DayRange,
    ) -> impl Future<Output = CoreResult<Vec<TransactionEvent>>> + Send;
}
