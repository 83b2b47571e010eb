//! # Daily Reconciliation
//!
//! Computes each active item's authoritative numbers for one calendar day.
//!
//! ## Priority Order (per item)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. Snapshot for (item, D)?                                            │
//! │        YES ──► copy it verbatim (remaining as stored)   [snapshot]     │
//! │        NO                                                               │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  2. beginning = snapshot(item, D-1).remaining, else 0                  │
//! │     in / out / spoilage = Σ ledger events on D, by type                │
//! │     ("beginning" events on D are ignored: carryover wins)              │
//! │     total_inventory = beginning + in                                   │
//! │     remaining = max(0, total_inventory - out - spoilage)  [derived]    │
//! │                                                                         │
//! │  3. Nothing on D or D-1 at all ──► the all-zero derived record         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow
//! ```text
//! ReconciliationEngine::compute_for_date(D)
//!      │
//!      ├── list_active_items()                 ─┐
//!      ├── list_snapshots(D), list_snapshots(D-1)  ├─► DayInputs ─► reconcile()
//!      └── list_transactions(D-1), (D)         ─┘        (pure, no I/O)
//! ```
//!
//! The look-back is exactly one day. There is no recursion through older
//! history: a day without a closing snapshot contributes nothing to the next.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::calendar::{parse_target_date, previous_day, DayRange, OperatingTimezone};
use crate::counts::StockCounts;
use crate::error::{CoreError, CoreResult};
use crate::report::DailyInventoryReport;
use crate::source::InventorySource;
use crate::types::{ComputedDailyRecord, DailySnapshot, Item, ItemId, TransactionEvent};

// =============================================================================
// Snapshot Index
// =============================================================================

/// One day's snapshots keyed by item.
#[derive(Debug, Clone, Default)]
pub struct SnapshotIndex {
    by_item: HashMap<ItemId, DailySnapshot>,
}

impl SnapshotIndex {
    /// Indexes `snapshots`, keeping the first one seen per item.
    ///
    /// The store guarantees uniqueness per (item, date); a duplicate here
    /// means that guarantee was broken and is logged.
    pub fn new(date: NaiveDate, snapshots: Vec<DailySnapshot>) -> Self {
        let mut by_item = HashMap::with_capacity(snapshots.len());

        for snapshot in snapshots {
            if snapshot.date != date {
                warn!(
                    item_id = %snapshot.item_id,
                    expected = %date,
                    found = %snapshot.date,
                    "Ignoring snapshot for a different date"
                );
                continue;
            }

            if by_item.contains_key(&snapshot.item_id) {
                warn!(
                    item_id = %snapshot.item_id,
                    date = %date,
                    "Duplicate daily snapshot, keeping the first"
                );
                continue;
            }

            by_item.insert(snapshot.item_id, snapshot);
        }

        SnapshotIndex { by_item }
    }

    pub fn get(&self, item_id: ItemId) -> Option<&DailySnapshot> {
        self.by_item.get(&item_id)
    }

    pub fn len(&self) -> usize {
        self.by_item.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_item.is_empty()
    }
}

// =============================================================================
// Ledger Day
// =============================================================================

/// One day's ledger events summed per item and type.
#[derive(Debug, Clone, Default)]
pub struct LedgerDay {
    totals: HashMap<ItemId, StockCounts>,
}

impl LedgerDay {
    /// Sums every event that falls inside `range`.
    ///
    /// Multiple events per item and type add up; none overwrite another.
    pub fn new(range: &DayRange, events: &[TransactionEvent]) -> Self {
        let mut totals: HashMap<ItemId, StockCounts> = HashMap::new();

        for event in events.iter().filter(|e| range.contains(e.occurred_at)) {
            *totals.entry(event.item_id).or_default() += event.kind.as_counts(event.quantity.max(0));
        }

        LedgerDay { totals }
    }

    /// The summed counts for an item (zero if it had no events).
    pub fn totals(&self, item_id: ItemId) -> StockCounts {
        self.totals.get(&item_id).copied().unwrap_or_default()
    }

    /// True if the item has at least one event on this day.
    pub fn has_activity(&self, item_id: ItemId) -> bool {
        self.totals.contains_key(&item_id)
    }
}

// =============================================================================
// Day Inputs
// =============================================================================

/// Everything the pure reconciliation step needs for one target day.
#[derive(Debug, Clone)]
pub struct DayInputs {
    pub date: NaiveDate,
    pub snapshots: SnapshotIndex,
    pub prior_snapshots: SnapshotIndex,
    pub ledger: LedgerDay,
    pub prior_ledger: LedgerDay,
}

impl DayInputs {
    /// Builds the lookups from the raw collaborator answers.
    pub fn assemble(
        today: DayRange,
        prior: DayRange,
        snapshots: Vec<DailySnapshot>,
        prior_snapshots: Vec<DailySnapshot>,
        events: &[TransactionEvent],
        prior_events: &[TransactionEvent],
    ) -> Self {
        DayInputs {
            date: today.date,
            snapshots: SnapshotIndex::new(today.date, snapshots),
            prior_snapshots: SnapshotIndex::new(prior.date, prior_snapshots),
            ledger: LedgerDay::new(&today, events),
            prior_ledger: LedgerDay::new(&prior, prior_events),
        }
    }
}

// =============================================================================
// Pure Reconciliation
// =============================================================================

/// Reconciles every active item in catalog order.
///
/// Output order is exactly `items` order (minus inactive items), so callers
/// never re-sort. Same inputs, same output.
pub fn reconcile(items: &[Item], inputs: &DayInputs) -> Vec<ComputedDailyRecord> {
    items
        .iter()
        .filter(|item| item.is_active)
        .map(|item| reconcile_item(item, inputs))
        .collect()
}

/// Reconciles one item.
pub fn reconcile_item(item: &Item, inputs: &DayInputs) -> ComputedDailyRecord {
    if let Some(snapshot) = inputs.snapshots.get(item.id) {
        return ComputedDailyRecord::from_snapshot(item, snapshot);
    }

    let prior_remaining = match inputs.prior_snapshots.get(item.id) {
        Some(snapshot) => snapshot.remaining,
        None => {
            if inputs.prior_ledger.has_activity(item.id) {
                warn!(
                    item_id = %item.id,
                    item = %item.name,
                    date = %inputs.date,
                    "Previous day has ledger activity but was never closed, carrying over 0"
                );
            }
            0
        }
    };

    // Same-day `beginning` events never override the carryover.
    let counts = inputs.ledger.totals(item.id).with_beginning(prior_remaining);

    ComputedDailyRecord::derived(item, counts)
}

// =============================================================================
// Engine
// =============================================================================

/// Reconciliation over an injected [`InventorySource`].
///
/// ## Usage
/// ```rust,ignore
/// let engine = ReconciliationEngine::new(db.clone(), OperatingTimezone::utc());
/// let report = engine.daily_report("2024-03-02").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReconciliationEngine<S> {
    source: S,
    timezone: OperatingTimezone,
}

impl<S: InventorySource> ReconciliationEngine<S> {
    /// Creates an engine reading from `source`, counting days in `timezone`.
    pub fn new(source: S, timezone: OperatingTimezone) -> Self {
        ReconciliationEngine { source, timezone }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn timezone(&self) -> OperatingTimezone {
        self.timezone
    }

    /// Computes the daily inventory for a caller-supplied date string.
    ///
    /// ## Errors
    /// * `InvalidArgument` - blank or unparsable date; nothing is fetched
    /// * `DataAccess` - a collaborator read failed
    pub async fn compute_daily_inventory(
        &self,
        target_date: &str,
    ) -> CoreResult<Vec<ComputedDailyRecord>> {
        let date = parse_target_date(target_date, self.timezone)?;
        self.compute_for_date(date).await
    }

    /// Computes the daily inventory for `date`.
    pub async fn compute_for_date(&self, date: NaiveDate) -> CoreResult<Vec<ComputedDailyRecord>> {
        let (today, prior) = self.day_ranges(date)?;

        let items = self.source.list_active_items().await?;
        let snapshots = self.source.list_snapshots(today.date).await?;
        let prior_snapshots = self.source.list_snapshots(prior.date).await?;
        let events = self.source.list_transactions(today).await?;
        let prior_events = self.source.list_transactions(prior).await?;

        debug!(
            date = %date,
            items = items.len(),
            snapshots = snapshots.len(),
            prior_snapshots = prior_snapshots.len(),
            events = events.len(),
            prior_events = prior_events.len(),
            "Loaded reconciliation inputs"
        );

        let inputs = DayInputs::assemble(
            today,
            prior,
            snapshots,
            prior_snapshots,
            &events,
            &prior_events,
        );

        Ok(reconcile(&items, &inputs))
    }

    /// Computes the daily inventory and projects it into the report shape.
    pub async fn daily_report(&self, target_date: &str) -> CoreResult<DailyInventoryReport> {
        let date = parse_target_date(target_date, self.timezone)?;
        let records = self.compute_for_date(date).await?;
        Ok(DailyInventoryReport::new(date, records))
    }

    /// Reconciles a single item with per-item snapshot lookups.
    ///
    /// ## Errors
    /// * `ItemNotFound` - the item is inactive
    pub async fn compute_item(&self, item: &Item, date: NaiveDate) -> CoreResult<ComputedDailyRecord> {
        if !item.is_active {
            return Err(CoreError::ItemNotFound(item.id.to_string()));
        }

        let (today, prior) = self.day_ranges(date)?;

        let snapshot = self.source.get_snapshot(item.id, today.date).await?;
        if let Some(snapshot) = snapshot {
            return Ok(ComputedDailyRecord::from_snapshot(item, &snapshot));
        }

        let prior_snapshot = self.source.get_snapshot(item.id, prior.date).await?;
        let events = self.only_item(item.id, self.source.list_transactions(today).await?);
        let prior_events = self.only_item(item.id, self.source.list_transactions(prior).await?);

        let inputs = DayInputs::assemble(
            today,
            prior,
            Vec::new(),
            prior_snapshot.into_iter().collect(),
            &events,
            &prior_events,
        );

        Ok(reconcile_item(item, &inputs))
    }

    fn day_ranges(&self, date: NaiveDate) -> CoreResult<(DayRange, DayRange)> {
        let prior_date = previous_day(date)?;
        let today = self.timezone.day_range(date)?;
        let prior = self.timezone.day_range(prior_date)?;
        Ok((today, prior))
    }

    fn only_item(&self, item_id: ItemId, events: Vec<TransactionEvent>) -> Vec<TransactionEvent> {
        events.into_iter().filter(|e| e.item_id == item_id).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
