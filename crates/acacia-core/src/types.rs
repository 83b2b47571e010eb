//! # Domain Types
//!
//! Core domain types used throughout Acacia Inventory.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │      Item       │   │ TransactionEvent │   │  DailySnapshot  │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  id (ItemId)    │◄──│  item_id         │   │  item_id ──────►│      │
//! │  │  name (unique)  │   │  kind            │   │  date           │      │
//! │  │  unit           │   │  quantity        │   │  beginning/in/  │      │
//! │  │  category       │   │  occurred_at     │   │  out/spoilage   │      │
//! │  │  is_active      │   └──────────────────┘   │  remaining      │      │
//! │  └─────────────────┘                          └─────────────────┘      │
//! │            │                                           │                │
//! │            └─────────────────┬─────────────────────────┘                │
//! │                              ▼                                          │
//! │                  ┌───────────────────────┐                              │
//! │                  │  ComputedDailyRecord  │  engine output               │
//! │                  │  provenance: Snapshot │                              │
//! │                  │            | Derived  │                              │
//! │                  └───────────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! Everything the presentation layer sees is camelCase, and the `in`/`out`
//! counters keep their sheet names on the wire even though Rust calls them
//! `received`/`dispensed`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::counts::StockCounts;
use crate::error::ValidationError;

// =============================================================================
// Item Id
// =============================================================================

/// Stable, immutable identifier of a catalog item.
///
/// Lookups inside the engine are keyed by this type directly, never by a
/// stringified copy of it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
#[ts(export)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        ItemId(id)
    }
}

// =============================================================================
// Item
// =============================================================================

/// A catalog item.
///
/// The counter fields are the catalog's own materialized totals, maintained
/// by the catalog write path. They are NOT the engine's per-day answer; the
/// low-stock classifier reads them, reconciliation ignores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Item {
    pub id: ItemId,

    /// Display name (unique across the catalog).
    pub name: String,

    /// Unit of measure ("kg", "pcs", "L", ...).
    pub unit: String,

    /// Free-text grouping label.
    pub category: String,

    pub beginning: i64,

    #[serde(rename = "in")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "in_quantity"))]
    pub received: i64,

    #[serde(rename = "out")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "out_quantity"))]
    pub dispensed: i64,

    pub spoilage: i64,

    pub total_inventory: i64,

    pub remaining: i64,

    /// Soft-delete flag. Inactive items never reach the engine.
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// The catalog's stored counters.
    pub fn counts(&self) -> StockCounts {
        StockCounts::new(self.beginning, self.received, self.dispensed, self.spoilage)
    }
}

/// Input for creating a catalog item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewItem {
    pub name: String,
    pub unit: String,
    pub category: String,
    #[serde(default)]
    pub beginning: i64,
    #[serde(default, rename = "in")]
    pub received: i64,
    #[serde(default, rename = "out")]
    pub dispensed: i64,
    #[serde(default)]
    pub spoilage: i64,
}

impl NewItem {
    /// Creates an item input with all counters at zero.
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        NewItem {
            name: name.into(),
            unit: unit.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    /// Sets the four counters.
    pub fn with_counts(mut self, counts: StockCounts) -> Self {
        self.beginning = counts.beginning;
        self.received = counts.received;
        self.dispensed = counts.dispensed;
        self.spoilage = counts.spoilage;
        self
    }

    pub fn counts(&self) -> StockCounts {
        StockCounts::new(self.beginning, self.received, self.dispensed, self.spoilage)
    }
}

/// Partial update of a catalog item. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub beginning: Option<i64>,
    #[serde(rename = "in")]
    pub received: Option<i64>,
    #[serde(rename = "out")]
    pub dispensed: Option<i64>,
    pub spoilage: Option<i64>,
    pub is_active: Option<bool>,
}

impl ItemUpdate {
    /// True if any of the four counters is being changed.
    pub fn touches_counts(&self) -> bool {
        self.beginning.is_some()
            || self.received.is_some()
            || self.dispensed.is_some()
            || self.spoilage.is_some()
    }
}

// =============================================================================
// Transaction Type
// =============================================================================

/// The kind of quantity movement a ledger event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TransactionType {
    /// A manual opening count.
    Beginning,
    /// Stock received.
    In,
    /// Stock dispensed / sold.
    Out,
    /// Stock spoiled or wasted.
    Spoilage,
}

impl TransactionType {
    pub const ALL: [TransactionType; 4] = [
        TransactionType::Beginning,
        TransactionType::In,
        TransactionType::Out,
        TransactionType::Spoilage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Beginning => "beginning",
            TransactionType::In => "in",
            TransactionType::Out => "out",
            TransactionType::Spoilage => "spoilage",
        }
    }

    /// The contribution of `quantity` units of this kind to a day's counts.
    pub fn as_counts(&self, quantity: i64) -> StockCounts {
        match self {
            TransactionType::Beginning => StockCounts::new(quantity, 0, 0, 0),
            TransactionType::In => StockCounts::new(0, quantity, 0, 0),
            TransactionType::Out => StockCounts::new(0, 0, quantity, 0),
            TransactionType::Spoilage => StockCounts::new(0, 0, 0, quantity),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginning" => Ok(TransactionType::Beginning),
            "in" => Ok(TransactionType::In),
            "out" => Ok(TransactionType::Out),
            "spoilage" => Ok(TransactionType::Spoilage),
            _ => Err(ValidationError::InvalidFormat {
                field: "type".to_string(),
                reason: format!("'{s}' is not one of beginning, in, out, spoilage"),
            }),
        }
    }
}

// =============================================================================
// Transaction Event
// =============================================================================

/// An immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TransactionEvent {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub item_id: ItemId,

    #[serde(rename = "type")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "transaction_type"))]
    pub kind: TransactionType,

    /// Units moved. Never negative.
    pub quantity: i64,

    /// When the movement happened.
    #[ts(as = "String")]
    pub occurred_at: DateTime<Utc>,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Input for appending to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewTransaction {
    pub item_id: ItemId,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub quantity: i64,
    #[ts(as = "String")]
    pub occurred_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl NewTransaction {
    pub fn new(
        item_id: ItemId,
        kind: TransactionType,
        quantity: i64,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        NewTransaction {
            item_id,
            kind,
            quantity,
            occurred_at,
            notes: None,
        }
    }
}

// =============================================================================
// Daily Snapshot
// =============================================================================

/// The finalized state of one item on one calendar day.
///
/// Written by the day-close process. At most one per (item, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailySnapshot {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub item_id: ItemId,

    #[ts(as = "String")]
    pub date: NaiveDate,

    pub beginning: i64,

    #[serde(rename = "in")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "in_quantity"))]
    pub received: i64,

    #[serde(rename = "out")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "out_quantity"))]
    pub dispensed: i64,

    pub spoilage: i64,

    /// Closing balance, already clamped when it was written.
    pub remaining: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl DailySnapshot {
    pub fn counts(&self) -> StockCounts {
        StockCounts::new(self.beginning, self.received, self.dispensed, self.spoilage)
    }
}

/// Input for closing a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewSnapshot {
    pub item_id: ItemId,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub beginning: i64,
    #[serde(rename = "in")]
    pub received: i64,
    #[serde(rename = "out")]
    pub dispensed: i64,
    pub spoilage: i64,
}

impl NewSnapshot {
    pub fn new(item_id: ItemId, date: NaiveDate, counts: StockCounts) -> Self {
        NewSnapshot {
            item_id,
            date,
            beginning: counts.beginning,
            received: counts.received,
            dispensed: counts.dispensed,
            spoilage: counts.spoilage,
        }
    }

    pub fn counts(&self) -> StockCounts {
        StockCounts::new(self.beginning, self.received, self.dispensed, self.spoilage)
    }
}

// =============================================================================
// Computed Daily Record
// =============================================================================

/// Where a computed record's numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Provenance {
    /// Copied from a persisted snapshot for the day.
    Snapshot,
    /// Built from carryover plus the day's ledger.
    Derived,
}

/// The engine's answer for one item on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ComputedDailyRecord {
    pub id: ItemId,
    pub name: String,
    pub unit: String,
    pub category: String,
    pub is_active: bool,
    pub beginning: i64,
    #[serde(rename = "in")]
    pub received: i64,
    #[serde(rename = "out")]
    pub dispensed: i64,
    pub spoilage: i64,
    pub total_inventory: i64,
    pub remaining: i64,
    pub provenance: Provenance,
}

impl ComputedDailyRecord {
    /// A record copied from the day's snapshot.
    ///
    /// `remaining` is taken as stored; only `total_inventory` is recomputed.
    pub fn from_snapshot(item: &Item, snapshot: &DailySnapshot) -> Self {
        let counts = snapshot.counts();
        ComputedDailyRecord {
            remaining: snapshot.remaining,
            ..Self::with_counts(item, counts, Provenance::Snapshot)
        }
    }

    /// A record built from carryover and ledger totals.
    pub fn derived(item: &Item, counts: StockCounts) -> Self {
        Self::with_counts(item, counts, Provenance::Derived)
    }

    fn with_counts(item: &Item, counts: StockCounts, provenance: Provenance) -> Self {
        ComputedDailyRecord {
            id: item.id,
            name: item.name.clone(),
            unit: item.unit.clone(),
            category: item.category.clone(),
            is_active: item.is_active,
            beginning: counts.beginning,
            received: counts.received,
            dispensed: counts.dispensed,
            spoilage: counts.spoilage,
            total_inventory: counts.total_inventory(),
            remaining: counts.remaining(),
            provenance,
        }
    }

    pub fn counts(&self) -> StockCounts {
        StockCounts::new(self.beginning, self.received, self.dispensed, self.spoilage)
    }

    /// True if the record came from a persisted snapshot.
    pub fn has_manual_entry(&self) -> bool {
        self.provenance == Provenance::Snapshot
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> Item {
        let now = Utc::now();
        Item {
            id: ItemId(7),
            name: "Chicken Breast".to_string(),
            unit: "kg".to_string(),
            category: "Meat".to_string(),
            beginning: 10,
            received: 5,
            dispensed: 3,
            spoilage: 1,
            total_inventory: 15,
            remaining: 11,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_transaction_type_parsing() {
        assert_eq!("in".parse::<TransactionType>().unwrap(), TransactionType::In);
        assert_eq!("OUT".parse::<TransactionType>().unwrap(), TransactionType::Out);
        assert_eq!(
            " spoilage ".parse::<TransactionType>().unwrap(),
            TransactionType::Spoilage
        );
        assert!("transfer".parse::<TransactionType>().is_err());

        for kind in TransactionType::ALL {
            assert_eq!(kind.as_str().parse::<TransactionType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_transaction_type_counts() {
        assert_eq!(TransactionType::In.as_counts(4), StockCounts::new(0, 4, 0, 0));
        assert_eq!(TransactionType::Spoilage.as_counts(2), StockCounts::new(0, 0, 0, 2));
    }

    #[test]
    fn test_update_touches_counts() {
        let identity = ItemUpdate {
            name: Some("Chicken Thigh".to_string()),
            is_active: Some(false),
            ..Default::default()
        };
        assert!(!identity.touches_counts());

        let counts = ItemUpdate {
            spoilage: Some(0),
            ..Default::default()
        };
        assert!(counts.touches_counts());
    }

    #[test]
    fn test_record_from_snapshot_trusts_remaining() {
        let now = Utc::now();
        let snapshot = DailySnapshot {
            id: "snap-1".to_string(),
            item_id: ItemId(7),
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            beginning: 5,
            received: 0,
            dispensed: 1000,
            spoilage: 0,
            remaining: 0,
            created_at: now,
            updated_at: now,
        };

        let record = ComputedDailyRecord::from_snapshot(&item(), &snapshot);
        assert_eq!(record.total_inventory, 5);
        assert_eq!(record.remaining, 0);
        assert!(record.has_manual_entry());
    }

    #[test]
    fn test_record_wire_names() {
        let record = ComputedDailyRecord::derived(&item(), StockCounts::new(30, 10, 5, 0));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["in"], 10);
        assert_eq!(json["out"], 5);
        assert_eq!(json["totalInventory"], 40);
        assert_eq!(json["remaining"], 35);
        assert_eq!(json["isActive"], true);
        assert_eq!(json["provenance"], "derived");
    }

    #[test]
    fn test_new_item_counters_default_to_zero() {
        let input: NewItem =
            serde_json::from_str(r#"{"name":"Rice","unit":"kg","category":"Dry Goods","in":4}"#)
                .unwrap();
        assert_eq!(input.counts(), StockCounts::new(0, 4, 0, 0));
    }
}
