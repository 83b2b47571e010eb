//! # Daily Inventory Report
//!
//! Projects the engine's records into the shape the presentation layer
//! renders: flat list, per-category groups, and a three-number summary.
//!
//! ```text
//! {
//!   "date": "2024-03-02",
//!   "inventory": [ ...records in catalog order... ],
//!   "groupedInventory": { "Meat": [...], "Produce": [...] },
//!   "summary": { "totalItems": 12, "totalInventoryValue": 340, "totalRemaining": 287 }
//! }
//! ```
//!
//! Groups come out in the order their category is first seen, which for
//! catalog-ordered input is alphabetical.

use chrono::NaiveDate;
use serde::ser::Serializer;
use serde::Serialize;
use ts_rs::TS;

use crate::types::ComputedDailyRecord;

// =============================================================================
// Summary
// =============================================================================

/// Aggregates over every record of the day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventorySummary {
    pub total_items: usize,
    /// Σ total_inventory (a unit count, not a currency amount).
    pub total_inventory_value: i64,
    pub total_remaining: i64,
}

impl InventorySummary {
    pub fn from_records(records: &[ComputedDailyRecord]) -> Self {
        records.iter().fold(
            InventorySummary {
                total_items: records.len(),
                ..Default::default()
            },
            |acc, r| InventorySummary {
                total_inventory_value: acc.total_inventory_value.saturating_add(r.total_inventory),
                total_remaining: acc.total_remaining.saturating_add(r.remaining),
                ..acc
            },
        )
    }
}

// =============================================================================
// Category Groups
// =============================================================================

/// Records sharing one category label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<ComputedDailyRecord>,
}

/// Records grouped by category, first-seen order.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryGroups(Vec<CategoryGroup>);

impl CategoryGroups {
    /// Groups `records` without reordering them inside a group.
    pub fn group(records: &[ComputedDailyRecord]) -> Self {
        let mut groups: Vec<CategoryGroup> = Vec::new();

        for record in records {
            match groups.iter_mut().find(|g| g.category == record.category) {
                Some(group) => group.items.push(record.clone()),
                None => groups.push(CategoryGroup {
                    category: record.category.clone(),
                    items: vec![record.clone()],
                }),
            }
        }

        CategoryGroups(groups)
    }

    pub fn get(&self, category: &str) -> Option<&[ComputedDailyRecord]> {
        self.0
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.items.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|g| g.category.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryGroup> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CategoryGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|g| (&g.category, &g.items)))
    }
}

// =============================================================================
// Report
// =============================================================================

/// The full daily view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DailyInventoryReport {
    #[ts(as = "String")]
    pub date: NaiveDate,

    pub inventory: Vec<ComputedDailyRecord>,

    #[ts(as = "std::collections::HashMap<String, Vec<ComputedDailyRecord>>")]
    pub grouped_inventory: CategoryGroups,

    pub summary: InventorySummary,
}

impl DailyInventoryReport {
    pub fn new(date: NaiveDate, records: Vec<ComputedDailyRecord>) -> Self {
        let grouped_inventory = CategoryGroups::group(&records);
        let summary = InventorySummary::from_records(&records);

        DailyInventoryReport {
            date,
            inventory: records,
            grouped_inventory,
            summary,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
