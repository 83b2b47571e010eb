//! # Low-Stock Classifier
//!
//! Flags catalog items running low, using the catalog's stored
//! `total_inventory` / `remaining` (not the engine's per-day numbers).
//!
//! ## Rule
//! ```text
//! low stock  ⇔  total_inventory > 0  AND  remaining / total_inventory ≤ 20%
//!
//! total_inventory = 0 is never low stock: there is no ratio to speak of.
//! ```
//!
//! Evaluated as `remaining × 100 ≤ total_inventory × 20` in 128-bit integers
//! so the boundary (exactly 20%) is exact and nothing overflows.

use crate::types::Item;

/// Threshold, in percent of total inventory.
pub const LOW_STOCK_THRESHOLD_PERCENT: i64 = 20;

/// Applies the low-stock rule to a pair of stored counters.
///
/// ## Example
/// ```rust
/// use acacia_core::low_stock::is_low_stock;
///
/// assert!(is_low_stock(100, 20));   // exactly 20%
/// assert!(!is_low_stock(100, 21));
/// assert!(!is_low_stock(0, 0));     // nothing stocked, nothing low
/// ```
pub fn is_low_stock(total_inventory: i64, remaining: i64) -> bool {
    if total_inventory <= 0 {
        return false;
    }

    (remaining as i128) * 100 <= (total_inventory as i128) * (LOW_STOCK_THRESHOLD_PERCENT as i128)
}

/// True if an active item is low on stock.
pub fn is_item_low_stock(item: &Item) -> bool {
    item.is_active && is_low_stock(item.total_inventory, item.remaining)
}

/// The low-stock subset of `items`, order preserved.
pub fn low_stock_items(items: &[Item]) -> Vec<Item> {
    items.iter().filter(|i| is_item_low_stock(i)).cloned().collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
