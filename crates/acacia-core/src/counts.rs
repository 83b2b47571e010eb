//! # Stock Counts
//!
//! The four daily counters and the two quantities derived from them.
//!
//! ## The Daily Equation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   beginning ──┐                                                         │
//! │               ├──► total_inventory = beginning + in                     │
//! │   in ─────────┘            │                                            │
//! │                            ▼                                            │
//! │   out ────────┐    remaining = max(0, total_inventory - out - spoilage) │
//! │   spoilage ───┘                                                         │
//! │                                                                         │
//! │   Negative stock is a display/business impossibility: the result is     │
//! │   clamped at zero instead of raising an error.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All counters are whole units stored as `i64`, the same integer-only
//! approach used for money elsewhere in retail code: no floats, ever.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// The four recorded counters for one item on one day.
///
/// `received` and `dispensed` are the `in` and `out` columns of the daily
/// sheet; `in` is a Rust keyword, so the names differ only in code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockCounts {
    pub beginning: i64,
    #[serde(rename = "in")]
    pub received: i64,
    #[serde(rename = "out")]
    pub dispensed: i64,
    pub spoilage: i64,
}

impl StockCounts {
    /// All-zero counts.
    #[inline]
    pub const fn zero() -> Self {
        StockCounts {
            beginning: 0,
            received: 0,
            dispensed: 0,
            spoilage: 0,
        }
    }

    /// Creates counts from the four counters.
    #[inline]
    pub const fn new(beginning: i64, received: i64, dispensed: i64, spoilage: i64) -> Self {
        StockCounts {
            beginning,
            received,
            dispensed,
            spoilage,
        }
    }

    /// `beginning + in`. Always recomputed, never read from storage.
    #[inline]
    pub fn total_inventory(&self) -> i64 {
        self.beginning.saturating_add(self.received)
    }

    /// `max(0, total_inventory - out - spoilage)`.
    #[inline]
    pub fn remaining(&self) -> i64 {
        self.total_inventory()
            .saturating_sub(self.dispensed)
            .saturating_sub(self.spoilage)
            .max(0)
    }

    /// Returns the same counts with a different opening balance.
    #[inline]
    pub fn with_beginning(self, beginning: i64) -> Self {
        StockCounts { beginning, ..self }
    }

    /// True if every counter is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == StockCounts::zero()
    }
}

/// Counter-wise sum (used when folding ledger events).
impl Add for StockCounts {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        StockCounts {
            beginning: self.beginning.saturating_add(other.beginning),
            received: self.received.saturating_add(other.received),
            dispensed: self.dispensed.saturating_add(other.dispensed),
            spoilage: self.spoilage.saturating_add(other.spoilage),
        }
    }
}

impl AddAssign for StockCounts {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_inventory() {
        let counts = StockCounts::new(30, 10, 5, 0);
        assert_eq!(counts.total_inventory(), 40);
        assert_eq!(counts.remaining(), 35);
    }

    #[test]
    fn test_remaining_clamps_at_zero() {
        // 5 on hand, 1000 dispensed: stock cannot go negative
        let counts = StockCounts::new(5, 0, 1000, 0);
        assert_eq!(counts.total_inventory(), 5);
        assert_eq!(counts.remaining(), 0);

        let counts = StockCounts::new(3, 2, 4, 4);
        assert_eq!(counts.remaining(), 0);
    }

    #[test]
    fn test_spoilage_reduces_remaining() {
        let counts = StockCounts::new(20, 0, 5, 3);
        assert_eq!(counts.remaining(), 12);
    }

    #[test]
    fn test_zero() {
        let zero = StockCounts::zero();
        assert!(zero.is_zero());
        assert_eq!(zero.total_inventory(), 0);
        assert_eq!(zero.remaining(), 0);
        assert_eq!(zero, StockCounts::default());
    }

    #[test]
    fn test_add_is_counter_wise() {
        let mut acc = StockCounts::zero();
        acc += StockCounts::new(0, 4, 0, 0);
        acc += StockCounts::new(0, 6, 2, 1);
        assert_eq!(acc, StockCounts::new(0, 10, 2, 1));
    }

    #[test]
    fn test_with_beginning_keeps_movements() {
        let counts = StockCounts::new(99, 10, 5, 1).with_beginning(30);
        assert_eq!(counts, StockCounts::new(30, 10, 5, 1));
    }

    #[test]
    fn test_saturating_arithmetic() {
        let counts = StockCounts::new(i64::MAX, 1, 0, 0);
        assert_eq!(counts.total_inventory(), i64::MAX);
    }
}
