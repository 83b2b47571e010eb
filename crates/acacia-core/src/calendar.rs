//! # Calendar Days
//!
//! Turning instants into calendar days in the store's operating timezone.
//!
//! ## Why This Exists
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Ledger events are instants (UTC). Inventory is counted per calendar    │
//! │  day *at the store*. With a UTC+8 store:                                │
//! │                                                                         │
//! │     2024-03-01T17:30:00Z  ──►  2024-03-02 01:30 local  ──► 2024-03-02   │
//! │                                                                         │
//! │  A day is the inclusive span                                            │
//! │     [local 00:00 of D, local 00:00 of D+1 minus 1ns]                    │
//! │  converted back to UTC for the bulk ledger query. Across a daylight     │
//! │  saving change that span is 23h or 25h long.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::ValidationError;
use crate::validation::ValidationResult;

/// How far past local midnight to look for the first valid local time when
/// a DST gap swallows midnight, in 15-minute steps.
const MIDNIGHT_GAP_STEPS: i64 = 8;

// =============================================================================
// Operating Timezone
// =============================================================================

/// The IANA timezone the store counts its days in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingTimezone(Tz);

impl OperatingTimezone {
    /// Days are UTC days.
    pub fn utc() -> Self {
        OperatingTimezone(Tz::UTC)
    }

    /// Looks a timezone up by its IANA name.
    ///
    /// ## Example
    /// ```rust
    /// use acacia_core::calendar::OperatingTimezone;
    ///
    /// assert!(OperatingTimezone::from_name("Asia/Manila").is_ok());
    /// assert!(OperatingTimezone::from_name("UTC+8").is_err());
    /// ```
    pub fn from_name(name: &str) -> ValidationResult<Self> {
        let name = name.trim();
        name.parse::<Tz>()
            .map(OperatingTimezone)
            .map_err(|_| ValidationError::InvalidFormat {
                field: "timezone".to_string(),
                reason: format!("'{name}' is not an IANA timezone name"),
            })
    }

    /// The IANA name, e.g. `America/New_York`.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// The calendar day an instant falls on at the store.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.0).date_naive()
    }

    /// The inclusive UTC span covering `date` at the store.
    pub fn day_range(&self, date: NaiveDate) -> ValidationResult<DayRange> {
        let out_of_range = || ValidationError::InvalidFormat {
            field: "date".to_string(),
            reason: format!("{date} is outside the supported calendar"),
        };

        let start = self.start_of_day(date).ok_or_else(out_of_range)?;
        let end = date
            .succ_opt()
            .and_then(|next| self.start_of_day(next))
            .and_then(|next| next.checked_sub_signed(Duration::nanoseconds(1)))
            .ok_or_else(out_of_range)?;

        Ok(DayRange { date, start, end })
    }

    /// First instant of `date` at the store.
    ///
    /// An ambiguous midnight (clocks set back over it) takes the earlier
    /// instant. A skipped midnight starts the day when the clocks resume.
    fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        let midnight = date.and_hms_opt(0, 0, 0)?;

        (0..=MIDNIGHT_GAP_STEPS).find_map(|step| {
            midnight
                .checked_add_signed(Duration::minutes(15 * step))
                .and_then(|local| self.0.from_local_datetime(&local).earliest())
                .map(|start| start.with_timezone(&Utc))
        })
    }
}

impl Default for OperatingTimezone {
    fn default() -> Self {
        OperatingTimezone::utc()
    }
}

// =============================================================================
// Day Range
// =============================================================================

/// One calendar day as an inclusive span of UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRange {
    /// The local calendar day this span covers.
    pub date: NaiveDate,
    /// First instant of the day (inclusive).
    pub start: DateTime<Utc>,
    /// Last instant of the day (inclusive).
    pub end: DateTime<Utc>,
}

impl DayRange {
    /// True if `instant` falls inside the day, boundaries included.
    #[inline]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

// =============================================================================
// Date Parsing
// =============================================================================

/// Parses the target date of a reconciliation request.
///
/// ## Accepted Input
/// - `YYYY-MM-DD` (the normal case)
/// - An RFC 3339 timestamp, reduced to its calendar day at the store
///
/// Blank input is `Required`, anything else unparsable is `InvalidFormat`.
pub fn parse_target_date(input: &str, timezone: OperatingTimezone) -> ValidationResult<NaiveDate> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "date".to_string(),
        });
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(timezone.local_date(instant.with_timezone(&Utc)));
    }

    Err(ValidationError::InvalidFormat {
        field: "date".to_string(),
        reason: format!("'{input}' is not a calendar date (expected YYYY-MM-DD)"),
    })
}

/// The calendar day before `date`.
pub fn previous_day(date: NaiveDate) -> ValidationResult<NaiveDate> {
    date.pred_opt().ok_or_else(|| ValidationError::InvalidFormat {
        field: "date".to_string(),
        reason: format!("{date} has no previous day"),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
