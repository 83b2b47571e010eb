//! # Snapshot Repository
//!
//! Database operations for daily snapshots, the finalized per-item state of
//! a closed day.
//!
//! ## Rules
//! - At most one snapshot per (item, date); a second insert fails with
//!   `DbError::UniqueViolation` instead of overwriting.
//! - `remaining` is computed and clamped here, once. Readers use it verbatim.

use acacia_core::validation::validate_new_snapshot;
use acacia_core::{DailySnapshot, ItemId, NewSnapshot};
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};

const SELECT_SNAPSHOT: &str = r#"
    SELECT
        id, item_id, date,
        beginning, in_quantity, out_quantity, spoilage, remaining,
        created_at, updated_at
    FROM daily_inventory
"#;

/// Repository for daily snapshot operations.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    /// Creates a new SnapshotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SnapshotRepository { pool }
    }

    /// Records the close of a day for one item.
    ///
    /// ## Returns
    /// * `Ok(DailySnapshot)` - Stored snapshot
    /// * `Err(DbError::UniqueViolation)` - The day is already closed for this item
    /// * `Err(DbError::ForeignKeyViolation)` - Unknown item
    pub async fn insert(&self, input: &NewSnapshot) -> DbResult<DailySnapshot> {
        validate_new_snapshot(input)?;

        let counts = input.counts();
        let now = Utc::now();
        let snapshot = DailySnapshot {
            id: generate_snapshot_id(),
            item_id: input.item_id,
            date: input.date,
            beginning: counts.beginning,
            received: counts.received,
            dispensed: counts.dispensed,
            spoilage: counts.spoilage,
            remaining: counts.remaining(),
            created_at: now,
            updated_at: now,
        };

        debug!(
            item_id = %snapshot.item_id,
            date = %snapshot.date,
            remaining = snapshot.remaining,
            "Inserting daily snapshot"
        );

        sqlx::query(
            r#"
            INSERT INTO daily_inventory (
                id, item_id, date,
                beginning, in_quantity, out_quantity, spoilage, remaining,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&snapshot.id)
        .bind(snapshot.item_id)
        .bind(snapshot.date)
        .bind(snapshot.beginning)
        .bind(snapshot.received)
        .bind(snapshot.dispensed)
        .bind(snapshot.spoilage)
        .bind(snapshot.remaining)
        .bind(snapshot.created_at)
        .bind(snapshot.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => {
                DbError::duplicate(field, format!("{}@{}", input.item_id, input.date))
            }
            other => other,
        })?;

        Ok(snapshot)
    }

    /// Gets the snapshot for one (item, date), if the day was closed.
    pub async fn get(&self, item_id: ItemId, date: NaiveDate) -> DbResult<Option<DailySnapshot>> {
        let snapshot = sqlx::query_as::<_, DailySnapshot>(&format!(
            "{SELECT_SNAPSHOT} WHERE item_id = ?1 AND date = ?2"
        ))
        .bind(item_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(snapshot)
    }

    /// Every snapshot recorded for `date`.
    pub async fn list_for_date(&self, date: NaiveDate) -> DbResult<Vec<DailySnapshot>> {
        let snapshots = sqlx::query_as::<_, DailySnapshot>(&format!(
            "{SELECT_SNAPSHOT} WHERE date = ?1 ORDER BY item_id"
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        debug!(date = %date, count = snapshots.len(), "Listed daily snapshots");
        Ok(snapshots)
    }
}

/// Helper to generate a new snapshot ID.
pub fn generate_snapshot_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
