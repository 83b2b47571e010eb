//! # Transaction Repository
//!
//! The append-only ledger of quantity movements.
//!
//! ## Day Queries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list_in_range(DayRange { start, end })                                 │
//! │                                                                         │
//! │  occurred_at is stored as RFC 3339 text in UTC, so the inclusive        │
//! │  range filter is a plain text comparison backed by                      │
//! │  idx_inventory_transactions_occurred_at.                                │
//! │                                                                         │
//! │      start ≤ occurred_at ≤ end                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use acacia_core::validation::validate_new_transaction;
use acacia_core::{DayRange, ItemId, NewTransaction, TransactionEvent};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult, ITEM_ENTITY};

const SELECT_TRANSACTION: &str = r#"
    SELECT
        id, item_id, transaction_type, quantity, occurred_at, notes, created_at
    FROM inventory_transactions
"#;

/// Repository for ledger operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Appends an event to the ledger.
    ///
    /// ## Returns
    /// * `Ok(TransactionEvent)` - Stored event
    /// * `Err(DbError::Validation)` - Negative quantity or oversized notes
    /// * `Err(DbError::NotFound)` - The item does not exist
    pub async fn record(&self, input: &NewTransaction) -> DbResult<TransactionEvent> {
        validate_new_transaction(input)?;

        let event = TransactionEvent {
            id: generate_transaction_id(),
            item_id: input.item_id,
            kind: input.kind,
            quantity: input.quantity,
            occurred_at: input.occurred_at,
            notes: input
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            created_at: Utc::now(),
        };

        debug!(
            item_id = %event.item_id,
            kind = %event.kind,
            quantity = event.quantity,
            "Recording inventory transaction"
        );

        sqlx::query(
            r#"
            INSERT INTO inventory_transactions (
                id, item_id, transaction_type, quantity, occurred_at, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&event.id)
        .bind(event.item_id)
        .bind(event.kind)
        .bind(event.quantity)
        .bind(event.occurred_at)
        .bind(&event.notes)
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::ForeignKeyViolation { .. } => DbError::not_found(ITEM_ENTITY, input.item_id),
            other => other,
        })?;

        Ok(event)
    }

    /// Every event whose instant falls inside `range`, oldest first.
    pub async fn list_in_range(&self, range: DayRange) -> DbResult<Vec<TransactionEvent>> {
        let events = sqlx::query_as::<_, TransactionEvent>(&format!(
            "{SELECT_TRANSACTION} WHERE occurred_at >= ?1 AND occurred_at <= ?2 ORDER BY occurred_at"
        ))
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await?;

        debug!(date = %range.date, count = events.len(), "Listed transactions for day");
        Ok(events)
    }

    /// Full history of one item, oldest first.
    pub async fn list_for_item(&self, item_id: ItemId) -> DbResult<Vec<TransactionEvent>> {
        let events = sqlx::query_as::<_, TransactionEvent>(&format!(
            "{SELECT_TRANSACTION} WHERE item_id = ?1 ORDER BY occurred_at"
        ))
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}

/// Helper to generate a new ledger event ID.
pub fn generate_transaction_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use acacia_core::{NewItem, OperatingTimezone, TransactionType, ValidationError};
    use chrono::{DateTime, NaiveDate};

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[tokio::test]
    async fn test_record_and_list_for_item() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let item = db.items().create(&NewItem::new("Flour", "kg", "Dry Goods")).await.unwrap();
        let repo = db.transactions();

        let mut received = NewTransaction::new(item.id, TransactionType::In, 10, at("2024-03-02T09:00:00Z"));
        received.notes = Some("  supplier delivery ".to_string());
        repo.record(&received).await.unwrap();
        repo.record(&NewTransaction::new(item.id, TransactionType::Out, 4, at("2024-03-02T08:00:00Z")))
            .await
            .unwrap();

        let history = repo.list_for_item(item.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].kind, TransactionType::Out);
        assert_eq!(history[1].kind, TransactionType::In);
        assert_eq!(history[1].notes.as_deref(), Some("supplier delivery"));
    }

    #[tokio::test]
    async fn test_record_rejects_bad_input() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.transactions();

        let err = repo
            .record(&NewTransaction::new(ItemId(5), TransactionType::In, 3, Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let item = db.items().create(&NewItem::new("Salt", "kg", "Dry Goods")).await.unwrap();
        let err = repo
            .record(&NewTransaction::new(item.id, TransactionType::Out, -1, Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::MustBeNonNegative { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_in_range_is_inclusive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let item = db.items().create(&NewItem::new("Eggs", "tray", "Dairy")).await.unwrap();
        let repo = db.transactions();

        let day = OperatingTimezone::utc()
            .day_range(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap())
            .unwrap();

        for instant in [
            at("2024-03-01T23:59:59Z"),
            day.start,
            at("2024-03-02T12:30:00.250Z"),
            day.end,
            at("2024-03-03T00:00:00Z"),
        ] {
            repo.record(&NewTransaction::new(item.id, TransactionType::In, 1, instant))
                .await
                .unwrap();
        }

        let events = repo.list_in_range(day).await.unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| day.contains(e.occurred_at)));
    }
}
