//! # Item Repository
//!
//! Database operations for the item catalog.
//!
//! ## Key Operations
//! - CRUD with validation on the way in
//! - Stored `total_inventory` / `remaining` kept in step with the counters
//! - Catalog-ordered listing for the reconciliation engine
//!
//! ## Stored Counters
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  inventory_items row                                                    │
//! │                                                                         │
//! │  beginning ─┐                                                           │
//! │  in ────────┴──► total_inventory = beginning + in                       │
//! │  out ───────┐                                                           │
//! │  spoilage ──┴──► remaining = max(0, total_inventory − out − spoilage)   │
//! │                                                                         │
//! │  Every write recomputes both derived columns from the four inputs.      │
//! │  Updates do it in SQL, against the row as it is being written.         │
//! │  These are the catalog's standing numbers; per-day figures come from    │
//! │  the reconciliation engine instead.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use acacia_core::low_stock::low_stock_items;
use acacia_core::validation::{validate_item_update, validate_new_item};
use acacia_core::{Item, ItemId, ItemUpdate, NewItem};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult, ITEM_ENTITY};

const ITEM_COLUMNS: &str = r#"
    id, name, unit, category,
    beginning, in_quantity, out_quantity, spoilage,
    total_inventory, remaining,
    is_active, created_at, updated_at
"#;

/// Repository for catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(pool);
///
/// let flour = repo.create(&NewItem::new("Flour", "kg", "Dry Goods")).await?;
/// let active = repo.list_active().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Inserts a new catalog item.
    ///
    /// ## Returns
    /// * `Ok(Item)` - The stored row, with its assigned id
    /// * `Err(DbError::Validation)` - Blank/too-long text or a negative counter
    /// * `Err(DbError::UniqueViolation)` - Name already taken
    pub async fn create(&self, input: &NewItem) -> DbResult<Item> {
        validate_new_item(input)?;

        let name = input.name.trim();
        let counts = input.counts();
        let now = Utc::now();

        debug!(name = %name, category = %input.category.trim(), "Creating inventory item");

        let result = sqlx::query(
            r#"
            INSERT INTO inventory_items (
                name, unit, category,
                beginning, in_quantity, out_quantity, spoilage,
                total_inventory, remaining,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1, ?10, ?10)
            "#,
        )
        .bind(name)
        .bind(input.unit.trim())
        .bind(input.category.trim())
        .bind(counts.beginning)
        .bind(counts.received)
        .bind(counts.dispensed)
        .bind(counts.spoilage)
        .bind(counts.total_inventory())
        .bind(counts.remaining())
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| with_duplicate_value(e, name))?;

        let id = ItemId(result.last_insert_rowid());
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found(ITEM_ENTITY, id))
    }

    /// Gets an item by id, active or not.
    pub async fn get_by_id(&self, id: ItemId) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists active items ordered by (category, name).
    pub async fn list_active(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE is_active = 1 ORDER BY category ASC, name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Listed active items");
        Ok(items)
    }

    /// Applies a partial update.
    ///
    /// The merge happens inside one `UPDATE`, so concurrent partial updates
    /// to different fields never overwrite each other, and the stored
    /// `total_inventory` / `remaining` always come from the row as written.
    ///
    /// ## Returns
    /// * `Ok(Item)` - The item after the update
    /// * `Err(DbError::NotFound)` - No such item
    /// * `Err(DbError::UniqueViolation)` - Renamed onto an existing name
    pub async fn update(&self, id: ItemId, update: &ItemUpdate) -> DbResult<Item> {
        validate_item_update(update)?;

        let name = update.name.as_deref().map(str::trim);

        debug!(id = %id, counts_changed = update.touches_counts(), "Updating inventory item");

        let item = sqlx::query_as::<_, Item>(&format!(
            r#"
            UPDATE inventory_items SET
                name = COALESCE(?2, name),
                unit = COALESCE(?3, unit),
                category = COALESCE(?4, category),
                beginning = COALESCE(?5, beginning),
                in_quantity = COALESCE(?6, in_quantity),
                out_quantity = COALESCE(?7, out_quantity),
                spoilage = COALESCE(?8, spoilage),
                total_inventory = COALESCE(?5, beginning) + COALESCE(?6, in_quantity),
                remaining = MAX(0,
                    COALESCE(?5, beginning) + COALESCE(?6, in_quantity)
                    - COALESCE(?7, out_quantity) - COALESCE(?8, spoilage)),
                is_active = COALESCE(?9, is_active),
                updated_at = ?10
            WHERE id = ?1
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(update.unit.as_deref().map(str::trim))
        .bind(update.category.as_deref().map(str::trim))
        .bind(update.beginning)
        .bind(update.received)
        .bind(update.dispensed)
        .bind(update.spoilage)
        .bind(update.is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| with_duplicate_value(e, name.unwrap_or_default()))?;

        item.ok_or_else(|| DbError::not_found(ITEM_ENTITY, id))
    }

    /// Soft-deletes an item by setting is_active = false.
    ///
    /// Its snapshots and ledger history stay in place; it simply stops
    /// appearing in daily reports.
    pub async fn soft_delete(&self, id: ItemId) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting inventory item");

        let result = sqlx::query(
            "UPDATE inventory_items SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(ITEM_ENTITY, id));
        }

        Ok(())
    }

    /// Active items at or below the low-stock threshold, catalog order.
    pub async fn list_low_stock(&self) -> DbResult<Vec<Item>> {
        let items = self.list_active().await?;
        Ok(low_stock_items(&items))
    }

    /// Counts active items (for diagnostics).
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items WHERE is_active = 1")
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

/// Fills in the offending name on a unique violation.
fn with_duplicate_value(err: sqlx::Error, name: &str) -> DbError {
    match DbError::from(err) {
        DbError::UniqueViolation { field, .. } => DbError::duplicate(field, name),
        other => other,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use acacia_core::{StockCounts, ValidationError};

    async fn repo() -> ItemRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.items()
    }

    #[tokio::test]
    async fn test_create_computes_derived_counters() {
        let repo = repo().await;

        let item = repo
            .create(
                &NewItem::new("  Chicken Breast ", "kg", "Meat")
                    .with_counts(StockCounts::new(10, 5, 3, 1)),
            )
            .await
            .unwrap();

        assert_eq!(item.name, "Chicken Breast");
        assert_eq!(item.total_inventory, 15);
        assert_eq!(item.remaining, 11);
        assert!(item.is_active);
    }

    #[tokio::test]
    async fn test_create_clamps_remaining() {
        let repo = repo().await;

        let item = repo
            .create(&NewItem::new("Milk", "L", "Dairy").with_counts(StockCounts::new(4, 0, 10, 0)))
            .await
            .unwrap();

        assert_eq!(item.total_inventory, 4);
        assert_eq!(item.remaining, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let repo = repo().await;

        let err = repo.create(&NewItem::new("   ", "kg", "Meat")).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Required { .. })
        ));

        let err = repo
            .create(&NewItem::new("Rice", "kg", "Dry Goods").with_counts(StockCounts::new(-1, 0, 0, 0)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::MustBeNonNegative { .. })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_name() {
        let repo = repo().await;

        repo.create(&NewItem::new("Flour", "kg", "Dry Goods")).await.unwrap();
        let err = repo
            .create(&NewItem::new("Flour", "bag", "Baking"))
            .await
            .unwrap_err();

        match err {
            DbError::UniqueViolation { value, .. } => assert_eq!(value, "Flour"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_active_is_catalog_ordered() {
        let repo = repo().await;

        repo.create(&NewItem::new("Pork", "kg", "Meat")).await.unwrap();
        repo.create(&NewItem::new("Beef", "kg", "Meat")).await.unwrap();
        let gone = repo.create(&NewItem::new("Apple", "pcs", "Produce")).await.unwrap();
        repo.create(&NewItem::new("Cola", "can", "Beverages")).await.unwrap();
        repo.soft_delete(gone.id).await.unwrap();

        let names: Vec<String> = repo
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();

        assert_eq!(names, vec!["Cola", "Beef", "Pork"]);
        assert_eq!(repo.count_active().await.unwrap(), 3);

        // Soft-deleted rows are still readable by id
        let fetched = repo.get_by_id(gone.id).await.unwrap().unwrap();
        assert!(!fetched.is_active);
    }

    #[tokio::test]
    async fn test_update_recomputes_stored_counters() {
        let repo = repo().await;

        let item = repo
            .create(&NewItem::new("Eggs", "tray", "Dairy").with_counts(StockCounts::new(10, 0, 0, 0)))
            .await
            .unwrap();

        let updated = repo
            .update(
                item.id,
                &ItemUpdate {
                    received: Some(6),
                    dispensed: Some(4),
                    category: Some(" Poultry ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.category, "Poultry");
        assert_eq!(updated.total_inventory, 16);
        assert_eq!(updated.remaining, 12);

        let stored = repo.get_by_id(item.id).await.unwrap().unwrap();
        assert_eq!(stored.total_inventory, 16);
        assert_eq!(stored.remaining, 12);
        assert_eq!(stored.category, "Poultry");
    }

    #[tokio::test]
    async fn test_update_clamps_and_zeroes_counters() {
        let repo = repo().await;

        let item = repo
            .create(&NewItem::new("Cream", "L", "Dairy").with_counts(StockCounts::new(10, 5, 3, 1)))
            .await
            .unwrap();

        let updated = repo
            .update(
                item.id,
                &ItemUpdate {
                    dispensed: Some(20),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.total_inventory, 15);
        assert_eq!(updated.remaining, 0);
        assert_eq!(updated.name, "Cream");

        let updated = repo
            .update(
                item.id,
                &ItemUpdate {
                    beginning: Some(0),
                    dispensed: Some(0),
                    spoilage: Some(0),
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.counts(), StockCounts::new(0, 5, 0, 0));
        assert_eq!(updated.total_inventory, 5);
        assert_eq!(updated.remaining, 5);
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn test_rename_onto_existing_name() {
        let repo = repo().await;

        repo.create(&NewItem::new("Flour", "kg", "Dry Goods")).await.unwrap();
        let sugar = repo.create(&NewItem::new("Sugar", "kg", "Dry Goods")).await.unwrap();

        let err = repo
            .update(
                sugar.id,
                &ItemUpdate {
                    name: Some(" Flour ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        match err {
            DbError::UniqueViolation { value, .. } => assert_eq!(value, "Flour"),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(repo.get_by_id(sugar.id).await.unwrap().unwrap().name, "Sugar");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_partial_updates_keep_both_fields() {
        let dir = std::env::temp_dir().join(format!("acacia-items-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let db = Database::new(DbConfig::new(dir.join("inventory.db")).max_connections(4))
            .await
            .unwrap();

        let item = db
            .items()
            .create(&NewItem::new("Rice", "kg", "Dry Goods").with_counts(StockCounts::new(100, 0, 0, 0)))
            .await
            .unwrap();
        let id = item.id;

        for k in 1..=50i64 {
            let receive = {
                let repo = db.items();
                tokio::spawn(async move {
                    repo.update(
                        id,
                        &ItemUpdate {
                            received: Some(k),
                            ..Default::default()
                        },
                    )
                    .await
                })
            };
            let dispense = {
                let repo = db.items();
                tokio::spawn(async move {
                    repo.update(
                        id,
                        &ItemUpdate {
                            dispensed: Some(k),
                            ..Default::default()
                        },
                    )
                    .await
                })
            };
            receive.await.unwrap().unwrap();
            dispense.await.unwrap().unwrap();

            let stored = db.items().get_by_id(id).await.unwrap().unwrap();
            assert_eq!((stored.received, stored.dispensed), (k, k), "round {k}");
            assert_eq!(stored.total_inventory, 100 + k);
            assert_eq!(stored.remaining, 100);
        }

        db.close().await;
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_item() {
        let repo = repo().await;

        let err = repo
            .update(ItemId(999), &ItemUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = repo.soft_delete(ItemId(999)).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_low_stock() {
        let repo = repo().await;

        // 20% exactly: low
        repo.create(&NewItem::new("Salt", "kg", "Dry Goods").with_counts(StockCounts::new(10, 0, 8, 0)))
            .await
            .unwrap();
        // 50%: fine
        repo.create(&NewItem::new("Sugar", "kg", "Dry Goods").with_counts(StockCounts::new(10, 0, 5, 0)))
            .await
            .unwrap();
        // total 0: never low
        repo.create(&NewItem::new("Yeast", "g", "Dry Goods")).await.unwrap();

        let low: Vec<String> = repo
            .list_low_stock()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();

        assert_eq!(low, vec!["Salt"]);
    }
}
