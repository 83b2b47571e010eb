//! # InventorySource for Database
//!
//! Wires the reconciliation engine's read contract to the repositories.
//! Store failures surface as `CoreError::DataAccess` tagged with the
//! operation that hit them.

use acacia_core::{
    CoreResult, DailySnapshot, DayRange, InventorySource, Item, ItemId, TransactionEvent,
};
use chrono::NaiveDate;

use crate::pool::Database;

impl InventorySource for Database {
    async fn list_active_items(&self) -> CoreResult<Vec<Item>> {
        self.items()
            .list_active()
            .await
            .map_err(|e| e.into_core("list_active_items"))
    }

    async fn get_snapshot(
        &self,
        item_id: ItemId,
        date: NaiveDate,
    ) -> CoreResult<Option<DailySnapshot>> {
        self.snapshots()
            .get(item_id, date)
            .await
            .map_err(|e| e.into_core("get_snapshot"))
    }

    async fn list_snapshots(&self, date: NaiveDate) -> CoreResult<Vec<DailySnapshot>> {
        self.snapshots()
            .list_for_date(date)
            .await
            .map_err(|e| e.into_core("list_snapshots"))
    }

    async fn list_transactions(&self, range: DayRange) -> CoreResult<Vec<TransactionEvent>> {
        self.transactions()
            .list_in_range(range)
            .await
            .map_err(|e| e.into_core("list_transactions"))
    }
}

// =============================================================================
// End-to-end Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use acacia_core::{
        CoreError, Item, NewItem, NewSnapshot, NewTransaction, OperatingTimezone, Provenance,
        StockCounts, TransactionType,
    };
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn at(d: &str, hour: u32) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date(d).and_hms_opt(hour, 0, 0).unwrap())
    }

    async fn seeded() -> (Database, Item) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let item = db
            .items()
            .create(&NewItem::new("Chicken Breast", "kg", "Meat"))
            .await
            .unwrap();
        (db, item)
    }

    async fn record(db: &Database, item: &Item, kind: TransactionType, qty: i64, when: DateTime<Utc>) {
        db.transactions()
            .record(&NewTransaction::new(item.id, kind, qty, when))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_carryover_from_prior_snapshot() {
        let (db, item) = seeded().await;

        db.snapshots()
            .insert(&NewSnapshot::new(item.id, date("2024-03-01"), StockCounts::new(20, 15, 5, 0)))
            .await
            .unwrap();
        record(&db, &item, TransactionType::In, 10, at("2024-03-02", 9)).await;
        record(&db, &item, TransactionType::Out, 5, at("2024-03-02", 15)).await;

        let records = db
            .engine(OperatingTimezone::utc())
            .compute_daily_inventory("2024-03-02")
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.counts(), StockCounts::new(30, 10, 5, 0));
        assert_eq!(r.total_inventory, 40);
        assert_eq!(r.remaining, 35);
        assert_eq!(r.provenance, Provenance::Derived);
    }

    #[tokio::test]
    async fn test_same_day_snapshot_wins() {
        let (db, item) = seeded().await;

        record(&db, &item, TransactionType::In, 100, at("2024-03-02", 9)).await;
        db.snapshots()
            .insert(&NewSnapshot::new(item.id, date("2024-03-02"), StockCounts::new(30, 10, 5, 0)))
            .await
            .unwrap();

        let records = db
            .engine(OperatingTimezone::utc())
            .compute_daily_inventory("2024-03-02")
            .await
            .unwrap();

        assert_eq!(records[0].counts(), StockCounts::new(30, 10, 5, 0));
        assert_eq!(records[0].remaining, 35);
        assert_eq!(records[0].provenance, Provenance::Snapshot);
    }

    #[tokio::test]
    async fn test_clamps_when_outflow_exceeds_stock() {
        let (db, item) = seeded().await;

        db.snapshots()
            .insert(&NewSnapshot::new(item.id, date("2024-03-01"), StockCounts::new(4, 0, 0, 0)))
            .await
            .unwrap();
        record(&db, &item, TransactionType::Out, 10, at("2024-03-02", 12)).await;

        let records = db
            .engine(OperatingTimezone::utc())
            .compute_daily_inventory("2024-03-02")
            .await
            .unwrap();

        assert_eq!(records[0].total_inventory, 4);
        assert_eq!(records[0].remaining, 0);
    }

    #[tokio::test]
    async fn test_low_stock_on_zero_total_item() {
        let (db, item) = seeded().await;

        assert!(db.items().list_low_stock().await.unwrap().is_empty());

        let records = db
            .engine(OperatingTimezone::utc())
            .compute_daily_inventory("2024-03-02")
            .await
            .unwrap();
        assert_eq!(records[0].id, item.id);
        assert_eq!(records[0].counts(), StockCounts::zero());
    }

    #[tokio::test]
    async fn test_operating_timezone_shifts_day_boundaries() {
        let (db, item) = seeded().await;

        // 2024-03-02 01:00 in Johannesburg (+02:00) is still 2024-03-01 in UTC
        record(&db, &item, TransactionType::In, 7, at("2024-03-01", 23)).await;

        let tz = OperatingTimezone::from_name("Africa/Johannesburg").unwrap();
        let local = db.engine(tz).compute_daily_inventory("2024-03-02").await.unwrap();
        assert_eq!(local[0].received, 7);

        let utc = db
            .engine(OperatingTimezone::utc())
            .compute_daily_inventory("2024-03-02")
            .await
            .unwrap();
        assert_eq!(utc[0].received, 0);
    }

    #[tokio::test]
    async fn test_summer_time_day_boundaries() {
        let (db, item) = seeded().await;
        let new_york = OperatingTimezone::from_name("America/New_York").unwrap();

        // 23:59 EDT on 07-01, then 00:00 EDT on 07-02
        record(&db, &item, TransactionType::In, 11, at("2024-07-02", 3) + Duration::minutes(59)).await;
        record(&db, &item, TransactionType::In, 4, at("2024-07-02", 4)).await;

        let records = db.engine(new_york).compute_daily_inventory("2024-07-02").await.unwrap();
        assert_eq!(records[0].received, 4);

        let records = db.engine(new_york).compute_daily_inventory("2024-07-01").await.unwrap();
        assert_eq!(records[0].received, 11);
    }

    #[tokio::test]
    async fn test_report_groups_and_summarizes() {
        let (db, chicken) = seeded().await;
        let cola = db
            .items()
            .create(&NewItem::new("Cola", "can", "Beverages"))
            .await
            .unwrap();

        record(&db, &chicken, TransactionType::In, 12, at("2024-03-02", 8)).await;
        record(&db, &cola, TransactionType::In, 24, at("2024-03-02", 8)).await;
        record(&db, &cola, TransactionType::Spoilage, 2, at("2024-03-02", 20)).await;

        let report = db
            .engine(OperatingTimezone::utc())
            .daily_report("2024-03-02")
            .await
            .unwrap();

        let categories: Vec<&str> = report.grouped_inventory.categories().collect();
        assert_eq!(categories, vec!["Beverages", "Meat"]);
        assert_eq!(report.summary.total_items, 2);
        assert_eq!(report.summary.total_inventory_value, 36);
        assert_eq!(report.summary.total_remaining, 34);
    }

    #[tokio::test]
    async fn test_invalid_date_and_closed_store() {
        let (db, _) = seeded().await;
        let engine = db.engine(OperatingTimezone::utc());

        let err = engine.compute_daily_inventory("not-a-date").await.unwrap_err();
        assert!(err.is_invalid_argument());

        db.close().await;
        let err = engine.compute_daily_inventory("2024-03-02").await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::DataAccess { operation: "list_active_items", .. }
        ));
    }

    #[tokio::test]
    async fn test_single_item_matches_bulk() {
        let (db, item) = seeded().await;

        db.snapshots()
            .insert(&NewSnapshot::new(item.id, date("2024-03-01"), StockCounts::new(5, 5, 2, 0)))
            .await
            .unwrap();
        record(&db, &item, TransactionType::Out, 3, at("2024-03-02", 10)).await;

        let engine = db.engine(OperatingTimezone::utc());
        let bulk = engine.compute_for_date(date("2024-03-02")).await.unwrap();
        let single = engine.compute_item(&item, date("2024-03-02")).await.unwrap();

        assert_eq!(bulk[0], single);
        assert_eq!(single.counts(), StockCounts::new(8, 0, 3, 0));
    }
}
