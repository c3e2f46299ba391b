//! Startup migration against a real SQLite database.

use async_trait::async_trait;
use stall_core::{Item, ItemStatus};
use stall_db::{
    hydrate, load_collection, Database, DbConfig, DbError, DbResult, DurableStore,
    FileLegacyStore, LegacyStore, MemoryLegacyStore, MemoryStore, INVENTORY_KEY, SALES_KEY,
};

const THREE_ITEMS: &str = r#"[
    {"id": 1718000000001, "code": "SAR1", "type": "Banarasi", "shopName": "Lakshmi", "cp": 400, "mrp": 900, "asp60": 720, "status": "available", "dateAdded": "2024-06-10T09:30:00.000Z"},
    {"id": 1718000000002, "code": "SAR2", "type": "Kanjivaram", "mrp": "1500", "status": "sold"},
    {"id": 1718000000003, "code": "SAR3"}
]"#;

const ONE_SALE: &str = r#"[
    {"id": 1718000000100, "sareeCode": "SAR2", "salePrice": 1400, "paymentMethod": "UPI", "saleDate": "10/06/2024, 15:04:05"}
]"#;

#[tokio::test]
async fn legacy_inventory_moves_into_sqlite() {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let store = db.kv("stall");
    let legacy = MemoryLegacyStore::new()
        .with_item(INVENTORY_KEY, THREE_ITEMS)
        .with_item(SALES_KEY, ONE_SALE);

    let hydrated = hydrate(&store, &legacy).await.unwrap();

    assert_eq!(hydrated.items.len(), 3);
    assert_eq!(hydrated.sales.len(), 1);
    assert_eq!(hydrated.migrated.len(), 2);
    assert_eq!(hydrated.items[1].status, ItemStatus::Sold);
    assert_eq!(hydrated.items[2].shop_name, "Unknown Shop");

    let stored: Vec<Item> = load_collection(&store, INVENTORY_KEY).await.unwrap().unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored, hydrated.items);

    // A second start reads SQLite only.
    legacy.remove_item(INVENTORY_KEY).unwrap();
    let again = hydrate(&store, &legacy).await.unwrap();
    assert_eq!(again.items, hydrated.items);
    assert!(again.migrated.is_empty());
}

#[tokio::test]
async fn legacy_file_on_disk_is_migrated() {
    let dir = tempfile::tempdir().unwrap();
    let legacy_path = dir.path().join("legacy.json");
    let file = serde_json::json!({ INVENTORY_KEY: THREE_ITEMS });
    std::fs::write(&legacy_path, file.to_string()).unwrap();

    let db = Database::new(DbConfig::new(dir.path().join("stall.db"))).await.unwrap();
    let store = db.kv("stall");

    let hydrated = hydrate(&store, &FileLegacyStore::new(&legacy_path)).await.unwrap();

    assert_eq!(hydrated.items.len(), 3);
    assert_eq!(hydrated.migrated, vec![INVENTORY_KEY.to_string()]);
    assert!(store.get(INVENTORY_KEY).await.unwrap().is_some());
    assert_eq!(store.get(SALES_KEY).await.unwrap(), None);
}

/// Reads succeed, writes fail.
struct ReadOnlyStore(MemoryStore);

#[async_trait]
impl DurableStore for ReadOnlyStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        self.0.get(key).await
    }

    async fn put(&self, _key: &str, _value: &str) -> DbResult<()> {
        Err(DbError::Unavailable("read-only".to_string()))
    }

    async fn delete(&self, _key: &str) -> DbResult<()> {
        Err(DbError::Unavailable("read-only".to_string()))
    }
}

#[tokio::test]
async fn failed_write_forward_keeps_data_in_memory() {
    let store = ReadOnlyStore(MemoryStore::new());
    let legacy = MemoryLegacyStore::new().with_item(INVENTORY_KEY, THREE_ITEMS);

    let hydrated = hydrate(&store, &legacy).await.unwrap();

    assert_eq!(hydrated.items.len(), 3);
    assert!(hydrated.migrated.is_empty());
    assert!(legacy.get_item(INVENTORY_KEY).unwrap().is_some());
}
