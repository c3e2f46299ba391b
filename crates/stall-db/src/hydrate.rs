//! # Startup Hydration
//!
//! Loads both collections before the ledger accepts any write, migrating
//! each one forward from the legacy store the first time it is missing.
//!
//! ## Per-Key Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  durable.get(key)                                                       │
//! │       │                                                                 │
//! │       ├── Some(json) ──► decode ──► use it  (decode failure → Err)      │
//! │       │                                                                 │
//! │       └── None                                                          │
//! │             │                                                           │
//! │             ▼                                                           │
//! │       legacy.get_item(key)                                              │
//! │             │                                                           │
//! │             ├── None / read error / undecodable ──► empty (logged)      │
//! │             │                                                           │
//! │             └── Some(json) ──► decode ──► durable.put(key)              │
//! │                                              │                          │
//! │                                              ├── ok   → migrated        │
//! │                                              └── fail → warn, use       │
//! │                                                         in memory only  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Once a key is in the durable store the legacy copy is never read again.

use serde::de::DeserializeOwned;
use serde::Serialize;
use stall_core::{Item, Sale};
use tracing::{info, warn};

use crate::error::DbResult;
use crate::legacy::LegacyStore;
use crate::store::{load_collection, save_collection, DurableStore, INVENTORY_KEY, SALES_KEY};

/// Collections recovered at startup.
#[derive(Debug, Clone, Default)]
pub struct Hydrated {
    pub items: Vec<Item>,
    pub sales: Vec<Sale>,
    /// Keys copied forward from the legacy store during this load.
    pub migrated: Vec<String>,
}

/// Loads both collections, migrating from `legacy` where needed.
///
/// Fails only when the durable store itself cannot be read, or holds a
/// value that does not decode. Legacy problems never fail hydration.
pub async fn hydrate(store: &dyn DurableStore, legacy: &dyn LegacyStore) -> DbResult<Hydrated> {
    let mut migrated = Vec::new();

    let items: Vec<Item> = hydrate_key(store, legacy, INVENTORY_KEY, &mut migrated).await?;
    let sales: Vec<Sale> = hydrate_key(store, legacy, SALES_KEY, &mut migrated).await?;

    info!(
        items = items.len(),
        sales = sales.len(),
        migrated = ?migrated,
        "Ledger hydrated"
    );

    Ok(Hydrated {
        items,
        sales,
        migrated,
    })
}

async fn hydrate_key<T>(
    store: &dyn DurableStore,
    legacy: &dyn LegacyStore,
    key: &str,
    migrated: &mut Vec<String>,
) -> DbResult<Vec<T>>
where
    T: DeserializeOwned + Serialize + Sync,
{
    if let Some(records) = load_collection(store, key).await? {
        return Ok(records);
    }

    let Some(records) = read_legacy::<T>(legacy, key) else {
        return Ok(Vec::new());
    };

    match save_collection(store, key, &records).await {
        Ok(()) => {
            info!(key, records = records.len(), "Migrated legacy collection");
            migrated.push(key.to_string());
        }
        Err(err) => {
            warn!(key, error = %err, "Could not write legacy collection forward; keeping it in memory");
        }
    }

    Ok(records)
}

fn read_legacy<T: DeserializeOwned>(legacy: &dyn LegacyStore, key: &str) -> Option<Vec<T>> {
    let text = match legacy.get_item(key) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(err) => {
            warn!(key, error = %err, "Legacy store unreadable; treating key as absent");
            return None;
        }
    };

    match serde_json::from_str(&text) {
        Ok(records) => Some(records),
        Err(err) => {
            warn!(key, error = %err, "Legacy value undecodable; treating key as absent");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::legacy::MemoryLegacyStore;
    use crate::store::MemoryStore;

    const LEGACY_ITEMS: &str = r#"[
        {"id": 1, "code": "L1", "type": "Silk", "mrp": 900, "status": "available"},
        {"id": 2, "code": "L2", "mrp": "700", "status": "sold"},
        {"id": 3, "code": "L3", "asp60": 350.5}
    ]"#;

    #[tokio::test]
    async fn test_fresh_install_is_empty() {
        let store = MemoryStore::new();
        let hydrated = hydrate(&store, &MemoryLegacyStore::new()).await.unwrap();

        assert!(hydrated.items.is_empty());
        assert!(hydrated.sales.is_empty());
        assert!(hydrated.migrated.is_empty());
        assert_eq!(store.get(INVENTORY_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_legacy_inventory_is_written_forward() {
        let store = MemoryStore::new();
        let legacy = MemoryLegacyStore::new().with_item(INVENTORY_KEY, LEGACY_ITEMS);

        let hydrated = hydrate(&store, &legacy).await.unwrap();

        assert_eq!(hydrated.items.len(), 3);
        assert_eq!(hydrated.migrated, vec![INVENTORY_KEY.to_string()]);
        let stored: Vec<Item> = load_collection(&store, INVENTORY_KEY).await.unwrap().unwrap();
        assert_eq!(stored, hydrated.items);
    }

    #[tokio::test]
    async fn test_durable_value_wins_over_legacy() {
        let store = MemoryStore::new();
        store.put(INVENTORY_KEY, "[]").await.unwrap();
        let legacy = MemoryLegacyStore::new().with_item(INVENTORY_KEY, LEGACY_ITEMS);

        let hydrated = hydrate(&store, &legacy).await.unwrap();

        assert!(hydrated.items.is_empty());
        assert!(hydrated.migrated.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_legacy_is_ignored() {
        let store = MemoryStore::new();
        let legacy = MemoryLegacyStore::new().with_item(SALES_KEY, "[{broken");

        let hydrated = hydrate(&store, &legacy).await.unwrap();

        assert!(hydrated.sales.is_empty());
        assert_eq!(store.get(SALES_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_undecodable_durable_value_fails() {
        let store = MemoryStore::new();
        store.put(SALES_KEY, "{broken").await.unwrap();

        let err = hydrate(&store, &MemoryLegacyStore::new()).await.unwrap_err();
        assert!(matches!(err, DbError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        assert!(hydrate(&store, &MemoryLegacyStore::new()).await.is_err());
    }
}
