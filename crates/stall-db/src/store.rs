//! # Durable Store
//!
//! The asynchronous key-value contract the session writes through.
//!
//! ## Keys
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────────────┐
//! │ saree_inventory      │ JSON array of every Item, newest first       │
//! │ saree_sales          │ JSON array of every Sale, newest first       │
//! └──────────────────────┴──────────────────────────────────────────────┘
//! ```
//! Each `put` replaces the whole value for its key; there is no partial
//! update and no transaction spanning both keys.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Key holding the item collection.
pub const INVENTORY_KEY: &str = "saree_inventory";

/// Key holding the sale collection.
pub const SALES_KEY: &str = "saree_sales";

/// Both collection keys, in hydration order.
pub const COLLECTION_KEYS: [&str; 2] = [INVENTORY_KEY, SALES_KEY];

/// Asynchronous string key-value store. All-or-nothing per key.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// The stored value, or `None` if the key was never written.
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Replaces the value of `key`.
    async fn put(&self, key: &str, value: &str) -> DbResult<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> DbResult<()>;
}

/// Reads and decodes a whole collection.
pub async fn load_collection<T>(store: &dyn DurableStore, key: &str) -> DbResult<Option<Vec<T>>>
where
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Encodes and writes a whole collection.
pub async fn save_collection<T>(store: &dyn DurableStore, key: &str, records: &[T]) -> DbResult<()>
where
    T: Serialize + Sync,
{
    let text = serde_json::to_string(records)?;
    store.put(key, &text).await?;
    debug!(key, records = records.len(), bytes = text.len(), "Collection saved");
    Ok(())
}

// =============================================================================
// In-memory store
// =============================================================================

/// A [`DurableStore`] held in memory. Clones share the same data.
///
/// `set_unavailable(true)` makes every call fail, for exercising the
/// storage-failure paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> DbResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable("memory store switched off".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        self.check()?;
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        self.check()?;
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> DbResult<()> {
        self.check()?;
        self.values.lock().await.remove(key);
        Ok(())
    }
}
