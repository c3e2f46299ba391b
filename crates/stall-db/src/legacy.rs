//! # Legacy Store
//!
//! The older synchronous, string-only key-value mechanism. It is only ever
//! read during migration and cleared on factory reset.
//!
//! ## File Format
//! [`FileLegacyStore`] reads a flat JSON object, one entry per key:
//! ```text
//! {
//!   "saree_inventory": "[{\"id\":1718…,\"code\":\"SAR1\",…}]",
//!   "saree_sales": "[]"
//! }
//! ```
//! Values are normally JSON-encoded strings. A value that is itself an
//! array or object is accepted and handed back as its JSON text.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Synchronous string key-value store.
pub trait LegacyStore: Send + Sync {
    /// The raw value of `key`, if present.
    fn get_item(&self, key: &str) -> DbResult<Option<String>>;

    /// Deletes `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> DbResult<()>;
}

// =============================================================================
// File-backed store
// =============================================================================

/// Legacy data exported to a JSON object file.
///
/// A missing file is an empty store.
#[derive(Debug, Clone)]
pub struct FileLegacyStore {
    path: PathBuf,
}

impl FileLegacyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileLegacyStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> DbResult<Option<BTreeMap<String, Value>>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(DbError::Legacy(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    err
                )))
            }
        };

        if text.trim().is_empty() {
            return Ok(Some(BTreeMap::new()));
        }

        let entries = serde_json::from_str(&text).map_err(|err| {
            DbError::Legacy(format!("{} is not a JSON object: {}", self.path.display(), err))
        })?;
        Ok(Some(entries))
    }
}

impl LegacyStore for FileLegacyStore {
    fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        let Some(entries) = self.read_entries()? else {
            return Ok(None);
        };

        let value = match entries.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(other) => Some(other.to_string()),
        };

        debug!(path = %self.path.display(), key, found = value.is_some(), "legacy get");
        Ok(value)
    }

    fn remove_item(&self, key: &str) -> DbResult<()> {
        let Some(mut entries) = self.read_entries()? else {
            return Ok(());
        };

        if entries.remove(key).is_none() {
            return Ok(());
        }

        let text = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, text).map_err(|err| {
            DbError::Legacy(format!("cannot write {}: {}", self.path.display(), err))
        })?;

        info!(path = %self.path.display(), key, "Legacy key removed");
        Ok(())
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// A [`LegacyStore`] held in memory, for tests.
#[derive(Debug, Default)]
pub struct MemoryLegacyStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryLegacyStore {
    pub fn new() -> Self {
        MemoryLegacyStore::default()
    }

    /// Builder-style insert.
    pub fn with_item(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(entries) = self.entries.get_mut() {
            entries.insert(key.into(), value.into());
        }
        self
    }

    fn lock(&self) -> DbResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| DbError::Internal("legacy store lock poisoned".to_string()))
    }
}

impl LegacyStore for MemoryLegacyStore {
    fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn remove_item(&self, key: &str) -> DbResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLegacyStore::new(dir.path().join("absent.json"));

        assert_eq!(store.get_item("saree_sales").unwrap(), None);
        store.remove_item("saree_sales").unwrap();
    }

    #[test]
    fn test_string_and_raw_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        fs::write(
            &path,
            r#"{"saree_inventory": "[{\"code\":\"A\"}]", "saree_sales": [], "other": null}"#,
        )
        .unwrap();
        let store = FileLegacyStore::new(&path);

        assert_eq!(
            store.get_item("saree_inventory").unwrap().as_deref(),
            Some(r#"[{"code":"A"}]"#)
        );
        assert_eq!(store.get_item("saree_sales").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get_item("other").unwrap(), None);
    }

    #[test]
    fn test_remove_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        fs::write(&path, r#"{"saree_inventory": "[]", "keep": "x"}"#).unwrap();
        let store = FileLegacyStore::new(&path);

        store.remove_item("saree_inventory").unwrap();

        assert_eq!(store.get_item("saree_inventory").unwrap(), None);
        assert_eq!(store.get_item("keep").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_garbage_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        fs::write(&path, "not json at all").unwrap();

        let err = FileLegacyStore::new(&path).get_item("saree_sales").unwrap_err();
        assert!(matches!(err, DbError::Legacy(_)));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryLegacyStore::new().with_item("k", "v");
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);
    }
}
