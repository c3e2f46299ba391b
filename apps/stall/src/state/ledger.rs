//! # Ledger State
//!
//! The session's ledger plus the stores it is shadowed into.
//!
//! ## Hydration Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   new() ─────────► hydrated = false   writes suppressed                 │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │   load() ──ok────► hydrated = true    every mutation writes through     │
//! │     │                                                                   │
//! │     └──err───────► hydrated = false   session runs in memory only       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! An empty in-memory ledger must never overwrite stored data it has not
//! read yet.
//!
//! ## Writes
//! Each mutation rewrites only the collections it changed. A failed write
//! is logged and dropped; the in-memory ledger stays authoritative and the
//! next mutation simply tries again.

use stall_core::validation::verify_reset_pin;
use stall_core::{Applied, CoreResult, Ledger, PersistRequest};
use stall_db::{
    hydrate, save_collection, DurableStore, LegacyStore, COLLECTION_KEYS, INVENTORY_KEY,
    SALES_KEY,
};
use tracing::{debug, info, warn};

use crate::error::ApiError;

pub struct LedgerState {
    ledger: Ledger,
    store: Box<dyn DurableStore>,
    legacy: Box<dyn LegacyStore>,
    reset_pin: u32,
    hydrated: bool,
}

impl LedgerState {
    /// Creates an empty, not-yet-hydrated session.
    pub fn new(store: Box<dyn DurableStore>, legacy: Box<dyn LegacyStore>, reset_pin: u32) -> Self {
        LedgerState {
            ledger: Ledger::new(),
            store,
            legacy,
            reset_pin,
            hydrated: false,
        }
    }

    /// Loads both collections (migrating legacy data if needed).
    ///
    /// Returns the keys migrated from the legacy store. On failure the
    /// session stays unhydrated and keeps working in memory.
    pub async fn load(&mut self) -> Result<Vec<String>, ApiError> {
        match hydrate(self.store.as_ref(), self.legacy.as_ref()).await {
            Ok(loaded) => {
                self.ledger = Ledger::from_parts(loaded.items, loaded.sales);
                self.hydrated = true;
                Ok(loaded.migrated)
            }
            Err(err) => {
                warn!(error = %err, "Hydration failed; persistence disabled for this session");
                Err(ApiError::from(err))
            }
        }
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Runs one ledger mutation, then writes what it changed.
    pub async fn apply<T, F>(&mut self, mutation: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Ledger) -> CoreResult<Applied<T>>,
    {
        let applied = mutation(&mut self.ledger)?;
        self.persist(applied.persist).await;
        Ok(applied.outcome)
    }

    /// Writes the requested collections, if hydrated. Never fails.
    pub async fn persist(&self, request: PersistRequest) {
        if request.is_empty() {
            return;
        }

        if !self.hydrated {
            debug!(?request, "Not hydrated; skipping persist");
            return;
        }

        self.write(request).await;
    }

    async fn write(&self, request: PersistRequest) {
        if request.inventory {
            if let Err(err) = save_collection(self.store.as_ref(), INVENTORY_KEY, self.ledger.items()).await
            {
                warn!(key = INVENTORY_KEY, error = %err, "Failed to persist inventory");
            }
        }

        if request.sales {
            if let Err(err) = save_collection(self.store.as_ref(), SALES_KEY, self.ledger.sales()).await {
                warn!(key = SALES_KEY, error = %err, "Failed to persist sales");
            }
        }
    }

    /// Wipes everything after a PIN check.
    ///
    /// Clears the ledger, writes empty collections (even if hydration
    /// failed earlier) and removes the legacy keys so they can never be
    /// migrated back in.
    pub async fn factory_reset(&mut self, pin: &str) -> Result<(), ApiError> {
        verify_reset_pin(pin, self.reset_pin)?;

        let applied = self.ledger.reset();
        self.write(applied.persist).await;

        for key in COLLECTION_KEYS {
            if let Err(err) = self.legacy.remove_item(key) {
                warn!(key, error = %err, "Failed to remove legacy key");
            }
        }

        self.hydrated = true;
        info!("Factory reset completed");
        Ok(())
    }
}
