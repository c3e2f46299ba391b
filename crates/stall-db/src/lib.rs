//! # stall-db: Durable Storage for Stall POS
//!
//! Keeps a shadow copy of the ledger's two collections on disk and brings
//! old data forward from the legacy store.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stall POS Data Flow                              │
//! │                                                                         │
//! │  Session (LedgerState::persist)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     stall-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │ DurableStore  │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │  KvRepository │    │  (embedded)  │   │   │
//! │  │   │  SqlitePool   │◄───│  MemoryStore  │    │ 001_kv_store │   │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘   │   │
//! │  │                                │                                │   │
//! │  │   ┌───────────────┐    ┌───────▼───────┐                       │   │
//! │  │   │  LegacyStore  │───►│   hydrate()   │ once, at startup      │   │
//! │  │   │ (legacy.rs)   │    │ (hydrate.rs)  │                       │   │
//! │  │   └───────────────┘    └───────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (data_dir/stall.db)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`repository`] - SQLite key-value repository
//! - [`store`] - The `DurableStore` trait, keys and an in-memory store
//! - [`legacy`] - The legacy synchronous store
//! - [`hydrate`] - Startup load and migration
//! - [`migrations`] - Embedded SQL migrations
//! - [`error`] - Database error types
//!
//! ## Example
//! ```rust,ignore
//! let db = Database::new(DbConfig::new("./stall.db")).await?;
//! let store = db.kv("stall");
//! let hydrated = hydrate(&store, &FileLegacyStore::new("./legacy.json")).await?;
//! ```

pub mod error;
pub mod hydrate;
pub mod legacy;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

pub use error::{DbError, DbResult};
pub use hydrate::{hydrate, Hydrated};
pub use legacy::{FileLegacyStore, LegacyStore, MemoryLegacyStore};
pub use pool::{Database, DbConfig};
pub use repository::KvRepository;
pub use store::{
    load_collection, save_collection, DurableStore, MemoryStore, COLLECTION_KEYS, INVENTORY_KEY,
    SALES_KEY,
};
