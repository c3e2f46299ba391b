//! # Repository Module
//!
//! SQLite-backed implementations of the storage traits.
//!
//! ## Available Repositories
//!
//! - [`KvRepository`] - namespaced key-value rows behind [`crate::DurableStore`]

pub mod kv;

pub use kv::KvRepository;
