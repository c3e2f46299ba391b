//! # Commands Module
//!
//! One function per operator action. Each returns the notification to show,
//! or an `ApiError` that the caller folds into an error notification.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── inventory.rs  ◄─── add, delete, sell, return, list, dashboard
//! ├── pos.rs        ◄─── cart entries and checkout
//! ├── import.rs     ◄─── bulk import from a sheet
//! ├── export.rs     ◄─── CSV export
//! └── reset.rs      ◄─── PIN-gated factory reset
//! ```

pub mod export;
pub mod import;
pub mod inventory;
pub mod pos;
pub mod reset;
