//! # stall-core: Pure Business Logic for Stall POS
//!
//! This crate is the **heart** of Stall POS. It owns the inventory and
//! sales ledger, the point-of-sale cart, and the bulk import/export
//! transforms, all with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stall POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Presentation (views, scanner, notifications)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ decoded text / form fields             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stall-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │   code   │ │   cart   │ │  ledger  │ │ import / export  │  │   │
//! │  │   │normalize │►│ CartLine │►│ Item,Sale│ │ ColumnMap, CSV   │  │   │
//! │  │   └──────────┘ └──────────┘ └────┬─────┘ └──────────────────┘  │   │
//! │  │                                  │ PersistRequest               │   │
//! │  └──────────────────────────────────┼──────────────────────────────┘   │
//! │                                     ▼                                   │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          stall-db (durable key-value store + migration)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, Sale, ItemStatus, PaymentMethod)
//! - [`money`] - Money type in integer paise
//! - [`code`] - Code input normalization (manual entry and scans)
//! - [`cart`] - Transient point-of-sale cart
//! - [`ledger`] - Inventory & sales ledger and its invariants
//! - [`import`] - Bulk import parsing and column resolution
//! - [`export`] - Spreadsheet-compatible CSV export
//! - [`validation`] - Input validation and the reset PIN check
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stall_core::{Cart, Ledger, NewItem, PaymentMethod};
//!
//! let mut ledger = Ledger::new();
//! ledger
//!     .add_item(NewItem::with_code("sar101").list_price("500"))
//!     .unwrap();
//!
//! let mut cart = Cart::new();
//! cart.add_code(&ledger, "SAR101").unwrap();
//!
//! let applied = ledger.checkout(&mut cart, PaymentMethod::Cash).unwrap();
//! assert_eq!(applied.outcome.len(), 1);
//! assert!(cart.is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod code;
pub mod error;
pub mod export;
pub mod import;
pub mod ledger;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use code::{normalize_code, CodeInput};
pub use error::{CoreError, CoreResult, ValidationError};
pub use export::{export_collection, export_file_name};
pub use import::{ColumnMap, ImportPlan, ImportSummary};
pub use ledger::{Applied, Ledger, PersistRequest};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Shop name recorded when the operator leaves it blank.
pub const UNKNOWN_SHOP: &str = "Unknown Shop";

/// Placeholder for any other missing text field.
pub const NOT_AVAILABLE: &str = "N/A";

/// Collection name used for the inventory export file.
pub const INVENTORY_COLLECTION: &str = "Inventory";

/// Collection name used for the sales export file.
pub const SALES_COLLECTION: &str = "Sales";
