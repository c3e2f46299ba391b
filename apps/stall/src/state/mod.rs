//! # State Module
//!
//! Session state for the app, split by concern.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │   LedgerState    │  │   PosSession     │  │   StallConfig        │  │
//! │  │                  │  │                  │  │                      │  │
//! │  │  Ledger          │  │  Cart            │  │  reset_pin           │  │
//! │  │  DurableStore    │  │  Scanner handle  │  │  namespace           │  │
//! │  │  LegacyStore     │  │                  │  │  paths               │  │
//! │  │  hydrated guard  │  │                  │  │                      │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  • LedgerState: the only writer of the durable store                   │
//! │  • PosSession: transient, never persisted                              │
//! │  • StallConfig: read-only after startup                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod ledger;
mod pos;

pub use config::{ConfigError, StallConfig, DEFAULT_NAMESPACE, DEFAULT_RESET_PIN};
pub use ledger::LedgerState;
pub use pos::{PosSession, Scanner, ScannerError};
