//! # Stall POS Entry Point
//!
//! ```text
//! main.rs ────► stall_lib::run()
//!                 │
//!                 ├── logging, config
//!                 ├── database + hydration
//!                 └── one command, one notification
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for testability
    stall_lib::run().await
}
