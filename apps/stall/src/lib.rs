//! # Stall Library
//!
//! Session orchestration for Stall POS: configuration, the hydrated ledger,
//! the till, and one function per operator action.
//!
//! ## Module Organization
//! ```text
//! stall_lib/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── cli.rs          ◄─── clap command definitions
//! ├── error.rs        ◄─── ApiError and Notification
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── StallConfig (file + env)
//! │   ├── ledger.rs   ◄─── LedgerState (ledger + stores + guard)
//! │   └── pos.rs      ◄─── PosSession (cart + scanner)
//! └── commands/
//!     ├── inventory.rs
//!     ├── pos.rs
//!     ├── import.rs
//!     ├── export.rs
//!     └── reset.rs
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use chrono::Local;
use clap::Parser;
use stall_db::{Database, DbConfig, FileLegacyStore};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use error::{ApiError, Notification};
use state::{LedgerState, PosSession, StallConfig};

/// Runs the command line application.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, to stderr                     │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • stall.toml, then STALL_* overrides                                │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode, pending migrations                          │
/// │                                                                         │
/// │  4. Hydrate the Ledger ───────────────────────────────────────────────► │
/// │     • durable store first, legacy file for anything missing             │
/// │                                                                         │
/// │  5. Run the Command ──────────────────────────────────────────────────► │
/// │     • print the notification, exit non-zero on error                    │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    info!("Starting Stall POS");

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Configuration failed");
            eprintln!("{}", Notification::error(err.to_string()));
            return ExitCode::FAILURE;
        }
    };

    let mut state = match open_state(&config).await {
        Ok(state) => state,
        Err(err) => {
            eprintln!("{}", Notification::from(err));
            return ExitCode::FAILURE;
        }
    };

    let notification = execute(cli.command, &mut state, &config).await;
    print_notification(&notification, cli.json);

    if notification.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stall=trace` - Show trace for stall crates only
/// - Default: `info,stall=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stall=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_notification(notification: &Notification, json: bool) {
    if json {
        match serde_json::to_string(notification) {
            Ok(text) => {
                println!("{}", text);
                return;
            }
            Err(err) => error!(error = %err, "Cannot encode notification"),
        }
    }
    println!("{}", notification);
}

fn load_config(cli: &Cli) -> Result<StallConfig, state::ConfigError> {
    match &cli.config {
        Some(path) => {
            let mut config = StallConfig::from_file(path)?;
            config.apply_env(|var| std::env::var(var).ok())?;
            Ok(config)
        }
        None => StallConfig::load(),
    }
}

/// Connects the database and hydrates the ledger.
///
/// A failed hydration is not fatal: the session keeps going with
/// persistence disabled.
pub async fn open_state(config: &StallConfig) -> Result<LedgerState, ApiError> {
    std::fs::create_dir_all(&config.data_dir).map_err(|err| {
        ApiError::storage(format!("Cannot create {}: {}", config.data_dir.display(), err))
    })?;

    let db = Database::new(DbConfig::new(config.database_path())).await?;
    let store = db.kv(config.namespace.clone());
    let legacy = FileLegacyStore::new(config.legacy_path());

    let mut state = LedgerState::new(Box::new(store), Box::new(legacy), config.reset_pin);
    match state.load().await {
        Ok(migrated) if !migrated.is_empty() => {
            info!(?migrated, "Legacy data migrated");
        }
        Ok(_) => {}
        Err(err) => {
            eprintln!("{}", Notification::from(err));
        }
    }

    Ok(state)
}

/// Runs one command against the session and folds the outcome into a
/// notification.
pub async fn execute(command: Command, state: &mut LedgerState, config: &StallConfig) -> Notification {
    use commands::{export, import, inventory, pos, reset};

    let result = match command {
        Command::Add(args) => inventory::add_item(state, args.into()).await,
        Command::List { status, sales } => Ok(Notification::info(if sales {
            inventory::list_sales(state.ledger())
        } else {
            inventory::list_items(state.ledger(), status.map(Into::into))
        })),
        Command::Sell {
            code,
            price,
            payment,
        } => inventory::sell(state, &code, price.as_deref(), payment).await,
        Command::Return { code } => inventory::process_return(state, &code).await,
        Command::Delete { code } => inventory::delete_item(state, &code).await,
        Command::Import { file } => import::import_file(state, &file).await,
        Command::Export { collection, dir } => export::export(
            state.ledger(),
            collection,
            dir.as_deref().unwrap_or(&config.export_dir),
            Local::now().date_naive(),
        ),
        Command::Checkout { entries, payment } => {
            let mut session = PosSession::new();
            pos::checkout(state, &mut session, &entries, payment).await
        }
        Command::Dashboard => Ok(Notification::info(
            inventory::dashboard(state.ledger()).to_string(),
        )),
        Command::Reset { pin } => reset::factory_reset(state, &pin).await,
    };

    Notification::from(result)
}
