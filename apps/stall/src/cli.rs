//! # Command Line
//!
//! `stall <command>`; each invocation loads the ledger, runs one action and
//! prints its notification.

use clap::{Parser, Subcommand, ValueEnum};
use stall_core::{ItemStatus, NewItem, PaymentMethod};
use std::path::PathBuf;

use crate::commands::export::ExportTarget;
use crate::commands::pos::CartEntry;

#[derive(Debug, Parser)]
#[command(name = "stall", version, about = "Offline inventory and point of sale for a saree stall")]
pub struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the notification as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register one item
    Add(AddArgs),

    /// Show the stock list, or the sales log with --sales
    List {
        #[arg(long, value_enum, conflicts_with = "sales")]
        status: Option<StatusFilter>,

        #[arg(long)]
        sales: bool,
    },

    /// Sell one item directly
    Sell {
        code: String,

        /// Charge this instead of the list price
        #[arg(long)]
        price: Option<String>,

        #[arg(long, default_value = "cash")]
        payment: PaymentMethod,
    },

    /// Return a sold item to stock (its sales are removed)
    Return { code: String },

    /// Remove an item from stock
    Delete { code: String },

    /// Import a `,` or `|` separated stock sheet
    Import { file: PathBuf },

    /// Export a collection as CSV
    Export {
        #[arg(value_enum)]
        collection: ExportTarget,

        /// Directory to write into (defaults to the configured export dir)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Sell several items in one cart: CODE, CODE@alt, CODE@list or CODE@<price>
    Checkout {
        #[arg(required = true)]
        entries: Vec<CartEntry>,

        #[arg(long, default_value = "cash")]
        payment: PaymentMethod,
    },

    /// Counts and revenue
    Dashboard,

    /// Erase all items and sales
    Reset {
        #[arg(long)]
        pin: String,
    },
}

#[derive(Debug, clap::Args)]
pub struct AddArgs {
    pub code: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub shop_name: Option<String>,

    #[arg(long)]
    pub shop_code: Option<String>,

    /// Cost price
    #[arg(long)]
    pub cost: Option<String>,

    /// List price (MRP)
    #[arg(long)]
    pub mrp: Option<String>,

    /// Alternate sale price
    #[arg(long)]
    pub alt: Option<String>,
}

impl From<AddArgs> for NewItem {
    fn from(args: AddArgs) -> Self {
        NewItem {
            code: Some(args.code),
            name: args.name,
            shop_name: args.shop_name,
            shop_code: args.shop_code,
            cost_price: args.cost,
            list_price: args.mrp,
            alternate_price: args.alt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusFilter {
    Available,
    Sold,
}

impl From<StatusFilter> for ItemStatus {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::Available => ItemStatus::Available,
            StatusFilter::Sold => ItemStatus::Sold,
        }
    }
}
