//! # Inventory Commands
//!
//! Add, delete, sell, return, and the read-only views (stock list, sales
//! log, dashboard).

use serde::Serialize;
use stall_core::{normalize_code, CoreError, ItemStatus, Ledger, Money, NewItem, PaymentMethod};
use std::fmt;
use std::fmt::Write as _;
use tracing::debug;

use crate::error::{ApiError, Notification};
use crate::state::LedgerState;

/// Registers one item from form fields.
pub async fn add_item(state: &mut LedgerState, fields: NewItem) -> Result<Notification, ApiError> {
    debug!(?fields, "add_item command");
    let item = state.apply(|ledger| ledger.add_item(fields)).await?;
    Ok(Notification::success(format!("Added {}", item.code)))
}

/// Removes a stock line; its sales stay in the log.
pub async fn delete_item(state: &mut LedgerState, code: &str) -> Result<Notification, ApiError> {
    let item = state.apply(|ledger| ledger.delete_item(code)).await?;
    Ok(Notification::success(format!("Deleted {}", item.code)))
}

/// Sells one item directly, outside the cart.
pub async fn sell(
    state: &mut LedgerState,
    code: &str,
    custom_price: Option<&str>,
    method: PaymentMethod,
) -> Result<Notification, ApiError> {
    let sale = state
        .apply(|ledger| ledger.sell(code, custom_price, method))
        .await?;
    Ok(Notification::success(format!(
        "Sold {} for {} ({})",
        sale.saree_code, sale.sale_price, sale.payment_method
    )))
}

/// Returns a sold item to stock.
pub async fn process_return(state: &mut LedgerState, code: &str) -> Result<Notification, ApiError> {
    let code = normalize_code(code).map_err(CoreError::from)?;
    let removed = state.apply(|ledger| ledger.process_return(&code)).await?;
    Ok(Notification::success(match removed {
        1 => format!("Returned {} (1 sale removed)", code),
        n => format!("Returned {} ({} sales removed)", code, n),
    }))
}

// =============================================================================
// Views
// =============================================================================

/// Plain-text stock list, newest first, optionally filtered by status.
pub fn list_items(ledger: &Ledger, status: Option<ItemStatus>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:<20} {:<18} {:>10} {:>10} {:<9}",
        "CODE", "NAME", "SHOP", "MRP", "ALT", "STATUS"
    );

    for item in ledger
        .items()
        .iter()
        .filter(|item| status.map_or(true, |s| item.status == s))
    {
        let _ = writeln!(
            out,
            "{:<16} {:<20} {:<18} {:>10} {:>10} {:<9}",
            item.code,
            item.name,
            item.shop_name,
            item.list_price.to_string(),
            item.alternate_price.to_string(),
            item.status
        );
    }
    out
}

/// Plain-text sales log, newest first.
pub fn list_sales(ledger: &Ledger) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<22} {:<16} {:>10} {:<5}", "DATE", "CODE", "PRICE", "PAID");
    for sale in ledger.sales() {
        let _ = writeln!(
            out,
            "{:<22} {:<16} {:>10} {:<5}",
            sale.sale_date,
            sale.saree_code,
            sale.sale_price.to_string(),
            sale.payment_method
        );
    }
    out
}

/// Headline figures for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub item_count: usize,
    pub available_count: usize,
    pub sold_count: usize,
    pub sale_count: usize,
    pub revenue_total: Money,
    pub cash_total: Money,
    pub upi_total: Money,
}

pub fn dashboard(ledger: &Ledger) -> DashboardSummary {
    DashboardSummary {
        item_count: ledger.items().len(),
        available_count: ledger.available_count(),
        sold_count: ledger.sold_count(),
        sale_count: ledger.sales().len(),
        revenue_total: ledger.revenue_total(),
        cash_total: ledger.revenue_by_method(PaymentMethod::Cash),
        upi_total: ledger.revenue_by_method(PaymentMethod::Upi),
    }
}

impl fmt::Display for DashboardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stock      {} items", self.item_count)?;
        writeln!(f, "Available  {}", self.available_count)?;
        writeln!(f, "Sold       {}", self.sold_count)?;
        writeln!(f, "Sales      {}", self.sale_count)?;
        writeln!(f, "Revenue    {}", self.revenue_total)?;
        writeln!(f, "  Cash     {}", self.cash_total)?;
        write!(f, "  UPI      {}", self.upi_total)
    }
}
