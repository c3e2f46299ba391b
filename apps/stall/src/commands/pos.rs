//! # Point-of-Sale Commands
//!
//! Builds a cart from entries and checks it out.
//!
//! ## Entry Syntax
//! ```text
//! SAR101            list price
//! SAR101@alt        alternate price   (also: asp, alternate)
//! SAR101@list       list price        (also: mrp)
//! SAR101@725.50     custom price
//! ```

use stall_core::{PaymentMethod, PriceSelection, ValidationError};
use std::str::FromStr;
use tracing::debug;

use crate::error::{ApiError, Notification};
use crate::state::{LedgerState, PosSession};

/// One code to stage, with its price tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEntry {
    pub code: String,
    pub selection: PriceSelection,
    pub custom_price: Option<String>,
}

impl FromStr for CartEntry {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (code, tier) = match s.split_once('@') {
            Some((code, tier)) => (code, Some(tier.trim())),
            None => (s, None),
        };

        let (selection, custom_price) = match tier {
            None | Some("") => (PriceSelection::ListPrice, None),
            Some(tier) if tier.starts_with(|c: char| c.is_ascii_digit() || c == '.') => {
                (PriceSelection::Custom, Some(tier.to_string()))
            }
            Some(tier) => (tier.parse()?, None),
        };

        Ok(CartEntry {
            code: code.to_string(),
            selection,
            custom_price,
        })
    }
}

/// Stages every entry, then checks the cart out.
///
/// If any entry cannot be staged the cart is discarded and nothing is sold.
pub async fn checkout(
    state: &mut LedgerState,
    session: &mut PosSession,
    entries: &[CartEntry],
    method: PaymentMethod,
) -> Result<Notification, ApiError> {
    for entry in entries {
        if let Err(err) = stage(state, session, entry) {
            session.switch_mode();
            return Err(err);
        }
    }

    let total = session.cart().total();
    let sales = session.checkout(state, method).await?;

    if sales.is_empty() {
        return Ok(Notification::info("Cart is empty; nothing to check out"));
    }

    debug!(lines = sales.len(), "checkout command completed");
    Ok(Notification::success(format!(
        "Sold {} item{} for {} ({})",
        sales.len(),
        if sales.len() == 1 { "" } else { "s" },
        total,
        method
    )))
}

fn stage(state: &LedgerState, session: &mut PosSession, entry: &CartEntry) -> Result<(), ApiError> {
    session.add_manual(state.ledger(), &entry.code)?;
    let index = session.cart().len() - 1;
    session
        .cart_mut()
        .update_selection(index, entry.selection, entry.custom_price.clone())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_parsing() {
        let plain: CartEntry = "sar101".parse().unwrap();
        assert_eq!(plain.selection, PriceSelection::ListPrice);
        assert_eq!(plain.custom_price, None);

        let alt: CartEntry = "SAR101@alt".parse().unwrap();
        assert_eq!(alt.selection, PriceSelection::AlternatePrice);

        let custom: CartEntry = "SAR101@725.50".parse().unwrap();
        assert_eq!(custom.selection, PriceSelection::Custom);
        assert_eq!(custom.custom_price.as_deref(), Some("725.50"));

        assert!("SAR101@free".parse::<CartEntry>().is_err());
    }
}
