//! # Cart
//!
//! Transient staging list for an in-progress sale.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operator Action          Cart Method              Cart Change          │
//! │  ───────────────          ───────────              ───────────          │
//! │                                                                         │
//! │  Scan / type code ───────► add_code() ───────────► lines.push(line)    │
//! │                                                                         │
//! │  Pick price tier ────────► update_selection() ───► line.selection = s  │
//! │                                                                         │
//! │  Click remove ───────────► remove_line() ────────► lines.remove(i)     │
//! │                                                                         │
//! │  Complete sale ──────────► Ledger::checkout() ───► lines.clear()       │
//! │                                                                         │
//! │  Switch tab / mode ──────► clear() ──────────────► lines.clear()       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart is never persisted and has no effect on item status until
//! checkout.

use serde::Serialize;
use tracing::debug;

use crate::code::CodeInput;
use crate::error::{CoreError, CoreResult};
use crate::ledger::Ledger;
use crate::money::Money;
use crate::types::{Item, PriceSelection};

/// One staged item and the tier it will be charged at.
///
/// ## Design Notes
/// `item` is a snapshot taken when the line was added. Checkout re-checks
/// the live item in the ledger before selling it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub item: Item,
    pub selection: PriceSelection,
    /// Raw operator text, only read when `selection` is `Custom`.
    pub custom_price: String,
}

impl CartLine {
    /// Creates a line charged at the list price.
    pub fn from_item(item: &Item) -> Self {
        CartLine {
            item: item.clone(),
            selection: PriceSelection::ListPrice,
            custom_price: String::new(),
        }
    }

    #[inline]
    pub fn code(&self) -> &str {
        &self.item.code
    }

    /// Price for the current selection; unparsable custom text counts as zero.
    pub fn effective_price(&self) -> Money {
        self.item.price_for(self.selection, &self.custom_price)
    }
}

/// The point-of-sale cart.
///
/// ## Invariants
/// - A code appears at most once
/// - Only items that were available when added are present
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Resolves typed text against the ledger and stages the item.
    pub fn add_code(&mut self, ledger: &Ledger, raw: &str) -> CoreResult<&CartLine> {
        self.add_input(ledger, &CodeInput::Manual(raw.to_string()))
    }

    /// Resolves a code input (typed or scanned) and stages the item.
    ///
    /// ## Failures
    /// - `NotFound` - no item has this code
    /// - `AlreadySold` - the item is sold
    /// - `AlreadyInCart` - the code is already staged
    pub fn add_input(&mut self, ledger: &Ledger, input: &CodeInput) -> CoreResult<&CartLine> {
        let code = input.normalize()?;
        let item = ledger
            .find(&code)
            .ok_or_else(|| CoreError::NotFound(code.clone()))?;
        self.add_item(item)
    }

    /// Stages an item at the list price.
    pub fn add_item(&mut self, item: &Item) -> CoreResult<&CartLine> {
        if !item.is_available() {
            return Err(CoreError::AlreadySold(item.code.clone()));
        }

        if self.contains(&item.code) {
            return Err(CoreError::AlreadyInCart(item.code.clone()));
        }

        debug!(code = %item.code, "Adding item to cart");
        let index = self.lines.len();
        self.lines.push(CartLine::from_item(item));
        Ok(&self.lines[index])
    }

    /// Changes the price tier of one line.
    ///
    /// `custom_price` replaces the stored custom text when given. It is not
    /// validated here; unparsable text simply prices at zero.
    pub fn update_selection(
        &mut self,
        index: usize,
        selection: PriceSelection,
        custom_price: Option<String>,
    ) -> CoreResult<()> {
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CoreError::InvalidCartLine { index, len })?;

        line.selection = selection;
        if let Some(custom) = custom_price {
            line.custom_price = custom;
        }
        Ok(())
    }

    /// Removes one line and returns it.
    pub fn remove_line(&mut self, index: usize) -> CoreResult<CartLine> {
        if index >= self.lines.len() {
            return Err(CoreError::InvalidCartLine {
                index,
                len: self.lines.len(),
            });
        }
        Ok(self.lines.remove(index))
    }

    /// Sum of every line's effective price.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::effective_price).sum()
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn contains(&self, code: &str) -> bool {
        self.lines.iter().any(|line| line.code() == code)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}
