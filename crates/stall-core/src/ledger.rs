//! # Ledger
//!
//! Owns the item and sale collections and every rule that keeps them
//! consistent.
//!
//! ## Mutate, Then Request a Persist
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   caller ──► ledger.checkout(&mut cart, Cash)                           │
//! │                 │                                                       │
//! │                 │ 1. validate every line (nothing touched yet)          │
//! │                 │ 2. apply: items → sold, sales prepended, cart cleared │
//! │                 ▼                                                       │
//! │              Applied { outcome: Vec<Sale>,                              │
//! │                        persist: PersistRequest { inventory, sales } }   │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │   caller writes the named collections to the durable store              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The ledger never does I/O. A failed operation leaves both collections
//! exactly as they were.
//!
//! ## Ordering
//! Both collections are newest-first: new items and new sales are
//! prepended.

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cart::{Cart, CartLine};
use crate::code::normalize_code;
use crate::error::{CoreError, CoreResult};
use crate::import::{parse_table, plan_import, ColumnMap, ImportSummary};
use crate::money::Money;
use crate::types::{new_id, sale_timestamp, Item, ItemStatus, NewItem, PaymentMethod, PriceSelection, Sale};

// =============================================================================
// Persist Request
// =============================================================================

/// Which collections changed and must be written back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistRequest {
    pub inventory: bool,
    pub sales: bool,
}

impl PersistRequest {
    pub const NONE: PersistRequest = PersistRequest {
        inventory: false,
        sales: false,
    };
    pub const INVENTORY: PersistRequest = PersistRequest {
        inventory: true,
        sales: false,
    };
    pub const SALES: PersistRequest = PersistRequest {
        inventory: false,
        sales: true,
    };
    pub const BOTH: PersistRequest = PersistRequest {
        inventory: true,
        sales: true,
    };

    /// Union of two requests.
    pub fn merge(self, other: PersistRequest) -> PersistRequest {
        PersistRequest {
            inventory: self.inventory || other.inventory,
            sales: self.sales || other.sales,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.inventory && !self.sales
    }
}

/// The result of a successful mutation plus what must be persisted.
#[derive(Debug, Clone)]
pub struct Applied<T> {
    pub outcome: T,
    pub persist: PersistRequest,
}

impl<T> Applied<T> {
    fn new(outcome: T, persist: PersistRequest) -> Self {
        Applied { outcome, persist }
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// In-memory inventory and sales.
///
/// ## Invariants
/// - No two items share a code
/// - A sale exists only while its item is sold, or after the item was deleted
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    items: Vec<Item>,
    sales: Vec<Sale>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Builds a ledger from previously persisted collections.
    pub fn from_parts(items: Vec<Item>, sales: Vec<Sale>) -> Self {
        Ledger { items, sales }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn sales(&self) -> &[Sale] {
        &self.sales
    }

    /// Looks up an item by code, normalizing the input first.
    pub fn find(&self, code: &str) -> Option<&Item> {
        let code = normalize_code(code).ok()?;
        self.items.iter().find(|item| item.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.find(code).is_some()
    }

    fn position(&self, code: &str) -> Option<usize> {
        self.items.iter().position(|item| item.code == code)
    }

    // -------------------------------------------------------------------------
    // Dashboard figures
    // -------------------------------------------------------------------------

    pub fn available_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_available()).count()
    }

    pub fn sold_count(&self) -> usize {
        self.items.len() - self.available_count()
    }

    /// Sum of every recorded sale.
    pub fn revenue_total(&self) -> Money {
        self.sales.iter().map(|sale| sale.sale_price).sum()
    }

    /// Sum of the sales taken with one payment method.
    pub fn revenue_by_method(&self, method: PaymentMethod) -> Money {
        self.sales
            .iter()
            .filter(|sale| sale.payment_method == method)
            .map(|sale| sale.sale_price)
            .sum()
    }

    // -------------------------------------------------------------------------
    // Inventory mutations
    // -------------------------------------------------------------------------

    /// Adds one item from form input.
    ///
    /// ## Failures
    /// - `Validation` - the code is blank or too long
    /// - `DuplicateCode` - an item already has this code
    pub fn add_item(&mut self, fields: NewItem) -> CoreResult<Applied<Item>> {
        let code = normalize_code(fields.code.as_deref().unwrap_or(""))?;

        if self.position(&code).is_some() {
            return Err(CoreError::DuplicateCode(code));
        }

        let item = Item::from_new(code, &fields, ItemStatus::Available);
        info!(code = %item.code, id = %item.id, "Item added");
        self.items.insert(0, item.clone());

        Ok(Applied::new(item, PersistRequest::INVENTORY))
    }

    /// Removes an item from stock. Its sales are kept.
    pub fn delete_item(&mut self, code: &str) -> CoreResult<Applied<Item>> {
        let code = normalize_code(code)?;
        let index = self
            .position(&code)
            .ok_or_else(|| CoreError::NotFound(code.clone()))?;

        let item = self.items.remove(index);
        info!(code = %item.code, "Item deleted");

        Ok(Applied::new(item, PersistRequest::INVENTORY))
    }

    /// Parses a pasted or uploaded table and imports its rows.
    ///
    /// The first non-blank row is the header. A table with no rows at all
    /// imports nothing.
    pub fn import_table(&mut self, text: &str) -> CoreResult<Applied<ImportSummary>> {
        let rows = parse_table(text)?;
        let Some((header, data)) = rows.split_first() else {
            return Ok(Applied::new(ImportSummary::default(), PersistRequest::NONE));
        };

        let columns = ColumnMap::resolve(header)?;
        Ok(self.import_batch(data, &columns))
    }

    /// Imports data rows (header excluded) in one step.
    ///
    /// Accepted items are prepended together, so the last row of the batch
    /// ends up first in the collection.
    pub fn import_batch(&mut self, rows: &[Vec<String>], columns: &ColumnMap) -> Applied<ImportSummary> {
        let plan = plan_import(rows, columns, |code| self.position(code).is_some());
        let summary = ImportSummary::from(&plan);

        info!(
            added = summary.added_count,
            duplicates = summary.duplicate_count,
            blank = summary.blank_count,
            invalid = summary.invalid_count,
            "Import applied"
        );

        if plan.items.is_empty() {
            return Applied::new(summary, PersistRequest::NONE);
        }

        let mut items: Vec<Item> = plan.items.into_iter().rev().collect();
        items.append(&mut self.items);
        self.items = items;

        Applied::new(summary, PersistRequest::INVENTORY)
    }

    // -------------------------------------------------------------------------
    // Selling
    // -------------------------------------------------------------------------

    /// Sells a single item at its list price, or at `custom_price` if given.
    ///
    /// Goes through [`Ledger::checkout`] with a one-line cart, so the sale
    /// has the same shape as any other.
    pub fn sell(
        &mut self,
        code: &str,
        custom_price: Option<&str>,
        method: PaymentMethod,
    ) -> CoreResult<Applied<Sale>> {
        let code = normalize_code(code)?;
        let item = self
            .find(&code)
            .ok_or_else(|| CoreError::NotFound(code.clone()))?;

        let mut cart = Cart::new();
        cart.add_item(item)?;
        if let Some(price) = custom_price {
            cart.update_selection(0, PriceSelection::Custom, Some(price.to_string()))?;
        }

        let applied = self.checkout(&mut cart, method)?;
        let sale = applied
            .outcome
            .into_iter()
            .next()
            .ok_or(CoreError::NotFound(code))?;

        Ok(Applied::new(sale, applied.persist))
    }

    /// Converts every cart line into a sale.
    ///
    /// ## Behavior
    /// - Empty cart: nothing changes, no persist requested
    /// - Every line is checked against the live ledger first; one bad line
    ///   fails the whole checkout and nothing is applied
    /// - All sales share one timestamp and the payment method
    /// - Sales are prepended in cart order; the cart is cleared
    pub fn checkout(&mut self, cart: &mut Cart, method: PaymentMethod) -> CoreResult<Applied<Vec<Sale>>> {
        if cart.is_empty() {
            debug!("Checkout on empty cart ignored");
            return Ok(Applied::new(Vec::new(), PersistRequest::NONE));
        }

        let positions = cart
            .lines()
            .iter()
            .map(|line| self.checked_position(line))
            .collect::<CoreResult<Vec<usize>>>()?;

        let sale_date = sale_timestamp(Local::now());
        let sales: Vec<Sale> = cart
            .lines()
            .iter()
            .map(|line| Sale {
                id: new_id(),
                saree_code: line.code().to_string(),
                sale_price: line.effective_price(),
                payment_method: method,
                sale_date: sale_date.clone(),
            })
            .collect();
        let total: Money = sales.iter().map(|sale| sale.sale_price).sum();

        // Nothing above touched the ledger; every position is known available.
        for index in positions {
            self.items[index].mark_sold()?;
        }

        info!(lines = sales.len(), total = %total, method = %method, "Checkout completed");

        let mut merged = sales.clone();
        merged.append(&mut self.sales);
        self.sales = merged;
        cart.clear();

        Ok(Applied::new(sales, PersistRequest::BOTH))
    }

    /// Index of the live item behind a cart line, if it can still be sold.
    fn checked_position(&self, line: &CartLine) -> CoreResult<usize> {
        let index = self
            .position(line.code())
            .ok_or_else(|| CoreError::NotFound(line.code().to_string()))?;

        if !self.items[index].is_available() {
            return Err(CoreError::AlreadySold(line.code().to_string()));
        }
        Ok(index)
    }

    /// Returns a sold item to stock and deletes every sale of its code.
    ///
    /// The outcome is the number of sales removed.
    pub fn process_return(&mut self, code: &str) -> CoreResult<Applied<usize>> {
        let code = normalize_code(code)?;
        let index = self
            .position(&code)
            .ok_or_else(|| CoreError::NotFound(code.clone()))?;

        self.items[index].mark_available()?;

        let before = self.sales.len();
        self.sales.retain(|sale| sale.saree_code != code);
        let removed = before - self.sales.len();

        info!(code = %code, sales_removed = removed, "Item returned");
        Ok(Applied::new(removed, PersistRequest::BOTH))
    }

    /// Empties both collections.
    pub fn reset(&mut self) -> Applied<()> {
        self.items.clear();
        self.sales.clear();
        info!("Ledger reset");
        Applied::new((), PersistRequest::BOTH)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
