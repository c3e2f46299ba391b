//! # Domain Types
//!
//! Core domain types used throughout Stall POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │      Sale       │   │   ItemStatus    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  Available      │       │
//! │  │  code (business)│◄──│  saree_code     │   │  Sold           │       │
//! │  │  prices (paise) │   │  sale_price     │   └─────────────────┘       │
//! │  │  status         │   │  payment_method │                              │
//! │  └─────────────────┘   └─────────────────┘   ┌─────────────────┐       │
//! │                                              │ PaymentMethod   │       │
//! │  ┌─────────────────┐                         │  Cash | UPI     │       │
//! │  │ PriceSelection  │                         └─────────────────┘       │
//! │  │ List|Alt|Custom │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! - `id`: UUID v4, immutable, never shown to the operator
//! - `code`: upper-case business key printed on the tag and scanned at the till
//!
//! ## Wire Names
//! Persisted JSON and export headers use camelCase field names. Decoding
//! accepts the short legacy names (`type`, `cp`, `mrp`, `asp60`) and fills
//! anything missing with the same defaults the add form uses.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::{NOT_AVAILABLE, UNKNOWN_SHOP};

// =============================================================================
// Item Status
// =============================================================================

/// Stock state of a single item.
///
/// ## State Machine
/// ```text
///              sell()  (checkout)
///   Available ───────────────────► Sold
///       ▲                           │
///       └───────────────────────────┘
///              restore()  (return)
/// ```
/// Any other transition is rejected. There is no "in cart" state; the cart
/// is transient and lives on top of this model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    #[serde(alias = "Available")]
    Available,
    #[serde(alias = "Sold")]
    Sold,
}

impl ItemStatus {
    /// `Available → Sold`. Returns `None` if already sold.
    pub fn sell(self) -> Option<Self> {
        match self {
            ItemStatus::Available => Some(ItemStatus::Sold),
            ItemStatus::Sold => None,
        }
    }

    /// `Sold → Available`. Returns `None` if already available.
    pub fn restore(self) -> Option<Self> {
        match self {
            ItemStatus::Sold => Some(ItemStatus::Available),
            ItemStatus::Available => None,
        }
    }

    /// Status from a free-text import cell: sold only if the text mentions "sold".
    ///
    /// ```rust
    /// use stall_core::ItemStatus;
    ///
    /// assert_eq!(ItemStatus::from_status_text("Sold - floor 2"), ItemStatus::Sold);
    /// assert_eq!(ItemStatus::from_status_text(""), ItemStatus::Available);
    /// assert_eq!(ItemStatus::from_status_text("in stock"), ItemStatus::Available);
    /// ```
    pub fn from_status_text(text: &str) -> Self {
        if text.to_lowercase().contains("sold") {
            ItemStatus::Sold
        } else {
            ItemStatus::Available
        }
    }

    #[inline]
    pub fn is_available(self) -> bool {
        self == ItemStatus::Available
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemStatus::Available => f.pad("available"),
            ItemStatus::Sold => f.pad("sold"),
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// UPI transfer confirmed on the operator's phone.
    #[serde(rename = "UPI", alias = "Upi")]
    Upi,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => f.pad("Cash"),
            PaymentMethod::Upi => f.pad("UPI"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "upi" => Ok(PaymentMethod::Upi),
            other => Err(ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: format!("'{}' is not one of: Cash, UPI", other),
            }),
        }
    }
}

// =============================================================================
// Price Selection
// =============================================================================

/// Which price tier a cart line is charged at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum PriceSelection {
    /// The item's list price (MRP).
    #[default]
    ListPrice,
    /// The item's alternate sale price tier.
    AlternatePrice,
    /// A price typed in by the operator.
    Custom,
}

impl FromStr for PriceSelection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "list" | "mrp" | "list_price" => Ok(PriceSelection::ListPrice),
            "alternate" | "alt" | "asp" | "alternate_price" => Ok(PriceSelection::AlternatePrice),
            "custom" => Ok(PriceSelection::Custom),
            other => Err(ValidationError::InvalidFormat {
                field: "price selection".to_string(),
                reason: format!("'{}' is not one of: list, alternate, custom", other),
            }),
        }
    }
}

// =============================================================================
// New Item (raw form input)
// =============================================================================

/// Raw operator input for a new item, exactly as typed or imported.
///
/// Every field is optional text; [`Item::from_new`] applies the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub code: Option<String>,
    pub name: Option<String>,
    pub shop_name: Option<String>,
    pub shop_code: Option<String>,
    pub cost_price: Option<String>,
    pub list_price: Option<String>,
    pub alternate_price: Option<String>,
}

impl NewItem {
    pub fn with_code(code: impl Into<String>) -> Self {
        NewItem {
            code: Some(code.into()),
            ..NewItem::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn shop(mut self, shop_name: impl Into<String>, shop_code: impl Into<String>) -> Self {
        self.shop_name = Some(shop_name.into());
        self.shop_code = Some(shop_code.into());
        self
    }

    pub fn cost_price(mut self, price: impl Into<String>) -> Self {
        self.cost_price = Some(price.into());
        self
    }

    pub fn list_price(mut self, price: impl Into<String>) -> Self {
        self.list_price = Some(price.into());
        self
    }

    pub fn alternate_price(mut self, price: impl Into<String>) -> Self {
        self.alternate_price = Some(price.into());
        self
    }
}

// =============================================================================
// Item
// =============================================================================

/// A unit of stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier (UUID v4).
    #[serde(default = "new_id", deserialize_with = "lenient::text")]
    pub id: String,

    /// Upper-case business key, unique across the collection.
    #[serde(default, deserialize_with = "lenient::text")]
    pub code: String,

    /// Saree type / description.
    #[serde(default = "not_available", alias = "type")]
    pub name: String,

    /// Shop the item came from.
    #[serde(default = "unknown_shop")]
    pub shop_name: String,

    /// Shop's own code for the item.
    #[serde(default = "not_available")]
    pub shop_code: String,

    #[serde(default, alias = "cp")]
    #[ts(type = "number")]
    pub cost_price: Money,

    #[serde(default, alias = "mrp")]
    #[ts(type = "number")]
    pub list_price: Money,

    #[serde(default, alias = "asp60", alias = "asp")]
    #[ts(type = "number")]
    pub alternate_price: Money,

    #[serde(default)]
    pub status: ItemStatus,

    #[serde(default = "Utc::now", deserialize_with = "lenient::date")]
    #[ts(as = "String")]
    pub date_added: DateTime<Utc>,
}

impl Item {
    /// Builds an item from a normalized code and raw form fields.
    ///
    /// ## Defaults
    /// - blank shop name → "Unknown Shop"
    /// - blank name / shop code → "N/A"
    /// - blank or unparsable prices → 0
    pub fn from_new(code: String, fields: &NewItem, status: ItemStatus) -> Self {
        Item {
            id: new_id(),
            code,
            name: text_or(fields.name.as_deref(), NOT_AVAILABLE),
            shop_name: text_or(fields.shop_name.as_deref(), UNKNOWN_SHOP),
            shop_code: text_or(fields.shop_code.as_deref(), NOT_AVAILABLE),
            cost_price: price_or_zero(fields.cost_price.as_deref()),
            list_price: price_or_zero(fields.list_price.as_deref()),
            alternate_price: price_or_zero(fields.alternate_price.as_deref()),
            status,
            date_added: Utc::now(),
        }
    }

    /// Price charged for this item at the given tier.
    ///
    /// `custom` is only consulted for [`PriceSelection::Custom`]; unparsable
    /// text counts as zero.
    pub fn price_for(&self, selection: PriceSelection, custom: &str) -> Money {
        match selection {
            PriceSelection::ListPrice => self.list_price,
            PriceSelection::AlternatePrice => self.alternate_price,
            PriceSelection::Custom => Money::parse_lenient(custom),
        }
    }

    /// Applies the `Available → Sold` transition.
    pub fn mark_sold(&mut self) -> CoreResult<()> {
        self.status = self
            .status
            .sell()
            .ok_or_else(|| CoreError::AlreadySold(self.code.clone()))?;
        Ok(())
    }

    /// Applies the `Sold → Available` transition.
    pub fn mark_available(&mut self) -> CoreResult<()> {
        self.status = self
            .status
            .restore()
            .ok_or_else(|| CoreError::AlreadyAvailable(self.code.clone()))?;
        Ok(())
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.status.is_available()
    }
}

// =============================================================================
// Sale
// =============================================================================

/// One completed sale line. Created in a batch at checkout.
///
/// `saree_code` refers to an item's code, not its id; the item may be
/// deleted later without touching the sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    #[serde(default = "new_id", deserialize_with = "lenient::text")]
    pub id: String,

    #[serde(deserialize_with = "lenient::text")]
    pub saree_code: String,

    #[serde(default)]
    #[ts(type = "number")]
    pub sale_price: Money,

    pub payment_method: PaymentMethod,

    /// Human-readable local time of the checkout, shared by its whole batch.
    #[serde(default)]
    pub sale_date: String,
}

// =============================================================================
// Helpers
// =============================================================================

/// Generates a new entity id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Formats a checkout timestamp as `dd/mm/yyyy, HH:MM:SS`.
pub fn sale_timestamp(at: DateTime<Local>) -> String {
    at.format("%d/%m/%Y, %H:%M:%S").to_string()
}

fn text_or(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => default.to_string(),
    }
}

fn price_or_zero(value: Option<&str>) -> Money {
    value.map(Money::parse_lenient).unwrap_or_default()
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

fn unknown_shop() -> String {
    UNKNOWN_SHOP.to_string()
}

/// Legacy records may carry numeric ids (timestamps) or numeric codes.
mod lenient {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Int(i64),
        Float(f64),
    }

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Text::deserialize(deserializer)? {
            Text::Str(s) => s,
            Text::Int(n) => n.to_string(),
            Text::Float(n) => n.to_string(),
        })
    }

    /// RFC 3339 text or epoch milliseconds. Anything else is stamped now.
    pub fn date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let parsed = match Option::<Text>::deserialize(deserializer)? {
            Some(Text::Str(s)) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|at| at.with_timezone(&Utc)),
            Some(Text::Int(millis)) => DateTime::from_timestamp_millis(millis),
            Some(Text::Float(millis)) => DateTime::from_timestamp_millis(millis as i64),
            None => None,
        };
        Ok(parsed.unwrap_or_else(Utc::now))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        assert_eq!(ItemStatus::Available.sell(), Some(ItemStatus::Sold));
        assert_eq!(ItemStatus::Sold.sell(), None);
        assert_eq!(ItemStatus::Sold.restore(), Some(ItemStatus::Available));
        assert_eq!(ItemStatus::Available.restore(), None);
    }

    #[test]
    fn test_item_defaults_from_blank_fields() {
        let fields = NewItem::with_code("SAR1").name("  ").list_price("abc");
        let item = Item::from_new("SAR1".to_string(), &fields, ItemStatus::Available);

        assert_eq!(item.name, "N/A");
        assert_eq!(item.shop_name, "Unknown Shop");
        assert_eq!(item.shop_code, "N/A");
        assert!(item.list_price.is_zero());
        assert!(item.cost_price.is_zero());
        assert!(item.is_available());
    }

    #[test]
    fn test_mark_sold_twice_fails() {
        let mut item = Item::from_new("SAR1".into(), &NewItem::default(), ItemStatus::Available);
        item.mark_sold().unwrap();
        assert!(matches!(item.mark_sold(), Err(CoreError::AlreadySold(code)) if code == "SAR1"));

        item.mark_available().unwrap();
        assert!(matches!(item.mark_available(), Err(CoreError::AlreadyAvailable(_))));
    }

    #[test]
    fn test_price_for_each_tier() {
        let fields = NewItem::with_code("SAR1").list_price("500").alternate_price("400");
        let item = Item::from_new("SAR1".into(), &fields, ItemStatus::Available);

        assert_eq!(item.price_for(PriceSelection::ListPrice, "").paise(), 50000);
        assert_eq!(item.price_for(PriceSelection::AlternatePrice, "").paise(), 40000);
        assert_eq!(item.price_for(PriceSelection::Custom, "450").paise(), 45000);
        assert!(item.price_for(PriceSelection::Custom, "oops").is_zero());
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Upi).unwrap(), "\"UPI\"");
        assert_eq!("upi".parse::<PaymentMethod>().unwrap(), PaymentMethod::Upi);
        assert_eq!(" CASH ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert!("card".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_item_decodes_legacy_record() {
        let json = r#"{
            "id": 1718000000000,
            "code": "SAR9",
            "type": "Kanjivaram",
            "shopName": "Lakshmi Silks",
            "mrp": 1200,
            "asp60": "999.5",
            "status": "sold",
            "dateAdded": "2024-06-10T09:30:00.000Z"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();

        assert_eq!(item.id, "1718000000000");
        assert_eq!(item.name, "Kanjivaram");
        assert_eq!(item.shop_code, "N/A");
        assert_eq!(item.list_price.paise(), 120000);
        assert_eq!(item.alternate_price.paise(), 99950);
        assert_eq!(item.status, ItemStatus::Sold);
        assert_eq!(item.date_added.to_rfc3339(), "2024-06-10T09:30:00+00:00");
    }

    #[test]
    fn test_item_with_out_of_range_price_is_rejected() {
        let err = serde_json::from_str::<Item>(r#"{"code": "X", "mrp": 100000000000000000}"#)
            .unwrap_err();
        assert!(err.to_string().contains("amount out of range"));
    }

    #[test]
    fn test_sale_wire_names() {
        let sale = Sale {
            id: "s1".into(),
            saree_code: "SAR1".into(),
            sale_price: Money::from_rupees(500),
            payment_method: PaymentMethod::Cash,
            sale_date: "01/02/2026, 10:00:00".into(),
        };
        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["sareeCode"], "SAR1");
        assert_eq!(json["salePrice"], 500);
        assert_eq!(json["paymentMethod"], "Cash");
    }
}
