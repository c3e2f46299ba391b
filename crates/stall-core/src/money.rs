//! # Money Module
//!
//! Provides the `Money` type for prices and sale amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹499.50 is stored as 49950                                          │
//! │    Totals are exact sums of integers                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Persisted collections and exports carry prices as plain rupee numbers
//! (`500`, `499.5`), which is also what the legacy store holds. `Money`
//! serializes whole amounts as integers and fractional amounts as decimals,
//! and deserializes numbers, numeric strings, or `null`.
//!
//! ## Lenient Parsing
//! Operator input and import cells go through [`Money::parse_lenient`]:
//! anything without a leading number becomes zero.
//!
//! ```rust
//! use stall_core::money::Money;
//!
//! assert_eq!(Money::parse_lenient("499.5").paise(), 49950);
//! assert_eq!(Money::parse_lenient("  500 /-").paise(), 50000);
//! assert_eq!(Money::parse_lenient("n/a"), Money::zero());
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1/100 of a rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: Custom prices are free text and may be negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Saturating arithmetic**: Custom prices are never range-checked, so
///   sums clamp at `i64::MIN`/`i64::MAX` instead of overflowing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees, saturating at the i64 range.
    ///
    /// ```rust
    /// use stall_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(500).paise(), 50000);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees.saturating_mul(100))
    }

    /// Creates a Money value from a rupee amount, rounding to the nearest paisa.
    ///
    /// Non-finite input becomes zero; out-of-range input saturates.
    pub fn from_rupees_f64(rupees: f64) -> Self {
        if !rupees.is_finite() {
            return Money::zero();
        }
        // `as` saturates float-to-int casts.
        Money((rupees * 100.0).round() as i64)
    }

    /// Parses operator text the way a lenient number field does.
    ///
    /// ## Rules
    /// - Surrounding whitespace is ignored
    /// - The longest leading number is used (`"500 /-"` → 500)
    /// - No leading number at all → zero
    pub fn parse_lenient(text: &str) -> Self {
        leading_number(text)
            .map(Money::from_rupees_f64)
            .unwrap_or_default()
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the amount in rupees as a float (wire format only).
    #[inline]
    pub fn as_rupees_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Extracts the longest leading decimal number from `text`.
fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in text.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }

    text[..end].parse::<f64>().ok()
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as rupees with two decimals, e.g. `₹499.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_i64(self.rupees())
        } else {
            serializer.serialize_f64(self.as_rupees_f64())
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a rupee amount as a number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money::from_paise)
            .ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map_err(|_| E::custom("amount out of range"))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        Ok(Money::from_rupees_f64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Ok(Money::parse_lenient(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Money, E> {
        Ok(Money::zero())
    }

    fn visit_none<E: de::Error>(self) -> Result<Money, E> {
        Ok(Money::zero())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
