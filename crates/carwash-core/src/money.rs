//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Centavos?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    115.00 / 1.15 = 99.99999999999999  ❌ WRONG!                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    11500 centavos × 10000 / 11500 = 10000 centavos = L. 100.00          │
//! │    Every division rounds exactly once, half-up, at 2 decimals           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Money crosses the boundary as a fixed 2-decimal string (`"115.00"`), so
//! the UI never sees a float. Deserialization also accepts a JSON number
//! with at most two decimals.
//!
//! ## Usage
//! ```rust
//! use carwash_core::money::Money;
//!
//! let price: Money = "115.00".parse().unwrap();
//! assert_eq!(price.cents(), 11500);
//! assert_eq!(price.to_string(), "115.00");
//!
//! let line = price.checked_mul_quantity(2).unwrap();
//! assert_eq!(line.to_string(), "230.00");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::TaxRate;

/// Basis points in 100%.
const BPS_SCALE: i128 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (1/100 of a Lempira).
///
/// ## Design Decisions
/// - **i64 (signed)**: the type itself allows negatives; the catalog
///   validation forbids negative prices
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **String serde**: `"115.00"` on the wire, never a float
///
/// ## Where Money is Used
/// ```text
/// Service.price ──► InvoiceLine.unit_price ──► InvoiceLine.line_subtotal
///                                                   │
///                       ┌───────────────────────────┴───────────┐
///                       ▼                                       ▼
///             taxable: back_out_tax()                 exempt: as-is
///              ├── net ──► Invoice.subtotal_taxable_net   │
///              └── tax ──► Invoice.tax_amount             ▼
///                                              Invoice.subtotal_exempt
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use carwash_core::money::Money;
    ///
    /// let price = Money::from_cents(25000); // L. 250.00
    /// assert_eq!(price.cents(), 25000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole Lempiras portion (truncated toward zero).
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// Returns `None` when the product does not fit in the money range.
    ///
    /// ## Example
    /// ```rust
    /// use carwash_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(5000); // L. 50.00
    /// assert_eq!(unit_price.checked_mul_quantity(2), Some(Money::from_cents(10000)));
    /// assert_eq!(unit_price.checked_mul_quantity(i64::MAX), None);
    /// ```
    #[inline]
    pub fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Adds two amounts, `None` on overflow.
    ///
    /// Every running total (invoice totals, report sums) goes through this.
    ///
    /// ## Example
    /// ```rust
    /// use carwash_core::money::Money;
    ///
    /// let a = Money::from_cents(11500);
    /// assert_eq!(a.checked_add(Money::from_cents(500)), Some(Money::from_cents(12000)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_add(a), None);
    /// ```
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Splits a tax-inclusive amount into its net base and the tax it carries.
    ///
    /// ## Formula
    /// ```text
    /// net = round_half_up(amount / (1 + rate))
    /// tax = amount - net
    /// ```
    /// Tax is derived by subtraction, so `net + tax == amount` holds exactly
    /// for every amount and rate.
    ///
    /// ## Example
    /// ```rust
    /// use carwash_core::money::Money;
    /// use carwash_core::types::TaxRate;
    ///
    /// let (net, tax) = Money::from_cents(11500).back_out_tax(TaxRate::from_bps(1500));
    /// assert_eq!(net.cents(), 10000); // L. 100.00
    /// assert_eq!(tax.cents(), 1500);  // L. 15.00
    /// ```
    pub fn back_out_tax(&self, rate: TaxRate) -> (Money, Money) {
        // i128 keeps amount × 10000 from overflowing
        let numerator = self.0 as i128 * BPS_SCALE;
        let denominator = BPS_SCALE + rate.bps() as i128;
        let net = Money(round_half_up_div(numerator, denominator) as i64);
        (net, *self - net)
    }

    /// Parses a decimal string such as `"115"`, `"115.5"` or `"-3.25"`.
    ///
    /// More than two decimal places is rejected rather than rounded, so a
    /// stored price always equals what the operator typed.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("must be a decimal number"));
        }
        if !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("must be a decimal number"));
        }
        if frac.len() > 2 {
            return Err(invalid("must have at most 2 decimal places"));
        }

        let whole: i64 = whole.parse().map_err(|_| invalid("amount is too large"))?;
        let frac_cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("must be a decimal number"))? * 10,
            _ => frac.parse().map_err(|_| invalid("must be a decimal number"))?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_cents))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

/// Integer division rounding half away from zero. `denominator` must be positive.
fn round_half_up_div(numerator: i128, denominator: i128) -> i128 {
    if numerator >= 0 {
        (2 * numerator + denominator) / (2 * denominator)
    } else {
        -((2 * -numerator + denominator) / (2 * denominator))
    }
}

/// Rounds `numerator / denominator` centavos half-up (used for averages).
pub fn divide_rounded(amount: Money, divisor: i64) -> Money {
    if divisor <= 0 {
        return Money::zero();
    }
    Money(round_half_up_div(amount.0 as i128, divisor as i128) as i64)
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain 2-decimal rendering (`"115.00"`), the same text used on the wire.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Only used where the result is known to fit (`back_out_tax`).
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
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
        f.write_str("a decimal amount with at most 2 decimal places")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::parse(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(100)
            .map(Money)
            .ok_or_else(|| E::custom("amount is too large"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .map(Money)
            .ok_or_else(|| E::custom("amount is too large"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        let scaled = v * 100.0;
        let cents = scaled.round();
        if !cents.is_finite() || cents.abs() > i64::MAX as f64 {
            return Err(E::custom("amount is too large"));
        }
        if (scaled - cents).abs() > 1e-6 {
            return Err(E::custom("must have at most 2 decimal places"));
        }
        Ok(Money(cents as i64))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
