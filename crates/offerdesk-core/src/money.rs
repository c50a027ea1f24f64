//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  THE INTEGER CENTS PROBLEM                                              │
//! │    A VAT-inclusive price of 10.00 at 20% is 8.3333... net.              │
//! │    Cents force a rounding step inside the back-solve, so editing a      │
//! │    displayed total never reproduces the number the user typed.          │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal (28 significant digits)                  │
//! │    120 / 1.2 = 100 exactly, 0.1 + 0.2 = 0.3 exactly                     │
//! │    Rounding to cents happens only at display/snapshot time              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use offerdesk_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let price = Money::new(Decimal::new(1099, 2)); // 10.99
//! let doubled = price * Decimal::TWO;             // 21.98
//! assert_eq!(doubled.to_string(), "21.98");
//! ```

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::{Discount, VatRate};

/// Decimal places kept when a value is snapshotted or displayed.
pub const CENT_PLACES: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the offer's base currency.
///
/// ## Design Decisions
/// - **Decimal (signed)**: negative values appear transiently (discount
///   amounts subtracted from subtotals); stored prices are never negative
/// - **Single field tuple struct**: zero-cost abstraction over `Decimal`
/// - **Serialized as a string**: `"100.00"`, so JSON never goes through f64
///
/// ## Where Money is Used
/// ```text
/// Product.selling_price ──► LineItem.unit_price ──► LineItem.total
///                                                        │
///                         OfferTotals (subtotals, tax, grand total) ◄─┘
///                                                        │
///                         Offer snapshot (rounded to cents) ◄─┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Converts a user-entered float, rejecting NaN and infinities.
    ///
    /// ## Example
    /// ```rust
    /// use offerdesk_core::money::Money;
    ///
    /// assert!(Money::from_f64(120.0).is_some());
    /// assert!(Money::from_f64(f64::NAN).is_none());
    /// assert!(Money::from_f64(f64::INFINITY).is_none());
    /// ```
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Decimal::from_f64(value).map(Money)
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Lossy conversion for display widgets and tolerance checks.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to cents, half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use offerdesk_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let net = Money::new(Decimal::new(833_333, 4)); // 83.3333
    /// assert_eq!(net.round_cents().to_string(), "83.33");
    /// ```
    pub fn round_cents(&self) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// VAT owed on this net amount: `amount × rate / 100`.
    ///
    /// ## Example
    /// ```rust
    /// use offerdesk_core::money::Money;
    /// use offerdesk_core::types::VatRate;
    /// use rust_decimal::Decimal;
    ///
    /// let net = Money::new(Decimal::from(200));
    /// let vat = net.vat_amount(VatRate::from_whole_percent(20));
    /// assert_eq!(vat, Money::new(Decimal::from(40)));
    /// ```
    pub fn vat_amount(&self, rate: VatRate) -> Money {
        Money(self.0 * rate.fraction())
    }

    /// Adds VAT on top: `amount × (1 + rate / 100)`.
    pub fn with_vat(&self, rate: VatRate) -> Money {
        Money(self.0 * rate.gross_factor())
    }

    /// Backs VAT out of a gross amount: `amount / (1 + rate / 100)`.
    ///
    /// `gross_factor` is at least 1 for any non-negative rate, so the
    /// division is always defined.
    pub fn without_vat(&self, rate: VatRate) -> Money {
        Money(self.0 / rate.gross_factor())
    }

    /// The part of this amount removed by a percentage discount.
    pub fn discount_amount(&self, discount: Discount) -> Money {
        Money(self.0 * discount.fraction())
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Example
    /// ```rust
    /// use offerdesk_core::money::Money;
    /// use offerdesk_core::types::Discount;
    /// use rust_decimal::Decimal;
    ///
    /// let base = Money::new(Decimal::from(200));
    /// let discounted = base.apply_discount(Discount::from_whole_percent(10));
    /// assert_eq!(discounted, Money::new(Decimal::from(180)));
    /// ```
    pub fn apply_discount(&self, discount: Discount) -> Money {
        *self - self.discount_amount(discount)
    }

    /// Formats with explicit separators, always two fraction digits.
    ///
    /// ## Example
    /// ```rust
    /// use offerdesk_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let amount = Money::new(Decimal::new(123_456_789, 2));
    /// assert_eq!(amount.format_with('.', ','), "1.234.567,89");
    /// ```
    pub fn format_with(&self, thousands: char, decimal: char) -> String {
        let rounded = self.round_cents().0;
        let plain = format!("{:.2}", rounded.abs());
        let (whole, frac) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(thousands);
            }
            grouped.push(ch);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}{grouped}{decimal}{frac}")
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain `1234.50` rendering. Use `format_with` for localized output.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.round_cents().0)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a quantity or factor.
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, factor: Decimal) -> Self {
        Money(self.0 * factor)
    }
}

/// Division by a non-zero quantity or factor. Callers check for zero.
impl Div<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn div(self, divisor: Decimal) -> Self {
        Money(self.0 / divisor)
    }
}

/// Sums in iteration order.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Money::new(dec!(10.99)).to_string(), "10.99");
        assert_eq!(Money::new(dec!(5)).to_string(), "5.00");
        assert_eq!(Money::new(dec!(-5.5)).to_string(), "-5.50");
        assert_eq!(Money::new(dec!(0.005)).to_string(), "0.01");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(dec!(10));
        let b = Money::new(dec!(5));

        assert_eq!(a + b, Money::new(dec!(15)));
        assert_eq!(a - b, Money::new(dec!(5)));
        assert_eq!(a * dec!(3), Money::new(dec!(30)));
        assert_eq!(a / dec!(4), Money::new(dec!(2.5)));
    }

    #[test]
    fn test_decimal_sums_are_exact() {
        let total: Money = [dec!(0.1), dec!(0.2)].into_iter().map(Money::new).sum();
        assert_eq!(total, Money::new(dec!(0.3)));
    }

    #[test]
    fn test_vat_round_trip() {
        let gross = Money::new(dec!(120));
        let rate = VatRate::from_whole_percent(20);
        let net = gross.without_vat(rate);
        assert_eq!(net, Money::new(dec!(100)));
        assert_eq!(net.with_vat(rate), gross);
        assert_eq!(net.vat_amount(rate), Money::new(dec!(20)));
    }

    #[test]
    fn test_from_f64_rejects_non_finite() {
        assert_eq!(Money::from_f64(99.5), Some(Money::new(dec!(99.5))));
        assert_eq!(Money::from_f64(f64::NAN), None);
        assert_eq!(Money::from_f64(f64::NEG_INFINITY), None);
    }

    #[test]
    fn test_format_with_separators() {
        assert_eq!(Money::new(dec!(0)).format_with('.', ','), "0,00");
        assert_eq!(Money::new(dec!(999.999)).format_with('.', ','), "1.000,00");
        assert_eq!(Money::new(dec!(1234.5)).format_with(',', '.'), "1,234.50");
        assert_eq!(Money::new(dec!(-1234567)).format_with('.', ','), "-1.234.567,00");
    }

    #[test]
    fn test_negative_checks() {
        assert!(Money::new(dec!(-1)).is_negative());
        assert!(!Money::zero().is_negative());
        assert!(Money::zero().is_zero());
    }
}
