//! # Domain Types
//!
//! Small value types shared by the pricing engine, drafts and records.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Value Types                                     │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    VatRate      │   │    Discount     │   │ DisplayOptions  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  percent (dec)  │   │  percent (dec)  │   │  tax_mode       │       │
//! │  │  20 = 20%       │   │  10 = 10% off   │   │  vat_visible    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    TaxMode      │   │    Currency     │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  Exclusive      │   │  TRY            │                             │
//! │  │  Inclusive      │   │  USD            │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// VAT Rate
// =============================================================================

/// VAT rate as a percentage (20 means 20%).
///
/// Always non-negative. The 100% upper bound is enforced by `LineItem`,
/// not here, so catalog records created elsewhere still load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VatRate(#[ts(type = "string")] Decimal);

impl VatRate {
    /// Creates a rate from a whole percentage.
    #[inline]
    pub const fn from_whole_percent(percent: u32) -> Self {
        VatRate(Decimal::from_parts(percent, 0, 0, false, 0))
    }

    /// Creates a rate from a decimal percentage; negatives clamp to zero.
    pub fn new(percent: Decimal) -> Self {
        VatRate(percent.max(Decimal::ZERO))
    }

    /// Zero rate (VAT-exempt lines).
    #[inline]
    pub const fn zero() -> Self {
        VatRate(Decimal::ZERO)
    }

    /// Returns the rate as a percentage.
    #[inline]
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    /// `rate / 100`
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// `1 + rate / 100`, the multiplier from net to gross.
    pub fn gross_factor(&self) -> Decimal {
        Decimal::ONE + self.fraction()
    }

    /// Checks if the rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

// =============================================================================
// Discount
// =============================================================================

/// Line discount as a percentage, clamped to `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Discount(#[ts(type = "string")] Decimal);

impl Discount {
    /// Creates a discount from a whole percentage (clamped at 100).
    pub fn from_whole_percent(percent: u32) -> Self {
        Discount::new(Decimal::from(percent))
    }

    /// Creates a discount, clamping into `[0, 100]`.
    pub fn new(percent: Decimal) -> Self {
        Discount(percent.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED))
    }

    /// No discount.
    #[inline]
    pub const fn none() -> Self {
        Discount(Decimal::ZERO)
    }

    #[inline]
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    /// `discount / 100`
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// `1 - discount / 100`; zero for a full (100%) discount.
    pub fn factor(&self) -> Decimal {
        Decimal::ONE - self.fraction()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// True for a 100% discount, where the discount cannot be backed out.
    pub fn is_full(&self) -> bool {
        self.factor() <= Decimal::ZERO
    }
}

// =============================================================================
// Display Configuration
// =============================================================================

/// Whether displayed/entered prices contain VAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    /// Price + VAT shown separately; VAT is added on top.
    #[default]
    Exclusive,
    /// Displayed prices already include VAT; tax is backed out.
    Inclusive,
}

impl TaxMode {
    /// Builds the mode from the UI's "VAT included" toggle.
    pub fn from_vat_included(vat_included: bool) -> Self {
        if vat_included {
            TaxMode::Inclusive
        } else {
            TaxMode::Exclusive
        }
    }

    #[inline]
    pub fn is_inclusive(&self) -> bool {
        matches!(self, TaxMode::Inclusive)
    }
}

/// The two global display flags of an offer.
///
/// `vat_visible == false` hides VAT entirely: no tax, no breakdown, and the
/// grand total equals the discounted subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DisplayOptions {
    pub tax_mode: TaxMode,
    pub vat_visible: bool,
}

impl DisplayOptions {
    pub fn new(tax_mode: TaxMode, vat_visible: bool) -> Self {
        DisplayOptions {
            tax_mode,
            vat_visible,
        }
    }

    /// Shorthand matching the UI's two toggles.
    pub fn from_flags(vat_included: bool, vat_visible: bool) -> Self {
        DisplayOptions::new(TaxMode::from_vat_included(vat_included), vat_visible)
    }
}

impl Default for DisplayOptions {
    /// VAT added on top and shown.
    fn default() -> Self {
        DisplayOptions::new(TaxMode::Exclusive, true)
    }
}

// =============================================================================
// Currency
// =============================================================================

/// Currency a catalog price was originally entered in.
///
/// Offers are always priced in TRY; USD products carry their original
/// price and the exchange rate used for conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Try,
    Usd,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_vat_rate_factors() {
        let rate = VatRate::from_whole_percent(20);
        assert_eq!(rate.percent(), dec!(20));
        assert_eq!(rate.fraction(), dec!(0.2));
        assert_eq!(rate.gross_factor(), dec!(1.2));
    }

    #[test]
    fn test_vat_rate_negative_clamps() {
        assert!(VatRate::new(dec!(-5)).is_zero());
    }

    #[test]
    fn test_discount_clamps_into_range() {
        assert_eq!(Discount::new(dec!(-3)).percent(), dec!(0));
        assert_eq!(Discount::new(dec!(150)).percent(), dec!(100));
        assert_eq!(Discount::new(dec!(12.5)).factor(), dec!(0.875));
    }

    #[test]
    fn test_full_discount_detected() {
        assert!(Discount::from_whole_percent(100).is_full());
        assert!(!Discount::from_whole_percent(99).is_full());
    }

    #[test]
    fn test_tax_mode_default() {
        assert_eq!(TaxMode::default(), TaxMode::Exclusive);
        assert_eq!(TaxMode::from_vat_included(true), TaxMode::Inclusive);
    }

    #[test]
    fn test_display_options_default_shows_vat() {
        let display = DisplayOptions::default();
        assert!(display.vat_visible);
        assert!(!display.tax_mode.is_inclusive());
    }

    #[test]
    fn test_currency_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"USD\"");
    }
}
