//! # Pricing Calculator
//!
//! Pure functions that turn offer lines plus display flags into totals, and
//! back-solve unit prices from edited displayed values.
//!
//! ## Forward Direction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lines ──► Σ qty×price ──► − discounts ──► subtotal after discount      │
//! │                                                  │                      │
//! │            vat hidden ───────────────────────────┼──► grand = subtotal  │
//! │                                                  │                      │
//! │            exclusive: tax = Σ total×rate/100 ────┼──► grand = sub + tax │
//! │                                                  │                      │
//! │            inclusive: grand = Σ total×(1+rate/100)                      │
//! │                       tax   = grand − subtotal  (backed out)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Inverse Direction
//! ```text
//!  displayed value ──► (÷ (1+rate/100) if inclusive) ──► net value
//!     unit price edit:  unit_price = net
//!     total edit:       unit_price = net ÷ (1 − discount/100) ÷ quantity
//!                       100% discount: unit_price = net ÷ quantity
//! ```
//!
//! Every sum runs in input list order. Nothing here fails: malformed edit
//! values are clamped or ignored and reported through [`EditOutcome`].

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::edit::EditOutcome;
use crate::line::{amount_limit, LineItem};
use crate::money::Money;
use crate::types::{Discount, DisplayOptions, TaxMode, VatRate};
use crate::{MAX_AMOUNT, MAX_QUANTITY, MAX_VAT_RATE_PERCENT};

// =============================================================================
// Totals Projection
// =============================================================================

/// Tax attributable to one VAT rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VatBreakdownEntry {
    pub rate: VatRate,
    pub tax: Money,
}

/// Aggregate totals of one line list. Recomputed on demand, never stored
/// as an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OfferTotals {
    pub sub_total_before_discount: Money,
    pub discount_total: Money,
    pub sub_total_after_discount: Money,
    pub tax: Money,
    pub grand_total: Money,
    /// Present only when the lines span at least two distinct VAT rates.
    /// Entries follow the order in which each rate first appears.
    pub vat_breakdown: Option<Vec<VatBreakdownEntry>>,
}

impl OfferTotals {
    /// Totals of an empty list.
    pub fn empty() -> Self {
        OfferTotals {
            sub_total_before_discount: Money::zero(),
            discount_total: Money::zero(),
            sub_total_after_discount: Money::zero(),
            tax: Money::zero(),
            grand_total: Money::zero(),
            vat_breakdown: None,
        }
    }
}

/// `quantity × unit_price × (1 − discount / 100)`, VAT-exclusive.
///
/// Computed as base minus discount amount so the discount column and the
/// line total always add back up to the base.
///
/// ## Example
/// ```rust
/// use offerdesk_core::line::LineItem;
/// use offerdesk_core::money::Money;
/// use offerdesk_core::pricing::line_total;
/// use offerdesk_core::types::{Discount, VatRate};
/// use rust_decimal::Decimal;
///
/// let item = LineItem::new("Switch", Decimal::TWO, Money::new(Decimal::from(100)), VatRate::from_whole_percent(20))
///     .with_discount(Discount::from_whole_percent(10));
/// assert_eq!(line_total(&item), Money::new(Decimal::from(180)));
/// ```
pub fn line_total(item: &LineItem) -> Money {
    let base = item.base_total();
    base - base.discount_amount(item.discount())
}

/// VAT on one line under the given mode.
///
/// Exclusive adds `total × rate / 100`; inclusive backs it out of the gross
/// line (`total × (1 + rate / 100) − total`). Both are equal in exact
/// arithmetic; keeping the two forms mirrors how the aggregate is derived.
fn line_tax(item: &LineItem, mode: TaxMode) -> Money {
    match mode {
        TaxMode::Exclusive => item.total().vat_amount(item.vat_rate()),
        TaxMode::Inclusive => item.total().with_vat(item.vat_rate()) - item.total(),
    }
}

/// Computes the totals projection for a line list.
///
/// ## Example
/// ```rust
/// use offerdesk_core::line::LineItem;
/// use offerdesk_core::money::Money;
/// use offerdesk_core::pricing::offer_totals;
/// use offerdesk_core::types::{DisplayOptions, VatRate};
/// use rust_decimal::Decimal;
///
/// let items = vec![LineItem::new("Switch", Decimal::TWO, Money::new(Decimal::from(100)), VatRate::from_whole_percent(20))];
/// let totals = offer_totals(&items, DisplayOptions::default());
/// assert_eq!(totals.tax, Money::new(Decimal::from(40)));
/// assert_eq!(totals.grand_total, Money::new(Decimal::from(240)));
/// assert!(totals.vat_breakdown.is_none());
/// ```
pub fn offer_totals(items: &[LineItem], display: DisplayOptions) -> OfferTotals {
    let sub_total_before_discount: Money = items.iter().map(LineItem::base_total).sum();
    let discount_total: Money = items
        .iter()
        .map(|item| item.base_total().discount_amount(item.discount()))
        .sum();
    let sub_total_after_discount = sub_total_before_discount - discount_total;

    if !display.vat_visible {
        return OfferTotals {
            sub_total_before_discount,
            discount_total,
            sub_total_after_discount,
            tax: Money::zero(),
            grand_total: sub_total_after_discount,
            vat_breakdown: None,
        };
    }

    let (tax, grand_total) = match display.tax_mode {
        TaxMode::Exclusive => {
            let tax: Money = items.iter().map(|i| line_tax(i, TaxMode::Exclusive)).sum();
            (tax, sub_total_after_discount + tax)
        }
        TaxMode::Inclusive => {
            let grand: Money = items
                .iter()
                .map(|item| item.total().with_vat(item.vat_rate()))
                .sum();
            (grand - sub_total_after_discount, grand)
        }
    };

    OfferTotals {
        sub_total_before_discount,
        discount_total,
        sub_total_after_discount,
        tax,
        grand_total,
        vat_breakdown: vat_breakdown(items, display.tax_mode),
    }
}

/// Per-rate tax, or `None` when fewer than two distinct rates are present.
///
/// Single-rate offers show one rolled-up tax figure instead of a breakdown.
pub fn vat_breakdown(items: &[LineItem], mode: TaxMode) -> Option<Vec<VatBreakdownEntry>> {
    let mut entries: Vec<VatBreakdownEntry> = Vec::new();
    for item in items {
        let tax = line_tax(item, mode);
        match entries.iter_mut().find(|e| e.rate == item.vat_rate()) {
            Some(entry) => entry.tax += tax,
            None => entries.push(VatBreakdownEntry {
                rate: item.vat_rate(),
                tax,
            }),
        }
    }

    (entries.len() >= 2).then_some(entries)
}

// =============================================================================
// Displayed Values
// =============================================================================

/// Unit price as shown in the editor: gross when the mode is inclusive.
pub fn displayed_unit_price(item: &LineItem, mode: TaxMode) -> Money {
    to_display(item.unit_price(), item.vat_rate(), mode)
}

/// Line total as shown in the editor: gross when the mode is inclusive.
pub fn displayed_line_total(item: &LineItem, mode: TaxMode) -> Money {
    to_display(item.total(), item.vat_rate(), mode)
}

fn to_display(net: Money, rate: VatRate, mode: TaxMode) -> Money {
    match mode {
        TaxMode::Exclusive => net,
        TaxMode::Inclusive => net.with_vat(rate),
    }
}

fn from_display(displayed: Money, rate: VatRate, mode: TaxMode) -> Money {
    match mode {
        TaxMode::Exclusive => displayed,
        TaxMode::Inclusive => displayed.without_vat(rate),
    }
}

// =============================================================================
// Inverse Editing
// =============================================================================

/// Parses an edited money value. Non-finite, negative or out-of-range
/// input yields `None` and the edit is dropped.
fn edited_amount(value: f64, field: &'static str) -> Option<Money> {
    if !value.is_finite() || value < 0.0 || value > MAX_AMOUNT {
        debug!(field, value, "ignoring edited amount");
        return None;
    }
    Money::from_f64(value)
}

/// Stores a new displayed unit price, backing VAT out first when the
/// display is VAT-inclusive. The stored price is always VAT-exclusive.
pub fn apply_edited_unit_price(item: &mut LineItem, displayed: f64, mode: TaxMode) -> EditOutcome {
    let Some(displayed) = edited_amount(displayed, "unit_price") else {
        return EditOutcome::Rejected;
    };
    item.set_unit_price(from_display(displayed, item.vat_rate(), mode));
    EditOutcome::Applied
}

/// Back-solves the unit price from a new displayed line total.
///
/// With a 100% discount the discount factor is zero and cannot be divided
/// out; the net value is then spread over the quantity as-is. A discount
/// just under 100% or a tiny quantity can push the solved price past
/// `MAX_AMOUNT`; such edits are rejected and the line is left unchanged.
pub fn apply_edited_line_total(item: &mut LineItem, displayed: f64, mode: TaxMode) -> EditOutcome {
    let Some(displayed) = edited_amount(displayed, "total") else {
        return EditOutcome::Rejected;
    };
    let value_without_vat = from_display(displayed, item.vat_rate(), mode).amount();

    let quantity = item.quantity();
    if quantity <= Decimal::ZERO {
        return EditOutcome::Rejected;
    }

    let factor = item.discount().factor();
    let unit_price = if factor > Decimal::ZERO {
        value_without_vat
            .checked_div(factor)
            .and_then(|net| net.checked_div(quantity))
    } else {
        value_without_vat.checked_div(quantity)
    };

    match unit_price.filter(|price| *price <= amount_limit()) {
        Some(price) => {
            item.set_unit_price(Money::new(price));
            EditOutcome::Applied
        }
        None => {
            debug!(%quantity, discount = %item.discount().percent(), "solved unit price out of range");
            EditOutcome::Rejected
        }
    }
}

/// Sets the quantity; anything not strictly positive (or too small to
/// survive the conversion to `Decimal`) becomes 1.
pub fn apply_edited_quantity(item: &mut LineItem, value: f64) -> EditOutcome {
    if value > MAX_QUANTITY {
        debug!(value, "ignoring quantity above limit");
        return EditOutcome::Rejected;
    }
    match Decimal::from_f64(value).filter(|q| *q > Decimal::ZERO) {
        Some(quantity) => {
            item.set_quantity(quantity);
            EditOutcome::Applied
        }
        None => {
            item.set_quantity(Decimal::ONE);
            EditOutcome::Clamped
        }
    }
}

/// Sets the discount percentage; negatives (and NaN) become 0, values
/// above 100 become 100.
pub fn apply_edited_discount(item: &mut LineItem, value: f64) -> EditOutcome {
    if value > 100.0 {
        item.set_discount(Discount::from_whole_percent(100));
        return EditOutcome::Clamped;
    }
    match Decimal::from_f64(value).filter(|d| *d >= Decimal::ZERO) {
        Some(percent) => {
            item.set_discount(Discount::new(percent));
            EditOutcome::Applied
        }
        None => {
            item.set_discount(Discount::none());
            EditOutcome::Clamped
        }
    }
}

/// Sets the VAT rate. Non-finite input and rates above 100% are ignored;
/// negatives become 0.
pub fn apply_edited_vat_rate(item: &mut LineItem, value: f64) -> EditOutcome {
    if !value.is_finite() || value > MAX_VAT_RATE_PERCENT {
        debug!(value, "ignoring vat rate edit");
        return EditOutcome::Rejected;
    }
    match Decimal::from_f64(value).filter(|r| *r >= Decimal::ZERO) {
        Some(percent) => {
            item.set_vat_rate(VatRate::new(percent));
            EditOutcome::Applied
        }
        None => {
            item.set_vat_rate(VatRate::zero());
            EditOutcome::Clamped
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
