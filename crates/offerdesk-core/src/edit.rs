//! # Line Edit Commands
//!
//! The closed set of edits a user can make to one offer line. Each variant
//! carries the raw number the editor produced; the pricing functions decide
//! whether to apply, clamp or drop it.
//!
//! ```text
//! keystroke "12,5" ──► parse_numeric ──► LineEdit::Quantity(12.5)
//!                                             │
//!                          LineEdit::apply(item, tax_mode)
//!                                             │
//!                 Applied │ Clamped (e.g. qty 0 → 1) │ Rejected (NaN price)
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::line::LineItem;
use crate::pricing;
use crate::types::TaxMode;

/// One edit to one line.
///
/// `UnitPrice` and `Total` carry the *displayed* value, which is
/// VAT-inclusive when the draft's tax mode is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum LineEdit {
    Quantity(f64),
    Discount(f64),
    UnitPrice(f64),
    Total(f64),
    VatRate(f64),
}

/// What happened to an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EditOutcome {
    /// Value stored as entered.
    Applied,
    /// Value replaced by a safe default (quantity 1, discount 0/100, VAT 0).
    Clamped,
    /// Value ignored; the line is unchanged.
    Rejected,
}

impl LineEdit {
    /// Applies the edit and restores the line-total invariant.
    pub fn apply(self, item: &mut LineItem, mode: TaxMode) -> EditOutcome {
        let outcome = match self {
            LineEdit::Quantity(v) => pricing::apply_edited_quantity(item, v),
            LineEdit::Discount(v) => pricing::apply_edited_discount(item, v),
            LineEdit::UnitPrice(v) => pricing::apply_edited_unit_price(item, v, mode),
            LineEdit::Total(v) => pricing::apply_edited_line_total(item, v, mode),
            LineEdit::VatRate(v) => pricing::apply_edited_vat_rate(item, v),
        };

        if outcome != EditOutcome::Applied {
            debug!(line_id = item.id(), edit = ?self, ?outcome, "line edit not applied as entered");
        }
        outcome
    }

    /// The raw value carried by the edit.
    pub fn value(&self) -> f64 {
        match *self {
            LineEdit::Quantity(v)
            | LineEdit::Discount(v)
            | LineEdit::UnitPrice(v)
            | LineEdit::Total(v)
            | LineEdit::VatRate(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::VatRate;
    use rust_decimal_macros::dec;

    fn line() -> LineItem {
        LineItem::new("Panel", dec!(2), Money::new(dec!(100)), VatRate::from_whole_percent(20))
    }

    #[test]
    fn test_dispatch_by_variant() {
        let mut item = line();
        assert_eq!(LineEdit::Quantity(3.0).apply(&mut item, TaxMode::Exclusive), EditOutcome::Applied);
        assert_eq!(item.total(), Money::new(dec!(300)));

        LineEdit::UnitPrice(60.0).apply(&mut item, TaxMode::Inclusive);
        assert_eq!(item.unit_price(), Money::new(dec!(50)));

        LineEdit::Total(360.0).apply(&mut item, TaxMode::Inclusive);
        assert_eq!(item.unit_price(), Money::new(dec!(100)));
        assert_eq!(item.total(), Money::new(dec!(300)));
    }

    #[test]
    fn test_outcomes_reported() {
        let mut item = line();
        assert_eq!(LineEdit::Quantity(-2.0).apply(&mut item, TaxMode::Exclusive), EditOutcome::Clamped);
        assert_eq!(
            LineEdit::UnitPrice(f64::NAN).apply(&mut item, TaxMode::Exclusive),
            EditOutcome::Rejected
        );
    }

    #[test]
    fn test_serde_shape() {
        let edit: LineEdit = serde_json::from_str(r#"{"field":"unitPrice","value":120}"#).unwrap();
        assert_eq!(edit, LineEdit::UnitPrice(120.0));
        assert_eq!(edit.value(), 120.0);
    }
}
