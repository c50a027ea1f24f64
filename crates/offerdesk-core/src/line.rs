//! # Offer Line Items
//!
//! One product/service row inside an offer or an alternative offer.
//!
//! ## The Total Invariant
//! ```text
//! total == quantity × unit_price × (1 − discount / 100)
//! ```
//! `total` is derived. Every field that feeds it is private and every setter
//! recomputes it, so a line can never be observed out of sync. Deserialized
//! lines go through [`LineItemRecord`] and are recomputed on load as well.
//!
//! ## Bounds
//! ```text
//! 0 < quantity ≤ MAX_QUANTITY     0 ≤ unit_price ≤ MAX_AMOUNT     vat ≤ 100%
//! ```
//! Constructors clamp into these bounds and loading rejects records outside
//! them, so `quantity × unit_price` stays far below `Decimal::MAX`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::catalog::Product;
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Discount, VatRate};
use crate::{DEFAULT_VAT_RATE, MAX_AMOUNT, MAX_QUANTITY, MAX_VAT_RATE_PERCENT};

/// A single offer line.
///
/// ## Snapshot Fields
/// `product_id`, `name`, `description` and `photo_url` are frozen copies of
/// the catalog product at the time the line was added. Editing the product
/// later does not touch existing offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", try_from = "LineItemRecord")]
#[ts(export)]
pub struct LineItem {
    id: String,
    product_id: Option<String>,
    name: String,
    description: String,
    photo_url: Option<String>,
    #[ts(type = "string")]
    quantity: Decimal,
    unit_price: Money,
    vat_rate: VatRate,
    discount: Option<Discount>,
    total: Money,
}

/// Wire shape accepted when loading a line; `total` is optional and ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Money,
    #[serde(default)]
    pub vat_rate: Option<VatRate>,
    #[serde(default)]
    pub discount: Option<Discount>,
    #[serde(default)]
    pub total: Option<Money>,
}

impl TryFrom<LineItemRecord> for LineItem {
    type Error = ValidationError;

    /// Non-positive quantities and negative prices are clamped as in
    /// [`LineItem::new`]; values above the limits are rejected.
    fn try_from(record: LineItemRecord) -> Result<Self, Self::Error> {
        if record.quantity > quantity_limit() {
            return Err(out_of_range("quantity", Decimal::ZERO, quantity_limit()));
        }
        if record.unit_price.amount() > amount_limit() {
            return Err(out_of_range("unitPrice", Decimal::ZERO, amount_limit()));
        }
        let vat_rate = record.vat_rate.unwrap_or(DEFAULT_VAT_RATE);
        if vat_rate.percent() > vat_rate_limit() {
            return Err(out_of_range("vatRate", Decimal::ZERO, vat_rate_limit()));
        }

        let mut item = LineItem {
            id: record.id.unwrap_or_else(new_line_id),
            product_id: record.product_id,
            name: record.name,
            description: record.description,
            photo_url: record.photo_url,
            quantity: clamp_quantity(record.quantity),
            unit_price: clamp_unit_price(record.unit_price),
            vat_rate: VatRate::new(vat_rate.percent()),
            discount: record.discount.map(|d| Discount::new(d.percent())),
            total: Money::zero(),
        };
        item.recompute_total();
        Ok(item)
    }
}

fn out_of_range(field: &str, min: Decimal, max: Decimal) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: min.to_string(),
        max: max.to_string(),
    }
}

fn new_line_id() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn quantity_limit() -> Decimal {
    Decimal::from(MAX_QUANTITY as i64)
}

pub(crate) fn amount_limit() -> Decimal {
    Decimal::from(MAX_AMOUNT as i64)
}

fn vat_rate_limit() -> Decimal {
    Decimal::from(MAX_VAT_RATE_PERCENT as i64)
}

/// Quantities must be positive; anything else becomes 1. Values above
/// `MAX_QUANTITY` are capped.
pub(crate) fn clamp_quantity(quantity: Decimal) -> Decimal {
    if quantity > Decimal::ZERO {
        quantity.min(quantity_limit())
    } else {
        Decimal::ONE
    }
}

fn clamp_unit_price(unit_price: Money) -> Money {
    Money::new(unit_price.amount().max(Decimal::ZERO).min(amount_limit()))
}

fn clamp_vat_rate(rate: VatRate) -> VatRate {
    VatRate::new(rate.percent().min(vat_rate_limit()))
}

impl LineItem {
    /// Creates a free-form line with a fresh id and no discount.
    ///
    /// Non-positive quantities clamp to 1 and negative prices to 0. Values
    /// above the limits are capped at `MAX_QUANTITY`, `MAX_AMOUNT` and 100%.
    ///
    /// ## Example
    /// ```rust
    /// use offerdesk_core::line::LineItem;
    /// use offerdesk_core::money::Money;
    /// use offerdesk_core::types::VatRate;
    /// use rust_decimal::Decimal;
    ///
    /// let line = LineItem::new(
    ///     "Consulting (hourly)",
    ///     Decimal::TWO,
    ///     Money::new(Decimal::from(100)),
    ///     VatRate::from_whole_percent(20),
    /// );
    /// assert_eq!(line.total(), Money::new(Decimal::from(200)));
    /// ```
    pub fn new(
        name: impl Into<String>,
        quantity: Decimal,
        unit_price: Money,
        vat_rate: VatRate,
    ) -> Self {
        let mut item = LineItem {
            id: new_line_id(),
            product_id: None,
            name: name.into(),
            description: String::new(),
            photo_url: None,
            quantity: clamp_quantity(quantity),
            unit_price: clamp_unit_price(unit_price),
            vat_rate: clamp_vat_rate(vat_rate),
            discount: None,
            total: Money::zero(),
        };
        item.recompute_total();
        item
    }

    /// Creates a line from a catalog product: quantity 1, no discount,
    /// the product's VAT rate or 20% when it has none.
    pub fn from_product(product: &Product) -> Self {
        let mut item = LineItem::new(
            product.name.clone(),
            Decimal::ONE,
            product.selling_price,
            product.vat_rate.unwrap_or(DEFAULT_VAT_RATE),
        );
        item.product_id = Some(product.id.clone());
        item.description = product.description.clone();
        item.photo_url = product.photo_url.clone();
        item.discount = Some(Discount::none());
        item.recompute_total();
        item
    }

    /// Replaces the generated id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the discount and recomputes the total.
    pub fn with_discount(mut self, discount: Discount) -> Self {
        self.set_discount(discount);
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn product_id(&self) -> Option<&str> {
        self.product_id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn photo_url(&self) -> Option<&str> {
        self.photo_url.as_deref()
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    /// VAT-exclusive unit price.
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn vat_rate(&self) -> VatRate {
        self.vat_rate
    }

    /// The discount, with an absent discount read as 0%.
    pub fn discount(&self) -> Discount {
        self.discount.unwrap_or_default()
    }

    /// VAT-exclusive, discount-applied line total.
    pub fn total(&self) -> Money {
        self.total
    }

    /// `quantity × unit_price`, before discount. Cannot overflow: both
    /// factors are held inside their limits.
    pub fn base_total(&self) -> Money {
        self.unit_price * self.quantity
    }

    // -------------------------------------------------------------------------
    // Mutation (each setter restores the total invariant)
    // -------------------------------------------------------------------------

    pub(crate) fn set_quantity(&mut self, quantity: Decimal) {
        self.quantity = clamp_quantity(quantity);
        self.recompute_total();
    }

    pub(crate) fn set_unit_price(&mut self, unit_price: Money) {
        self.unit_price = clamp_unit_price(unit_price);
        self.recompute_total();
    }

    pub(crate) fn set_discount(&mut self, discount: Discount) {
        self.discount = Some(discount);
        self.recompute_total();
    }

    pub(crate) fn set_vat_rate(&mut self, vat_rate: VatRate) {
        self.vat_rate = clamp_vat_rate(vat_rate);
        self.recompute_total();
    }

    pub(crate) fn clear_description(&mut self) {
        self.description.clear();
    }

    fn recompute_total(&mut self) {
        self.total = crate::pricing::line_total(self);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(quantity: Decimal, price: Decimal) -> LineItem {
        LineItem::new("Cable", quantity, Money::new(price), VatRate::from_whole_percent(20))
    }

    #[test]
    fn test_new_line_computes_total() {
        let item = line(dec!(3), dec!(12.5));
        assert_eq!(item.total(), Money::new(dec!(37.5)));
        assert!(!item.id().is_empty());
    }

    #[test]
    fn test_non_positive_quantity_clamps_to_one() {
        assert_eq!(line(dec!(0), dec!(10)).quantity(), dec!(1));
        assert_eq!(line(dec!(-4), dec!(10)).quantity(), dec!(1));
    }

    #[test]
    fn test_setters_keep_total_in_sync() {
        let mut item = line(dec!(2), dec!(100));
        item.set_discount(Discount::from_whole_percent(10));
        assert_eq!(item.total(), Money::new(dec!(180)));

        item.set_quantity(dec!(4));
        assert_eq!(item.total(), Money::new(dec!(360)));

        item.set_unit_price(Money::new(dec!(50)));
        assert_eq!(item.total(), Money::new(dec!(180)));
    }

    #[test]
    fn test_absent_discount_reads_as_zero() {
        let item = line(dec!(1), dec!(10));
        assert!(item.discount().is_zero());
    }

    #[test]
    fn test_deserialize_recomputes_stale_total() {
        let json = r#"{
            "id": "line-1",
            "name": "Router",
            "quantity": "2",
            "unitPrice": "150",
            "vatRate": "20",
            "discount": "10",
            "total": "999999"
        }"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id(), "line-1");
        assert_eq!(item.total(), Money::new(dec!(270)));
    }

    #[test]
    fn test_deserialize_rejects_oversized_line() {
        let json = r#"{"name":"x","quantity":"1000000000000000","unitPrice":"1000000000000000"}"#;
        let err = serde_json::from_str::<LineItem>(json).unwrap_err();
        assert!(err.to_string().contains("quantity"), "{err}");

        let json = r#"{"name":"x","quantity":"1","unitPrice":"1000000000000000"}"#;
        let err = serde_json::from_str::<LineItem>(json).unwrap_err();
        assert!(err.to_string().contains("unitPrice"), "{err}");

        let json = r#"{"name":"x","quantity":"1","unitPrice":"10","vatRate":"1000"}"#;
        assert!(serde_json::from_str::<LineItem>(json).is_err());
    }

    #[test]
    fn test_new_line_caps_values_at_limits() {
        let item = LineItem::new(
            "Bulk",
            dec!(5000000),
            Money::new(dec!(5000000000000)),
            VatRate::new(dec!(250)),
        );
        assert_eq!(item.quantity(), dec!(1000000));
        assert_eq!(item.unit_price(), Money::new(dec!(1000000000000)));
        assert_eq!(item.vat_rate(), VatRate::from_whole_percent(100));
        assert_eq!(item.total(), Money::new(dec!(1000000000000000000)));
    }

    #[test]
    fn test_deserialize_defaults_vat_rate() {
        let json = r#"{ "name": "Service", "quantity": 0, "unitPrice": 350 }"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.vat_rate(), DEFAULT_VAT_RATE);
        assert_eq!(item.quantity(), dec!(1));
        assert_eq!(item.total(), Money::new(dec!(350)));
    }
}
