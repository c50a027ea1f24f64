//! # Product Catalog
//!
//! Catalog products and their currency handling.
//!
//! Offers are priced in TRY. A product entered in USD keeps its original
//! prices and the exchange rate used, so it can be repriced when the rate
//! changes:
//!
//! ```text
//! original_selling_price (USD) × exchange_rate ──► selling_price (TRY, 2 dp)
//! ```
//!
//! The rate itself comes from outside (user entry or a rate service); this
//! module never fetches it.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Currency, VatRate};
use crate::validation::{validate_exchange_rate, ValidationResult};

/// A product that can be added to offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    /// Supplier company name.
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sub_category: Option<String>,
    /// Purchase price in TRY.
    #[serde(default)]
    pub purchase_price: Option<Money>,
    /// Selling price in TRY, VAT-exclusive.
    pub selling_price: Money,
    /// Missing rates are treated as 20% when the product enters an offer.
    #[serde(default)]
    pub vat_rate: Option<VatRate>,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub original_purchase_price: Option<Money>,
    #[serde(default)]
    pub original_selling_price: Option<Money>,
    #[ts(type = "string | null")]
    #[serde(default)]
    pub exchange_rate: Option<Decimal>,
}

impl Product {
    /// Creates a TRY-priced product.
    pub fn new(id: impl Into<String>, name: impl Into<String>, selling_price: Money) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            photo_url: None,
            brand: None,
            company: None,
            category: None,
            sub_category: None,
            purchase_price: None,
            selling_price,
            vat_rate: None,
            currency: Currency::Try,
            original_purchase_price: None,
            original_selling_price: None,
            exchange_rate: None,
        }
    }

    pub fn with_vat_rate(mut self, rate: VatRate) -> Self {
        self.vat_rate = Some(rate);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Creates a product entered in USD, converting its prices to TRY.
    ///
    /// ## Example
    /// ```rust
    /// use offerdesk_core::catalog::Product;
    /// use offerdesk_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let p = Product::from_usd("p1", "Switch", Money::new(Decimal::from(10)), None, Decimal::new(3250, 2)).unwrap();
    /// assert_eq!(p.selling_price, Money::new(Decimal::new(32500, 2)));
    /// ```
    pub fn from_usd(
        id: impl Into<String>,
        name: impl Into<String>,
        usd_selling_price: Money,
        usd_purchase_price: Option<Money>,
        rate: Decimal,
    ) -> ValidationResult<Self> {
        validate_exchange_rate(rate)?;
        let mut product = Product::new(id, name, Money::zero());
        product.currency = Currency::Usd;
        product.original_selling_price = Some(usd_selling_price);
        product.original_purchase_price = usd_purchase_price;
        product.apply_rate(rate);
        Ok(product)
    }

    /// True when the product's TRY prices derive from a USD original.
    pub fn is_usd_priced(&self) -> bool {
        self.currency == Currency::Usd && self.original_selling_price.is_some()
    }

    fn apply_rate(&mut self, rate: Decimal) {
        if let Some(original) = self.original_selling_price {
            self.selling_price = (original * rate).round_cents();
        }
        self.purchase_price = self
            .original_purchase_price
            .map(|original| (original * rate).round_cents());
        self.exchange_rate = Some(rate);
    }
}

/// Reprices every USD product with a new exchange rate.
///
/// Returns how many products changed. TRY products are left alone.
pub fn reprice_usd(products: &mut [Product], rate: Decimal) -> ValidationResult<usize> {
    validate_exchange_rate(rate)?;

    let mut updated = 0;
    for product in products.iter_mut().filter(|p| p.is_usd_priced()) {
        product.apply_rate(rate);
        updated += 1;
    }
    tracing::info!(updated, %rate, "repriced USD products");
    Ok(updated)
}

/// Converts a user-entered rate, rejecting NaN, infinities and non-positive values.
pub fn exchange_rate_from_f64(rate: f64) -> ValidationResult<Decimal> {
    let rate = Decimal::from_f64(rate).ok_or_else(|| ValidationError::InvalidFormat {
        field: "exchange rate".to_string(),
        reason: "must be a finite number".to_string(),
    })?;
    validate_exchange_rate(rate)?;
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usd_product(id: &str, price: Decimal) -> Product {
        Product::from_usd(id, "Import", Money::new(price), Some(Money::new(dec!(7))), dec!(33)).unwrap()
    }

    #[test]
    fn test_from_usd_converts_and_rounds() {
        let p = Product::from_usd("p1", "Cable", Money::new(dec!(1.333)), None, dec!(32.5)).unwrap();
        assert_eq!(p.selling_price, Money::new(dec!(43.32)));
        assert_eq!(p.exchange_rate, Some(dec!(32.5)));
        assert_eq!(p.currency, Currency::Usd);
        assert!(p.purchase_price.is_none());
    }

    #[test]
    fn test_reprice_only_touches_usd_products() {
        let mut products = vec![
            usd_product("a", dec!(10)),
            Product::new("b", "Local", Money::new(dec!(50))),
            usd_product("c", dec!(2)),
        ];

        let updated = reprice_usd(&mut products, dec!(35)).unwrap();

        assert_eq!(updated, 2);
        assert_eq!(products[0].selling_price, Money::new(dec!(350)));
        assert_eq!(products[0].purchase_price, Some(Money::new(dec!(245))));
        assert_eq!(products[1].selling_price, Money::new(dec!(50)));
        assert_eq!(products[2].selling_price, Money::new(dec!(70)));
    }

    #[test]
    fn test_reprice_rejects_bad_rate() {
        let mut products = vec![usd_product("a", dec!(10))];
        assert!(reprice_usd(&mut products, dec!(0)).is_err());
        assert!(reprice_usd(&mut products, dec!(-3)).is_err());
        assert_eq!(products[0].selling_price, Money::new(dec!(330)));
    }

    #[test]
    fn test_exchange_rate_from_f64() {
        assert_eq!(exchange_rate_from_f64(32.5).unwrap(), dec!(32.5));
        assert!(exchange_rate_from_f64(f64::NAN).is_err());
        assert!(exchange_rate_from_f64(0.0).is_err());
    }

    #[test]
    fn test_product_json_defaults() {
        let p: Product =
            serde_json::from_str(r#"{"id":"p3","name":"Consulting","sellingPrice":350}"#).unwrap();
        assert_eq!(p.currency, Currency::Try);
        assert!(p.vat_rate.is_none());
        assert!(!p.is_usd_priced());
    }
}
