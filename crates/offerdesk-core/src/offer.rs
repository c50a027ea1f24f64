//! # Offer Records
//!
//! A saved offer: the draft's content plus totals frozen at save time.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   OfferDraft ──finalize()──► Offer{Quote} ──convert_to_order()──►       │
//! │       ▲                          │               Offer{Order}           │
//! │       │                          │                    │                 │
//! │       └────── to_draft() ────────┘                    │                 │
//! │                                                       ▼                 │
//! │          Offer{Quote} ◄──────── copy_as_new() ─────── (any)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Snapshotted totals are rounded to cents and never recomputed. Editing
//! a saved offer goes through [`Offer::to_draft`] and a new `finalize`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::company::CustomerRef;
use crate::draft::{AlternativeOffer, OfferDraft};
use crate::error::{CoreError, CoreResult};
use crate::line::LineItem;
use crate::money::Money;
use crate::types::DisplayOptions;
use crate::validation::{validate_customer_name, validate_line_items};
use crate::DEFAULT_VALIDITY_DAYS;

/// Where an offer is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    /// Sent to the customer, not yet accepted.
    #[default]
    Quote,
    /// Accepted by the customer.
    Order,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Quote => "quote",
            OfferStatus::Order => "order",
        }
    }
}

/// A saved offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub offer_number: String,
    #[ts(as = "Option<String>")]
    pub offer_date: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub validity_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub title_description: String,
    pub customer: CustomerRef,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub alternatives: Vec<AlternativeOffer>,
    #[serde(default)]
    pub document_notes: String,
    /// Main list total after discounts, before VAT.
    pub sub_total: Money,
    pub tax: Money,
    pub grand_total: Money,
    /// Sum of the alternatives' grand totals.
    pub alternative_total: Money,
    #[serde(default)]
    pub status: OfferStatus,
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
}

impl OfferDraft {
    /// Freezes the draft into a saved offer.
    ///
    /// ## Errors
    /// - [`CoreError::Validation`] when the customer name is missing or two
    ///   lines share an id
    /// - [`CoreError::EmptyOffer`] when the main list has no lines
    pub fn finalize(&self, id: impl Into<String>) -> CoreResult<Offer> {
        validate_customer_name(&self.customer.name)?;

        if self.items.is_empty() {
            return Err(CoreError::EmptyOffer {
                offer_number: self.offer_number.clone(),
            });
        }
        validate_line_items(&self.items)?;
        for alt in &self.alternatives {
            validate_line_items(&alt.items)?;
        }

        let totals = self.main_totals();
        let offer = Offer {
            id: id.into(),
            offer_number: self.offer_number.clone(),
            offer_date: self.offer_date,
            validity_date: self.validity_date,
            title_description: self.title_description.clone(),
            customer: self.customer.clone(),
            items: self.items.clone(),
            alternatives: self.alternatives.clone(),
            document_notes: self.document_notes.clone(),
            sub_total: totals.sub_total_after_discount.round_cents(),
            tax: totals.tax.round_cents(),
            grand_total: totals.grand_total.round_cents(),
            alternative_total: self.alternative_total().round_cents(),
            status: OfferStatus::Quote,
            order_date: None,
        };

        info!(
            offer_id = %offer.id,
            offer_number = %offer.offer_number,
            grand_total = %offer.grand_total,
            "offer finalized"
        );
        Ok(offer)
    }
}

impl Offer {
    pub fn is_order(&self) -> bool {
        self.status == OfferStatus::Order
    }

    /// Marks the offer as accepted.
    ///
    /// ## Errors
    /// [`CoreError::InvalidOfferStatus`] when it already is an order.
    pub fn convert_to_order(&mut self, now: DateTime<Utc>) -> CoreResult<()> {
        if self.is_order() {
            return Err(CoreError::InvalidOfferStatus {
                offer_number: self.offer_number.clone(),
                current_status: self.status.as_str().to_string(),
            });
        }

        self.status = OfferStatus::Order;
        self.order_date = Some(now);
        info!(offer_id = %self.id, offer_number = %self.offer_number, "offer converted to order");
        Ok(())
    }

    /// A fresh quote with the same content, dated `now`.
    pub fn copy_as_new(
        &self,
        new_id: impl Into<String>,
        new_number: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Offer {
        Offer {
            id: new_id.into(),
            offer_number: new_number.into(),
            offer_date: Some(now),
            validity_date: Some(now + Duration::days(DEFAULT_VALIDITY_DAYS)),
            status: OfferStatus::Quote,
            order_date: None,
            ..self.clone()
        }
    }

    /// Reopens the offer for editing. Display flags start from their defaults.
    pub fn to_draft(&self) -> OfferDraft {
        OfferDraft {
            revision: 0,
            offer_number: self.offer_number.clone(),
            offer_date: self.offer_date,
            validity_date: self.validity_date,
            title_description: self.title_description.clone(),
            customer: self.customer.clone(),
            items: self.items.clone(),
            alternatives: self.alternatives.clone(),
            document_notes: self.document_notes.clone(),
            display: DisplayOptions::default(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::draft::{DraftCommand, ListRef};
    use crate::edit::LineEdit;
    use crate::error::ValidationError;
    use crate::types::VatRate;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn draft_with_line() -> OfferDraft {
        OfferDraft::new("2024-0001").apply_all([
            DraftCommand::SetCustomer {
                customer: CustomerRef::named("Soma Enerji"),
            },
            DraftCommand::AddProduct {
                list: ListRef::Main,
                product: Product::new("p1", "Panel", Money::new(dec!(33.333)))
                    .with_vat_rate(VatRate::from_whole_percent(18)),
            },
        ])
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_finalize_snapshots_rounded_totals() {
        let offer = draft_with_line().finalize("o1").unwrap();

        assert_eq!(offer.status, OfferStatus::Quote);
        assert_eq!(offer.sub_total, Money::new(dec!(33.33)));
        assert_eq!(offer.tax, Money::new(dec!(6.00)));
        assert_eq!(offer.grand_total, Money::new(dec!(39.33)));
        assert_eq!(offer.alternative_total, Money::zero());
        assert!(offer.order_date.is_none());
    }

    #[test]
    fn test_finalize_requires_customer() {
        let draft = draft_with_line().apply(DraftCommand::SetCustomer {
            customer: CustomerRef::named("  "),
        });
        let err = draft.finalize("o1").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_finalize_requires_lines() {
        let draft = OfferDraft::new("2024-0002").apply(DraftCommand::SetCustomer {
            customer: CustomerRef::named("Acme"),
        });
        assert!(matches!(
            draft.finalize("o2"),
            Err(CoreError::EmptyOffer { .. })
        ));
    }

    #[test]
    fn test_snapshot_does_not_follow_later_edits() {
        let draft = draft_with_line();
        let offer = draft.finalize("o1").unwrap();

        let item_id = draft.items[0].id().to_string();
        let edited = draft.apply(DraftCommand::EditLine {
            list: ListRef::Main,
            item_id,
            edit: LineEdit::Quantity(10.0),
        });

        assert_ne!(edited.main_totals().grand_total.round_cents(), offer.grand_total);
        assert_eq!(offer.grand_total, Money::new(dec!(39.33)));
    }

    #[test]
    fn test_convert_to_order_once() {
        let mut offer = draft_with_line().finalize("o1").unwrap();

        offer.convert_to_order(now()).unwrap();
        assert!(offer.is_order());
        assert_eq!(offer.order_date, Some(now()));

        let err = offer.convert_to_order(now()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Offer 2024-0001 is order, cannot perform operation"
        );
    }

    #[test]
    fn test_copy_as_new_resets_lifecycle() {
        let mut offer = draft_with_line().finalize("o1").unwrap();
        offer.convert_to_order(now()).unwrap();

        let later = now() + Duration::days(30);
        let copy = offer.copy_as_new("o2", "2024-0002", later);

        assert_eq!(copy.id, "o2");
        assert_eq!(copy.offer_number, "2024-0002");
        assert_eq!(copy.status, OfferStatus::Quote);
        assert!(copy.order_date.is_none());
        assert_eq!(copy.offer_date, Some(later));
        assert_eq!(copy.validity_date, Some(later + Duration::days(7)));
        assert_eq!(copy.items, offer.items);
        assert_eq!(copy.grand_total, offer.grand_total);
    }

    #[test]
    fn test_to_draft_round_trip() {
        let draft = draft_with_line();
        let offer = draft.finalize("o1").unwrap();
        let reopened = offer.to_draft();

        assert_eq!(reopened.revision, 0);
        assert_eq!(reopened.items, draft.items);
        assert_eq!(reopened.finalize("o1").unwrap().grand_total, offer.grand_total);

        let hidden = draft.apply(DraftCommand::SetVatVisible { visible: false });
        let hidden_offer = hidden.finalize("o3").unwrap();
        assert_eq!(hidden_offer.tax, Money::zero());
        assert_eq!(hidden_offer.to_draft().display, DisplayOptions::default());
    }
}
