//! # offerdesk-core: Pure Business Logic for OfferDesk
//!
//! This crate is the **heart** of OfferDesk, a price-offer (quotation)
//! editor. It contains all pricing and offer logic as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       OfferDesk Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Offer editor UI / offerdesk-cli                    │   │
//! │  │    Pick customer ──► Add products ──► Edit lines ──► Save       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ DraftCommand                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ offerdesk-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │  pricing  │  │   draft   │  │   offer   │  │   │
//! │  │   │   Money   │  │  totals   │  │ OfferDraft│  │   Offer   │  │   │
//! │  │   │  VatRate  │  │ back-solve│  │  Command  │  │  status   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type over exact decimals
//! - [`types`] - VAT rate, discount, tax mode, currency
//! - [`line`] - Offer line items
//! - [`pricing`] - Totals calculator and edit back-solving
//! - [`edit`] - Line edit commands
//! - [`draft`] - Editable offer state and its commands
//! - [`offer`] - Saved offers and the quote → order lifecycle
//! - [`catalog`] - Products and USD repricing
//! - [`company`] - Customers and suppliers
//! - [`numbering`] - `YYYY-NNNN` offer numbers
//! - [`error`] - Domain error types
//! - [`validation`] - Input parsing and record validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Exact Money**: amounts are `Decimal`, rounded to cents only for display and snapshots
//! 4. **Edits never fail**: bad numbers are clamped or ignored, never raised
//!
//! ## Example Usage
//!
//! ```rust
//! use offerdesk_core::line::LineItem;
//! use offerdesk_core::money::Money;
//! use offerdesk_core::pricing::offer_totals;
//! use offerdesk_core::types::{DisplayOptions, VatRate};
//! use rust_decimal::Decimal;
//!
//! let items = vec![LineItem::new("Inverter", Decimal::ONE, Money::new(Decimal::from(1000)), VatRate::from_whole_percent(20))];
//! let totals = offer_totals(&items, DisplayOptions::default());
//!
//! assert_eq!(totals.tax, Money::new(Decimal::from(200)));
//! assert_eq!(totals.grand_total, Money::new(Decimal::from(1200)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod company;
pub mod draft;
pub mod edit;
pub mod error;
pub mod line;
pub mod money;
pub mod numbering;
pub mod offer;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use offerdesk_core::Money` instead of
// `use offerdesk_core::money::Money`

pub use draft::{DraftCommand, ListRef, OfferDraft};
pub use edit::{EditOutcome, LineEdit};
pub use error::{CoreError, CoreResult, ValidationError};
pub use line::LineItem;
pub use money::Money;
pub use offer::{Offer, OfferStatus};
pub use pricing::OfferTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// VAT rate for products that have none set.
pub const DEFAULT_VAT_RATE: VatRate = VatRate::from_whole_percent(20);

/// Largest quantity a line may hold.
///
/// ## Business Reason
/// Catches fat-fingered input (a pasted phone number in the quantity cell)
/// and keeps every product of quantity and price well inside `Decimal`.
pub const MAX_QUANTITY: f64 = 1_000_000.0;

/// Largest unit price a line may hold, and largest amount an edit may enter.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// VAT rates are percentages; above this an edit is ignored.
pub const MAX_VAT_RATE_PERCENT: f64 = 100.0;

/// Days an offer stays valid after its offer date.
pub const DEFAULT_VALIDITY_DAYS: i64 = 7;
