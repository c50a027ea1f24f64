//! # Offer Draft
//!
//! All editing state of one offer in a single value: header fields, the
//! main line list, alternative offers and the two display flags.
//!
//! ## Revisions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  draft r1 ──apply(EditLine{..})──► draft r2 ──apply(AddProduct{..})──► r3│
//! │     │                                 │                              │  │
//! │  totals(Main)                      totals(Main)                totals(..)│
//! │                                                                         │
//! │  apply() never mutates its receiver; a revision is immutable once made. │
//! │  Totals are never stored on the draft, always recomputed.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands that name a missing list or line are ignored (logged at debug)
//! and still produce a new revision, so callers can rely on
//! `revision` increasing by exactly one per command.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::catalog::Product;
use crate::company::CustomerRef;
use crate::edit::LineEdit;
use crate::line::LineItem;
use crate::money::Money;
use crate::pricing::{offer_totals, OfferTotals};
use crate::types::{DisplayOptions, TaxMode};

/// Intro text given to a new alternative offer.
pub const DEFAULT_ALTERNATIVE_INTRO: &str =
    "In addition to our main offer, you may consider the alternative products and services listed below.";

/// Document notes given to a new alternative offer.
pub const DEFAULT_ALTERNATIVE_NOTES: &str = "Notes applicable to the alternative offer.";

// =============================================================================
// Alternatives
// =============================================================================

/// A parallel line list attached to the same offer, priced independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeOffer {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub intro_text: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub document_notes: String,
}

impl AlternativeOffer {
    /// A fresh, empty alternative numbered by its position.
    pub fn numbered(position: usize) -> Self {
        AlternativeOffer {
            id: Uuid::new_v4().to_string(),
            title: format!("Alternative Offer {position}"),
            intro_text: DEFAULT_ALTERNATIVE_INTRO.to_string(),
            items: Vec::new(),
            document_notes: DEFAULT_ALTERNATIVE_NOTES.to_string(),
        }
    }
}

/// Which line list a command targets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ListRef {
    #[default]
    Main,
    Alternative(String),
}

// =============================================================================
// Commands
// =============================================================================

/// Every change a user can make to a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum DraftCommand {
    AddProduct { list: ListRef, product: Product },
    RemoveItem { list: ListRef, item_id: String },
    ClearDescription { list: ListRef, item_id: String },
    EditLine { list: ListRef, item_id: String, edit: LineEdit },
    SetTaxMode { mode: TaxMode },
    SetVatVisible { visible: bool },
    AddAlternative,
    RemoveAlternative { id: String },
    SetAlternativeHeader { id: String, title: String, intro_text: String },
    SetAlternativeNotes { id: String, notes: String },
    SetDocumentNotes { notes: String },
    SetCustomer { customer: CustomerRef },
    SetOfferNumber { offer_number: String },
    SetTitleDescription { text: String },
    SetDates {
        #[ts(as = "Option<String>")]
        offer_date: Option<DateTime<Utc>>,
        #[ts(as = "Option<String>")]
        validity_date: Option<DateTime<Utc>>,
    },
}

// =============================================================================
// Draft
// =============================================================================

/// The state of an offer being edited.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OfferDraft {
    /// Bumped by every applied command.
    #[serde(default)]
    pub revision: u64,
    #[serde(default)]
    pub offer_number: String,
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub offer_date: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    #[serde(default)]
    pub validity_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub title_description: String,
    #[serde(default)]
    pub customer: CustomerRef,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub alternatives: Vec<AlternativeOffer>,
    #[serde(default)]
    pub document_notes: String,
    #[serde(default)]
    pub display: DisplayOptions,
}

impl OfferDraft {
    /// An empty draft carrying an offer number.
    pub fn new(offer_number: impl Into<String>) -> Self {
        OfferDraft {
            offer_number: offer_number.into(),
            ..OfferDraft::default()
        }
    }

    /// Returns the next revision with `command` applied.
    pub fn apply(&self, command: DraftCommand) -> OfferDraft {
        let mut next = self.clone();
        next.apply_in_place(command);
        next.revision = self.revision + 1;
        next
    }

    /// Applies commands in order, returning the final revision. The
    /// revision grows by one per command, as if each were applied alone.
    pub fn apply_all<I>(&self, commands: I) -> OfferDraft
    where
        I: IntoIterator<Item = DraftCommand>,
    {
        let mut next = self.clone();
        for command in commands {
            next.apply_in_place(command);
            next.revision += 1;
        }
        next
    }

    fn apply_in_place(&mut self, command: DraftCommand) {
        match command {
            DraftCommand::AddProduct { list, product } => {
                let line = LineItem::from_product(&product);
                match self.items_mut(&list) {
                    Some(items) => items.push(line),
                    None => debug!(?list, "add product: unknown list"),
                }
            }
            DraftCommand::RemoveItem { list, item_id } => match self.items_mut(&list) {
                Some(items) => items.retain(|i| i.id() != item_id),
                None => debug!(?list, "remove item: unknown list"),
            },
            DraftCommand::ClearDescription { list, item_id } => {
                if let Some(item) = self.item_mut(&list, &item_id) {
                    item.clear_description();
                }
            }
            DraftCommand::EditLine {
                list,
                item_id,
                edit,
            } => {
                let mode = self.display.tax_mode;
                match self.item_mut(&list, &item_id) {
                    Some(item) => {
                        edit.apply(item, mode);
                    }
                    None => debug!(?list, %item_id, "edit line: unknown line"),
                }
            }
            DraftCommand::SetTaxMode { mode } => self.display.tax_mode = mode,
            DraftCommand::SetVatVisible { visible } => self.display.vat_visible = visible,
            DraftCommand::AddAlternative => {
                let position = self.alternatives.len() + 1;
                self.alternatives.push(AlternativeOffer::numbered(position));
            }
            DraftCommand::RemoveAlternative { id } => self.alternatives.retain(|a| a.id != id),
            DraftCommand::SetAlternativeHeader {
                id,
                title,
                intro_text,
            } => match self.alternative_mut(&id) {
                Some(alt) => {
                    alt.title = title;
                    alt.intro_text = intro_text;
                }
                None => debug!(%id, "set alternative header: unknown alternative"),
            },
            DraftCommand::SetAlternativeNotes { id, notes } => match self.alternative_mut(&id) {
                Some(alt) => alt.document_notes = notes,
                None => debug!(%id, "set alternative notes: unknown alternative"),
            },
            DraftCommand::SetDocumentNotes { notes } => self.document_notes = notes,
            DraftCommand::SetCustomer { customer } => self.customer = customer,
            DraftCommand::SetOfferNumber { offer_number } => self.offer_number = offer_number,
            DraftCommand::SetTitleDescription { text } => self.title_description = text,
            DraftCommand::SetDates {
                offer_date,
                validity_date,
            } => {
                self.offer_date = offer_date;
                self.validity_date = validity_date;
            }
        }
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    /// Lines of the targeted list, if it exists.
    pub fn items(&self, list: &ListRef) -> Option<&[LineItem]> {
        match list {
            ListRef::Main => Some(&self.items),
            ListRef::Alternative(id) => self.alternative(id).map(|a| a.items.as_slice()),
        }
    }

    pub fn alternative(&self, id: &str) -> Option<&AlternativeOffer> {
        self.alternatives.iter().find(|a| a.id == id)
    }

    fn alternative_mut(&mut self, id: &str) -> Option<&mut AlternativeOffer> {
        self.alternatives.iter_mut().find(|a| a.id == id)
    }

    fn items_mut(&mut self, list: &ListRef) -> Option<&mut Vec<LineItem>> {
        match list {
            ListRef::Main => Some(&mut self.items),
            ListRef::Alternative(id) => self.alternative_mut(id).map(|a| &mut a.items),
        }
    }

    fn item_mut(&mut self, list: &ListRef, item_id: &str) -> Option<&mut LineItem> {
        self.items_mut(list)?.iter_mut().find(|i| i.id() == item_id)
    }

    // -------------------------------------------------------------------------
    // Derived values
    // -------------------------------------------------------------------------

    /// Totals of one list under this draft's display options.
    /// An unknown list yields `None`.
    pub fn totals(&self, list: &ListRef) -> Option<OfferTotals> {
        self.items(list).map(|items| offer_totals(items, self.display))
    }

    /// Totals of the main list.
    pub fn main_totals(&self) -> OfferTotals {
        offer_totals(&self.items, self.display)
    }

    /// Sum of the grand totals of all alternatives, in order.
    pub fn alternative_total(&self) -> Money {
        self.alternatives
            .iter()
            .map(|alt| offer_totals(&alt.items, self.display).grand_total)
            .sum()
    }

    /// Whether any main line carries a discount (drives the discount column).
    pub fn has_discounts(&self) -> bool {
        self.items.iter().any(|i| !i.discount().is_zero())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
