//! # Commands
//!
//! One function per subcommand. Each returns the text to print so the
//! binary stays a thin `println!` wrapper and the commands stay testable.
//!
//! ## Edit Scripts
//! `--edits` takes a JSON array. Each entry is either a full draft command
//! or the line-edit shorthand:
//! ```json
//! [
//!   { "itemId": "l1", "edit": { "field": "quantity", "value": 3 } },
//!   { "type": "set_tax_mode", "mode": "inclusive" },
//!   { "type": "add_alternative" }
//! ]
//! ```

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use offerdesk_core::numbering::next_offer_number;
use offerdesk_core::pricing::OfferTotals;
use offerdesk_core::{DraftCommand, LineEdit, ListRef, Money, OfferDraft};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

// =============================================================================
// Input Documents
// =============================================================================

/// One entry of an edit script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptedEdit {
    /// `{ "itemId": .., "edit": .. }`, optionally with `"list"`.
    Line {
        #[serde(default)]
        list: ListRef,
        #[serde(rename = "itemId")]
        item_id: String,
        edit: LineEdit,
    },
    Command(DraftCommand),
}

impl ScriptedEdit {
    /// Converts to a draft command, giving products without a VAT rate the
    /// configured default.
    pub fn into_command(self, config: &AppConfig) -> DraftCommand {
        match self {
            ScriptedEdit::Line {
                list,
                item_id,
                edit,
            } => DraftCommand::EditLine {
                list,
                item_id,
                edit,
            },
            ScriptedEdit::Command(DraftCommand::AddProduct { list, mut product }) => {
                product.vat_rate.get_or_insert(config.default_vat());
                DraftCommand::AddProduct { list, product }
            }
            ScriptedEdit::Command(command) => command,
        }
    }
}

/// Reads a draft document. Drafts without a `display` object take the
/// configured display options.
pub fn load_draft(path: &Path, config: &AppConfig) -> CliResult<OfferDraft> {
    let contents = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    let has_display = value.get("display").is_some();

    let mut draft: OfferDraft = serde_json::from_value(value)?;
    if !has_display {
        draft.display = config.display_options();
    }
    debug!(?path, items = draft.items.len(), alternatives = draft.alternatives.len(), "Draft loaded");
    Ok(draft)
}

pub fn load_edits(path: &Path) -> CliResult<Vec<ScriptedEdit>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Loads a draft and replays an optional edit script over it.
pub fn prepare_draft(
    draft_path: &Path,
    edits_path: Option<&Path>,
    config: &AppConfig,
) -> CliResult<OfferDraft> {
    let draft = load_draft(draft_path, config)?;
    let Some(edits_path) = edits_path else {
        return Ok(draft);
    };

    let edits = load_edits(edits_path)?;
    let count = edits.len();
    let draft = draft.apply_all(edits.into_iter().map(|e| e.into_command(config)));
    info!(edits = count, revision = draft.revision, "Edit script applied");
    Ok(draft)
}

// =============================================================================
// totals
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeReport {
    pub id: String,
    pub title: String,
    pub totals: OfferTotals,
}

/// Machine-readable output of `offerdesk totals --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsReport {
    pub offer_number: String,
    pub revision: u64,
    pub main: OfferTotals,
    pub alternatives: Vec<AlternativeReport>,
    pub alternative_total: Money,
    pub has_discounts: bool,
}

impl TotalsReport {
    pub fn from_draft(draft: &OfferDraft) -> Self {
        let alternatives = draft
            .alternatives
            .iter()
            .filter_map(|alt| {
                draft
                    .totals(&ListRef::Alternative(alt.id.clone()))
                    .map(|totals| AlternativeReport {
                        id: alt.id.clone(),
                        title: alt.title.clone(),
                        totals,
                    })
            })
            .collect();

        TotalsReport {
            offer_number: draft.offer_number.clone(),
            revision: draft.revision,
            main: draft.main_totals(),
            alternatives,
            alternative_total: draft.alternative_total(),
            has_discounts: draft.has_discounts(),
        }
    }
}

pub fn totals(
    draft_path: &Path,
    edits_path: Option<&Path>,
    json: bool,
    config: &AppConfig,
) -> CliResult<String> {
    let draft = prepare_draft(draft_path, edits_path, config)?;
    let report = TotalsReport::from_draft(&draft);

    if json {
        return Ok(serde_json::to_string_pretty(&report)?);
    }
    Ok(render_report(&report, draft.display.vat_visible, config))
}

fn render_report(report: &TotalsReport, vat_visible: bool, config: &AppConfig) -> String {
    let mut out = format!(
        "{}\nOffer {} (revision {})\n",
        config.company.name, report.offer_number, report.revision
    );
    render_totals(&mut out, &report.main, vat_visible, config);

    for alt in &report.alternatives {
        out.push_str(&format!("\n{}\n", alt.title));
        render_totals(&mut out, &alt.totals, vat_visible, config);
    }
    if !report.alternatives.is_empty() {
        out.push_str(&row("Alternatives total", report.alternative_total, config));
    }
    out
}

fn render_totals(out: &mut String, totals: &OfferTotals, vat_visible: bool, config: &AppConfig) {
    if !totals.discount_total.is_zero() {
        out.push_str(&row("Subtotal", totals.sub_total_before_discount, config));
        out.push_str(&row("Discount", totals.discount_total, config));
    }
    out.push_str(&row("Net", totals.sub_total_after_discount, config));

    if vat_visible {
        if let Some(breakdown) = &totals.vat_breakdown {
            for entry in breakdown {
                let label = format!("VAT {}%", entry.rate.percent().normalize());
                out.push_str(&row(&label, entry.tax, config));
            }
        }
        out.push_str(&row("VAT", totals.tax, config));
    }
    out.push_str(&row("Grand total", totals.grand_total, config));
}

fn row(label: &str, amount: Money, config: &AppConfig) -> String {
    format!("  {:<20}{:>20}\n", label, config.format_money(amount))
}

// =============================================================================
// finalize
// =============================================================================

/// Freezes the (edited) draft into an offer record and returns it as JSON.
pub fn finalize(
    draft_path: &Path,
    edits_path: Option<&Path>,
    config: &AppConfig,
) -> CliResult<String> {
    let draft = prepare_draft(draft_path, edits_path, config)?;
    let offer = draft.finalize(Uuid::new_v4().to_string())?;
    Ok(serde_json::to_string_pretty(&offer)?)
}

// =============================================================================
// new / next-number
// =============================================================================

/// An empty draft dated `now`, valid for the configured number of days.
pub fn new_draft(
    offer_number: &str,
    customer: Option<&str>,
    now: DateTime<Utc>,
    config: &AppConfig,
) -> CliResult<String> {
    let validity_date = Duration::try_days(config.offer.validity_days)
        .and_then(|days| now.checked_add_signed(days))
        .ok_or_else(|| {
            CliError::Config(format!(
                "validity_days {} is out of range",
                config.offer.validity_days
            ))
        })?;

    let mut draft = OfferDraft::new(offer_number);
    draft.offer_date = Some(now);
    draft.validity_date = Some(validity_date);
    draft.display = config.display_options();
    if let Some(name) = customer {
        draft.customer = offerdesk_core::company::CustomerRef::named(name);
    }
    Ok(serde_json::to_string_pretty(&draft)?)
}

pub fn next_number(year: i32, counter: Option<u32>, existing: &[String]) -> String {
    next_offer_number(year, counter, existing.iter().map(String::as_str)).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use offerdesk_core::TaxMode;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const DRAFT: &str = r#"{
        "offerNumber": "2024-0007",
        "customer": { "name": "Soma Enerji" },
        "items": [
            { "id": "l1", "name": "Panel", "quantity": "2", "unitPrice": "100", "vatRate": "20" },
            { "id": "l2", "name": "Cable", "quantity": "1", "unitPrice": "50", "vatRate": "10", "discount": "10" }
        ]
    }"#;

    fn decimal_at(value: &serde_json::Value) -> Decimal {
        value.as_str().unwrap().parse().unwrap()
    }

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_draft_without_display_takes_config() {
        let file = write_temp(DRAFT);
        let mut config = AppConfig::default();
        config.display.tax_mode = TaxMode::Inclusive;

        let draft = load_draft(file.path(), &config).unwrap();
        assert_eq!(draft.display.tax_mode, TaxMode::Inclusive);
        assert_eq!(draft.items.len(), 2);
    }

    #[test]
    fn test_totals_json() {
        let file = write_temp(DRAFT);
        let out = totals(file.path(), None, true, &AppConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["offerNumber"], "2024-0007");
        assert_eq!(value["hasDiscounts"], true);
        // 200 + 45 net, 40 + 4.5 VAT
        assert_eq!(decimal_at(&value["main"]["subTotalAfterDiscount"]), dec!(245));
        assert_eq!(decimal_at(&value["main"]["grandTotal"]), dec!(289.5));
        assert_eq!(value["main"]["vatBreakdown"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_totals_text() {
        let file = write_temp(DRAFT);
        let out = totals(file.path(), None, false, &AppConfig::default()).unwrap();

        assert!(out.contains("Offer 2024-0007"));
        assert!(out.contains("289,50 ₺"));
        assert!(out.contains("VAT 20%"));
    }

    #[test]
    fn test_edit_script_is_replayed() {
        let draft = write_temp(DRAFT);
        let edits = write_temp(
            r#"[
                { "itemId": "l1", "edit": { "field": "quantity", "value": 3 } },
                { "type": "set_vat_visible", "visible": false },
                { "type": "add_product", "list": { "kind": "main" },
                  "product": { "id": "p9", "name": "Service", "sellingPrice": "10" } }
            ]"#,
        );
        let mut config = AppConfig::default();
        config.offer.default_vat_rate = 10;

        let prepared = prepare_draft(draft.path(), Some(edits.path()), &config).unwrap();
        assert_eq!(prepared.revision, 3);
        assert_eq!(prepared.items.len(), 3);
        assert_eq!(prepared.items[2].vat_rate(), config.default_vat());

        let report = TotalsReport::from_draft(&prepared);
        assert!(report.main.tax.is_zero());
        assert_eq!(report.main.grand_total, report.main.sub_total_after_discount);
    }

    #[test]
    fn test_finalize_requires_customer() {
        let file = write_temp(r#"{ "offerNumber": "2024-0001", "items": [] }"#);
        let err = finalize(file.path(), None, &AppConfig::default()).unwrap_err();
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_finalize_outputs_record() {
        let file = write_temp(DRAFT);
        let out = finalize(file.path(), None, &AppConfig::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["status"], "quote");
        assert_eq!(decimal_at(&value["grandTotal"]), dec!(289.50));
    }

    #[test]
    fn test_new_draft_uses_validity_days() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut config = AppConfig::default();
        config.offer.validity_days = 10;

        let out = new_draft("2024-0008", Some("Acme"), now, &config).unwrap();
        let draft: OfferDraft = serde_json::from_str(&out).unwrap();

        assert_eq!(draft.offer_number, "2024-0008");
        assert_eq!(draft.customer.name, "Acme");
        assert_eq!(draft.validity_date, Some(now + Duration::days(10)));
    }

    #[test]
    fn test_new_draft_rejects_unrepresentable_validity() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut config = AppConfig::default();
        config.offer.validity_days = 10_000_000_000_000;

        let err = new_draft("2024-0008", None, now, &config).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_oversized_line_is_a_json_error() {
        let file = write_temp(
            r#"{
                "offerNumber": "2024-0009",
                "items": [
                    { "name": "x", "quantity": "1000000000000000", "unitPrice": "1000000000000000" }
                ]
            }"#,
        );
        let err = totals(file.path(), None, false, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, CliError::Json(_)));
        assert_eq!(err.exit_code(), 65);
    }

    #[test]
    fn test_next_number() {
        let existing = vec!["2024-0003".to_string(), "2024-0011".to_string()];
        assert_eq!(next_number(2024, None, &existing), "2024-0012");
        assert_eq!(next_number(2024, Some(40), &existing), "2024-0041");
    }
}
