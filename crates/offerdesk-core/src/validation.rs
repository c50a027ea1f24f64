//! # Validation Module
//!
//! Input parsing and record-level validation for OfferDesk.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Line editing (never fails)                                    │
//! │  ├── parse_numeric: keystrokes → f64 (NaN when unparsable)              │
//! │  └── pricing::apply_edited_*: clamp or ignore                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Records (THIS MODULE, returns ValidationError)                │
//! │  ├── customer name before an offer is finalized                         │
//! │  ├── product / company before they are saved                            │
//! │  └── exchange rates before repricing                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use offerdesk_core::validation::{parse_numeric, validate_customer_name};
//!
//! assert_eq!(parse_numeric("12,5"), 12.5);
//! assert!(parse_numeric("abc").is_nan());
//! assert!(validate_customer_name("Soma Enerji").is_ok());
//! ```

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::catalog::Product;
use crate::company::Company;
use crate::error::ValidationError;
use crate::line::LineItem;
use crate::MAX_VAT_RATE_PERCENT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;

// =============================================================================
// Numeric Input
// =============================================================================

/// Parses a number typed into an editor cell.
///
/// Accepts `,` as the decimal separator and surrounding whitespace. Anything
/// unparsable (including the empty string) becomes `NaN`, which the edit
/// functions treat as "ignore" or "clamp".
pub fn parse_numeric(raw: &str) -> f64 {
    let normalized = raw.trim().replace(',', ".");
    normalized.parse::<f64>().unwrap_or(f64::NAN)
}

/// Validates an exchange rate: strictly positive.
pub fn validate_exchange_rate(rate: Decimal) -> ValidationResult<()> {
    if rate <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "exchange rate".to_string(),
        });
    }
    Ok(())
}

/// Validates a VAT percentage entered on a record (0 to 100 inclusive).
pub fn validate_vat_rate(percent: f64) -> ValidationResult<()> {
    if !percent.is_finite() || !(0.0..=MAX_VAT_RATE_PERCENT).contains(&percent) {
        return Err(ValidationError::OutOfRange {
            field: "VAT rate".to_string(),
            min: "0".to_string(),
            max: MAX_VAT_RATE_PERCENT.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// An offer cannot be saved without a customer.
///
/// ## Example
/// ```rust
/// use offerdesk_core::validation::validate_customer_name;
///
/// assert!(validate_customer_name("Acme").is_ok());
/// assert!(validate_customer_name("   ").is_err());
/// ```
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_name("customer name", name)
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a catalog product before it is saved.
///
/// ## Rules
/// - Name must not be empty
/// - Selling price must be greater than zero
/// - VAT rate, when set, must be within 0..=100
pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_name("product name", &product.name)?;

    if product.selling_price.amount() <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "selling price".to_string(),
        });
    }

    if let Some(rate) = product.vat_rate {
        if rate.percent() > Decimal::ONE_HUNDRED {
            return Err(ValidationError::OutOfRange {
                field: "VAT rate".to_string(),
                min: "0".to_string(),
                max: "100".to_string(),
            });
        }
    }

    Ok(())
}

/// Validates a company record.
///
/// ## Rules
/// - Name must not be empty
/// - Contact email, when given, must contain `@`
pub fn validate_company(company: &Company) -> ValidationResult<()> {
    validate_name("company name", &company.name)?;

    let email = company.contact_email.trim();
    if !email.is_empty() && !email.contains('@') {
        return Err(ValidationError::InvalidFormat {
            field: "contact email".to_string(),
            reason: "must contain '@'".to_string(),
        });
    }

    Ok(())
}

/// Line ids must be unique within one list; edits address lines by id.
pub fn validate_line_items(items: &[LineItem]) -> ValidationResult<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id()) {
            return Err(ValidationError::Duplicate {
                field: "line id".to_string(),
                value: item.id().to_string(),
            });
        }
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
