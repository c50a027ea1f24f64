//! # Error Types
//!
//! Domain-specific error types for offerdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  offerdesk-core errors (this file)                                      │
//! │  ├── CoreError        - Offer lifecycle / business rule failures        │
//! │  └── ValidationError  - Field-level input validation failures           │
//! │                                                                         │
//! │  CLI errors (in app)                                                    │
//! │  └── CliError         - What the terminal sees (exit code != 0)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → stderr                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Line edits and totals never produce errors: bad input is clamped or
//! ignored there. Only record-level operations (finalize, convert, product
//! and company checks) return these.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Offer lifecycle and business rule errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An offer must have at least one line in its main list to be saved.
    #[error("Offer {offer_number} has no line items")]
    EmptyOffer { offer_number: String },

    /// Offer is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Converting an offer that is already an order
    #[error("Offer {offer_number} is {current_status}, cannot perform operation")]
    InvalidOfferStatus {
        offer_number: String,
        current_status: String,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: String, max: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email, non-finite number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two lines sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
