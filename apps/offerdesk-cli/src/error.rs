//! # CLI Error Type
//!
//! Everything that can stop a command, and the exit code it maps to.
//!
//! ```text
//! ValidationError ─► CoreError ─┐
//! std::io::Error ───────────────┼─► CliError ─► stderr + exit code
//! serde_json::Error ────────────┤
//! toml / env config ────────────┘
//! ```

use offerdesk_core::CoreError;
use thiserror::Error;

/// Errors surfaced by `offerdesk` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading an input file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An input document is not valid JSON for the expected type.
    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file or an override is unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A business rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<toml::de::Error> for CliError {
    fn from(err: toml::de::Error) -> Self {
        CliError::Config(err.to_string())
    }
}

impl CliError {
    /// Process exit code, loosely following `sysexits.h`.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Io(_) => 74,
            CliError::Json(_) => 65,
            CliError::Config(_) => 78,
            CliError::Core(_) => 1,
        }
    }
}

/// Result alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use offerdesk_core::ValidationError;

    #[test]
    fn test_exit_codes_are_non_zero() {
        let errors = [
            CliError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "missing")),
            CliError::Config("bad separator".to_string()),
            CliError::Core(CoreError::EmptyOffer {
                offer_number: "2024-0001".to_string(),
            }),
        ];
        for err in &errors {
            assert_ne!(err.exit_code(), 0);
        }
    }

    #[test]
    fn test_core_error_message_passes_through() {
        let err: CliError = CoreError::from(ValidationError::Required {
            field: "customer name".to_string(),
        })
        .into();
        assert_eq!(err.to_string(), "Validation error: customer name is required");
    }
}
