//! # Application Configuration
//!
//! Company details and display preferences for the CLI.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     OFFERDESK_COMPANY_NAME="Soma Enerji"                                │
//! │     OFFERDESK_TAX_MODE=inclusive                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     --config <path>, or                                                 │
//! │     ~/.config/offerdesk/offerdesk.toml (Linux)                          │
//! │     ~/Library/Application Support/com.offerdesk.offerdesk/... (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     ₺, "1.234,56", 20% VAT, exclusive, VAT shown, 7 days validity       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [company]
//! name = "Soma Enerji"
//!
//! [display]
//! currency_symbol = "₺"
//! thousands_separator = "."
//! decimal_separator = ","
//! tax_mode = "exclusive"   # exclusive | inclusive
//! vat_visible = true
//!
//! [offer]
//! default_vat_rate = 20
//! validity_days = 7
//! ```

use std::path::{Path, PathBuf};

use offerdesk_core::{DisplayOptions, Money, TaxMode, VatRate, DEFAULT_VALIDITY_DAYS};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CliError, CliResult};

const CONFIG_FILE_NAME: &str = "offerdesk.toml";

/// Ten years; longer validity periods are treated as typos.
pub const MAX_VALIDITY_DAYS: i64 = 3650;

// =============================================================================
// Sections
// =============================================================================

/// The company issuing offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyConfig {
    #[serde(default = "default_company_name")]
    pub name: String,
}

fn default_company_name() -> String {
    "OfferDesk".to_string()
}

impl Default for CompanyConfig {
    fn default() -> Self {
        CompanyConfig {
            name: default_company_name(),
        }
    }
}

/// How amounts and taxes are shown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: char,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,

    /// Used for drafts that do not carry their own display options.
    #[serde(default)]
    pub tax_mode: TaxMode,

    #[serde(default = "default_true")]
    pub vat_visible: bool,
}

fn default_currency_symbol() -> String {
    "₺".to_string()
}

fn default_thousands_separator() -> char {
    '.'
}

fn default_decimal_separator() -> char {
    ','
}

fn default_true() -> bool {
    true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            currency_symbol: default_currency_symbol(),
            thousands_separator: default_thousands_separator(),
            decimal_separator: default_decimal_separator(),
            tax_mode: TaxMode::default(),
            vat_visible: true,
        }
    }
}

/// Defaults for new offers and products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferConfig {
    /// Whole percent, applied to products added without a VAT rate.
    #[serde(default = "default_vat_rate")]
    pub default_vat_rate: u32,

    #[serde(default = "default_validity_days")]
    pub validity_days: i64,
}

fn default_vat_rate() -> u32 {
    20
}

fn default_validity_days() -> i64 {
    DEFAULT_VALIDITY_DAYS
}

impl Default for OfferConfig {
    fn default() -> Self {
        OfferConfig {
            default_vat_rate: default_vat_rate(),
            validity_days: default_validity_days(),
        }
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub company: CompanyConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub offer: OfferConfig,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`--config` or the platform config dir)
    /// 3. Environment variables
    ///
    /// An explicit `--config` path that does not exist is an error; a
    /// missing file in the default location is not.
    pub fn load(config_path: Option<&Path>) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> CliResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Rejects settings that would make amounts unreadable.
    pub fn validate(&self) -> CliResult<()> {
        if self.display.thousands_separator == self.display.decimal_separator {
            return Err(CliError::Config(format!(
                "thousands and decimal separators must differ, both are '{}'",
                self.display.decimal_separator
            )));
        }

        if self.offer.default_vat_rate > 100 {
            return Err(CliError::Config(format!(
                "default_vat_rate must be between 0 and 100, got {}",
                self.offer.default_vat_rate
            )));
        }

        if !(0..=MAX_VALIDITY_DAYS).contains(&self.offer.validity_days) {
            return Err(CliError::Config(format!(
                "validity_days must be between 0 and {MAX_VALIDITY_DAYS}, got {}",
                self.offer.validity_days
            )));
        }

        Ok(())
    }

    /// Applies `OFFERDESK_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("OFFERDESK_COMPANY_NAME") {
            debug!(company = %name, "Overriding company name from environment");
            self.company.name = name;
        }

        if let Some(symbol) = lookup("OFFERDESK_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }

        if let Some(sep) = lookup("OFFERDESK_THOUSANDS_SEPARATOR") {
            match single_char(&sep) {
                Some(c) => self.display.thousands_separator = c,
                None => warn!(value = %sep, "Ignoring thousands separator, expected one character"),
            }
        }

        if let Some(sep) = lookup("OFFERDESK_DECIMAL_SEPARATOR") {
            match single_char(&sep) {
                Some(c) => self.display.decimal_separator = c,
                None => warn!(value = %sep, "Ignoring decimal separator, expected one character"),
            }
        }

        if let Some(mode) = lookup("OFFERDESK_TAX_MODE") {
            match mode.to_lowercase().as_str() {
                "exclusive" => self.display.tax_mode = TaxMode::Exclusive,
                "inclusive" => self.display.tax_mode = TaxMode::Inclusive,
                _ => warn!(mode = %mode, "Unknown tax mode in environment"),
            }
        }

        if let Some(visible) = lookup("OFFERDESK_VAT_VISIBLE") {
            match visible.parse::<bool>() {
                Ok(v) => self.display.vat_visible = v,
                Err(_) => warn!(value = %visible, "Ignoring OFFERDESK_VAT_VISIBLE, expected true/false"),
            }
        }

        if let Some(rate) = lookup("OFFERDESK_DEFAULT_VAT_RATE") {
            if let Ok(r) = rate.parse::<u32>() {
                self.offer.default_vat_rate = r;
            }
        }

        if let Some(days) = lookup("OFFERDESK_VALIDITY_DAYS") {
            if let Ok(d) = days.parse::<i64>() {
                self.offer.validity_days = d;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "offerdesk", "offerdesk")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Display options for drafts that carry none.
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions::new(self.display.tax_mode, self.display.vat_visible)
    }

    pub fn default_vat(&self) -> VatRate {
        VatRate::from_whole_percent(self.offer.default_vat_rate)
    }

    /// `1.234,56 ₺` with the configured separators and symbol.
    pub fn format_money(&self, amount: Money) -> String {
        let number = amount.format_with(
            self.display.thousands_separator,
            self.display.decimal_separator,
        );
        if self.display.currency_symbol.is_empty() {
            number
        } else {
            format!("{} {}", number, self.display.currency_symbol)
        }
    }
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.display.currency_symbol, "₺");
        assert_eq!(config.display.tax_mode, TaxMode::Exclusive);
        assert!(config.display.vat_visible);
        assert_eq!(config.offer.validity_days, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_format_money_uses_separators() {
        let config = AppConfig::default();
        assert_eq!(config.format_money(Money::new(dec!(1234.56))), "1.234,56 ₺");

        let mut us = AppConfig::default();
        us.display.currency_symbol = "$".to_string();
        us.display.thousands_separator = ',';
        us.display.decimal_separator = '.';
        assert_eq!(us.format_money(Money::new(dec!(1234567.8))), "1,234,567.80 $");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[company]\nname = \"Soma Enerji\"\n\n[display]\ntax_mode = \"inclusive\"\nvat_visible = false\n\n[offer]\nvalidity_days = 14"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.company.name, "Soma Enerji");
        assert_eq!(config.display.tax_mode, TaxMode::Inclusive);
        assert!(!config.display.vat_visible);
        assert_eq!(config.display.decimal_separator, ',');
        assert_eq!(config.offer.validity_days, 14);
        assert_eq!(config.offer.default_vat_rate, 20);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(AppConfig::load(Some(&missing)), Err(CliError::Io(_))));
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display\nvat_visible = maybe").unwrap();
        assert!(matches!(AppConfig::load(Some(file.path())), Err(CliError::Config(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("OFFERDESK_COMPANY_NAME", "Acme"),
            ("OFFERDESK_TAX_MODE", "Inclusive"),
            ("OFFERDESK_VAT_VISIBLE", "false"),
            ("OFFERDESK_DECIMAL_SEPARATOR", "too long"),
            ("OFFERDESK_DEFAULT_VAT_RATE", "10"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.company.name, "Acme");
        assert_eq!(config.display.tax_mode, TaxMode::Inclusive);
        assert!(!config.display.vat_visible);
        assert_eq!(config.display.decimal_separator, ',');
        assert_eq!(config.default_vat(), VatRate::from_whole_percent(10));
    }

    #[test]
    fn test_validation() {
        let mut config = AppConfig::default();
        config.display.thousands_separator = ',';
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.offer.default_vat_rate = 150;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.offer.validity_days = 10_000_000_000_000;
        assert!(matches!(config.validate(), Err(CliError::Config(_))));

        config.offer.validity_days = MAX_VALIDITY_DAYS;
        assert!(config.validate().is_ok());
    }
}
