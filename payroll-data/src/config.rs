//! Payroll configuration files.
//!
//! Every key is optional; anything left out keeps the built-in default.
//!
//! ```toml
//! personal_allowance = "300000"
//! taxable_base = "basic_pay"     # or "gross_pay"
//! periods_per_year = 12
//! bracket_mode = "bands"         # or "bounds"
//!
//! [deduction_rates]
//! pension = "0.08"
//! housing_fund = "0.025"
//! insurance = "0.05"
//!
//! [[brackets]]
//! limit = "300000"
//! rate = "0.07"
//!
//! [[brackets]]
//! rate = "0.24"                  # no limit: the open-ended top bracket
//! ```
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_data::load_config_str;
//!
//! let config = load_config_str(r#"
//!     personal_allowance = "200000"
//!
//!     [deduction_rates]
//!     pension = "0.10"
//! "#).unwrap();
//!
//! assert_eq!(config.personal_allowance, dec!(200000));
//! assert_eq!(config.deduction_rates.pension, dec!(0.10));
//! assert_eq!(config.deduction_rates.insurance, dec!(0.05));
//! ```

use std::path::{Path, PathBuf};

use payroll_core::{
    BracketTableError, DeductionRates, PayrollConfig, PayrollConfigError, TaxableBase,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::BracketMode;

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid bracket table: {0}")]
    Table(#[from] BracketTableError),

    #[error("invalid payroll settings: {0}")]
    Settings(#[from] PayrollConfigError),
}

/// Deduction rates as written in a file; missing rates keep their default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeductionRatesFile {
    pub pension: Option<Decimal>,
    pub housing_fund: Option<Decimal>,
    pub insurance: Option<Decimal>,
}

/// One `[[brackets]]` entry. A missing `limit` marks the top bracket.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BracketEntry {
    #[serde(default)]
    pub limit: Option<Decimal>,
    pub rate: Decimal,
}

/// Serde mirror of the TOML layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub personal_allowance: Option<Decimal>,
    pub taxable_base: Option<TaxableBase>,
    pub periods_per_year: Option<u32>,
    #[serde(default)]
    pub bracket_mode: BracketMode,
    pub deduction_rates: Option<DeductionRatesFile>,
    pub brackets: Option<Vec<BracketEntry>>,
}

impl ConfigFile {
    /// Merges the file over the defaults and validates the result.
    pub fn into_config(self) -> Result<PayrollConfig, ConfigError> {
        let defaults = PayrollConfig::default();

        let bracket_table = match self.brackets {
            Some(entries) => self
                .bracket_mode
                .build(entries.into_iter().map(|e| (e.limit, e.rate)))?,
            None => defaults.bracket_table,
        };

        let deduction_rates = match self.deduction_rates {
            Some(file) => {
                let base = DeductionRates::default();
                DeductionRates {
                    pension: file.pension.unwrap_or(base.pension),
                    housing_fund: file.housing_fund.unwrap_or(base.housing_fund),
                    insurance: file.insurance.unwrap_or(base.insurance),
                }
            }
            None => defaults.deduction_rates,
        };

        let config = PayrollConfig {
            bracket_table,
            personal_allowance: self
                .personal_allowance
                .unwrap_or(defaults.personal_allowance),
            deduction_rates,
            taxable_base: self.taxable_base.unwrap_or(defaults.taxable_base),
            periods_per_year: self.periods_per_year.unwrap_or(defaults.periods_per_year),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Parses TOML text into a validated [`PayrollConfig`].
pub fn load_config_str(s: &str) -> Result<PayrollConfig, ConfigError> {
    let file: ConfigFile = toml::from_str(s)?;
    debug!(?file, "parsed config file");
    file.into_config()
}

/// Reads and parses a TOML configuration file.
pub fn load_config_file(path: &Path) -> Result<PayrollConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = load_config_str(&content)?;
    info!(path = %path.display(), brackets = config.bracket_table.len(), "loaded payroll config");
    Ok(config)
}
