use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{BracketTable, DeductionKind, DeductionRates};

/// Errors raised when a payroll configuration is out of range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayrollConfigError {
    #[error("personal allowance must be non-negative, got {0}")]
    NegativePersonalAllowance(Decimal),

    #[error("{0} rate must be between 0 and 1, got {1}")]
    InvalidDeductionRate(DeductionKind, Decimal),

    #[error("periods per year must be at least 1")]
    ZeroPeriods,
}

/// Which pay components are annualized and run through the brackets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxableBase {
    /// Only basic pay is taxed; allowances pass through untaxed.
    #[default]
    BasicPay,
    /// The full gross pay is taxed.
    GrossPay,
}

impl TaxableBase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BasicPay => "basic_pay",
            Self::GrossPay => "gross_pay",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "basic_pay" | "basic" => Some(Self::BasicPay),
            "gross_pay" | "gross" => Some(Self::GrossPay),
            _ => None,
        }
    }
}

/// Immutable settings handed to the calculator when it is built.
///
/// Amounts in `personal_allowance` and the bracket table are annual; pay
/// inputs are per period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollConfig {
    pub bracket_table: BracketTable,
    pub personal_allowance: Decimal,
    pub deduction_rates: DeductionRates,
    pub taxable_base: TaxableBase,
    pub periods_per_year: u32,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            bracket_table: BracketTable::default_paye(),
            personal_allowance: Decimal::from(300_000),
            deduction_rates: DeductionRates::default(),
            taxable_base: TaxableBase::default(),
            periods_per_year: 12,
        }
    }
}

impl PayrollConfig {
    /// Validates the configuration values.
    ///
    /// The bracket table validates itself on construction, so only the scalar
    /// settings are checked here.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollConfigError`] if:
    /// - `personal_allowance` is negative
    /// - any deduction rate is not in [0, 1]
    /// - `periods_per_year` is zero
    pub fn validate(&self) -> Result<(), PayrollConfigError> {
        if self.personal_allowance < Decimal::ZERO {
            return Err(PayrollConfigError::NegativePersonalAllowance(
                self.personal_allowance,
            ));
        }
        for kind in DeductionKind::ALL {
            let rate = self.deduction_rates.rate(kind);
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(PayrollConfigError::InvalidDeductionRate(kind, rate));
            }
        }
        if self.periods_per_year == 0 {
            return Err(PayrollConfigError::ZeroPeriods);
        }
        Ok(())
    }
}
