//! Monthly salary breakdown.
//!
//! The calculator annualizes the taxable part of one period's pay, takes off
//! the personal allowance, runs the remainder through the bracket table, and
//! spreads the annual tax back over the period. Optional statutory deductions
//! are a flat rate of gross pay.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::{EnabledDeductions, PayrollCalculator, PayrollConfig, SalaryInput};
//!
//! let calculator = PayrollCalculator::new(PayrollConfig::default()).unwrap();
//!
//! let input = SalaryInput {
//!     basic_pay: dec!(250000.00),
//!     housing_allowance: dec!(60000.00),
//!     transport_allowance: dec!(25000.00),
//!     other_allowances: dec!(15000.00),
//!     deductions: EnabledDeductions {
//!         pension: true,
//!         housing_fund: false,
//!         insurance: false,
//!     },
//! };
//!
//! let result = calculator.calculate(&input);
//!
//! assert_eq!(result.gross_pay, dec!(350000.00));
//! assert_eq!(result.annual_taxable_income, dec!(2700000.00));
//! assert_eq!(result.annual_tax, dec!(455000.00));
//! assert_eq!(result.tax_owed, dec!(37916.67));
//! assert_eq!(result.deductions.pension, dec!(28000.00));
//! assert_eq!(result.net_pay, dec!(284083.33));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::brackets::compute_tax;
use crate::calculations::common::{annualize, max, per_period, round_half_up};
use crate::{
    CalculationResult, DeductionKind, PayrollConfig, PayrollConfigError, SalaryInput,
    StatutoryDeductions, TaxableBase,
};

/// Payroll calculator bound to one immutable configuration.
///
/// Holds no state besides the configuration, so one instance can serve any
/// number of callers.
#[derive(Debug, Clone)]
pub struct PayrollCalculator {
    config: PayrollConfig,
}

impl PayrollCalculator {
    /// Binds a calculator to `config` after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollConfigError`] for a negative personal allowance, a
    /// deduction rate outside `[0, 1]`, or zero periods per year.
    pub fn new(config: PayrollConfig) -> Result<Self, PayrollConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Computes the full breakdown for one period's pay.
    ///
    /// Inputs are assumed to have passed [`SalaryInput::validate`]; nothing
    /// here checks them again.
    ///
    /// # Panics
    ///
    /// Amounts far beyond [`SalaryInput::MAX_AMOUNT`] can overflow `Decimal`
    /// arithmetic.
    pub fn calculate(
        &self,
        input: &SalaryInput,
    ) -> CalculationResult {
        let periods = self.config.periods_per_year;

        let gross_pay = input.gross_pay();
        let taxable_base = self.taxable_base(input, gross_pay);
        let annual_taxable_income = self.annual_taxable_income(taxable_base);
        let annual_tax = compute_tax(annual_taxable_income, &self.config.bracket_table);
        let tax_owed = round_half_up(per_period(annual_tax, periods));

        let deductions = self.statutory_deductions(input, gross_pay);
        let total_deductions = tax_owed + deductions.total();
        let net_pay = gross_pay - total_deductions;

        debug!(
            %gross_pay,
            %annual_taxable_income,
            %annual_tax,
            %tax_owed,
            %total_deductions,
            %net_pay,
            "computed salary breakdown"
        );

        CalculationResult {
            gross_pay,
            taxable_base,
            annual_taxable_income,
            annual_tax,
            tax_owed,
            deductions,
            total_deductions,
            net_pay,
        }
    }

    /// The per-period amount subject to tax under the configured policy.
    fn taxable_base(
        &self,
        input: &SalaryInput,
        gross_pay: Decimal,
    ) -> Decimal {
        match self.config.taxable_base {
            TaxableBase::BasicPay => input.basic_pay,
            TaxableBase::GrossPay => gross_pay,
        }
    }

    /// Annualized base less the personal allowance, never below zero.
    fn annual_taxable_income(
        &self,
        taxable_base: Decimal,
    ) -> Decimal {
        max(
            annualize(taxable_base, self.config.periods_per_year)
                - self.config.personal_allowance,
            Decimal::ZERO,
        )
    }

    /// Deduction amounts for the enabled kinds; the rest stay zero.
    fn statutory_deductions(
        &self,
        input: &SalaryInput,
        gross_pay: Decimal,
    ) -> StatutoryDeductions {
        DeductionKind::ALL
            .into_iter()
            .filter(|kind| input.deductions.is_enabled(*kind))
            .fold(StatutoryDeductions::default(), |acc, kind| {
                let amount = round_half_up(gross_pay * self.config.deduction_rates.rate(kind));
                acc.with_amount(kind, amount)
            })
    }
}

/// Computes a salary breakdown with a one-off calculator.
///
/// # Errors
///
/// Returns [`PayrollConfigError`] when `config` fails validation.
pub fn compute_salary(
    input: &SalaryInput,
    config: &PayrollConfig,
) -> Result<CalculationResult, PayrollConfigError> {
    Ok(PayrollCalculator::new(config.clone())?.calculate(input))
}
