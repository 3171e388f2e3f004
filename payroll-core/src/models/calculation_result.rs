use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DeductionKind, StatutoryDeductions};

/// Per-period breakdown produced by the payroll calculator.
///
/// A result is never updated in place; changing any input means computing a
/// new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Sum of all pay components for the period.
    pub gross_pay: Decimal,

    /// The part of the period's pay that is annualized and taxed.
    pub taxable_base: Decimal,

    /// Annualized taxable base less the personal allowance, floored at zero.
    pub annual_taxable_income: Decimal,

    /// Tax from the bracket table on `annual_taxable_income`.
    pub annual_tax: Decimal,

    /// `annual_tax` spread over one period, rounded to cents.
    pub tax_owed: Decimal,

    /// Amount of each optional deduction; zero when disabled.
    pub deductions: StatutoryDeductions,

    /// `tax_owed` plus every enabled deduction.
    pub total_deductions: Decimal,

    /// `gross_pay` minus `total_deductions`.
    pub net_pay: Decimal,
}

impl CalculationResult {
    pub fn deduction(
        &self,
        kind: DeductionKind,
    ) -> Decimal {
        self.deductions.amount(kind)
    }

    /// Yearly view of this result.
    ///
    /// Tax is the unrounded `annual_tax`, not `tax_owed` times the periods,
    /// so the yearly net can differ from the per-period net times the
    /// periods by the per-period rounding.
    pub fn yearly(
        &self,
        periods_per_year: u32,
    ) -> YearlySummary {
        let periods = Decimal::from(periods_per_year);
        let gross_pay = self.gross_pay * periods;
        let deductions = StatutoryDeductions {
            pension: self.deductions.pension * periods,
            housing_fund: self.deductions.housing_fund * periods,
            insurance: self.deductions.insurance * periods,
        };
        let total_deductions = self.annual_tax + deductions.total();

        YearlySummary {
            gross_pay,
            tax_owed: self.annual_tax,
            deductions,
            total_deductions,
            net_pay: gross_pay - total_deductions,
        }
    }
}

/// Yearly totals derived from a [`CalculationResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub gross_pay: Decimal,
    pub tax_owed: Decimal,
    pub deductions: StatutoryDeductions,
    pub total_deductions: Decimal,
    pub net_pay: Decimal,
}
