//! Plain-text rendering of calculation results.

use std::fmt;

use payroll_core::calculations::BracketContribution;
use payroll_core::{CalculationResult, DeductionKind, EnabledDeductions};
use rust_decimal::Decimal;

use crate::utils::{format_money, format_rate};

const LABEL_WIDTH: usize = 22;
const AMOUNT_WIDTH: usize = 16;

/// Monthly and yearly breakdown table for one result.
///
/// Deductions that were not enabled show `-` rather than `0.00`.
pub struct Breakdown<'a> {
    pub result: &'a CalculationResult,
    pub enabled: EnabledDeductions,
    pub periods_per_year: u32,
}

impl<'a> Breakdown<'a> {
    pub fn new(
        result: &'a CalculationResult,
        enabled: EnabledDeductions,
        periods_per_year: u32,
    ) -> Self {
        Self {
            result,
            enabled,
            periods_per_year,
        }
    }
}

fn row(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    period: &str,
    year: &str,
) -> fmt::Result {
    writeln!(
        f,
        "{label:<LABEL_WIDTH$}{period:>AMOUNT_WIDTH$}{year:>AMOUNT_WIDTH$}"
    )
}

impl fmt::Display for Breakdown<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let result = self.result;
        let yearly = result.yearly(self.periods_per_year);

        row(f, "", "Monthly", "Yearly")?;
        row(
            f,
            "Gross pay",
            &format_money(result.gross_pay),
            &format_money(yearly.gross_pay),
        )?;
        row(
            f,
            "Taxable income",
            "",
            &format_money(result.annual_taxable_income),
        )?;
        row(
            f,
            "Income tax",
            &format_money(result.tax_owed),
            &format_money(yearly.tax_owed),
        )?;

        for kind in DeductionKind::ALL {
            if self.enabled.is_enabled(kind) {
                row(
                    f,
                    kind.label(),
                    &format_money(result.deduction(kind)),
                    &format_money(yearly.deductions.amount(kind)),
                )?;
            } else {
                row(f, kind.label(), "-", "-")?;
            }
        }

        row(
            f,
            "Total deductions",
            &format_money(result.total_deductions),
            &format_money(yearly.total_deductions),
        )?;
        row(
            f,
            "Net pay",
            &format_money(result.net_pay),
            &format_money(yearly.net_pay),
        )
    }
}

/// Per-bracket split of the annual tax.
pub struct BracketBreakdown<'a>(pub &'a [BracketContribution]);

impl fmt::Display for BracketBreakdown<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No taxable income.");
        }

        for contribution in self.0 {
            let band = match contribution.upper_bound {
                Some(upper) => format!(
                    "{} - {}",
                    format_money(contribution.lower_bound),
                    format_money(upper)
                ),
                None => format!("above {}", format_money(contribution.lower_bound)),
            };
            writeln!(
                f,
                "{band:<34}{rate:>7}{amount:>AMOUNT_WIDTH$}{tax:>AMOUNT_WIDTH$}",
                rate = format_rate(contribution.rate),
                amount = format_money(contribution.taxable_amount),
                tax = format_money(contribution.tax),
            )?;
        }
        Ok(())
    }
}

/// Running monthly totals across a batch of results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchTotals {
    pub rows: usize,
    pub gross_pay: Decimal,
    pub tax_owed: Decimal,
    pub total_deductions: Decimal,
    pub net_pay: Decimal,
}

impl BatchTotals {
    pub fn add(
        &mut self,
        result: &CalculationResult,
    ) {
        self.rows += 1;
        self.gross_pay += result.gross_pay;
        self.tax_owed += result.tax_owed;
        self.total_deductions += result.total_deductions;
        self.net_pay += result.net_pay;
    }
}

impl fmt::Display for BatchTotals {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Totals ({} rows, monthly)", self.rows)?;
        let rows = [
            ("Gross pay", self.gross_pay),
            ("Income tax", self.tax_owed),
            ("Total deductions", self.total_deductions),
            ("Net pay", self.net_pay),
        ];
        for (label, amount) in rows {
            writeln!(f, "{label:<LABEL_WIDTH$}{:>AMOUNT_WIDTH$}", format_money(amount))?;
        }
        Ok(())
    }
}
