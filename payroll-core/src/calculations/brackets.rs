//! Progressive bracket tax.
//!
//! Income is walked through the table from the lowest bracket up. Each
//! bracket taxes only the slice of income between the previous bound and its
//! own bound, at its own rate. Brackets above the income contribute nothing.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use payroll_core::{BracketTable, compute_tax};
//!
//! let table = BracketTable::default_paye();
//!
//! // 21000 + 33000 + 75000 + 95000 + 336000 + 300000 * 0.24
//! assert_eq!(compute_tax(dec!(3500000), &table), dec!(632000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::BracketTable;
use crate::calculations::common::max;

/// The tax one bracket contributes for a given income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketContribution {
    /// Income level where the bracket starts.
    pub lower_bound: Decimal,
    /// Income level where the bracket ends, `None` for the top bracket.
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
    /// Income falling inside this bracket.
    pub taxable_amount: Decimal,
    /// `taxable_amount * rate`.
    pub tax: Decimal,
}

/// Splits `taxable_income` across the brackets it reaches.
///
/// Stops at the bracket containing the income, so the returned list only
/// holds brackets with a share of the income. Zero or negative income
/// reaches no bracket.
pub fn bracket_contributions(
    taxable_income: Decimal,
    table: &BracketTable,
) -> Vec<BracketContribution> {
    let mut contributions = Vec::new();
    if taxable_income <= Decimal::ZERO {
        return contributions;
    }

    let mut bracket_start = Decimal::ZERO;

    for bracket in table {
        let (taxable_amount, reached_top) = match bracket.upper_bound {
            Some(bracket_end) => (
                max(taxable_income.min(bracket_end) - bracket_start, Decimal::ZERO),
                taxable_income <= bracket_end,
            ),
            None => (max(taxable_income - bracket_start, Decimal::ZERO), true),
        };

        contributions.push(BracketContribution {
            lower_bound: bracket_start,
            upper_bound: bracket.upper_bound,
            rate: bracket.rate,
            taxable_amount,
            tax: taxable_amount * bracket.rate,
        });

        if reached_top {
            break;
        }
        if let Some(bracket_end) = bracket.upper_bound {
            bracket_start = bracket_end;
        }
    }

    contributions
}

/// Total tax owed on `taxable_income` over the period the income covers.
///
/// The result is exact; callers converting between annual and per-period
/// figures round afterwards.
pub fn compute_tax(
    taxable_income: Decimal,
    table: &BracketTable,
) -> Decimal {
    bracket_contributions(taxable_income, table)
        .iter()
        .map(|c| c.tax)
        .sum()
}
