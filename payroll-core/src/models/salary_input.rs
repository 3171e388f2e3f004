use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::EnabledDeductions;

/// Errors found when checking a salary input at the boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SalaryInputError {
    #[error("{field} must not be negative, got {amount}")]
    NegativeAmount { field: &'static str, amount: Decimal },

    #[error("{field} must not exceed {max}, got {amount}")]
    TooLarge {
        field: &'static str,
        amount: Decimal,
        max: Decimal,
    },
}

/// Monthly pay components plus the deductions that apply to them.
///
/// The calculator assumes these amounts are non-negative; call
/// [`SalaryInput::validate`] wherever the values come from a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryInput {
    pub basic_pay: Decimal,
    #[serde(default)]
    pub housing_allowance: Decimal,
    #[serde(default)]
    pub transport_allowance: Decimal,
    #[serde(default)]
    pub other_allowances: Decimal,
    #[serde(default)]
    pub deductions: EnabledDeductions,
}

impl SalaryInput {
    /// Largest accepted per-period amount for any one component.
    ///
    /// Four components at this cap, annualized over `u32::MAX` periods, stay
    /// well inside `Decimal`'s range.
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

    pub fn new(basic_pay: Decimal) -> Self {
        Self {
            basic_pay,
            ..Default::default()
        }
    }

    /// Sum of all pay components.
    pub fn gross_pay(&self) -> Decimal {
        self.basic_pay + self.housing_allowance + self.transport_allowance + self.other_allowances
    }

    /// Pay components paired with their field names, in display order.
    pub fn components(&self) -> [(&'static str, Decimal); 4] {
        [
            ("basic_pay", self.basic_pay),
            ("housing_allowance", self.housing_allowance),
            ("transport_allowance", self.transport_allowance),
            ("other_allowances", self.other_allowances),
        ]
    }

    /// Rejects negative pay components and any above [`SalaryInput::MAX_AMOUNT`].
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use payroll_core::{SalaryInput, SalaryInputError};
    ///
    /// let mut input = SalaryInput::new(dec!(250000));
    /// input.transport_allowance = dec!(-10);
    ///
    /// assert_eq!(
    ///     input.validate(),
    ///     Err(SalaryInputError::NegativeAmount {
    ///         field: "transport_allowance",
    ///         amount: dec!(-10),
    ///     })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), SalaryInputError> {
        for (field, amount) in self.components() {
            if amount < Decimal::ZERO {
                return Err(SalaryInputError::NegativeAmount { field, amount });
            }
            if amount > Self::MAX_AMOUNT {
                return Err(SalaryInputError::TooLarge {
                    field,
                    amount,
                    max: Self::MAX_AMOUNT,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn sample_input() -> SalaryInput {
        SalaryInput {
            basic_pay: dec!(250000.00),
            housing_allowance: dec!(60000.00),
            transport_allowance: dec!(25000.00),
            other_allowances: dec!(15000.00),
            deductions: EnabledDeductions::default(),
        }
    }

    #[test]
    fn gross_pay_sums_components() {
        assert_eq!(sample_input().gross_pay(), dec!(350000.00));
    }

    #[test]
    fn validate_accepts_zero_allowances() {
        let input = SalaryInput::new(dec!(100000.00));

        assert_eq!(input.validate(), Ok(()));
    }

    #[test]
    fn validate_reports_first_negative_field() {
        let mut input = sample_input();
        input.housing_allowance = dec!(-1.00);
        input.other_allowances = dec!(-2.00);

        assert_eq!(
            input.validate(),
            Err(SalaryInputError::NegativeAmount {
                field: "housing_allowance",
                amount: dec!(-1.00),
            })
        );
    }

    #[test]
    fn validate_rejects_negative_basic_pay() {
        let input = SalaryInput::new(dec!(-500.00));

        assert!(matches!(
            input.validate(),
            Err(SalaryInputError::NegativeAmount {
                field: "basic_pay",
                ..
            })
        ));
    }

    #[test]
    fn max_amount_is_one_trillion() {
        assert_eq!(SalaryInput::MAX_AMOUNT, dec!(1000000000000));
    }

    #[test]
    fn validate_accepts_amount_at_cap() {
        let input = SalaryInput::new(SalaryInput::MAX_AMOUNT);

        assert_eq!(input.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_amount_beyond_cap() {
        let mut input = sample_input();
        input.other_allowances = dec!(10000000000000000000000000000);

        assert_eq!(
            input.validate(),
            Err(SalaryInputError::TooLarge {
                field: "other_allowances",
                amount: dec!(10000000000000000000000000000),
                max: SalaryInput::MAX_AMOUNT,
            })
        );
    }
}
