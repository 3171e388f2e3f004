//! Shared helpers for payroll calculations.
//!
//! Rounding and period conversion live here so every calculation applies
//! them the same way.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(52666.664)), dec!(52666.66));
/// assert_eq!(round_half_up(dec!(52666.665)), dec!(52666.67));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Converts a per-period amount to a yearly one.
pub fn annualize(
    amount: Decimal,
    periods_per_year: u32,
) -> Decimal {
    amount * Decimal::from(periods_per_year)
}

/// Spreads a yearly amount evenly over each period, unrounded.
///
/// `periods_per_year` must be non-zero; [`PayrollConfig::validate`](crate::PayrollConfig::validate)
/// guarantees this for any configured calculator.
pub fn per_period(
    amount: Decimal,
    periods_per_year: u32,
) -> Decimal {
    amount / Decimal::from(periods_per_year)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_a_monthly_third() {
        // 632000 / 12 = 52666.666...
        let result = round_half_up(dec!(632000) / dec!(12));

        assert_eq!(result, dec!(52666.67));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(8750.125)), dec!(8750.13));
    }

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(8750.124)), dec!(8750.12));
    }

    #[test]
    fn round_half_up_keeps_whole_amounts() {
        assert_eq!(round_half_up(dec!(40000)), dec!(40000));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_floors_negative_income_at_zero() {
        assert_eq!(max(dec!(-300000), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn max_returns_positive_income() {
        assert_eq!(max(dec!(1500), Decimal::ZERO), dec!(1500));
    }

    // =========================================================================
    // period conversion tests
    // =========================================================================

    #[test]
    fn annualize_multiplies_by_periods() {
        assert_eq!(annualize(dec!(250000.50), 12), dec!(3000006.00));
    }

    #[test]
    fn per_period_divides_by_periods() {
        assert_eq!(per_period(dec!(480000), 12), dec!(40000));
        assert_eq!(per_period(dec!(520), 52), dec!(10));
    }
}
