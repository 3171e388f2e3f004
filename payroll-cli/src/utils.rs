use rust_decimal::Decimal;
use thiserror::Error;

use payroll_core::SalaryInput;
use payroll_core::calculations::common::round_half_up;

/// Error returned when a string cannot be used as a pay amount.
#[derive(Debug, Error)]
pub enum AmountError {
    #[error("invalid amount '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("amount must not be negative, got {0}")]
    Negative(Decimal),

    #[error("amount must not exceed {max}, got {amount}")]
    TooLarge { amount: Decimal, max: Decimal },
}

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`).
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, AmountError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized.parse().map_err(|e| {
        tracing::warn!(input = %s, "invalid decimal: {}", e);
        AmountError::Invalid {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Parses a pay amount, rejecting negative values and anything above
/// [`SalaryInput::MAX_AMOUNT`].
///
/// This is the input boundary for every monetary value the CLI accepts.
pub fn parse_amount(s: &str) -> Result<Decimal, AmountError> {
    let amount = parse_decimal(s)?;
    if amount < Decimal::ZERO {
        return Err(AmountError::Negative(amount));
    }
    if amount > SalaryInput::MAX_AMOUNT {
        return Err(AmountError::TooLarge {
            amount,
            max: SalaryInput::MAX_AMOUNT,
        });
    }
    Ok(amount)
}

/// Formats a monetary amount with two decimals and comma thousands separators.
pub fn format_money(amount: Decimal) -> String {
    let text = format!("{:.2}", round_half_up(amount));
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{fraction}")
}

/// Formats a rate such as `0.025` as `2.5%`.
pub fn format_rate(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_accepts_comma_thousands_separator() {
        assert_eq!(parse_decimal("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_decimal("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_decimal_trim_whitespace() {
        assert_eq!(parse_decimal("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_decimal_empty_treated_as_zero() {
        assert_eq!(parse_decimal("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_decimal("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_decimal_invalid_returns_error() {
        assert!(matches!(
            parse_decimal("abc"),
            Err(AmountError::Invalid { .. })
        ));
    }

    #[test]
    fn parse_amount_rejects_negative() {
        assert!(matches!(
            parse_amount("-250,000"),
            Err(AmountError::Negative(amount)) if amount == dec!(-250000)
        ));
    }

    #[test]
    fn parse_amount_rejects_amount_above_cap() {
        assert!(matches!(
            parse_amount("10000000000000000000000000000"),
            Err(AmountError::TooLarge { max, .. }) if max == SalaryInput::MAX_AMOUNT
        ));
        assert_eq!(
            parse_amount("1,000,000,000,000").unwrap(),
            SalaryInput::MAX_AMOUNT
        );
    }

    #[test]
    fn parse_amount_accepts_zero_and_positive() {
        assert_eq!(parse_amount("0").unwrap(), dec!(0));
        assert_eq!(parse_amount("250,000.50").unwrap(), dec!(250000.50));
    }

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(dec!(4200000)), "4,200,000.00");
        assert_eq!(format_money(dec!(37916.666)), "37,916.67");
        assert_eq!(format_money(dec!(999.5)), "999.50");
        assert_eq!(format_money(dec!(0)), "0.00");
    }

    #[test]
    fn format_money_keeps_sign() {
        assert_eq!(format_money(dec!(-1234567.8)), "-1,234,567.80");
    }

    #[test]
    fn format_rate_as_percentage() {
        assert_eq!(format_rate(dec!(0.025)), "2.5%");
        assert_eq!(format_rate(dec!(0.08)), "8%");
    }
}
