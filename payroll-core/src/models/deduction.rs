use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Optional statutory deductions taken from gross pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    Pension,
    HousingFund,
    Insurance,
}

impl DeductionKind {
    pub const ALL: [DeductionKind; 3] = [Self::Pension, Self::HousingFund, Self::Insurance];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pension => "pension",
            Self::HousingFund => "housing_fund",
            Self::Insurance => "insurance",
        }
    }

    /// Accepts the snake_case name, or the hyphenated form used on the command line.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pension" => Some(Self::Pension),
            "housing_fund" => Some(Self::HousingFund),
            "insurance" => Some(Self::Insurance),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pension => "Pension",
            Self::HousingFund => "Housing fund",
            Self::Insurance => "Insurance",
        }
    }
}

impl fmt::Display for DeductionKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contribution rate per deduction, applied to gross pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionRates {
    pub pension: Decimal,
    pub housing_fund: Decimal,
    pub insurance: Decimal,
}

impl DeductionRates {
    pub fn rate(
        &self,
        kind: DeductionKind,
    ) -> Decimal {
        match kind {
            DeductionKind::Pension => self.pension,
            DeductionKind::HousingFund => self.housing_fund,
            DeductionKind::Insurance => self.insurance,
        }
    }
}

impl Default for DeductionRates {
    fn default() -> Self {
        Self {
            pension: Decimal::new(8, 2),
            housing_fund: Decimal::new(25, 3),
            insurance: Decimal::new(5, 2),
        }
    }
}

/// Which optional deductions apply to a salary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledDeductions {
    #[serde(default)]
    pub pension: bool,
    #[serde(default)]
    pub housing_fund: bool,
    #[serde(default)]
    pub insurance: bool,
}

impl EnabledDeductions {
    pub fn all() -> Self {
        Self {
            pension: true,
            housing_fund: true,
            insurance: true,
        }
    }

    pub fn is_enabled(
        &self,
        kind: DeductionKind,
    ) -> bool {
        match kind {
            DeductionKind::Pension => self.pension,
            DeductionKind::HousingFund => self.housing_fund,
            DeductionKind::Insurance => self.insurance,
        }
    }

    pub fn set(
        &mut self,
        kind: DeductionKind,
        enabled: bool,
    ) {
        match kind {
            DeductionKind::Pension => self.pension = enabled,
            DeductionKind::HousingFund => self.housing_fund = enabled,
            DeductionKind::Insurance => self.insurance = enabled,
        }
    }

    /// Flips the flag and returns the new state.
    pub fn toggle(
        &mut self,
        kind: DeductionKind,
    ) -> bool {
        let enabled = !self.is_enabled(kind);
        self.set(kind, enabled);
        enabled
    }
}

/// Deduction amounts for one pay period. Disabled deductions are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryDeductions {
    pub pension: Decimal,
    pub housing_fund: Decimal,
    pub insurance: Decimal,
}

impl StatutoryDeductions {
    pub fn amount(
        &self,
        kind: DeductionKind,
    ) -> Decimal {
        match kind {
            DeductionKind::Pension => self.pension,
            DeductionKind::HousingFund => self.housing_fund,
            DeductionKind::Insurance => self.insurance,
        }
    }

    pub fn total(&self) -> Decimal {
        self.pension + self.housing_fund + self.insurance
    }

    pub(crate) fn with_amount(
        mut self,
        kind: DeductionKind,
        amount: Decimal,
    ) -> Self {
        match kind {
            DeductionKind::Pension => self.pension = amount,
            DeductionKind::HousingFund => self.housing_fund = amount,
            DeductionKind::Insurance => self.insurance = amount,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_accepts_snake_and_kebab_case() {
        assert_eq!(DeductionKind::parse("pension"), Some(DeductionKind::Pension));
        assert_eq!(
            DeductionKind::parse("housing-fund"),
            Some(DeductionKind::HousingFund)
        );
        assert_eq!(
            DeductionKind::parse(" Housing_Fund "),
            Some(DeductionKind::HousingFund)
        );
        assert_eq!(DeductionKind::parse("INSURANCE"), Some(DeductionKind::Insurance));
        assert_eq!(DeductionKind::parse("union_dues"), None);
    }

    #[test]
    fn parse_round_trips_every_kind() {
        for kind in DeductionKind::ALL {
            assert_eq!(DeductionKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn default_rates() {
        let rates = DeductionRates::default();

        assert_eq!(rates.rate(DeductionKind::Pension), dec!(0.08));
        assert_eq!(rates.rate(DeductionKind::HousingFund), dec!(0.025));
        assert_eq!(rates.rate(DeductionKind::Insurance), dec!(0.05));
    }

    #[test]
    fn toggle_flips_only_the_named_flag() {
        let mut enabled = EnabledDeductions::default();

        assert!(enabled.toggle(DeductionKind::HousingFund));
        assert_eq!(
            enabled,
            EnabledDeductions {
                pension: false,
                housing_fund: true,
                insurance: false,
            }
        );

        assert!(!enabled.toggle(DeductionKind::HousingFund));
        assert_eq!(enabled, EnabledDeductions::default());
    }

    #[test]
    fn statutory_deductions_total() {
        let amounts = StatutoryDeductions::default()
            .with_amount(DeductionKind::Pension, dec!(8000.00))
            .with_amount(DeductionKind::Insurance, dec!(5000.00));

        assert_eq!(amounts.amount(DeductionKind::HousingFund), dec!(0));
        assert_eq!(amounts.total(), dec!(13000.00));
    }
}
