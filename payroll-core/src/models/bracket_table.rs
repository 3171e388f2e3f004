use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a bracket table violates its ordering invariants.
///
/// Positions are 1-based so they line up with rows in a config or CSV file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table has no brackets")]
    Empty,

    #[error("bracket #{position} has a non-positive upper bound {bound}")]
    NonPositiveBound { position: usize, bound: Decimal },

    #[error("bracket #{position} upper bound {bound} does not exceed the previous bound {previous}")]
    NonIncreasingBound {
        position: usize,
        bound: Decimal,
        previous: Decimal,
    },

    #[error("bracket #{position} is unbounded but is not the last bracket")]
    UnboundedNotLast { position: usize },

    #[error("the last bracket must be unbounded")]
    MissingUnbounded,

    #[error("bracket #{position} rate must be between 0 and 1, got {rate}")]
    InvalidRate { position: usize, rate: Decimal },

    #[error("band #{position} has a non-positive width {width}")]
    InvalidBandWidth { position: usize, width: Decimal },

    #[error("band #{position} pushes the cumulative bound past the largest representable amount")]
    BoundOverflow { position: usize },
}

/// A single marginal-rate bracket.
///
/// `upper_bound` is the cumulative income at which this bracket ends; `None`
/// marks the open-ended top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn bounded(
        upper_bound: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }
}

/// An ordered, validated sequence of tax brackets.
///
/// Brackets are kept as an explicit list rather than a map keyed by bound,
/// so schedules that repeat a threshold value (common when a schedule is
/// published as band widths) keep every entry.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::{BracketTable, TaxBracket};
///
/// let table = BracketTable::new(vec![
///     TaxBracket::bounded(dec!(10000), dec!(0.10)),
///     TaxBracket::bounded(dec!(40000), dec!(0.20)),
///     TaxBracket::unbounded(dec!(0.30)),
/// ])
/// .unwrap();
///
/// assert_eq!(table.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Builds a table from cumulative upper bounds.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError`] if the table is empty, a finite bound is
    /// not positive or not strictly increasing, the unbounded bracket is
    /// missing or not last, or a rate falls outside `[0, 1]`.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        if brackets.is_empty() {
            return Err(BracketTableError::Empty);
        }

        let last = brackets.len();
        let mut previous: Option<Decimal> = None;

        for (idx, bracket) in brackets.iter().enumerate() {
            let position = idx + 1;

            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketTableError::InvalidRate {
                    position,
                    rate: bracket.rate,
                });
            }

            match bracket.upper_bound {
                Some(bound) if bound <= Decimal::ZERO => {
                    return Err(BracketTableError::NonPositiveBound { position, bound });
                }
                Some(bound) => {
                    if let Some(previous) = previous.filter(|p| bound <= *p) {
                        return Err(BracketTableError::NonIncreasingBound {
                            position,
                            bound,
                            previous,
                        });
                    }
                    previous = Some(bound);
                }
                None if position != last => {
                    return Err(BracketTableError::UnboundedNotLast { position });
                }
                None => {}
            }
        }

        if brackets[last - 1].upper_bound.is_some() {
            return Err(BracketTableError::MissingUnbounded);
        }

        Ok(Self { brackets })
    }

    /// Builds a table from band widths, accumulating each width onto the
    /// previous bound.
    ///
    /// `(Some(300000), 0.07), (Some(300000), 0.11), (None, 0.15)` becomes the
    /// bounds `300000, 600000, unbounded`.
    ///
    /// # Errors
    ///
    /// Returns [`BracketTableError::InvalidBandWidth`] for a width that is
    /// zero or negative, [`BracketTableError::BoundOverflow`] when the running
    /// bound no longer fits in a `Decimal`, and any error from
    /// [`BracketTable::new`].
    pub fn from_bands<I>(bands: I) -> Result<Self, BracketTableError>
    where
        I: IntoIterator<Item = (Option<Decimal>, Decimal)>,
    {
        Self::new(accumulate_bands(bands)?)
    }

    /// The graduated PAYE schedule used by default.
    ///
    /// | Band                 | Rate |
    /// |----------------------|------|
    /// | first 300,000        | 7%   |
    /// | next 300,000         | 11%  |
    /// | next 500,000         | 15%  |
    /// | next 500,000         | 19%  |
    /// | next 1,600,000       | 21%  |
    /// | above 3,200,000      | 24%  |
    pub fn default_paye() -> Self {
        let bracket =
            |bound: i64, percent: i64| TaxBracket::bounded(Decimal::from(bound), Decimal::new(percent, 2));

        // Cumulative bounds of the bands above.
        Self {
            brackets: vec![
                bracket(300_000, 7),
                bracket(600_000, 11),
                bracket(1_100_000, 15),
                bracket(1_600_000, 19),
                bracket(3_200_000, 21),
                TaxBracket::unbounded(Decimal::new(24, 2)),
            ],
        }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaxBracket> {
        self.brackets.iter()
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    /// The rate of the open-ended top bracket.
    pub fn top_rate(&self) -> Decimal {
        self.brackets
            .last()
            .map(|b| b.rate)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Turns band widths into cumulative upper bounds, checking each width.
fn accumulate_bands<I>(bands: I) -> Result<Vec<TaxBracket>, BracketTableError>
where
    I: IntoIterator<Item = (Option<Decimal>, Decimal)>,
{
    let mut running = Decimal::ZERO;

    bands
        .into_iter()
        .enumerate()
        .map(|(idx, (width, rate))| {
            let position = idx + 1;
            let upper_bound = match width {
                Some(width) if width <= Decimal::ZERO => {
                    return Err(BracketTableError::InvalidBandWidth { position, width });
                }
                Some(width) => {
                    running = running
                        .checked_add(width)
                        .ok_or(BracketTableError::BoundOverflow { position })?;
                    Some(running)
                }
                None => None,
            };
            Ok(TaxBracket { upper_bound, rate })
        })
        .collect()
}

impl Default for BracketTable {
    fn default() -> Self {
        Self::default_paye()
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketTable {
    type Error = BracketTableError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketTable> for Vec<TaxBracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}

impl<'a> IntoIterator for &'a BracketTable {
    type Item = &'a TaxBracket;
    type IntoIter = std::slice::Iter<'a, TaxBracket>;

    fn into_iter(self) -> Self::IntoIter {
        self.brackets.iter()
    }
}
