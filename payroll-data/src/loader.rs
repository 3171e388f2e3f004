use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use payroll_core::{BracketTable, BracketTableError, TaxBracket};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading bracket data.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid bracket table: {0}")]
    Table(#[from] BracketTableError),
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// How the `limit` column of a bracket file is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketMode {
    /// `limit` is the width of the band, added onto the previous bound.
    #[default]
    Bands,
    /// `limit` is the cumulative income at which the bracket ends.
    Bounds,
}

impl BracketMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bands => "bands",
            Self::Bounds => "bounds",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bands" | "band" | "widths" => Some(Self::Bands),
            "bounds" | "bound" | "thresholds" => Some(Self::Bounds),
            _ => None,
        }
    }

    /// Builds a validated table from `(limit, rate)` pairs read in this mode.
    pub fn build<I>(
        &self,
        rows: I,
    ) -> Result<BracketTable, BracketTableError>
    where
        I: IntoIterator<Item = (Option<Decimal>, Decimal)>,
    {
        match self {
            Self::Bands => BracketTable::from_bands(rows),
            Self::Bounds => BracketTable::new(
                rows.into_iter()
                    .map(|(upper_bound, rate)| TaxBracket { upper_bound, rate })
                    .collect(),
            ),
        }
    }
}

/// A single row from a bracket CSV file.
///
/// - `limit`: band width or upper bound depending on [`BracketMode`];
///   empty for the open-ended top bracket
/// - `rate`: the marginal rate as a decimal (e.g. 0.07 for 7%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub limit: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .replace(',', "")
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket tables stored as CSV.
///
/// Rows are kept in file order; nothing is sorted or de-duplicated, so a
/// schedule listing the same band width twice keeps both bands.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Parse and validate a bracket table from a CSV reader.
    pub fn load<R: Read>(
        reader: R,
        mode: BracketMode,
    ) -> Result<BracketTable, BracketLoaderError> {
        let records = Self::parse(reader)?;
        debug!(rows = records.len(), mode = mode.as_str(), "parsed bracket rows");

        let table = mode.build(records.into_iter().map(|r| (r.limit, r.rate)))?;
        Ok(table)
    }

    /// Convenience wrapper: open a file and delegate to [`BracketTableLoader::load`].
    pub fn load_file(
        path: &Path,
        mode: BracketMode,
    ) -> Result<BracketTable, BracketLoaderError> {
        let file = File::open(path).map_err(|source| BracketLoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(file, mode)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const PAYE_BANDS_CSV: &str = "\
limit,rate
300000,0.07
300000,0.11
500000,0.15
500000,0.19
1600000,0.21
,0.24
";

    #[test]
    fn test_parse_keeps_repeated_limits() {
        let records = BracketTableLoader::parse(PAYE_BANDS_CSV.as_bytes())
            .expect("Failed to parse CSV");

        assert_eq!(records.len(), 6);
        assert_eq!(
            records[0],
            BracketRecord {
                limit: Some(dec!(300000)),
                rate: dec!(0.07),
            }
        );
        assert_eq!(
            records[1],
            BracketRecord {
                limit: Some(dec!(300000)),
                rate: dec!(0.11),
            }
        );
        assert_eq!(records[5].limit, None);
    }

    #[test]
    fn test_parse_accepts_thousands_separators() {
        let csv = "limit,rate\n\"1,600,000\",0.21\n,0.24";

        let records = BracketTableLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].limit, Some(dec!(1600000)));
    }

    #[test]
    fn test_load_bands_matches_default_schedule() {
        let table = BracketTableLoader::load(PAYE_BANDS_CSV.as_bytes(), BracketMode::Bands)
            .expect("Failed to load table");

        assert_eq!(table, BracketTable::default_paye());
    }

    #[test]
    fn test_load_bounds_mode_rejects_repeated_limits() {
        let result = BracketTableLoader::load(PAYE_BANDS_CSV.as_bytes(), BracketMode::Bounds);

        let err = result.expect_err("repeated bounds should fail");
        assert!(
            matches!(
                err,
                BracketLoaderError::Table(BracketTableError::NonIncreasingBound { position: 2, .. })
            ),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_load_bounds_mode() {
        let csv = "limit,rate\n300000,0.07\n600000,0.11\n,0.15";

        let table =
            BracketTableLoader::load(csv.as_bytes(), BracketMode::Bounds).expect("valid table");

        assert_eq!(table.brackets()[1].upper_bound, Some(dec!(600000)));
        assert_eq!(table.top_rate(), dec!(0.15));
    }

    #[test]
    fn test_load_requires_open_top_bracket() {
        let csv = "limit,rate\n300000,0.07\n300000,0.11";

        let result = BracketTableLoader::load(csv.as_bytes(), BracketMode::Bands);

        assert!(matches!(
            result,
            Err(BracketLoaderError::Table(BracketTableError::MissingUnbounded))
        ));
    }

    #[test]
    fn test_load_empty_csv_is_an_empty_table_error() {
        let result = BracketTableLoader::load("limit,rate\n".as_bytes(), BracketMode::Bands);

        assert!(matches!(
            result,
            Err(BracketLoaderError::Table(BracketTableError::Empty))
        ));
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "limit\n300000";

        let err = BracketTableLoader::parse(csv.as_bytes()).expect_err("missing column");
        let BracketLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_parse_invalid_decimal() {
        let csv = "limit,rate\nabc,0.07";

        let result = BracketTableLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(BracketLoaderError::CsvParse(_))));
    }

    #[test]
    fn test_bracket_mode_parse() {
        assert_eq!(BracketMode::parse("Bands"), Some(BracketMode::Bands));
        assert_eq!(BracketMode::parse("bounds"), Some(BracketMode::Bounds));
        assert_eq!(BracketMode::parse("steps"), None);
    }
}
