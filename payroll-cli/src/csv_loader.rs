//! CSV loader for batch salary calculations.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive.
//!
//! | Column                | Required | Type    | Notes                                   |
//! |-----------------------|----------|---------|-----------------------------------------|
//! | `name`                | no       | string  | Label printed above the breakdown       |
//! | `basic_pay`           | yes      | decimal | Monthly, e.g. `250000.00`               |
//! | `housing_allowance`   | no       | decimal | Empty or missing means `0`              |
//! | `transport_allowance` | no       | decimal | Empty or missing means `0`              |
//! | `other_allowances`    | no       | decimal | Empty or missing means `0`              |
//! | `pension`             | no       | flag    | `true/false`, `yes/no`, `y/n`, `1/0`    |
//! | `housing_fund`        | no       | flag    | as above; empty means off               |
//! | `insurance`           | no       | flag    | as above; empty means off               |
//!
//! ### Example
//!
//! ```csv
//! name,basic_pay,housing_allowance,transport_allowance,other_allowances,pension,housing_fund,insurance
//! Ada,250000.00,60000.00,25000.00,15000.00,yes,no,yes
//! Bayo,180000.00,,,,,,
//! ```
use std::path::{Path, PathBuf};

use payroll_core::{EnabledDeductions, SalaryInput, SalaryInputError};
use rust_decimal::Decimal;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    name: Option<String>,
    basic_pay: Decimal,
    #[serde(default)]
    housing_allowance: Option<Decimal>,
    #[serde(default)]
    transport_allowance: Option<Decimal>,
    #[serde(default)]
    other_allowances: Option<Decimal>,
    #[serde(default)]
    pension: Option<String>,
    #[serde(default)]
    housing_fund: Option<String>,
    #[serde(default)]
    insurance: Option<String>,
}

/// One parsed row: an optional label and the validated input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalaryRow {
    pub name: Option<String>,
    pub input: SalaryInput,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The underlying CSV deserialisation failed (bad structure, missing
    /// required column, type mismatch, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A deduction column held something other than a yes/no value.
    #[error("unrecognised value '{value}' in column '{column}' on row {row}")]
    InvalidFlag {
        column: &'static str,
        value: String,
        row: usize,
    },

    /// A pay amount on the row was negative or above the accepted maximum.
    #[error("row {row}: {source}")]
    InvalidInput {
        row: usize,
        #[source]
        source: SalaryInputError,
    },

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn parse_flag(
    column: &'static str,
    value: Option<String>,
    row: usize,
) -> Result<bool, CsvLoadError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "no" | "n" | "0" => Ok(false),
        "true" | "yes" | "y" | "1" => Ok(true),
        _ => Err(CsvLoadError::InvalidFlag { column, value, row }),
    }
}

/// Convert a single CSV row into a SalaryRow.
///
/// row_number is 1-based (for error messages).
fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<SalaryRow, CsvLoadError> {
    let input = SalaryInput {
        basic_pay: row.basic_pay,
        housing_allowance: row.housing_allowance.unwrap_or_default(),
        transport_allowance: row.transport_allowance.unwrap_or_default(),
        other_allowances: row.other_allowances.unwrap_or_default(),
        deductions: EnabledDeductions {
            pension: parse_flag("pension", row.pension, row_number)?,
            housing_fund: parse_flag("housing_fund", row.housing_fund, row_number)?,
            insurance: parse_flag("insurance", row.insurance, row_number)?,
        },
    };

    input
        .validate()
        .map_err(|source| CsvLoadError::InvalidInput {
            row: row_number,
            source,
        })?;

    Ok(SalaryRow {
        name: row.name.filter(|n| !n.trim().is_empty()),
        input,
    })
}

/// Parse CSV text and return the rows in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse] – if the CSV is structurally invalid or a
///   required field cannot be deserialised.
/// * [CsvLoadError::InvalidFlag] – if a deduction column is not a yes/no value.
/// * [CsvLoadError::InvalidInput] – if any pay amount is negative or too large.
pub fn load_from_str(input: &str) -> Result<Vec<SalaryRow>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            let row_number = idx + 1; // 1-based for user-facing messages
            convert_row(row, row_number)
        })
        .collect()
}

/// Convenience wrapper: read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &Path) -> Result<Vec<SalaryRow>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
