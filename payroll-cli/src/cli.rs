use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use payroll_core::{EnabledDeductions, SalaryInput, TaxableBase};
use payroll_data::BracketMode;
use rust_decimal::Decimal;

use crate::utils::parse_amount;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Monthly payroll calculator with progressive income tax.
///
/// Pay amounts are monthly. The bracket table and personal allowance are
/// annual; taxable pay is annualized before the brackets are applied.
#[derive(Debug, Parser)]
#[command(name = "payroll", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Log filter: a level ("debug") or EnvFilter directives. Overrides RUST_LOG.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Append log records to this file as well as stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the calculator's configuration comes from.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// TOML configuration file; built-in defaults are used without one.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// CSV bracket file (columns: limit,rate). Replaces the configured brackets.
    #[arg(long, global = true)]
    pub brackets: Option<PathBuf>,

    /// How the bracket file's `limit` column is read.
    #[arg(long, global = true, default_value = "bands", value_parser = parse_bracket_mode)]
    pub bracket_mode: BracketMode,

    /// Which pay is taxed: basic_pay or gross_pay. Overrides the config file.
    #[arg(long, global = true, value_parser = parse_taxable_base)]
    pub taxable_base: Option<TaxableBase>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute the breakdown for one salary.
    Calculate(SalaryArgs),

    /// Compute a breakdown for every row of a salary CSV file.
    Batch {
        /// CSV with a basic_pay column and optional allowance/deduction columns.
        file: PathBuf,
    },

    /// Read commands from stdin and keep the last result for redisplay.
    Interactive,
}

/// Pay components and deduction switches for `calculate`.
#[derive(Debug, Clone, Args)]
pub struct SalaryArgs {
    /// Monthly basic pay.
    #[arg(long, value_parser = parse_amount)]
    pub basic: Decimal,

    /// Monthly housing allowance.
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub housing: Decimal,

    /// Monthly transport allowance.
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub transport: Decimal,

    /// Other monthly allowances.
    #[arg(long, value_parser = parse_amount, default_value = "0")]
    pub other: Decimal,

    /// Deduct the pension contribution.
    #[arg(long)]
    pub pension: bool,

    /// Deduct the housing fund contribution.
    #[arg(long)]
    pub housing_fund: bool,

    /// Deduct the insurance contribution.
    #[arg(long)]
    pub insurance: bool,

    /// Deduct every statutory contribution.
    #[arg(long, conflicts_with_all = ["pension", "housing_fund", "insurance"])]
    pub all_deductions: bool,

    /// Also print how the annual tax splits across brackets.
    #[arg(long)]
    pub explain: bool,
}

impl SalaryArgs {
    pub fn to_input(&self) -> SalaryInput {
        let deductions = if self.all_deductions {
            EnabledDeductions::all()
        } else {
            EnabledDeductions {
                pension: self.pension,
                housing_fund: self.housing_fund,
                insurance: self.insurance,
            }
        };

        SalaryInput {
            basic_pay: self.basic,
            housing_allowance: self.housing,
            transport_allowance: self.transport,
            other_allowances: self.other,
            deductions,
        }
    }
}

fn parse_bracket_mode(s: &str) -> Result<BracketMode, String> {
    BracketMode::parse(s).ok_or_else(|| format!("expected 'bands' or 'bounds', got '{s}'"))
}

fn parse_taxable_base(s: &str) -> Result<TaxableBase, String> {
    TaxableBase::parse(s).ok_or_else(|| format!("expected 'basic_pay' or 'gross_pay', got '{s}'"))
}
