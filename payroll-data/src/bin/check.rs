use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use payroll_core::PayrollConfig;
use payroll_data::{BracketMode, BracketTableLoader, load_config_file};

/// Validate payroll configuration files and print the resulting schedule.
///
/// Exits non-zero when a file is malformed, so it can gate a deployment.
#[derive(Parser, Debug)]
#[command(name = "payroll-config-check")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV bracket file (columns: limit,rate); replaces the config's brackets
    #[arg(short, long)]
    brackets: Option<PathBuf>,

    /// How the CSV `limit` column is read: bands or bounds
    #[arg(short, long, default_value = "bands", value_parser = parse_mode)]
    mode: BracketMode,
}

fn parse_mode(s: &str) -> Result<BracketMode, String> {
    BracketMode::parse(s).ok_or_else(|| format!("expected 'bands' or 'bounds', got '{s}'"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => PayrollConfig::default(),
    };

    if let Some(path) = &args.brackets {
        config.bracket_table = BracketTableLoader::load_file(path, args.mode)
            .with_context(|| format!("Failed to load brackets: {}", path.display()))?;
    }

    config.validate().context("Invalid payroll configuration")?;

    println!("Personal allowance: {}", config.personal_allowance);
    println!("Taxable base:       {}", config.taxable_base.as_str());
    println!("Periods per year:   {}", config.periods_per_year);
    println!("Brackets:");
    for bracket in config.bracket_table.iter() {
        match bracket.upper_bound {
            Some(bound) => println!("  up to {:>14}  {}", bound, bracket.rate),
            None => println!("  {:>20}  {}", "above", bracket.rate),
        }
    }
    println!("Configuration OK.");

    Ok(())
}
