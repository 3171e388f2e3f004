//! Command dispatch: builds the calculator once, then runs the chosen mode.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use payroll_core::calculations::bracket_contributions;
use payroll_core::{PayrollCalculator, PayrollConfig};
use payroll_data::{BracketTableLoader, load_config_file};
use tracing::{debug, info};

use crate::cli::{Cli, Command, ConfigArgs, SalaryArgs};
use crate::csv_loader;
use crate::report::{BatchTotals, BracketBreakdown, Breakdown};
use crate::session::run_session;
use crate::utils::format_money;

/// Resolves the configuration from defaults, files and flags.
///
/// Precedence, lowest first: compiled defaults, `--config`, `--brackets`,
/// `--taxable-base`. The result is validated here so a bad table stops the
/// program before any calculation runs.
pub fn build_calculator(args: &ConfigArgs) -> Result<PayrollCalculator> {
    let mut config = match &args.config {
        Some(path) => load_config_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PayrollConfig::default(),
    };

    if let Some(path) = &args.brackets {
        config.bracket_table = BracketTableLoader::load_file(path, args.bracket_mode)
            .with_context(|| format!("failed to load brackets {}", path.display()))?;
    }

    if let Some(base) = args.taxable_base {
        config.taxable_base = base;
    }

    let calculator = PayrollCalculator::new(config).context("invalid payroll configuration")?;

    let config = calculator.config();
    info!(
        brackets = config.bracket_table.len(),
        taxable_base = config.taxable_base.as_str(),
        periods = config.periods_per_year,
        "calculator configured"
    );
    Ok(calculator)
}

pub fn run_calculate<W: Write>(
    calculator: &PayrollCalculator,
    args: &SalaryArgs,
    out: &mut W,
) -> Result<()> {
    let input = args.to_input();
    let result = calculator.calculate(&input);
    let periods = calculator.config().periods_per_year;

    write!(out, "{}", Breakdown::new(&result, input.deductions, periods))?;

    if args.explain {
        let contributions = bracket_contributions(
            result.annual_taxable_income,
            &calculator.config().bracket_table,
        );
        writeln!(out)?;
        writeln!(
            out,
            "Annual taxable income {}",
            format_money(result.annual_taxable_income)
        )?;
        write!(out, "{}", BracketBreakdown(&contributions))?;
    }
    Ok(())
}

pub fn run_batch<W: Write>(
    calculator: &PayrollCalculator,
    path: &Path,
    out: &mut W,
) -> Result<()> {
    let rows = csv_loader::load_from_file(path)
        .with_context(|| format!("failed to load salaries {}", path.display()))?;
    info!(rows = rows.len(), path = %path.display(), "batch loaded");

    let periods = calculator.config().periods_per_year;
    let mut totals = BatchTotals::default();

    for (index, row) in rows.iter().enumerate() {
        let result = calculator.calculate(&row.input);
        debug!(row = index + 1, net = %result.net_pay, "row calculated");

        match &row.name {
            Some(name) => writeln!(out, "== {name} ==")?,
            None => writeln!(out, "== row {} ==", index + 1)?,
        }
        write!(out, "{}", Breakdown::new(&result, row.input.deductions, periods))?;
        writeln!(out)?;
        totals.add(&result);
    }

    write!(out, "{totals}")?;
    Ok(())
}

/// Entry point shared by the binary; writes to stdout and reads stdin.
pub fn run(cli: &Cli) -> Result<()> {
    let calculator = build_calculator(&cli.config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Calculate(args) => run_calculate(&calculator, args, &mut out),
        Command::Batch { file } => run_batch(&calculator, file, &mut out),
        Command::Interactive => {
            let stdin = io::stdin();
            run_session(&calculator, stdin.lock(), &mut out)
                .context("interactive session failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use payroll_core::TaxableBase;
    use payroll_data::BracketMode;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn data_file(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../payroll-data/test-data")
            .join(name)
    }

    fn salary_args(basic: rust_decimal::Decimal) -> SalaryArgs {
        SalaryArgs {
            basic,
            housing: dec!(60000),
            transport: dec!(25000),
            other: dec!(15000),
            pension: true,
            housing_fund: false,
            insurance: false,
            all_deductions: false,
            explain: false,
        }
    }

    #[test]
    fn defaults_without_files() {
        let calculator = build_calculator(&ConfigArgs::default()).unwrap();

        assert_eq!(calculator.config(), &PayrollConfig::default());
    }

    #[test]
    fn flags_override_config_file() {
        let args = ConfigArgs {
            config: Some(data_file("payroll.toml")),
            brackets: Some(data_file("paye_bounds.csv")),
            bracket_mode: BracketMode::Bounds,
            taxable_base: Some(TaxableBase::GrossPay),
        };

        let calculator = build_calculator(&args).unwrap();

        assert_eq!(calculator.config().taxable_base, TaxableBase::GrossPay);
        assert_eq!(calculator.config().bracket_table.len(), 6);
    }

    #[test]
    fn malformed_bracket_file_fails_fast() {
        let args = ConfigArgs {
            brackets: Some(data_file("paye_bands.csv")),
            bracket_mode: BracketMode::Bounds,
            ..ConfigArgs::default()
        };

        let err = build_calculator(&args).unwrap_err();

        assert!(err.to_string().contains("failed to load brackets"));
    }

    #[test]
    fn calculate_prints_breakdown() {
        let calculator = build_calculator(&ConfigArgs::default()).unwrap();
        let mut out = Vec::new();

        run_calculate(&calculator, &salary_args(dec!(250000)), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("37,916.67"));
        assert!(text.contains("284,083.33"));
        assert!(!text.contains("Annual taxable income"));
    }

    #[test]
    fn explain_appends_bracket_split() {
        let calculator = build_calculator(&ConfigArgs::default()).unwrap();
        let mut args = salary_args(dec!(250000));
        args.explain = true;
        let mut out = Vec::new();

        run_calculate(&calculator, &args, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Annual taxable income 2,700,000.00"));
        assert!(text.contains("1,600,000.00 - 3,200,000.00"));
    }
}
