//! Interactive calculation session.
//!
//! The session owns the input being edited and the last computed result.
//! The calculator itself stays stateless: `calc` hands a fresh
//! [`CalculationResult`] back to the session, and any edit to the input
//! drops the old result so `show` can never display figures for inputs that
//! no longer apply.

use std::io::{self, BufRead, Write};

use payroll_core::{CalculationResult, DeductionKind, PayrollCalculator, SalaryInput};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use crate::report::Breakdown;
use crate::utils::{AmountError, format_money, parse_amount};

pub const HELP: &str = "\
Commands:
  set <basic|housing|transport|other> <amount>   change a pay component
  enable|disable|toggle <pension|housing_fund|insurance>
  calc                                            compute the breakdown
  show                                            show the last breakdown
  input                                           show the current input
  reset                                           clear input and result
  help                                            show this help
  quit                                            leave the session";

/// Pay component addressed by `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayField {
    Basic,
    Housing,
    Transport,
    Other,
}

impl PayField {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "basic" | "basic_pay" => Some(Self::Basic),
            "housing" | "housing_allowance" => Some(Self::Housing),
            "transport" | "transport_allowance" => Some(Self::Transport),
            "other" | "other_allowances" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Basic => "Basic pay",
            Self::Housing => "Housing allowance",
            Self::Transport => "Transport allowance",
            Self::Other => "Other allowances",
        }
    }

    fn slot<'a>(
        &self,
        input: &'a mut SalaryInput,
    ) -> &'a mut Decimal {
        match self {
            Self::Basic => &mut input.basic_pay,
            Self::Housing => &mut input.housing_allowance,
            Self::Transport => &mut input.transport_allowance,
            Self::Other => &mut input.other_allowances,
        }
    }
}

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(PayField, Decimal),
    Enable(DeductionKind),
    Disable(DeductionKind),
    Toggle(DeductionKind),
    Calc,
    Show,
    Input,
    Reset,
    Help,
    Quit,
}

/// Errors from parsing a command line.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{0}' needs {1}")]
    MissingArgument(&'static str, &'static str),

    #[error("unknown pay field '{0}'")]
    UnknownField(String),

    #[error("unknown deduction '{0}'")]
    UnknownDeduction(String),

    #[error(transparent)]
    Amount(#[from] AmountError),
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();

        let deduction = |word: Option<&str>,
                         verb: &'static str|
         -> Result<DeductionKind, CommandError> {
            let word = word.ok_or(CommandError::MissingArgument(verb, "a deduction"))?;
            DeductionKind::parse(word).ok_or_else(|| CommandError::UnknownDeduction(word.into()))
        };

        match verb.as_str() {
            "set" => {
                let field = words
                    .next()
                    .ok_or(CommandError::MissingArgument("set", "a field and an amount"))?;
                let field =
                    PayField::parse(field).ok_or_else(|| CommandError::UnknownField(field.into()))?;
                let amount = words
                    .next()
                    .ok_or(CommandError::MissingArgument("set", "an amount"))?;
                Ok(Self::Set(field, parse_amount(amount)?))
            }
            "enable" => Ok(Self::Enable(deduction(words.next(), "enable")?)),
            "disable" => Ok(Self::Disable(deduction(words.next(), "disable")?)),
            "toggle" => Ok(Self::Toggle(deduction(words.next(), "toggle")?)),
            "calc" | "calculate" => Ok(Self::Calc),
            "show" => Ok(Self::Show),
            "input" => Ok(Self::Input),
            "reset" => Ok(Self::Reset),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// What a command produced, for the caller to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ack(String),
    Breakdown(CalculationResult),
    NoResultYet,
    Input(SalaryInput),
    Help,
    Quit,
}

/// Editable input plus the result computed from it, if any.
#[derive(Debug, Clone, Default)]
pub struct Session {
    input: SalaryInput,
    last_result: Option<CalculationResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &SalaryInput {
        &self.input
    }

    pub fn last_result(&self) -> Option<&CalculationResult> {
        self.last_result.as_ref()
    }

    /// Applies one command. Any change to the input discards the last result.
    pub fn apply(
        &mut self,
        command: Command,
        calculator: &PayrollCalculator,
    ) -> Reply {
        match command {
            Command::Set(field, amount) => {
                *field.slot(&mut self.input) = amount;
                self.last_result = None;
                Reply::Ack(format!("{} set to {}", field.label(), format_money(amount)))
            }
            Command::Enable(kind) => {
                self.input.deductions.set(kind, true);
                self.last_result = None;
                Reply::Ack(format!("{} enabled", kind.label()))
            }
            Command::Disable(kind) => {
                self.input.deductions.set(kind, false);
                self.last_result = None;
                Reply::Ack(format!("{} disabled", kind.label()))
            }
            Command::Toggle(kind) => {
                let enabled = self.input.deductions.toggle(kind);
                self.last_result = None;
                let state = if enabled { "enabled" } else { "disabled" };
                Reply::Ack(format!("{} {state}", kind.label()))
            }
            Command::Calc => {
                let result = calculator.calculate(&self.input);
                debug!(net_pay = %result.net_pay, "session calculation");
                self.last_result = Some(result.clone());
                Reply::Breakdown(result)
            }
            Command::Show => match &self.last_result {
                Some(result) => Reply::Breakdown(result.clone()),
                None => Reply::NoResultYet,
            },
            Command::Input => Reply::Input(self.input.clone()),
            Command::Reset => {
                *self = Self::default();
                Reply::Ack("session cleared".to_string())
            }
            Command::Help => Reply::Help,
            Command::Quit => Reply::Quit,
        }
    }
}

fn write_input<W: Write>(
    out: &mut W,
    input: &SalaryInput,
) -> io::Result<()> {
    for (field, amount) in input.components() {
        writeln!(out, "{field:<22}{:>16}", format_money(amount))?;
    }
    for kind in DeductionKind::ALL {
        let state = if input.deductions.is_enabled(kind) {
            "on"
        } else {
            "off"
        };
        writeln!(out, "{:<22}{state:>16}", kind.as_str())?;
    }
    Ok(())
}

/// Runs a line-oriented session until `quit` or end of input.
pub fn run_session<R: BufRead, W: Write>(
    calculator: &PayrollCalculator,
    reader: R,
    out: &mut W,
) -> io::Result<()> {
    let periods = calculator.config().periods_per_year;
    let mut session = Session::new();
    info!("interactive session started");

    writeln!(out, "Payroll calculator. Type 'help' for commands.")?;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                continue;
            }
        };

        match session.apply(command, calculator) {
            Reply::Ack(message) => writeln!(out, "{message}")?,
            Reply::Breakdown(result) => {
                write!(
                    out,
                    "{}",
                    Breakdown::new(&result, session.input().deductions, periods)
                )?;
            }
            Reply::NoResultYet => writeln!(out, "No result yet. Enter pay and run 'calc'.")?,
            Reply::Input(input) => write_input(out, &input)?,
            Reply::Help => writeln!(out, "{HELP}")?,
            Reply::Quit => break,
        }
    }

    info!("interactive session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use payroll_core::PayrollConfig;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn calculator() -> PayrollCalculator {
        PayrollCalculator::new(PayrollConfig::default()).unwrap()
    }

    // =========================================================================
    // Command::parse tests
    // =========================================================================

    #[test]
    fn parse_set_with_separators() {
        let command = Command::parse("set basic 250,000").unwrap();

        assert_eq!(command, Command::Set(PayField::Basic, dec!(250000)));
    }

    #[test]
    fn parse_set_rejects_negative_amount() {
        let err = Command::parse("set housing -5").unwrap_err();

        assert!(matches!(err, CommandError::Amount(AmountError::Negative(_))));
    }

    #[test]
    fn parse_set_rejects_amount_above_cap() {
        let err = Command::parse("set basic 10000000000000000000000000000").unwrap_err();

        assert!(matches!(err, CommandError::Amount(AmountError::TooLarge { .. })));
    }

    #[test]
    fn parse_set_requires_amount() {
        let err = Command::parse("set basic").unwrap_err();

        assert!(matches!(err, CommandError::MissingArgument("set", _)));
    }

    #[test]
    fn parse_deduction_commands() {
        assert_eq!(
            Command::parse("enable housing-fund").unwrap(),
            Command::Enable(DeductionKind::HousingFund)
        );
        assert_eq!(
            Command::parse("TOGGLE pension").unwrap(),
            Command::Toggle(DeductionKind::Pension)
        );
        assert!(matches!(
            Command::parse("disable dues"),
            Err(CommandError::UnknownDeduction(_))
        ));
    }

    #[test]
    fn parse_unknown_command() {
        assert!(matches!(
            Command::parse("print"),
            Err(CommandError::Unknown(verb)) if verb == "print"
        ));
        assert!(matches!(Command::parse("   "), Err(CommandError::Empty)));
    }

    // =========================================================================
    // Session::apply tests
    // =========================================================================

    #[test]
    fn show_before_calc_reports_no_result() {
        let mut session = Session::new();

        let reply = session.apply(Command::Show, &calculator());

        assert_eq!(reply, Reply::NoResultYet);
    }

    #[test]
    fn calc_then_show_returns_same_result() {
        let calculator = calculator();
        let mut session = Session::new();
        session.apply(Command::Set(PayField::Basic, dec!(250000)), &calculator);

        let Reply::Breakdown(computed) = session.apply(Command::Calc, &calculator) else {
            panic!("calc should produce a breakdown");
        };
        let shown = session.apply(Command::Show, &calculator);

        assert_eq!(shown, Reply::Breakdown(computed.clone()));
        assert_eq!(computed.tax_owed, dec!(37916.67));
    }

    #[test]
    fn editing_input_discards_stale_result() {
        let calculator = calculator();
        let mut session = Session::new();
        session.apply(Command::Set(PayField::Basic, dec!(250000)), &calculator);
        session.apply(Command::Calc, &calculator);

        session.apply(Command::Enable(DeductionKind::Pension), &calculator);

        assert!(session.last_result().is_none());
        assert_eq!(session.apply(Command::Show, &calculator), Reply::NoResultYet);
    }

    #[test]
    fn set_reply_names_the_field() {
        let mut session = Session::new();

        let reply = session.apply(Command::Set(PayField::Housing, dec!(60000)), &calculator());

        assert_eq!(
            reply,
            Reply::Ack("Housing allowance set to 60,000.00".to_string())
        );
    }

    #[test]
    fn reset_clears_input_and_result() {
        let calculator = calculator();
        let mut session = Session::new();
        session.apply(Command::Set(PayField::Other, dec!(1000)), &calculator);
        session.apply(Command::Calc, &calculator);

        session.apply(Command::Reset, &calculator);

        assert_eq!(session.input(), &SalaryInput::default());
        assert!(session.last_result().is_none());
    }

    // =========================================================================
    // run_session tests
    // =========================================================================

    #[test]
    fn run_session_processes_script() {
        let script = "show\nset basic 250000\nenable pension\ncalc\nbogus\nquit\ncalc\n";
        let mut out = Vec::new();

        run_session(&calculator(), script.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("No result yet."));
        assert!(text.contains("Pension enabled"));
        assert!(text.contains("37,916.67"));
        assert!(text.contains("error: unknown command 'bogus'"));
        // Nothing after quit is processed.
        assert_eq!(text.matches("Net pay").count(), 1);
    }

    #[test]
    fn run_session_survives_oversized_amount() {
        let script = "set basic 250000\nset basic 10000000000000000000000000000\ncalc\n";
        let mut out = Vec::new();

        run_session(&calculator(), script.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("error: amount must not exceed"));
        assert!(text.contains("Basic pay set to 250,000.00"));
        assert!(text.contains("37,916.67"));
    }
}
