mod bracket_table;
mod calculation_result;
mod deduction;
mod payroll_config;
mod salary_input;

pub use bracket_table::{BracketTable, BracketTableError, TaxBracket};
pub use calculation_result::{CalculationResult, YearlySummary};
pub use deduction::{DeductionKind, DeductionRates, EnabledDeductions, StatutoryDeductions};
pub use payroll_config::{PayrollConfig, PayrollConfigError, TaxableBase};
pub use salary_input::{SalaryInput, SalaryInputError};
