//! Payroll calculations.
//!
//! [`brackets`] applies a progressive bracket table to an income;
//! [`salary`] builds the full per-period breakdown on top of it.

pub mod brackets;
pub mod common;
pub mod salary;

pub use brackets::{BracketContribution, bracket_contributions, compute_tax};
pub use salary::{PayrollCalculator, compute_salary};
