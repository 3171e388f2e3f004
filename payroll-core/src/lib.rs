pub mod calculations;
pub mod models;

pub use calculations::{PayrollCalculator, compute_salary, compute_tax};
pub use models::*;
