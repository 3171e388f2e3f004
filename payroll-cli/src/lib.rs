pub mod app;
pub mod cli;
pub mod csv_loader;
pub mod logging;
pub mod report;
pub mod session;
pub mod utils;
