//! Loading payroll configuration from disk.
//!
//! Bracket tables come from CSV via [`BracketTableLoader`]; the full
//! calculator configuration comes from TOML via [`load_config_file`]. Both
//! validate eagerly so a malformed table stops the program at startup.

pub mod config;
pub mod loader;

pub use config::{ConfigError, ConfigFile, load_config_file, load_config_str};
pub use loader::{BracketLoaderError, BracketMode, BracketRecord, BracketTableLoader};
