use clap::Parser;
use tracing::debug;

use payroll_cli::cli::Cli;
use payroll_cli::{app, logging};

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;
    debug!(?cli, "arguments parsed");

    app::run(&cli)
}
