use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use finops_report::cli::{handle_report_command, ReportCommands};

#[derive(Parser)]
#[command(
    name = "finops-report",
    version,
    about = "Multi-account cost and findings reports",
    long_about = "finops-report aggregates per-account cost or findings records into \
                  period-by-category tables and renders them as markdown tables or an \
                  interactive HTML page with charts."
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: ReportCommands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    handle_report_command(cli.command)?;
    Ok(())
}
