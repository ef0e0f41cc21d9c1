//! CLI commands for reports
//!
//! Generate report documents, check a configuration, or list the periods a
//! configuration covers.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::ReportConfig;
use crate::error::{ReportError, ReportResult};
use crate::export::export_report_csv;
use crate::services::{CsvDirectoryFetcher, PeriodService, ReportService};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Fetch every account and write the report documents
    #[command(alias = "run")]
    Generate {
        /// Path to the YAML report configuration
        config: PathBuf,

        /// Directory holding one `<account>.csv` file per account
        #[arg(short, long, env = "FINOPS_DATA_DIR")]
        data_dir: PathBuf,

        /// Directory the documents are written to
        #[arg(short, long, default_value = "reports")]
        output_dir: PathBuf,

        /// Also export every table as CSV
        #[arg(long)]
        csv: bool,
    },

    /// Load and validate a configuration
    #[command(alias = "check")]
    Validate {
        /// Path to the YAML report configuration
        config: PathBuf,
    },

    /// List the periods of a configuration's report window
    Periods {
        /// Path to the YAML report configuration
        config: PathBuf,
    },
}

/// Handle report commands
pub fn handle_report_command(cmd: ReportCommands) -> ReportResult<()> {
    match cmd {
        ReportCommands::Generate {
            config,
            data_dir,
            output_dir,
            csv,
        } => handle_generate(&config, data_dir, &output_dir, csv),
        ReportCommands::Validate { config } => handle_validate(&config),
        ReportCommands::Periods { config } => handle_periods(&config),
    }
}

fn write_file(path: &Path, content: &str) -> ReportResult<()> {
    fs::write(path, content).map_err(|e| {
        ReportError::Export(format!("Failed to write {}: {}", path.display(), e))
    })
}

/// Handle report generation
fn handle_generate(
    config_path: &Path,
    data_dir: PathBuf,
    output_dir: &Path,
    csv: bool,
) -> ReportResult<()> {
    let config = ReportConfig::load(config_path)?;
    let fetcher = CsvDirectoryFetcher::new(data_dir);
    let run = ReportService::new(&config).run(&fetcher);

    fs::create_dir_all(output_dir).map_err(|e| {
        ReportError::Export(format!(
            "Failed to create output directory {}: {}",
            output_dir.display(),
            e
        ))
    })?;

    for document in run.render()? {
        let path = output_dir.join(document.file_name(&config.report_name));
        write_file(&path, &document.content)?;
        println!("{} report written to: {}", document.format, path.display());
    }

    if csv {
        let path = output_dir.join(format!("{}.csv", config.report_name));
        let file = File::create(&path).map_err(|e| {
            ReportError::Export(format!("Failed to create file {}: {}", path.display(), e))
        })?;
        let mut writer = BufWriter::new(file);
        export_report_csv(&run.report_set(), config.report_kind, &mut writer)?;
        println!("CSV export written to: {}", path.display());
    }

    let fetched = config.profiles.len() - run.fetch_failures.len();
    println!(
        "Accounts: {} of {} fetched, records: {} kept, {} folded into Other, {} excluded, {} rejected",
        fetched,
        config.profiles.len(),
        run.summary.accepted,
        run.summary.folded,
        run.summary.excluded,
        run.summary.rejected
    );

    Ok(())
}

/// Handle configuration validation
fn handle_validate(config_path: &Path) -> ReportResult<()> {
    let config = ReportConfig::load(config_path)?;
    let periods = PeriodService::new(&config).periods();

    let categories = if config.services.is_empty() {
        "all".to_string()
    } else {
        config.services.join(", ")
    };
    let exclusions: Vec<String> = config.exclusions().iter().map(|r| r.to_string()).collect();

    println!("Configuration OK: {}", config_path.display());
    println!("  Report:     {} ({})", config.report_name, config.report_kind);
    println!("  Format:     {}", config.report_format);
    println!("  Sort by:    {}", config.sort_by);
    println!("  Accounts:   {}", config.profiles.join(", "));
    println!("  Categories: {}", categories);
    println!(
        "  Window:     {} to {} ({} {} periods)",
        config.start_date,
        config.end_date,
        periods.len(),
        config.period
    );
    if exclusions.is_empty() {
        println!("  Excluding:  nothing");
    } else {
        println!("  Excluding:  {}", exclusions.join(", "));
    }

    Ok(())
}

/// Handle period listing
fn handle_periods(config_path: &Path) -> ReportResult<()> {
    let config = ReportConfig::load(config_path)?;
    let periods = PeriodService::new(&config).periods();

    if periods.is_empty() {
        println!("No periods in window {} to {}", config.start_date, config.end_date);
        return Ok(());
    }

    for period in periods {
        println!("{:<12} {}", period.key(), period.label());
    }

    Ok(())
}
