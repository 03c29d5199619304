//! CLI commands for reports

use clap::{Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use crate::config::settings::Settings;
use crate::error::{SplitError, SplitResult};
use crate::reports::MonthlyReport;
use crate::services::{GroupService, PeriodService};
use crate::storage::Storage;

/// Output format for reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Csv,
    Json,
}

impl ReportFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Terminal => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Per-member summary of one month
    Monthly {
        /// Group name or ID
        group: String,

        /// Period (e.g., "2025-01", "last"); defaults to the current month
        #[arg(short = 'P', long)]
        period: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: ReportFormat,

        /// Write to a file; without a path, csv and json go to the exports directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print csv or json to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> SplitResult<()> {
    match cmd {
        ReportCommands::Monthly {
            group,
            period,
            format,
            output,
            stdout,
        } => {
            let group = GroupService::new(storage).require(&group)?;
            let period = PeriodService::new(settings).parse_or_current(period.as_deref())?;
            let report = MonthlyReport::generate(storage, settings, &group, period)?;

            if format == ReportFormat::Terminal && output.is_none() {
                print!("{}", report.format_terminal(settings));
                return Ok(());
            }

            if stdout {
                let handle = io::stdout().lock();
                return match format {
                    ReportFormat::Json => report.export_json(handle),
                    _ => report.export_csv(handle),
                };
            }

            let path = match output {
                Some(path) => path,
                None => storage.paths().export_dir().join(format!(
                    "{}-{}.{}",
                    file_stem(&group.name),
                    period,
                    format.extension()
                )),
            };

            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            let file = File::create(&path).map_err(|e| {
                SplitError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);

            match format {
                ReportFormat::Terminal => {
                    use std::io::Write;
                    writer.write_all(report.format_terminal(settings).as_bytes())?;
                    writer.flush()?;
                }
                ReportFormat::Csv => report.export_csv(&mut writer)?,
                ReportFormat::Json => report.export_json(&mut writer)?,
            }

            println!("Report exported to: {}", path.display());
        }
    }

    Ok(())
}

/// Lowercase file name stem for a group
fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let stem = stem.trim_matches('-');
    if stem.is_empty() {
        "group".to_string()
    } else {
        stem.to_string()
    }
}
