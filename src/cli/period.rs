//! Period CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::SplitResult;
use crate::ledger::DateLike;
use crate::services::PeriodService;

/// Period subcommands
#[derive(Subcommand)]
pub enum PeriodCommands {
    /// Show the period a date belongs to
    Key {
        /// Date (YYYY-MM-DD or RFC 3339)
        date: String,
    },
    /// Show the start and end of a period
    Bounds {
        /// Period (e.g., "2025-01", "last"); defaults to the current month
        period: Option<String>,
    },
}

/// Handle a period command
pub fn handle_period_command(settings: &Settings, cmd: PeriodCommands) -> SplitResult<()> {
    let service = PeriodService::new(settings);

    match cmd {
        PeriodCommands::Key { date } => {
            let lookup = service.key_of(&DateLike::iso(date.trim()));
            if lookup.is_fallback() {
                println!("{} (date not recognised, using today's period)", lookup.key());
            } else {
                println!("{}", lookup.key());
            }
        }

        PeriodCommands::Bounds { period } => {
            let period = service.parse_or_current(period.as_deref())?;
            let bounds = period.boundaries();
            let marker = if service.is_current(&period) {
                " (current)"
            } else {
                ""
            };
            println!("{}{}", service.format_period_friendly(&period), marker);
            println!("  Start: {}", bounds.start.to_rfc3339());
            println!("  End:   {}", bounds.end.to_rfc3339());
        }
    }

    Ok(())
}
