//! Balance CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_alerts, format_group_balances};
use crate::error::SplitResult;
use crate::models::PeriodKey;
use crate::services::{BalanceService, GroupService, PeriodService};
use crate::storage::Storage;

/// Balance subcommands
#[derive(Subcommand)]
pub enum BalanceCommands {
    /// Show who owes whom
    Show {
        /// Group name or ID
        group: String,
        /// Period (e.g., "2025-01", "last"); defaults to the current month
        #[arg(short = 'P', long, conflicts_with = "all")]
        period: Option<String>,
        /// Include every period
        #[arg(short, long)]
        all: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List members whose balance reached the alert threshold
    Alerts {
        /// Group name or ID
        group: String,
        /// Period (e.g., "2025-01", "last"); defaults to the current month
        #[arg(short = 'P', long, conflicts_with = "all")]
        period: Option<String>,
        /// Include every period
        #[arg(short, long)]
        all: bool,
    },
}

/// Handle a balance command
pub fn handle_balance_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BalanceCommands,
) -> SplitResult<()> {
    let groups = GroupService::new(storage);
    let service = BalanceService::new(storage, settings);

    match cmd {
        BalanceCommands::Show {
            group,
            period,
            all,
            json,
        } => {
            let group = groups.require(&group)?;
            let period = period_scope(settings, period.as_deref(), all)?;
            let result = service.balances(&group, period)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", format_group_balances(&group.name, &result, settings));
            }
        }

        BalanceCommands::Alerts { group, period, all } => {
            let group = groups.require(&group)?;
            let period = period_scope(settings, period.as_deref(), all)?;
            let alerts = service.alerts(&group, period)?;
            print!("{}", format_alerts(&alerts, settings));
        }
    }

    Ok(())
}

/// `None` for all time, otherwise the requested or current period
pub(crate) fn period_scope(
    settings: &Settings,
    period: Option<&str>,
    all: bool,
) -> SplitResult<Option<PeriodKey>> {
    if all {
        return Ok(None);
    }
    PeriodService::new(settings).parse_or_current(period).map(Some)
}
