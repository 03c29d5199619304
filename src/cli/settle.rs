//! Settlement CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_plan, format_settlement_records};
use crate::error::{SplitError, SplitResult};
use crate::models::{MemberId, Money, Settlement};
use crate::services::{BalanceService, GroupService, PeriodService};
use crate::storage::Storage;

use super::balance::period_scope;

/// Settle subcommands
#[derive(Subcommand)]
pub enum SettleCommands {
    /// Show the payments that would settle the group
    Plan {
        /// Group name or ID
        group: String,
        /// Period (e.g., "2025-01", "last"); defaults to the current month
        #[arg(short = 'P', long, conflicts_with = "all")]
        period: Option<String>,
        /// Include every period
        #[arg(short, long)]
        all: bool,
    },
    /// Record a payment between two members
    Record {
        /// Group name or ID
        group: String,
        /// Member who paid
        #[arg(long)]
        from: Option<String>,
        /// Member who received
        #[arg(long)]
        to: Option<String>,
        /// Amount paid
        #[arg(long)]
        amount: Option<String>,
        /// Record every payment of the current plan instead
        #[arg(long, conflicts_with_all = ["from", "to", "amount"])]
        all: bool,
        /// Period the payment settles; defaults to the current month
        #[arg(short = 'P', long)]
        period: Option<String>,
        /// Note
        #[arg(short, long)]
        note: Option<String>,
    },
    /// List recorded payments
    List {
        /// Group name or ID
        group: String,
        /// Period (e.g., "2025-01", "last"); defaults to every period
        #[arg(short = 'P', long)]
        period: Option<String>,
    },
}

/// Handle a settle command
pub fn handle_settle_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SettleCommands,
) -> SplitResult<()> {
    let groups = GroupService::new(storage);
    let service = BalanceService::new(storage, settings);
    let periods = PeriodService::new(settings);

    match cmd {
        SettleCommands::Plan { group, period, all } => {
            let group = groups.require(&group)?;
            let period = period_scope(settings, period.as_deref(), all)?;
            let result = service.balances(&group, period)?;
            print!("{}", format_plan(&result.plan, settings));
        }

        SettleCommands::Record {
            group,
            from,
            to,
            amount,
            all,
            period,
            note,
        } => {
            let group = groups.require(&group)?;
            let period = periods.parse_or_current(period.as_deref())?;

            if all {
                let records = service.settle_all(&group, period)?;
                if records.is_empty() {
                    println!("Nothing to settle for {} in {}.", group.name, period);
                } else {
                    println!("Recorded {} payment(s):", records.len());
                    for record in &records {
                        println!(
                            "  {} pays {} {}",
                            record.payment.from,
                            record.payment.to,
                            settings.format_money(record.payment.amount)
                        );
                    }
                }
                return Ok(());
            }

            let (from, to, amount) = match (from, to, amount) {
                (Some(from), Some(to), Some(amount)) => (from, to, amount),
                _ => {
                    return Err(SplitError::Validation(
                        "Provide --from, --to and --amount, or --all".into(),
                    ))
                }
            };

            let amount = Money::parse(&amount)
                .map_err(|e| SplitError::InvalidAmount(format!("'{}': {}", amount, e)))?;
            let from = MemberId::new(&from)
                .ok_or_else(|| SplitError::Validation("--from cannot be blank".into()))?;
            let to = MemberId::new(&to)
                .ok_or_else(|| SplitError::Validation("--to cannot be blank".into()))?;

            let record =
                service.record_settlement(&group, period, Settlement::new(from, to, amount), note)?;
            println!("Recorded payment: {}", record.payment);
            println!("  ID:     {}", record.id);
            println!("  Period: {}", record.period);
        }

        SettleCommands::List { group, period } => {
            let group = groups.require(&group)?;
            let period = period
                .as_deref()
                .map(|p| periods.parse(p))
                .transpose()?;
            let records = service.settlements(&group, period)?;
            print!("{}", format_settlement_records(&records, settings));
        }
    }

    Ok(())
}
