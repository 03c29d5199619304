//! Expense CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_expense_details, format_expense_list};
use crate::error::{SplitError, SplitResult};
use crate::ledger::DateLike;
use crate::models::{MemberId, Money, SharesMap, SplitType};
use crate::services::{ExpenseDraft, ExpenseFilter, ExpenseService, GroupService, PeriodService};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a shared expense
    Add {
        /// Group name or ID
        #[arg(short, long)]
        group: String,
        /// Description
        description: String,
        /// Amount (e.g., "45.50")
        amount: String,
        /// Member who paid
        #[arg(short, long)]
        paid_by: String,
        /// Members sharing the cost, comma separated (default: everyone)
        #[arg(long, value_delimiter = ',')]
        participants: Vec<String>,
        /// Split type (equal or custom; custom when --share or --fill-rest is given)
        #[arg(short, long)]
        split: Option<String>,
        /// Custom share as member=amount (repeatable)
        #[arg(long = "share")]
        shares: Vec<String>,
        /// Split what the shares leave over evenly among participants without one
        #[arg(long)]
        fill_rest: bool,
        /// Expense date (YYYY-MM-DD or RFC 3339)
        #[arg(short, long)]
        date: Option<String>,
        /// Category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one expense and its shares
    Show {
        /// Expense ID
        id: String,
    },
    /// List a group's expenses
    List {
        /// Group name or ID
        #[arg(short, long)]
        group: String,
        /// Period (e.g., "2025-01", "last")
        #[arg(short = 'P', long)]
        period: Option<String>,
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
        /// Filter by payer
        #[arg(long)]
        paid_by: Option<String>,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> SplitResult<()> {
    let groups = GroupService::new(storage);
    let service = ExpenseService::new(storage, settings);

    match cmd {
        ExpenseCommands::Add {
            group,
            description,
            amount,
            paid_by,
            participants,
            split,
            shares,
            fill_rest,
            date,
            category,
        } => {
            let group = groups.require(&group)?;

            let amount = Money::parse(&amount).map_err(|e| {
                SplitError::InvalidAmount(format!("'{}': {}. Use a format like 45.50", amount, e))
            })?;

            let split_type = match split {
                Some(split) => SplitType::parse(&split).ok_or_else(|| {
                    SplitError::Validation(format!(
                        "Unknown split type '{}'. Use 'equal' or 'custom'",
                        split
                    ))
                })?,
                None if fill_rest || !shares.is_empty() => SplitType::Custom,
                None => SplitType::Equal,
            };

            let custom_shares = if shares.is_empty() {
                None
            } else {
                Some(parse_shares(&shares)?)
            };

            let participants = participants
                .iter()
                .filter_map(MemberId::new)
                .collect();

            let draft = ExpenseDraft {
                description,
                amount,
                payer: MemberId::new(&paid_by),
                participants,
                split_type,
                custom_shares,
                fill_remaining: fill_rest,
                date: date.map(DateLike::iso),
                category,
            };

            let expense = service.add(&group, draft)?;

            println!("Recorded expense: {}", expense.description);
            println!("  ID:      {}", expense.id);
            println!("  Amount:  {}", settings.format_money(expense.amount));
            println!("  Paid by: {}", expense.payer);
            println!("  Period:  {}", expense.period);
            for (member, share) in &expense.shares {
                println!("    {:<16} {:>12}", member.as_str(), settings.format_money(*share));
            }
        }

        ExpenseCommands::Show { id } => {
            let doc = service
                .find(&id)?
                .ok_or_else(|| SplitError::expense_not_found(&id))?;
            print!("{}", format_expense_details(&doc, settings));
        }

        ExpenseCommands::List {
            group,
            period,
            category,
            paid_by,
        } => {
            let group = groups.require(&group)?;
            let period = period
                .as_deref()
                .map(|p| PeriodService::new(settings).parse(p))
                .transpose()?;

            let filter = ExpenseFilter {
                period,
                category,
                payer: paid_by.as_deref().and_then(MemberId::new),
            };

            let documents = service.list(&group, &filter)?;
            print!("{}", format_expense_list(&documents, settings));
        }
    }

    Ok(())
}

/// Parse `member=amount` pairs into a shares map
fn parse_shares(raw: &[String]) -> SplitResult<SharesMap> {
    let mut shares = SharesMap::new();

    for pair in raw {
        let (member, amount) = pair.split_once('=').ok_or_else(|| {
            SplitError::Validation(format!("Invalid share '{}'. Use member=amount", pair))
        })?;

        let member = MemberId::new(member).ok_or_else(|| {
            SplitError::Validation(format!("Invalid share '{}': member is blank", pair))
        })?;
        let amount = Money::parse(amount)
            .map_err(|e| SplitError::InvalidAmount(format!("share for {}: {}", member, e)))?;

        if shares.insert(member.clone(), amount).is_some() {
            return Err(SplitError::Validation(format!(
                "Share for '{}' given more than once",
                member
            )));
        }
    }

    Ok(shares)
}
