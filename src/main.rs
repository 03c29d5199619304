use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use splitit::cli::{
    handle_balance_command, handle_expense_command, handle_group_command, handle_period_command,
    handle_report_command, handle_settle_command, BalanceCommands, ExpenseCommands, GroupCommands,
    PeriodCommands, ReportCommands, SettleCommands,
};
use splitit::config::{paths::SplitPaths, settings::Settings};
use splitit::storage::Storage;

/// Environment variable holding the log filter
const LOG_ENV: &str = "SPLITIT_LOG";

#[derive(Parser)]
#[command(
    name = "splitit",
    version,
    about = "Split shared expenses and settle up",
    long_about = "splitit tracks expenses shared inside a group, works out who owes \
                  whom each month, and suggests the fewest payments that settle \
                  everyone up."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,

    /// Group management commands
    #[command(subcommand)]
    Group(GroupCommands),

    /// Expense commands
    #[command(subcommand, alias = "exp")]
    Expense(ExpenseCommands),

    /// Balance commands
    #[command(subcommand)]
    Balance(BalanceCommands),

    /// Settlement commands
    #[command(subcommand)]
    Settle(SettleCommands),

    /// Report commands
    #[command(subcommand)]
    Report(ReportCommands),

    /// Period helpers
    #[command(subcommand)]
    Period(PeriodCommands),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = SplitPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing splitit at: {}", paths.base_dir().display());
            if splitit::storage::initialize_storage(&paths)? {
                println!("Initialization complete!");
                println!();
                println!("Create a group with 'splitit group create <name> --members a,b,c'.");
            } else {
                println!("Already initialized.");
            }
        }
        Some(Commands::Config) => {
            println!("splitit Configuration");
            println!("=====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!(
                "Initialized:      {}",
                if splitit::storage::init::needs_initialization(&paths) {
                    "no (run 'splitit init')"
                } else {
                    "yes"
                }
            );
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Date format:       {}", settings.date_format);
            println!("  UTC offset:        {} minutes", settings.utc_offset_minutes);
            println!(
                "  Alert threshold:   {}",
                settings.format_money(settings.balance_alert_threshold)
            );
            println!("  Default category:  {}", settings.default_category);
        }
        Some(Commands::Group(cmd)) => handle_group_command(&storage, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Balance(cmd)) => handle_balance_command(&storage, &settings, cmd)?,
        Some(Commands::Settle(cmd)) => handle_settle_command(&storage, &settings, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Period(cmd)) => handle_period_command(&settings, cmd)?,
        None => {
            println!("splitit - shared expenses and settling up");
            println!();
            println!("Run 'splitit --help' for usage information.");
        }
    }

    Ok(())
}
