//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer.

pub mod balance;
pub mod expense;
pub mod group;
pub mod period;
pub mod report;
pub mod settle;

pub use balance::{handle_balance_command, BalanceCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use group::{handle_group_command, GroupCommands};
pub use period::{handle_period_command, PeriodCommands};
pub use report::{handle_report_command, ReportCommands, ReportFormat};
pub use settle::{handle_settle_command, SettleCommands};
