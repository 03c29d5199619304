//! Display formatting for terminal output
//!
//! Formats groups, expenses, balances and settlements for the terminal.

pub mod balance;
pub mod expense;
pub mod group;

pub use balance::{
    format_alerts, format_balance_table, format_group_balances, format_plan,
    format_settlement_records,
};
pub use expense::{format_expense_details, format_expense_list};
pub use group::{format_group_details, format_group_list};

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
