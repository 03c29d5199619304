//! Balance and settlement display formatting
//!
//! Renders balance maps, settlement plans and recorded payments as tables.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::config::settings::Settings;
use crate::ledger::{balance_status, BalanceMap};
use crate::models::{Settlement, SettlementRecord};
use crate::services::{BalanceAlert, GroupBalances};

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "Member")]
    member: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

#[derive(Tabled)]
struct PaymentRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Note")]
    note: String,
}

/// Format a balance map as a table
pub fn format_balance_table(balances: &BalanceMap, settings: &Settings) -> String {
    if balances.is_empty() {
        return "No balances.\n".to_string();
    }

    let rows = balances.iter().map(|(member, balance)| BalanceRow {
        member: member.to_string(),
        balance: settings.format_money(*balance),
        status: balance_status(*balance),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::single(1)).with(Alignment::right()));
    format!("{}\n", table)
}

/// Format a settlement plan
pub fn format_plan(plan: &[Settlement], settings: &Settings) -> String {
    if plan.is_empty() {
        return "Everyone is settled up.\n".to_string();
    }

    let rows = plan.iter().enumerate().map(|(i, payment)| PaymentRow {
        index: i + 1,
        from: payment.from.to_string(),
        to: payment.to.to_string(),
        amount: settings.format_money(payment.amount),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::single(3)).with(Alignment::right()));
    format!("{}\n", table)
}

/// Format balances, summary and plan together
pub fn format_group_balances(
    group_name: &str,
    result: &GroupBalances,
    settings: &Settings,
) -> String {
    let mut output = String::new();

    let scope = result
        .period
        .map(|p| p.to_string())
        .unwrap_or_else(|| "all time".to_string());
    output.push_str(&format!("Balances: {} ({})\n\n", group_name, scope));
    output.push_str(&format_balance_table(&result.balances, settings));

    output.push('\n');
    output.push_str(&format!(
        "Expenses: {} totalling {}",
        result.expenses.expense_count,
        settings.format_money(result.expenses.total_expenses)
    ));
    if result.expenses.skipped_count > 0 {
        output.push_str(&format!(
            " ({} malformed skipped)",
            result.expenses.skipped_count
        ));
    }
    output.push('\n');
    if !result.settlements.is_empty() {
        output.push_str(&format!(
            "Payments recorded: {}\n",
            result.settlements.len()
        ));
    }
    output.push_str(&format!(
        "Outstanding: {}   Largest debt: {}   Largest credit: {}\n\n",
        settings.format_money(result.summary.total_positive),
        settings.format_money(result.summary.max_debt),
        settings.format_money(result.summary.max_credit)
    ));

    output.push_str(&format_plan(&result.plan, settings));
    output
}

/// Format recorded payments
pub fn format_settlement_records(records: &[SettlementRecord], settings: &Settings) -> String {
    if records.is_empty() {
        return "No payments recorded.\n".to_string();
    }

    let rows = records.iter().map(|record| RecordRow {
        id: record.id.to_string(),
        date: settings.format_date(
            record
                .recorded_at
                .with_timezone(&settings.zone())
                .date_naive(),
        ),
        period: record.period.to_string(),
        from: record.payment.from.to_string(),
        to: record.payment.to.to_string(),
        amount: settings.format_money(record.payment.amount),
        note: record.note.clone(),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::single(5)).with(Alignment::right()));
    format!("{}\n", table)
}

/// Format balance alerts
pub fn format_alerts(alerts: &[BalanceAlert], settings: &Settings) -> String {
    if alerts.is_empty() {
        return format!(
            "No balances at or above {}.\n",
            settings.format_money(settings.balance_alert_threshold)
        );
    }

    let mut output = String::new();
    for alert in alerts {
        let direction = if alert.balance.is_negative() {
            "owes"
        } else {
            "is owed"
        };
        output.push_str(&format!(
            "! {} {} {}\n",
            alert.member,
            direction,
            settings.format_money(alert.balance.abs())
        ));
    }
    output
}
