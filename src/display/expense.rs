//! Expense display formatting

use crate::config::settings::Settings;
use crate::ledger::DateLike;
use crate::models::ExpenseDocument;

use super::truncate;

/// Format one stored expense as a list row
pub fn format_expense_row(doc: &ExpenseDocument, settings: &Settings) -> String {
    let date = doc
        .expense_date
        .as_ref()
        .map(|d| format_date_like(d, settings))
        .unwrap_or_else(|| "?".to_string());
    let amount = doc
        .amount
        .map(|a| settings.format_money(a))
        .unwrap_or_else(|| "-".to_string());
    let payer = doc
        .payer
        .as_ref()
        .map(|p| p.to_string())
        .unwrap_or_else(|| "(none)".to_string());
    let flag = if doc.is_well_formed() { " " } else { "!" };

    format!(
        "{} {:<10} {:<24} {:<12} {:>12}  {:<8} {}",
        flag,
        date,
        truncate(&doc.description, 24),
        truncate(&payer, 12),
        amount,
        doc.split_type,
        doc.category
    )
}

/// Format a list of stored expenses
pub fn format_expense_list(docs: &[ExpenseDocument], settings: &Settings) -> String {
    if docs.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "  {:<10} {:<24} {:<12} {:>12}  {:<8} {}\n",
        "Date", "Description", "Paid By", "Amount", "Split", "Category"
    ));
    output.push_str(&"-".repeat(84));
    output.push('\n');

    for doc in docs {
        output.push_str(&format_expense_row(doc, settings));
        output.push('\n');
    }

    let skipped = docs.iter().filter(|d| !d.is_well_formed()).count();
    if skipped > 0 {
        output.push_str(&format!(
            "\n! {} malformed expense(s) are left out of balances\n",
            skipped
        ));
    }

    output
}

/// Format the shares of one expense
pub fn format_expense_details(doc: &ExpenseDocument, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense: {}\n", doc.label()));
    if let Some(amount) = doc.amount {
        output.push_str(&format!("  Amount:   {}\n", settings.format_money(amount)));
    }
    if let Some(payer) = &doc.payer {
        output.push_str(&format!("  Paid by:  {}\n", payer));
    }
    if let Some(period) = doc.period {
        output.push_str(&format!("  Period:   {}\n", period));
    }
    output.push_str(&format!("  Split:    {}\n", doc.split_type));
    if let Some(shares) = &doc.shares {
        output.push_str("  Shares:\n");
        for (member, share) in shares {
            output.push_str(&format!(
                "    {:<16} {:>12}\n",
                member.as_str(),
                settings.format_money(*share)
            ));
        }
    }

    output
}

fn format_date_like(date: &DateLike, settings: &Settings) -> String {
    match date.resolve(settings.zone()) {
        Ok((day, _)) => settings.format_date(day),
        Err(_) => truncate(&date.to_string(), 10),
    }
}
