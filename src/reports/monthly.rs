//! Monthly Report
//!
//! Per-member view of one group's month: what each member paid, what their
//! shares came to, payments made and received, the resulting balance, and
//! the payments still needed to settle up.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

use crate::config::settings::Settings;
use crate::error::{SplitError, SplitResult};
use crate::ledger::balance_status;
use crate::models::money::decimal;
use crate::models::{Group, MemberId, Money, PeriodBoundaries, PeriodKey, Settlement};
use crate::services::BalanceService;
use crate::storage::Storage;

/// One member's line in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberReportRow {
    pub member: MemberId,
    /// Total of the expenses this member paid for
    #[serde(with = "decimal")]
    pub paid: Money,
    /// Total of this member's shares
    #[serde(with = "decimal")]
    pub share: Money,
    /// Recorded payments this member made
    #[serde(with = "decimal")]
    pub settled_out: Money,
    /// Recorded payments this member received
    #[serde(with = "decimal")]
    pub settled_in: Money,
    /// `paid - share + settled_out - settled_in`
    #[serde(with = "decimal")]
    pub balance: Money,
    pub status: &'static str,
}

/// Monthly report for one group
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyReport {
    pub group: String,
    pub period: PeriodKey,
    pub boundaries: PeriodBoundaries,
    pub rows: Vec<MemberReportRow>,
    #[serde(with = "decimal")]
    pub total_expenses: Money,
    pub expense_count: usize,
    pub skipped_count: usize,
    #[serde(with = "decimal")]
    pub total_settled: Money,
    /// Sum of what creditors are still owed
    #[serde(with = "decimal")]
    pub outstanding: Money,
    pub is_settled: bool,
    pub plan: Vec<Settlement>,
}

impl MonthlyReport {
    /// Generate the report for a group and period
    pub fn generate(
        storage: &Storage,
        settings: &Settings,
        group: &Group,
        period: PeriodKey,
    ) -> SplitResult<Self> {
        let balances = BalanceService::new(storage, settings).balances(group, Some(period))?;
        let documents = storage
            .expenses
            .get_by_period(group.id, period, settings.zone())?;

        let mut rows: BTreeMap<MemberId, MemberReportRow> = BTreeMap::new();
        for entry in documents.iter().filter_map(|d| d.ledger_entry()) {
            row_for(&mut rows, entry.payer).paid += entry.amount;
            for (member, share) in entry.shares {
                row_for(&mut rows, member).share += *share;
            }
        }

        let mut total_settled = Money::zero();
        for record in &balances.settlements {
            row_for(&mut rows, &record.payment.from).settled_out += record.payment.amount;
            row_for(&mut rows, &record.payment.to).settled_in += record.payment.amount;
            total_settled += record.payment.amount;
        }

        for (member, balance) in &balances.balances {
            let entry = row_for(&mut rows, member);
            entry.balance = *balance;
            entry.status = balance_status(*balance);
        }

        // Group members first in join order, then anyone else by id
        let mut ordered = Vec::with_capacity(rows.len());
        for member in &group.members {
            if let Some(entry) = rows.remove(member) {
                ordered.push(entry);
            }
        }
        ordered.extend(rows.into_values());

        Ok(Self {
            group: group.name.clone(),
            period,
            boundaries: period.boundaries(),
            rows: ordered,
            total_expenses: balances.expenses.total_expenses,
            expense_count: balances.expenses.expense_count,
            skipped_count: balances.expenses.skipped_count,
            total_settled,
            outstanding: balances.summary.total_positive,
            is_settled: balances.summary.is_settled,
            plan: balances.plan,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, settings: &Settings) -> String {
        let money = |m: Money| settings.format_money(m);
        let mut output = String::new();

        output.push_str(&format!(
            "Monthly Report: {} ({})\n",
            self.group, self.period
        ));
        output.push_str(&"=".repeat(88));
        output.push('\n');
        output.push_str(&format!(
            "Period: {} to {}\n",
            settings.format_date(self.period.start_date()),
            settings.format_date(self.period.end_date())
        ));
        output.push_str(&format!(
            "Total Expenses: {} ({} expenses)\n",
            money(self.total_expenses),
            self.expense_count
        ));
        if self.skipped_count > 0 {
            output.push_str(&format!(
                "Skipped: {} malformed expense(s)\n",
                self.skipped_count
            ));
        }
        output.push_str(&format!("Settled So Far: {}\n\n", money(self.total_settled)));

        output.push_str(&format!(
            "{:<16} {:>11} {:>11} {:>11} {:>11} {:>11}  {}\n",
            "Member", "Paid", "Share", "Sent", "Received", "Balance", "Status"
        ));
        output.push_str(&"-".repeat(88));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<16} {:>11} {:>11} {:>11} {:>11} {:>11}  {}\n",
                row.member.as_str(),
                money(row.paid),
                money(row.share),
                money(row.settled_out),
                money(row.settled_in),
                money(row.balance),
                row.status
            ));
        }

        output.push_str(&"-".repeat(88));
        output.push('\n');

        if self.plan.is_empty() {
            output.push_str("Everyone is settled up.\n");
        } else {
            output.push_str(&format!(
                "To settle {} outstanding:\n",
                money(self.outstanding)
            ));
            for payment in &self.plan {
                output.push_str(&format!(
                    "  {} pays {} {}\n",
                    payment.from,
                    payment.to,
                    money(payment.amount)
                ));
            }
        }

        output
    }

    /// Export the report to CSV format
    ///
    /// One row per member followed by a TOTAL row; amounts are plain
    /// decimals.
    pub fn export_csv<W: Write>(&self, writer: W) -> SplitResult<()> {
        let amount = |m: Money| m.format_with_symbol("");
        let mut out = csv::Writer::from_writer(writer);

        out.write_record([
            "Period", "Group", "Member", "Paid", "Share", "Sent", "Received", "Balance", "Status",
        ])?;

        for row in &self.rows {
            out.write_record([
                self.period.to_string(),
                self.group.clone(),
                row.member.to_string(),
                amount(row.paid),
                amount(row.share),
                amount(row.settled_out),
                amount(row.settled_in),
                amount(row.balance),
                row.status.to_string(),
            ])?;
        }

        let paid: Money = self.rows.iter().map(|r| r.paid).sum();
        let share: Money = self.rows.iter().map(|r| r.share).sum();
        let balance: Money = self.rows.iter().map(|r| r.balance).sum();
        out.write_record([
            self.period.to_string(),
            self.group.clone(),
            "TOTAL".to_string(),
            amount(paid),
            amount(share),
            amount(self.total_settled),
            amount(self.total_settled),
            amount(balance),
            String::new(),
        ])?;

        out.flush()
            .map_err(|e| SplitError::Export(e.to_string()))?;
        Ok(())
    }

    /// Export the report to JSON format
    pub fn export_json<W: Write>(&self, writer: W) -> SplitResult<()> {
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| SplitError::Export(e.to_string()))
    }
}

fn row_for<'r>(
    rows: &'r mut BTreeMap<MemberId, MemberReportRow>,
    member: &MemberId,
) -> &'r mut MemberReportRow {
    rows.entry(member.clone())
        .or_insert_with(|| MemberReportRow {
            member: member.clone(),
            paid: Money::zero(),
            share: Money::zero(),
            settled_out: Money::zero(),
            settled_in: Money::zero(),
            balance: Money::zero(),
            status: balance_status(Money::zero()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SplitPaths;
    use crate::ledger::DateLike;
    use crate::services::{ExpenseDraft, ExpenseService, GroupService};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage, Settings, Group) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SplitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        let settings = Settings::default();
        let group = GroupService::new(&storage)
            .create("Flat", &["B".to_string(), "A".to_string(), "C".to_string()])
            .unwrap();

        let expenses = ExpenseService::new(&storage, &settings);
        for (cents, payer, date) in [(10000, "A", "2025-01-15"), (4550, "B", "2025-01-20")] {
            expenses
                .add(
                    &group,
                    ExpenseDraft {
                        description: "Shared".to_string(),
                        amount: Money::from_cents(cents),
                        payer: Some(MemberId::from(payer)),
                        date: Some(DateLike::iso(date)),
                        ..Default::default()
                    },
                )
                .unwrap();
        }

        (temp_dir, storage, settings, group)
    }

    fn january() -> PeriodKey {
        PeriodKey::new(2025, 1).unwrap()
    }

    #[test]
    fn test_generate() {
        let (_temp_dir, storage, settings, group) = setup();
        let report = MonthlyReport::generate(&storage, &settings, &group, january()).unwrap();

        // Rows follow group join order
        let members: Vec<_> = report.rows.iter().map(|r| r.member.as_str()).collect();
        assert_eq!(members, ["B", "A", "C"]);

        assert_eq!(report.total_expenses, Money::from_cents(14550));
        assert_eq!(report.expense_count, 2);

        for row in &report.rows {
            assert_eq!(
                row.balance,
                row.paid - row.share + row.settled_out - row.settled_in
            );
        }

        let total_share: Money = report.rows.iter().map(|r| r.share).sum();
        assert_eq!(total_share, report.total_expenses);
        assert!(!report.is_settled);
        assert!(!report.plan.is_empty());
    }

    #[test]
    fn test_settlements_appear_in_rows() {
        let (_temp_dir, storage, settings, group) = setup();
        BalanceService::new(&storage, &settings)
            .settle_all(&group, january())
            .unwrap();

        let report = MonthlyReport::generate(&storage, &settings, &group, january()).unwrap();
        assert!(report.is_settled);
        assert!(report.plan.is_empty());
        assert!(report.rows.iter().all(|r| r.status == "Settled"));
        assert!(report.total_settled.is_positive());
        assert!(report.format_terminal(&settings).contains("Everyone is settled up."));
    }

    #[test]
    fn test_export_csv() {
        let (_temp_dir, storage, settings, group) = setup();
        let report = MonthlyReport::generate(&storage, &settings, &group, january()).unwrap();

        let mut buffer = Vec::new();
        report.export_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "Period,Group,Member,Paid,Share,Sent,Received,Balance,Status");
        assert_eq!(lines.len(), 5);
        assert!(lines[4].starts_with("2025-01,Flat,TOTAL,145.50,145.50,"));
        assert!(lines[4].contains(",0.00,"));
    }

    #[test]
    fn test_export_json() {
        let (_temp_dir, storage, settings, group) = setup();
        let report = MonthlyReport::generate(&storage, &settings, &group, january()).unwrap();

        let mut buffer = Vec::new();
        report.export_json(&mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["period"], "2025-01");
        assert_eq!(value["total_expenses"], 145.5);
        assert_eq!(value["rows"].as_array().unwrap().len(), 3);
        assert_eq!(value["boundaries"]["start"], "2025-01-01T00:00:00Z");
    }
}
