//! Balance service
//!
//! Computes a group's balances for a period from stored expenses and
//! recorded payments, plans the payments that settle them, and records
//! payments as they are made.

use serde::Serialize;

use crate::config::settings::Settings;
use crate::error::{SplitError, SplitResult};
use crate::ledger::{
    apply_settlements, calculate_balances, plan_settlements, summarize_balances, BalanceMap,
    BalanceReport, BalanceSummary, SETTLEMENT_EPSILON,
};
use crate::models::{Group, MemberId, Money, PeriodKey, Settlement, SettlementRecord};
use crate::storage::Storage;

/// Balances of one group, for one period or for all time
#[derive(Debug, Clone, Serialize)]
pub struct GroupBalances {
    /// `None` when every period is included
    pub period: Option<PeriodKey>,
    /// The expense fold, before recorded payments
    pub expenses: BalanceReport,
    /// Payments already made
    pub settlements: Vec<SettlementRecord>,
    /// Net positions after recorded payments
    pub balances: BalanceMap,
    pub summary: BalanceSummary,
    /// Payments still needed
    pub plan: Vec<Settlement>,
}

impl GroupBalances {
    /// Balance of one member, zero if they have no activity
    pub fn balance_of(&self, member: &MemberId) -> Money {
        self.balances.get(member).copied().unwrap_or_default()
    }
}

/// A member whose balance reached the alert threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceAlert {
    pub member: MemberId,
    pub balance: Money,
}

/// Service for balance computation and settlement
pub struct BalanceService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> BalanceService<'a> {
    /// Create a new balance service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Compute balances for a group
    ///
    /// Malformed expense documents are left out of the computation and
    /// logged.
    pub fn balances(&self, group: &Group, period: Option<PeriodKey>) -> SplitResult<GroupBalances> {
        let documents = match period {
            Some(period) => {
                self.storage
                    .expenses
                    .get_by_period(group.id, period, self.settings.zone())?
            }
            None => self.storage.expenses.get_by_group(group.id)?,
        };

        let mut malformed = 0;
        for document in documents.iter().filter(|d| !d.is_well_formed()) {
            malformed += 1;
            tracing::warn!(
                expense = %document.label(),
                group = %group.name,
                "skipping malformed expense: needs a positive amount, a payer and shares"
            );
        }

        let expenses = calculate_balances(&documents, &group.members);
        if expenses.skipped_count > malformed {
            tracing::warn!(
                group = %group.name,
                skipped = expenses.skipped_count - malformed,
                "skipping expenses whose amounts overflow the group totals"
            );
        }

        let settlements = match period {
            Some(period) => self.storage.settlements.get_by_period(group.id, period)?,
            None => self.storage.settlements.get_by_group(group.id)?,
        };
        let payments: Vec<Settlement> = settlements.iter().map(|s| s.payment.clone()).collect();

        let balances = apply_settlements(&expenses.balances, &payments);
        let summary = summarize_balances(&balances);
        let plan = plan_settlements(&balances);

        tracing::debug!(
            group = %group.name,
            expenses = expenses.expense_count,
            skipped = expenses.skipped_count,
            payments = payments.len(),
            planned = plan.len(),
            "computed balances"
        );

        Ok(GroupBalances {
            period,
            expenses,
            settlements,
            balances,
            summary,
            plan,
        })
    }

    /// Members whose absolute balance reaches the configured threshold
    ///
    /// Largest balances first; ties in member order.
    pub fn alerts(
        &self,
        group: &Group,
        period: Option<PeriodKey>,
    ) -> SplitResult<Vec<BalanceAlert>> {
        let threshold = self.settings.balance_alert_threshold.max(SETTLEMENT_EPSILON);
        let balances = self.balances(group, period)?;

        let mut alerts: Vec<_> = balances
            .balances
            .into_iter()
            .filter(|(_, balance)| balance.abs() >= threshold)
            .map(|(member, balance)| BalanceAlert { member, balance })
            .collect();
        alerts.sort_by(|a, b| b.balance.abs().cmp(&a.balance.abs()));

        Ok(alerts)
    }

    /// Record a payment made between two members
    pub fn record_settlement(
        &self,
        group: &Group,
        period: PeriodKey,
        payment: Settlement,
        note: Option<String>,
    ) -> SplitResult<SettlementRecord> {
        for member in [&payment.from, &payment.to] {
            if !group.has_member(member) {
                return Err(SplitError::member_not_found(format!(
                    "{} (in {})",
                    member, group.name
                )));
            }
        }

        let mut record = SettlementRecord::new(group.id, period, payment);
        record.note = note.unwrap_or_default();
        record
            .validate()
            .map_err(|e| SplitError::Validation(e.to_string()))?;

        let owed = -self.balances(group, Some(period))?.balance_of(&record.payment.from);
        if record.payment.amount > owed {
            tracing::warn!(
                from = %record.payment.from,
                amount = %record.payment.amount,
                owed = %owed,
                "payment exceeds what the member owes"
            );
        }

        self.storage.settlements.insert(record.clone())?;
        self.storage.settlements.save()?;

        tracing::info!(
            settlement = %record.id,
            payment = %record.payment,
            period = %period,
            "recorded settlement"
        );

        Ok(record)
    }

    /// Record every payment of the current plan
    pub fn settle_all(
        &self,
        group: &Group,
        period: PeriodKey,
    ) -> SplitResult<Vec<SettlementRecord>> {
        let plan = self.balances(group, Some(period))?.plan;
        let mut records = Vec::with_capacity(plan.len());
        for payment in plan {
            records.push(self.record_settlement(group, period, payment, None)?);
        }
        Ok(records)
    }

    /// Payments recorded for a group
    pub fn settlements(
        &self,
        group: &Group,
        period: Option<PeriodKey>,
    ) -> SplitResult<Vec<SettlementRecord>> {
        match period {
            Some(period) => self.storage.settlements.get_by_period(group.id, period),
            None => self.storage.settlements.get_by_group(group.id),
        }
    }
}
