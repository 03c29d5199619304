//! Balance folding
//!
//! Folds a batch of stored expenses into one signed balance per member:
//! positive means the group owes the member, negative means the member owes
//! the group. The payer is credited the full amount and every share holder
//! is debited their share, so balances always sum to zero when every
//! expense's shares add up to its amount.
//!
//! Malformed documents (no positive amount, no payer or no shares map) are
//! skipped. Reporting them is up to the caller; see
//! [`ExpenseDocument::is_well_formed`]. A document whose posting would push
//! any running total out of the `i64` cent range is skipped as well and
//! counted with the malformed ones.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{ExpenseDocument, LedgerEntry, MemberId, Money};

use super::SETTLEMENT_EPSILON;

/// Signed balance per member
pub type BalanceMap = BTreeMap<MemberId, Money>;

/// Aggregate view over a balance map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BalanceSummary {
    /// Sum of positive balances
    pub total_positive: Money,
    /// Sum of the magnitudes of negative balances
    pub total_negative: Money,
    /// Largest amount any single member owes
    pub max_debt: Money,
    /// Largest amount any single member is owed
    pub max_credit: Money,
    /// Every balance is within a cent of zero
    pub is_settled: bool,
}

/// Result of folding a batch of expenses
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BalanceReport {
    /// Net position per member
    pub balances: BalanceMap,
    /// Amount each member paid out
    pub total_by_member: BTreeMap<MemberId, Money>,
    /// Sum of all folded expense amounts
    pub total_expenses: Money,
    pub summary: BalanceSummary,
    /// Number of documents folded
    pub expense_count: usize,
    /// Number of documents skipped as malformed or out of range
    pub skipped_count: usize,
}

/// Fold expense documents into per-member balances
///
/// Every member in `members` appears in the result, even with no activity.
/// Payers and share holders outside `members` are included as they appear.
/// The fold is order-independent: any permutation of `expenses` yields the
/// same report, as long as no document is skipped for overflowing.
pub fn calculate_balances(expenses: &[ExpenseDocument], members: &[MemberId]) -> BalanceReport {
    let mut balances: BalanceMap = members
        .iter()
        .map(|member| (member.clone(), Money::zero()))
        .collect();
    let mut total_by_member = balances.clone();
    let mut total_expenses = Money::zero();
    let mut expense_count = 0;
    let mut skipped_count = 0;

    for document in expenses {
        let posted = document.ledger_entry().is_some_and(|entry| {
            post_entry(&entry, &mut balances, &mut total_by_member, &mut total_expenses)
        });
        if posted {
            expense_count += 1;
        } else {
            skipped_count += 1;
        }
    }

    let summary = summarize_balances(&balances);

    BalanceReport {
        balances,
        total_by_member,
        total_expenses,
        summary,
        expense_count,
        skipped_count,
    }
}

/// Post one entry, or leave every total untouched and return false if any of
/// them would overflow
fn post_entry(
    entry: &LedgerEntry<'_>,
    balances: &mut BalanceMap,
    total_by_member: &mut BTreeMap<MemberId, Money>,
    total_expenses: &mut Money,
) -> bool {
    let current = |member: &MemberId| balances.get(member).copied().unwrap_or_default();

    let mut updated = BalanceMap::new();
    let Some(credited) = current(entry.payer).checked_add(entry.amount) else {
        return false;
    };
    updated.insert(entry.payer.clone(), credited);
    for (member, share) in entry.shares {
        let before = updated.get(member).copied().unwrap_or_else(|| current(member));
        let Some(after) = before.checked_sub(*share) else {
            return false;
        };
        updated.insert(member.clone(), after);
    }

    let paid = total_by_member
        .get(entry.payer)
        .copied()
        .unwrap_or_default()
        .checked_add(entry.amount);
    let (Some(paid), Some(total)) = (paid, total_expenses.checked_add(entry.amount)) else {
        return false;
    };

    balances.extend(updated);
    total_by_member.insert(entry.payer.clone(), paid);
    *total_expenses = total;
    true
}

/// Summarize a balance map
pub fn summarize_balances(balances: &BalanceMap) -> BalanceSummary {
    let mut summary = BalanceSummary {
        is_settled: true,
        ..BalanceSummary::default()
    };

    for balance in balances.values() {
        if balance.is_positive() {
            summary.total_positive = summary.total_positive.saturating_add(*balance);
            summary.max_credit = summary.max_credit.max(*balance);
        } else if balance.is_negative() {
            summary.total_negative = summary.total_negative.saturating_add(balance.abs());
            summary.max_debt = summary.max_debt.max(balance.abs());
        }

        if balance.abs() >= SETTLEMENT_EPSILON {
            summary.is_settled = false;
        }
    }

    summary
}

/// Sum of all balances; zero whenever every folded expense was consistent
pub fn balance_total(balances: &BalanceMap) -> Money {
    balances.values().sum()
}

/// Human-readable status of a single balance
pub fn balance_status(balance: Money) -> &'static str {
    if balance.abs() < SETTLEMENT_EPSILON {
        "Settled"
    } else if balance.is_positive() {
        "To Receive"
    } else {
        "To Pay"
    }
}
