//! Expense models
//!
//! [`Expense`] is a validated expense as produced by the expense-entry flow.
//! [`ExpenseDocument`] is the stored shape: every field is optional so that a
//! hand-edited or half-written record still loads, and balance computation
//! can exclude it instead of failing the whole batch.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::ids::{ExpenseId, GroupId, MemberId};
use super::money::{decimal, Money};
use super::period::PeriodKey;
use crate::ledger::DateLike;

/// Per-member shares of one expense
pub type SharesMap = BTreeMap<MemberId, Money>;

/// How an expense is divided between participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    /// Equal shares, last participant absorbs the rounding remainder
    #[default]
    Equal,
    /// Explicit per-member amounts
    Custom,
}

impl SplitType {
    /// Parse a split type from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "equal" | "equally" | "even" => Some(Self::Equal),
            "custom" | "exact" => Some(Self::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "equal"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// A validated, immutable expense
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub group_id: GroupId,
    pub description: String,
    pub amount: Money,
    pub payer: MemberId,
    pub shares: SharesMap,
    pub split_type: SplitType,
    /// Noon on the expense day, in the zone the date was given in
    pub expense_date: DateTime<FixedOffset>,
    pub period: PeriodKey,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Total of all shares
    pub fn shares_total(&self) -> Money {
        self.shares.values().sum()
    }
}

impl From<&Expense> for ExpenseDocument {
    fn from(expense: &Expense) -> Self {
        Self {
            id: Some(expense.id),
            group_id: Some(expense.group_id),
            description: expense.description.clone(),
            amount: Some(expense.amount),
            payer: Some(expense.payer.clone()),
            shares: Some(expense.shares.clone()),
            split_type: expense.split_type,
            expense_date: Some(DateLike::Native(expense.expense_date)),
            period: Some(expense.period),
            category: expense.category.clone(),
            created_at: Some(expense.created_at),
        }
    }
}

/// An expense as stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDocument {
    #[serde(default)]
    pub id: Option<ExpenseId>,

    #[serde(default)]
    pub group_id: Option<GroupId>,

    #[serde(default)]
    pub description: String,

    #[serde(default, with = "decimal::option")]
    pub amount: Option<Money>,

    #[serde(default, alias = "paid_by")]
    pub payer: Option<MemberId>,

    #[serde(default, with = "decimal_shares")]
    pub shares: Option<SharesMap>,

    #[serde(default)]
    pub split_type: SplitType,

    #[serde(default)]
    pub expense_date: Option<DateLike>,

    #[serde(default)]
    pub period: Option<PeriodKey>,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The parts of a stored expense that move balances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerEntry<'a> {
    pub amount: Money,
    pub payer: &'a MemberId,
    pub shares: &'a SharesMap,
}

impl ExpenseDocument {
    /// The balance-relevant fields, or `None` if the document is malformed
    ///
    /// Well-formed means: a positive amount, a non-blank payer and a shares
    /// map (which may be empty).
    pub fn ledger_entry(&self) -> Option<LedgerEntry<'_>> {
        let amount = self.amount.filter(Money::is_positive)?;
        let payer = self.payer.as_ref().filter(|p| !p.is_blank())?;
        let shares = self.shares.as_ref()?;
        Some(LedgerEntry {
            amount,
            payer,
            shares,
        })
    }

    /// Whether balance computation will use this document
    pub fn is_well_formed(&self) -> bool {
        self.ledger_entry().is_some()
    }

    /// Short label for log lines and listings
    pub fn label(&self) -> String {
        match (&self.id, self.description.trim()) {
            (Some(id), "") => id.to_string(),
            (Some(id), desc) => format!("{} ({})", id, desc),
            (None, "") => "<unidentified expense>".to_string(),
            (None, desc) => desc.to_string(),
        }
    }
}

/// Shares stored as decimal numbers; values that are not numbers are dropped
mod decimal_shares {
    use super::{MemberId, Money, SharesMap};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        shares: &Option<SharesMap>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        shares
            .as_ref()
            .map(|map| {
                map.iter()
                    .map(|(member, amount)| (member.clone(), amount.to_decimal()))
                    .collect::<BTreeMap<MemberId, f64>>()
            })
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<SharesMap>, D::Error> {
        let raw = Option::<BTreeMap<MemberId, serde_json::Value>>::deserialize(deserializer)?;
        Ok(raw.map(|map| {
            map.into_iter()
                .filter_map(|(member, value)| {
                    let amount = value.as_f64().and_then(Money::from_decimal)?;
                    Some((member, amount))
                })
                .collect()
        }))
    }
}
