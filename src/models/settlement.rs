//! Settlement models
//!
//! A [`Settlement`] is one recommended payment produced by the planner. A
//! [`SettlementRecord`] is a payment somebody actually made, stored so the
//! balances of its period account for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, MemberId, SettlementId};
use super::money::{decimal, Money};
use super::period::PeriodKey;

/// A single debtor-to-creditor payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// The member paying (debtor)
    pub from: MemberId,
    /// The member being paid (creditor)
    pub to: MemberId,
    /// Always positive
    #[serde(with = "decimal")]
    pub amount: Money,
}

impl Settlement {
    /// Create a new settlement
    pub fn new(from: MemberId, to: MemberId, amount: Money) -> Self {
        Self { from, to, amount }
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pays {} {}", self.from, self.to, self.amount)
    }
}

/// A payment that was actually made between two members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// Unique identifier
    pub id: SettlementId,

    /// The group the payment settles debts in
    pub group_id: GroupId,

    /// The period whose balances the payment applies to
    pub period: PeriodKey,

    /// The payment itself
    #[serde(flatten)]
    pub payment: Settlement,

    /// Free-form note
    #[serde(default)]
    pub note: String,

    /// When the payment was recorded
    pub recorded_at: DateTime<Utc>,
}

impl SettlementRecord {
    /// Create a record for a payment made now
    pub fn new(group_id: GroupId, period: PeriodKey, payment: Settlement) -> Self {
        Self {
            id: SettlementId::new(),
            group_id,
            period,
            payment,
            note: String::new(),
            recorded_at: Utc::now(),
        }
    }

    /// Validate the record
    pub fn validate(&self) -> Result<(), SettlementValidationError> {
        if !self.payment.amount.is_positive() {
            return Err(SettlementValidationError::NonPositiveAmount(
                self.payment.amount,
            ));
        }
        if self.payment.from == self.payment.to {
            return Err(SettlementValidationError::SelfPayment(
                self.payment.from.clone(),
            ));
        }
        Ok(())
    }
}

/// Validation errors for settlement records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementValidationError {
    NonPositiveAmount(Money),
    SelfPayment(MemberId),
}

impl fmt::Display for SettlementValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Settlement amount must be positive, got {}", amount)
            }
            Self::SelfPayment(member) => write!(f, "'{}' cannot pay themselves", member),
        }
    }
}

impl std::error::Error for SettlementValidationError {}
