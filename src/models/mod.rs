//! Core data models for SplitIt
//!
//! Groups, expenses and settlements, plus the value types they are built
//! from: money, identifiers and monthly periods.

pub mod expense;
pub mod group;
pub mod ids;
pub mod money;
pub mod period;
pub mod settlement;

pub use expense::{Expense, ExpenseDocument, LedgerEntry, SharesMap, SplitType};
pub use group::{Group, GroupValidationError};
pub use ids::{ExpenseId, GroupId, MemberId, SettlementId};
pub use money::{Money, MoneyParseError};
pub use period::{PeriodBoundaries, PeriodKey, PeriodParseError};
pub use settlement::{Settlement, SettlementRecord, SettlementValidationError};
