//! Service layer for SplitIt
//!
//! Business logic on top of the storage layer. Services validate input and
//! log; the pure computations live in [`crate::ledger`].

pub mod balance;
pub mod expense;
pub mod group;
pub mod period;

pub use balance::{BalanceAlert, BalanceService, GroupBalances};
pub use expense::{ExpenseDraft, ExpenseFilter, ExpenseService};
pub use group::GroupService;
pub use period::PeriodService;
