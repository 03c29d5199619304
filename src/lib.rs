//! splitit - shared-expense tracking and settlement
//!
//! Members of a group record the expenses they pay for on behalf of the
//! group. splitit splits each expense into per-member shares, folds the
//! expenses of a month into net balances, and plans the payments that bring
//! every balance back to zero.
//!
//! # Architecture
//!
//! - `ledger`: pure balance, allocation, settlement and period arithmetic
//! - `models`: money, identifiers, groups, expenses and settlements
//! - `config`: paths and user settings
//! - `storage`: JSON file repositories
//! - `services`: validation and orchestration over storage
//! - `reports`: the monthly report and its exports
//! - `display` and `cli`: terminal output and command handlers
//!
//! # Example
//!
//! ```
//! use splitit::ledger::{calculate_balances, plan_settlements};
//! use splitit::models::{ExpenseDocument, MemberId, Money};
//!
//! let members = vec![MemberId::from("A"), MemberId::from("B")];
//! let expense = ExpenseDocument {
//!     amount: Some(Money::from_cents(1000)),
//!     payer: Some(MemberId::from("A")),
//!     shares: Some(
//!         [
//!             (MemberId::from("A"), Money::from_cents(500)),
//!             (MemberId::from("B"), Money::from_cents(500)),
//!         ]
//!         .into_iter()
//!         .collect(),
//!     ),
//!     ..Default::default()
//! };
//!
//! let report = calculate_balances(&[expense], &members);
//! let plan = plan_settlements(&report.balances);
//! assert_eq!(plan[0].to_string(), "B pays A $5.00");
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod ledger;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{SplitError, SplitResult};
