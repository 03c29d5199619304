//! Reports module for SplitIt
//!
//! Period reports over a group's expenses and payments, printable in the
//! terminal and exportable to CSV or JSON.

pub mod monthly;

pub use monthly::{MemberReportRow, MonthlyReport};
