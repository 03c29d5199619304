//! Balance and settlement engine
//!
//! Pure computations over expenses and balances: share allocation, period
//! keying, balance folding and settlement planning. Nothing here touches
//! storage or the clock except [`period_key_of`], which falls back to the
//! current month for dates it cannot resolve.

pub mod allocation;
pub mod balances;
pub mod period;
pub mod settlement;

use crate::models::Money;

/// Amounts closer than this to zero count as settled
pub const SETTLEMENT_EPSILON: Money = Money::from_cents(1);

pub use allocation::{allocate_shares, check_shares_sum, redistribute_remainder, shares_total};
pub use balances::{
    balance_status, balance_total, calculate_balances, summarize_balances, BalanceMap,
    BalanceReport, BalanceSummary,
};
pub use period::{
    lookup_period_key, noon_on, noon_stays_on_utc_day, period_boundaries, period_key_of,
    try_period_key_of, try_period_key_of_in, utc_zone, DateLike, PeriodLookup,
};
pub use settlement::{apply_settlements, plan_settlements};
