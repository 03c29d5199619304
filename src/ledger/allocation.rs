//! Share allocation
//!
//! Turns an expense total and a set of participants into a validated map of
//! per-member shares, either split equally or taken from caller-supplied
//! custom amounts.
//!
//! Participants are processed in the order given, with duplicates dropped
//! after their first occurrence. When a total does not divide evenly, every
//! participant gets the floored share and the *last* participant in that
//! order absorbs the leftover cents.

use crate::error::{SplitError, SplitResult};
use crate::models::{MemberId, Money, SharesMap, SplitType};

use super::SETTLEMENT_EPSILON;

/// Compute the shares of a new expense
///
/// # Errors
///
/// - [`SplitError::InvalidAmount`] if `total` is not positive
/// - [`SplitError::EmptyParticipantSet`] if nobody is selected
/// - [`SplitError::UnknownParticipant`] if a custom share names a non-participant
/// - [`SplitError::NegativeShare`] if a custom share is below zero
/// - [`SplitError::ShareMismatch`] if custom shares miss the total by more than a cent
///
/// # Examples
/// ```
/// use splitit::ledger::allocate_shares;
/// use splitit::models::{MemberId, Money, SplitType};
///
/// let people = [MemberId::from("a"), MemberId::from("b"), MemberId::from("c")];
/// let total = Money::from_cents(10000);
/// let shares = allocate_shares(total, &people, SplitType::Equal, None).unwrap();
/// assert_eq!(shares[&people[2]], Money::from_cents(3334));
/// ```
pub fn allocate_shares(
    total: Money,
    participants: &[MemberId],
    split_type: SplitType,
    custom_shares: Option<&SharesMap>,
) -> SplitResult<SharesMap> {
    if !total.is_positive() {
        return Err(SplitError::InvalidAmount(format!(
            "expense total must be positive, got {}",
            total
        )));
    }

    let participants = ordered_participants(participants);
    if participants.is_empty() {
        return Err(SplitError::EmptyParticipantSet);
    }

    match split_type {
        SplitType::Equal => Ok(split_evenly(total, &participants)),
        SplitType::Custom => {
            let empty = SharesMap::new();
            validate_custom_shares(total, &participants, custom_shares.unwrap_or(&empty))
        }
    }
}

/// Spread the unallocated part of `total` over participants without a share
///
/// A participant counts as unfilled when their entry is missing or zero. The
/// remainder is split evenly among the unfilled ones in participant order,
/// the last unfilled participant taking the leftover cents. With nothing
/// left to allocate, or nobody unfilled, the shares come back unchanged.
pub fn redistribute_remainder(
    existing: &SharesMap,
    participants: &[MemberId],
    total: Money,
) -> SharesMap {
    let remaining = total - shares_total(existing);
    let unfilled: Vec<&MemberId> = ordered_participants(participants)
        .into_iter()
        .filter(|member| existing.get(*member).map_or(true, Money::is_zero))
        .collect();

    if !remaining.is_positive() || unfilled.is_empty() {
        return existing.clone();
    }

    let mut shares = existing.clone();
    shares.extend(split_evenly(remaining, &unfilled));
    shares
}

/// Sum of all shares in a map
pub fn shares_total(shares: &SharesMap) -> Money {
    shares.values().sum()
}

/// Check that shares add up to `expected` within one cent
pub fn check_shares_sum(shares: &SharesMap, expected: Money) -> SplitResult<()> {
    let sum = shares_total(shares);
    if (sum - expected).abs() > SETTLEMENT_EPSILON {
        return Err(SplitError::ShareMismatch { sum, expected });
    }
    Ok(())
}

/// Equal split over a non-empty, duplicate-free participant list
fn split_evenly(total: Money, participants: &[&MemberId]) -> SharesMap {
    let count = participants.len() as i64;
    // Floor division: callers only split positive amounts
    let share = Money::from_cents(total.cents().div_euclid(count));
    let last_share = total - share * (count - 1);

    let mut shares = SharesMap::new();
    for (index, member) in participants.iter().enumerate() {
        let amount = if index as i64 == count - 1 {
            last_share
        } else {
            share
        };
        shares.insert((*member).clone(), amount);
    }
    shares
}

fn validate_custom_shares(
    total: Money,
    participants: &[&MemberId],
    custom: &SharesMap,
) -> SplitResult<SharesMap> {
    let mut shares = SharesMap::new();

    for (member, amount) in custom {
        if !participants.contains(&member) {
            return Err(SplitError::UnknownParticipant(member.clone()));
        }
        if amount.is_negative() {
            return Err(SplitError::NegativeShare {
                member: member.clone(),
                amount: *amount,
            });
        }
    }

    for member in participants {
        let amount = custom.get(*member).copied().unwrap_or_default();
        shares.insert((*member).clone(), amount);
    }

    check_shares_sum(&shares, total)?;
    Ok(shares)
}

/// Participants in first-seen order, duplicates removed
fn ordered_participants(participants: &[MemberId]) -> Vec<&MemberId> {
    let mut ordered: Vec<&MemberId> = Vec::with_capacity(participants.len());
    for member in participants {
        if !ordered.contains(&member) {
            ordered.push(member);
        }
    }
    ordered
}
