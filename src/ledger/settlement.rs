//! Settlement planning
//!
//! Greedy debt netting: the largest debtor pays the largest creditor as much
//! as either side allows, and the side that reaches zero leaves the table.
//! Not globally optimal, but deterministic and never more than `n - 1`
//! payments for `n` members with a non-zero balance.

use crate::models::{MemberId, Money, Settlement};

use super::balances::BalanceMap;
use super::SETTLEMENT_EPSILON;

/// Plan the payments that bring every balance to zero
///
/// Members within one cent of zero are treated as settled and take no part.
/// Debtors and creditors are each ordered by magnitude, largest first; equal
/// magnitudes keep member-id order.
///
/// # Examples
/// ```
/// use splitit::ledger::{plan_settlements, BalanceMap};
/// use splitit::models::{MemberId, Money};
///
/// let balances: BalanceMap = [
///     (MemberId::from("A"), Money::from_cents(5000)),
///     (MemberId::from("B"), Money::from_cents(-2000)),
///     (MemberId::from("C"), Money::from_cents(-3000)),
/// ]
/// .into_iter()
/// .collect();
///
/// let plan = plan_settlements(&balances);
/// assert_eq!(plan[0].to_string(), "C pays A $30.00");
/// assert_eq!(plan[1].to_string(), "B pays A $20.00");
/// ```
pub fn plan_settlements(balances: &BalanceMap) -> Vec<Settlement> {
    let mut debtors: Vec<(&MemberId, Money)> = balances
        .iter()
        .filter(|(_, balance)| **balance < -SETTLEMENT_EPSILON)
        .map(|(member, balance)| (member, balance.abs()))
        .collect();
    let mut creditors: Vec<(&MemberId, Money)> = balances
        .iter()
        .filter(|(_, balance)| **balance > SETTLEMENT_EPSILON)
        .map(|(member, balance)| (member, *balance))
        .collect();

    // Stable sorts: ties stay in member-id order from the BTreeMap
    debtors.sort_by(|a, b| b.1.cmp(&a.1));
    creditors.sort_by(|a, b| b.1.cmp(&a.1));

    let mut plan = Vec::new();
    let (mut d, mut c) = (0, 0);

    while d < debtors.len() && c < creditors.len() {
        let (debtor, owed) = debtors[d];
        let (creditor, due) = creditors[c];
        let amount = owed.min(due);

        if amount.is_positive() {
            plan.push(Settlement::new(debtor.clone(), creditor.clone(), amount));
        }

        debtors[d].1 -= amount;
        creditors[c].1 -= amount;

        if debtors[d].1 < SETTLEMENT_EPSILON {
            d += 1;
        }
        if creditors[c].1 < SETTLEMENT_EPSILON {
            c += 1;
        }
    }

    plan
}

/// Apply payments to a copy of the balances
///
/// Paying raises the payer's balance and lowers the payee's, so applying a
/// full plan from [`plan_settlements`] leaves every balance within a cent of
/// zero.
pub fn apply_settlements(balances: &BalanceMap, payments: &[Settlement]) -> BalanceMap {
    let mut result = balances.clone();
    for payment in payments {
        let from = result.entry(payment.from.clone()).or_default();
        *from = from.saturating_add(payment.amount);
        let to = result.entry(payment.to.clone()).or_default();
        *to = to.saturating_sub(payment.amount);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(entries: &[(&str, i64)]) -> BalanceMap {
        entries
            .iter()
            .map(|(m, c)| (MemberId::from(*m), Money::from_cents(*c)))
            .collect()
    }

    fn payment(from: &str, to: &str, cents: i64) -> Settlement {
        Settlement::new(MemberId::from(from), MemberId::from(to), Money::from_cents(cents))
    }

    fn assert_all_settled(balances: &BalanceMap) {
        for (member, balance) in balances {
            assert!(
                balance.abs() <= SETTLEMENT_EPSILON,
                "{} left with {}",
                member,
                balance
            );
        }
    }

    #[test]
    fn test_two_debtors_one_creditor() {
        let input = balances(&[("A", 5000), ("B", -2000), ("C", -3000)]);
        let plan = plan_settlements(&input);
        assert_eq!(plan, vec![payment("C", "A", 3000), payment("B", "A", 2000)]);
        assert_all_settled(&apply_settlements(&input, &plan));
    }

    #[test]
    fn test_equal_split_of_one_expense() {
        let input = balances(&[("A", 6667), ("B", -3333), ("C", -3334)]);
        let plan = plan_settlements(&input);
        assert_eq!(plan, vec![payment("C", "A", 3334), payment("B", "A", 3333)]);
        assert_all_settled(&apply_settlements(&input, &plan));
    }

    #[test]
    fn test_all_zero_is_empty_plan() {
        assert!(plan_settlements(&balances(&[("A", 0), ("B", 0)])).is_empty());
        assert!(plan_settlements(&BalanceMap::new()).is_empty());
    }

    #[test]
    fn test_single_pair() {
        let plan = plan_settlements(&balances(&[("A", -1250), ("B", 1250)]));
        assert_eq!(plan, vec![payment("A", "B", 1250)]);
    }

    #[test]
    fn test_sub_cent_noise_is_settled() {
        let plan = plan_settlements(&balances(&[("A", 1), ("B", -1), ("C", 0)]));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_largest_first_chain() {
        let input = balances(&[("A", 7000), ("B", 3000), ("C", -6000), ("D", -4000)]);
        let plan = plan_settlements(&input);
        assert_eq!(
            plan,
            vec![
                payment("C", "A", 6000),
                payment("D", "A", 1000),
                payment("D", "B", 3000),
            ]
        );
        assert!(plan.len() <= input.len() - 1);
        assert_all_settled(&apply_settlements(&input, &plan));
    }

    #[test]
    fn test_ties_follow_member_order() {
        let input = balances(&[("Z", 2000), ("B", -1000), ("A", -1000)]);
        let plan = plan_settlements(&input);
        assert_eq!(plan, vec![payment("A", "Z", 1000), payment("B", "Z", 1000)]);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let input = balances(&[("A", 1234), ("B", -999), ("C", 4321), ("D", -4556)]);
        assert_eq!(plan_settlements(&input), plan_settlements(&input));
    }

    #[test]
    fn test_apply_settlements_adds_missing_members() {
        let result = apply_settlements(&BalanceMap::new(), &[payment("A", "B", 500)]);
        assert_eq!(result[&MemberId::from("A")], Money::from_cents(500));
        assert_eq!(result[&MemberId::from("B")], Money::from_cents(-500));
    }
}
