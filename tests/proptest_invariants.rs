// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! Property-based tests for buy-engine invariants.
//!
//! These tests use proptest to verify the conservation and clamping
//! guarantees across randomly generated allocations, subsets, and amounts.

use drip_rebalancer::allocation::Allocation;
use drip_rebalancer::engine::buy;
use drip_rebalancer::policy::{InstrumentSpec, PositionBounds, TargetPolicy};
use drip_rebalancer::scoring::validity_score;
use proptest::prelude::*;

const NAMES: [&str; 4] = ["bonds", "core", "gold", "small"];

fn spec(name: &str, min: f64, tgt: f64, max: f64) -> InstrumentSpec {
    InstrumentSpec {
        name: name.into(),
        bounds: PositionBounds {
            min_pct: min,
            target_pct: tgt,
            max_pct: max,
        },
    }
}

/// Jointly satisfiable bounds: minimums sum to 40, maximums to 155,
/// targets to exactly 100.
fn policy() -> TargetPolicy {
    TargetPolicy::new(
        vec![
            spec("core", 40.0, 60.0, 80.0),
            spec("bonds", 0.0, 20.0, 30.0),
            spec("gold", 0.0, 10.0, 20.0),
            spec("small", 0.0, 10.0, 25.0),
        ],
        vec![],
    )
    .unwrap()
}

/// Generate holdings for the four instruments (cents; zero = not held).
fn values_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..=1_000_000_00, 4)
}

/// Generate a non-empty subset of the four instruments as a bitmask.
fn mask_strategy() -> impl Strategy<Value = usize> {
    1usize..16
}

fn allocation_from(values: &[i64]) -> Allocation {
    Allocation::from_cents(
        NAMES
            .iter()
            .zip(values)
            .filter(|(_, v)| **v > 0)
            .map(|(n, v)| (*n, *v)),
    )
}

fn subset_from(mask: usize) -> Vec<String> {
    NAMES
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, n)| n.to_string())
        .collect()
}

/// The subset member that receives the rounding remainder: highest target
/// percentage, ties broken by the lexicographically smallest name.
fn remainder_recipient(policy: &TargetPolicy, subset: &[String]) -> String {
    let mut sorted = subset.to_vec();
    sorted.sort_unstable();
    let mut recipient = sorted[0].clone();
    let mut heaviest = policy.bounds(&recipient).unwrap().target_pct;
    for name in &sorted[1..] {
        let tgt = policy.bounds(name).unwrap().target_pct;
        if tgt > heaviest {
            heaviest = tgt;
            recipient = name.clone();
        }
    }
    recipient
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Value is conserved: the new total is the old total plus the amount.
    #[test]
    fn mass_conservation(
        values in values_strategy(),
        mask in mask_strategy(),
        amount in 1i64..=1_000_000_00,
    ) {
        let policy = policy();
        let start = allocation_from(&values);
        let subset = subset_from(mask);

        let result = buy(&policy, &start, &subset, amount).unwrap();

        prop_assert_eq!(
            result.total(),
            start.total() + amount,
            "total not conserved: {} + {} != {}",
            start.total(), amount, result.total()
        );
    }

    /// Instruments outside the subset keep their prior value exactly.
    #[test]
    fn untouched_instruments_unchanged(
        values in values_strategy(),
        mask in mask_strategy(),
        amount in 1i64..=1_000_000_00,
    ) {
        let policy = policy();
        let start = allocation_from(&values);
        let subset = subset_from(mask);

        let result = buy(&policy, &start, &subset, amount).unwrap();

        for name in NAMES {
            if !subset.iter().any(|s| s == name) {
                prop_assert_eq!(result.get(name), start.get(name), "{} changed", name);
            }
        }
    }

    /// Every subset member except the remainder recipient lands inside its
    /// band (in whole cents of the new total).
    #[test]
    fn clamping_holds_for_non_recipients(
        values in values_strategy(),
        mask in mask_strategy(),
        amount in 1i64..=1_000_000_00,
    ) {
        let policy = policy();
        let start = allocation_from(&values);
        let subset = subset_from(mask);

        let result = buy(&policy, &start, &subset, amount).unwrap();
        let total = result.total();
        let recipient = remainder_recipient(&policy, &subset);

        for name in &subset {
            if *name == recipient {
                continue;
            }
            let bounds = policy.bounds(name).unwrap();
            let floor_min = (bounds.min_pct / 100.0 * total as f64) as i64;
            let floor_max = (bounds.max_pct / 100.0 * total as f64) as i64;
            let value = result.get(name);
            prop_assert!(
                (floor_min..=floor_max).contains(&value),
                "{} = {} outside [{}, {}] of total {}",
                name, value, floor_min, floor_max, total
            );
        }
    }

    /// Buying the full instrument set always lands on target (targets sum
    /// to 100%), so the result is fully compliant for any sizeable amount.
    #[test]
    fn full_buy_is_always_compliant(
        values in values_strategy(),
        amount in 100_00i64..=1_000_000_00,
    ) {
        let policy = policy();
        let start = allocation_from(&values);
        let subset: Vec<String> = NAMES.iter().map(|n| n.to_string()).collect();

        let result = buy(&policy, &start, &subset, amount).unwrap();

        prop_assert_eq!(validity_score(&policy, &result).unwrap(), 0);
    }
}
