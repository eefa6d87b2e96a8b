//! Proportional buy engine.
//!
//! Computes the allocation that results from spending a fixed contribution
//! on a chosen subset of instruments. The subset's share of the new total is
//! split in proportion to the members' target percentages, clamped into each
//! member's configured band, and truncated to whole cents.

use crate::allocation::Allocation;
use crate::error::{Error, Result};
use crate::policy::{PositionBounds, TargetPolicy};

/// Buy `amount_cents` worth of the given instruments.
///
/// Returns a new allocation whose total is exactly the old total plus
/// `amount_cents`. Instruments outside `subset` keep their prior value;
/// members of `subset` are recomputed from scratch (their prior value is
/// folded back into the amount being distributed). Any remainder left by
/// truncation or clamping goes to the subset member with the highest target
/// percentage, ties broken by the lexicographically smallest name.
///
/// Clamping keeps each member inside its band whenever the configured bounds
/// are jointly satisfiable for the new total. When they are not, the
/// remainder assignment can push the recipient outside its band; bounds are
/// a ranking score, not a hard constraint, so this is not an error.
pub fn buy(
    policy: &TargetPolicy,
    allocation: &Allocation,
    subset: &[String],
    amount_cents: i64,
) -> Result<Allocation> {
    if amount_cents <= 0 {
        return Err(Error::InvalidBuy(format!(
            "amount must be positive, got {amount_cents}"
        )));
    }
    if subset.is_empty() {
        return Err(Error::InvalidBuy("subset must not be empty".into()));
    }

    // Deterministic iteration order; also drives the remainder tie-break.
    let mut members: Vec<&str> = subset.iter().map(String::as_str).collect();
    members.sort_unstable();
    members.dedup();

    let mut bounds: Vec<(&str, PositionBounds)> = Vec::with_capacity(members.len());
    for &name in &members {
        bounds.push((name, policy.bounds(name)?));
    }

    let total = allocation.total() + amount_cents;
    let fixed: i64 = allocation
        .iter()
        .filter(|(name, _)| !members.contains(name))
        .map(|(_, value)| value)
        .sum();
    let mut free = total - fixed;

    // Ideal subset values at their exact target percentages, then scaled so
    // they sum to `free` while preserving the members' relative weighting.
    let ideal_sum: f64 = bounds
        .iter()
        .map(|(_, b)| b.target_pct / 100.0 * total as f64)
        .sum();
    if ideal_sum <= 0.0 {
        return Err(Error::UntargetedSubset(members.join(", ")));
    }
    let multiplier = free as f64 / ideal_sum;

    let mut result = allocation.clone();
    for (name, b) in &bounds {
        let ideal = b.target_pct / 100.0 * total as f64;
        let mut value = ideal * multiplier;
        value = value.min(b.max_pct / 100.0 * total as f64);
        value = value.max(b.min_pct / 100.0 * total as f64);
        let value = value as i64; // truncate to whole cents
        result.insert(*name, value);
        free -= value;
    }

    if free != 0 {
        let mut recipient = bounds[0].0;
        let mut heaviest = bounds[0].1.target_pct;
        for &(name, b) in &bounds[1..] {
            // strict comparison keeps the lexicographically smallest on ties
            if b.target_pct > heaviest {
                heaviest = b.target_pct;
                recipient = name;
            }
        }
        result.insert(recipient, result.get(recipient) + free);
    }

    Ok(result)
}
