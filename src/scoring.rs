//! Validity and distance scoring against the target policy.

use crate::allocation::Allocation;
use crate::error::{Error, Result};
use crate::policy::TargetPolicy;

/// Count of bound violations across held instruments. Zero means every held
/// instrument sits within its configured band.
///
/// Only instruments present in the allocation are scored; a configured
/// instrument that has never been bought does not count against its minimum.
/// An allocation with zero total has no percentages and is rejected rather
/// than letting NaN leak into ranking.
pub fn validity_score(policy: &TargetPolicy, allocation: &Allocation) -> Result<u32> {
    let total = allocation.total();
    if total == 0 {
        return Err(Error::EmptyAllocation);
    }

    let mut violations = 0;
    for (name, value) in allocation.iter() {
        let bounds = policy.bounds(name)?;
        let pct = value as f64 / total as f64 * 100.0;
        // min <= target <= max, so at most one side can be violated
        if pct < bounds.min_pct || pct > bounds.max_pct {
            violations += 1;
        }
    }
    Ok(violations)
}

/// Euclidean distance between the allocation's percentages and the target
/// percentages, over every configured instrument (absent instruments count
/// as 0%). Lower is better; zero means an exact match.
pub fn distance(policy: &TargetPolicy, allocation: &Allocation) -> Result<f64> {
    let total = allocation.total();
    if total == 0 {
        return Err(Error::EmptyAllocation);
    }

    let mut sum_sq = 0.0_f64;
    for (name, bounds) in policy.instruments() {
        let pct = allocation.get(name) as f64 / total as f64 * 100.0;
        let diff = bounds.target_pct - pct;
        sum_sq += diff * diff;
    }
    Ok(sum_sq.sqrt())
}
