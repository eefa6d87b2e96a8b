//! Round-by-round contribution planner.
//!
//! Each round buys the configured contribution hypothetically for every
//! candidate subset, ranks the results, and carries the winner into the next
//! round. Ranking is lexicographic: fewest bound violations first, then
//! preferred-cluster membership, then fewest simultaneous transactions, then
//! distance to target.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use log::{error, warn};

use crate::allocation::Allocation;
use crate::candidates;
use crate::engine;
use crate::error::{Error, Result};
use crate::policy::TargetPolicy;
use crate::scoring;

/// Parameters for a planning run.
#[derive(Debug, Clone)]
pub struct PlanParams {
    /// Contribution invested each round, in cents.
    pub contribution_cents: i64,
    /// Number of rounds to plan.
    pub rounds: u32,
    /// Smallest subset of instruments to consider buying at once.
    pub min_transactions: usize,
    /// Largest subset to consider; `None` means all configured instruments.
    pub max_transactions: Option<usize>,
}

/// One completed round.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    /// 1-based round index.
    pub round: u32,
    /// The instruments bought, sorted by name.
    pub subset: Vec<String>,
    /// The allocation after the buy.
    pub allocation: Allocation,
    /// Bound violations in the resulting allocation (0 = fully compliant).
    pub validity: u32,
    /// Euclidean distance of the resulting allocation from target.
    pub distance: f64,
}

/// The history of a planning run.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// Completed rounds, in order.
    pub rounds: Vec<RoundOutcome>,
    /// Set when the loop stopped early because the selected allocation was
    /// identical to the round's input; holds the round that stalled.
    pub stalled_at: Option<u32>,
}

impl PlanOutcome {
    /// The allocation after the last completed round.
    pub fn final_allocation(&self) -> Option<&Allocation> {
        self.rounds.last().map(|r| &r.allocation)
    }

    /// Rounds whose best candidate still violated a bound.
    pub fn infeasible_rounds(&self) -> Vec<u32> {
        self.rounds
            .iter()
            .filter(|r| r.validity > 0)
            .map(|r| r.round)
            .collect()
    }
}

/// Ranking key for one candidate; lower compares better.
#[derive(Debug, Clone, Copy)]
struct RankKey {
    validity: u32,
    outside_group: bool,
    size: usize,
    distance: f64,
}

impl RankKey {
    /// Strictly better than `other`. Equal keys keep the earlier candidate,
    /// so enumeration order is the final tie-break.
    fn beats(&self, other: &RankKey) -> bool {
        (self.validity, self.outside_group, self.size)
            .cmp(&(other.validity, other.outside_group, other.size))
            .then_with(|| self.distance.total_cmp(&other.distance))
            == Ordering::Less
    }
}

/// True if `subset` (sorted, deduplicated) equals one of the preferred groups.
fn is_preferred(groups: &[BTreeSet<String>], subset: &[String]) -> bool {
    groups
        .iter()
        .any(|g| g.len() == subset.len() && g.iter().zip(subset).all(|(a, b)| a == b))
}

/// Plan `params.rounds` contribution rounds starting from `start`.
///
/// Instruments held in `start` must all be configured in the policy; an
/// unknown name aborts before any round runs. A round whose best candidate
/// still violates a bound is logged and kept (bounds are a preference, not a
/// constraint). A stalled round stops the loop early; the completed rounds
/// are still returned.
pub fn plan(policy: &TargetPolicy, start: &Allocation, params: &PlanParams) -> Result<PlanOutcome> {
    for (name, _) in start.iter() {
        policy.bounds(name)?;
    }
    if params.contribution_cents <= 0 {
        return Err(Error::Config("contribution must be positive".into()));
    }
    if params.min_transactions == 0 {
        return Err(Error::Config("min_transactions must be at least 1".into()));
    }
    let max_transactions = params.max_transactions.unwrap_or(policy.len());
    if max_transactions < params.min_transactions {
        return Err(Error::Config(
            "max_transactions must not be below min_transactions".into(),
        ));
    }

    let subsets = candidates::subsets(policy.names(), params.min_transactions, max_transactions);
    if subsets.is_empty() {
        return Err(Error::Config(
            "transaction range admits no candidate subsets".into(),
        ));
    }

    let groups = policy.preferred_groups();
    let mut current = start.clone();
    let mut rounds = Vec::with_capacity(params.rounds as usize);
    let mut stalled_at = None;

    for round in 1..=params.rounds {
        let mut best: Option<(RankKey, &Vec<String>, Allocation)> = None;

        for subset in &subsets {
            let candidate = match engine::buy(policy, &current, subset, params.contribution_cents) {
                Ok(a) => a,
                // A subset with no target weight has no proportional split.
                Err(Error::UntargetedSubset(_)) => continue,
                Err(e) => return Err(e),
            };

            let key = RankKey {
                validity: scoring::validity_score(policy, &candidate)?,
                outside_group: !is_preferred(groups, subset),
                size: subset.len(),
                distance: scoring::distance(policy, &candidate)?,
            };

            let better = match &best {
                None => true,
                Some((incumbent, _, _)) => key.beats(incumbent),
            };
            if better {
                best = Some((key, subset, candidate));
            }
        }

        let (key, subset, chosen) = best.ok_or_else(|| {
            Error::Config("transaction range admits no usable candidate subsets".into())
        })?;

        if key.validity > 0 {
            warn!(
                "round {round}: no fully compliant choice, best candidate has {} bound violation(s)",
                key.validity
            );
        }

        if chosen == current {
            error!("round {round}: selected allocation is unchanged, stopping early");
            stalled_at = Some(round);
            break;
        }

        rounds.push(RoundOutcome {
            round,
            subset: subset.clone(),
            allocation: chosen.clone(),
            validity: key.validity,
            distance: key.distance,
        });
        current = chosen;
    }

    Ok(PlanOutcome { rounds, stalled_at })
}
