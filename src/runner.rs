//! Run orchestration: load inputs, plan, report, audit.
//!
//! This is the workflow behind each CLI subcommand; the planner itself stays
//! pure and everything with a side effect happens here.

use std::path::{Path, PathBuf};

use log::info;

use crate::allocation::Allocation;
use crate::audit::{self, AuditLog};
use crate::config::Config;
use crate::error::Result;
use crate::planner::{self, PlanParams};
use crate::policy::TargetPolicy;
use crate::report;
use crate::scoring;

/// Options for a planning run.
pub struct PlanOptions {
    pub holdings: Option<PathBuf>,
    pub rounds: Option<u32>,
    pub contribution: Option<f64>,
    pub policy_file: String,
}

/// Execute a full planning run: plan, print the history table, audit.
pub fn run_plan(config: &Config, policy: &TargetPolicy, opts: &PlanOptions) -> Result<()> {
    let start = match &opts.holdings {
        Some(path) => Allocation::load(path)?,
        None => Allocation::new(),
    };

    let params = PlanParams {
        contribution_cents: opts
            .contribution
            .map_or(config.contribution_cents(), |c| (c * 100.0).round() as i64),
        rounds: opts.rounds.unwrap_or(config.plan.rounds),
        min_transactions: config.search.min_transactions,
        max_transactions: config.search.max_transactions,
    };

    let mut audit = AuditLog::open(&config.audit_path())?;
    audit::log_run_started(
        &mut audit,
        &opts.policy_file,
        params.rounds,
        params.contribution_cents,
    )?;
    if !start.is_empty() {
        audit::log_starting_allocation(&mut audit, &start)?;
    }

    let outcome = planner::plan(policy, &start, &params)?;

    for round in &outcome.rounds {
        audit::log_round(&mut audit, round)?;
        if round.validity > 0 {
            audit::log_infeasible_round(&mut audit, round.round, round.validity)?;
        }
    }
    if let Some(round) = outcome.stalled_at {
        audit::log_stall(&mut audit, round)?;
    }
    audit::log_run_completed(&mut audit, outcome.rounds.len(), outcome.stalled_at.is_some())?;

    let rows = report::plan_rows(policy, &start, &outcome);
    print!("{}", report::render_table(policy, &rows));

    if let Some(round) = outcome.stalled_at {
        println!("\nStopped early at round {round}: allocation unchanged.");
    }
    let infeasible = outcome.infeasible_rounds();
    if !infeasible.is_empty() {
        println!(
            "\n{} round(s) had no fully compliant choice.",
            infeasible.len()
        );
    }

    info!(
        "planned {} round(s), audit logged to {}",
        outcome.rounds.len(),
        config.audit_path().display()
    );
    Ok(())
}

/// Score a holdings snapshot against a policy.
pub fn run_score(policy: &TargetPolicy, holdings: &Path) -> Result<()> {
    let allocation = Allocation::load(holdings)?;
    let validity = scoring::validity_score(policy, &allocation)?;
    let dist = scoring::distance(policy, &allocation)?;

    println!("Total:    ${:.2}", allocation.total() as f64 / 100.0);
    println!("Validity: {validity} bound violation(s)");
    println!("Distance: {dist:.4}");
    Ok(())
}

/// Validate a policy file and report its shape.
pub fn run_check(policy_path: &Path) -> Result<()> {
    let policy = TargetPolicy::load(policy_path)?;
    println!(
        "Policy OK: {} instrument(s), {} cluster(s)",
        policy.len(),
        policy.preferred_groups().len()
    );
    Ok(())
}
