// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! # drip-rebalancer
//!
//! Plans fixed periodic contributions toward a target allocation.
//!
//! Each round, every subset of instruments within the configured
//! transaction-count range is bought hypothetically with the round's
//! contribution. Candidates are ranked by bound violations, preferred-cluster
//! membership, transaction count, and distance to target; the winner becomes
//! the next round's starting point. The tool only recommends purchases, it
//! never places trades.
//!
//! ## Quick Start
//!
//! ```
//! use drip_rebalancer::allocation::Allocation;
//! use drip_rebalancer::planner::{PlanParams, plan};
//! use drip_rebalancer::policy::TargetPolicy;
//!
//! let policy = TargetPolicy::from_json(r#"{
//!     "instruments": [
//!         { "name": "world",    "min_pct": 70, "target_pct": 77, "max_pct": 100 },
//!         { "name": "em imi",   "min_pct": 0,  "target_pct": 10, "max_pct": 15 },
//!         { "name": "world sc", "min_pct": 0,  "target_pct": 13, "max_pct": 15 }
//!     ]
//! }"#).unwrap();
//!
//! let params = PlanParams {
//!     contribution_cents: 1000_00,
//!     rounds: 1,
//!     min_transactions: 3,
//!     max_transactions: Some(3),
//! };
//! let outcome = plan(&policy, &Allocation::new(), &params).unwrap();
//!
//! let round = &outcome.rounds[0];
//! assert_eq!(round.validity, 0);
//! assert_eq!(round.allocation.get("world"), 770_00);
//! ```
//!
//! ## Value Representation
//!
//! Holdings are stored as [`i64`] in the smallest currency unit (cents);
//! percentage bounds are `f64` in `[0, 100]`. Every buy conserves value
//! exactly: the resulting total equals the prior total plus the
//! contribution.

pub mod allocation;
pub mod audit;
pub mod candidates;
pub mod config;
pub mod engine;
pub mod error;
pub mod planner;
pub mod policy;
pub mod report;
pub mod runner;
pub mod scoring;
