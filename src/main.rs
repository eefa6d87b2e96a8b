//! CLI entry point for the contribution planner.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use drip_rebalancer::config::Config;
use drip_rebalancer::policy::TargetPolicy;
use drip_rebalancer::runner::{self, PlanOptions};

#[derive(Parser)]
#[command(name = "drip-rebalancer")]
#[command(about = "Plans periodic contributions toward a target allocation")]
#[command(version)]
struct Cli {
    /// Path to config.toml
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Plan contribution rounds and print the allocation history
    Plan {
        /// Path to policy.json
        policy: PathBuf,

        /// Path to current holdings JSON (defaults to an empty allocation)
        #[arg(long)]
        holdings: Option<PathBuf>,

        /// Override the configured round count
        #[arg(long)]
        rounds: Option<u32>,

        /// Override the configured per-round contribution (currency units)
        #[arg(long)]
        contribution: Option<f64>,
    },

    /// Score a holdings snapshot against a policy
    Score {
        /// Path to policy.json
        policy: PathBuf,

        /// Path to holdings JSON
        holdings: PathBuf,
    },

    /// Validate a policy file
    Check {
        /// Path to policy.json
        policy: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Plan {
            policy,
            holdings,
            rounds,
            contribution,
        } => {
            let config = match Config::load(&cli.config) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error loading config: {e}");
                    process::exit(1);
                }
            };
            let spec = match TargetPolicy::load(&policy) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error loading policy: {e}");
                    process::exit(1);
                }
            };
            let opts = PlanOptions {
                holdings,
                rounds,
                contribution,
                policy_file: policy.display().to_string(),
            };
            runner::run_plan(&config, &spec, &opts)
        }
        Command::Score { policy, holdings } => {
            let spec = match TargetPolicy::load(&policy) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error loading policy: {e}");
                    process::exit(1);
                }
            };
            runner::run_score(&spec, &holdings)
        }
        Command::Check { policy } => runner::run_check(&policy),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
