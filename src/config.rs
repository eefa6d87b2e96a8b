//! TOML configuration loading and validation.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub plan: PlanSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanSettings {
    /// Contribution invested each round, in currency units.
    #[serde(default = "default_contribution")]
    pub contribution: f64,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            contribution: default_contribution(),
            rounds: default_rounds(),
        }
    }
}

fn default_contribution() -> f64 {
    1000.0
}
fn default_rounds() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    /// Smallest number of instruments to buy at once.
    #[serde(default = "default_min_transactions")]
    pub min_transactions: usize,
    /// Largest number of instruments to buy at once; omitted means all
    /// configured instruments.
    #[serde(default)]
    pub max_transactions: Option<usize>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_transactions: default_min_transactions(),
            max_transactions: None,
        }
    }
}

fn default_min_transactions() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_dir")]
    pub dir: String,
    #[serde(default = "default_audit_file")]
    pub audit_file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: default_log_dir(),
            audit_file: default_audit_file(),
        }
    }
}

fn default_log_dir() -> String {
    "./logs".into()
}
fn default_audit_file() -> String {
    "audit.jsonl".into()
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        if !self.plan.contribution.is_finite() || self.plan.contribution <= 0.0 {
            return Err(Error::Config("contribution must be > 0".into()));
        }
        if self.plan.rounds == 0 {
            return Err(Error::Config("rounds must be >= 1".into()));
        }
        if self.search.min_transactions == 0 {
            return Err(Error::Config("min_transactions must be >= 1".into()));
        }
        if let Some(max) = self.search.max_transactions {
            if max < self.search.min_transactions {
                return Err(Error::Config(
                    "max_transactions must be >= min_transactions".into(),
                ));
            }
        }
        Ok(())
    }

    /// Per-round contribution in cents.
    pub fn contribution_cents(&self) -> i64 {
        (self.plan.contribution * 100.0).round() as i64
    }

    /// Full path to the audit log file.
    pub fn audit_path(&self) -> std::path::PathBuf {
        Path::new(&self.logging.dir).join(&self.logging.audit_file)
    }
}
