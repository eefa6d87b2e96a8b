//! Error types for the planner.

use std::path::PathBuf;

/// All errors that can occur while loading inputs or planning rounds.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("policy error: {0}")]
    Policy(String),

    #[error("failed to read policy file {path}: {source}")]
    PolicyRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse policy JSON: {0}")]
    PolicyParse(#[from] serde_json::Error),

    #[error("holdings error: {0}")]
    Holdings(String),

    #[error("failed to read holdings file {path}: {source}")]
    HoldingsRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("allocation has zero total value, no percentages defined")]
    EmptyAllocation,

    #[error("subset [{0}] has zero combined target weight")]
    UntargetedSubset(String),

    #[error("invalid buy: {0}")]
    InvalidBuy(String),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
