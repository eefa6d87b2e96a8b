//! Target policy (policy.json) loading and validation.

use std::collections::BTreeSet;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Percentage bounds for one instrument: `min <= target <= max`, all in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PositionBounds {
    pub min_pct: f64,
    pub target_pct: f64,
    pub max_pct: f64,
}

/// One instrument entry as it appears in policy.json.
#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentSpec {
    pub name: String,
    #[serde(flatten)]
    pub bounds: PositionBounds,
}

#[derive(Debug, Clone, Deserialize)]
struct PolicyFile {
    instruments: Vec<InstrumentSpec>,
    #[serde(default)]
    clusters: Vec<Vec<String>>,
}

/// The target policy: per-instrument bounds plus preferred purchase clusters.
///
/// Immutable after construction. Every component takes the policy as an
/// explicit argument rather than reading shared state, so tests can build
/// arbitrary synthetic policies.
#[derive(Debug, Clone)]
pub struct TargetPolicy {
    bounds: FxHashMap<String, PositionBounds>,
    names: Vec<String>, // sorted
    clusters: Vec<BTreeSet<String>>,
}

impl TargetPolicy {
    /// Load and validate a policy.json file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::PolicyRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&contents)
    }

    /// Parse from a JSON string (useful for testing).
    pub fn from_json(json: &str) -> Result<Self> {
        let file: PolicyFile = serde_json::from_str(json)?;
        Self::new(file.instruments, file.clusters)
    }

    /// Build a policy from instrument specs and cluster name lists.
    pub fn new(instruments: Vec<InstrumentSpec>, clusters: Vec<Vec<String>>) -> Result<Self> {
        if instruments.is_empty() {
            return Err(Error::Policy("instrument list is empty".into()));
        }

        let mut bounds = FxHashMap::default();
        for spec in &instruments {
            if spec.name.is_empty() {
                return Err(Error::Policy("empty instrument name".into()));
            }
            let b = spec.bounds;
            for (label, pct) in [
                ("min_pct", b.min_pct),
                ("target_pct", b.target_pct),
                ("max_pct", b.max_pct),
            ] {
                if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
                    return Err(Error::Policy(format!(
                        "{} for {} ({}) is outside [0, 100]",
                        label, spec.name, pct
                    )));
                }
            }
            if b.min_pct > b.target_pct || b.target_pct > b.max_pct {
                return Err(Error::Policy(format!(
                    "bounds for {} must satisfy min <= target <= max (got {}/{}/{})",
                    spec.name, b.min_pct, b.target_pct, b.max_pct
                )));
            }
            if bounds.insert(spec.name.clone(), b).is_some() {
                return Err(Error::Policy(format!("duplicate instrument: {}", spec.name)));
            }
        }

        let mut cluster_sets = Vec::with_capacity(clusters.len());
        for cluster in clusters {
            if cluster.is_empty() {
                return Err(Error::Policy("empty cluster".into()));
            }
            for name in &cluster {
                if !bounds.contains_key(name) {
                    return Err(Error::UnknownInstrument(name.clone()));
                }
            }
            cluster_sets.push(cluster.into_iter().collect::<BTreeSet<String>>());
        }

        let mut names: Vec<String> = bounds.keys().cloned().collect();
        names.sort_unstable();

        Ok(Self {
            bounds,
            names,
            clusters: cluster_sets,
        })
    }

    /// Bounds for the given instrument.
    pub fn bounds(&self, name: &str) -> Result<PositionBounds> {
        self.bounds
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownInstrument(name.to_string()))
    }

    /// All configured instrument names, sorted.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Instruments in sorted-name order with their bounds.
    pub fn instruments(&self) -> impl Iterator<Item = (&str, PositionBounds)> + '_ {
        self.names
            .iter()
            .filter_map(|n| self.bounds.get(n).map(|b| (n.as_str(), *b)))
    }

    /// The configured purchase clusters, as sets of instrument names.
    ///
    /// Used only to bias candidate ranking, never as a hard constraint.
    pub fn preferred_groups(&self) -> &[BTreeSet<String>] {
        &self.clusters
    }

    /// True if the instrument is configured.
    pub fn contains(&self, name: &str) -> bool {
        self.bounds.contains_key(name)
    }

    /// Number of configured instruments.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True if no instruments are configured (never holds for a validated policy).
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
