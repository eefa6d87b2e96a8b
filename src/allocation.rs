//! Holdings expressed as integer cents per instrument.

use std::path::Path;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};

/// A mapping of instrument name to held value in cents.
///
/// Instruments absent from the map hold zero. An allocation is never
/// mutated once a planning round has selected it; each round derives a
/// fresh value, so value equality between successive rounds is meaningful.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Allocation {
    values: FxHashMap<String, i64>,
}

impl Allocation {
    /// An empty allocation (nothing held yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an allocation from (name, cents) pairs.
    pub fn from_cents<S: Into<String>>(pairs: impl IntoIterator<Item = (S, i64)>) -> Self {
        Self {
            values: pairs.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        }
    }

    /// Load holdings from a JSON file mapping instrument name to a value in
    /// currency units (e.g. `{"world": 770.0}`). Values are converted to
    /// cents; negative or non-finite values are rejected.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::HoldingsRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&contents)
    }

    /// Parse holdings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: FxHashMap<String, f64> = serde_json::from_str(json)
            .map_err(|e| Error::Holdings(format!("failed to parse holdings JSON: {e}")))?;

        let mut values = FxHashMap::default();
        for (name, amount) in raw {
            if !amount.is_finite() || amount < 0.0 {
                return Err(Error::Holdings(format!(
                    "value for {name} ({amount}) must be a non-negative number"
                )));
            }
            values.insert(name, (amount * 100.0).round() as i64);
        }
        Ok(Self { values })
    }

    /// Held value in cents; zero for instruments not in the map.
    pub fn get(&self, name: &str) -> i64 {
        self.values.get(name).copied().unwrap_or(0)
    }

    /// Set the held value for an instrument.
    pub fn insert(&mut self, name: impl Into<String>, cents: i64) {
        self.values.insert(name.into(), cents);
    }

    /// True if the instrument has an entry (even a zero one).
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Sum of all held values in cents.
    pub fn total(&self) -> i64 {
        self.values.values().sum()
    }

    /// True if nothing is held.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over (name, cents) entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.values.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Entries sorted by name, for deterministic output.
    pub fn sorted(&self) -> Vec<(&str, i64)> {
        let mut entries: Vec<(&str, i64)> = self.iter().collect();
        entries.sort_unstable_by_key(|(n, _)| *n);
        entries
    }
}
