//! JSONL audit trail logging.
//!
//! Each planning run appends events to an audit.jsonl file, one JSON object
//! per line, so recommendations stay reviewable after the fact.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::allocation::Allocation;
use crate::error::Result;
use crate::planner::RoundOutcome;

/// An audit event written to the JSONL trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit logger.
pub struct AuditLog {
    writer: BufWriter<std::fs::File>,
}

impl AuditLog {
    /// Open (or create) the audit log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Log an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Log a simple event with no additional data.
    pub fn log_simple(&mut self, event: &'static str) -> Result<()> {
        self.log(event, serde_json::json!({}))
    }
}

fn allocation_json(allocation: &Allocation) -> serde_json::Value {
    let positions: Vec<_> = allocation
        .sorted()
        .into_iter()
        .map(|(name, cents)| {
            serde_json::json!({
                "name": name,
                "value": cents as f64 / 100.0,
            })
        })
        .collect();
    serde_json::json!({
        "positions": positions,
        "total": allocation.total() as f64 / 100.0,
    })
}

/// Convenience: log a run start event.
pub fn log_run_started(
    audit: &mut AuditLog,
    policy_file: &str,
    rounds: u32,
    contribution_cents: i64,
) -> Result<()> {
    audit.log(
        "run_started",
        serde_json::json!({
            "policy_file": policy_file,
            "rounds": rounds,
            "contribution": contribution_cents as f64 / 100.0,
        }),
    )
}

/// Convenience: log the starting allocation.
pub fn log_starting_allocation(audit: &mut AuditLog, allocation: &Allocation) -> Result<()> {
    audit.log("starting_allocation", allocation_json(allocation))
}

/// Convenience: log one planned round.
pub fn log_round(audit: &mut AuditLog, round: &RoundOutcome) -> Result<()> {
    let mut data = allocation_json(&round.allocation);
    if let serde_json::Value::Object(map) = &mut data {
        map.insert("round".into(), round.round.into());
        map.insert("buy".into(), round.subset.join(", ").into());
        map.insert("validity".into(), round.validity.into());
        map.insert("distance".into(), round.distance.into());
    }
    audit.log("round_planned", data)
}

/// Convenience: log a round whose best candidate still violated a bound.
pub fn log_infeasible_round(audit: &mut AuditLog, round: u32, validity: u32) -> Result<()> {
    audit.log(
        "infeasible_round",
        serde_json::json!({
            "round": round,
            "violations": validity,
        }),
    )
}

/// Convenience: log an early stop on an unchanged allocation.
pub fn log_stall(audit: &mut AuditLog, round: u32) -> Result<()> {
    audit.log("stall_detected", serde_json::json!({ "round": round }))
}

/// Convenience: log run completion.
pub fn log_run_completed(audit: &mut AuditLog, completed: usize, stalled: bool) -> Result<()> {
    audit.log(
        "run_completed",
        serde_json::json!({
            "rounds_completed": completed,
            "stalled": stalled,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audit_log_writes_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_audit.jsonl");

        {
            let mut log = AuditLog::open(&path).unwrap();
            log.log_simple("test_event").unwrap();
            log.log("test_data", serde_json::json!({"key": "value"}))
                .unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        // Each line should be valid JSON
        for line in &lines {
            let _: serde_json::Value = serde_json::from_str(line).unwrap();
        }

        assert!(lines[0].contains("\"event\":\"test_event\""));
    }

    #[test]
    fn audit_log_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subdir").join("deep").join("audit.jsonl");

        let mut log = AuditLog::open(&path).unwrap();
        log.log_simple("test").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn round_event_carries_positions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        let round = RoundOutcome {
            round: 1,
            subset: vec!["world".into()],
            allocation: Allocation::from_cents([("world", 1000_00)]),
            validity: 0,
            distance: 28.6,
        };

        {
            let mut log = AuditLog::open(&path).unwrap();
            log_round(&mut log, &round).unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
        assert_eq!(value["event"], "round_planned");
        assert_eq!(value["round"], 1);
        assert_eq!(value["buy"], "world");
        assert_eq!(value["total"], 1000.0);
    }
}
