//! Per-round history rows and table rendering.
//!
//! The planner's history is turned into an ordered sequence of rows, one per
//! completed round plus an optional starting row, and rendered as a
//! fixed-width table. Columns are ordered by descending target percentage so
//! the core holding reads first.

use crate::allocation::Allocation;
use crate::planner::PlanOutcome;
use crate::policy::TargetPolicy;

/// One instrument's cell in a row. `value_cents` is `None` for instruments
/// that have never been held.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionCell {
    pub name: String,
    pub value_cents: Option<i64>,
    pub pct: f64,
}

/// One row of the plan history. `round` is `None` for the starting row; an
/// empty `purchase` renders as the no-buy sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRow {
    pub round: Option<u32>,
    pub purchase: Vec<String>,
    pub cells: Vec<PositionCell>,
}

/// Column order: descending target percentage, then name.
pub fn column_order(policy: &TargetPolicy) -> Vec<String> {
    let mut columns: Vec<(String, f64)> = policy
        .instruments()
        .map(|(name, bounds)| (name.to_string(), bounds.target_pct))
        .collect();
    columns.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    columns.into_iter().map(|(name, _)| name).collect()
}

/// Build the row sequence for a run: a starting row when the run began with
/// holdings, then one row per completed round.
pub fn plan_rows(policy: &TargetPolicy, start: &Allocation, outcome: &PlanOutcome) -> Vec<PlanRow> {
    let columns = column_order(policy);
    let mut rows = Vec::with_capacity(outcome.rounds.len() + 1);

    if !start.is_empty() {
        rows.push(make_row(None, Vec::new(), &columns, start));
    }
    for round in &outcome.rounds {
        rows.push(make_row(
            Some(round.round),
            round.subset.clone(),
            &columns,
            &round.allocation,
        ));
    }
    rows
}

fn make_row(
    round: Option<u32>,
    purchase: Vec<String>,
    columns: &[String],
    allocation: &Allocation,
) -> PlanRow {
    let total = allocation.total();
    let cells = columns
        .iter()
        .map(|name| {
            let value = allocation.get(name);
            PositionCell {
                name: name.clone(),
                value_cents: allocation.contains(name).then_some(value),
                pct: if total > 0 {
                    value as f64 / total as f64 * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect();

    PlanRow {
        round,
        purchase,
        cells,
    }
}

/// Render rows as a fixed-width table. Output is byte-identical for
/// identical inputs.
pub fn render_table(policy: &TargetPolicy, rows: &[PlanRow]) -> String {
    let columns = column_order(policy);

    let mut header: Vec<String> = Vec::with_capacity(columns.len() + 2);
    header.push("round".into());
    header.push("buy".into());
    header.extend(columns.iter().cloned());

    let mut lines: Vec<Vec<String>> = vec![header];
    for row in rows {
        let mut line = Vec::with_capacity(columns.len() + 2);
        line.push(match row.round {
            Some(round) => round.to_string(),
            None => "-".into(),
        });
        line.push(if row.purchase.is_empty() {
            "-".into()
        } else {
            row.purchase.join(", ")
        });
        for cell in &row.cells {
            line.push(match cell.value_cents {
                Some(cents) => format!("${:.2} ({:.2}%)", cents as f64 / 100.0, cell.pct),
                None => "-".into(),
            });
        }
        lines.push(line);
    }

    let width_of = |col: usize| lines.iter().map(|l| l[col].len()).max().unwrap_or(0);
    let widths: Vec<usize> = (0..lines[0].len()).map(width_of).collect();

    let mut out = String::new();
    for line in &lines {
        for (i, cell) in line.iter().enumerate() {
            if i == 0 {
                out.push_str(&format!("{cell:>width$}", width = widths[0]));
            } else {
                out.push_str(&format!("  {cell:<width$}", width = widths[i]));
            }
        }
        while out.ends_with(' ') {
            out.pop();
        }
        out.push('\n');
    }
    out
}
