// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! Planner benchmarks: candidate search and round loop.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use drip_rebalancer::allocation::Allocation;
use drip_rebalancer::planner::{PlanParams, plan};
use drip_rebalancer::policy::{InstrumentSpec, PositionBounds, TargetPolicy};

/// A policy with one core holding and `n - 1` satellites splitting the rest.
fn synthetic_policy(n: usize) -> TargetPolicy {
    let mut instruments = Vec::with_capacity(n);
    instruments.push(InstrumentSpec {
        name: "core".into(),
        bounds: PositionBounds {
            min_pct: 40.0,
            target_pct: 50.0,
            max_pct: 100.0,
        },
    });
    let slice = 50.0 / (n - 1) as f64;
    for i in 1..n {
        instruments.push(InstrumentSpec {
            name: format!("sat{i:02}"),
            bounds: PositionBounds {
                min_pct: 0.0,
                target_pct: slice,
                max_pct: 100.0,
            },
        });
    }
    TargetPolicy::new(instruments, vec![]).unwrap()
}

/// Benchmark: 12 planning rounds at increasing instrument counts, searching
/// singles and pairs.
fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("planner/plan");

    for &n in &[4usize, 8, 12] {
        let policy = synthetic_policy(n);
        let params = PlanParams {
            contribution_cents: 1000_00,
            rounds: 12,
            min_transactions: 1,
            max_transactions: Some(2),
        };

        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| black_box(plan(&policy, &Allocation::new(), &params).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plan);
criterion_main!(benches);
