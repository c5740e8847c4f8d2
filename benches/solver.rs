//! Benchmarks for the calendar puzzle solver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;

use blocker::board::Configuration;
use blocker::geometry::distinct_orientations;
use blocker::pieces::{PlacementTable, PIECES};
use blocker::solver::solve;

/// Benchmark solving a single configuration end to end, including building
/// the placement table.
fn bench_solve(c: &mut Criterion) {
    let config = Configuration::new(2, 29, 6).unwrap();

    c.bench_function("solve_configuration", |b| {
        b.iter(|| {
            let table = PlacementTable::build();
            let mut rng = rand::rngs::StdRng::seed_from_u64(1);
            solve(black_box(config.target()), &table, &mut rng)
        })
    });
}

/// Benchmark computing every distinct orientation for a single piece.
fn bench_orientations(c: &mut Criterion) {
    let piece = PIECES[3].cells; // piece with no internal symmetry

    c.bench_function("distinct_orientations", |b| {
        b.iter(|| distinct_orientations(black_box(piece)))
    });
}

/// Benchmark building the full placement table once, reused across a sweep.
fn bench_placement_table(c: &mut Criterion) {
    c.bench_function("placement_table_build", |b| b.iter(PlacementTable::build));
}

criterion_group!(benches, bench_solve, bench_orientations, bench_placement_table);
criterion_main!(benches);
