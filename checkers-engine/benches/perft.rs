use std::thread::available_parallelism;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use checkers_engine::perft::*;
use checkers_engine::*;

/// Expected node counts from the start position, indexed by ply.
const START_NODES: [u64; 9] = [1, 7, 49, 302, 1_469, 7_361, 36_768, 179_740, 845_931];

pub fn criterion_perft_small_benchmark(c: &mut Criterion) {
    // Setup
    let starting_position = Position::start_position();
    let num_threads = available_parallelism()
        .map(|inner| inner.get())
        .unwrap_or(1);

    // Benchmarks
    for ply in [2u8, 4, 6] {
        let expected = START_NODES[ply as usize];

        c.bench_function(&format!("start_position: perft({ply}) threads: 1"), |b| {
            b.iter(|| {
                let info = perft(black_box(starting_position), black_box(ply), black_box(1));
                assert_eq!(info.nodes, expected);
            })
        });
        c.bench_function(
            &format!("start_position: perft({ply}) threads: {num_threads}"),
            |b| {
                b.iter(|| {
                    let info = perft(
                        black_box(starting_position),
                        black_box(ply),
                        black_box(num_threads),
                    );
                    assert_eq!(info.nodes, expected);
                })
            },
        );
    }
}

/// Close to a million leaf positions.
pub fn criterion_perft_large_benchmark(c: &mut Criterion) {
    // Setup
    let starting_position = Position::start_position();
    let num_threads = available_parallelism()
        .map(|inner| inner.get())
        .unwrap_or(1);

    c.bench_function(
        &format!("start_position: perft(8) threads: {num_threads}"),
        |b| {
            b.iter(|| {
                let info = perft(
                    black_box(starting_position),
                    black_box(8),
                    black_box(num_threads),
                );
                assert_eq!(info.nodes, START_NODES[8]);
            })
        },
    );
}

criterion_group! {
    name = small_benches;
    config = Criterion::default().without_plots().sample_size(50);
    targets = criterion_perft_small_benchmark
}
criterion_group! {
    name = large_benches;
    config = Criterion::default().without_plots().sample_size(10);
    targets = criterion_perft_large_benchmark
}
criterion_main!(small_benches, large_benches);
