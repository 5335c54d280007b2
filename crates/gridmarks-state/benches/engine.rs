//! Benchmarks for the state engine's hot paths.

use criterion::{Criterion, criterion_group, criterion_main};
use gridmarks_core::{CandidateSet, Coord, Digit};
use gridmarks_state::State;
use std::hint::black_box;

fn sample_state() -> State {
    State::new([
        (Coord::new(0, 0), Digit::new(4)),
        (Coord::new(1, 3), Digit::new(1)),
        (Coord::new(2, 7), Digit::new(8)),
        (Coord::new(4, 4), Digit::new(0)),
        (Coord::new(6, 1), Digit::new(6)),
        (Coord::new(8, 8), Digit::new(2)),
    ])
    .expect("valid clues")
}

fn bench_fill_pencilmarks(c: &mut Criterion) {
    let state = sample_state();
    c.bench_function("fill_pencilmarks", |b| {
        b.iter(|| {
            let mut state = state.clone();
            state.fill_pencilmarks();
            black_box(state)
        });
    });
}

fn bench_remove_candidates(c: &mut Criterion) {
    let state = sample_state();
    let change: Vec<_> = (0..9)
        .map(|col| {
            (
                Coord::new(3, col),
                CandidateSet::from_digits([Digit::new(5)]),
            )
        })
        .collect();
    c.bench_function("remove_candidates_row", |b| {
        b.iter(|| {
            let mut state = state.clone();
            let _ = state.remove_candidates(change.iter().copied());
            black_box(state)
        });
    });
}

fn bench_candidate_in_houses(c: &mut Criterion) {
    let state = sample_state();
    c.bench_function("candidate_in_houses_sweep", |b| {
        b.iter(|| {
            let mut total = 0u32;
            for coord in Coord::ALL {
                for digit in Digit::ALL {
                    let (g, col, row) = state.candidate_in_houses(coord, digit);
                    total += u32::from(g) + u32::from(col) + u32::from(row);
                }
            }
            black_box(total)
        });
    });
}

fn bench_find_rectangles(c: &mut Criterion) {
    let state = sample_state();
    let required = CandidateSet::from_digits([Digit::new(3)]);
    c.bench_function("find_rectangles_global", |b| {
        b.iter(|| black_box(state.find_rectangles(None, Some(required)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_fill_pencilmarks,
    bench_remove_candidates,
    bench_candidate_in_houses,
    bench_find_rectangles
);
criterion_main!(benches);
