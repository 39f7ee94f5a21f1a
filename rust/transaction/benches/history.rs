// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Commit/undo/redo throughput over a grid of rooms.
//!
//! Run with: cargo bench -p planscape-transaction --bench history

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use planscape_topology::{make_rectangle, FaceKey, Sketch};
use planscape_transaction::request::{MoveFace, SplitCurve};
use planscape_transaction::{EngineConfig, Request, TransactionManager};

/// Separate unit rooms laid out on a grid, spaced so no two share a point.
fn room_grid(side: usize) -> (Sketch, Vec<FaceKey>) {
    let mut sketch = Sketch::new();
    let mut faces = Vec::with_capacity(side * side);
    for row in 0..side {
        for col in 0..side {
            let x = col as f64 * 2.0;
            let y = row as f64 * 2.0;
            let id = format!("r{row}x{col}");
            if let Ok((face, _, _)) = make_rectangle(&mut sketch, [x, y], [x + 1.0, y + 1.0], &id) {
                faces.push(face);
            }
        }
    }
    (sketch, faces)
}

fn edits(sketch: &Sketch, faces: &[FaceKey]) -> Vec<Request> {
    faces
        .iter()
        .enumerate()
        .map(|(i, &face)| {
            if i % 2 == 0 {
                MoveFace::new(face, [0.25, 0.25]).into()
            } else {
                let curve = sketch.face_curves(face).ok().and_then(|c| c.into_iter().min());
                match curve {
                    Some(curve) => SplitCurve::new(curve, vec![0.5]).into(),
                    None => MoveFace::new(face, [0.0, 0.5]).into(),
                }
            }
        })
        .collect()
}

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("history");

    for side in [4usize, 16, 32] {
        let name = format!("{}_rooms", side * side);
        group.throughput(Throughput::Elements((side * side) as u64));

        group.bench_with_input(BenchmarkId::new("commit", &name), &side, |b, &side| {
            b.iter_batched(
                || {
                    let (sketch, faces) = room_grid(side);
                    let requests = edits(&sketch, &faces);
                    (sketch, requests)
                },
                |(mut sketch, requests)| {
                    let config = EngineConfig::default().with_max_undo_depth(requests.len());
                    let mut manager = TransactionManager::new(config);
                    for request in requests {
                        let _ = manager.commit(&mut sketch, black_box(request));
                    }
                    manager
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("undo_redo", &name), &side, |b, &side| {
            b.iter_batched(
                || {
                    let (mut sketch, faces) = room_grid(side);
                    let requests = edits(&sketch, &faces);
                    let config = EngineConfig::default().with_max_undo_depth(requests.len());
                    let mut manager = TransactionManager::new(config);
                    for request in requests {
                        let _ = manager.commit(&mut sketch, request);
                    }
                    (sketch, manager)
                },
                |(mut sketch, mut manager)| {
                    while let Ok(true) = manager.undo(&mut sketch) {}
                    while let Ok(true) = manager.redo(&mut sketch) {}
                    black_box(sketch.take_dirty().len())
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_history);
criterion_main!(benches);
