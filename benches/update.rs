use std::time::Instant;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use corrtrack::{CorrelationTracker, Descriptor, Direction, Grid, Phase, PhaseSet};

fn make_tracker(side: usize) -> CorrelationTracker {
    let grid = Grid::from_fn(vec![side, side], PhaseSet::binary(), |c| {
        Phase::from((c[0] * 31 + c[1] * 17) % 7 < 3)
    })
    .unwrap();
    CorrelationTracker::builder(grid)
        .tracking([
            Descriptor::s2(Phase(1)),
            Descriptor::l2(Phase(1)),
            Descriptor::surface_surface(Phase(1)),
            Descriptor::surface_void(Phase(1)),
        ])
        .directions(vec![Direction::X, Direction::Y, Direction::XY, Direction::YX])
        .tracked_length(16)
        .build()
        .unwrap()
}

fn bench_incremental_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_update");
    group.throughput(Throughput::Elements(1));

    for side in [64usize, 256, 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(side), &side, |b, &side| {
            let mut tracker = make_tracker(side);
            b.iter_custom(|iters| {
                let start = Instant::now();
                for i in 0..iters {
                    #[allow(clippy::cast_possible_truncation)]
                    let k = i as usize;
                    let coord = [(k * 7) % side, (k * 13) % side];
                    let token = tracker.update(&coord, Phase::from(k % 2 == 0)).unwrap();
                    tracker.rollback(black_box(token)).unwrap();
                }
                start.elapsed()
            });
        });
    }

    group.finish();
}

fn bench_soft_update(c: &mut Criterion) {
    let tracker = make_tracker(256);
    c.bench_function("soft_update/256", |b| {
        b.iter(|| black_box(tracker.soft_update(&[128, 128], Phase(1)).unwrap()));
    });
}

fn bench_full_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_recompute");
    group.sample_size(10);

    for side in [64usize, 256] {
        let tracker = make_tracker(side);
        group.bench_with_input(BenchmarkId::from_parameter(side), &tracker, |b, tracker| {
            b.iter(|| black_box(tracker.is_consistent()));
        });
    }

    group.finish();
}

criterion_group!(update, bench_incremental_update, bench_soft_update, bench_full_recompute);
criterion_main!(update);
