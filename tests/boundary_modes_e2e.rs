use corrtrack::{CorrelationTracker, Descriptor, DescriptorKind, Direction, Grid, Phase, PhaseSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn grid(seed: u64) -> Grid {
    let mut rng = StdRng::seed_from_u64(seed);
    Grid::from_fn(vec![20, 20], PhaseSet::binary(), |_| Phase::from(rng.gen_bool(0.5))).unwrap()
}

fn build(grid: Grid, periodic: bool) -> CorrelationTracker {
    CorrelationTracker::builder(grid)
        .tracking([
            Descriptor::s2(Phase(1)),
            Descriptor::l2(Phase(1)),
            Descriptor::surface_surface(Phase(1)),
            Descriptor::surface_void(Phase(0)),
        ])
        .directions(vec![Direction::X, Direction::Y, Direction::XY, Direction::YX])
        .tracked_length(4)
        .periodic(periodic)
        .build()
        .unwrap()
}

#[test]
fn interior_writes_produce_identical_deltas() {
    let mut open = build(grid(11), false);
    let mut wrapped = build(grid(11), true);
    let mut rng = StdRng::seed_from_u64(12);

    for _ in 0..60 {
        // Keep every read, including surface neighbours, off the edges.
        let coord: [usize; 2] = [rng.gen_range(5..15), rng.gen_range(5..15)];
        let phase = Phase(rng.gen_range(0..2));
        let a = open.update(&coord, phase).unwrap();
        let b = wrapped.update(&coord, phase).unwrap();
        assert_eq!(a.delta().entries(), b.delta().entries(), "write at {coord:?}");
        assert_eq!(a.delta().cells_read(), b.delta().cells_read());
    }
    assert!(open.is_consistent());
    assert!(wrapped.is_consistent());
}

#[test]
fn edge_writes_may_diverge_but_stay_exact() {
    let mut open = build(grid(13), false);
    let mut wrapped = build(grid(13), true);
    for i in 0..20usize {
        for coord in [[0, i], [19, i], [i, 0], [i, 19]] {
            let phase = Phase::from((i + coord[0]) % 3 == 0);
            open.write(&coord, phase).unwrap();
            wrapped.write(&coord, phase).unwrap();
        }
    }
    assert!(open.is_consistent());
    assert!(wrapped.is_consistent());
    assert_eq!(open.grid(), wrapped.grid());
}

#[test]
fn modes_agree_where_no_wraparound_is_involved() {
    let open = build(grid(17), false);
    let wrapped = build(grid(17), true);
    for direction in [Direction::X, Direction::Y, Direction::XY, Direction::YX] {
        let a = open.descriptor(DescriptorKind::TwoPoint, Phase(1), direction).unwrap();
        let b = wrapped.descriptor(DescriptorKind::TwoPoint, Phase(1), direction).unwrap();
        // Lag zero pairs a cell with itself.
        assert_eq!(a.success[0], b.success[0]);
        assert_eq!(a.total[0], b.total[0]);
        assert_eq!(b.total, vec![400; 4]);
        assert!(a.total[1..].iter().all(|&t| t < 400));
    }
}
