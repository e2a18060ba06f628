use corrtrack::{CorrelationTracker, Descriptor, DescriptorKind, Direction, Grid, Phase, PhaseSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn tracker(seed: u64) -> CorrelationTracker {
    let mut rng = StdRng::seed_from_u64(seed);
    let grid = Grid::from_fn(vec![10, 10], PhaseSet::binary(), |_| Phase::from(rng.gen_bool(0.4))).unwrap();
    CorrelationTracker::builder(grid)
        .tracking([
            Descriptor::s2(Phase(1)),
            Descriptor::l2(Phase(0)),
            Descriptor::surface_surface(Phase(1)),
            Descriptor::surface_void(Phase(1)),
        ])
        .directions(vec![Direction::X, Direction::Y, Direction::XY])
        .build()
        .unwrap()
}

#[test]
fn soft_update_never_mutates_the_source() {
    let source = tracker(1);
    let digest = source.digest();
    let labels = source.grid().to_vec();
    let mut rng = StdRng::seed_from_u64(2);

    for _ in 0..50 {
        let coord: [usize; 2] = [rng.gen_range(0..10), rng.gen_range(0..10)];
        let next = source.soft_update(&coord, Phase(rng.gen_range(0..2))).unwrap();
        assert!(next.is_consistent());
    }

    assert_eq!(source.digest(), digest);
    assert_eq!(source.grid().to_vec(), labels);
    assert_eq!(source.grid().overlay_len(), 0);
}

#[test]
fn soft_update_equals_update_on_a_clone() {
    let source = tracker(3);
    let mut rng = StdRng::seed_from_u64(4);
    for _ in 0..30 {
        let coord: [usize; 2] = [rng.gen_range(0..10), rng.gen_range(0..10)];
        let phase = Phase(rng.gen_range(0..2));

        let soft = source.soft_update(&coord, phase).unwrap();
        let mut hard = source.clone();
        hard.update(&coord, phase).unwrap();

        assert_eq!(soft, hard);
        assert_eq!(soft.digest(), hard.digest());
    }
}

#[test]
fn soft_updated_tracker_is_independently_mutable() {
    let source = tracker(5);
    let digest = source.digest();
    let mut child = source.soft_update(&[4, 4], Phase(1)).unwrap();

    let token = child.update(&[4, 5], Phase(0)).unwrap();
    child.write(&[0, 9], Phase(1)).unwrap();
    assert!(child.is_consistent());
    assert!(child.rollback(token).unwrap_err().is_invalid_token());

    assert_eq!(source.digest(), digest);
    let s2 = source.descriptor(DescriptorKind::TwoPoint, Phase(1), Direction::XY).unwrap();
    assert_eq!(s2.len(), source.tracked_length());
}

#[test]
fn many_soft_updates_fold_overlay_into_private_storage() {
    let grid = Grid::filled(vec![12, 12], Phase(0), PhaseSet::binary()).unwrap();
    let source = CorrelationTracker::builder(grid)
        .track(Descriptor::s2(Phase(1)))
        .overlay_limit(8)
        .build()
        .unwrap();

    let mut current = source.soft_update(&[0, 0], Phase(1)).unwrap();
    for i in 1..12 {
        current = current.soft_update(&[i, i], Phase(1)).unwrap();
    }
    assert!(current.is_consistent());
    assert!(!current.grid().shares_storage_with(source.grid()));
    // Compacted at the ninth write, then three more writes were overlaid.
    assert_eq!(current.grid().overlay_len(), 3);
    let s2 = current.descriptor(DescriptorKind::TwoPoint, Phase(1), Direction::X).unwrap();
    assert_eq!(s2.success[0], 12);
    assert_eq!(source.descriptor(DescriptorKind::TwoPoint, Phase(1), Direction::X).unwrap().success[0], 0);
}
