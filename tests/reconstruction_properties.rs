mod common;

use approx::assert_relative_eq;
use itertools::Itertools;
use optrack::constants::{TrackId, OPTICAL_PHOTON};
use optrack::reconstruction::fragment_index::build_index;
use optrack::reconstruction::{join_tracks, reconstruct, HitFlagUpdate};
use rand::rngs::StdRng;
use rand::SeedableRng;

use common::{photon, random_forest};

const SEEDS: u64 = 25;

#[test]
fn test_collapse_reaches_fixed_point() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        for branching in [false, true] {
            let forest = random_forest(&mut rng, 12, 10, branching);
            let hits = forest.dense_hits(&mut rng);
            let (mut index, mut flags) =
                build_index(&forest.tracks, &hits, OPTICAL_PHOTON, HitFlagUpdate::Toggle).unwrap();

            reconstruct(&mut index, &mut flags).unwrap();

            for track in index.iter() {
                assert!(
                    !index.contains(track.parent_id),
                    "seed {seed}: track {} still chained to {}",
                    track.track_id,
                    track.parent_id
                );
            }
            assert!(index.is_fully_joined());
        }
    }
}

#[test]
fn test_linear_trees_collapse_onto_their_roots() {
    let mut rng = StdRng::seed_from_u64(0x0B7_1CA1);
    let forest = random_forest(&mut rng, 20, 10, false);
    let (mut index, mut flags) =
        build_index(&forest.tracks, &[], OPTICAL_PHOTON, HitFlagUpdate::Toggle).unwrap();

    let stats = reconstruct(&mut index, &mut flags).unwrap();

    let roots: Vec<TrackId> = forest.trees.iter().map(|tree| tree[0]).collect();
    assert_eq!(index.ids(), roots);
    assert_eq!(
        stats.merges,
        forest.trees.iter().filter(|tree| tree.len() > 1).count()
    );
    assert_eq!(
        stats.absorbed,
        forest.trees.iter().map(|tree| tree.len() - 1).sum::<usize>()
    );

    for track in index.iter() {
        let times: Vec<f64> = track.steps.iter().map(|s| s.global_time).collect();
        assert!(
            times.iter().tuple_windows().all(|(a, b)| a <= b),
            "track {} is not time ordered: {times:?}",
            track.track_id
        );
    }
}

#[test]
fn test_steps_are_conserved() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let forest = random_forest(&mut rng, 15, 10, true);
        let (mut index, mut flags) =
            build_index(&forest.tracks, &[], OPTICAL_PHOTON, HitFlagUpdate::Toggle).unwrap();
        assert_eq!(index.total_steps(), forest.photon_steps());

        reconstruct(&mut index, &mut flags).unwrap();
        assert_eq!(index.total_steps(), forest.photon_steps(), "seed {seed}");
    }
}

#[test]
fn test_hits_are_conserved_or_folded() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let forest = random_forest(&mut rng, 15, 10, true);

        // At most one hit per tree: nothing can fold.
        let sparse = forest.sparse_hits(&mut rng);
        let (mut index, mut flags) =
            build_index(&forest.tracks, &sparse, OPTICAL_PHOTON, HitFlagUpdate::Toggle).unwrap();
        let before = flags.count();
        assert_eq!(before, sparse.len());
        let stats = reconstruct(&mut index, &mut flags).unwrap();
        assert_eq!(flags.count(), before, "seed {seed}");
        assert_eq!(stats.folded_hits, 0);
        assert!(flags.hit_ids().iter().all(|id| index.contains(*id)));

        // Several hits per tree may collapse onto one joined track.
        let dense = forest.dense_hits(&mut rng);
        let (mut index, mut flags) =
            build_index(&forest.tracks, &dense, OPTICAL_PHOTON, HitFlagUpdate::Toggle).unwrap();
        let before = flags.count();
        let stats = reconstruct(&mut index, &mut flags).unwrap();
        assert!(flags.count() <= before, "seed {seed}");
        assert_eq!(flags.count() + stats.folded_hits, before);
        assert!(flags.hit_ids().iter().all(|id| index.contains(*id)));
    }
}

#[test]
fn test_child_hit_moves_to_joined_track() {
    let tracks = vec![
        photon(1, 0, &[(0.0, "Cerenkov"), (1.0, "Transportation")]),
        photon(2, 1, &[(1.0, "OpAbsorption"), (2.0, "Reemission")]),
    ];
    let (mut index, mut flags) =
        build_index(&tracks, &[1], OPTICAL_PHOTON, HitFlagUpdate::Toggle).unwrap();
    reconstruct(&mut index, &mut flags).unwrap();

    assert_eq!(index.ids(), vec![1]);
    assert_eq!(flags.hit_ids(), vec![1]);
}

#[test]
fn test_repeated_reports_depend_on_update_rule() {
    let tracks = vec![photon(1, 0, &[(0.0, "Cerenkov")]), photon(2, 0, &[(0.0, "Cerenkov")])];

    let (_, toggled) =
        build_index(&tracks, &[2, 2, 1], OPTICAL_PHOTON, HitFlagUpdate::Toggle).unwrap();
    assert_eq!(toggled.hit_ids(), vec![1]);

    let (_, set) = build_index(&tracks, &[2, 2, 1], OPTICAL_PHOTON, HitFlagUpdate::Set).unwrap();
    assert_eq!(set.hit_ids(), vec![1, 2]);
}

#[test]
fn test_join_orders_by_last_step_time() {
    let late = photon(1, 0, &[(4.5, "Scintillation"), (5.0, "Transportation")]);
    let early = photon(2, 1, &[(0.5, "Reemission"), (1.0, "Transportation")]);
    let middle = photon(3, 2, &[(2.5, "Reemission"), (3.0, "Transportation")]);

    let joined = join_tracks(vec![late, early, middle]).unwrap();

    assert_eq!(joined.track_id, 2);
    assert_eq!(joined.parent_id, 1);
    let times: Vec<f64> = joined.steps.iter().map(|s| s.global_time).collect();
    assert_eq!(times, vec![0.5, 1.0, 2.5, 3.0, 4.5, 5.0]);
    assert_relative_eq!(joined.length, 1.0);
}

#[test]
fn test_join_breaks_end_time_ties_by_identifier() {
    let a = photon(7, 0, &[(0.0, "Scintillation"), (2.0, "Transportation")]);
    let b = photon(4, 0, &[(1.0, "Cerenkov"), (2.0, "Transportation")]);

    let joined = join_tracks(vec![a.clone(), b.clone()]).unwrap();
    let swapped = join_tracks(vec![b, a]).unwrap();

    assert_eq!(joined.track_id, 4);
    assert_eq!(joined, swapped);
    assert_eq!(joined.step_count(), 4);
}

#[test]
fn test_joined_track_keeps_the_base_length() {
    let base = photon(1, 0, &[(0.0, "Cerenkov"), (1.0, "Transportation")]);
    let child = photon(
        2,
        1,
        &[(1.0, "OpAbsorption"), (2.0, "Reemission"), (3.0, "Reemission")],
    );
    assert_relative_eq!(base.length, 1.0);
    assert_relative_eq!(child.length, 2.0);

    let joined = join_tracks(vec![child, base]).unwrap();
    assert_eq!(joined.step_count(), 5);
    assert_relative_eq!(joined.length, 1.0);
}
