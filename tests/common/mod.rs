#![allow(dead_code)]

use optrack::constants::{Position, TrackId, OPTICAL_PHOTON};
use optrack::tracks::{StepRecord, StepStatus, TrackFragment};
use rand::rngs::StdRng;
use rand::Rng;

/// Step ending at `(0, 0, t)` at time `t`, with a unit length.
pub fn step(t: f64, process: &str) -> StepRecord {
    StepRecord::new(Position::new(0.0, 0.0, t), t, process).with_length(1.0)
}

/// Zero-length birth step at time `t`.
pub fn birth(t: f64, process: &str) -> StepRecord {
    StepRecord::new(Position::new(0.0, 0.0, t), t, process)
}

/// Optical photon fragment from `(time, process)` pairs; the first pair is the birth step.
pub fn photon(id: TrackId, parent: TrackId, steps: &[(f64, &str)]) -> TrackFragment {
    let mut track = TrackFragment::new(id, parent, OPTICAL_PHOTON);
    for (i, &(t, process)) in steps.iter().enumerate() {
        track.push_step(if i == 0 { birth(t, process) } else { step(t, process) });
    }
    track
}

/// Step ending in `end_volume` after travelling through `volume`.
pub fn boundary_step(
    t: f64,
    volume: &str,
    end_volume: &str,
    status: StepStatus,
) -> StepRecord {
    step(t, "Transportation")
        .with_volume(volume)
        .with_end_volume(end_volume)
        .with_status(status)
}

/// A synthetic event made of independent photon trees.
pub struct Forest {
    /// Every track of the event, electrons included, identifiers `1..=tracks.len()`.
    pub tracks: Vec<TrackFragment>,
    /// Photon identifiers of each tree.
    pub trees: Vec<Vec<TrackId>>,
}

impl Forest {
    pub fn photon_steps(&self) -> usize {
        self.tracks
            .iter()
            .filter(|track| track.particle_name == OPTICAL_PHOTON)
            .map(TrackFragment::step_count)
            .sum()
    }

    /// One report per tree at most, on a random member of the tree.
    pub fn sparse_hits(&self, rng: &mut StdRng) -> Vec<TrackId> {
        let mut hits = Vec::new();
        for tree in &self.trees {
            if rng.random_bool(0.5) {
                hits.push(tree[rng.random_range(0..tree.len())]);
            }
        }
        hits
    }

    /// Any photon may be reported, each at most once.
    pub fn dense_hits(&self, rng: &mut StdRng) -> Vec<TrackId> {
        self.trees
            .iter()
            .flatten()
            .copied()
            .filter(|_| rng.random_bool(0.4))
            .collect()
    }
}

fn new_photon(
    tracks: &mut Vec<TrackFragment>,
    rng: &mut StdRng,
    next_id: &mut TrackId,
    parent: TrackId,
    start: f64,
) -> (TrackId, f64) {
    let id = *next_id;
    *next_id += 1;
    let mut track = TrackFragment::new(id, parent, OPTICAL_PHOTON);
    track.push_step(birth(start, "Scintillation"));
    let mut t = start;
    for _ in 0..rng.random_range(0..5) {
        t += rng.random_range(0.01..2.0);
        track.push_step(step(t, "Transportation"));
    }
    tracks.push(track);
    (id, t)
}

/// Random photon trees of depth `1..=max_depth`.
///
/// Every tree hangs below an electron (or the event primary) and consists of a chain of
/// fragments, each born when its parent ends. With `branching`, a chain link may get an
/// extra leaf child. Identifiers increase in creation order like the simulation assigns them.
pub fn random_forest(rng: &mut StdRng, n_trees: usize, max_depth: usize, branching: bool) -> Forest {
    let mut tracks = Vec::new();
    let mut trees = Vec::with_capacity(n_trees);
    let mut next_id: TrackId = 1;

    for _ in 0..n_trees {
        let mut root_parent = 0;
        if rng.random_bool(0.5) {
            let id = next_id;
            next_id += 1;
            let mut electron = TrackFragment::new(id, 0, "e-");
            electron.push_step(birth(0.0, "eIoni"));
            electron.push_step(step(0.1, "eIoni"));
            tracks.push(electron);
            root_parent = id;
        }

        let depth = rng.random_range(1..=max_depth);
        let start = rng.random_range(0.0..10.0);
        let (root, mut end) = new_photon(&mut tracks, rng, &mut next_id, root_parent, start);
        let mut members = vec![root];
        let mut parent = root;

        for _ in 1..depth {
            if branching && rng.random_bool(0.3) {
                let (leaf, _) = new_photon(&mut tracks, rng, &mut next_id, parent, end);
                members.push(leaf);
            }
            let (child, child_end) = new_photon(&mut tracks, rng, &mut next_id, parent, end);
            members.push(child);
            parent = child;
            end = child_end;
        }
        trees.push(members);
    }

    Forest { tracks, trees }
}
