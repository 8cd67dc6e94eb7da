//! # Joining a chain of fragments
//!
//! [`join_tracks`] turns the fragments of one physical photon into a single track.
//!
//! Ordering
//! -----------------
//! Fragments are ordered by the global time of their **last** step, ascending. Equal end
//! times are broken by ascending track identifier so the result does not depend on the
//! order of the input list. Fragments are assumed disjoint in time; overlapping steps are
//! kept as they are.
//!
//! Result
//! -----------------
//! The earliest-ending fragment is the base of the joined track: its identifier, parent,
//! species and cumulative length carry over. Every step of the following fragments, birth
//! steps included, is appended in order. Appending does not touch the length, so the joined
//! track reports the length of its base fragment.

use std::cmp::Ordering;

use itertools::Itertools;

use crate::optrack_errors::OptrackError;
use crate::tracks::TrackFragment;

/// Total order used to sequence the fragments of a chain.
fn end_time_order(a: &(f64, TrackFragment), b: &(f64, TrackFragment)) -> Ordering {
    a.0.total_cmp(&b.0)
        .then_with(|| a.1.track_id.cmp(&b.1.track_id))
}

/// Join the fragments of one chain into a single, time-ordered track.
///
/// Arguments
/// -----------------
/// * `fragments` – the chain, in any order. At least one fragment is required.
///
/// Return
/// ----------
/// * `Err(OptrackError::EmptyChain)` for an empty list.
/// * `Err(OptrackError::EmptyTrack)` if a fragment has no step to order it by.
pub fn join_tracks(fragments: Vec<TrackFragment>) -> Result<TrackFragment, OptrackError> {
    let keyed: Vec<(f64, TrackFragment)> = fragments
        .into_iter()
        .map(|track| Ok((track.last_step()?.global_time, track)))
        .collect::<Result<_, OptrackError>>()?;

    let mut ordered = keyed
        .into_iter()
        .sorted_by(end_time_order)
        .map(|(_, track)| track);

    let mut joined = ordered.next().ok_or(OptrackError::EmptyChain)?;
    for track in ordered {
        joined.steps.extend(track.steps);
    }
    Ok(joined)
}
