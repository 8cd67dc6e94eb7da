//! # Chain collapse
//!
//! [`reconstruct`] reduces a [`FragmentIndex`] to its fixed point: when it returns, no
//! indexed fragment names a parent that is itself indexed.
//!
//! Algorithm
//! -----------------
//! 1. Snapshot the indexed identifiers into a worklist and pop from the highest one.
//! 2. Skip identifiers whose fragment is a root (parent not indexed).
//! 3. Otherwise walk the parent links upward while the parent is indexed, collecting the
//!    chain `[child, parent, grandparent, …]`.
//! 4. Pull the chain out of the index, fold its hit flags into one "any child hit" bit and
//!    clear each absorbed flag.
//! 5. Join the chain ([`join_tracks`]) and insert the result under its own identifier; set
//!    its flag if any absorbed fragment had one.
//! 6. Start over from a fresh snapshot of the mutated index.
//!
//! The scan ends once a full pass finds no indexed parent.
//!
//! A fragment naming itself as parent, or a parent link that loops back into the chain
//! being collected, ends the walk instead of looping.

use log::debug;
use smallvec::{smallvec, SmallVec};

use crate::constants::TrackId;
use crate::optrack_errors::OptrackError;

use super::fragment_index::{FragmentIndex, HitFlags};
use super::join::join_tracks;

/// Bookkeeping of one [`reconstruct`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconstructionStats {
    /// Number of chains joined.
    pub merges: usize,
    /// Fragments that disappeared into a joined track (chain length minus one, summed).
    pub absorbed: usize,
    /// Flagged fragments whose hit collapsed onto a joined track already carrying one.
    pub folded_hits: usize,
}

type Chain = SmallVec<[TrackId; 8]>;

/// Parent of `id` if it is indexed and not yet part of `chain`.
fn indexed_parent(index: &FragmentIndex, id: TrackId, chain: &[TrackId]) -> Option<TrackId> {
    index
        .get(id)
        .map(|track| track.parent_id)
        .filter(|parent| index.contains(*parent) && !chain.contains(parent))
}

/// Collapse every parent/child chain of `index` into a single joined track.
///
/// Arguments
/// -----------------
/// * `index` – the event's fragments; reduced in place.
/// * `flags` – hit flags of the event; updated so each joined track carries the OR of its
///   constituents' flags and absorbed identifiers are cleared.
///
/// Return
/// ----------
/// * [`ReconstructionStats`] describing the merges performed.
/// * `Err(OptrackError::OutOfRangeIdentifier)` if a chained identifier has no hit-flag slot.
/// * `Err(OptrackError::EmptyTrack)` if a chained fragment holds no step.
pub fn reconstruct(
    index: &mut FragmentIndex,
    flags: &mut HitFlags,
) -> Result<ReconstructionStats, OptrackError> {
    let mut stats = ReconstructionStats::default();

    'restart: loop {
        let mut pending = index.ids();

        while let Some(id) = pending.pop() {
            let mut chain: Chain = smallvec![id];
            let Some(parent) = indexed_parent(index, id, &chain) else {
                continue;
            };
            chain.push(parent);

            let mut cursor = parent;
            while let Some(next) = indexed_parent(index, cursor, &chain) {
                chain.push(next);
                cursor = next;
            }

            let mut child_hit = false;
            let mut links = Vec::with_capacity(chain.len());
            for &link in &chain {
                if flags.get(link)? {
                    if child_hit {
                        stats.folded_hits += 1;
                    }
                    child_hit = true;
                    flags.flip(link)?;
                }
                if let Some(track) = index.remove(link) {
                    links.push(track);
                }
            }

            let joined = join_tracks(links)?;
            let joined_id = joined.track_id;
            debug!("joined tracks {chain:?} into track {joined_id}");
            index.insert_if_absent(joined);

            if child_hit && !flags.get(joined_id)? {
                flags.flip(joined_id)?;
            }

            stats.merges += 1;
            stats.absorbed += chain.len() - 1;
            continue 'restart;
        }

        break;
    }

    Ok(stats)
}
