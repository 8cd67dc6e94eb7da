//! # Feature extraction
//!
//! Turns one fully joined track into a [`PhotonRecord`] with a single forward scan over its
//! steps.
//!
//! Per-step rules
//! -----------------
//! Only one piece of state is carried from step to step: whether the previous step ended on
//! a geometry boundary.
//!
//! * **Reflection** – the previous step ended on a geometry boundary and the current step
//!   ends in the volume the previous step took place in: the photon turned back at the
//!   boundary. The reflection is recorded at the *previous* step's endpoint and time.
//! * **Indefinite hit** – the process name contains the detector-hit marker; recorded at the
//!   current step's endpoint and time.
//! * **Re-emission** – the process name equals the re-emission marker; every such step
//!   counts.
//!
//! Birth attributes come from step 0, and so does the origin (Cerenkov or scintillation):
//! only the process that created the very first step is considered. The total length is the
//! track's cumulative length, not a sum recomputed here.

use crate::constants::{CERENKOV_PROCESS, SCINTILLATION_PROCESS};
use crate::optrack_errors::OptrackError;
use crate::reconstruction::ReconstructionParams;
use crate::tracks::TrackFragment;

use super::{PhotonRecord, SpacetimePoint};

/// Derive the per-photon observables of a joined track.
///
/// Arguments
/// -----------------
/// * `track` – the joined track, steps in temporal order.
/// * `hit_flag` – definite-hit flag of the track's identifier.
/// * `event_index` – index of the event the track belongs to.
/// * `params` – process markers to match step processes against.
///
/// Return
/// ----------
/// * `Err(OptrackError::EmptyTrack)` if the track holds no step.
pub fn extract_photon(
    track: &TrackFragment,
    hit_flag: bool,
    event_index: usize,
    params: &ReconstructionParams,
) -> Result<PhotonRecord, OptrackError> {
    let birth = track.birth_step()?;

    let mut photon = PhotonRecord::new(event_index, track.track_id, track.parent_id);
    photon.birth_position = birth.endpoint;
    photon.birth_time = birth.global_time;
    photon.birth_energy = birth.kinetic_energy;
    photon.total_length = track.length;
    photon.hit_detector = hit_flag;

    match birth.process.as_str() {
        SCINTILLATION_PROCESS => photon.is_scintillation = true,
        CERENKOV_PROCESS => photon.is_cerenkov = true,
        _ => {}
    }

    let mut last_ended_on_boundary = false;
    for (i, step) in track.steps.iter().enumerate() {
        if last_ended_on_boundary && i != 0 {
            let previous = &track.steps[i - 1];
            if step.end_volume() == previous.volume {
                photon
                    .reflections
                    .push(SpacetimePoint::new(previous.endpoint, previous.global_time));
            }
        }

        if step.process.contains(params.hit_marker.as_str()) {
            photon
                .detector_hits
                .push(SpacetimePoint::new(step.endpoint, step.global_time));
        }

        if step.process == params.reemission_process {
            photon.is_reemitted = true;
            photon.reemissions += 1;
        }

        last_ended_on_boundary = step.status.is_geom_boundary();
    }

    Ok(photon)
}
