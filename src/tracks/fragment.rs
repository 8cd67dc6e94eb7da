use serde::{Deserialize, Serialize};

use crate::constants::{Millimeter, TrackId};
use crate::optrack_errors::OptrackError;

use super::step::StepRecord;

/// A contiguous run of steps the simulation assigned to one particle.
///
/// A physical optical photon may be split into several fragments when a process such as
/// re-emission interrupts its transport; each later fragment names the previous one in
/// `parent_id`. `length` is the cumulative length of all steps, maintained incrementally by
/// [`TrackFragment::push_step`] the same way the simulation maintains it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFragment {
    pub track_id: TrackId,
    #[serde(default)]
    pub parent_id: TrackId,
    pub particle_name: String,
    #[serde(default)]
    pub length: Millimeter,
    pub steps: Vec<StepRecord>,
}

impl TrackFragment {
    /// Create an empty fragment; steps are added with [`TrackFragment::push_step`].
    pub fn new(track_id: TrackId, parent_id: TrackId, particle_name: impl Into<String>) -> Self {
        TrackFragment {
            track_id,
            parent_id,
            particle_name: particle_name.into(),
            length: 0.0,
            steps: Vec::new(),
        }
    }

    /// Create a fragment from a full step list, accumulating the track length.
    pub fn from_steps(
        track_id: TrackId,
        parent_id: TrackId,
        particle_name: impl Into<String>,
        steps: impl IntoIterator<Item = StepRecord>,
    ) -> Self {
        let mut track = TrackFragment::new(track_id, parent_id, particle_name);
        for step in steps {
            track.push_step(step);
        }
        track
    }

    /// Append a step and add its length to the cumulative track length.
    pub fn push_step(&mut self, step: StepRecord) {
        self.length += step.length;
        self.steps.push(step);
    }

    #[inline]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// The zero-length step holding the birth point.
    ///
    /// Return
    /// ----------
    /// * `Err(OptrackError::EmptyTrack)` if the fragment holds no step at all.
    pub fn birth_step(&self) -> Result<&StepRecord, OptrackError> {
        self.steps
            .first()
            .ok_or(OptrackError::EmptyTrack(self.track_id))
    }

    /// The step where this fragment ends.
    pub fn last_step(&self) -> Result<&StepRecord, OptrackError> {
        self.steps
            .last()
            .ok_or(OptrackError::EmptyTrack(self.track_id))
    }
}

#[cfg(test)]
mod fragment_tests {
    use super::*;
    use crate::constants::{Position, OPTICAL_PHOTON};

    #[test]
    fn test_push_step_accumulates_length() {
        let track = TrackFragment::from_steps(
            4,
            1,
            OPTICAL_PHOTON,
            [
                StepRecord::new(Position::zeros(), 0.0, "Cerenkov"),
                StepRecord::new(Position::new(10.0, 0.0, 0.0), 0.05, "Transportation")
                    .with_length(10.0),
                StepRecord::new(Position::new(10.0, 2.5, 0.0), 0.06, "OpAbsorption")
                    .with_length(2.5),
            ],
        );

        assert_eq!(track.step_count(), 3);
        assert_eq!(track.length, 12.5);
        assert_eq!(track.last_step().unwrap().process, "OpAbsorption");
    }

    #[test]
    fn test_empty_fragment_has_no_birth_step() {
        let track = TrackFragment::new(9, 0, OPTICAL_PHOTON);
        assert_eq!(track.birth_step(), Err(OptrackError::EmptyTrack(9)));
        assert_eq!(track.last_step(), Err(OptrackError::EmptyTrack(9)));
    }
}
