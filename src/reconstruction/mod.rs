//! # Optical-photon track reconstruction
//!
//! The transport engine splits the trajectory of a single optical photon into several
//! [`TrackFragment`](crate::tracks::TrackFragment)s whenever a process such as re-emission
//! interrupts it. This module rebuilds one logical track per physical photon.
//!
//! ## Pipeline overview
//!
//! 1. **Fragment index** ([`fragment_index`])
//!    Keep the fragments of the species of interest, keyed by track identifier, and build
//!    the [`HitFlags`] table from the event's hit reports.
//!
//! 2. **Chain collapse** ([`chain`])
//!    While some indexed fragment has its parent in the index, walk the parent chain, pull
//!    every link out of the index, join them and insert the joined track back. Hit flags of
//!    the absorbed fragments are folded onto the joined track.
//!
//! 3. **Join** ([`join`])
//!    Order a chain by the global time of each fragment's last step and concatenate steps
//!    onto the earliest-ending fragment.
//!
//! ## Parameters
//!
//! [`ReconstructionParams`] carries the species and process markers plus the policies left
//! open by the upstream data (single-step tracks, repeated hit reports).
//!
//! ```rust
//! use optrack::reconstruction::{AnalysisMode, ReconstructionParams, SingleStepPolicy};
//!
//! let params = ReconstructionParams::builder()
//!     .mode(AnalysisMode::Joined)
//!     .single_step(SingleStepPolicy::Reject)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.species, "opticalphoton");
//! ```

use crate::constants::{DETECTOR_HIT_MARKER, OPTICAL_PHOTON, REEMISSION_PROCESS};
use crate::optrack_errors::OptrackError;

pub mod chain;
pub mod fragment_index;
pub mod join;

pub use chain::{reconstruct, ReconstructionStats};
pub use fragment_index::{FragmentIndex, HitFlags};
pub use join::join_tracks;

/// Which analysis to run over an event's fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// Collapse parent/child chains before extracting photons.
    #[default]
    Joined,
    /// Extract every fragment as its own photon; single-step fragments are skipped.
    Minimal,
}

/// What to do with a fragment that only holds its birth step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingleStepPolicy {
    /// Extract it like any other track.
    #[default]
    Keep,
    /// Drop it silently.
    Skip,
    /// Abort the event with [`OptrackError::SingleStepTrack`].
    Reject,
}

/// How a hit report updates the hit-flag table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitFlagUpdate {
    /// Flip the flag: an identifier reported an even number of times ends up unset.
    #[default]
    Toggle,
    /// Set the flag regardless of its previous value.
    Set,
}

/// Configuration of one reconstruction run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructionParams {
    pub mode: AnalysisMode,
    /// Policy for single-step tracks in [`AnalysisMode::Joined`]; the minimal analysis
    /// always skips them.
    pub single_step: SingleStepPolicy,
    pub hit_flag_update: HitFlagUpdate,
    /// Particle species kept by the fragment index.
    pub species: String,
    /// Substring of a process name marking a detector-hit step.
    pub hit_marker: String,
    /// Exact process name of a re-emission step.
    pub reemission_process: String,
}

impl Default for ReconstructionParams {
    fn default() -> Self {
        ReconstructionParams {
            mode: AnalysisMode::Joined,
            single_step: SingleStepPolicy::Keep,
            hit_flag_update: HitFlagUpdate::Toggle,
            species: OPTICAL_PHOTON.to_string(),
            hit_marker: DETECTOR_HIT_MARKER.to_string(),
            reemission_process: REEMISSION_PROCESS.to_string(),
        }
    }
}

impl ReconstructionParams {
    pub fn builder() -> ReconstructionParamsBuilder {
        ReconstructionParamsBuilder::new()
    }

    /// Single-step policy in effect for the configured mode.
    pub fn effective_single_step(&self) -> SingleStepPolicy {
        match self.mode {
            AnalysisMode::Minimal => SingleStepPolicy::Skip,
            AnalysisMode::Joined => self.single_step,
        }
    }
}

/// Builder for [`ReconstructionParams`].
#[derive(Debug, Clone)]
pub struct ReconstructionParamsBuilder {
    params: ReconstructionParams,
}

impl Default for ReconstructionParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconstructionParamsBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            params: ReconstructionParams::default(),
        }
    }

    pub fn mode(mut self, v: AnalysisMode) -> Self {
        self.params.mode = v;
        self
    }
    pub fn single_step(mut self, v: SingleStepPolicy) -> Self {
        self.params.single_step = v;
        self
    }
    pub fn hit_flag_update(mut self, v: HitFlagUpdate) -> Self {
        self.params.hit_flag_update = v;
        self
    }
    pub fn species(mut self, v: impl Into<String>) -> Self {
        self.params.species = v.into();
        self
    }
    pub fn hit_marker(mut self, v: impl Into<String>) -> Self {
        self.params.hit_marker = v.into();
        self
    }
    pub fn reemission_process(mut self, v: impl Into<String>) -> Self {
        self.params.reemission_process = v.into();
        self
    }

    /// Finalize the builder.
    ///
    /// Validation rules
    /// -----------------
    /// * `species`, `hit_marker` and `reemission_process` must not be empty. An empty hit
    ///   marker would match every process name.
    ///
    /// Returns
    /// -----------------
    /// * `Err(OptrackError::InvalidParameter)` naming the first offending field.
    pub fn build(self) -> Result<ReconstructionParams, OptrackError> {
        let p = &self.params;
        if p.species.trim().is_empty() {
            return Err(OptrackError::InvalidParameter(
                "species must not be empty".into(),
            ));
        }
        if p.hit_marker.is_empty() {
            return Err(OptrackError::InvalidParameter(
                "hit_marker must not be empty".into(),
            ));
        }
        if p.reemission_process.is_empty() {
            return Err(OptrackError::InvalidParameter(
                "reemission_process must not be empty".into(),
            ));
        }
        Ok(self.params)
    }
}
