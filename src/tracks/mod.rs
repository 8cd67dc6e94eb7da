//! # Tracks: simulated steps and track fragments
//!
//! Plain data records handed over by the upstream particle-transport simulation.
//!
//! Modules
//! -----------------
//! * [`step`](crate::tracks::step) – [`StepRecord`] and [`StepStatus`], one segment of a trajectory.
//! * [`fragment`](crate::tracks::fragment) – [`TrackFragment`], an ordered run of steps for one particle.
//! * [`display`](crate::tracks::display) – [`TracksDisplay`], a `comfy-table` dump of fragments.
//!
//! Data Model
//! -----------------
//! * A fragment's step 0 is a zero-length step marking its birth point.
//! * Steps are stored in temporal order as produced upstream.
//! * Fragments are read-only to the reconstruction, which only builds new, joined fragments.

pub mod display;
pub mod fragment;
pub mod step;

pub use display::TracksDisplay;
pub use fragment::TrackFragment;
pub use step::{StepRecord, StepStatus};
