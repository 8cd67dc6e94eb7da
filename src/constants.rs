//! # Constants and type definitions for optrack
//!
//! This module centralizes the **process markers**, **unit aliases**, and **common type
//! definitions** used throughout the `optrack` library.
//!
//! ## Overview
//!
//! - Names the upstream simulation attaches to particles and processes
//! - Unit aliases for lengths, times and energies carried by step records
//! - The track identifier type and the 3-vector type used for positions and momenta
//!
//! The marker strings are defaults only; [`ReconstructionParams`](crate::reconstruction::ReconstructionParams)
//! lets a caller override the species and the process markers per run.

use nalgebra::Vector3;

// -------------------------------------------------------------------------------------------------
// Particle and process markers
// -------------------------------------------------------------------------------------------------

/// Particle species name of optical photons in the upstream simulation
pub const OPTICAL_PHOTON: &str = "opticalphoton";

/// Process name of a re-emission step (wavelength shifting in the scintillator)
pub const REEMISSION_PROCESS: &str = "Reemission";

/// Process name of a step produced by Cerenkov radiation
pub const CERENKOV_PROCESS: &str = "Cerenkov";

/// Process name of a step produced by scintillation
pub const SCINTILLATION_PROCESS: &str = "Scintillation";

/// Substring of the process name that marks a step reaching a photocathode
pub const DETECTOR_HIT_MARKER: &str = "G4FastSimulationManagerProcess";

/// Parent identifier assigned to primary particles
pub const NO_PARENT: TrackId = 0;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Track identifier assigned by the simulation (1-based within an event)
pub type TrackId = u32;
/// Distance in millimeters
pub type Millimeter = f64;
/// Time in nanoseconds
pub type Nanosecond = f64;
/// Energy in MeV
pub type MeV = f64;

/// Cartesian position or momentum, in the simulation's global frame
pub type Position = Vector3<f64>;
