//! # Reconstructed photons
//!
//! One [`PhotonRecord`] is produced per reconstructed optical photon by
//! [`extract_photon`](crate::photon::extract::extract_photon). Records are plain values:
//! they are built fresh for every track and handed to a
//! [`PhotonSink`](crate::io::PhotonSink).
//!
//! Two kinds of detector hit are carried:
//!
//! * **definite** – the simulation attributed a recorded detector hit to the photon
//!   ([`PhotonRecord::hit_detector`]);
//! * **indefinite** – a step's process says the photon reached a photocathode, with no
//!   confirmation it triggered anything ([`PhotonRecord::detector_hits`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{MeV, Millimeter, Nanosecond, Position, TrackId};

pub mod extract;

pub use extract::extract_photon;

/// A position and the global time at which the photon was there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacetimePoint {
    pub position: Position,
    pub time: Nanosecond,
}

impl SpacetimePoint {
    pub fn new(position: Position, time: Nanosecond) -> Self {
        SpacetimePoint { position, time }
    }
}

impl fmt::Display for SpacetimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.3}, {:.3}, {:.3}) mm @ {:.4} ns",
            self.position.x, self.position.y, self.position.z, self.time
        )
    }
}

/// Per-photon output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotonRecord {
    /// Index of the simulation event the photon belongs to.
    pub event_index: usize,
    /// Identifier of the reconstructed track the photon was extracted from.
    pub track_id: TrackId,
    pub parent_id: TrackId,
    pub birth_position: Position,
    pub birth_time: Nanosecond,
    pub birth_energy: MeV,
    /// Cumulative track length \[mm\].
    pub total_length: Millimeter,
    pub is_cerenkov: bool,
    pub is_scintillation: bool,
    pub is_reemitted: bool,
    /// Definite hit: the event's hit reports attribute a detector hit to this photon.
    pub hit_detector: bool,
    pub reemissions: u32,
    /// Total-internal-reflection points, in track order.
    pub reflections: Vec<SpacetimePoint>,
    /// Indefinite hits: steps whose process marks a photocathode, in track order.
    pub detector_hits: Vec<SpacetimePoint>,
}

impl PhotonRecord {
    /// Empty record for a track of `event_index`.
    pub fn new(event_index: usize, track_id: TrackId, parent_id: TrackId) -> Self {
        PhotonRecord {
            event_index,
            track_id,
            parent_id,
            birth_position: Position::zeros(),
            birth_time: 0.0,
            birth_energy: 0.0,
            total_length: 0.0,
            is_cerenkov: false,
            is_scintillation: false,
            is_reemitted: false,
            hit_detector: false,
            reemissions: 0,
            reflections: Vec::new(),
            detector_hits: Vec::new(),
        }
    }

    /// Distance of the birth point from the detector centre \[mm\].
    pub fn birth_radius(&self) -> Millimeter {
        self.birth_position.norm()
    }

    pub fn reflected(&self) -> bool {
        !self.reflections.is_empty()
    }

    pub fn reflection_count(&self) -> usize {
        self.reflections.len()
    }

    pub fn reflection(&self, i: usize) -> Option<&SpacetimePoint> {
        self.reflections.get(i)
    }

    pub fn first_reflection(&self) -> Option<&SpacetimePoint> {
        self.reflections.first()
    }

    pub fn last_reflection(&self) -> Option<&SpacetimePoint> {
        self.reflections.last()
    }

    pub fn indefinite_hit(&self) -> bool {
        !self.detector_hits.is_empty()
    }

    pub fn definite_hit(&self) -> bool {
        self.hit_detector
    }

    pub fn detector_hit(&self, i: usize) -> Option<&SpacetimePoint> {
        self.detector_hits.get(i)
    }

    pub fn first_detector_hit(&self) -> Option<&SpacetimePoint> {
        self.detector_hits.first()
    }
}

impl fmt::Display for PhotonRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = if self.is_cerenkov {
            "cerenkov"
        } else if self.is_scintillation {
            "scintillation"
        } else {
            "other"
        };
        write!(
            f,
            "event {} track {} (parent {}): {origin}, born {}, {:.3} MeV, {:.3} mm, \
             {} reemissions, {} reflections, {} indefinite hits, definite hit: {}",
            self.event_index,
            self.track_id,
            self.parent_id,
            SpacetimePoint::new(self.birth_position, self.birth_time),
            self.birth_energy,
            self.total_length,
            self.reemissions,
            self.reflection_count(),
            self.detector_hits.len(),
            self.hit_detector
        )
    }
}
