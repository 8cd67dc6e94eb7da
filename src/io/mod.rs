//! # Input and output collaborators
//!
//! The reconstruction core never touches files directly. It reads events through an
//! [`EventSource`] and hands every finished [`PhotonRecord`] to a [`PhotonSink`].
//!
//! Modules
//! -----------------
//! * [`json_reader`](crate::io::json_reader) – [`JsonEventFile`], events stored as one JSON document.
//! * [`csv_writer`](crate::io::csv_writer) – [`CsvPhotonWriter`], one CSV row per photon.
//!
//! Data Model
//! -----------------
//! * [`SimEvent`] – every track fragment of one simulation event (all species) plus the
//!   detector-hit reports of that event.
//! * [`HitReport`] – one detected photon: the detector channel and the responsible track.
//!
//! An in-memory `Vec<SimEvent>` is an [`EventSource`] and an in-memory `Vec<PhotonRecord>`
//! is a [`PhotonSink`], which is what the tests use.

use serde::{Deserialize, Serialize};

use crate::constants::TrackId;
use crate::optrack_errors::OptrackError;
use crate::photon::PhotonRecord;
use crate::tracks::TrackFragment;

pub mod csv_writer;
pub mod json_reader;

pub use csv_writer::CsvPhotonWriter;
pub use json_reader::JsonEventFile;

/// A detector hit attributed to a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitReport {
    /// Detector channel that recorded the hit.
    #[serde(default)]
    pub pmt: u32,
    pub track_id: TrackId,
}

/// Read-only snapshot of one simulation event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimEvent {
    /// All track fragments of the event, every species included.
    pub tracks: Vec<TrackFragment>,
    #[serde(default)]
    pub hits: Vec<HitReport>,
}

impl SimEvent {
    pub fn new(tracks: Vec<TrackFragment>, hits: Vec<HitReport>) -> Self {
        SimEvent { tracks, hits }
    }

    /// Number of tracks of the event before any species filtering.
    #[inline]
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Identifier named by each hit report, in report order.
    pub fn hit_track_ids(&self) -> Vec<TrackId> {
        self.hits.iter().map(|hit| hit.track_id).collect()
    }
}

/// Source of simulation events, read in index order.
pub trait EventSource {
    /// Total number of events available.
    fn event_count(&self) -> usize;

    /// Snapshot of event `index`.
    ///
    /// Return
    /// ----------
    /// * `Err(OptrackError::EventOutOfRange)` if `index >= event_count()`.
    fn event(&mut self, index: usize) -> Result<SimEvent, OptrackError>;
}

impl EventSource for Vec<SimEvent> {
    fn event_count(&self) -> usize {
        self.len()
    }

    fn event(&mut self, index: usize) -> Result<SimEvent, OptrackError> {
        self.get(index)
            .cloned()
            .ok_or(OptrackError::EventOutOfRange {
                index,
                total: self.len(),
            })
    }
}

/// Destination of reconstructed photons, fed in the order photons are finalized.
pub trait PhotonSink {
    fn write_record(&mut self, photon: &PhotonRecord) -> Result<(), OptrackError>;

    /// Flush anything buffered. Called once after the last event.
    fn finish(&mut self) -> Result<(), OptrackError> {
        Ok(())
    }
}

impl PhotonSink for Vec<PhotonRecord> {
    fn write_record(&mut self, photon: &PhotonRecord) -> Result<(), OptrackError> {
        self.push(photon.clone());
        Ok(())
    }
}
