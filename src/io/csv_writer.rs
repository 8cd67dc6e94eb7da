//! # CSV photon writer
//!
//! One row per [`PhotonRecord`]. Scalar fields map to one column each; the reflection and
//! indefinite-hit lists are stored in a single column each, as space-separated `x y z t`
//! groups joined by `;` (empty when the list is empty). Counts of both lists get their own
//! column so the file can be histogrammed without parsing the groups.
//!
//! Columns: `event, track_id, parent_id, birth_x, birth_y, birth_z, birth_time, birth_energy,
//! birth_radius, total_length, is_cerenkov, is_scintillation, is_reemitted, hit_detector,
//! reemissions, reflection_count, reflections, detector_hit_count, detector_hits`.

use std::fs::File;
use std::io::Write;

use camino::Utf8Path;
use itertools::Itertools;
use serde::Serialize;

use crate::constants::{MeV, Millimeter, Nanosecond, TrackId};
use crate::optrack_errors::OptrackError;
use crate::photon::{PhotonRecord, SpacetimePoint};

use super::PhotonSink;

#[derive(Debug, Serialize)]
struct PhotonRow {
    event: usize,
    track_id: TrackId,
    parent_id: TrackId,
    birth_x: Millimeter,
    birth_y: Millimeter,
    birth_z: Millimeter,
    birth_time: Nanosecond,
    birth_energy: MeV,
    birth_radius: Millimeter,
    total_length: Millimeter,
    is_cerenkov: bool,
    is_scintillation: bool,
    is_reemitted: bool,
    hit_detector: bool,
    reemissions: u32,
    reflection_count: usize,
    reflections: String,
    detector_hit_count: usize,
    detector_hits: String,
}

impl From<&PhotonRecord> for PhotonRow {
    fn from(photon: &PhotonRecord) -> Self {
        PhotonRow {
            event: photon.event_index,
            track_id: photon.track_id,
            parent_id: photon.parent_id,
            birth_x: photon.birth_position.x,
            birth_y: photon.birth_position.y,
            birth_z: photon.birth_position.z,
            birth_time: photon.birth_time,
            birth_energy: photon.birth_energy,
            birth_radius: photon.birth_radius(),
            total_length: photon.total_length,
            is_cerenkov: photon.is_cerenkov,
            is_scintillation: photon.is_scintillation,
            is_reemitted: photon.is_reemitted,
            hit_detector: photon.hit_detector,
            reemissions: photon.reemissions,
            reflection_count: photon.reflections.len(),
            reflections: encode_points(&photon.reflections),
            detector_hit_count: photon.detector_hits.len(),
            detector_hits: encode_points(&photon.detector_hits),
        }
    }
}

/// Encode a list of points as `x y z t;x y z t;…`.
pub fn encode_points(points: &[SpacetimePoint]) -> String {
    points
        .iter()
        .map(|p| {
            format!(
                "{} {} {} {}",
                p.position.x, p.position.y, p.position.z, p.time
            )
        })
        .join(";")
}

/// Photon sink writing CSV rows to any [`Write`] target.
pub struct CsvPhotonWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl CsvPhotonWriter<File> {
    /// Create (or truncate) the CSV file at `path`.
    pub fn create(path: &Utf8Path) -> Result<Self, OptrackError> {
        let file = File::create(path)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvPhotonWriter<W> {
    pub fn from_writer(inner: W) -> Self {
        CsvPhotonWriter {
            writer: csv::Writer::from_writer(inner),
            rows: 0,
        }
    }

    /// Number of rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and give back the underlying writer.
    pub fn into_inner(self) -> Result<W, OptrackError> {
        self.writer
            .into_inner()
            .map_err(|err| OptrackError::IoError(err.into_error()))
    }
}

impl<W: Write> PhotonSink for CsvPhotonWriter<W> {
    fn write_record(&mut self, photon: &PhotonRecord) -> Result<(), OptrackError> {
        self.writer.serialize(PhotonRow::from(photon))?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), OptrackError> {
        self.writer.flush()?;
        Ok(())
    }
}
