//! # Step records
//!
//! A [`StepRecord`] is one segment of a particle trajectory, described "looking backwards":
//! every field refers to the **endpoint** of the segment. The very first step of a track is a
//! zero-length step holding the birth point.

use serde::{Deserialize, Serialize};

use crate::constants::{MeV, Millimeter, Nanosecond, Position};

/// Reason the transport engine ended a step.
///
/// Encoded on disk with the engine's own status names. Any unrecognised name decodes to
/// [`StepStatus::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StepStatus {
    /// The step reached the world boundary.
    WorldBoundary,
    /// The step reached a geometry boundary.
    GeomBoundary,
    /// Step defined by an at-rest process.
    AtRestDoItProc,
    /// Step defined by a continuous process.
    AlongStepDoItProc,
    /// Step defined by a discrete process.
    PostStepDoItProc,
    /// Step limited by the user step limit of the logical volume.
    UserDefinedLimit,
    /// Step defined by an exclusively forced process.
    ExclusivelyForcedProc,
    /// Step not defined yet.
    #[default]
    Undefined,
    Unknown,
}

impl From<String> for StepStatus {
    fn from(name: String) -> Self {
        match name.as_str() {
            "WorldBoundary" => StepStatus::WorldBoundary,
            "GeomBoundary" => StepStatus::GeomBoundary,
            "AtRestDoItProc" => StepStatus::AtRestDoItProc,
            "AlongStepDoItProc" => StepStatus::AlongStepDoItProc,
            "PostStepDoItProc" => StepStatus::PostStepDoItProc,
            "UserDefinedLimit" => StepStatus::UserDefinedLimit,
            "ExclusivelyForcedProc" => StepStatus::ExclusivelyForcedProc,
            "Undefined" => StepStatus::Undefined,
            _ => StepStatus::Unknown,
        }
    }
}

impl From<StepStatus> for String {
    fn from(status: StepStatus) -> Self {
        status.as_str().to_string()
    }
}

impl StepStatus {
    /// Name used by the transport engine for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::WorldBoundary => "WorldBoundary",
            StepStatus::GeomBoundary => "GeomBoundary",
            StepStatus::AtRestDoItProc => "AtRestDoItProc",
            StepStatus::AlongStepDoItProc => "AlongStepDoItProc",
            StepStatus::PostStepDoItProc => "PostStepDoItProc",
            StepStatus::UserDefinedLimit => "UserDefinedLimit",
            StepStatus::ExclusivelyForcedProc => "ExclusivelyForcedProc",
            StepStatus::Undefined => "Undefined",
            StepStatus::Unknown => "Unknown",
        }
    }

    #[inline]
    pub fn is_geom_boundary(&self) -> bool {
        matches!(self, StepStatus::GeomBoundary)
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One segment of a track, immutable once produced upstream.
///
/// Fields
/// -----------------
/// * `length` – length of this segment \[mm\]; zero for the birth step.
/// * `endpoint` – position of the segment endpoint \[mm\].
/// * `global_time` – time since the start of the event, lab frame \[ns\].
/// * `local_time` – time since the start of the track, lab frame \[ns\].
/// * `proper_time` – time since the start of the track, particle frame \[ns\].
/// * `momentum` – momentum at the endpoint \[MeV/c\].
/// * `kinetic_energy` – kinetic energy at the endpoint \[MeV\].
/// * `process` – physics process acting at the endpoint.
/// * `volume` – detector volume in which the segment took place.
/// * `end_volume` – detector volume holding the endpoint; falls back to `volume` when absent.
/// * `status` – why the engine ended the segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    #[serde(default)]
    pub length: Millimeter,
    pub endpoint: Position,
    pub global_time: Nanosecond,
    #[serde(default)]
    pub local_time: Nanosecond,
    #[serde(default)]
    pub proper_time: Nanosecond,
    #[serde(default = "Position::zeros")]
    pub momentum: Position,
    #[serde(default)]
    pub kinetic_energy: MeV,
    pub process: String,
    #[serde(default)]
    pub volume: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_volume: Option<String>,
    #[serde(default)]
    pub status: StepStatus,
}

impl Default for StepRecord {
    fn default() -> Self {
        StepRecord {
            length: 0.0,
            endpoint: Position::zeros(),
            global_time: 0.0,
            local_time: 0.0,
            proper_time: 0.0,
            momentum: Position::zeros(),
            kinetic_energy: 0.0,
            process: String::new(),
            volume: String::new(),
            end_volume: None,
            status: StepStatus::Undefined,
        }
    }
}

impl StepRecord {
    /// Build a step from its endpoint, global time and process name; every other field
    /// takes its default and can be filled with the `with_*` helpers.
    pub fn new(endpoint: Position, global_time: Nanosecond, process: impl Into<String>) -> Self {
        StepRecord {
            endpoint,
            global_time,
            process: process.into(),
            ..Default::default()
        }
    }

    pub fn with_length(mut self, length: Millimeter) -> Self {
        self.length = length;
        self
    }

    pub fn with_kinetic_energy(mut self, kinetic_energy: MeV) -> Self {
        self.kinetic_energy = kinetic_energy;
        self
    }

    pub fn with_volume(mut self, volume: impl Into<String>) -> Self {
        self.volume = volume.into();
        self
    }

    pub fn with_end_volume(mut self, end_volume: impl Into<String>) -> Self {
        self.end_volume = Some(end_volume.into());
        self
    }

    pub fn with_status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }

    /// Volume holding the endpoint of this step.
    pub fn end_volume(&self) -> &str {
        self.end_volume.as_deref().unwrap_or(&self.volume)
    }
}

#[cfg(test)]
mod step_tests {
    use super::*;

    #[test]
    fn test_end_volume_falls_back_to_volume() {
        let step = StepRecord::new(Position::zeros(), 0.0, "Transportation").with_volume("av");
        assert_eq!(step.end_volume(), "av");

        let step = step.with_end_volume("cavity");
        assert_eq!(step.end_volume(), "cavity");
        assert_eq!(step.volume, "av");
    }

    #[test]
    fn test_status_decodes_engine_names() {
        let status: StepStatus = serde_json::from_str("\"GeomBoundary\"").unwrap();
        assert_eq!(status, StepStatus::GeomBoundary);
        assert!(status.is_geom_boundary());

        let status: StepStatus = serde_json::from_str("\"SomethingNew\"").unwrap();
        assert_eq!(status, StepStatus::Unknown);
        assert_eq!(StepStatus::UserDefinedLimit.to_string(), "UserDefinedLimit");
    }

    #[test]
    fn test_step_decodes_with_defaults() {
        let json = r#"{"endpoint": [1.0, 2.0, 3.0], "global_time": 4.5, "process": "Cerenkov"}"#;
        let step: StepRecord = serde_json::from_str(json).unwrap();
        assert_eq!(step.endpoint, Position::new(1.0, 2.0, 3.0));
        assert_eq!(step.status, StepStatus::Undefined);
        assert_eq!(step.length, 0.0);
        assert_eq!(step.end_volume(), "");
    }
}
