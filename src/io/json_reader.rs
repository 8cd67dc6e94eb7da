//! # JSON event files
//!
//! A whole run stored as a single JSON document:
//!
//! ```json
//! {
//!   "events": [
//!     {
//!       "tracks": [
//!         {
//!           "track_id": 1, "parent_id": 0, "particle_name": "opticalphoton", "length": 12.5,
//!           "steps": [
//!             { "endpoint": [0.0, 0.0, 0.0], "global_time": 0.0, "process": "Cerenkov",
//!               "volume": "scint", "status": "Undefined", "kinetic_energy": 3.1e-6 },
//!             { "endpoint": [0.0, 0.0, 12.5], "global_time": 0.06, "process": "Transportation",
//!               "length": 12.5, "volume": "scint", "end_volume": "acrylic", "status": "GeomBoundary" }
//!           ]
//!         }
//!       ],
//!       "hits": [ { "pmt": 17, "track_id": 1 } ]
//!     }
//!   ]
//! }
//! ```
//!
//! Step fields other than `endpoint`, `global_time` and `process` are optional. The file is
//! decoded eagerly; events are handed out as owned snapshots.

use std::fs::File;
use std::io::{BufReader, Read};

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::optrack_errors::OptrackError;

use super::{EventSource, SimEvent};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct EventFile {
    events: Vec<SimEvent>,
}

/// Event source backed by a decoded JSON document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonEventFile {
    events: Vec<SimEvent>,
}

impl JsonEventFile {
    /// Decode the event file at `path`.
    ///
    /// Return
    /// ----------
    /// * `Err(OptrackError::InputFileNotFound)` if nothing exists at `path`.
    /// * `Err(OptrackError::JsonError)` if the document does not match the layout above.
    pub fn open(path: &Utf8Path) -> Result<Self, OptrackError> {
        if !path.exists() {
            return Err(OptrackError::InputFileNotFound(path.to_string()));
        }
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, OptrackError> {
        let decoded: EventFile = serde_json::from_reader(reader)?;
        Ok(JsonEventFile {
            events: decoded.events,
        })
    }

    pub fn from_events(events: Vec<SimEvent>) -> Self {
        JsonEventFile { events }
    }

    /// Encode the events back into the file layout.
    pub fn to_json_string(&self) -> Result<String, OptrackError> {
        let file = EventFile {
            events: self.events.clone(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }
}

impl EventSource for JsonEventFile {
    fn event_count(&self) -> usize {
        self.events.len()
    }

    fn event(&mut self, index: usize) -> Result<SimEvent, OptrackError> {
        self.events.event(index)
    }
}
