pub mod constants;
pub mod io;
pub mod optrack_errors;
pub mod photon;
pub mod pipeline;
pub mod reconstruction;
pub mod tracks;

#[cfg(feature = "progress")]
pub(crate) mod progress_bar;

pub use io::{CsvPhotonWriter, EventSource, JsonEventFile, PhotonSink, SimEvent};
pub use optrack_errors::OptrackError;
pub use photon::{extract_photon, PhotonRecord};
pub use pipeline::{process_event, process_events, EventSummary, RunSummary};
pub use reconstruction::{reconstruct, join_tracks, ReconstructionParams};
pub use tracks::{StepRecord, StepStatus, TrackFragment};
