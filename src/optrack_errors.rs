use thiserror::Error;

use crate::constants::TrackId;

#[derive(Error, Debug)]
pub enum OptrackError {
    #[error("Track identifier {id} is outside the event's track domain 1..={domain}")]
    OutOfRangeIdentifier { id: TrackId, domain: usize },

    #[error("Track {0} has no steps")]
    EmptyTrack(TrackId),

    #[error("Track {0} only holds its birth step")]
    SingleStepTrack(TrackId),

    #[error("Cannot join an empty list of tracks")]
    EmptyChain,

    #[error("No file with the name {0} exists")]
    InputFileNotFound(String),

    #[error("Event index {index} out of range (file holds {total} events)")]
    EventOutOfRange { index: usize, total: usize },

    #[error("Invalid reconstruction parameter: {0}")]
    InvalidParameter(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON decoding error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV encoding error: {0}")]
    CsvError(#[from] csv::Error),
}

impl PartialEq for OptrackError {
    fn eq(&self, other: &Self) -> bool {
        use OptrackError::*;
        match (self, other) {
            (
                OutOfRangeIdentifier { id: a, domain: da },
                OutOfRangeIdentifier { id: b, domain: db },
            ) => a == b && da == db,
            (EmptyTrack(a), EmptyTrack(b)) => a == b,
            (SingleStepTrack(a), SingleStepTrack(b)) => a == b,
            (InputFileNotFound(a), InputFileNotFound(b)) => a == b,
            (
                EventOutOfRange { index: a, total: ta },
                EventOutOfRange { index: b, total: tb },
            ) => a == b && ta == tb,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,

            // Wrapped codec errors are not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,
            (JsonError(_), JsonError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            (EmptyChain, EmptyChain) => true,

            _ => false,
        }
    }
}
