//! # Tabular display for track fragments
//!
//! [`TracksDisplay`] borrows a set of fragments and renders every step of every fragment as a
//! `comfy-table` table when formatted with `{}`. The pipeline uses it to dump an event's
//! fragments before and after joining at `trace` log level.
//!
//! ```rust
//! use optrack::tracks::{StepRecord, TrackFragment, TracksDisplay};
//! use optrack::constants::Position;
//!
//! let track = TrackFragment::from_steps(
//!     1,
//!     0,
//!     "opticalphoton",
//!     [StepRecord::new(Position::zeros(), 0.0, "Cerenkov")],
//! );
//! let table = TracksDisplay::new([&track]).to_string();
//! assert!(table.contains("Cerenkov"));
//! ```

use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};

use super::fragment::TrackFragment;

/// Borrowing display adaptor over a list of fragments.
pub struct TracksDisplay<'a> {
    tracks: Vec<&'a TrackFragment>,
}

impl<'a> TracksDisplay<'a> {
    pub fn new(tracks: impl IntoIterator<Item = &'a TrackFragment>) -> Self {
        TracksDisplay {
            tracks: tracks.into_iter().collect(),
        }
    }
}

fn num_cell(value: f64, precision: usize) -> Cell {
    Cell::new(format!("{value:.precision$}")).set_alignment(CellAlignment::Right)
}

impl fmt::Display for TracksDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                "Track", "Parent", "Step", "Process", "Volume", "Status", "X [mm]", "Y [mm]",
                "Z [mm]", "T [ns]", "KE [MeV]",
            ]);

        for track in &self.tracks {
            for (i, step) in track.steps.iter().enumerate() {
                let mut row = Row::new();
                row.add_cell(Cell::new(track.track_id).set_alignment(CellAlignment::Right))
                    .add_cell(Cell::new(track.parent_id).set_alignment(CellAlignment::Right))
                    .add_cell(Cell::new(i).set_alignment(CellAlignment::Right))
                    .add_cell(Cell::new(&step.process))
                    .add_cell(Cell::new(&step.volume))
                    .add_cell(Cell::new(step.status))
                    .add_cell(num_cell(step.endpoint.x, 3))
                    .add_cell(num_cell(step.endpoint.y, 3))
                    .add_cell(num_cell(step.endpoint.z, 3))
                    .add_cell(num_cell(step.global_time, 4))
                    .add_cell(num_cell(step.kinetic_energy, 9));
                table.add_row(row);
            }
        }

        write!(f, "{table}")
    }
}
