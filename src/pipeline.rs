//! # Event and run drivers
//!
//! Glue between the [`io`](crate::io) collaborators and the reconstruction core.
//!
//! Per event ([`process_event`])
//! -----------------
//! 1. Build the fragment index and hit-flag table ([`build_index`]).
//! 2. In [`AnalysisMode::Joined`], collapse every parent/child chain ([`reconstruct`]).
//! 3. Walk the surviving tracks in index order, apply the single-step policy, extract one
//!    [`PhotonRecord`] per track and hand it to the sink immediately.
//!
//! Per run ([`process_events`])
//! -----------------
//! Events are processed one after the other in index order; the sink is finished once the
//! last event is done. The first error aborts the run, nothing is recovered here.
//!
//! With the `progress` feature a progress bar reports the per-event timing.

use std::fmt;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use log::{debug, info, log_enabled, trace, Level};

use crate::io::{EventSource, PhotonSink, SimEvent};
use crate::optrack_errors::OptrackError;
use crate::photon::extract_photon;
use crate::reconstruction::fragment_index::build_index;
use crate::reconstruction::{
    reconstruct, AnalysisMode, ReconstructionParams, SingleStepPolicy,
};
use crate::tracks::TracksDisplay;

#[cfg(feature = "progress")]
use crate::progress_bar::{fmt_duration, EventTimer};
#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "progress")]
use std::time::Duration;

/// Diagnostics of one processed event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventSummary {
    pub event_index: usize,
    /// All tracks of the event, every species included.
    pub track_count: usize,
    /// Indexed fragments of the species of interest.
    pub fragments: usize,
    pub hit_reports: usize,
    /// Hit flags set after the reports were applied.
    pub hits_before: usize,
    /// Hit flags set once every chain was collapsed.
    pub hits_after: usize,
    pub merges: usize,
    pub emitted: usize,
    pub skipped: usize,
}

/// Diagnostics aggregated over a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub events: usize,
    pub track_count: usize,
    pub fragments: usize,
    pub hit_reports: usize,
    pub hits_before: usize,
    pub hits_after: usize,
    pub merges: usize,
    pub emitted: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn add(&mut self, event: &EventSummary) {
        self.events += 1;
        self.track_count += event.track_count;
        self.fragments += event.fragments;
        self.hit_reports += event.hit_reports;
        self.hits_before += event.hits_before;
        self.hits_after += event.hits_after;
        self.merges += event.merges;
        self.emitted += event.emitted;
        self.skipped += event.skipped;
    }
}

impl<'a> FromIterator<&'a EventSummary> for RunSummary {
    fn from_iter<I: IntoIterator<Item = &'a EventSummary>>(iter: I) -> Self {
        let mut run = RunSummary::default();
        for event in iter {
            run.add(event);
        }
        run
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![Cell::new("Run summary"), Cell::new("")]);

        let rows = [
            ("Events", self.events),
            ("Tracks (all species)", self.track_count),
            ("Indexed fragments", self.fragments),
            ("Hit reports", self.hit_reports),
            ("Hit flags before joining", self.hits_before),
            ("Hit flags after joining", self.hits_after),
            ("Chains joined", self.merges),
            ("Photons written", self.emitted),
            ("Tracks skipped", self.skipped),
        ];
        for (label, value) in rows {
            table.add_row(vec![Cell::new(label), Cell::new(value)]);
        }
        write!(f, "{table}")
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

/// Reconstruct one event and write its photons to `sink`.
///
/// Arguments
/// -----------------
/// * `event` – snapshot of the event.
/// * `event_index` – copied into every emitted record.
/// * `params` – analysis mode, single-step policy and markers.
/// * `sink` – receives the photons in index order.
///
/// Return
/// ----------
/// * The [`EventSummary`] of the event.
/// * `Err(OptrackError::OutOfRangeIdentifier)` if a hit report or a chained track has no
///   hit-flag slot.
/// * `Err(OptrackError::SingleStepTrack)` if a one-step track survives under
///   [`SingleStepPolicy::Reject`].
/// * `Err(OptrackError::EmptyTrack)` if a track holds no step.
pub fn process_event<S: PhotonSink + ?Sized>(
    event: &SimEvent,
    event_index: usize,
    params: &ReconstructionParams,
    sink: &mut S,
) -> Result<EventSummary, OptrackError> {
    let hit_reports = event.hit_track_ids();
    let (mut index, mut flags) = build_index(
        &event.tracks,
        &hit_reports,
        &params.species,
        params.hit_flag_update,
    )?;

    let mut summary = EventSummary {
        event_index,
        track_count: event.track_count(),
        fragments: index.len(),
        hit_reports: hit_reports.len(),
        hits_before: flags.count(),
        ..EventSummary::default()
    };

    info!(
        "event {event_index}: {} {} fragments ({:.1}% of {} tracks), {} hit reports, {} hit flags",
        summary.fragments,
        params.species,
        percent(summary.fragments, summary.track_count),
        summary.track_count,
        summary.hit_reports,
        summary.hits_before,
    );

    if log_enabled!(Level::Trace) {
        trace!("event {event_index} before joining:\n{}", TracksDisplay::new(index.iter()));
    }

    if params.mode == AnalysisMode::Joined {
        let stats = reconstruct(&mut index, &mut flags)?;
        summary.merges = stats.merges;
        if log_enabled!(Level::Trace) {
            trace!("event {event_index} after joining:\n{}", TracksDisplay::new(index.iter()));
        }
    }
    summary.hits_after = flags.count();
    debug!("event {event_index}: {} reconstructed tracks", index.len());

    let policy = params.effective_single_step();
    for track in index.iter() {
        if track.step_count() == 1 {
            match policy {
                SingleStepPolicy::Keep => {}
                SingleStepPolicy::Skip => {
                    summary.skipped += 1;
                    continue;
                }
                SingleStepPolicy::Reject => {
                    return Err(OptrackError::SingleStepTrack(track.track_id))
                }
            }
        }

        let hit = flags.get(track.track_id)?;
        let photon = extract_photon(track, hit, event_index, params)?;
        sink.write_record(&photon)?;
        summary.emitted += 1;
    }

    Ok(summary)
}

/// Process every event of `source` in index order.
#[cfg(not(feature = "progress"))]
pub fn process_events<E, S>(
    source: &mut E,
    params: &ReconstructionParams,
    sink: &mut S,
) -> Result<RunSummary, OptrackError>
where
    E: EventSource + ?Sized,
    S: PhotonSink + ?Sized,
{
    let mut run = RunSummary::default();
    for event_index in 0..source.event_count() {
        let event = source.event(event_index)?;
        run.add(&process_event(&event, event_index, params, sink)?);
    }
    sink.finish()?;
    Ok(run)
}

/// Process every event of `source` in index order, with a progress bar.
#[cfg(feature = "progress")]
pub fn process_events<E, S>(
    source: &mut E,
    params: &ReconstructionParams,
    sink: &mut S,
) -> Result<RunSummary, OptrackError>
where
    E: EventSource + ?Sized,
    S: PhotonSink + ?Sized,
{
    let total = source.event_count();
    let pb = ProgressBar::new((total as u64).max(1));
    if let Ok(style) = ProgressStyle::with_template(
        "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {per_sec} | ETA {eta_precise} | {msg}",
    ) {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(200));

    let mut run = RunSummary::default();
    let mut timer = EventTimer::new(0.2);

    for event_index in 0..total {
        let last = timer.tick();
        pb.set_message(format!(
            "last: {}, avg: {}",
            fmt_duration(last),
            fmt_duration(timer.average())
        ));

        let event = source.event(event_index)?;
        run.add(&process_event(&event, event_index, params, sink)?);

        pb.inc(1);
    }

    pb.disable_steady_tick();
    pb.finish_and_clear();
    sink.finish()?;
    Ok(run)
}
