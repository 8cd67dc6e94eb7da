//! # Fragment index and hit-flag table
//!
//! Per-event data preparation for the chain collapse:
//!
//! * [`FragmentIndex`] – ordered map `TrackId → TrackFragment` restricted to the species of
//!   interest. Ordering matters: the collapse scans from the highest identifier downward and
//!   photons are emitted in ascending identifier order.
//! * [`HitFlags`] – one boolean per track identifier of the **unfiltered** event, set from
//!   the detector-hit reports.
//!
//! Identifiers are 1-based; slot `id - 1` of the flag table belongs to `id`. Any identifier
//! outside `1..=domain` is reported as [`OptrackError::OutOfRangeIdentifier`].

use std::collections::btree_map::{self, BTreeMap};

use crate::constants::TrackId;
use crate::optrack_errors::OptrackError;
use crate::tracks::TrackFragment;

use super::HitFlagUpdate;

/// Ordered lookup from track identifier to fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FragmentIndex {
    tracks: BTreeMap<TrackId, TrackFragment>,
}

impl FragmentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every fragment whose particle name equals `species`.
    ///
    /// Fragments of other species are dropped. A repeated identifier keeps the first
    /// fragment seen; duplicates are an upstream data fault and are not reported.
    pub fn from_fragments<'a>(
        fragments: impl IntoIterator<Item = &'a TrackFragment>,
        species: &str,
    ) -> Self {
        let mut index = FragmentIndex::new();
        for track in fragments
            .into_iter()
            .filter(|t| t.particle_name == species)
        {
            index.insert_if_absent(track.clone());
        }
        index
    }

    /// Insert a fragment under its own identifier unless the identifier is taken.
    ///
    /// Returns `true` when the fragment was inserted.
    pub fn insert_if_absent(&mut self, track: TrackFragment) -> bool {
        match self.tracks.entry(track.track_id) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(track);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    #[inline]
    pub fn get(&self, id: TrackId) -> Option<&TrackFragment> {
        self.tracks.get(&id)
    }

    #[inline]
    pub fn contains(&self, id: TrackId) -> bool {
        self.tracks.contains_key(&id)
    }

    #[inline]
    pub fn remove(&mut self, id: TrackId) -> Option<TrackFragment> {
        self.tracks.remove(&id)
    }

    /// Indexed identifiers in ascending order.
    pub fn ids(&self) -> Vec<TrackId> {
        self.tracks.keys().copied().collect()
    }

    /// Fragments in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackFragment> {
        self.tracks.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Total number of steps over all indexed fragments.
    pub fn total_steps(&self) -> usize {
        self.tracks.values().map(TrackFragment::step_count).sum()
    }

    /// True when no indexed fragment names an indexed parent.
    pub fn is_fully_joined(&self) -> bool {
        self.tracks
            .values()
            .all(|t| !self.tracks.contains_key(&t.parent_id))
    }
}

/// Per-identifier "caused a detector hit" table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitFlags {
    flags: Vec<bool>,
}

impl HitFlags {
    /// All-false table for identifiers `1..=domain`.
    pub fn new(domain: usize) -> Self {
        HitFlags {
            flags: vec![false; domain],
        }
    }

    /// Build the table from the identifiers named by the event's hit reports.
    ///
    /// With [`HitFlagUpdate::Toggle`] each report flips its flag, so an identifier reported
    /// twice ends up unset.
    pub fn from_reports<'a>(
        domain: usize,
        reports: impl IntoIterator<Item = &'a TrackId>,
        update: HitFlagUpdate,
    ) -> Result<Self, OptrackError> {
        let mut flags = HitFlags::new(domain);
        for &id in reports {
            match update {
                HitFlagUpdate::Toggle => flags.flip(id)?,
                HitFlagUpdate::Set => flags.set(id, true)?,
            }
        }
        Ok(flags)
    }

    fn slot(&self, id: TrackId) -> Result<usize, OptrackError> {
        let domain = self.flags.len();
        (id as usize)
            .checked_sub(1)
            .filter(|&slot| slot < domain)
            .ok_or(OptrackError::OutOfRangeIdentifier { id, domain })
    }

    pub fn get(&self, id: TrackId) -> Result<bool, OptrackError> {
        let slot = self.slot(id)?;
        Ok(self.flags[slot])
    }

    pub fn set(&mut self, id: TrackId, value: bool) -> Result<(), OptrackError> {
        let slot = self.slot(id)?;
        self.flags[slot] = value;
        Ok(())
    }

    pub fn flip(&mut self, id: TrackId) -> Result<(), OptrackError> {
        let slot = self.slot(id)?;
        self.flags[slot] = !self.flags[slot];
        Ok(())
    }

    /// Number of identifiers the table covers.
    #[inline]
    pub fn domain(&self) -> usize {
        self.flags.len()
    }

    /// Number of identifiers currently flagged.
    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&hit| hit).count()
    }

    /// Flagged identifiers in ascending order.
    pub fn hit_ids(&self) -> Vec<TrackId> {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, hit)| **hit)
            .map(|(slot, _)| slot as TrackId + 1)
            .collect()
    }
}

/// Build the fragment index and hit-flag table of one event.
///
/// Arguments
/// -----------------
/// * `fragments` – every track of the event, all species included. Its length is the
///   identifier domain of the hit-flag table.
/// * `hit_reports` – identifier of the track behind each detector-hit report.
/// * `species` – particle species to index.
/// * `update` – how a report updates its flag.
///
/// Return
/// ----------
/// * `Err(OptrackError::OutOfRangeIdentifier)` if a report names an identifier outside the
///   event's track domain.
pub fn build_index(
    fragments: &[TrackFragment],
    hit_reports: &[TrackId],
    species: &str,
    update: HitFlagUpdate,
) -> Result<(FragmentIndex, HitFlags), OptrackError> {
    let index = FragmentIndex::from_fragments(fragments, species);
    let flags = HitFlags::from_reports(fragments.len(), hit_reports, update)?;
    Ok((index, flags))
}

#[cfg(test)]
mod index_tests {
    use super::*;
    use crate::constants::{Position, OPTICAL_PHOTON};
    use crate::tracks::StepRecord;

    fn track(id: TrackId, parent: TrackId, species: &str) -> TrackFragment {
        TrackFragment::from_steps(
            id,
            parent,
            species,
            [StepRecord::new(Position::zeros(), id as f64, "start")],
        )
    }

    #[test]
    fn test_index_keeps_species_of_interest_only() {
        let fragments = vec![
            track(1, 0, "e-"),
            track(2, 1, OPTICAL_PHOTON),
            track(3, 1, "gamma"),
            track(4, 2, OPTICAL_PHOTON),
        ];
        let (index, flags) =
            build_index(&fragments, &[], OPTICAL_PHOTON, HitFlagUpdate::Toggle).unwrap();

        assert_eq!(index.ids(), vec![2, 4]);
        assert_eq!(flags.domain(), 4);
        assert_eq!(flags.count(), 0);
        assert!(!index.is_fully_joined());
    }

    #[test]
    fn test_duplicate_identifier_keeps_first() {
        let first = track(5, 0, OPTICAL_PHOTON);
        let mut second = track(5, 2, OPTICAL_PHOTON);
        second.steps.clear();

        let index = FragmentIndex::from_fragments([&first, &second], OPTICAL_PHOTON);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(5), Some(&first));
    }

    #[test]
    fn test_toggle_semantics_for_repeated_reports() {
        let flags = HitFlags::from_reports(4, &[2, 3, 3, 4, 4, 4], HitFlagUpdate::Toggle).unwrap();
        assert_eq!(flags.hit_ids(), vec![2, 4]);

        let flags = HitFlags::from_reports(4, &[2, 3, 3], HitFlagUpdate::Set).unwrap();
        assert_eq!(flags.hit_ids(), vec![2, 3]);
    }

    #[test]
    fn test_out_of_range_identifiers_fail_loudly() {
        assert_eq!(
            HitFlags::from_reports(3, &[4], HitFlagUpdate::Toggle),
            Err(OptrackError::OutOfRangeIdentifier { id: 4, domain: 3 })
        );
        assert_eq!(
            HitFlags::new(3).get(0),
            Err(OptrackError::OutOfRangeIdentifier { id: 0, domain: 3 })
        );
        assert_eq!(HitFlags::new(3).get(3), Ok(false));
    }
}
