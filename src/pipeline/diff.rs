//! Change classification between two listing snapshots.
//!
//! Every pass compares the freshly fetched `current` snapshot against the
//! stored `previous` one by identifier. Passes are independent of each other
//! and never modify their inputs.

use serde::Serialize;

use crate::models::{AnimalRecord, Snapshot};

/// Records whose reservation status flipped between snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReservationChanges {
    /// Empty before, set now
    pub reserved: Vec<AnimalRecord>,
    /// Set before, empty now
    pub unreserved: Vec<AnimalRecord>,
}

/// All five classified groups for one check.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChangeSet {
    pub new: Vec<AnimalRecord>,
    pub reserved: Vec<AnimalRecord>,
    pub unreserved: Vec<AnimalRecord>,
    pub rehomed: Vec<AnimalRecord>,
    pub removed: Vec<AnimalRecord>,
}

impl ChangeSet {
    /// Whether any cat was newly listed.
    pub fn has_new(&self) -> bool {
        !self.new.is_empty()
    }

    /// Check if there are any changes.
    pub fn is_empty(&self) -> bool {
        self.change_count() == 0
    }

    /// Get the total number of changes.
    pub fn change_count(&self) -> usize {
        self.new.len()
            + self.reserved.len()
            + self.unreserved.len()
            + self.rehomed.len()
            + self.removed.len()
    }
}

/// Records in `current` whose identifier is absent from `previous`.
pub fn find_new(current: &Snapshot, previous: &Snapshot) -> Vec<AnimalRecord> {
    current
        .iter()
        .filter(|record| !previous.contains(&record.id))
        .cloned()
        .collect()
}

/// Records whose reservation status changed between empty and non-empty.
pub fn find_reservation_transitions(current: &Snapshot, previous: &Snapshot) -> ReservationChanges {
    let mut changes = ReservationChanges::default();

    for (record, before) in matched(current, previous) {
        match (before.is_reserved(), record.is_reserved()) {
            (false, true) => changes.reserved.push(record.clone()),
            (true, false) => changes.unreserved.push(record.clone()),
            _ => {}
        }
    }

    changes
}

/// Records that became rehomed. Rehoming only ever goes one way.
pub fn find_rehomed(current: &Snapshot, previous: &Snapshot) -> Vec<AnimalRecord> {
    matched(current, previous)
        .filter(|(record, before)| !before.is_rehomed() && record.is_rehomed())
        .map(|(record, _)| record.clone())
        .collect()
}

/// Records in `previous` whose identifier is absent from `current`.
pub fn find_removed(current: &Snapshot, previous: &Snapshot) -> Vec<AnimalRecord> {
    previous
        .iter()
        .filter(|record| !current.contains(&record.id))
        .cloned()
        .collect()
}

/// Run all four passes.
pub fn classify(current: &Snapshot, previous: &Snapshot) -> ChangeSet {
    let ReservationChanges {
        reserved,
        unreserved,
    } = find_reservation_transitions(current, previous);

    ChangeSet {
        new: find_new(current, previous),
        reserved,
        unreserved,
        rehomed: find_rehomed(current, previous),
        removed: find_removed(current, previous),
    }
}

/// Pairs each `current` record with its `previous` counterpart, in `current` order.
fn matched<'a>(
    current: &'a Snapshot,
    previous: &'a Snapshot,
) -> impl Iterator<Item = (&'a AnimalRecord, &'a AnimalRecord)> + 'a {
    current
        .iter()
        .filter_map(move |record| previous.get(&record.id).map(|before| (record, before)))
}
