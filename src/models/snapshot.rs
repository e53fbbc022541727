//! Validated, identifier-indexed snapshot of the listing.

use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::models::{AnimalRecord, RecordId};

/// All records listed at one point in time, in source order.
///
/// Construction checks that identifiers are unique and that both status
/// fields are present, so comparisons never have to guess.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    records: Vec<AnimalRecord>,
    index: HashMap<RecordId, usize>,
}

impl Snapshot {
    /// Validate records and index them by identifier.
    pub fn new(records: Vec<AnimalRecord>) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());

        for (pos, record) in records.iter().enumerate() {
            record.reserved_status()?;
            record.rehomed_status()?;

            if index.insert(record.id.clone(), pos).is_some() {
                return Err(AppError::malformed(
                    &record.id,
                    "duplicate identifier in snapshot",
                ));
            }
        }

        Ok(Self { records, index })
    }

    /// Look up a record by identifier.
    pub fn get(&self, id: &RecordId) -> Option<&AnimalRecord> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.index.contains_key(id)
    }

    pub fn records(&self) -> &[AnimalRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnimalRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a AnimalRecord;
    type IntoIter = std::slice::Iter<'a, AnimalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        let snapshot =
            Snapshot::new(vec![AnimalRecord::new("a"), AnimalRecord::new("b")]).unwrap();

        assert_eq!(snapshot.len(), 2);
        assert!(!snapshot.is_empty());
        assert!(snapshot.contains(&RecordId::from("b")));
        assert!(!snapshot.contains(&RecordId::from("c")));
        assert_eq!(
            snapshot.get(&RecordId::from("a")).map(|r| &r.id),
            Some(&RecordId::from("a"))
        );
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = Snapshot::new(vec![AnimalRecord::new("a"), AnimalRecord::new("a")])
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord { ref id, .. } if id == "a"));
    }

    #[test]
    fn test_rejects_missing_status() {
        let mut record = AnimalRecord::new(5);
        record.rehomed = None;

        let err = Snapshot::new(vec![record]).unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord { ref id, .. } if id == "5"));
    }

    #[test]
    fn test_empty_listing() {
        let snapshot = Snapshot::new(Vec::new()).unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.get(&RecordId::from("a")).is_none());
    }

    #[test]
    fn test_text_and_numeric_ids_differ() {
        let snapshot =
            Snapshot::new(vec![AnimalRecord::new("1"), AnimalRecord::new(1)]).unwrap();
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_preserves_order() {
        let snapshot = Snapshot::new(vec![
            AnimalRecord::new("z"),
            AnimalRecord::new("a"),
            AnimalRecord::new("m"),
        ])
        .unwrap();

        let ids: Vec<String> = snapshot.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["z", "a", "m"]);
    }
}
