use std::collections::{BTreeSet, HashMap};

use barflow_protocol::Key;
use thiserror::Error;
use tracing::warn;

use super::record::Record;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("dataset has no records")]
    Empty,
    #[error("duplicate name `{name}` at positions {first} and {second}")]
    DuplicateName {
        name: String,
        first: usize,
        second: usize,
    },
}

/// Ordered, immutable collection of records with unique names.
///
/// Insertion order is file order and is the order of the band scale's domain.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Result<Self, DatasetError> {
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }
        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if let Some(&first) = seen.get(record.name.as_str()) {
                return Err(DatasetError::DuplicateName {
                    name: record.name.to_string(),
                    first,
                    second: i,
                });
            }
            seen.insert(record.name.as_str(), i);
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a constructed dataset; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &Key> {
        self.records.iter().map(|r| &r.name)
    }

    /// `(min, max)` of the value field.
    pub fn extent(&self) -> (f64, f64) {
        self.records
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                (lo.min(r.value), hi.max(r.value))
            })
    }

    /// Records whose position is in `indices`, in dataset order.
    ///
    /// Indices past the end are dropped with a warning.
    pub fn subset(&self, indices: &BTreeSet<usize>) -> Vec<&Record> {
        if let Some(&past) = indices.range(self.records.len()..).next() {
            warn!(
                index = past,
                len = self.records.len(),
                "ignoring out-of-range subset indices"
            );
        }
        self.records
            .iter()
            .enumerate()
            .filter(|(i, _)| indices.contains(i))
            .map(|(_, r)| r)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Dataset {
        Dataset::new(vec![
            Record::new("A", 10.0),
            Record::new("B", 20.0),
            Record::new("C", 5.0),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_empty_and_duplicates() {
        assert_eq!(Dataset::new(Vec::new()).unwrap_err(), DatasetError::Empty);
        let err = Dataset::new(vec![
            Record::new("A", 1.0),
            Record::new("B", 2.0),
            Record::new("A", 3.0),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            DatasetError::DuplicateName {
                name: "A".into(),
                first: 0,
                second: 2
            }
        );
    }

    #[test]
    fn extent_spans_all_values() {
        assert_eq!(abc().extent(), (5.0, 20.0));
    }

    #[test]
    fn subset_keeps_dataset_order() {
        let data = abc();
        let picked = data.subset(&BTreeSet::from([2, 0]));
        let names: Vec<&str> = picked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
    }

    #[test]
    fn subset_ignores_out_of_range_indices() {
        let data = abc();
        let picked = data.subset(&BTreeSet::from([1, 3, 26]));
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name, "B");
        assert!(data.subset(&BTreeSet::new()).is_empty());
    }
}
