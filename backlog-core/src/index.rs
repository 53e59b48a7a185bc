use std::collections::HashMap;

use crate::models::{Record, Warning};

/// Id lookups over a snapshot's records.
///
/// `positions` keeps every record declaring an id, in discovery order;
/// `canonical` points at the first of them. Both are built once and never
/// mutated.
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    positions: HashMap<String, Vec<usize>>,
    canonical: HashMap<String, usize>,
}

impl RecordIndex {
    /// Index `records`, appending one duplicate warning per collision.
    pub fn build(records: &[Record], warnings: &mut Vec<Warning>) -> Self {
        let mut index = Self::default();

        for (position, record) in records.iter().enumerate() {
            if record.id.is_empty() {
                continue;
            }

            index
                .positions
                .entry(record.id.clone())
                .or_default()
                .push(position);

            match index.canonical.get(&record.id) {
                Some(&first) => warnings.push(Warning::DuplicateId {
                    id: record.id.clone(),
                    first_path: records[first].path.clone(),
                    path: record.path.clone(),
                }),
                None => {
                    index.canonical.insert(record.id.clone(), position);
                }
            }
        }

        index
    }

    pub fn canonical(&self, id: &str) -> Option<usize> {
        self.canonical.get(id).copied()
    }

    pub fn positions(&self, id: &str) -> &[usize] {
        self.positions.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn occurrences(&self, id: &str) -> usize {
        self.positions(id).len()
    }

    pub fn is_canonical(&self, id: &str, position: usize) -> bool {
        self.canonical(id) == Some(position)
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}
