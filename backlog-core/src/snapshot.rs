use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::freshness::Freshness;
use crate::index::RecordIndex;
use crate::layout::BacklogLayout;
use crate::models::{Record, Warning};
use crate::parser::parse_source;

/// The complete cached state of one product at one point in time.
///
/// Immutable once built; a reload produces a new snapshot that replaces the
/// old one wholesale.
#[derive(Debug, Clone)]
pub struct Snapshot {
    product: String,
    records: Vec<Record>,
    index: RecordIndex,
    freshness: Freshness,
    warnings: Vec<Warning>,
    loaded_at: DateTime<Utc>,
}

impl Snapshot {
    /// Walk, parse and index `product`.
    ///
    /// `freshness` must be taken before calling this, so that a file changing
    /// during the walk leaves the snapshot looking stale.
    pub fn load(layout: &BacklogLayout, product: &str, freshness: Freshness) -> Self {
        let started = Instant::now();
        let walk = layout.walk(product);
        let mut warnings = walk.warnings.clone();

        let records: Vec<Record> = walk
            .sources()
            .iter()
            .map(|source| {
                let record = parse_source(source);
                if let Some(error) = &record.parse_error {
                    warnings.push(Warning::InvalidRecord {
                        path: record.path.clone(),
                        error: error.clone(),
                    });
                }
                record
            })
            .collect();

        let index = RecordIndex::build(&records, &mut warnings);

        tracing::info!(
            product,
            records = records.len(),
            ids = index.len(),
            warnings = warnings.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Loaded product snapshot"
        );

        Self {
            product: product.to_string(),
            records,
            index,
            freshness,
            warnings,
            loaded_at: Utc::now(),
        }
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    /// Every record, in discovery order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn index(&self) -> &RecordIndex {
        &self.index
    }

    pub fn freshness(&self) -> &Freshness {
        &self.freshness
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// The canonical record for `id`.
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.index.canonical(id).map(|pos| &self.records[pos])
    }

    /// Every record declaring `id`, canonical first.
    pub fn occurrences(&self, id: &str) -> impl Iterator<Item = &Record> + '_ {
        self.index.positions(id).iter().map(|&pos| &self.records[pos])
    }

    /// Canonical work items with their positions, in discovery order.
    pub fn canonical_work_items(&self) -> impl Iterator<Item = (usize, &Record)> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(|(pos, r)| r.is_work_item() && self.index.is_canonical(&r.id, *pos))
    }
}
