//! View Builder: tree and kanban projections of a snapshot.
//!
//! Projections are computed on demand from an immutable [`Snapshot`] and are
//! never cached. Only canonical work items take part; decisions, topics and
//! worksets are reachable through listings and lookups.

mod kanban;
mod render;
mod tree;

pub use kanban::build_kanban;
pub use render::{render_kanban, render_tree};
pub use tree::build_tree;

use crate::models::{ItemView, Record};
use crate::snapshot::Snapshot;

/// Serializable view of `record` carrying its duplicate count in `snapshot`.
pub fn item_view(snapshot: &Snapshot, record: &Record, include_content: bool) -> ItemView {
    let view = ItemView::from_record(record, include_content);
    if record.id.is_empty() {
        return view;
    }
    view.with_duplicate_count(snapshot.index().occurrences(&record.id))
}
