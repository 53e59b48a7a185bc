use crate::models::{KanbanLane, KanbanView, Lane};
use crate::snapshot::Snapshot;

use super::item_view;

/// Group canonical work items into lanes by state.
///
/// Every lane in [`Lane::ALL`] is present, even when empty. Items keep
/// discovery order within their lane.
pub fn build_kanban(snapshot: &Snapshot) -> KanbanView {
    let mut lanes: Vec<KanbanLane> = Lane::ALL
        .iter()
        .map(|&lane| KanbanLane {
            lane,
            items: Vec::new(),
        })
        .collect();

    for (_, record) in snapshot.canonical_work_items() {
        let lane = Lane::for_state(&record.state);
        if let Some(bucket) = lanes.iter_mut().find(|l| l.lane == lane) {
            bucket.items.push(item_view(snapshot, record, false));
        }
    }

    KanbanView {
        lanes,
        warnings: snapshot.warnings().to_vec(),
    }
}
