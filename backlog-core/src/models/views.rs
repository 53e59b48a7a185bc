use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::{squash, ItemView};
use super::warning::Warning;

/// Every record of a product, in discovery order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemListing {
    pub product: String,
    pub items: Vec<ItemView>,
    pub warnings: Vec<Warning>,
    /// Latest modification time across the product's tracked files.
    pub cached_at: Option<DateTime<Utc>>,
    /// When the snapshot behind this listing was built.
    pub loaded_at: DateTime<Utc>,
}

/// A single record looked up by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDetail {
    /// The canonical (first discovered) record, including raw content.
    pub item: ItemView,
    /// Every record declaring the id, canonical one first.
    pub duplicates: Vec<ItemView>,
}

/// A work item with its nested children.
///
/// The item fields are flattened into the JSON object next to `children`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub item: ItemView,
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeView {
    pub roots: Vec<TreeNode>,
    pub warnings: Vec<Warning>,
}

/// A kanban column.
///
/// Columns have a fixed order (see [`Lane::ALL`]); `Other` collects states
/// that match no known column so typos stay visible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Lane {
    Backlog,
    Ready,
    InProgress,
    Blocked,
    Review,
    Done,
    Other,
}

impl Lane {
    pub const ALL: [Lane; 7] = [
        Lane::Backlog,
        Lane::Ready,
        Lane::InProgress,
        Lane::Blocked,
        Lane::Review,
        Lane::Done,
        Lane::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::Ready => "Ready",
            Self::InProgress => "InProgress",
            Self::Blocked => "Blocked",
            Self::Review => "Review",
            Self::Done => "Done",
            Self::Other => "Other",
        }
    }

    /// Column for a lifecycle state string.
    pub fn for_state(state: &str) -> Self {
        match squash(state).as_str() {
            "" | "new" | "proposed" | "planned" | "backlog" | "todo" => Self::Backlog,
            "ready" => Self::Ready,
            "inprogress" | "doing" | "active" | "started" => Self::InProgress,
            "blocked" => Self::Blocked,
            "review" | "inreview" => Self::Review,
            "done" | "closed" | "dropped" | "resolved" => Self::Done,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KanbanLane {
    pub lane: Lane,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KanbanView {
    /// Always one entry per [`Lane::ALL`], in that order.
    pub lanes: Vec<KanbanLane>,
    pub warnings: Vec<Warning>,
}

impl KanbanView {
    pub fn lane(&self, lane: Lane) -> &[ItemView] {
        self.lanes
            .iter()
            .find(|l| l.lane == lane)
            .map(|l| l.items.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_map_to_lanes() {
        assert_eq!(Lane::for_state("InProgress"), Lane::InProgress);
        assert_eq!(Lane::for_state("in-progress"), Lane::InProgress);
        assert_eq!(Lane::for_state("Proposed"), Lane::Backlog);
        assert_eq!(Lane::for_state("closed"), Lane::Done);
        assert_eq!(Lane::for_state("weird-state"), Lane::Other);
    }
}
