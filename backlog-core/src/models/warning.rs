use std::fmt;

use serde::{Deserialize, Serialize};

/// A structural anomaly found while loading or projecting a product.
///
/// Warnings never fail a request; they travel alongside the (partial) result
/// so operators can see and fix the underlying files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The product directory does not exist (yet).
    MissingProductRoot { path: String },
    /// The product exists but has no `items/` directory.
    MissingItemsDir { path: String },
    /// A file or directory could not be read during the walk.
    UnreadablePath { path: String, error: String },
    /// A file was parsed into an invalid record.
    InvalidRecord { path: String, error: String },
    /// A later record reuses an id already declared by an earlier one.
    DuplicateId {
        id: String,
        first_path: String,
        path: String,
    },
    /// A record names a parent that does not resolve to a work item.
    OrphanParent { id: String, parent: String },
    /// Records whose parent chain loops back on itself.
    ParentCycle { ids: Vec<String> },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingProductRoot { path } => write!(f, "Missing product directory: {path}"),
            Self::MissingItemsDir { path } => write!(f, "Missing items directory: {path}"),
            Self::UnreadablePath { path, error } => write!(f, "Unreadable path {path}: {error}"),
            Self::InvalidRecord { path, error } => write!(f, "Invalid record {path}: {error}"),
            Self::DuplicateId {
                id,
                first_path,
                path,
            } => write!(f, "Duplicate id {id}: {path} collides with {first_path}"),
            Self::OrphanParent { id, parent } => {
                write!(f, "Orphan parent missing for item {id}: {parent}")
            }
            Self::ParentCycle { ids } => {
                write!(f, "Parent cycle detected: {}", ids.join(" -> "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kind_tag() {
        let warning = Warning::DuplicateId {
            id: "T-1".into(),
            first_path: "a.md".into(),
            path: "b.md".into(),
        };
        let value = serde_json::to_value(&warning).unwrap();
        assert_eq!(value["kind"], "duplicate_id");
        assert_eq!(value["first_path"], "a.md");
        assert_eq!(warning.to_string(), "Duplicate id T-1: b.md collides with a.md");
    }
}
