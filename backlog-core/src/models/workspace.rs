use serde::{Deserialize, Serialize};

/// Current workspace root and whether it is usable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkspaceInfo {
    /// The backlog root (the directory holding `products/`).
    pub workspace_root: String,
    pub products_root: String,
    /// Whether the workspace root exists.
    pub exists: bool,
    /// Whether the products directory exists and is a directory.
    pub valid: bool,
}

/// Counters for observing cache behavior.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheStats {
    /// Freshness scans performed (stat-only walks).
    pub scans: u64,
    /// Full reloads performed (walk, parse and index).
    pub reloads: u64,
}
