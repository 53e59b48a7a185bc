//! Read-through, filesystem-backed cache over a backlog of markdown work
//! items, decisions and topic/workset manifests.
//!
//! [`BacklogService`] is the entry point: it resolves products under a
//! workspace root, keeps one immutable [`Snapshot`] per product, reloads it
//! when the files change, and projects it into listings, a parent/child tree
//! and a kanban board.

mod cache;
pub mod error;
pub mod freshness;
pub mod index;
pub mod layout;
pub mod models;
pub mod parser;
mod service;
pub mod snapshot;
pub mod views;
pub mod workspace;

pub use error::{BacklogError, Result};
pub use freshness::{Freshness, FreshnessScanner, FsScanner};
pub use layout::BacklogLayout;
pub use service::BacklogService;
pub use snapshot::Snapshot;
