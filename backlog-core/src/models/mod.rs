//! Domain models for the backlog cache.
//!
//! # Core Concepts
//!
//! - [`Record`]: one parsed file (work item, decision, topic or workset
//!   manifest), valid or not.
//! - [`Warning`]: a non-fatal anomaly attached to a snapshot or a view.
//! - [`ItemView`]: the serializable form of a record handed to callers.
//! - [`TreeView`] / [`KanbanView`]: projections computed from a snapshot.
//! - [`WorkspaceInfo`]: the process-wide workspace root.

mod record;
mod views;
mod warning;
mod workspace;

pub use record::*;
pub use views::*;
pub use warning::*;
pub use workspace::*;
