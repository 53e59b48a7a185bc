use std::path::PathBuf;

use thiserror::Error;

/// Errors that reject a request outright.
///
/// Everything else the cache runs into (missing directories, malformed files,
/// duplicate ids, broken parent links) degrades into warnings on the returned
/// value instead of surfacing here.
#[derive(Debug, Error)]
pub enum BacklogError {
    #[error("Invalid product name: {0:?}")]
    InvalidProductName(String),

    #[error("Missing workspace path")]
    MissingWorkspacePath,

    #[error("Invalid workspace {}: {reason}", path.display())]
    InvalidWorkspace { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, BacklogError>;
