//! Record Parser: one eligible file in, exactly one [`Record`] out.
//!
//! Parsing never fails from the caller's point of view. A file that cannot be
//! read or understood still produces a record, marked invalid and carrying
//! the diagnostic, so that it shows up in listings instead of vanishing.

mod frontmatter;
mod manifest;
mod markdown;
mod timestamp;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{Record, RecordKind};

pub use frontmatter::{parse_header_block, HeaderBlock, HeaderError};
pub use timestamp::parse_timestamp;

/// Why a file became an invalid record.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error("Missing id")]
    MissingId,

    #[error("Invalid id: {0:?}")]
    InvalidId(String),

    #[error("Invalid manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("Manifest is not a JSON object")]
    NotAnObject,
}

/// An eligible file found during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub kind: RecordKind,
    pub path: PathBuf,
    /// Path shown on the record, `/`-separated.
    pub relative: String,
}

/// Read a source file as text. Bytes that are not UTF-8 become U+FFFD so the
/// content stays visible and parseable.
pub(super) fn read_text(path: &Path) -> Result<String, ParseError> {
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            tracing::debug!(
                path = %path.display(),
                error = %e.utf8_error(),
                "Non-UTF-8 source, decoding lossily"
            );
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

/// Parse one source file into a record.
pub fn parse_source(source: &SourceFile) -> Record {
    let mut record = Record::blank(source.kind, source.relative.clone());

    let outcome = match source.kind {
        RecordKind::WorkItem => markdown::fill_work_item(&mut record, &source.path),
        RecordKind::Decision => markdown::fill_decision(&mut record, &source.path),
        RecordKind::Topic => manifest::fill_topic(&mut record, &source.path),
        RecordKind::Workset => manifest::fill_workset(&mut record, &source.path),
    };

    match outcome {
        Ok(()) => record.valid = true,
        Err(e) => {
            tracing::debug!(path = %source.relative, error = %e, "Invalid record");
            record.valid = false;
            record.parse_error = Some(e.to_string());
        }
    }
    record
}
