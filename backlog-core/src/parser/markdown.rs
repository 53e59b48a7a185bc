//! Work-item and decision files: markdown with a header block.

use std::path::Path;

use crate::models::{Record, WorkItemType};

use super::frontmatter::parse_header_block;
use super::timestamp::parse_timestamp;
use super::{read_text, ParseError};

const ITEMS_DIR: &str = "items";
const DEFAULT_STATE: &str = "Proposed";
const UNTITLED: &str = "(untitled)";

/// Fill a work-item record from the file at `path`.
///
/// The record keeps whatever was read before an error, so invalid records
/// still carry their raw content. A rejected id is cleared so the record
/// never takes part in id lookups.
pub(super) fn fill_work_item(record: &mut Record, path: &Path) -> Result<(), ParseError> {
    record.raw_content = read_text(path)?;
    let header = parse_header_block(&record.raw_content)?;

    record.id = header.get("id").unwrap_or_default().to_string();
    record.item_type = normalize_type(&record.path, header.get("type"));
    record.title = header.get("title").unwrap_or_default().to_string();
    record.state = header.get("state").unwrap_or_default().to_string();
    record.parent = header.get("parent").map(str::to_string);
    record.created = header.get("created").and_then(parse_timestamp);
    record.updated = header.get("updated").and_then(parse_timestamp);

    if record.id.is_empty() {
        return Err(ParseError::MissingId);
    }
    if record.id.chars().any(char::is_whitespace) {
        return Err(ParseError::InvalidId(std::mem::take(&mut record.id)));
    }

    if record.title.is_empty() {
        record.title = UNTITLED.to_string();
    }
    if record.state.is_empty() {
        record.state = DEFAULT_STATE.to_string();
    }
    Ok(())
}

/// Fill a decision record. Id and title fall back to the file stem.
pub(super) fn fill_decision(record: &mut Record, path: &Path) -> Result<(), ParseError> {
    record.item_type = "ADR".to_string();
    record.raw_content = read_text(path)?;
    let header = parse_header_block(&record.raw_content)?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    record.id = header.get("id").unwrap_or(stem.as_str()).to_string();
    record.title = header.get("title").unwrap_or(stem.as_str()).to_string();
    record.state = header.get("status").unwrap_or(DEFAULT_STATE).to_string();
    record.created = header.get("date").and_then(parse_timestamp);
    record.updated = record.created;

    if record.id.chars().any(char::is_whitespace) {
        return Err(ParseError::InvalidId(std::mem::take(&mut record.id)));
    }
    Ok(())
}

/// Resolve a work item's type.
///
/// The directory right under `items/` wins over the declared value when both
/// name a known type.
fn normalize_type(relative_path: &str, declared: Option<&str>) -> String {
    let from_dir = relative_path
        .split('/')
        .skip_while(|segment| *segment != ITEMS_DIR)
        .nth(1)
        .and_then(WorkItemType::from_dir);

    let from_declared = declared.and_then(WorkItemType::from_declared);

    match (from_dir, from_declared, declared) {
        (Some(dir), Some(decl), _) if dir != decl => {
            tracing::debug!(
                path = relative_path,
                declared = decl.as_str(),
                directory = dir.as_str(),
                "Declared type disagrees with directory, using directory"
            );
            dir.as_str().to_string()
        }
        (Some(dir), _, _) => dir.as_str().to_string(),
        (None, Some(decl), _) => decl.as_str().to_string(),
        (None, None, Some(raw)) => raw.to_string(),
        (None, None, None) => "Unknown".to_string(),
    }
}
