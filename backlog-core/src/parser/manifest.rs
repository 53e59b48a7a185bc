//! Topic and workset manifests (`manifest.json`).

use std::path::Path;

use serde::Deserialize;

use crate::models::Record;

use super::timestamp::parse_timestamp;
use super::{read_text, ParseError};

const TOPIC_BRIEF: &str = "brief.md";
const DEFAULT_STATUS: &str = "open";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TopicManifest {
    topic: Option<String>,
    title: Option<String>,
    status: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WorksetManifest {
    name: Option<String>,
    title: Option<String>,
    status: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

pub(super) fn fill_topic(record: &mut Record, path: &Path) -> Result<(), ParseError> {
    record.item_type = "Topic".to_string();
    let text = read_text(path)?;
    let manifest: TopicManifest = read_object(&text)?;

    let slug = non_empty(manifest.topic).unwrap_or_else(|| dir_name(path));
    record.id = format!("TOPIC-{slug}");
    record.title = non_empty(manifest.title).unwrap_or_else(|| slug.clone());
    record.state = non_empty(manifest.status).unwrap_or_else(|| DEFAULT_STATUS.to_string());
    record.created = manifest.created_at.as_deref().and_then(parse_timestamp);
    record.updated = manifest.updated_at.as_deref().and_then(parse_timestamp);

    let brief = path.with_file_name(TOPIC_BRIEF);
    record.raw_content = match read_text(&brief) {
        Ok(content) => content,
        Err(_) => text,
    };
    Ok(())
}

pub(super) fn fill_workset(record: &mut Record, path: &Path) -> Result<(), ParseError> {
    record.item_type = "Workset".to_string();
    record.raw_content = read_text(path)?;
    let manifest: WorksetManifest = read_object(&record.raw_content)?;

    let name = non_empty(manifest.name).unwrap_or_else(|| dir_name(path));
    record.id = format!("WORKSET-{name}");
    record.title = non_empty(manifest.title).unwrap_or_else(|| name.clone());
    record.state = non_empty(manifest.status).unwrap_or_else(|| DEFAULT_STATUS.to_string());
    record.created = manifest.created_at.as_deref().and_then(parse_timestamp);
    record.updated = manifest.updated_at.as_deref().and_then(parse_timestamp);
    Ok(())
}

/// Deserialize a manifest, insisting on a top-level JSON object.
fn read_object<T: for<'de> Deserialize<'de>>(text: &str) -> Result<T, ParseError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(ParseError::NotAnObject);
    }
    Ok(serde_json::from_value(value)?)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn dir_name(manifest_path: &Path) -> String {
    manifest_path
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
