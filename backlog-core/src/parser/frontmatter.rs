//! Header-block (front matter) extraction.
//!
//! The block is a deliberately small subset of YAML: unindented `key: value`
//! lines plus `- item` list entries under the most recent key. Anything more
//! elaborate is kept as the raw string value.

use std::collections::HashMap;

use thiserror::Error;

const DELIMITER: &str = "---";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("Malformed frontmatter start marker: {0:?}")]
    MalformedStartMarker(String),

    #[error("Missing frontmatter end marker")]
    MissingEndMarker,
}

/// Key/value metadata from the top of a markdown file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBlock {
    fields: HashMap<String, String>,
}

impl HeaderBlock {
    /// Non-empty value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Extract the header block from `content`.
///
/// A file without a leading `---` line has no header block and yields an empty
/// mapping. A start marker that is not exactly `---`, or a block that is never
/// closed, is an error.
pub fn parse_header_block(content: &str) -> Result<HeaderBlock, HeaderError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.lines();

    let Some(first) = lines.next() else {
        return Ok(HeaderBlock::default());
    };
    let first = first.trim();
    if first != DELIMITER {
        if first.starts_with(DELIMITER) {
            return Err(HeaderError::MalformedStartMarker(first.to_string()));
        }
        return Ok(HeaderBlock::default());
    }

    let mut fields: HashMap<String, String> = HashMap::new();
    let mut current_key: Option<String> = None;

    for raw in lines {
        let trimmed = raw.trim();
        if trimmed == DELIMITER {
            return Ok(HeaderBlock { fields });
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let indented = raw.starts_with(' ') || raw.starts_with('\t');
        if let Some(item) = trimmed.strip_prefix('-') {
            if let Some(key) = &current_key {
                let item = normalize_value(item);
                if !item.is_empty() {
                    let entry = fields.entry(key.clone()).or_default();
                    if !entry.is_empty() {
                        entry.push(',');
                    }
                    entry.push_str(&item);
                }
            }
            continue;
        }

        if indented {
            continue;
        }

        if let Some((key, value)) = raw.split_once(':') {
            let key = key.trim().to_string();
            fields.insert(key.clone(), normalize_value(value));
            current_key = Some(key);
        }
    }

    Err(HeaderError::MissingEndMarker)
}

fn normalize_value(value: &str) -> String {
    let value = unquote(value.trim());
    match value.to_ascii_lowercase().as_str() {
        "null" | "none" | "~" | "[]" => String::new(),
        _ => value.to_string(),
    }
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_values() {
        let block = parse_header_block(
            "---\nid: KB-TSK-0001\ntitle: \"Wire the cache\"\nparent: null\nstate: Ready\n---\nbody\n",
        )
        .unwrap();
        assert_eq!(block.get("id"), Some("KB-TSK-0001"));
        assert_eq!(block.get("title"), Some("Wire the cache"));
        assert_eq!(block.get("parent"), None);
        assert_eq!(block.get("state"), Some("Ready"));
    }

    #[test]
    fn missing_block_is_empty_not_an_error() {
        assert!(parse_header_block("").unwrap().is_empty());
        assert!(parse_header_block("# Just a heading\n").unwrap().is_empty());
    }

    #[test]
    fn unclosed_block_is_an_error() {
        assert_eq!(
            parse_header_block("---\nid: X\n"),
            Err(HeaderError::MissingEndMarker)
        );
    }

    #[test]
    fn malformed_start_marker_is_an_error() {
        assert!(matches!(
            parse_header_block("----\nid: X\n---\n"),
            Err(HeaderError::MalformedStartMarker(_))
        ));
    }

    #[test]
    fn joins_list_entries_under_current_key() {
        let block =
            parse_header_block("---\ntags:\n  - cache\n  - 'web'\n- api\nowner: ~\n---\n").unwrap();
        assert_eq!(block.get("tags"), Some("cache,web,api"));
        assert_eq!(block.get("owner"), None);
    }

    #[test]
    fn skips_nested_mappings_and_comments() {
        let block = parse_header_block(
            "\u{feff}---\n# comment\nlinks:\n  relates: []\nid: A-1\n---\n",
        )
        .unwrap();
        assert_eq!(block.get("id"), Some("A-1"));
        assert_eq!(block.get("relates"), None);
        assert_eq!(block.len(), 2);
    }
}
