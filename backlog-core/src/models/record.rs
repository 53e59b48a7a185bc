use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single parsed backlog file, normalized into one shape.
///
/// Records are produced once by the parser and never mutated afterwards. A
/// file that could not be parsed still becomes a record (with `valid` unset and
/// a `parse_error`), so malformed files stay visible in listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Declared identifier. Empty when the file could not be parsed far enough.
    pub id: String,
    pub kind: RecordKind,
    /// Type within the kind, e.g. `Epic` or `Task` for work items.
    pub item_type: String,
    pub title: String,
    pub state: String,
    /// Declared parent identifier. `None` places the record at the root.
    pub parent: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    /// Path relative to the product root (items, decisions) or the backlog root
    /// (topic and workset manifests), always with `/` separators.
    pub path: String,
    pub raw_content: String,
    pub valid: bool,
    pub parse_error: Option<String>,
}

impl Record {
    /// An empty, not-yet-valid record for a source file.
    pub(crate) fn blank(kind: RecordKind, path: String) -> Self {
        Self {
            id: String::new(),
            kind,
            item_type: String::new(),
            title: String::new(),
            state: String::new(),
            parent: None,
            created: None,
            updated: None,
            path,
            raw_content: String::new(),
            valid: false,
            parse_error: None,
        }
    }

    pub fn is_work_item(&self) -> bool {
        self.kind == RecordKind::WorkItem
    }
}

/// Where a record came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    WorkItem,
    Decision,
    Topic,
    Workset,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WorkItem => "work_item",
            Self::Decision => "decision",
            Self::Topic => "topic",
            Self::Workset => "workset",
        }
    }
}

/// Canonical work-item types.
///
/// Declared types outside this set are kept verbatim on the record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WorkItemType {
    Epic,
    Feature,
    UserStory,
    Task,
    Bug,
}

impl WorkItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Epic => "Epic",
            Self::Feature => "Feature",
            Self::UserStory => "UserStory",
            Self::Task => "Task",
            Self::Bug => "Bug",
        }
    }

    /// Parse a declared `type:` value, ignoring case and separators.
    pub fn from_declared(s: &str) -> Option<Self> {
        match squash(s).as_str() {
            "epic" => Some(Self::Epic),
            "feature" => Some(Self::Feature),
            "userstory" | "story" => Some(Self::UserStory),
            "task" => Some(Self::Task),
            "bug" => Some(Self::Bug),
            _ => None,
        }
    }

    /// Map a directory name under `items/` to a type.
    pub fn from_dir(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "epic" | "epics" => Some(Self::Epic),
            "feature" | "features" => Some(Self::Feature),
            "story" | "stories" | "userstory" | "userstories" => Some(Self::UserStory),
            "task" | "tasks" => Some(Self::Task),
            "bug" | "bugs" => Some(Self::Bug),
            _ => None,
        }
    }
}

/// Lowercase and drop `-`, `_` and whitespace.
pub(crate) fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Serializable form of a [`Record`].
///
/// Raw file content is only included when explicitly requested so that
/// listings stay light. Timestamp fields are always present and serialize as
/// `null` when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemView {
    pub id: String,
    pub source_kind: RecordKind,
    #[serde(rename = "type")]
    pub item_type: String,
    pub title: String,
    pub state: String,
    pub parent: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub path: String,
    pub valid: bool,
    pub parse_error: Option<String>,
    /// How many records in the product declare this id (0 for records without one).
    pub duplicate_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ItemView {
    pub fn from_record(record: &Record, include_content: bool) -> Self {
        Self {
            id: record.id.clone(),
            source_kind: record.kind,
            item_type: record.item_type.clone(),
            title: record.title.clone(),
            state: record.state.clone(),
            parent: record.parent.clone(),
            created: record.created,
            updated: record.updated,
            path: record.path.clone(),
            valid: record.valid,
            parse_error: record.parse_error.clone(),
            duplicate_count: usize::from(!record.id.is_empty()),
            content: include_content.then(|| record.raw_content.clone()),
        }
    }

    pub fn with_duplicate_count(mut self, count: usize) -> Self {
        self.duplicate_count = count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_types_ignore_case_and_separators() {
        assert_eq!(WorkItemType::from_declared("User Story"), Some(WorkItemType::UserStory));
        assert_eq!(WorkItemType::from_declared("user_story"), Some(WorkItemType::UserStory));
        assert_eq!(WorkItemType::from_declared("EPIC"), Some(WorkItemType::Epic));
        assert_eq!(WorkItemType::from_declared("Spike"), None);
    }

    #[test]
    fn directory_names_accept_plurals() {
        assert_eq!(WorkItemType::from_dir("epics"), Some(WorkItemType::Epic));
        assert_eq!(WorkItemType::from_dir("userstory"), Some(WorkItemType::UserStory));
        assert_eq!(WorkItemType::from_dir("0000"), None);
    }

    #[test]
    fn view_omits_content_unless_requested() {
        let mut record = Record::blank(RecordKind::WorkItem, "items/task/0000/T-1.md".into());
        record.id = "T-1".into();
        record.raw_content = "---\nid: T-1\n---\n".into();

        let light = serde_json::to_value(ItemView::from_record(&record, false)).unwrap();
        assert!(light.get("content").is_none());
        assert!(light.get("created").unwrap().is_null());
        assert_eq!(light["source_kind"], "work_item");
        assert_eq!(light["duplicate_count"], 1);

        let full = serde_json::to_value(ItemView::from_record(&record, true)).unwrap();
        assert_eq!(full["content"], "---\nid: T-1\n---\n");
    }
}
