//! On-disk layout of a backlog and file eligibility.
//!
//! ```text
//! <backlog root>/
//!   products/<product>/items/**/*.md
//!   products/<product>/decisions/**/*.md
//!   topics/<slug>/manifest.json     (+ brief.md)
//!   worksets/<name>/manifest.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::error::{BacklogError, Result};
use crate::models::{RecordKind, Warning};
use crate::parser::SourceFile;

pub const PRODUCTS_DIR: &str = "products";
pub const ITEMS_DIR: &str = "items";
pub const DECISIONS_DIR: &str = "decisions";
pub const TOPICS_DIR: &str = "topics";
pub const WORKSETS_DIR: &str = "worksets";

const MANIFEST_FILE: &str = "manifest.json";
const TOPIC_BRIEF: &str = "brief.md";
const EXCLUDED_SEGMENTS: [&str; 3] = ["_trash", "_archive", "node_modules"];

/// Whether a path segment below a walked directory hides everything under it.
pub fn is_excluded_segment(name: &str) -> bool {
    name.starts_with('.') || EXCLUDED_SEGMENTS.contains(&name)
}

/// Whether a file name is an eligible markdown record.
pub fn is_markdown_source(name: &str) -> bool {
    name.ends_with(".md") && name != "README.md" && !name.ends_with(".index.md")
}

/// Check a product name: ASCII letters, digits, `.`, `_` and `-`, not only dots.
pub fn validate_product_name(name: &str) -> Result<&str> {
    let allowed = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if name.is_empty() || !allowed || name.chars().all(|c| c == '.') {
        return Err(BacklogError::InvalidProductName(name.to_string()));
    }
    Ok(name)
}

/// A file that takes part in a product's snapshot or its freshness.
#[derive(Debug, Clone)]
pub(crate) struct TrackedFile {
    /// `None` for files that only feed another record (topic briefs).
    pub kind: Option<RecordKind>,
    pub path: PathBuf,
    pub relative: String,
    pub modified: Option<SystemTime>,
}

/// Everything found under one product, in discovery order.
#[derive(Debug, Default)]
pub(crate) struct Walk {
    pub root_exists: bool,
    pub files: Vec<TrackedFile>,
    pub warnings: Vec<Warning>,
}

impl Walk {
    pub fn sources(&self) -> Vec<SourceFile> {
        self.files
            .iter()
            .filter_map(|f| {
                f.kind.map(|kind| SourceFile {
                    kind,
                    path: f.path.clone(),
                    relative: f.relative.clone(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacklogLayout {
    root: PathBuf,
}

impl BacklogLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn products_dir(&self) -> PathBuf {
        self.root.join(PRODUCTS_DIR)
    }

    /// Directory of a product. The name must already be validated.
    pub fn product_root(&self, product: &str) -> PathBuf {
        self.products_dir().join(product)
    }

    /// Valid product names that have an `items/` directory, sorted.
    pub fn product_names(&self) -> Vec<String> {
        let entries = match fs::read_dir(self.products_dir()) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(path = %self.products_dir().display(), error = %e, "No products directory");
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().join(ITEMS_DIR).is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| validate_product_name(name).is_ok())
            .collect();
        names.sort();
        names
    }

    /// Walk every file belonging to `product`: items, decisions, then the
    /// shared topics and worksets.
    pub(crate) fn walk(&self, product: &str) -> Walk {
        let product_root = self.product_root(product);
        let mut walk = Walk {
            root_exists: product_root.is_dir(),
            ..Walk::default()
        };

        if !walk.root_exists {
            walk.warnings.push(Warning::MissingProductRoot {
                path: display_path(&product_root),
            });
            return walk;
        }

        let items_dir = product_root.join(ITEMS_DIR);
        if items_dir.is_dir() {
            walk_markdown(&mut walk, &product_root, &items_dir, RecordKind::WorkItem);
        } else {
            walk.warnings.push(Warning::MissingItemsDir {
                path: display_path(&items_dir),
            });
        }

        let decisions_dir = product_root.join(DECISIONS_DIR);
        if decisions_dir.is_dir() {
            walk_markdown(&mut walk, &product_root, &decisions_dir, RecordKind::Decision);
        }

        walk_manifests(&mut walk, &self.root, TOPICS_DIR, RecordKind::Topic);
        walk_manifests(&mut walk, &self.root, WORKSETS_DIR, RecordKind::Workset);
        walk
    }
}

fn walk_markdown(walk: &mut Walk, base: &Path, dir: &Path, kind: RecordKind) {
    let entries = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded_segment(&e.file_name().to_string_lossy()));

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                walk.warnings.push(unreadable(base, dir, &e));
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_markdown_source(&entry.file_name().to_string_lossy()) {
            continue;
        }
        walk.files.push(TrackedFile {
            kind: Some(kind),
            relative: relative_path(base, entry.path()),
            modified: entry.metadata().ok().and_then(|m| m.modified().ok()),
            path: entry.into_path(),
        });
    }
}

/// Manifests sit exactly one directory below `<root>/<dir_name>`.
fn walk_manifests(walk: &mut Walk, root: &Path, dir_name: &str, kind: RecordKind) {
    let dir = root.join(dir_name);
    if !dir.is_dir() {
        return;
    }

    let entries = WalkDir::new(&dir)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded_segment(&e.file_name().to_string_lossy()));

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                walk.warnings.push(unreadable(root, &dir, &e));
                continue;
            }
        };
        if entry.depth() != 2 || !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        let kind = if name == MANIFEST_FILE {
            Some(kind)
        } else if kind == RecordKind::Topic && name == TOPIC_BRIEF {
            None
        } else {
            continue;
        };

        walk.files.push(TrackedFile {
            kind,
            relative: relative_path(root, entry.path()),
            modified: entry.metadata().ok().and_then(|m| m.modified().ok()),
            path: entry.into_path(),
        });
    }
}

fn unreadable(base: &Path, dir: &Path, error: &walkdir::Error) -> Warning {
    let path = relative_path(base, error.path().unwrap_or(dir));
    tracing::warn!(path = %path, error = %error, "Unreadable path");
    Warning::UnreadablePath {
        path,
        error: error.to_string(),
    }
}

/// `path` relative to `base`, `/`-separated.
pub(crate) fn relative_path(base: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
