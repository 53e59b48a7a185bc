//! Freshness Scanner: a stat-only walk deciding whether a snapshot is stale.

use std::time::SystemTime;

use crate::layout::BacklogLayout;

/// What a product's files looked like at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
    /// Newest modification time among tracked files, `UNIX_EPOCH` when none.
    pub latest: SystemTime,
    pub files: usize,
    pub root_exists: bool,
}

impl Freshness {
    pub fn empty() -> Self {
        Self {
            latest: SystemTime::UNIX_EPOCH,
            files: 0,
            root_exists: false,
        }
    }

    /// Whether `current` says a snapshot built against `self` is outdated.
    ///
    /// A changed file count catches deletions and renames that leave every
    /// remaining mtime untouched.
    pub fn is_stale(&self, current: &Freshness) -> bool {
        current.latest > self.latest
            || current.root_exists != self.root_exists
            || current.files != self.files
    }

    /// `latest` as a UTC timestamp, `None` when no file was seen.
    pub fn latest_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        (self.latest > SystemTime::UNIX_EPOCH).then(|| self.latest.into())
    }
}

/// Computes a [`Freshness`] marker for a product.
pub trait FreshnessScanner: Send + Sync {
    fn scan(&self, layout: &BacklogLayout, product: &str) -> Freshness;
}

/// Scans the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsScanner;

impl FreshnessScanner for FsScanner {
    fn scan(&self, layout: &BacklogLayout, product: &str) -> Freshness {
        let walk = layout.walk(product);
        let latest = walk
            .files
            .iter()
            .filter_map(|f| f.modified)
            .max()
            .unwrap_or(SystemTime::UNIX_EPOCH);

        Freshness {
            latest,
            files: walk.files.len(),
            root_exists: walk.root_exists,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn staleness_rules() {
        let base = Freshness {
            latest: SystemTime::UNIX_EPOCH + Duration::from_secs(100),
            files: 3,
            root_exists: true,
        };

        assert!(!base.is_stale(&base));
        assert!(base.is_stale(&Freshness {
            latest: base.latest + Duration::from_secs(1),
            ..base
        }));
        assert!(base.is_stale(&Freshness { files: 2, ..base }));
        assert!(base.is_stale(&Freshness {
            root_exists: false,
            ..base
        }));
        // older mtimes alone do not invalidate
        assert!(!base.is_stale(&Freshness {
            latest: SystemTime::UNIX_EPOCH,
            ..base
        }));
    }

    #[test]
    fn scans_tracked_files() {
        let dir = TempDir::new().unwrap();
        let items = dir.path().join("products/app/items/task");
        fs::create_dir_all(&items).unwrap();
        fs::write(items.join("T-1.md"), "---\nid: T-1\n---\n").unwrap();
        fs::write(items.join("README.md"), "ignored").unwrap();

        let layout = BacklogLayout::new(dir.path());
        let marker = FsScanner.scan(&layout, "app");
        assert!(marker.root_exists);
        assert_eq!(marker.files, 1);
        assert!(marker.latest_utc().is_some());

        let missing = FsScanner.scan(&layout, "nope");
        assert_eq!(missing, Freshness::empty());
    }
}
