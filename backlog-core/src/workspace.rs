//! Workspace root resolution.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BacklogError, Result};
use crate::layout::PRODUCTS_DIR;

const NESTED_BACKLOG_DIRS: [&[&str]; 2] = [&["_kano", "backlog"], &["backlog"]];

/// Resolve user input to a backlog root (the directory holding `products/`).
///
/// Accepted, after trimming:
/// 1. a directory containing `products/`
/// 2. the `products/` directory itself
/// 3. a single product directory directly under `products/`
/// 4. a repository root whose `_kano/backlog/` (or `backlog/`) folder
///    contains `products/`
///
/// The result is canonicalized.
pub fn resolve_workspace_root(input: &str) -> Result<PathBuf> {
    let input = input.trim();
    if input.is_empty() {
        return Err(BacklogError::MissingWorkspacePath);
    }

    let requested = PathBuf::from(input);
    let invalid = |reason: &str| BacklogError::InvalidWorkspace {
        path: requested.clone(),
        reason: reason.to_string(),
    };

    let path = fs::canonicalize(&requested).map_err(|e| invalid(&e.to_string()))?;
    if !path.is_dir() {
        return Err(invalid("not a directory"));
    }

    candidates(&path)
        .into_iter()
        .find(|root| root.join(PRODUCTS_DIR).is_dir())
        .ok_or_else(|| invalid("no products directory found"))
}

fn candidates(path: &Path) -> Vec<PathBuf> {
    let mut found = vec![path.to_path_buf()];

    if path.file_name().is_some_and(|n| n == PRODUCTS_DIR) {
        if let Some(parent) = path.parent() {
            found.push(parent.to_path_buf());
        }
    }

    if let Some(parent) = path.parent() {
        if parent.file_name().is_some_and(|n| n == PRODUCTS_DIR) {
            if let Some(grandparent) = parent.parent() {
                found.push(grandparent.to_path_buf());
            }
        }
    }

    for nested in NESTED_BACKLOG_DIRS {
        found.push(nested.iter().fold(path.to_path_buf(), |acc, part| acc.join(part)));
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn backlog(dir: &Path) -> PathBuf {
        let root = dir.join("backlog");
        fs::create_dir_all(root.join("products/app/items")).unwrap();
        fs::canonicalize(root).unwrap()
    }

    #[test]
    fn accepts_every_supported_shape() {
        let dir = TempDir::new().unwrap();
        let root = backlog(dir.path());

        let inputs = [
            root.clone(),
            root.join("products"),
            root.join("products/app"),
            dir.path().to_path_buf(),
        ];
        for input in inputs {
            let resolved = resolve_workspace_root(&format!("  {}  ", input.display())).unwrap();
            assert_eq!(resolved, root, "input {}", input.display());
        }
    }

    #[test]
    fn accepts_repository_root_with_kano_backlog() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("_kano/backlog");
        fs::create_dir_all(root.join("products/app/items")).unwrap();
        let root = fs::canonicalize(root).unwrap();

        let resolved = resolve_workspace_root(&dir.path().display().to_string()).unwrap();
        assert_eq!(resolved, root);

        let from_product =
            resolve_workspace_root(&root.join("products/app").display().to_string()).unwrap();
        assert_eq!(from_product, root);
    }

    #[test]
    fn rejects_empty_and_unusable_input() {
        assert!(matches!(
            resolve_workspace_root("   "),
            Err(BacklogError::MissingWorkspacePath)
        ));

        let dir = TempDir::new().unwrap();
        assert!(matches!(
            resolve_workspace_root(&dir.path().join("nope").display().to_string()),
            Err(BacklogError::InvalidWorkspace { .. })
        ));
        assert!(matches!(
            resolve_workspace_root(&dir.path().display().to_string()),
            Err(BacklogError::InvalidWorkspace { .. })
        ));
    }
}
