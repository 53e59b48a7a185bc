use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::cache::{Counters, LoadContext, ProductSlot};
use crate::error::Result;
use crate::freshness::{FreshnessScanner, FsScanner};
use crate::layout::{validate_product_name, BacklogLayout};
use crate::models::{CacheStats, ItemDetail, ItemListing, KanbanView, TreeView, WorkspaceInfo};
use crate::snapshot::Snapshot;
use crate::views::{self, item_view};
use crate::workspace::resolve_workspace_root;

/// The current root plus one cache slot per product seen under it.
struct WorkspaceState {
    layout: BacklogLayout,
    products: Mutex<HashMap<String, Arc<ProductSlot>>>,
}

impl WorkspaceState {
    fn new(root: PathBuf) -> Self {
        Self {
            layout: BacklogLayout::new(root),
            products: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, product: &str) -> Arc<ProductSlot> {
        let mut products = self.products.lock();
        Arc::clone(products.entry(product.to_string()).or_default())
    }

    /// Drop `slot` unless another caller already replaced it.
    fn forget(&self, product: &str, slot: &Arc<ProductSlot>) {
        let mut products = self.products.lock();
        if products.get(product).is_some_and(|s| Arc::ptr_eq(s, slot)) {
            products.remove(product);
        }
    }
}

struct Inner {
    workspace: RwLock<WorkspaceState>,
    scanner: Box<dyn FreshnessScanner>,
    counters: Counters,
}

/// Read-through cache over a backlog workspace.
///
/// Cheap to clone; every clone shares the same cache. All operations block on
/// filesystem I/O.
#[derive(Clone)]
pub struct BacklogService {
    inner: Arc<Inner>,
}

impl BacklogService {
    /// Serve the backlog rooted at `root` (the directory holding `products/`).
    ///
    /// The root is taken as-is; it may not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_scanner(root, FsScanner)
    }

    pub fn with_scanner(root: impl Into<PathBuf>, scanner: impl FreshnessScanner + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                workspace: RwLock::new(WorkspaceState::new(root.into())),
                scanner: Box::new(scanner),
                counters: Counters::default(),
            }),
        }
    }

    /// Current snapshot for `product`, reloading it first when stale or forced.
    pub fn snapshot(&self, product: &str, force: bool) -> Result<Arc<Snapshot>> {
        let product = validate_product_name(product)?;

        // Held for the whole load so a workspace switch waits for it.
        let workspace = self.inner.workspace.read();
        let ctx = LoadContext {
            layout: &workspace.layout,
            product,
            scanner: self.inner.scanner.as_ref(),
            counters: &self.inner.counters,
        };
        let slot = workspace.slot(product);
        let snapshot = slot.snapshot(&ctx, force);
        // Products without a root directory are not kept.
        if !snapshot.freshness().root_exists {
            workspace.forget(product, &slot);
        }
        Ok(snapshot)
    }

    pub fn list_products(&self) -> Vec<String> {
        self.inner.workspace.read().layout.product_names()
    }

    /// Every record of `product` in discovery order, invalid ones included.
    pub fn list_items(&self, product: &str, force: bool) -> Result<ItemListing> {
        let snapshot = self.snapshot(product, force)?;
        Ok(ItemListing {
            product: snapshot.product().to_string(),
            items: snapshot
                .records()
                .iter()
                .map(|r| item_view(&snapshot, r, false))
                .collect(),
            warnings: snapshot.warnings().to_vec(),
            cached_at: snapshot.freshness().latest_utc(),
            loaded_at: snapshot.loaded_at(),
        })
    }

    /// The canonical record for `id`, with raw content, plus every duplicate.
    pub fn get_item(&self, product: &str, id: &str, force: bool) -> Result<Option<ItemDetail>> {
        let snapshot = self.snapshot(product, force)?;
        let Some(record) = snapshot.get(id) else {
            return Ok(None);
        };

        Ok(Some(ItemDetail {
            item: item_view(&snapshot, record, true),
            duplicates: snapshot
                .occurrences(id)
                .map(|r| item_view(&snapshot, r, false))
                .collect(),
        }))
    }

    pub fn build_tree(&self, product: &str, force: bool) -> Result<TreeView> {
        let snapshot = self.snapshot(product, force)?;
        Ok(views::build_tree(&snapshot))
    }

    pub fn build_kanban(&self, product: &str, force: bool) -> Result<KanbanView> {
        let snapshot = self.snapshot(product, force)?;
        Ok(views::build_kanban(&snapshot))
    }

    /// Force a reload of `product` and return its listing.
    pub fn refresh(&self, product: &str) -> Result<ItemListing> {
        self.list_items(product, true)
    }

    /// Drop every cached snapshot. The next access to any product reloads it.
    pub fn invalidate_all(&self) {
        let workspace = self.inner.workspace.read();
        let dropped = {
            let mut products = workspace.products.lock();
            let count = products.len();
            products.clear();
            count
        };
        tracing::info!(products = dropped, "Invalidated all product snapshots");
    }

    pub fn workspace_info(&self) -> WorkspaceInfo {
        let workspace = self.inner.workspace.read();
        let layout = &workspace.layout;
        WorkspaceInfo {
            workspace_root: layout.root().to_string_lossy().into_owned(),
            products_root: layout.products_dir().to_string_lossy().into_owned(),
            exists: layout.root().exists(),
            valid: layout.products_dir().is_dir(),
        }
    }

    /// Point the service at another backlog root, discarding every snapshot.
    ///
    /// The path is resolved before anything changes; on error the current
    /// workspace and its snapshots are left untouched.
    pub fn switch_workspace(&self, input: &str) -> Result<WorkspaceInfo> {
        let root = resolve_workspace_root(input).inspect_err(|e| {
            tracing::warn!(input, error = %e, "Rejected workspace switch");
        })?;

        {
            let mut workspace = self.inner.workspace.write();
            *workspace = WorkspaceState::new(root.clone());
        }
        tracing::info!(root = %root.display(), "Switched workspace");
        Ok(self.workspace_info())
    }

    /// Names of the products holding a cache slot, sorted.
    pub fn cached_products(&self) -> Vec<String> {
        let workspace = self.inner.workspace.read();
        let mut names: Vec<String> = workspace.products.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.counters.stats()
    }
}
