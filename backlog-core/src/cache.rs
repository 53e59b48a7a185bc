//! Product Cache: one slot per product, holding the current snapshot.
//!
//! Readers clone the current `Arc<Snapshot>` and release the lock right away.
//! Reloads are serialized per product by a separate mutex, so a reload never
//! blocks readers of the previous snapshot and products never contend with
//! each other.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::freshness::{Freshness, FreshnessScanner};
use crate::layout::BacklogLayout;
use crate::models::CacheStats;
use crate::snapshot::Snapshot;

/// Process-wide scan and reload counters.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    scans: AtomicU64,
    reloads: AtomicU64,
}

impl Counters {
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            scans: self.scans.load(Ordering::Relaxed),
            reloads: self.reloads.load(Ordering::Relaxed),
        }
    }
}

/// Everything a slot needs to scan or reload its product.
pub(crate) struct LoadContext<'a> {
    pub layout: &'a BacklogLayout,
    pub product: &'a str,
    pub scanner: &'a dyn FreshnessScanner,
    pub counters: &'a Counters,
}

impl LoadContext<'_> {
    fn scan(&self) -> Freshness {
        self.counters.scans.fetch_add(1, Ordering::Relaxed);
        self.scanner.scan(self.layout, self.product)
    }
}

#[derive(Debug, Default)]
pub(crate) struct ProductSlot {
    current: RwLock<Option<Arc<Snapshot>>>,
    reload: Mutex<()>,
    started: AtomicU64,
    finished: AtomicU64,
}

impl ProductSlot {
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.read().clone()
    }

    /// Return a snapshot that is fresh as of this call, reloading if needed.
    ///
    /// Concurrent callers share one reload. A forced caller is satisfied by a
    /// reload that started after it arrived, or by one already running when
    /// it arrived as long as the result is not stale.
    pub fn snapshot(&self, ctx: &LoadContext<'_>, force: bool) -> Arc<Snapshot> {
        if !force {
            if let Some(current) = self.current() {
                if !current.freshness().is_stale(&ctx.scan()) {
                    return current;
                }
            }
        }

        let arrived = self.started.load(Ordering::SeqCst);
        let in_flight = arrived > self.finished.load(Ordering::SeqCst);

        let _reload = self.reload.lock();

        let mut marker = None;
        if let Some(current) = self.current() {
            if force && self.started.load(Ordering::SeqCst) > arrived {
                tracing::debug!(product = ctx.product, "Reusing snapshot from concurrent reload");
                return current;
            }
            if !force || in_flight {
                let now = ctx.scan();
                if !current.freshness().is_stale(&now) {
                    tracing::debug!(product = ctx.product, "Snapshot still fresh after waiting");
                    return current;
                }
                marker = Some(now);
            }
        }

        tracing::debug!(product = ctx.product, force, "Reloading product");
        self.started.fetch_add(1, Ordering::SeqCst);
        let marker = marker.unwrap_or_else(|| ctx.scan());
        let snapshot = Arc::new(Snapshot::load(ctx.layout, ctx.product, marker));
        ctx.counters.reloads.fetch_add(1, Ordering::Relaxed);

        *self.current.write() = Some(Arc::clone(&snapshot));
        self.finished.fetch_add(1, Ordering::SeqCst);
        snapshot
    }
}
