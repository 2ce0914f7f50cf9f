//! # Snapshot Cache
//!
//! In-process caching for the two hot reads: the product catalog and the
//! store settings.
//!
//! ## Cache Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Snapshot Cache States                              │
//! │                                                                         │
//! │  READ PATH                                                              │
//! │    get()            ── fresh value, or None                             │
//! │    last_known()     ── fresh value, else the retained stale one         │
//! │                                                                         │
//! │  WRITE PATH                                                             │
//! │    store(v)         ── v becomes both fresh and last-known              │
//! │    invalidate()     ── fresh is dropped, last-known is RETAINED         │
//! │                                                                         │
//! │  ┌─────────┐  store   ┌─────────┐  invalidate  ┌─────────┐             │
//! │  │  Empty  │ ───────► │  Fresh  │ ───────────► │  Stale  │             │
//! │  └─────────┘          └─────────┘ ◄─────────── └─────────┘             │
//! │                                      store                              │
//! │                                                                         │
//! │  The stale value exists so a failed refetch can keep the register      │
//! │  selling: reads degrade to the last good snapshot instead of           │
//! │  blanking the screen.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every catalog or settings write invalidates; the next read refetches.
//! TTLs are deliberately absent: on a single till, writes are the only
//! source of staleness.

use std::sync::{Arc, RwLock};

/// A single cached snapshot with explicit staleness.
///
/// Cloneable handle; clones share the same slot.
#[derive(Debug, Clone)]
pub struct SnapshotCache<T> {
    inner: Arc<RwLock<Slot<T>>>,
}

#[derive(Debug)]
struct Slot<T> {
    fresh: Option<T>,
    /// Last value that was ever fresh. Survives invalidation.
    last_known: Option<T>,
}

impl<T: Clone> SnapshotCache<T> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        SnapshotCache {
            inner: Arc::new(RwLock::new(Slot {
                fresh: None,
                last_known: None,
            })),
        }
    }

    /// Returns the fresh value, if any.
    pub fn get(&self) -> Option<T> {
        let slot = self.inner.read().expect("cache lock poisoned");
        slot.fresh.clone()
    }

    /// Returns the fresh value, falling back to the retained stale one.
    ///
    /// Used when a refetch fails and the caller prefers old data over no
    /// data.
    pub fn last_known(&self) -> Option<T> {
        let slot = self.inner.read().expect("cache lock poisoned");
        slot.fresh.clone().or_else(|| slot.last_known.clone())
    }

    /// Stores a freshly fetched value.
    pub fn store(&self, value: T) {
        let mut slot = self.inner.write().expect("cache lock poisoned");
        slot.last_known = Some(value.clone());
        slot.fresh = Some(value);
    }

    /// Drops the fresh value, keeping the last-known one for degraded
    /// reads. Called after every write to the underlying table.
    pub fn invalidate(&self) {
        let mut slot = self.inner.write().expect("cache lock poisoned");
        slot.fresh = None;
    }

    /// Drops everything. Only tests need this.
    pub fn clear(&self) {
        let mut slot = self.inner.write().expect("cache lock poisoned");
        slot.fresh = None;
        slot.last_known = None;
    }
}

impl<T: Clone> Default for SnapshotCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache_has_nothing() {
        let cache: SnapshotCache<Vec<i64>> = SnapshotCache::new();
        assert!(cache.get().is_none());
        assert!(cache.last_known().is_none());
    }

    #[test]
    fn test_store_then_get() {
        let cache = SnapshotCache::new();
        cache.store(vec![1, 2, 3]);

        assert_eq!(cache.get(), Some(vec![1, 2, 3]));
        assert_eq!(cache.last_known(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_invalidate_retains_last_known() {
        let cache = SnapshotCache::new();
        cache.store(vec![1, 2, 3]);
        cache.invalidate();

        // Fresh is gone, but a degraded read still works
        assert!(cache.get().is_none());
        assert_eq!(cache.last_known(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_store_after_invalidate_refreshes() {
        let cache = SnapshotCache::new();
        cache.store(vec![1]);
        cache.invalidate();
        cache.store(vec![1, 2]);

        assert_eq!(cache.get(), Some(vec![1, 2]));
        assert_eq!(cache.last_known(), Some(vec![1, 2]));
    }

    #[test]
    fn test_clones_share_the_slot() {
        let cache = SnapshotCache::new();
        let handle = cache.clone();

        cache.store(vec![42]);
        assert_eq!(handle.get(), Some(vec![42]));

        handle.invalidate();
        assert!(cache.get().is_none());
    }
}
