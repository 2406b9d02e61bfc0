//! Memoization cell for derived views of an immutable tree.
//!
//! A [`DerivedCache`] holds at most one computed value together with a weak
//! handle to the owner it was computed from. A lookup only hits when the
//! owner passed in is the very same allocation, so replacing a tree with an
//! edited copy invalidates the cached view without any bookkeeping.
//!
//! The cell never locks. Two threads racing on a cold cell both compute the
//! view and the last store wins; both values are equal because the owner is
//! immutable.

use std::fmt;
use std::sync::{Arc, Weak};

use arc_swap::ArcSwapOption;
use tracing::debug;

struct Slot<O, T> {
    owner: Weak<O>,
    value: Arc<T>,
}

/// A compute-once, overwrite-on-mismatch cache keyed by owner identity.
pub struct DerivedCache<O, T> {
    slot: ArcSwapOption<Slot<O, T>>,
}

impl<O, T> DerivedCache<O, T> {
    /// Create an empty cell.
    pub fn new() -> Self {
        DerivedCache {
            slot: ArcSwapOption::empty(),
        }
    }

    /// The cached value, if it was computed from `owner`.
    pub fn get(&self, owner: &Arc<O>) -> Option<Arc<T>> {
        let guard = self.slot.load();
        match &*guard {
            Some(slot) if std::ptr::eq(slot.owner.as_ptr(), Arc::as_ptr(owner)) => {
                Some(Arc::clone(&slot.value))
            }
            _ => None,
        }
    }

    /// Return the cached value for `owner`, computing and storing it on a miss.
    pub fn get_or_compute<F>(&self, owner: &Arc<O>, compute: F) -> Arc<T>
    where
        F: FnOnce(&O) -> T,
    {
        if let Some(value) = self.get(owner) {
            return value;
        }
        let value = Arc::new(compute(owner));
        self.slot.store(Some(Arc::new(Slot {
            owner: Arc::downgrade(owner),
            value: Arc::clone(&value),
        })));
        debug!(type_name = std::any::type_name::<T>(), "derived view recomputed");
        value
    }

    /// Returns true if a value computed from `owner` is cached.
    pub fn is_cached_for(&self, owner: &Arc<O>) -> bool {
        self.get(owner).is_some()
    }

    /// Drop the cached value. The next access recomputes it.
    pub fn evict(&self) {
        self.slot.store(None);
    }
}

impl<O, T> Default for DerivedCache<O, T> {
    fn default() -> Self {
        DerivedCache::new()
    }
}

/// Cloning yields an empty cell: a copied owner must derive its own views.
impl<O, T> Clone for DerivedCache<O, T> {
    fn clone(&self) -> Self {
        DerivedCache::new()
    }
}

impl<O, T> fmt::Debug for DerivedCache<O, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedCache")
            .field("cached", &self.slot.load().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Doc {
        words: Vec<&'static str>,
    }

    fn word_count(doc: &Doc) -> usize {
        doc.words.len()
    }

    #[test]
    fn computes_once_per_owner() {
        let cache = DerivedCache::<Doc, usize>::new();
        let doc = Arc::new(Doc {
            words: vec!["a", "b"],
        });
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let count = cache.get_or_compute(&doc, |d| {
                calls.fetch_add(1, Ordering::SeqCst);
                word_count(d)
            });
            assert_eq!(*count, 2);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn new_owner_misses_even_with_equal_content() {
        let cache = DerivedCache::<Doc, usize>::new();
        let first = Arc::new(Doc { words: vec!["a"] });
        let second = Arc::new(Doc { words: vec!["a"] });

        cache.get_or_compute(&first, word_count);
        assert!(cache.is_cached_for(&first));
        assert!(!cache.is_cached_for(&second));

        let edited = Arc::new(Doc {
            words: vec!["a", "b", "c"],
        });
        assert_eq!(*cache.get_or_compute(&edited, word_count), 3);
        assert!(!cache.is_cached_for(&first));
    }

    #[test]
    fn evict_forces_recompute() {
        let cache = DerivedCache::<Doc, usize>::new();
        let doc = Arc::new(Doc { words: vec!["a"] });
        cache.get_or_compute(&doc, word_count);
        cache.evict();
        assert!(cache.get(&doc).is_none());
    }

    #[test]
    fn clone_is_empty() {
        let cache = DerivedCache::<Doc, usize>::new();
        let doc = Arc::new(Doc { words: vec!["a"] });
        cache.get_or_compute(&doc, word_count);
        assert!(!cache.clone().is_cached_for(&doc));
    }

    #[test]
    fn concurrent_first_access_agrees() {
        let cache = DerivedCache::<Doc, usize>::new();
        let doc = Arc::new(Doc {
            words: vec!["x", "y", "z"],
        });

        let results: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| *cache.get_or_compute(&doc, word_count)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(results.iter().all(|&n| n == 3));
        assert_eq!(cache.get(&doc).map(|n| *n), Some(3));
    }
}
