//! Bounded least-recently-used cache.
//!
//! [`LruCache`] memoizes compiled documents by source string. It wraps
//! [`lru::LruCache`], adding zero-capacity support and reporting only true
//! evictions from [`LruCache::put`].
//!
//! The cache takes `&mut self` for every recency-changing operation. Callers
//! sharing one cache across threads wrap it in a `Mutex`.
//!
//! # Example
//!
//! ```
//! use dj_cache::LruCache;
//!
//! let mut cache = LruCache::new(2);
//! cache.put("a", 1);
//! cache.put("b", 2);
//! cache.get(&"a");
//! assert_eq!(cache.put("c", 3), Some(("b", 2)));
//! assert!(cache.contains(&"a"));
//! ```

use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;

/// Default number of entries kept by a cache.
pub const DEFAULT_CAPACITY: usize = 100;

/// Fixed-capacity map evicting the least recently used entry when full.
pub struct LruCache<K, V> {
    /// `None` for a zero-capacity cache.
    inner: Option<lru::LruCache<K, V>>,
}

impl<K: Hash + Eq, V> LruCache<K, V> {
    /// Create an empty cache holding at most `capacity` entries.
    ///
    /// A zero-capacity cache stores nothing: every [`put`](Self::put) hands
    /// the entry straight back.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: NonZeroUsize::new(capacity).map(lru::LruCache::new),
        }
    }

    /// Look up a value and mark it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.as_mut()?.get(key)
    }

    /// Look up a value without changing recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.as_ref()?.peek(key)
    }

    /// Whether `key` is cached. Does not change recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.as_ref().is_some_and(|inner| inner.contains(key))
    }

    /// Insert or replace a value, marking it most recently used.
    ///
    /// Returns the entry evicted to make room, if any. Replacing the value of
    /// an existing key never evicts.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        let Some(inner) = self.inner.as_mut() else {
            return Some((key, value));
        };

        if inner.contains(&key) {
            inner.put(key, value);
            return None;
        }

        let evicted = inner.push(key, value);
        if evicted.is_some() {
            tracing::debug!(capacity = inner.cap().get(), "Evicted least recently used entry");
        }
        evicted
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, lru::LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.as_ref().map_or(0, |inner| inner.cap().get())
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        if let Some(inner) = self.inner.as_mut() {
            inner.clear();
        }
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.inner
            .iter()
            .flat_map(|inner| inner.iter().map(|(key, _)| key))
    }
}

impl<K: Hash + Eq, V> Default for LruCache<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<K: Hash + Eq, V> std::fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
