//! Bounded LRU cache with TTL, keyed by post slug.
//!
//! Holds extraction results between requests. Entries past the TTL are
//! dropped on access; the least recently used entry is evicted at capacity.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Thread-safe LRU cache with a time-to-live.
pub struct BoundedCache<V> {
    inner: Mutex<CacheInner<V>>,
}

struct CacheInner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Least recently used first.
    order: Vec<String>,
    max_size: usize,
    ttl: Duration,
}

impl<V: Clone> BoundedCache<V> {
    /// Create a cache with the given capacity (at least 1) and TTL.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        let max_size = max_size.max(1);
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(max_size),
                order: Vec::with_capacity(max_size),
                max_size,
                ttl,
            }),
        }
    }

    /// Get a cached value. Returns None on miss or expired entry.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.lock();

        let expired = inner
            .entries
            .get(key)
            .map(|e| e.inserted_at.elapsed() >= inner.ttl)?;

        if expired {
            inner.entries.remove(key);
            inner.order.retain(|k| k != key);
            return None;
        }

        if let Some(pos) = inner.order.iter().position(|k| k == key) {
            let k = inner.order.remove(pos);
            inner.order.push(k);
        }
        inner.entries.get(key).map(|e| e.value.clone())
    }

    /// Insert or replace a value, evicting the least recently used at capacity.
    pub fn put(&self, key: String, value: V) {
        let mut inner = self.inner.lock();

        if inner.entries.contains_key(&key) {
            inner.order.retain(|k| k != &key);
        } else {
            while inner.entries.len() >= inner.max_size && !inner.order.is_empty() {
                let oldest = inner.order.remove(0);
                inner.entries.remove(&oldest);
            }
        }

        inner.order.push(key.clone());
        inner.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop a single key. Returns whether it was present.
    pub fn remove(&self, key: &str) -> bool {
        let mut inner = self.inner.lock();
        inner.order.retain(|k| k != key);
        inner.entries.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().max_size
    }

    /// Clear all entries, returning how many were dropped.
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.lock();
        let n = inner.entries.len();
        inner.entries.clear();
        inner.order.clear();
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_hit_and_miss() {
        let cache = BoundedCache::new(10, Duration::from_secs(3600));
        assert!(cache.get("bangkok-food-tour").is_none());

        cache.put("bangkok-food-tour".into(), vec![1, 2, 3]);
        assert_eq!(cache.get("bangkok-food-tour"), Some(vec![1, 2, 3]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_evicts_least_recently_used() {
        let cache = BoundedCache::new(2, Duration::from_secs(3600));
        cache.put("a".into(), 1);
        cache.put("b".into(), 2);
        // Touch "a" so "b" becomes the eviction candidate.
        assert_eq!(cache.get("a"), Some(1));

        cache.put("c".into(), 3);
        assert_eq!(cache.len(), 2);
        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_cache_ttl_expiry() {
        let cache = BoundedCache::new(10, Duration::from_millis(1));
        cache.put("ephemeral".into(), 1);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("ephemeral").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = BoundedCache::new(10, Duration::from_secs(60));
        cache.put("a".into(), 1);
        cache.put("b".into(), 2);
        assert!(cache.remove("a"));
        assert!(!cache.remove("a"));
        assert_eq!(cache.clear(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let cache = BoundedCache::new(0, Duration::from_secs(60));
        cache.put("a".into(), 1);
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.get("a"), Some(1));
    }
}
