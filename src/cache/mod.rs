//! Expiring key-value cache with an injected clock

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Longest lifetime an entry is given; longer TTLs are clamped to it
pub const MAX_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Cache whose entries expire after a per-entry TTL
///
/// Expired entries are never returned by [`TtlCache::get`]; they are dropped
/// from memory by [`TtlCache::evict_expired`], which `put` also runs.
#[derive(Debug)]
pub struct TtlCache<K, V, C = SystemClock> {
    entries: HashMap<K, CacheEntry<V>>,
    clock: C,
    /// Cache hit count for statistics
    hit_count: usize,
    /// Cache miss count for statistics
    miss_count: usize,
}

impl<K: Eq + Hash, V> TtlCache<K, V, SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<K: Eq + Hash, V> Default for TtlCache<K, V, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V, C: Clock> TtlCache<K, V, C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
            hit_count: 0,
            miss_count: 0,
        }
    }

    /// Insert or replace `key`, valid for `ttl` from now (at most [`MAX_TTL`])
    pub fn put(&mut self, key: K, value: V, ttl: Duration) {
        self.evict_expired();
        let now = self.clock.now();
        let expires_at = now.checked_add(ttl.min(MAX_TTL)).unwrap_or(now);
        self.entries.insert(key, CacheEntry { value, expires_at });
    }

    /// Live value for `key`
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let now = self.clock.now();
        match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => {
                self.hit_count += 1;
                Some(&entry.value)
            }
            _ => {
                self.miss_count += 1;
                None
            }
        }
    }

    /// Remaining lifetime of a live entry
    pub fn time_to_live(&self, key: &K) -> Option<Duration> {
        let now = self.clock.now();
        self.entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.expires_at - now)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// Drop every expired entry, returning how many were removed
    pub fn evict_expired(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before - self.entries.len()
    }

    /// Entries held, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get cache statistics: (hits, misses, hit rate)
    pub fn get_statistics(&self) -> (usize, usize, f64) {
        let total = self.hit_count + self.miss_count;
        let hit_rate = if total > 0 {
            self.hit_count as f64 / total as f64
        } else {
            0.0
        };

        (self.hit_count, self.miss_count, hit_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_before_and_after_expiry() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(clock.clone());

        cache.put("vehicle-1", "jwt-a", Duration::from_secs(60));
        assert_eq!(cache.get(&"vehicle-1"), Some(&"jwt-a"));

        clock.advance(Duration::from_secs(59));
        assert_eq!(cache.get(&"vehicle-1"), Some(&"jwt-a"));
        assert_eq!(cache.time_to_live(&"vehicle-1"), Some(Duration::from_secs(1)));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get(&"vehicle-1"), None);
        assert_eq!(cache.time_to_live(&"vehicle-1"), None);
        // Still held until evicted
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_evict_expired() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(clock.clone());
        cache.put(1, "short", Duration::from_secs(10));
        cache.put(2, "long", Duration::from_secs(100));

        clock.advance(Duration::from_secs(50));
        assert_eq!(cache.evict_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&2), Some(&"long"));
        assert_eq!(cache.evict_expired(), 0);
    }

    #[test]
    fn test_put_replaces_and_sweeps() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(clock.clone());
        cache.put("a", 1, Duration::from_secs(5));
        cache.put("b", 2, Duration::from_secs(5));
        clock.advance(Duration::from_secs(6));

        cache.put("a", 3, Duration::from_secs(5));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"a"), Some(&3));
    }

    #[test]
    fn test_huge_ttl_is_clamped() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(clock.clone());
        cache.put(1, 1, Duration::from_secs(u64::MAX));
        assert_eq!(cache.get(&1), Some(&1));
        assert_eq!(cache.time_to_live(&1), Some(MAX_TTL));

        clock.advance(MAX_TTL);
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn test_statistics() {
        let mut cache: TtlCache<&str, u32> = TtlCache::new();
        assert!(cache.get(&"missing").is_none());
        cache.put("present", 7, Duration::from_secs(60));
        assert_eq!(cache.get(&"present"), Some(&7));

        let (hits, misses, hit_rate) = cache.get_statistics();
        assert_eq!(hits, 1);
        assert_eq!(misses, 1);
        assert!((hit_rate - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cache: TtlCache<u8, u8> = TtlCache::new();
        cache.put(1, 1, Duration::from_secs(60));
        cache.put(2, 2, Duration::from_secs(60));
        assert_eq!(cache.remove(&1), Some(1));
        cache.clear();
        assert!(cache.is_empty());
    }
}
