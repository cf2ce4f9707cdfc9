//! Bounded memoization for sentiment and keyword computation
//!
//! Each table is an LRU map behind its own mutex. Values are computed outside
//! the lock, so two callers missing on the same key may both compute; the
//! computation is pure and the second insert simply refreshes the entry.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use lru::LruCache;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use crate::config::CacheConfig;
use crate::models::Keyword;
use crate::models::SentimentLabel;

/// Cache statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct Table<K: Hash + Eq, V> {
    entries: LruCache<K, V>,
    stats: CacheStats,
}

/// A single bounded key→value table; capacity 0 disables storage entirely
pub struct MemoCache<K: Hash + Eq, V> {
    name: &'static str,
    capacity: usize,
    table: Option<Mutex<Table<K, V>>>,
}

impl<K, V> MemoCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let table = NonZeroUsize::new(capacity).map(|cap| {
            Mutex::new(Table {
                entries: LruCache::new(cap),
                stats: CacheStats::default(),
            })
        });
        Self {
            name,
            capacity,
            table,
        }
    }

    /// A pass-through table that never stores anything
    pub fn disabled(name: &'static str) -> Self {
        Self::new(name, 0)
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub const fn is_enabled(&self) -> bool {
        self.table.is_some()
    }

    /// Stored value for `key`, or the result of `compute` which is then stored
    pub fn get_or_compute<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        let Some(table) = &self.table else {
            return compute();
        };

        {
            let mut guard = lock(table);
            if let Some(value) = guard.entries.get(&key) {
                let value = value.clone();
                guard.stats.hits += 1;
                return value;
            }
            guard.stats.misses += 1;
        }

        let value = compute();

        let mut guard = lock(table);
        if let Some((evicted, _)) = guard.entries.push(key.clone(), value.clone()) {
            if evicted != key {
                guard.stats.evictions += 1;
                debug!("Evicted least recently used entry from {} cache", self.name);
            }
        }
        value
    }

    /// Whether `key` is stored, without touching its recency
    pub fn contains(&self, key: &K) -> bool {
        self.table
            .as_ref()
            .is_some_and(|table| lock(table).entries.contains(key))
    }

    pub fn len(&self) -> usize {
        self.table
            .as_ref()
            .map_or(0, |table| lock(table).entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.table
            .as_ref()
            .map_or_else(CacheStats::default, |table| lock(table).stats)
    }

    pub fn clear(&self) {
        if let Some(table) = &self.table {
            let mut guard = lock(table);
            guard.entries.clear();
            guard.stats = CacheStats::default();
        }
    }

    pub fn info(&self) -> TableInfo {
        TableInfo {
            name: self.name,
            entries: self.len(),
            capacity: self.capacity,
            stats: self.stats(),
        }
    }
}

// A panic while holding the lock cannot leave a half-written entry behind,
// so a poisoned table is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Snapshot of one table for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct TableInfo {
    pub name: &'static str,
    pub entries: usize,
    pub capacity: usize,
    pub stats: CacheStats,
}

impl TableInfo {
    pub fn usage_percentage(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.entries as f64 / self.capacity as f64 * 100.0
        }
    }
}

/// Cache information for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct CacheInfo {
    pub enabled: bool,
    pub tables: Vec<TableInfo>,
}

impl CacheInfo {
    pub fn total_entries(&self) -> usize {
        self.tables.iter().map(|t| t.entries).sum()
    }
}

/// The three memo tables in front of the sentiment engine and keyword extractor
pub struct AnalysisCache {
    pub scores: MemoCache<String, f64>,
    pub labels: MemoCache<String, SentimentLabel>,
    pub keywords: MemoCache<(String, usize), Vec<Keyword>>,
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

impl AnalysisCache {
    pub fn from_config(config: &CacheConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self {
            scores: MemoCache::new("sentiment_score", config.sentiment_capacity),
            labels: MemoCache::new("sentiment_label", config.label_capacity),
            keywords: MemoCache::new("keywords", config.keyword_capacity),
        }
    }

    pub fn disabled() -> Self {
        Self {
            scores: MemoCache::disabled("sentiment_score"),
            labels: MemoCache::disabled("sentiment_label"),
            keywords: MemoCache::disabled("keywords"),
        }
    }

    pub fn clear_all(&self) {
        self.scores.clear();
        self.labels.clear();
        self.keywords.clear();
        info!("Cleared all analysis cache entries");
    }

    pub fn info(&self) -> CacheInfo {
        CacheInfo {
            enabled: self.scores.is_enabled()
                || self.labels.is_enabled()
                || self.keywords.is_enabled(),
            tables: vec![self.scores.info(), self.labels.info(), self.keywords.info()],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_hit_skips_compute() {
        let cache: MemoCache<String, u32> = MemoCache::new("test", 4);
        let calls = AtomicUsize::new(0);
        let compute = || {
            calls.fetch_add(1, Ordering::SeqCst);
            7
        };

        assert_eq!(cache.get_or_compute("a".into(), compute), 7);
        assert_eq!(cache.get_or_compute("a".into(), || unreachable!()), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let cache: MemoCache<u32, u32> = MemoCache::new("test", 2);
        cache.get_or_compute(1, || 10);
        cache.get_or_compute(2, || 20);
        // touch 1 so 2 becomes the eviction candidate
        cache.get_or_compute(1, || unreachable!());
        cache.get_or_compute(3, || 30);

        assert!(cache.contains(&1));
        assert!(!cache.contains(&2));
        assert!(cache.contains(&3));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_disabled_cache_always_computes() {
        let cache: MemoCache<u32, u32> = MemoCache::disabled("off");
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let v = cache.get_or_compute(1, || {
                calls.fetch_add(1, Ordering::SeqCst);
                5
            });
            assert_eq!(v, 5);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(!cache.is_enabled());
        assert!(cache.is_empty());
        assert!(!cache.contains(&1));
    }

    #[test]
    fn test_clear_resets_entries_and_stats() {
        let cache: MemoCache<u32, u32> = MemoCache::new("test", 8);
        cache.get_or_compute(1, || 1);
        cache.get_or_compute(1, || 1);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_concurrent_access_is_consistent() {
        let cache: Arc<MemoCache<u32, u32>> = Arc::new(MemoCache::new("test", 16));
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..200u32 {
                        let key = (i + worker) % 32;
                        assert_eq!(cache.get_or_compute(key, || key * 2), key * 2);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 16);
        let stats = cache.stats();
        assert_eq!(stats.hits + stats.misses, 8 * 200);
    }

    #[test]
    fn test_analysis_cache_from_config() {
        let cache = AnalysisCache::from_config(&CacheConfig {
            enabled: true,
            sentiment_capacity: 3,
            label_capacity: 2,
            keyword_capacity: 1,
        });
        let info = cache.info();
        assert!(info.enabled);
        assert_eq!(
            info.tables.iter().map(|t| t.capacity).collect::<Vec<_>>(),
            vec![3, 2, 1]
        );

        let off = AnalysisCache::from_config(&CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        });
        assert!(!off.info().enabled);
    }

    #[test]
    fn test_table_usage_percentage() {
        let cache: MemoCache<u32, u32> = MemoCache::new("test", 4);
        cache.get_or_compute(1, || 1);
        assert!((cache.info().usage_percentage() - 25.0).abs() < f64::EPSILON);
        assert!(MemoCache::<u32, u32>::disabled("off").info().usage_percentage().abs() < f64::EPSILON);
    }
}
