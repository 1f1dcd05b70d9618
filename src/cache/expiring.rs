//! Expiring Cache Module
//!
//! Wraps a [`KvStore`] with expiry enforcement, value encoding and statistics.
//! Reads fail open: any store failure or undecodable entry is reported as a
//! miss so callers fall back to fetching and rendering fresh.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats, Clock, KvStore};
use crate::error::Result;

// == Expiring Cache ==
/// Shared handle to the cache layer.
#[derive(Clone)]
pub struct ExpiringCache {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    stats: Arc<Mutex<CacheStats>>,
}

impl ExpiringCache {
    // == Constructor ==
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            stats: Arc::new(Mutex::new(CacheStats::new())),
        }
    }

    // == Get ==
    /// Returns the live value stored under `key`, or `None`.
    pub async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.record(CacheStats::record_miss);
                return None;
            }
            Err(err) => {
                warn!(key, error = %err, "cache read failed, treating as miss");
                self.record(|stats| {
                    stats.record_error();
                    stats.record_miss();
                });
                return None;
            }
        };

        let entry = match CacheEntry::from_json(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(key, error = %err, "discarding unreadable cache entry");
                self.record(CacheStats::record_miss);
                return None;
            }
        };

        if entry.is_expired_at(self.clock.now_ms()) {
            debug!(key, "cache entry expired");
            self.record(CacheStats::record_miss);
            return None;
        }

        match entry.payload() {
            Ok(bytes) => {
                self.record(CacheStats::record_hit);
                Some(bytes)
            }
            Err(err) => {
                warn!(key, error = %err, "discarding undecodable cache payload");
                self.record(CacheStats::record_miss);
                None
            }
        }
    }

    /// [`ExpiringCache::get`] for UTF-8 text values.
    pub async fn get_string(&self, key: &str) -> Option<String> {
        let bytes = self.get(key).await?;
        String::from_utf8(bytes).ok()
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl_seconds`, replacing any previous
    /// entry.
    pub async fn set(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<()> {
        let entry = CacheEntry::new(value, ttl_seconds, self.clock.now_ms());
        let raw = entry.to_json()?;

        match self.store.set(key, raw, ttl_seconds).await {
            Ok(()) => {
                debug!(key, ttl_seconds, "cache entry written");
                self.record(CacheStats::record_write);
                Ok(())
            }
            Err(err) => {
                self.record(CacheStats::record_error);
                Err(err)
            }
        }
    }

    // == Delete ==
    pub async fn delete(&self, key: &str) -> Result<bool> {
        self.store.delete(key).await
    }

    // == Delete By Namespace ==
    /// Removes every entry built in `namespace` and returns the count.
    pub async fn delete_by_namespace(&self, namespace: &str) -> Result<usize> {
        let prefix = format!("{namespace}_");
        self.store.delete_by_prefix(&prefix).await
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.stats
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, update: impl FnOnce(&mut CacheStats)) {
        let mut stats = self
            .stats
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        update(&mut stats);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use async_trait::async_trait;
    use tokio::sync::RwLock;

    use crate::cache::{build_key, ManualClock, MemoryStore};
    use crate::error::CacheError;

    /// Store that never expires anything on its own.
    #[derive(Default)]
    struct LazyStore {
        entries: RwLock<HashMap<String, String>>,
    }

    #[async_trait]
    impl KvStore for LazyStore {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self.entries.read().await.get(key).cloned())
        }

        async fn set(&self, key: &str, value: String, _ttl_seconds: u64) -> Result<()> {
            self.entries.write().await.insert(key.to_string(), value);
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<bool> {
            Ok(self.entries.write().await.remove(key).is_some())
        }

        async fn delete_by_prefix(&self, prefix: &str) -> Result<usize> {
            let mut entries = self.entries.write().await;
            let before = entries.len();
            entries.retain(|key, _| !key.starts_with(prefix));
            Ok(before - entries.len())
        }
    }

    /// Store whose every operation fails.
    struct BrokenStore;

    #[async_trait]
    impl KvStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(CacheError::Backend("connection reset".into()))
        }

        async fn set(&self, _key: &str, _value: String, _ttl_seconds: u64) -> Result<()> {
            Err(CacheError::Backend("connection reset".into()))
        }

        async fn delete(&self, _key: &str) -> Result<bool> {
            Err(CacheError::Backend("connection reset".into()))
        }

        async fn delete_by_prefix(&self, _prefix: &str) -> Result<usize> {
            Err(CacheError::Backend("connection reset".into()))
        }
    }

    fn memory_cache() -> (ExpiringCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let store = Arc::new(MemoryStore::with_clock(clock.clone()));
        (ExpiringCache::new(store, clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let (cache, _) = memory_cache();

        cache.set("output_k", b"<b>hi</b>", 60).await.unwrap();

        assert_eq!(cache.get("output_k").await.unwrap(), b"<b>hi</b>");
        assert_eq!(cache.get_string("output_k").await.unwrap(), "<b>hi</b>");
    }

    #[tokio::test]
    async fn test_empty_value_is_a_hit() {
        let (cache, _) = memory_cache();

        cache.set("output_empty", b"", 60).await.unwrap();

        assert_eq!(cache.get("output_empty").await, Some(Vec::new()));
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_absent_even_if_not_swept() {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let store = Arc::new(LazyStore::default());
        let cache = ExpiringCache::new(store.clone(), clock.clone());

        cache.set("output_k", b"value", 10).await.unwrap();
        assert!(cache.get("output_k").await.is_some());

        clock.advance_secs(10);

        assert_eq!(cache.get("output_k").await, None);
        assert!(store.entries.read().await.contains_key("output_k"));
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value_and_expiry() {
        let (cache, clock) = memory_cache();

        cache.set("k", b"first", 5).await.unwrap();
        cache.set("k", b"second", 60).await.unwrap();
        clock.advance_secs(30);

        assert_eq!(cache.get("k").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let clock = Arc::new(ManualClock::new(0));
        let store = Arc::new(LazyStore::default());
        store.set("output_bad", "not json".to_string(), 60).await.unwrap();
        let cache = ExpiringCache::new(store, clock);

        assert_eq!(cache.get("output_bad").await, None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[tokio::test]
    async fn test_store_failure_fails_open_on_read() {
        let cache = ExpiringCache::new(Arc::new(BrokenStore), Arc::new(ManualClock::new(0)));

        assert_eq!(cache.get("output_k").await, None);

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.errors, 1);
    }

    #[tokio::test]
    async fn test_store_failure_propagates_on_write() {
        let cache = ExpiringCache::new(Arc::new(BrokenStore), Arc::new(ManualClock::new(0)));

        let result = cache.set("output_k", b"value", 60).await;
        assert!(matches!(result, Err(CacheError::Backend(_))));
        assert_eq!(cache.stats().errors, 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let (cache, _) = memory_cache();

        cache.set("k", b"v", 60).await.unwrap();

        assert!(cache.delete("k").await.unwrap());
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_delete_by_namespace_is_isolated() {
        let (cache, _) = memory_cache();

        for repo in ["a", "b", "c"] {
            let key = build_key("output", &["alice", repo]);
            cache.set(&key, b"html", 60).await.unwrap();
        }
        let api_key = build_key("apidata", &["alice", "a"]);
        cache.set(&api_key, b"{}", 60).await.unwrap();

        assert_eq!(cache.delete_by_namespace("output").await.unwrap(), 3);
        assert_eq!(cache.get(&api_key).await.unwrap(), b"{}");
        assert_eq!(cache.delete_by_namespace("output").await.unwrap(), 0);
    }
}
