//! Cache Store Module
//!
//! The backing key-value store contract and an in-memory implementation of it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{Clock, SystemClock, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{CacheError, Result};

// == Store Contract ==
/// External expiring key-value store.
///
/// Implementations must make each `set` a single atomic overwrite. They may
/// sweep expired entries lazily; the cache layer re-checks expiry on read.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()>;

    /// Returns whether an entry was removed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Removes every entry whose key starts with `prefix` and returns how many
    /// were removed.
    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize>;
}

#[derive(Debug)]
struct StoredValue {
    value: String,
    expires_at: u64,
}

// == Memory Store ==
/// HashMap-backed store with per-entry expiry.
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoredValue>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, stored| now < stored.expires_at);
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones not yet
    /// swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Counts unexpired entries whose key starts with `prefix`.
    pub async fn count_live(&self, prefix: &str) -> usize {
        let now = self.clock.now_ms();
        self.entries
            .read()
            .await
            .iter()
            .filter(|(key, stored)| key.starts_with(prefix) && now < stored.expires_at)
            .count()
    }

    fn validate(key: &str, value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidKey(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::ValueTooLarge(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = self.clock.now_ms();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|stored| now < stored.expires_at)
            .map(|stored| stored.value.clone()))
    }

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) -> Result<()> {
        Self::validate(key, &value)?;

        let expires_at = self
            .clock
            .now_ms()
            .saturating_add(ttl_seconds.saturating_mul(1000));
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoredValue { value, expires_at });
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
