//! Cache Entry Module
//!
//! Defines the envelope written to the backing store: the encoded value plus
//! the absolute expiry computed at write time.

use serde::{Deserialize, Serialize};

use crate::cache::codec;
use crate::error::{CacheError, Result};

// == Cache Entry ==
/// A single stored value with its lifetime metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Base64-encoded payload
    pub value: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry expiring `ttl_seconds` after `now_ms`.
    ///
    /// # Arguments
    /// * `payload` - Raw bytes to store
    /// * `ttl_seconds` - Lifetime in seconds
    /// * `now_ms` - Current Unix time in milliseconds
    pub fn new(payload: &[u8], ttl_seconds: u64, now_ms: u64) -> Self {
        Self {
            value: codec::encode(payload),
            created_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_seconds.saturating_mul(1000)),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration time.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    // == Payload ==
    /// Decodes the stored bytes.
    pub fn payload(&self) -> Result<Vec<u8>> {
        codec::decode(&self.value)
    }

    // == Serialization ==
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| CacheError::Corrupt(format!("failed to serialize entry: {e}")))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| CacheError::Corrupt(format!("failed to parse entry: {e}")))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_700_000_000_000;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(b"<p>hello</p>", 60, NOW);

        assert_eq!(entry.created_at, NOW);
        assert_eq!(entry.expires_at, NOW + 60_000);
        assert_eq!(entry.payload().unwrap(), b"<p>hello</p>");
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(b"value", 1, NOW);

        assert!(!entry.is_expired_at(NOW));
        assert!(!entry.is_expired_at(NOW + 999));
        assert!(entry.is_expired_at(NOW + 1_100));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new(b"value", 0, NOW);

        // Entry should be expired when current time >= expires_at
        assert!(entry.is_expired_at(NOW), "Entry should be expired at boundary");
    }

    #[test]
    fn test_json_envelope() {
        let entry = CacheEntry::new(b"", 30, NOW);
        let raw = entry.to_json().unwrap();
        let parsed = CacheEntry::from_json(&raw).unwrap();

        assert_eq!(parsed, entry);
        assert!(parsed.payload().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_envelope() {
        let result = CacheEntry::from_json("{\"value\": 3}");
        assert!(matches!(result, Err(CacheError::Corrupt(_))));
    }
}
