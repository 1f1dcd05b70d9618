//! Value Codec
//!
//! Reversible byte-safe encoding applied to every value before it reaches the
//! backing store.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{CacheError, Result};

/// Encodes arbitrary bytes as padded standard base64.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes a value produced by [`encode`].
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| CacheError::Corrupt(format!("invalid base64 payload: {e}")))
}
