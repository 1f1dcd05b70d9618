//! Cache Module
//!
//! Expiring key-value cache with jittered TTLs, hashed namespace keys and a
//! byte-safe value encoding over an external backing store.

mod clock;
mod codec;
mod entry;
mod expiring;
mod keys;
mod stats;
mod store;
mod ttl;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{decode, encode};
pub use entry::CacheEntry;
pub use expiring::ExpiringCache;
pub use keys::{build_key, KeyBuilder, Namespace};
pub use stats::CacheStats;
pub use store::{KvStore, MemoryStore};
pub use ttl::{
    compute_ttl, compute_ttl_with, JitterPercent, PolicyHandle, TtlPolicy, DEFAULT_TTL_HOURS,
};

// == Public Constants ==
/// Maximum allowed key length in bytes, after the namespace prefix
pub const MAX_KEY_LENGTH: usize = 172;

/// Maximum allowed stored value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
