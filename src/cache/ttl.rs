//! TTL Module
//!
//! Computes effective cache lifetimes. When jitter is enabled every write
//! draws its own offset, so entries sharing a nominal TTL do not all expire
//! at the same instant.

use std::sync::{Arc, RwLock};

use rand::Rng;
use serde::Serialize;

pub const SECONDS_PER_HOUR: u64 = 3600;
pub const MIN_TTL_HOURS: u32 = 1;
pub const MAX_TTL_HOURS: u32 = 24;
pub const DEFAULT_TTL_HOURS: u32 = 6;

// == Jitter Percent ==
/// Allowed jitter windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum JitterPercent {
    Ten,
    #[default]
    Twenty,
    Thirty,
}

impl JitterPercent {
    /// Coerces an operator-supplied percentage; anything outside
    /// {10, 20, 30} becomes 20.
    pub fn from_percent(value: i64) -> Self {
        match value {
            10 => JitterPercent::Ten,
            30 => JitterPercent::Thirty,
            _ => JitterPercent::Twenty,
        }
    }

    pub fn as_percent(self) -> u32 {
        match self {
            JitterPercent::Ten => 10,
            JitterPercent::Twenty => 20,
            JitterPercent::Thirty => 30,
        }
    }
}

// == TTL Policy ==
/// Lifetime policy applied to cache writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TtlPolicy {
    /// Nominal lifetime in hours, within [1, 24]
    pub base_hours: u32,
    pub jitter_enabled: bool,
    pub jitter_percent: JitterPercent,
}

impl TtlPolicy {
    /// Builds a policy from raw settings, clamping the hours into [1, 24]
    /// and coercing the jitter percentage.
    pub fn new(base_hours: i64, jitter_enabled: bool, jitter_percent: i64) -> Self {
        let base_hours = base_hours.clamp(MIN_TTL_HOURS as i64, MAX_TTL_HOURS as i64) as u32;
        Self {
            base_hours,
            jitter_enabled,
            jitter_percent: JitterPercent::from_percent(jitter_percent),
        }
    }

    pub fn base_seconds(&self) -> u64 {
        u64::from(self.base_hours) * SECONDS_PER_HOUR
    }

    /// Draws an effective TTL in seconds.
    pub fn compute_ttl(&self) -> u64 {
        compute_ttl(
            self.base_hours,
            self.jitter_enabled,
            self.jitter_percent.as_percent(),
        )
    }

    /// Inclusive range that [`TtlPolicy::compute_ttl`] can return.
    pub fn bounds(&self) -> (u64, u64) {
        let base = self.base_seconds();
        if !self.jitter_enabled {
            return (base, base);
        }
        let range = base * u64::from(self.jitter_percent.as_percent()) / 100;
        (base - range, base + range)
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            base_hours: DEFAULT_TTL_HOURS,
            jitter_enabled: true,
            jitter_percent: JitterPercent::default(),
        }
    }
}

// == Policy Handle ==
/// Shared, replaceable policy. Readers take a copy, so a replacement only
/// affects writes that happen after it.
#[derive(Debug, Clone, Default)]
pub struct PolicyHandle {
    inner: Arc<RwLock<TtlPolicy>>,
}

impl PolicyHandle {
    pub fn new(policy: TtlPolicy) -> Self {
        Self {
            inner: Arc::new(RwLock::new(policy)),
        }
    }

    pub fn snapshot(&self) -> TtlPolicy {
        *self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn replace(&self, policy: TtlPolicy) {
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = policy;
    }
}

// == Compute TTL ==
/// Returns the effective TTL in seconds.
///
/// With jitter disabled this is exactly `base_hours * 3600`. With jitter
/// enabled a uniform offset in `[-range, range]` is added, where
/// `range = floor(base * jitter_percent / 100)`. `jitter_percent` is not
/// validated here; pass a value from [`JitterPercent`].
pub fn compute_ttl(base_hours: u32, jitter_enabled: bool, jitter_percent: u32) -> u64 {
    compute_ttl_with(
        &mut rand::thread_rng(),
        base_hours,
        jitter_enabled,
        jitter_percent,
    )
}

/// [`compute_ttl`] with an explicit random source.
pub fn compute_ttl_with<R: Rng + ?Sized>(
    rng: &mut R,
    base_hours: u32,
    jitter_enabled: bool,
    jitter_percent: u32,
) -> u64 {
    let base_seconds = u64::from(base_hours) * SECONDS_PER_HOUR;
    if !jitter_enabled {
        return base_seconds;
    }

    let jitter_range = (base_seconds * u64::from(jitter_percent) / 100) as i64;
    let jitter = rng.gen_range(-jitter_range..=jitter_range);

    // Never hand a non-positive lifetime to the store.
    (base_seconds as i64 + jitter).max(1) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_jitter_disabled_is_exact() {
        assert_eq!(compute_ttl(6, false, 20), 6 * 3600);
        assert_eq!(compute_ttl(1, false, 30), 3600);
    }

    #[test]
    fn test_jitter_stays_in_window() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let ttl = compute_ttl_with(&mut rng, 1, true, 10);
            assert!((3240..=3960).contains(&ttl), "ttl {ttl} out of range");
        }
    }

    #[test]
    fn test_jitter_actually_varies() {
        let mut rng = StdRng::seed_from_u64(42);
        let draws: std::collections::HashSet<u64> = (0..50)
            .map(|_| compute_ttl_with(&mut rng, 6, true, 20))
            .collect();
        assert!(draws.len() > 1);
    }

    #[test]
    fn test_jitter_percent_coercion() {
        assert_eq!(JitterPercent::from_percent(10), JitterPercent::Ten);
        assert_eq!(JitterPercent::from_percent(30), JitterPercent::Thirty);
        assert_eq!(JitterPercent::from_percent(25), JitterPercent::Twenty);
        assert_eq!(JitterPercent::from_percent(-5), JitterPercent::Twenty);
    }

    #[test]
    fn test_policy_clamps_hours() {
        assert_eq!(TtlPolicy::new(0, true, 20).base_hours, 1);
        assert_eq!(TtlPolicy::new(99, true, 20).base_hours, 24);
        assert_eq!(TtlPolicy::new(12, true, 20).base_hours, 12);
    }

    #[test]
    fn test_policy_bounds() {
        let policy = TtlPolicy::new(2, true, 30);
        assert_eq!(policy.bounds(), (5040, 9360));

        let policy = TtlPolicy::new(2, false, 30);
        assert_eq!(policy.bounds(), (7200, 7200));
    }

    #[test]
    fn test_policy_handle_snapshot_is_a_copy() {
        let handle = PolicyHandle::new(TtlPolicy::new(3, false, 20));
        let before = handle.snapshot();

        handle.replace(TtlPolicy::new(9, false, 20));

        assert_eq!(before.base_hours, 3);
        assert_eq!(handle.snapshot().base_hours, 9);
    }
}
