//! Output Cache Module
//!
//! Wraps a render call with the `output` cache layer. Only complete renders
//! are stored; errors and partially failed lists are returned to the caller
//! and rendered again on the next request.

use std::future::Future;

use tracing::{debug, warn};

use crate::cache::{ExpiringCache, KeyBuilder, Namespace, PolicyHandle, TtlPolicy};
use crate::error::{DisplayError, Result};

/// Outcome of a render call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Every part rendered; safe to cache.
    Complete(String),
    /// Some parts were replaced by error fragments.
    Partial(String),
}

// == Output Cache ==
#[derive(Clone)]
pub struct OutputCache {
    cache: ExpiringCache,
    policy: PolicyHandle,
}

impl OutputCache {
    pub fn new(cache: ExpiringCache, policy: PolicyHandle) -> Self {
        Self { cache, policy }
    }

    pub fn policy(&self) -> TtlPolicy {
        self.policy.snapshot()
    }

    /// Replaces the lifetime policy. Entries already written keep the
    /// lifetime they were written with.
    pub fn set_policy(&self, policy: TtlPolicy) {
        self.policy.replace(policy);
    }

    // == Get Or Render ==
    /// Returns the cached fragment for `signature`, or runs `render` and
    /// caches its complete result.
    ///
    /// # Arguments
    /// * `signature` - Identity fields of the request, in the `output` namespace
    /// * `render` - Produces the fragment on a miss; not called on a hit
    pub async fn get_or_render<F, Fut>(
        &self,
        signature: &KeyBuilder,
        render: F,
    ) -> std::result::Result<String, DisplayError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<Rendered, DisplayError>>,
    {
        let key = signature.build();

        if let Some(html) = self.cache.get_string(&key).await {
            debug!(key = %key, "output cache hit");
            return Ok(html);
        }

        match render().await? {
            Rendered::Complete(html) => {
                let ttl = self.policy.snapshot().compute_ttl();
                if let Err(err) = self.cache.set(&key, html.as_bytes(), ttl).await {
                    warn!(key = %key, error = %err, "failed to cache rendered output");
                }
                Ok(html)
            }
            Rendered::Partial(html) => {
                debug!(key = %key, "partial render not cached");
                Ok(html)
            }
        }
    }

    // == Clear ==
    /// Removes every rendered fragment and returns the count.
    pub async fn clear(&self) -> Result<usize> {
        self.cache
            .delete_by_namespace(Namespace::Output.as_str())
            .await
    }
}
