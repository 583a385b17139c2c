//! Fluent builder for [`CachePolicy`].
//!
//! The builder collects the four operations through consuming setters and
//! validates the mandatory ones at [`CachePolicyBuilder::build`] time. It is
//! single-use: `build` consumes it, and it is meant to be exercised inside
//! one configuration closure and discarded.
//!
//! # Example
//!
//! ```ignore
//! let policy = CachePolicyBuilder::new()
//!     .fetch(|| async { origin.load().await })
//!     .cache(|value| async move { store.save(value).await })
//!     .get(|| async { store.read().await })
//!     .build()?;
//! ```

use std::future::Future;

use thiserror::Error;

use super::{CacheOp, CachePolicy, FetchOp, GetOp, OpError, RemoveKey, RemoveOp};

/// Configuration failure raised when assembling a policy.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// A mandatory operation was never registered.
    #[error("missing parameter [{0}]")]
    MissingParameter(&'static str),
}

/// Staged assembler for a [`CachePolicy`].
///
/// Each setter stores exactly one operation; registering the same operation
/// twice keeps the last one. `fetch`, `cache`, and `get` are mandatory,
/// `remove` is optional.
pub struct CachePolicyBuilder<T> {
    fetch: Option<FetchOp<T>>,
    cache: Option<CacheOp<T>>,
    get: Option<GetOp<T>>,
    remove: Option<RemoveOp>,
}

impl<T> Default for CachePolicyBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CachePolicyBuilder<T> {
    pub fn new() -> Self {
        Self {
            fetch: None,
            cache: None,
            get: None,
            remove: None,
        }
    }

    /// Registers the origin read.
    pub fn fetch<F, Fut>(mut self, op: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, OpError>> + Send + 'static,
    {
        self.fetch = Some(Box::new(move || Box::pin(op())));
        self
    }

    /// Registers the local persist.
    pub fn cache<F, Fut>(mut self, op: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), OpError>> + Send + 'static,
    {
        self.cache = Some(Box::new(move |value| Box::pin(op(value))));
        self
    }

    /// Registers the local read. `Ok(None)` means nothing is cached yet.
    pub fn get<F, Fut>(mut self, op: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<T>, OpError>> + Send + 'static,
    {
        self.get = Some(Box::new(move || Box::pin(op())));
        self
    }

    /// Registers the optional invalidation by key.
    pub fn remove<F, Fut>(mut self, op: F) -> Self
    where
        F: Fn(RemoveKey) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), OpError>> + Send + 'static,
    {
        self.remove = Some(Box::new(move |key| Box::pin(op(key))));
        self
    }

    /// Validates the mandatory operations and produces the policy.
    ///
    /// Missing operations are reported one at a time, checked in the order
    /// fetch, cache, get.
    pub fn build(self) -> Result<CachePolicy<T>, PolicyError> {
        let fetch = self
            .fetch
            .ok_or(PolicyError::MissingParameter("fetch"))?;
        let cache = self
            .cache
            .ok_or(PolicyError::MissingParameter("cache"))?;
        let get = self.get.ok_or(PolicyError::MissingParameter("get"))?;

        Ok(CachePolicy {
            fetch,
            cache,
            get,
            remove: self.remove,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
