//! Cache policies: the caller-supplied operation contract.
//!
//! A [`CachePolicy`] bundles the asynchronous operations that define one
//! cache's behavior:
//!
//! - **fetch**: read the authoritative value from the origin (network, RPC).
//! - **cache**: persist a freshly fetched value to the local store.
//! - **get**: read the current value from the local store.
//! - **remove**: invalidate a local entry by key (optional).
//!
//! The policy makes no storage or transport decisions itself. Operations are
//! stored as boxed async closures so any backend fits behind the same
//! surface, and all four are assumed safe for concurrent invocation: the
//! agent may have several of them mid-flight at once.
//!
//! Policies are assembled by [`CachePolicyBuilder`] and immutable afterwards.

mod builder;

pub use builder::{CachePolicyBuilder, PolicyError};

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future type for dyn-compatible async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Failure raised by a policy operation.
pub type OpError = Box<dyn std::error::Error + Send + Sync>;

/// Opaque invalidation key passed to the remove operation.
///
/// Kept fully generic: the policy's remove implementation downcasts to
/// whatever key type its store actually uses.
pub type RemoveKey = Arc<dyn Any + Send + Sync>;

pub(crate) type FetchOp<T> = Box<dyn Fn() -> BoxFuture<'static, Result<T, OpError>> + Send + Sync>;
pub(crate) type CacheOp<T> =
    Box<dyn Fn(T) -> BoxFuture<'static, Result<(), OpError>> + Send + Sync>;
pub(crate) type GetOp<T> =
    Box<dyn Fn() -> BoxFuture<'static, Result<Option<T>, OpError>> + Send + Sync>;
pub(crate) type RemoveOp =
    Box<dyn Fn(RemoveKey) -> BoxFuture<'static, Result<(), OpError>> + Send + Sync>;

/// Immutable bundle of the four cache operations.
///
/// Built once by [`CachePolicyBuilder::build`], never mutated afterwards.
/// `fetch`, `cache`, and `get` are always present; `remove` is optional and
/// its absence turns the invalidation step of a remove command into a no-op
/// read-back.
pub struct CachePolicy<T> {
    pub(crate) fetch: FetchOp<T>,
    pub(crate) cache: CacheOp<T>,
    pub(crate) get: GetOp<T>,
    pub(crate) remove: Option<RemoveOp>,
}

impl<T> CachePolicy<T> {
    /// Whether this policy defines a remove operation.
    pub fn has_remove(&self) -> bool {
        self.remove.is_some()
    }
}

impl<T> fmt::Debug for CachePolicy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachePolicy")
            .field("remove", &self.remove.is_some())
            .finish_non_exhaustive()
    }
}
