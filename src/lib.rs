//! Cacheflow - policy-driven cache actors with observable state.
//!
//! This library turns three or four caller-supplied async operations
//! (fetch-from-origin, persist, local read, optional remove-by-key) into a
//! mailbox-driven actor that serializes command intake, performs the cache
//! side effects concurrently, and publishes the value's lifecycle as a
//! latest-value [`Resource`] stream: loading with the stale copy, success,
//! or error with the stale copy.
//!
//! One agent caches exactly one logical value. Storage, transport, and
//! retry policy all belong to the supplied operations; the agent only
//! coordinates them.
//!
//! # Quick start
//!
//! ```ignore
//! use cacheflow::{CacheCommand, CachedResource, Resource};
//! use tokio_util::sync::CancellationToken;
//!
//! let shutdown = CancellationToken::new();
//! let resource = CachedResource::spawn(shutdown.clone(), |builder| {
//!     builder
//!         .fetch(|| async { api.load().await })
//!         .cache(|value| async move { db.save(value).await })
//!         .get(|| async { db.read().await })
//! })?;
//!
//! resource.ask(CacheCommand::Fetch)?;
//! ```

pub mod agent;
pub mod connectivity;
pub mod factory;
pub mod policy;
pub mod resource;

pub use agent::{
    AgentHandle, AskError, CacheAgent, CacheAgentConfig, CacheCommand,
    DEFAULT_COMMAND_CHANNEL_CAPACITY,
};
pub use connectivity::{ConnectivityEvents, ConnectivityState};
pub use factory::CachedResource;
pub use policy::{BoxFuture, CachePolicy, CachePolicyBuilder, OpError, PolicyError, RemoveKey};
pub use resource::{Resource, ResourceError};
