//! Wiring a policy into a running cached resource.
//!
//! [`CachedResource::spawn`] is the one-call entry point: it runs a
//! configuration closure over a fresh [`CachePolicyBuilder`], validates the
//! policy, spawns a [`CacheAgent`] bound to a cancellation token, and hands
//! back the observable state plus the command handle.
//!
//! # Example
//!
//! ```ignore
//! use cacheflow::{CacheCommand, CachedResource};
//! use tokio_util::sync::CancellationToken;
//!
//! let shutdown = CancellationToken::new();
//! let resource = CachedResource::spawn(shutdown.clone(), |builder| {
//!     builder
//!         .fetch(|| async { api.load_profile().await })
//!         .cache(|profile| async move { db.save(profile).await })
//!         .get(|| async { db.read().await })
//! })?;
//!
//! resource.ask(CacheCommand::Fetch)?;
//! let mut states = resource.subscribe();
//! while states.changed().await.is_ok() {
//!     render(&*states.borrow());
//! }
//! ```

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::agent::{AgentHandle, AskError, CacheAgent, CacheAgentConfig, CacheCommand};
use crate::policy::{CachePolicyBuilder, PolicyError};
use crate::resource::Resource;

/// A running cache agent's public surface: observable state and command
/// handle.
#[derive(Debug)]
pub struct CachedResource<T> {
    state: watch::Receiver<Resource<T>>,
    handle: AgentHandle,
}

impl<T> CachedResource<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Builds a policy from `configure` and spawns an agent for it.
    ///
    /// The agent runs until `shutdown` is cancelled. Must be called from
    /// within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::MissingParameter`] if the configuration
    /// closure leaves fetch, cache, or get unregistered.
    pub fn spawn<F>(shutdown: CancellationToken, configure: F) -> Result<Self, PolicyError>
    where
        F: FnOnce(CachePolicyBuilder<T>) -> CachePolicyBuilder<T>,
    {
        Self::spawn_with_config(CacheAgentConfig::default(), shutdown, configure)
    }

    /// Like [`CachedResource::spawn`] with an explicit agent configuration.
    pub fn spawn_with_config<F>(
        config: CacheAgentConfig,
        shutdown: CancellationToken,
        configure: F,
    ) -> Result<Self, PolicyError>
    where
        F: FnOnce(CachePolicyBuilder<T>) -> CachePolicyBuilder<T>,
    {
        let policy = configure(CachePolicyBuilder::new()).build()?;
        let (agent, handle, state) = CacheAgent::new(config, policy);

        tokio::spawn(agent.run(shutdown));

        Ok(Self { state, handle })
    }

    /// Returns a fresh subscription to the published state.
    ///
    /// The receiver always holds the latest value; any number of consumers
    /// may subscribe.
    pub fn subscribe(&self) -> watch::Receiver<Resource<T>> {
        self.state.clone()
    }

    /// Returns a clone of the current published state.
    pub fn latest(&self) -> Resource<T> {
        self.state.borrow().clone()
    }

    /// Returns a cloneable command handle for the agent.
    pub fn handle(&self) -> AgentHandle {
        self.handle.clone()
    }

    /// Enqueues a command on the agent's mailbox. Never blocks.
    pub fn ask(&self, command: CacheCommand) -> Result<(), AskError> {
        self.handle.ask(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawn_fails_without_mandatory_operations() {
        let shutdown = CancellationToken::new();
        let result = CachedResource::<String>::spawn(shutdown, |builder| {
            builder
                .fetch(|| async { Ok(String::from("net")) })
                .get(|| async { Ok(None) })
        });

        match result {
            Err(PolicyError::MissingParameter(name)) => assert_eq!(name, "cache"),
            other => panic!("expected missing cache, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_spawn_starts_with_loading_state() {
        let shutdown = CancellationToken::new();
        let resource = CachedResource::<String>::spawn(shutdown.clone(), |builder| {
            builder
                .fetch(|| async { Ok(String::from("net")) })
                .cache(|_| async { Ok(()) })
                .get(|| async { Ok(Some(String::from("local"))) })
        })
        .unwrap();

        match resource.latest() {
            Resource::Loading(None) => {}
            other => panic!("expected Loading(None), got {other:?}"),
        }

        shutdown.cancel();
    }
}
