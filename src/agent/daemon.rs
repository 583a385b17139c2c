//! The cache agent: a mailbox-driven actor over one cache policy.
//!
//! The [`CacheAgent`] is a long-running task that:
//! - Receives [`CacheCommand`]s via a bounded channel
//! - Dispatches each command's handler as an independent task
//! - Publishes the resulting [`Resource`] states through a `watch` channel
//!
//! # Architecture
//!
//! ```text
//! AgentHandle::ask ──► ┌─────────────┐
//!                      │   Mailbox   │  FIFO dequeue, one consumer task
//!                      └──────┬──────┘
//!                             ▼
//!                      ┌─────────────┐
//!                      │  Dispatch   │──► spawn handler per command
//!                      └──────┬──────┘
//!                             ▼
//!              ┌──────────────┴──────────────┐
//!              │ Get / Fetch / Refresh / ... │──► policy operations
//!              └──────────────┬──────────────┘
//!                             ▼
//!                      watch::Sender<Resource<T>> ──► subscribers
//! ```
//!
//! Commands are dequeued strictly in submission order, but handlers run
//! concurrently: a slow fetch never blocks a later local read. The flip side
//! is that state publishes from overlapping commands may interleave, and the
//! last write to the watch channel wins. Callers that overlap long-running
//! fetches must not assume the latest published state belongs to the latest
//! submitted command.
//!
//! The agent's lifetime is bound to a [`CancellationToken`]: cancelling it
//! closes the mailbox and aborts in-flight handlers without publishing an
//! error state.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::agent::CacheCommand;
use crate::policy::{CachePolicy, RemoveKey};
use crate::resource::Resource;

// =============================================================================
// Configuration
// =============================================================================

/// Default capacity of the command mailbox.
pub const DEFAULT_COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Configuration for a cache agent.
#[derive(Clone, Debug)]
pub struct CacheAgentConfig {
    /// Command mailbox capacity.
    pub channel_capacity: usize,
}

impl Default for CacheAgentConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_COMMAND_CHANNEL_CAPACITY,
        }
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Errors that can occur when submitting a command.
#[derive(Debug, Error)]
pub enum AskError {
    /// The agent's mailbox is closed; the instance will accept no further
    /// commands.
    #[error("cache agent has stopped")]
    AgentStopped,

    /// The bounded mailbox is at capacity.
    #[error("command mailbox is full")]
    MailboxFull,
}

/// Cloneable submission handle for a running [`CacheAgent`].
#[derive(Clone, Debug)]
pub struct AgentHandle {
    command_tx: mpsc::Sender<CacheCommand>,
}

impl AgentHandle {
    /// Enqueues a command without blocking.
    ///
    /// [`AskError::AgentStopped`] is terminal for this agent instance;
    /// [`AskError::MailboxFull`] is backpressure from the bounded mailbox.
    pub fn ask(&self, command: CacheCommand) -> Result<(), AskError> {
        self.command_tx.try_send(command).map_err(|e| match e {
            TrySendError::Full(_) => AskError::MailboxFull,
            TrySendError::Closed(_) => AskError::AgentStopped,
        })
    }
}

// =============================================================================
// Cache Agent
// =============================================================================

/// Mailbox-driven cache actor.
///
/// Owns one [`CachePolicy`], one command mailbox, and the published state
/// channel. Constructed with [`CacheAgent::new`]; does nothing until
/// [`CacheAgent::run`] is spawned.
pub struct CacheAgent<T> {
    /// The policy whose operations handlers invoke. Shared with handler
    /// tasks.
    policy: Arc<CachePolicy<T>>,

    /// Published state. Shared with handler tasks.
    state: Arc<watch::Sender<Resource<T>>>,

    /// Command mailbox receiver.
    command_rx: mpsc::Receiver<CacheCommand>,
}

impl<T> CacheAgent<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an agent with its submission handle and state subscription.
    ///
    /// The published state starts as `Loading(None)`.
    pub fn new(
        config: CacheAgentConfig,
        policy: CachePolicy<T>,
    ) -> (Self, AgentHandle, watch::Receiver<Resource<T>>) {
        let (command_tx, command_rx) = mpsc::channel(config.channel_capacity);
        let (state_tx, state_rx) = watch::channel(Resource::Loading(None));

        let agent = Self {
            policy: Arc::new(policy),
            state: Arc::new(state_tx),
            command_rx,
        };

        (agent, AgentHandle { command_tx }, state_rx)
    }

    /// Runs the agent until `shutdown` is cancelled.
    ///
    /// This is the mailbox consumption loop: it dequeues commands in FIFO
    /// order and spawns one handler task per command. Loop exit drops the
    /// receiver, closing the mailbox.
    pub async fn run(self, shutdown: CancellationToken) {
        info!("Cache agent starting");

        let Self {
            policy,
            state,
            mut command_rx,
        } = self;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Cache agent shutting down");
                    break;
                }

                command = command_rx.recv() => match command {
                    Some(command) => dispatch(command, &policy, &state, &shutdown),
                    None => {
                        debug!("Command mailbox closed");
                        break;
                    }
                }
            }
        }

        info!("Cache agent stopped");
    }
}

// =============================================================================
// Command dispatch
// =============================================================================

/// Dispatches one dequeued command.
///
/// Handlers are spawned so processing never blocks the dequeue loop; each
/// one races the shutdown token, which makes cancellation abort the handler
/// without publishing an error state.
fn dispatch<T>(
    command: CacheCommand,
    policy: &Arc<CachePolicy<T>>,
    state: &Arc<watch::Sender<Resource<T>>>,
    shutdown: &CancellationToken,
) where
    T: Clone + Send + Sync + 'static,
{
    debug!(command = ?command, "Dispatching command");

    match command {
        CacheCommand::Get => {
            spawn_handler(shutdown, handle_get(Arc::clone(policy), Arc::clone(state)));
        }
        // Fetch and Refresh share one code path: their observable contracts
        // are identical, the two names exist for callers.
        CacheCommand::Fetch | CacheCommand::Refresh => {
            spawn_handler(
                shutdown,
                handle_fetch(Arc::clone(policy), Arc::clone(state)),
            );
        }
        CacheCommand::Remove { key } => {
            spawn_handler(
                shutdown,
                handle_remove(Arc::clone(policy), Arc::clone(state), key),
            );
        }
        // TODO: FetchPeriodically and StopProcessing are accepted but have
        // no handler yet; periodic scheduling and explicit shutdown still
        // need a product decision.
        CacheCommand::FetchPeriodically { interval } => {
            debug!(
                interval_ms = interval.as_millis() as u64,
                "FetchPeriodically has no handler installed"
            );
        }
        CacheCommand::StopProcessing => {
            debug!("StopProcessing has no handler installed");
        }
    }
}

/// Spawns a handler racing the shutdown token.
fn spawn_handler<F>(shutdown: &CancellationToken, handler: F)
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let token = shutdown.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            _ = handler => {}
        }
    });
}

// =============================================================================
// Handlers
// =============================================================================

/// Get: publish `Loading(None)`, read the local store, publish the result.
async fn handle_get<T>(policy: Arc<CachePolicy<T>>, state: Arc<watch::Sender<Resource<T>>>)
where
    T: Clone + Send + Sync + 'static,
{
    state.send_replace(Resource::Loading(None));

    match (policy.get)().await {
        Ok(value) => {
            state.send_replace(Resource::Success(value));
        }
        Err(e) => {
            debug!(error = %e, "Local read failed");
            state.send_replace(Resource::Error(None, Arc::from(e)));
        }
    }
}

/// Fetch / Refresh: publish `Loading` with the current local value, read
/// the origin, persist in the background, publish the outcome.
///
/// The persist runs on a detached task whose outcome is never surfaced in
/// the published state; it may outlive this handler. A persist failure is
/// only visible to whatever instrumentation the policy's own cache
/// operation carries.
async fn handle_fetch<T>(policy: Arc<CachePolicy<T>>, state: Arc<watch::Sender<Resource<T>>>)
where
    T: Clone + Send + Sync + 'static,
{
    let cached = match (policy.get)().await {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, "Local read failed before fetch");
            state.send_replace(Resource::Error(None, Arc::from(e)));
            return;
        }
    };

    state.send_replace(Resource::Loading(cached.clone()));

    match (policy.fetch)().await {
        Ok(net) => {
            let persist_policy = Arc::clone(&policy);
            let value = net.clone();
            tokio::spawn(async move {
                if let Err(e) = (persist_policy.cache)(value).await {
                    debug!(error = %e, "Cache persist failed");
                }
            });

            state.send_replace(Resource::Success(Some(net)));
        }
        Err(e) => {
            debug!(error = %e, "Origin fetch failed");
            state.send_replace(Resource::Error(cached, Arc::from(e)));
        }
    }
}

/// Remove: publish `Loading(None)`, invalidate if the policy supports it,
/// then publish a fresh local read.
///
/// Without a remove operation the invalidation step is skipped but the
/// read-back still runs, so the command republishes whatever the local
/// store currently returns.
async fn handle_remove<T>(
    policy: Arc<CachePolicy<T>>,
    state: Arc<watch::Sender<Resource<T>>>,
    key: RemoveKey,
) where
    T: Clone + Send + Sync + 'static,
{
    state.send_replace(Resource::Loading(None));

    if let Some(remove) = policy.remove.as_ref() {
        if let Err(e) = remove(key).await {
            debug!(error = %e, "Remove failed");
            state.send_replace(Resource::Error(None, Arc::from(e)));
            return;
        }
    }

    match (policy.get)().await {
        Ok(value) => {
            state.send_replace(Resource::Success(value));
        }
        Err(e) => {
            debug!(error = %e, "Local read failed after remove");
            state.send_replace(Resource::Error(None, Arc::from(e)));
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
