//! Command protocol for the cache agent.
//!
//! Commands are plain data: they carry only the parameters a handler needs
//! and have no behavior of their own. They are delivered to the agent's
//! mailbox in submission order.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::policy::RemoveKey;

/// Instruction for a [`CacheAgent`](crate::agent::CacheAgent).
#[derive(Clone)]
pub enum CacheCommand {
    /// Read the local store and publish the result. Never touches the
    /// origin.
    Get,
    /// Read through to the origin: publish loading with the current local
    /// value, fetch, persist in the background, publish the outcome.
    Fetch,
    /// Request a recurring fetch at the given interval.
    FetchPeriodically { interval: Duration },
    /// Re-fetch from the origin. Same observable contract as [`Fetch`]; a
    /// separate name so callers can distinguish "first load" from
    /// "background refresh" at the call site.
    ///
    /// [`Fetch`]: CacheCommand::Fetch
    Refresh,
    /// Invalidate the local entry for `key`, then publish a fresh local
    /// read.
    Remove { key: RemoveKey },
    /// Request the agent to stop consuming commands.
    StopProcessing,
}

impl CacheCommand {
    /// Builds a [`CacheCommand::Remove`] from any key type.
    pub fn remove<K: Any + Send + Sync>(key: K) -> Self {
        CacheCommand::Remove { key: Arc::new(key) }
    }
}

impl fmt::Debug for CacheCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheCommand::Get => write!(f, "Get"),
            CacheCommand::Fetch => write!(f, "Fetch"),
            CacheCommand::FetchPeriodically { interval } => f
                .debug_struct("FetchPeriodically")
                .field("interval", interval)
                .finish(),
            CacheCommand::Refresh => write!(f, "Refresh"),
            CacheCommand::Remove { .. } => write!(f, "Remove {{ .. }}"),
            CacheCommand::StopProcessing => write!(f, "StopProcessing"),
        }
    }
}
