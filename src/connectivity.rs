//! Connectivity boundary types.
//!
//! The crate itself never probes the network: observing reachability is the
//! host platform's job. These types only fix the vocabulary that a platform
//! monitor speaks if a caller wants to drive refreshes from connectivity
//! transitions, e.g. submitting [`CacheCommand::Refresh`] when the state
//! flips to [`ConnectivityState::Connected`].
//!
//! [`CacheCommand::Refresh`]: crate::agent::CacheCommand::Refresh

use tokio::sync::watch;

/// Reachability as reported by a platform connectivity monitor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectivityState {
    /// No observation yet.
    #[default]
    Unknown,
    Connected,
    Disconnected,
}

impl ConnectivityState {
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectivityState::Connected)
    }
}

/// Latest-value stream of connectivity observations.
pub type ConnectivityEvents = watch::Receiver<ConnectivityState>;
