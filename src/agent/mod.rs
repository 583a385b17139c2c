//! The cache agent and its command protocol.
//!
//! The agent is the engine of the crate: a single consumption task dequeues
//! [`CacheCommand`]s in FIFO order from a bounded mailbox and spawns one
//! concurrent handler per command. The handlers invoke the operations of a
//! [`CachePolicy`](crate::policy::CachePolicy) and publish
//! [`Resource`](crate::resource::Resource) states through a `watch` channel.

mod command;
mod daemon;

pub use command::CacheCommand;
pub use daemon::{
    AgentHandle, AskError, CacheAgent, CacheAgentConfig, DEFAULT_COMMAND_CHANNEL_CAPACITY,
};
