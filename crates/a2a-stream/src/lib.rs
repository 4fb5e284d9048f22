//! A2A Stream - transport boundary for envelope streams
//!
//! Everything that moves bytes between agents sits behind the `Transport`
//! trait so the protocol and registry code never talks to a broker directly:
//! - `Record`: a keyed, optionally empty payload addressed to a named stream
//! - `StreamTopics` / `TopicPolicy`: stream names and retention rules
//! - `MemoryBroker`: in-process broker with delete and compacted topics

pub mod broker;
pub mod topics;
pub mod transport;

pub use broker::{MemoryBroker, Subscription};
pub use topics::{CleanupPolicy, StreamTopics, TopicPolicy};
pub use transport::{Record, Transport};

use thiserror::Error;

/// Errors originating from the stream layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("Broker is closed")]
    Closed,

    #[error("Unknown topic: {0}")]
    UnknownTopic(String),
}
