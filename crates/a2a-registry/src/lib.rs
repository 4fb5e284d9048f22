//! A2A Registry - agent metadata shared over a compacted stream
//!
//! Agents announce themselves by publishing `{agent, metadata}` events keyed
//! by agent name; every node folds those events into a local view:
//! - `RegistryService`: publishes metadata, capabilities and AgentCards
//! - `RegistryConsumer`: applies registry events to the local repository
//! - `RegistryRepository`: concurrent name -> entry store backing queries
//! - `AgentCard`: typed descriptor carried under the `agentCard` metadata key

pub mod agent_card;
pub mod consumer;
pub mod entry;
pub mod repository;
pub mod service;

pub use agent_card::{AgentCard, CardCapabilities, Skill};
pub use consumer::{ApplyOutcome, RegistryConsumer};
pub use entry::RegistryEntry;
pub use repository::RegistryRepository;
pub use service::RegistryService;

use a2a_protocol::{BuildError, CodecError};
use thiserror::Error;

/// Metadata key holding the capability map.
pub const CAPABILITIES_KEY: &str = "capabilities";

/// Metadata key holding the AgentCard.
pub const AGENT_CARD_KEY: &str = "agentCard";

/// Errors originating from the registry layer.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to build registry event: {0}")]
    Build(#[from] BuildError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Failed to serialize AgentCard: {0}")]
    Card(#[from] serde_json::Error),
}
