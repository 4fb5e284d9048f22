//! Publishing side of the registry.
//!
//! Every publish is a single event from `registry` carrying
//! `{"agent": name, "metadata": {...}}`, keyed by agent name on the compacted
//! registry stream so the latest publish per agent is what survives.

use a2a_protocol::{codec, EnvelopeBuilder, CONTENT_TYPE_HEADER, CONTENT_TYPE_JSON, REGISTRY_AGENT};
use a2a_stream::{Record, Transport};
use serde_json::{json, Map, Value};

use crate::agent_card::AgentCard;
use crate::{RegistryError, AGENT_CARD_KEY, CAPABILITIES_KEY};

/// Publishes agent metadata to the registry stream.
///
/// Publishing is best-effort: failures are logged and reported through the
/// returned flag, never raised.
#[derive(Debug)]
pub struct RegistryService<T: Transport> {
    transport: T,
    topic: String,
}

impl<T: Transport> RegistryService<T> {
    pub fn new(transport: T, topic: impl Into<String>) -> Self {
        Self {
            transport,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Publish `metadata` for `agent_name`. Returns whether the transport
    /// accepted the record.
    pub fn publish_metadata(&self, agent_name: &str, metadata: Map<String, Value>) -> bool {
        let record = match self.registry_record(agent_name, metadata) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(agent = agent_name, error = %e, "Failed to prepare registry metadata");
                return false;
            }
        };

        let accepted = self.transport.send(record);
        if accepted {
            tracing::debug!(agent = agent_name, topic = %self.topic, "Published registry metadata");
        } else {
            tracing::warn!(agent = agent_name, topic = %self.topic, "Failed to send registry metadata");
        }
        accepted
    }

    /// Publish a capability map under the `capabilities` metadata key.
    pub fn update_capabilities(&self, agent_name: &str, capabilities: Map<String, Value>) -> bool {
        let mut metadata = Map::new();
        metadata.insert(CAPABILITIES_KEY.to_string(), Value::Object(capabilities));
        self.publish_metadata(agent_name, metadata)
    }

    /// Publish an AgentCard under the `agentCard` metadata key.
    pub fn update_agent_card(&self, agent_name: &str, card: &AgentCard) -> bool {
        let card = match card.to_value() {
            Ok(card) => card,
            Err(e) => {
                tracing::warn!(agent = agent_name, error = %RegistryError::from(e), "Failed to publish AgentCard");
                return false;
            }
        };
        let mut metadata = Map::new();
        metadata.insert(AGENT_CARD_KEY.to_string(), card);
        self.publish_metadata(agent_name, metadata)
    }

    fn registry_record(
        &self,
        agent_name: &str,
        metadata: Map<String, Value>,
    ) -> Result<Record, RegistryError> {
        let envelope = EnvelopeBuilder::event(
            REGISTRY_AGENT,
            json!({ "agent": agent_name, "metadata": metadata }),
        )
        .build()?;
        let value = codec::encode(&self.topic, Some(&envelope))?;
        Ok(Record::new(self.topic.clone(), value)
            .with_key(agent_name)
            .with_header(CONTENT_TYPE_HEADER, CONTENT_TYPE_JSON))
    }
}
