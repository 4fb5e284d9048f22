//! Registry entry: the latest known metadata for one agent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{AGENT_CARD_KEY, CAPABILITIES_KEY};

/// Latest metadata published by an agent.
///
/// Entries are replaced as a whole; they are never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryEntry {
    pub agent_name: String,
    pub metadata: Map<String, Value>,
    pub updated_at: DateTime<Utc>,
}

impl RegistryEntry {
    pub fn new(
        agent_name: impl Into<String>,
        metadata: Map<String, Value>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            metadata,
            updated_at,
        }
    }

    /// Entry stamped with the current time.
    pub fn now(agent_name: impl Into<String>, metadata: Map<String, Value>) -> Self {
        Self::new(agent_name, metadata, Utc::now())
    }

    pub fn capabilities(&self) -> Option<&Map<String, Value>> {
        self.metadata.get(CAPABILITIES_KEY).and_then(Value::as_object)
    }

    /// Whether the capability map flags `capability` as `true`.
    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities()
            .and_then(|caps| caps.get(capability))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn agent_card(&self) -> Option<&Value> {
        self.metadata.get(AGENT_CARD_KEY)
    }
}
