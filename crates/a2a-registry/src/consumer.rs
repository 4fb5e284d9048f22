//! Applies registry stream events to the local repository.

use std::sync::Arc;

use a2a_protocol::{codec, Envelope};
use a2a_stream::Record;
use serde_json::{Map, Value};

use crate::entry::RegistryEntry;
use crate::repository::RegistryRepository;

/// What happened to one registry update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The entry for this agent was replaced.
    Applied(String),
    /// Nothing to apply (absent record or null payload).
    Ignored,
    /// The record could not be decoded or did not name an agent.
    Malformed,
}

/// Folds registry events into a `RegistryRepository`.
#[derive(Debug, Clone)]
pub struct RegistryConsumer {
    repository: Arc<RegistryRepository>,
}

impl RegistryConsumer {
    pub fn new(repository: Arc<RegistryRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<RegistryRepository> {
        &self.repository
    }

    /// Apply one decoded registry event.
    ///
    /// The payload must be an object whose `agent` is a string; a `metadata`
    /// value that is not an object is stored as an empty map.
    pub fn apply(&self, envelope: Option<&Envelope>) -> ApplyOutcome {
        let Some(envelope) = envelope else {
            return ApplyOutcome::Ignored;
        };
        if envelope.payload.is_null() {
            return ApplyOutcome::Ignored;
        }

        let Some(payload) = envelope.payload.as_object() else {
            tracing::debug!(id = %envelope.id, "Registry payload is not an object");
            return ApplyOutcome::Malformed;
        };
        let Some(name) = payload.get("agent").and_then(Value::as_str) else {
            tracing::debug!(id = %envelope.id, "Registry payload has no agent name");
            return ApplyOutcome::Malformed;
        };
        let metadata = match payload.get("metadata") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };

        self.repository.upsert(RegistryEntry::now(name, metadata));
        tracing::debug!(agent = name, "Registry updated");
        ApplyOutcome::Applied(name.to_string())
    }

    /// Decode a raw registry record and apply it. Decode failures are logged
    /// and dropped.
    pub fn handle_record(&self, record: &Record) -> ApplyOutcome {
        match codec::decode(&record.topic, record.value.as_deref()) {
            Ok(envelope) => self.apply(envelope.as_ref()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to process registry update");
                ApplyOutcome::Malformed
            }
        }
    }
}
