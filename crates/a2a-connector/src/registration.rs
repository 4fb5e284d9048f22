//! Startup registration of local agents.
//!
//! Each configured agent is announced once on the registry stream with its
//! capability map and AgentCard, and written straight into the local
//! repository so queries answer even before the stream round trip completes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{Map, Value};

use a2a_registry::{
    AgentCard, RegistryEntry, RegistryError, RegistryRepository, RegistryService,
    AGENT_CARD_KEY, CAPABILITIES_KEY,
};
use a2a_stream::Transport;

use crate::config::LocalAgentConfig;

/// Health status published for agents registered at startup.
pub const STATUS_UP: &str = "UP";

/// Registers local agents with the registry exactly once.
pub struct AgentRegistration<T: Transport> {
    agents: Vec<LocalAgentConfig>,
    version: String,
    service: RegistryService<T>,
    repository: Arc<RegistryRepository>,
    done: AtomicBool,
}

impl<T: Transport> AgentRegistration<T> {
    pub fn new(
        agents: Vec<LocalAgentConfig>,
        version: impl Into<String>,
        service: RegistryService<T>,
        repository: Arc<RegistryRepository>,
    ) -> Self {
        Self {
            agents,
            version: version.into(),
            service,
            repository,
            done: AtomicBool::new(false),
        }
    }

    /// Register every agent on the first call. Later calls do nothing and
    /// return `false`.
    pub fn run_once(&self) -> bool {
        if self
            .done
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        let registered = self.register_all();
        tracing::info!(registered, total = self.agents.len(), "Startup registration complete");
        true
    }

    /// Register every configured agent. A failure for one agent is logged
    /// and does not stop the others. Returns how many were registered.
    pub fn register_all(&self) -> usize {
        let mut registered = 0;
        for agent in &self.agents {
            match self.register(agent) {
                Ok(()) => registered += 1,
                Err(e) => {
                    tracing::warn!(agent = %agent.name, error = %e, "Failed to register agent");
                }
            }
        }
        registered
    }

    fn register(&self, agent: &LocalAgentConfig) -> Result<(), RegistryError> {
        let capabilities = capabilities_for(agent);
        let card = agent_card_for(agent, &self.version);

        let mut metadata = Map::new();
        metadata.insert(CAPABILITIES_KEY.to_string(), Value::Object(capabilities.clone()));
        metadata.insert(AGENT_CARD_KEY.to_string(), card.to_value()?);

        // Publication is best-effort; the service logs a refused send.
        let published = self.service.publish_metadata(&agent.name, metadata.clone());
        self.repository.upsert(RegistryEntry::now(agent.name.as_str(), metadata));

        let capabilities = serde_json::Value::Object(capabilities);
        tracing::info!(
            agent = %agent.name,
            published,
            capabilities = %capabilities,
            "Registered agent with capabilities and AgentCard"
        );
        Ok(())
    }
}

/// Capability map: one `true` flag per skill, plus `status` and `type`.
pub fn capabilities_for(agent: &LocalAgentConfig) -> Map<String, Value> {
    let mut capabilities = Map::new();
    for skill in &agent.skills {
        capabilities.insert(skill.clone(), Value::Bool(true));
    }
    capabilities.insert("status".to_string(), Value::from(STATUS_UP));
    capabilities.insert("type".to_string(), Value::from(agent.kind.as_str()));
    capabilities
}

/// AgentCard for a local agent. The description falls back to the agent
/// kind.
pub fn agent_card_for(agent: &LocalAgentConfig, version: &str) -> AgentCard {
    let description = agent.description.as_deref().unwrap_or(&agent.kind);
    agent.skills.iter().fold(
        AgentCard::new(agent.name.as_str())
            .with_description(description)
            .with_version(version)
            .with_streaming(agent.streaming),
        |card, skill| card.with_skill(skill.as_str(), skill_display_name(skill)),
    )
}

/// Human-readable name for well-known skills; other skills use their id.
pub fn skill_display_name(skill: &str) -> &str {
    match skill {
        "translate" => "Translator",
        "summarize" => "Summarizer",
        "respond" => "General Purpose",
        other => other,
    }
}
