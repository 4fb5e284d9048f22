//! A2A AgentCard
//!
//! Describes an agent to its peers: identity, interaction modes and the
//! skills it offers. Published under the `agentCard` registry metadata key.
//!
//! ```
//! use a2a_registry::AgentCard;
//!
//! let card = AgentCard::new("translator")
//!     .with_description("TranslatorAgent")
//!     .with_streaming(true)
//!     .with_skill("translate", "Translator");
//! assert_eq!(card.skills.len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input/output mode every agent supports.
pub const TEXT_PLAIN: &str = "text/plain";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    pub name: String,
    pub description: String,
    pub version: String,
    pub capabilities: CardCapabilities,
    pub default_input_modes: Vec<String>,
    pub default_output_modes: Vec<String>,
    pub skills: Vec<Skill>,
}

/// Protocol-level capabilities advertised by the card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardCapabilities {
    pub streaming: bool,
    #[serde(default)]
    pub extensions: Vec<Value>,
}

/// A skill this agent offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
}

impl AgentCard {
    /// Card with text-only modes, no skills and no streaming.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: "1.0.0".to_string(),
            capabilities: CardCapabilities::default(),
            default_input_modes: vec![TEXT_PLAIN.to_string()],
            default_output_modes: vec![TEXT_PLAIN.to_string()],
            skills: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.capabilities.streaming = streaming;
        self
    }

    pub fn with_skill(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.skills.push(Skill {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    /// Whether the card lists a skill with the given id.
    pub fn has_skill(&self, id: &str) -> bool {
        self.skills.iter().any(|s| s.id == id)
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
