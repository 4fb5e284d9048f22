//! Stream names and per-stream retention policies.
//!
//! Defaults follow the production topic layout:
//! - tasks / replies: delete cleanup, 1 MiB records
//! - events: delete cleanup, 512 KiB records
//! - registry: compacted (latest value per agent name)
//! - dlq: delete cleanup, never produced by this workspace

use serde::{Deserialize, Serialize};

use a2a_protocol::{
    DEFAULT_DLQ_TOPIC, DEFAULT_EVENTS_TOPIC, DEFAULT_REGISTRY_TOPIC, DEFAULT_REPLIES_TOPIC,
    DEFAULT_TASKS_TOPIC,
};

/// Largest record accepted on task and reply streams.
pub const DEFAULT_MAX_RECORD_BYTES: usize = 1024 * 1024;

/// Largest record accepted on the event stream.
pub const EVENT_MAX_RECORD_BYTES: usize = 512 * 1024;

/// How a stream retains records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupPolicy {
    /// Records are delivered to current subscribers and then dropped.
    Delete,
    /// The latest value per key is retained and replayed to new subscribers.
    Compact,
}

/// Retention and size rules for one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicPolicy {
    pub cleanup: CleanupPolicy,
    pub max_record_bytes: usize,
}

impl TopicPolicy {
    pub fn delete(max_record_bytes: usize) -> Self {
        Self {
            cleanup: CleanupPolicy::Delete,
            max_record_bytes,
        }
    }

    pub fn compact() -> Self {
        Self {
            cleanup: CleanupPolicy::Compact,
            max_record_bytes: DEFAULT_MAX_RECORD_BYTES,
        }
    }

    pub fn is_compacted(&self) -> bool {
        self.cleanup == CleanupPolicy::Compact
    }
}

impl Default for TopicPolicy {
    fn default() -> Self {
        Self::delete(DEFAULT_MAX_RECORD_BYTES)
    }
}

/// Names of the logical streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamTopics {
    #[serde(default = "default_tasks")]
    pub tasks: String,
    #[serde(default = "default_replies")]
    pub replies: String,
    #[serde(default = "default_events")]
    pub events: String,
    #[serde(default = "default_registry")]
    pub registry: String,
    #[serde(default = "default_dlq")]
    pub dlq: String,
}

impl StreamTopics {
    /// Every stream paired with its default policy.
    pub fn policies(&self) -> Vec<(String, TopicPolicy)> {
        vec![
            (self.tasks.clone(), TopicPolicy::delete(DEFAULT_MAX_RECORD_BYTES)),
            (self.replies.clone(), TopicPolicy::delete(DEFAULT_MAX_RECORD_BYTES)),
            (self.events.clone(), TopicPolicy::delete(EVENT_MAX_RECORD_BYTES)),
            (self.registry.clone(), TopicPolicy::compact()),
            (self.dlq.clone(), TopicPolicy::delete(DEFAULT_MAX_RECORD_BYTES)),
        ]
    }
}

impl Default for StreamTopics {
    fn default() -> Self {
        Self {
            tasks: default_tasks(),
            replies: default_replies(),
            events: default_events(),
            registry: default_registry(),
            dlq: default_dlq(),
        }
    }
}

fn default_tasks() -> String {
    DEFAULT_TASKS_TOPIC.to_string()
}
fn default_replies() -> String {
    DEFAULT_REPLIES_TOPIC.to_string()
}
fn default_events() -> String {
    DEFAULT_EVENTS_TOPIC.to_string()
}
fn default_registry() -> String {
    DEFAULT_REGISTRY_TOPIC.to_string()
}
fn default_dlq() -> String {
    DEFAULT_DLQ_TOPIC.to_string()
}
