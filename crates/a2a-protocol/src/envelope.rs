use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Kind of an envelope. Closed set: unknown wire values fail decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// A request for an agent to perform an action.
    Command,
    /// A response to a command, correlated by task id.
    Reply,
    /// A notification or status update.
    Event,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Command => "command",
            MessageType::Reply => "reply",
            MessageType::Event => "event",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown message type value: {0}")]
pub struct UnknownMessageType(pub String);

impl FromStr for MessageType {
    type Err = UnknownMessageType;

    /// Case-insensitive parse of the wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "command" => Ok(MessageType::Command),
            "reply" => Ok(MessageType::Reply),
            "event" => Ok(MessageType::Event),
            _ => Err(UnknownMessageType(s.to_string())),
        }
    }
}

/// The protocol message unit exchanged between agents.
///
/// Field names on the wire are camelCase (`taskId`, `correlationId`,
/// `replyTo`) and the kind is carried as `"type"`. Optional fields encode as
/// `null`. When `id` or `timestamp` are missing from received JSON they are
/// filled in with a fresh UUID and the current instant respectively. An
/// explicit `null` timestamp is treated as missing.
///
/// Equality and hashing consider `id` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default = "generate_id", deserialize_with = "nullable_string")]
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default, deserialize_with = "nullable_string")]
    pub from: String,
    pub to: Option<String>,
    pub task_id: Option<String>,
    pub method: Option<String>,
    /// Arbitrary structured content. `Value::Null` means "no payload".
    #[serde(default)]
    pub payload: serde_json::Value,
    #[serde(default = "Utc::now", deserialize_with = "nullable_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub headers: Option<HashMap<String, String>>,
    pub correlation_id: Option<String>,
    pub reply_to: Option<String>,
    /// Time-to-live in milliseconds from `timestamp`.
    pub ttl: Option<u64>,
}

impl Envelope {
    pub fn is_command(&self) -> bool {
        self.message_type == MessageType::Command
    }

    pub fn is_reply(&self) -> bool {
        self.message_type == MessageType::Reply
    }

    pub fn is_event(&self) -> bool {
        self.message_type == MessageType::Event
    }

    /// True when a non-blank task id is set.
    pub fn has_task_id(&self) -> bool {
        self.task_id.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Instant after which the envelope is expired.
    ///
    /// `None` when no TTL is set, or when `timestamp + ttl` is not
    /// representable (treated as never expiring).
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let ttl = i64::try_from(self.ttl?).ok()?;
        let ttl = Duration::try_milliseconds(ttl)?;
        self.timestamp.checked_add_signed(ttl)
    }

    /// Whether the envelope is expired as of now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whether the envelope is expired as of `now`: strictly after
    /// `timestamp + ttl`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(deadline) => now > deadline,
            None => false,
        }
    }

    /// Look up a header value.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.as_ref()?.get(key).map(String::as_str)
    }
}

impl PartialEq for Envelope {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Envelope {}

impl Hash for Envelope {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Envelope{{id='{}', type={}, from='{}', to={:?}, taskId={:?}, method={:?}, timestamp={}, correlationId={:?}}}",
            self.id,
            self.message_type,
            self.from,
            self.to,
            self.task_id,
            self.method,
            self.timestamp.to_rfc3339(),
            self.correlation_id,
        )
    }
}

pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Accept an explicit JSON `null` for a string field as the empty string, so
/// the validator can report it instead of decoding failing outright.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept an explicit JSON `null` timestamp as "now", the same as an absent
/// one.
fn nullable_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<DateTime<Utc>>::deserialize(deserializer)?.unwrap_or_else(Utc::now))
}
