//! Fluent, validating constructor for envelopes.
//!
//! An `Envelope` produced here has passed the construction rules:
//! - every type needs a kind, a non-blank sender and a non-null payload
//! - commands additionally need a target agent and a method
//! - replies additionally need the task id they answer
//!
//! The first violated rule is returned as a `BuildError`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::envelope::{generate_id, Envelope, MessageType};
use crate::error::BuildError;

/// Builder for `Envelope`. Consumed by `build`.
#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    id: String,
    message_type: Option<MessageType>,
    from: Option<String>,
    to: Option<String>,
    task_id: Option<String>,
    method: Option<String>,
    payload: serde_json::Value,
    timestamp: DateTime<Utc>,
    headers: HashMap<String, String>,
    correlation_id: Option<String>,
    reply_to: Option<String>,
    ttl: Option<u64>,
}

impl EnvelopeBuilder {
    /// Bare builder with a fresh id and the current timestamp.
    pub fn create() -> Self {
        Self {
            id: generate_id(),
            message_type: None,
            from: None,
            to: None,
            task_id: None,
            method: None,
            payload: serde_json::Value::Null,
            timestamp: Utc::now(),
            headers: HashMap::new(),
            correlation_id: None,
            reply_to: None,
            ttl: None,
        }
    }

    /// Builder for a command from `from` asking `to` to run `method`.
    pub fn command(
        from: impl Into<String>,
        to: impl Into<String>,
        method: impl Into<String>,
        payload: impl Into<serde_json::Value>,
    ) -> Self {
        Self::create()
            .message_type(MessageType::Command)
            .from(from)
            .to(to)
            .method(method)
            .payload(payload)
    }

    /// Builder for a reply to the request identified by `task_id`.
    pub fn reply(
        from: impl Into<String>,
        task_id: impl Into<String>,
        payload: impl Into<serde_json::Value>,
    ) -> Self {
        Self::create()
            .message_type(MessageType::Reply)
            .from(from)
            .task_id(task_id)
            .payload(payload)
    }

    /// Builder for an event notification.
    pub fn event(from: impl Into<String>, payload: impl Into<serde_json::Value>) -> Self {
        Self::create()
            .message_type(MessageType::Event)
            .from(from)
            .payload(payload)
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn message_type(mut self, message_type: MessageType) -> Self {
        self.message_type = Some(message_type);
        self
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn payload(mut self, payload: impl Into<serde_json::Value>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Merge `headers` into the headers set so far.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Carry over a correlation id that may or may not be present on an
    /// upstream message.
    pub fn propagate_correlation_id(mut self, correlation_id: Option<&str>) -> Self {
        self.correlation_id = correlation_id.map(str::to_string);
        self
    }

    pub fn reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    /// TTL in milliseconds.
    pub fn ttl(mut self, ttl_millis: u64) -> Self {
        self.ttl = Some(ttl_millis);
        self
    }

    pub fn ttl_seconds(self, seconds: u64) -> Self {
        self.ttl(seconds.saturating_mul(1000))
    }

    pub fn ttl_minutes(self, minutes: u64) -> Self {
        self.ttl(minutes.saturating_mul(60 * 1000))
    }

    /// Validate the collected fields and produce the envelope.
    pub fn build(self) -> Result<Envelope, BuildError> {
        let message_type = self.message_type.ok_or(BuildError::MissingType)?;

        let from = match self.from {
            Some(from) if !is_blank(&from) => from,
            _ => return Err(BuildError::MissingFrom),
        };

        if self.payload.is_null() {
            return Err(BuildError::MissingPayload);
        }

        match message_type {
            MessageType::Command => {
                if is_blank_opt(&self.to) {
                    return Err(BuildError::MissingTo);
                }
                if is_blank_opt(&self.method) {
                    return Err(BuildError::MissingMethod);
                }
            }
            MessageType::Reply => {
                if is_blank_opt(&self.task_id) {
                    return Err(BuildError::MissingTaskId);
                }
            }
            MessageType::Event => {}
        }

        Ok(Envelope {
            id: self.id,
            message_type,
            from,
            to: self.to,
            task_id: self.task_id,
            method: self.method,
            payload: self.payload,
            timestamp: self.timestamp,
            headers: (!self.headers.is_empty()).then_some(self.headers),
            correlation_id: self.correlation_id,
            reply_to: self.reply_to,
            ttl: self.ttl,
        })
    }
}

impl Default for EnvelopeBuilder {
    fn default() -> Self {
        Self::create()
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_blank_opt(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, is_blank)
}
