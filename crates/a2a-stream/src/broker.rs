//! In-process broker implementing `Transport`.
//!
//! Architecture:
//! - `MemoryBroker` owns per-topic state behind a single mutex: the topic
//!   policy, the subscriber senders and (for compacted topics) the retained
//!   latest record per key.
//! - `Subscription` wraps an unbounded receiver. A new subscriber to a
//!   compacted topic first receives the retained records in offset order,
//!   then live records.
//! - `send` never blocks: fan-out uses unbounded channels and closed
//!   subscribers are pruned on the next send.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use crate::topics::{StreamTopics, TopicPolicy};
use crate::transport::{Record, Transport};
use crate::StreamError;

#[derive(Debug, Default)]
struct TopicState {
    policy: TopicPolicy,
    subscribers: Vec<mpsc::UnboundedSender<Record>>,
    /// Latest record per key. Only populated for compacted topics.
    retained: HashMap<String, Record>,
}

#[derive(Debug, Default)]
struct BrokerState {
    closed: bool,
    next_offset: u64,
    topics: HashMap<String, TopicState>,
}

/// In-process stream broker.
#[derive(Debug, Default)]
pub struct MemoryBroker {
    state: Mutex<BrokerState>,
}

impl MemoryBroker {
    /// Create a broker with no declared topics. Undeclared topics are
    /// created on first use with the default delete policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a broker with every stream in `topics` declared with its
    /// default policy.
    pub fn with_topics(topics: &StreamTopics) -> Self {
        let broker = Self::new();
        for (name, policy) in topics.policies() {
            broker.declare_topic(&name, policy);
        }
        broker
    }

    /// Declare (or re-declare) a topic with the given policy.
    pub fn declare_topic(&self, topic: &str, policy: TopicPolicy) {
        let mut state = self.lock();
        let topic_state = state.topics.entry(topic.to_string()).or_default();
        topic_state.policy = policy;
        if !policy.is_compacted() {
            topic_state.retained.clear();
        }
        tracing::debug!(topic, ?policy, "Declared topic");
    }

    /// Policy currently applied to `topic`.
    pub fn policy(&self, topic: &str) -> Result<TopicPolicy, StreamError> {
        self.lock()
            .topics
            .get(topic)
            .map(|t| t.policy)
            .ok_or_else(|| StreamError::UnknownTopic(topic.to_string()))
    }

    /// Subscribe to `topic`, replaying retained records of compacted topics.
    pub fn subscribe(&self, topic: &str) -> Result<Subscription, StreamError> {
        let mut state = self.lock();
        if state.closed {
            return Err(StreamError::Closed);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let topic_state = state.topics.entry(topic.to_string()).or_default();

        let mut retained: Vec<&Record> = topic_state.retained.values().collect();
        retained.sort_by_key(|r| r.offset);
        for record in retained {
            // The receiver is alive: it is still in scope here.
            let _ = tx.send(record.clone());
        }

        topic_state.subscribers.push(tx);
        tracing::info!(topic, subscribers = topic_state.subscribers.len(), "Subscribed to topic");
        Ok(Subscription {
            topic: topic.to_string(),
            receiver: rx,
        })
    }

    /// Number of retained records on a compacted topic.
    pub fn retained_len(&self, topic: &str) -> usize {
        self.lock().topics.get(topic).map_or(0, |t| t.retained.len())
    }

    /// Stop accepting records and end every subscription.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        for topic_state in state.topics.values_mut() {
            topic_state.subscribers.clear();
        }
        tracing::info!("Broker closed");
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, BrokerState> {
        // Every mutation leaves the state consistent, so a poisoned lock is
        // still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for MemoryBroker {
    fn send(&self, mut record: Record) -> bool {
        let mut state = self.lock();
        if state.closed {
            tracing::warn!(topic = %record.topic, "Send rejected: broker closed");
            return false;
        }

        let offset = state.next_offset;
        let topic_state = state.topics.entry(record.topic.clone()).or_default();
        let policy = topic_state.policy;

        if record.size() > policy.max_record_bytes {
            tracing::warn!(
                topic = %record.topic,
                size = record.size(),
                limit = policy.max_record_bytes,
                "Send rejected: record too large"
            );
            return false;
        }

        if policy.is_compacted() {
            let Some(key) = record.key.clone() else {
                tracing::warn!(topic = %record.topic, "Send rejected: compacted topic requires a key");
                return false;
            };
            record.offset = offset;
            if record.value.is_some() {
                topic_state.retained.insert(key, record.clone());
            } else {
                topic_state.retained.remove(&key);
            }
        } else {
            record.offset = offset;
        }

        topic_state
            .subscribers
            .retain(|tx| tx.send(record.clone()).is_ok());
        tracing::trace!(
            topic = %record.topic,
            offset,
            subscribers = topic_state.subscribers.len(),
            "Record accepted"
        );

        state.next_offset += 1;
        true
    }
}

/// Receive side of a topic subscription.
#[derive(Debug)]
pub struct Subscription {
    topic: String,
    receiver: mpsc::UnboundedReceiver<Record>,
}

impl Subscription {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Wait for the next record. `None` once the broker is closed.
    pub async fn recv(&mut self) -> Option<Record> {
        self.receiver.recv().await
    }

    /// Take the next record if one is already queued.
    pub fn try_recv(&mut self) -> Option<Record> {
        self.receiver.try_recv().ok()
    }
}
