//! Records and the send side of a stream transport.

use std::collections::HashMap;
use std::sync::Arc;

/// A single record on a stream.
///
/// `value == None` is a tombstone: on a compacted stream it removes the
/// retained value for `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub topic: String,
    /// Partition key. Records sharing a key are delivered in send order.
    pub key: Option<String>,
    pub value: Option<Vec<u8>>,
    pub headers: HashMap<String, String>,
    /// Position assigned by the broker on acceptance.
    pub offset: u64,
}

impl Record {
    pub fn new(topic: impl Into<String>, value: Option<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            key: None,
            value,
            headers: HashMap::new(),
            offset: 0,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Size of the value in bytes (0 for a tombstone).
    pub fn size(&self) -> usize {
        self.value.as_ref().map_or(0, Vec::len)
    }
}

/// Send side of a stream transport.
///
/// `send` reports whether the transport accepted the record. Acceptance is
/// the only guarantee: durability and redelivery belong to the transport.
pub trait Transport: Send + Sync {
    fn send(&self, record: Record) -> bool;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, record: Record) -> bool {
        (**self).send(record)
    }
}
