/// Default stream carrying command envelopes into the processor.
pub const DEFAULT_TASKS_TOPIC: &str = "a2a.tasks";

/// Default stream carrying reply envelopes out of the processor.
pub const DEFAULT_REPLIES_TOPIC: &str = "a2a.replies";

/// Default stream carrying event envelopes out of the processor.
pub const DEFAULT_EVENTS_TOPIC: &str = "a2a.events";

/// Default compacted stream used to rebuild the agent registry.
pub const DEFAULT_REGISTRY_TOPIC: &str = "a2a.registry";

/// Default dead-letter stream. Never produced by this crate.
pub const DEFAULT_DLQ_TOPIC: &str = "a2a.dlq";

/// A message may be stamped at most this far in the future (1 hour).
pub const MAX_FUTURE_SKEW_SECS: u64 = 3600;

/// A message may be stamped at most this far in the past (24 hours).
pub const MAX_MESSAGE_AGE_SECS: u64 = 86_400;

/// Minimum length of message and task identifiers.
pub const MIN_IDENTIFIER_LEN: usize = 3;

/// Upper bound on raw bytes echoed to debug logs when decoding fails.
pub const DECODE_PREVIEW_BYTES: usize = 100;

/// Error code carried by replies produced when processing fails.
pub const PROCESSING_ERROR: &str = "PROCESSING_ERROR";

/// Sender name used by the task processor.
pub const PROCESSOR_AGENT: &str = "processor";

/// Sender name used for registry publications.
pub const REGISTRY_AGENT: &str = "registry";

/// Task id used on error replies when the failing input had no usable id.
pub const UNKNOWN_TASK_ID: &str = "unknown";

/// Content type header value for JSON-encoded envelopes.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Header key for the record content type.
pub const CONTENT_TYPE_HEADER: &str = "contentType";
