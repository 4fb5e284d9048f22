use thiserror::Error;

/// Raised by `EnvelopeBuilder::build` when a required field is missing.
///
/// Each variant names exactly one field so the caller can fix it before an
/// envelope ever exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Message type is required")]
    MissingType,

    #[error("From field is required")]
    MissingFrom,

    #[error("Payload is required")]
    MissingPayload,

    #[error("To field is required for command messages")]
    MissingTo,

    #[error("Method is required for command messages")]
    MissingMethod,

    #[error("Task ID is required for reply messages")]
    MissingTaskId,
}

impl BuildError {
    /// Wire name of the field this error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            BuildError::MissingType => "type",
            BuildError::MissingFrom => "from",
            BuildError::MissingPayload => "payload",
            BuildError::MissingTo => "to",
            BuildError::MissingMethod => "method",
            BuildError::MissingTaskId => "taskId",
        }
    }
}

/// Errors from the wire codec.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to serialize envelope with ID: {id} for topic: {topic}")]
    Serialize {
        id: String,
        topic: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to deserialize envelope from topic: {topic}. Data length: {length} bytes")]
    Deserialize {
        topic: String,
        length: usize,
        #[source]
        source: serde_json::Error,
    },
}

impl CodecError {
    /// Topic the failing record belonged to.
    pub fn topic(&self) -> &str {
        match self {
            CodecError::Serialize { topic, .. } | CodecError::Deserialize { topic, .. } => topic,
        }
    }
}
