//! Task processing: turns inbound task envelopes into outbound envelopes.
//!
//! - command -> reply to the command, `taskId` = command id, payload wrapped
//!   as a success result
//! - anything else -> event carrying the same payload
//! - any failure -> `PROCESSING_ERROR` reply
//!
//! Correlation ids are carried over in every case. Outputs are sent from
//! the processor's sender name, `processor` unless configured otherwise.
//! Processing is pure apart from logging; the caller decides where the
//! output goes.

use a2a_protocol::{
    payloads, BuildError, Envelope, EnvelopeBuilder, MessageType, PROCESSING_ERROR,
    PROCESSOR_AGENT, UNKNOWN_TASK_ID,
};
use serde_json::Value;
use thiserror::Error;

/// Errors from a command handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("Command failed: {0}")]
    Failed(String),
}

/// Produces the result of a command.
///
/// Implementations plug agent behavior into the processor. The processor
/// handles envelope construction and error replies.
pub trait CommandHandler: Send + Sync {
    fn handle(&self, command: &Envelope) -> Result<Value, HandlerError>;
}

/// Returns the command payload unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl CommandHandler for EchoHandler {
    fn handle(&self, command: &Envelope) -> Result<Value, HandlerError> {
        Ok(command.payload.clone())
    }
}

#[derive(Debug, Error)]
enum ProcessError {
    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Maps inbound task envelopes to replies and events.
#[derive(Debug, Clone)]
pub struct TaskProcessor<H = EchoHandler> {
    handler: H,
    sender: String,
}

impl TaskProcessor<EchoHandler> {
    /// Processor whose command result is the command payload.
    pub fn echo() -> Self {
        Self::new(EchoHandler)
    }
}

impl<H: CommandHandler> TaskProcessor<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            sender: PROCESSOR_AGENT.to_string(),
        }
    }

    /// Send outputs as `sender` instead of `processor`.
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Process one inbound envelope. `None` in, `None` out.
    pub fn process(&self, input: Option<&Envelope>) -> Option<Envelope> {
        let input = input?;
        match self.try_process(input) {
            Ok(output) => Some(output),
            Err(e) => {
                tracing::error!(id = %input.id, error = %e, "Error processing message");
                self.reject(input, &e.to_string())
            }
        }
    }

    fn try_process(&self, input: &Envelope) -> Result<Envelope, ProcessError> {
        let output = match input.message_type {
            MessageType::Command => {
                let result = self.handler.handle(input)?;
                EnvelopeBuilder::reply(self.sender.as_str(), input.id.as_str(), payloads::success(result))
                    .propagate_correlation_id(input.correlation_id.as_deref())
                    .build()?
            }
            MessageType::Reply | MessageType::Event => {
                tracing::debug!(id = %input.id, "Received non-command message; passing through as event");
                EnvelopeBuilder::event(self.sender.as_str(), input.payload.clone())
                    .propagate_correlation_id(input.correlation_id.as_deref())
                    .build()?
            }
        };
        Ok(output)
    }

    /// `PROCESSING_ERROR` reply to `input` carrying `message`. The task id
    /// is the input id, or `unknown` when that is blank.
    pub fn reject(&self, input: &Envelope, message: &str) -> Option<Envelope> {
        let task_id = if input.id.trim().is_empty() {
            UNKNOWN_TASK_ID
        } else {
            input.id.as_str()
        };
        let reply = EnvelopeBuilder::reply(
            self.sender.as_str(),
            task_id,
            payloads::error(PROCESSING_ERROR, message),
        )
        .propagate_correlation_id(input.correlation_id.as_deref())
        .build();

        match reply {
            Ok(reply) => Some(reply),
            Err(e) => {
                tracing::error!(id = %input.id, error = %e, "Failed to build error reply");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FailingHandler;

    impl CommandHandler for FailingHandler {
        fn handle(&self, command: &Envelope) -> Result<Value, HandlerError> {
            Err(HandlerError::UnsupportedMethod(
                command.method.clone().unwrap_or_default(),
            ))
        }
    }

    #[test]
    fn test_echo_handler_returns_payload() {
        let command = EnvelopeBuilder::command("a", "b", "m", json!({"k": 1}))
            .build()
            .unwrap();
        assert_eq!(EchoHandler.handle(&command).unwrap(), json!({"k": 1}));
    }

    #[test]
    fn test_handler_error_becomes_error_reply() {
        let processor = TaskProcessor::new(FailingHandler);
        let command = EnvelopeBuilder::command("client", "agent", "fly", json!({}))
            .correlation_id("c9")
            .build()
            .unwrap();

        let reply = processor.process(Some(&command)).unwrap();

        assert!(reply.is_reply());
        assert_eq!(reply.task_id.as_deref(), Some(command.id.as_str()));
        assert_eq!(reply.correlation_id.as_deref(), Some("c9"));
        assert_eq!(reply.payload["code"], "PROCESSING_ERROR");
        assert_eq!(reply.payload["message"], "Unsupported method: fly");
    }

    #[test]
    fn test_custom_sender_is_used_for_every_output() {
        let processor = TaskProcessor::echo().with_sender("node-7");
        let command = EnvelopeBuilder::command("client", "agent", "ping", json!({}))
            .build()
            .unwrap();
        let event = EnvelopeBuilder::event("monitor", json!(1)).build().unwrap();

        assert_eq!(processor.process(Some(&command)).unwrap().from, "node-7");
        assert_eq!(processor.process(Some(&event)).unwrap().from, "node-7");
        assert_eq!(processor.reject(&command, "nope").unwrap().from, "node-7");
        assert_eq!(TaskProcessor::echo().sender(), "processor");
    }
}
