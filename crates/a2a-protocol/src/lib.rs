//! A2A - Core envelope types and protocol rules
//!
//! Implements the agent-to-agent (A2A) message envelope used on every stream:
//! - `Envelope` value type with command / reply / event variants
//! - `EnvelopeBuilder` fluent constructor with fail-fast construction checks
//! - `MessageValidator` protocol-compliance checker that accumulates errors
//! - JSON wire codec with topic-aware error context

pub mod builder;
pub mod codec;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod payloads;
pub mod validation;

pub use builder::EnvelopeBuilder;
pub use constants::*;
pub use envelope::{Envelope, MessageType, UnknownMessageType};
pub use error::*;
pub use validation::{MessageValidator, ValidationResult, ValidatorConfig};
