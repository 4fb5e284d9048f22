//! A2A Connector - runtime node for the A2A envelope protocol
//!
//! The connector hosts local agents on the envelope streams. It wires
//! together:
//! - Task processing (commands -> replies, everything else -> events)
//! - Registry consumption into a local repository
//! - Startup registration of configured agents with their AgentCards
//! - A read-only HTTP surface over the registry

pub mod config;
pub mod connector;
pub mod http_server;
pub mod processor;
pub mod registration;

pub use config::{ConfigError, ConnectorConfig};
pub use connector::{A2aConnector, TaskWorker};
pub use http_server::RegistryHttpServer;
pub use processor::{CommandHandler, EchoHandler, HandlerError, TaskProcessor};
pub use registration::AgentRegistration;
