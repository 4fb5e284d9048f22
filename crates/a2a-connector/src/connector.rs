//! The A2aConnector that ties everything together.
//!
//! Wires the broker, registry and task processor into a running node:
//! - task worker: tasks stream -> validate -> process -> replies / events
//! - registry worker: registry stream -> local repository
//! - HTTP server: read-only registry queries
//! - startup registration of the configured local agents

use std::sync::Arc;

use a2a_protocol::{codec, Envelope, MessageValidator, CONTENT_TYPE_HEADER, CONTENT_TYPE_JSON};
use a2a_registry::{RegistryConsumer, RegistryRepository, RegistryService};
use a2a_stream::{MemoryBroker, Record, StreamTopics, Subscription, Transport};

use crate::config::ConnectorConfig;
use crate::http_server::RegistryHttpServer;
use crate::processor::{CommandHandler, EchoHandler, TaskProcessor};
use crate::registration::AgentRegistration;

/// Handles records from the tasks stream.
pub struct TaskWorker<T: Transport, H: CommandHandler = EchoHandler> {
    processor: TaskProcessor<H>,
    validator: Option<MessageValidator>,
    topics: StreamTopics,
    transport: T,
}

impl<T: Transport, H: CommandHandler> TaskWorker<T, H> {
    /// `validator: None` processes every decodable envelope.
    pub fn new(
        processor: TaskProcessor<H>,
        validator: Option<MessageValidator>,
        topics: StreamTopics,
        transport: T,
    ) -> Self {
        Self {
            processor,
            validator,
            topics,
            transport,
        }
    }

    /// Decode, validate and process one task record, then send the output
    /// to the replies (reply) or events (event) stream. An invalid command
    /// is answered with a `PROCESSING_ERROR` reply listing the violations;
    /// other invalid envelopes are dropped. Returns whether an output record
    /// was accepted.
    pub fn handle_record(&self, record: &Record) -> bool {
        let envelope = match codec::decode(&record.topic, record.value.as_deref()) {
            Ok(Some(envelope)) => envelope,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping undecodable task record");
                return false;
            }
        };

        let output = match self.check(&envelope) {
            Ok(()) => self.processor.process(Some(&envelope)),
            Err(errors) if envelope.is_command() => {
                tracing::warn!(id = %envelope.id, %errors, "Rejecting invalid inbound command");
                self.processor.reject(&envelope, &errors)
            }
            Err(errors) => {
                tracing::warn!(id = %envelope.id, %errors, "Dropping invalid inbound envelope");
                return false;
            }
        };
        let Some(output) = output else {
            return false;
        };

        self.send_output(&envelope, &output)
    }

    /// Run the validator, if any. `Err` carries the joined violations.
    fn check(&self, envelope: &Envelope) -> Result<(), String> {
        match &self.validator {
            Some(validator) => {
                let result = validator.validate(envelope);
                if result.is_valid() {
                    Ok(())
                } else {
                    Err(result.errors_as_string())
                }
            }
            None => Ok(()),
        }
    }

    fn send_output(&self, input: &Envelope, output: &Envelope) -> bool {
        let (topic, key) = if output.is_reply() {
            let key = output.task_id.clone().unwrap_or_else(|| output.id.clone());
            (&self.topics.replies, key)
        } else {
            (&self.topics.events, output.id.clone())
        };

        let value = match codec::encode(topic, Some(output)) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode processor output");
                return false;
            }
        };

        let accepted = self.transport.send(
            Record::new(topic.as_str(), value)
                .with_key(key)
                .with_header(CONTENT_TYPE_HEADER, CONTENT_TYPE_JSON),
        );
        if accepted {
            tracing::debug!(input = %input.id, output = %output.id, topic = %topic, "Task processed");
        } else {
            tracing::warn!(input = %input.id, topic = %topic, "Failed to send processor output");
        }
        accepted
    }
}

/// A running A2A node over an in-process broker.
pub struct A2aConnector {
    config: ConnectorConfig,
    broker: Arc<MemoryBroker>,
    repository: Arc<RegistryRepository>,
    registration: AgentRegistration<Arc<MemoryBroker>>,
}

impl A2aConnector {
    /// Create a connector with a fresh broker declaring the configured topics.
    pub fn new(config: ConnectorConfig) -> Self {
        let broker = Arc::new(MemoryBroker::with_topics(&config.topics));
        Self::with_broker(config, broker)
    }

    /// Create a connector over an existing broker.
    pub fn with_broker(config: ConnectorConfig, broker: Arc<MemoryBroker>) -> Self {
        let repository = Arc::new(RegistryRepository::new());
        let registration = AgentRegistration::new(
            config.agents.clone(),
            config.system.version.clone(),
            RegistryService::new(Arc::clone(&broker), config.topics.registry.clone()),
            Arc::clone(&repository),
        );
        Self {
            config,
            broker,
            repository,
            registration,
        }
    }

    pub fn broker(&self) -> Arc<MemoryBroker> {
        Arc::clone(&self.broker)
    }

    pub fn repository(&self) -> Arc<RegistryRepository> {
        Arc::clone(&self.repository)
    }

    /// Task worker using the echo handler and the configured validation.
    /// Outputs are sent as the configured agent name.
    pub fn task_worker(&self) -> TaskWorker<Arc<MemoryBroker>> {
        let validation = &self.config.validation;
        let validator = validation
            .validate_inbound
            .then(|| MessageValidator::new(validation.validator_config()));
        TaskWorker::new(
            TaskProcessor::echo().with_sender(self.config.agent.name.as_str()),
            validator,
            self.config.topics.clone(),
            self.broker(),
        )
    }

    pub fn registration(&self) -> &AgentRegistration<Arc<MemoryBroker>> {
        &self.registration
    }

    /// Start the workers, register local agents and run until Ctrl-C.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        self.start().await?;

        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutdown signal received");
        self.shutdown();
        Ok(())
    }

    /// Subscribe and spawn the workers, then run startup registration.
    /// Returns once everything is started.
    pub async fn start(&self) -> Result<(), anyhow::Error> {
        // Bind first so a bad address fails before anything is spawned.
        let http = if self.config.http.enabled {
            Some(RegistryHttpServer::bind(&self.config.http.bind_addr, self.repository()).await?)
        } else {
            None
        };

        let tasks = self.broker.subscribe(&self.config.topics.tasks)?;
        let registry = self.broker.subscribe(&self.config.topics.registry)?;

        tokio::spawn(run_task_worker(self.task_worker(), tasks));
        tokio::spawn(run_registry_worker(
            RegistryConsumer::new(self.repository()),
            registry,
        ));

        if let Some(server) = http {
            tokio::spawn(async move {
                if let Err(e) = server.run().await {
                    tracing::error!(error = %e, "Registry HTTP server error");
                }
            });
        }

        tracing::info!(
            agent = %self.config.agent.name,
            tasks = %self.config.topics.tasks,
            registry = %self.config.topics.registry,
            "A2A connector is running"
        );

        self.registration.run_once();
        Ok(())
    }

    /// Close the broker, which ends every worker's subscription.
    pub fn shutdown(&self) {
        self.broker.close();
    }
}

async fn run_task_worker<T: Transport, H: CommandHandler>(
    worker: TaskWorker<T, H>,
    mut subscription: Subscription,
) {
    while let Some(record) = subscription.recv().await {
        worker.handle_record(&record);
    }
    tracing::info!(topic = subscription.topic(), "Task worker stopped");
}

async fn run_registry_worker(consumer: RegistryConsumer, mut subscription: Subscription) {
    while let Some(record) = subscription.recv().await {
        let outcome = consumer.handle_record(&record);
        tracing::trace!(?outcome, "Registry record handled");
    }
    tracing::info!(topic = subscription.topic(), "Registry worker stopped");
}
