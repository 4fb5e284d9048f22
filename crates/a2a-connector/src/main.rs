//! CLI binary entry point for the A2A Connector.
//!
//! Usage:
//!   a2a-connector [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>    Path to configuration TOML file
//!       --http <ADDR>      Registry HTTP bind address (overrides config)
//!   -v, --verbose          Increase logging verbosity
//!   --agent-name <NAME>    Set the connector node name

use std::path::PathBuf;

use clap::Parser;

use a2a_connector::config::ConnectorConfig;
use a2a_connector::connector::A2aConnector;

/// A2A Connector - hosts agents on the A2A envelope streams.
#[derive(Parser, Debug)]
#[command(name = "a2a-connector")]
#[command(about = "A2A connector node: task processing, agent registry and registry HTTP API")]
#[command(version)]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, value_name = "FILE", default_value = "config/a2a-connector.toml")]
    config: PathBuf,

    /// Registry HTTP bind address (e.g., 127.0.0.1:8080).
    #[arg(long, value_name = "ADDR")]
    http: Option<String>,

    /// Increase logging verbosity (can be repeated: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Set the connector node name.
    #[arg(long, value_name = "NAME")]
    agent_name: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration.
    let mut config = ConnectorConfig::load(Some(&cli.config))?;

    // Apply CLI overrides.
    if let Some(http) = cli.http {
        config.http.bind_addr = http;
    }
    if let Some(name) = cli.agent_name {
        config.agent.name = name;
    }

    // Adjust log level based on verbosity.
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    // Initialize logging.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    if config.logging.json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }

    tracing::info!(
        agent = %config.agent.name,
        system = %config.system.name,
        http = %config.http.bind_addr,
        agents = config.agents.len(),
        "Starting A2A Connector"
    );

    // Run the connector (this blocks until shutdown).
    A2aConnector::new(config).run().await?;

    tracing::info!("A2A Connector stopped");
    Ok(())
}
