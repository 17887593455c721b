//! # eufy-bridge Agent
//!
//! Bridges eufy security cameras and stations to a Home Assistant MQTT broker.
//!
//! ## Architecture
//!
//! The agent runs one dispatch loop fed by three sources:
//! 1. **Ingress**: upstream device/station events, one JSON object per line
//! 2. **Bus**: inbound camera commands and broker reconnects
//! 3. **Signals**: Ctrl+C for a graceful shutdown
//!
//! Camera pictures are fetched off the loop, one worker per camera, and
//! accepted camera commands are written to stdout for the upstream sidecar.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod commands;
mod config;
mod controller;
mod entity;
mod publisher;
mod registry;
mod runtime;

pub use config::BridgeConfig;
pub use runtime::Agent;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout carries camera commands
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting eufy-bridge agent"
    );

    // Load configuration
    let config = BridgeConfig::from_env()?;

    let client_id = config
        .mqtt
        .client_id
        .clone()
        .unwrap_or_else(|| format!("eufy-bridge-{}", Uuid::new_v4()));

    tracing::info!(%client_id, "Agent initialized");

    let agent = Agent::new(config, client_id)?;

    // Run agent
    agent.run().await?;

    Ok(())
}
