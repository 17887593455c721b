//! Agent runtime orchestration.

use crate::commands::spawn_command_writer;
use crate::config::BridgeConfig;
use crate::controller::SyncController;
use crate::publisher::{spawn_event_loop, BusEvent, MqttPublisher};
use anyhow::{Context, Result};
use eufy_bridge_core::{OwnerClass, StaticCatalog};
use eufy_bridge_ingress::EventReader;
use eufy_bridge_proto::TopicScheme;
use eufy_bridge_snapshot::{HttpFetcher, HttpFetcherConfig, SnapshotCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncRead;

/// The main agent runtime.
pub struct Agent {
    config: BridgeConfig,
    client_id: String,
}

impl Agent {
    /// Create a new agent.
    ///
    /// # Errors
    ///
    /// Returns error if initialization fails.
    pub fn new(config: BridgeConfig, client_id: String) -> Result<Self> {
        if config.discovery_prefix.is_empty() {
            anyhow::bail!("Discovery prefix must not be empty");
        }

        Ok(Self { config, client_id })
    }

    /// Run until the upstream feed closes or a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns error if any component fails to start.
    pub async fn run(self) -> Result<()> {
        tracing::info!("Starting agent runtime");

        let scheme = TopicScheme::new(&self.config.discovery_prefix);

        let (publisher, eventloop) = MqttPublisher::new(&self.config.mqtt, &self.client_id)
            .context("Failed to create MQTT publisher")?;
        let mut bus_events = spawn_event_loop(eventloop);

        let fetcher = HttpFetcher::new(&HttpFetcherConfig {
            timeout: self.config.snapshot_timeout,
            ..HttpFetcherConfig::default()
        })
        .context("Failed to create snapshot fetcher")?;
        let snapshots = Arc::new(SnapshotCache::new(fetcher));

        let (commands, writer) = spawn_command_writer(tokio::io::stdout());

        let mut controller = SyncController::new(
            publisher.clone(),
            Arc::new(StaticCatalog),
            scheme,
            snapshots,
        )
        .with_commands(commands);
        if let Some(dir) = &self.config.dump_dir {
            controller = controller.with_dump_dir(dir.clone());
        }

        let mut events = EventReader::new(self.open_events().await?).start();

        tracing::info!(
            broker = %self.config.mqtt.broker,
            prefix = %self.config.discovery_prefix,
            "Agent running, press Ctrl+C to stop"
        );

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else {
                        tracing::info!("Upstream event feed closed");
                        break;
                    };
                    controller.handle(event).await;
                }

                bus_event = bus_events.recv() => {
                    match bus_event {
                        Some(BusEvent::Connected) => controller.resubscribe().await,
                        Some(BusEvent::Message { topic, payload }) => {
                            controller.handle_message(&topic, &payload).await;
                        }
                        None => {
                            tracing::error!("MQTT loop stopped");
                            break;
                        }
                    }
                }

                // Handle shutdown
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received");
                    break;
                }
            }
        }

        tracing::info!(
            devices = controller.registry().len(OwnerClass::Device),
            stations = controller.registry().len(OwnerClass::Station),
            "Stopping agent"
        );
        controller.shutdown().await;
        if let Err(err) = writer.await {
            tracing::warn!(error = %err, "Command writer failed");
        }

        if let Err(err) = publisher.disconnect().await {
            tracing::warn!(error = %err, "Failed to disconnect from MQTT broker");
        }
        let drained = tokio::time::timeout(Duration::from_secs(5), async {
            while bus_events.recv().await.is_some() {}
        })
        .await;
        if drained.is_err() {
            tracing::warn!("Timed out waiting for queued messages to flush");
        }

        tracing::info!("Agent stopped");
        Ok(())
    }

    async fn open_events(&self) -> Result<Box<dyn AsyncRead + Unpin + Send>> {
        match &self.config.events_path {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Failed to open event feed {}", path.display()))?;
                tracing::info!(path = %path.display(), "Reading upstream events from file");
                Ok(Box::new(file))
            }
            None => {
                tracing::info!("Reading upstream events from stdin");
                Ok(Box::new(tokio::io::stdin()))
            }
        }
    }
}
