//! Agent configuration.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Bridge configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Message bus configuration
    pub mqtt: MqttConfig,

    /// Discovery topic prefix
    pub discovery_prefix: String,

    /// Upstream event feed (stdin when unset)
    pub events_path: Option<PathBuf>,

    /// Directory receiving `device-<serial>.json` property dumps
    pub dump_dir: Option<PathBuf>,

    /// Snapshot fetch timeout
    pub snapshot_timeout: Duration,
}

/// Message bus configuration.
#[derive(Debug, Clone)]
pub struct MqttConfig {
    /// MQTT broker URL
    pub broker: String,

    /// Client identifier (generated when unset)
    pub client_id: Option<String>,

    /// Username for broker authentication
    pub username: Option<String>,

    /// Password for broker authentication
    pub password: Option<String>,

    /// Keep-alive interval
    pub keep_alive: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mqtt: MqttConfig {
                broker: "tcp://localhost:1883".to_string(),
                client_id: None,
                username: None,
                password: None,
                keep_alive: Duration::from_secs(30),
            },
            discovery_prefix: "homeassistant".to_string(),
            events_path: None,
            dump_dir: None,
            snapshot_timeout: Duration::from_secs(30),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `EUFY_BRIDGE_MQTT_BROKER`: MQTT broker URL
    /// - `EUFY_BRIDGE_MQTT_CLIENT_ID`: MQTT client identifier
    /// - `EUFY_BRIDGE_MQTT_USERNAME` / `EUFY_BRIDGE_MQTT_PASSWORD`: broker credentials
    /// - `EUFY_BRIDGE_DISCOVERY_PREFIX`: discovery topic prefix
    /// - `EUFY_BRIDGE_EVENTS_PATH`: upstream event feed file or FIFO
    /// - `EUFY_BRIDGE_DUMP_DIR`: directory for device property dumps
    /// - `EUFY_BRIDGE_SNAPSHOT_TIMEOUT_SECS`: snapshot fetch timeout
    ///
    /// # Errors
    ///
    /// Returns error if a variable is present but malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(broker) = lookup("EUFY_BRIDGE_MQTT_BROKER") {
            config.mqtt.broker = broker;
        }

        if let Some(client_id) = lookup("EUFY_BRIDGE_MQTT_CLIENT_ID") {
            config.mqtt.client_id = Some(client_id);
        }

        if let Some(username) = lookup("EUFY_BRIDGE_MQTT_USERNAME") {
            config.mqtt.username = Some(username);
        }

        if let Some(password) = lookup("EUFY_BRIDGE_MQTT_PASSWORD") {
            config.mqtt.password = Some(password);
        }

        if let Some(prefix) = lookup("EUFY_BRIDGE_DISCOVERY_PREFIX") {
            config.discovery_prefix = prefix.trim_end_matches('/').to_string();
        }

        if let Some(path) = lookup("EUFY_BRIDGE_EVENTS_PATH") {
            config.events_path = Some(PathBuf::from(path));
        }

        if let Some(dir) = lookup("EUFY_BRIDGE_DUMP_DIR") {
            config.dump_dir = Some(PathBuf::from(dir));
        }

        if let Some(secs) = lookup("EUFY_BRIDGE_SNAPSHOT_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .context("Invalid EUFY_BRIDGE_SNAPSHOT_TIMEOUT_SECS")?;
            config.snapshot_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
