//! Message bus access: publishing, subscribing, and the connection loop.

use crate::config::MqttConfig;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;

/// Outbound side of the message bus.
///
/// Delivery is best-effort: callers log failures and move on.
pub trait Publisher: Clone + Send + Sync + 'static {
    /// Publish `payload` on `topic`.
    fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        retain: bool,
    ) -> impl Future<Output = Result<(), PublishError>> + Send;

    /// Subscribe to `topic`.
    fn subscribe(&self, topic: &str) -> impl Future<Output = Result<(), PublishError>> + Send;
}

/// Something the connection loop observed on the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    /// The broker accepted a (re)connection
    Connected,
    /// An inbound message on a subscribed topic
    Message {
        /// Topic the message arrived on
        topic: String,
        /// Raw payload
        payload: Vec<u8>,
    },
}

/// `rumqttc`-backed publisher.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MqttPublisher {
    /// Create a new MQTT publisher.
    ///
    /// The returned event loop must be driven (see [`spawn_event_loop`])
    /// for any message to leave the process.
    ///
    /// # Errors
    ///
    /// Returns error if the broker URL is invalid.
    pub fn new(config: &MqttConfig, client_id: &str) -> Result<(Self, EventLoop), PublishError> {
        let (host, port) = parse_mqtt_url(&config.broker)?;

        let mut mqtt_options = MqttOptions::new(client_id, host, port);
        mqtt_options.set_keep_alive(config.keep_alive);
        if let Some(username) = &config.username {
            mqtt_options.set_credentials(username, config.password.clone().unwrap_or_default());
        }

        let (client, eventloop) = AsyncClient::new(mqtt_options, 100);

        Ok((Self { client }, eventloop))
    }

    /// Ask the broker to close the session once queued messages are sent.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be queued.
    pub async fn disconnect(&self) -> Result<(), PublishError> {
        self.client
            .disconnect()
            .await
            .map_err(|e| PublishError::Publish(e.to_string()))
    }
}

impl Publisher for MqttPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>, retain: bool) -> Result<(), PublishError> {
        tracing::trace!(topic, payload_len = payload.len(), retain, "Publishing");

        self.client
            .publish(topic, QoS::AtLeastOnce, retain, payload)
            .await
            .map_err(|e| PublishError::Publish(e.to_string()))
    }

    async fn subscribe(&self, topic: &str) -> Result<(), PublishError> {
        tracing::info!(topic, "Subscribing to command topic");

        self.client
            .subscribe(topic, QoS::AtLeastOnce)
            .await
            .map_err(|e| PublishError::Subscribe(e.to_string()))
    }
}

/// Drive the MQTT event loop on its own task.
///
/// Returns a channel of connection and inbound-message events. The loop keeps
/// polling even when the consumer is busy, so outbound publishes never stall
/// behind inbound traffic; inbound messages that do not fit are dropped.
/// The channel closes after a requested disconnect.
pub fn spawn_event_loop(mut eventloop: EventLoop) -> mpsc::Receiver<BusEvent> {
    let (tx, rx) = mpsc::channel(100);

    tokio::spawn(async move {
        loop {
            let event = match eventloop.poll().await {
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    tracing::debug!(
                        topic = %publish.topic,
                        payload_len = publish.payload.len(),
                        "Received MQTT message"
                    );
                    BusEvent::Message {
                        topic: publish.topic.clone(),
                        payload: publish.payload.to_vec(),
                    }
                }
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    tracing::info!("Connected to MQTT broker");
                    BusEvent::Connected
                }
                Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                    tracing::info!("Disconnected from MQTT broker");
                    break;
                }
                Ok(Event::Incoming(Packet::SubAck(_))) => {
                    tracing::debug!("Subscription acknowledged");
                    continue;
                }
                Ok(_) => continue,
                Err(e) => {
                    tracing::error!(error = %e, "MQTT error");
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    continue;
                }
            };

            match tx.try_send(event) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(event)) => {
                    tracing::warn!(?event, "Dispatcher busy, dropping bus event");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::info!("Bus event receiver dropped, stopping MQTT loop");
                    break;
                }
            }
        }
    });

    rx
}

/// Parse MQTT URL into host and port.
fn parse_mqtt_url(input: &str) -> Result<(String, u16), PublishError> {
    if input.contains("://") {
        let url =
            Url::parse(input).map_err(|e| PublishError::InvalidBrokerUrl(format!("{input}: {e}")))?;

        match url.scheme() {
            "tcp" | "mqtt" => {}
            scheme => {
                return Err(PublishError::InvalidBrokerUrl(format!(
                    "{input}: unsupported scheme '{scheme}'"
                )));
            }
        }

        let host = url
            .host_str()
            .ok_or_else(|| PublishError::InvalidBrokerUrl(format!("{input}: missing host")))?;
        let port = url.port().unwrap_or(1883);

        return Ok((host.to_string(), port));
    }

    let mut parts = input.split(':');
    let host = parts
        .next()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| PublishError::InvalidBrokerUrl(format!("{input}: missing host")))?;
    let port = match parts.next() {
        None => 1883,
        Some(port) => port.parse().map_err(|_| {
            PublishError::InvalidBrokerUrl(format!("{input}: invalid port '{port}'"))
        })?,
    };
    if parts.next().is_some() {
        return Err(PublishError::InvalidBrokerUrl(format!(
            "{input}: too many ':' separators"
        )));
    }

    Ok((host.to_string(), port))
}

/// Errors for message bus operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PublishError {
    /// Invalid MQTT broker URL
    #[error("invalid MQTT broker URL: {0}")]
    InvalidBrokerUrl(String),
    /// Publish failed
    #[error("publish error: {0}")]
    Publish(String),
    /// Subscription failed
    #[error("subscription error: {0}")]
    Subscribe(String),
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory publisher recording everything the bridge sends.

    use super::{PublishError, Publisher};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    /// One recorded publish.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Published {
        pub topic: String,
        pub payload: Vec<u8>,
        pub retain: bool,
    }

    impl Published {
        pub fn json(&self) -> serde_json::Value {
            serde_json::from_slice(&self.payload).unwrap()
        }
    }

    #[derive(Clone, Default)]
    pub struct RecordingPublisher {
        published: Arc<Mutex<Vec<Published>>>,
        subscriptions: Arc<Mutex<Vec<String>>>,
        failing: Arc<AtomicBool>,
    }

    impl RecordingPublisher {
        /// Make every subsequent call fail (or succeed again).
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn published(&self) -> Vec<Published> {
            self.published.lock().unwrap().clone()
        }

        pub fn on_topic(&self, topic: &str) -> Vec<Published> {
            self.published()
                .into_iter()
                .filter(|message| message.topic == topic)
                .collect()
        }

        pub fn subscriptions(&self) -> Vec<String> {
            self.subscriptions.lock().unwrap().clone()
        }

        pub fn clear(&self) {
            self.published.lock().unwrap().clear();
        }
    }

    impl Publisher for RecordingPublisher {
        async fn publish(
            &self,
            topic: &str,
            payload: Vec<u8>,
            retain: bool,
        ) -> Result<(), PublishError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(PublishError::Publish("broker unavailable".to_string()));
            }
            self.published.lock().unwrap().push(Published {
                topic: topic.to_string(),
                payload,
                retain,
            });
            Ok(())
        }

        async fn subscribe(&self, topic: &str) -> Result<(), PublishError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(PublishError::Subscribe("broker unavailable".to_string()));
            }
            self.subscriptions.lock().unwrap().push(topic.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mqtt_url_tcp() {
        let (host, port) = parse_mqtt_url("tcp://localhost:1883").unwrap();
        assert_eq!(host, "localhost");
        assert_eq!(port, 1883);
    }

    #[test]
    fn parse_mqtt_url_default_port() {
        let (host, port) = parse_mqtt_url("mqtt://broker.example.com").unwrap();
        assert_eq!(host, "broker.example.com");
        assert_eq!(port, 1883);
    }

    #[test]
    fn parse_mqtt_url_no_scheme() {
        let (host, port) = parse_mqtt_url("10.0.0.5:1884").unwrap();
        assert_eq!(host, "10.0.0.5");
        assert_eq!(port, 1884);
    }

    #[test]
    fn parse_mqtt_url_rejects_bad_input() {
        assert!(parse_mqtt_url("ws://localhost:9001").is_err());
        assert!(parse_mqtt_url(":1883").is_err());
        assert!(parse_mqtt_url("host:port").is_err());
        assert!(parse_mqtt_url("a:1:2").is_err());
    }

    #[tokio::test]
    async fn publisher_creation_with_credentials() {
        let config = MqttConfig {
            broker: "tcp://localhost:1883".to_string(),
            client_id: None,
            username: Some("bridge".to_string()),
            password: None,
            keep_alive: Duration::from_secs(30),
        };

        assert!(MqttPublisher::new(&config, "eufy-bridge-test").is_ok());
    }
}
