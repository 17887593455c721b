use eufy_bridge_proto::{
    encode_discovery, encode_document, value_template, Component, DeviceDescriptor,
    DiscoveryPayload, TopicScheme,
};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;
use uuid::Uuid;

fn parse_mqtt_url(url: &str) -> (String, u16) {
    let url = url
        .strip_prefix("tcp://")
        .or_else(|| url.strip_prefix("mqtt://"))
        .unwrap_or(url);

    let parts: Vec<&str> = url.split(':').collect();

    let host = parts.first().copied().unwrap_or("localhost").to_string();
    let port = parts.get(1).and_then(|p| p.parse().ok()).unwrap_or(1883);

    (host, port)
}

async fn spawn_eventloop(mut eventloop: EventLoop) {
    loop {
        if eventloop.poll().await.is_err() {
            break;
        }
    }
}

fn client(host: &str, port: u16, prefix: &str) -> (AsyncClient, EventLoop) {
    let mut opts = MqttOptions::new(format!("{prefix}-{}", Uuid::new_v4()), host, port);
    opts.set_keep_alive(Duration::from_secs(5));
    AsyncClient::new(opts, 10)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn retained_discovery_and_state_reach_late_subscriber() {
    if std::env::var("EUFY_BRIDGE_INTEGRATION").is_err() {
        eprintln!("Skipping integration test; set EUFY_BRIDGE_INTEGRATION=1 to run");
        return;
    }

    let broker = std::env::var("EUFY_BRIDGE_MQTT_BROKER")
        .unwrap_or_else(|_| "tcp://localhost:1883".to_string());
    let (host, port) = parse_mqtt_url(&broker);

    let scheme = TopicScheme::new(format!("integration-{}", Uuid::new_v4().simple()));
    let unique_id = "T8113N0001_motionDetected";
    let topics = scheme.entity(Component::BinarySensor, unique_id);

    let device = DeviceDescriptor::new("T8113N0001", "T8113", "Driveway", "2.1.7");
    let payload = DiscoveryPayload::BinarySensor {
        name: "Driveway Motion Detected".to_string(),
        unique_id: unique_id.to_string(),
        state_topic: topics.state.clone(),
        value_template: value_template("motionDetected"),
    };
    let discovery = encode_discovery(&device, &payload).unwrap();
    let state = encode_document(&BTreeMap::from([(
        "motionDetected".to_string(),
        "ON".to_string(),
    )]))
    .unwrap();

    // Publish retained before anyone listens
    let (pub_client, pub_eventloop) = client(&host, port, "pub");
    tokio::spawn(spawn_eventloop(pub_eventloop));
    pub_client
        .publish(&topics.discovery, QoS::AtLeastOnce, true, discovery.clone())
        .await
        .unwrap();
    pub_client
        .publish(&topics.state, QoS::AtLeastOnce, true, state.clone())
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;

    // A late subscriber sees both retained messages
    let (sub_client, mut sub_eventloop) = client(&host, port, "sub");
    sub_client
        .subscribe(format!("{}/#", scheme.prefix), QoS::AtLeastOnce)
        .await
        .unwrap();

    let (tx, mut rx) = mpsc::channel(8);
    tokio::spawn(async move {
        loop {
            match sub_eventloop.poll().await {
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    if tx
                        .send((publish.topic.clone(), publish.payload.to_vec()))
                        .await
                        .is_err()
                    {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });

    let mut received = BTreeMap::new();
    while received.len() < 2 {
        let (topic, payload) = timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for retained messages")
            .expect("subscriber stopped");
        received.insert(topic, payload);
    }
    assert_eq!(received.get(&topics.discovery), Some(&discovery));
    assert_eq!(received.get(&topics.state), Some(&state));

    // Empty retained payloads clear the entity
    pub_client
        .publish(&topics.discovery, QoS::AtLeastOnce, true, Vec::new())
        .await
        .unwrap();
    pub_client
        .publish(&topics.state, QoS::AtLeastOnce, true, Vec::new())
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(500)).await;
}
