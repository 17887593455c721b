//! Synchronization of upstream owners onto discovery entities.
//!
//! The controller is driven by one dispatch loop: every upstream event and
//! every inbound bus message is handled to completion, in delivery order,
//! before the next one. Picture fetches are the exception; they run on one
//! worker per camera so a slow fetch never holds up other owners.

use crate::commands::{CameraCommand, LivestreamAction};
use crate::entity::{Entity, OwnerEntity, SubEntity};
use crate::publisher::Publisher;
use crate::registry::Registry;
use eufy_bridge_core::{
    BridgeEvent, OwnerClass, OwnerSnapshot, PropertyValue, SchemaResolver, PICTURE_URL,
};
use eufy_bridge_proto::{OwnerIdentity, TopicScheme};
use eufy_bridge_snapshot::{Fetcher, SnapshotCache};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

struct PictureWorker {
    locator: watch::Sender<Option<String>>,
    task: JoinHandle<()>,
}

/// Keeps the bus in step with the upstream device population.
pub struct SyncController<P, F> {
    publisher: P,
    catalog: Arc<dyn SchemaResolver>,
    scheme: TopicScheme,
    registry: Registry,
    snapshots: Arc<SnapshotCache<F>>,
    pictures: HashMap<String, PictureWorker>,
    commands: Option<mpsc::Sender<CameraCommand>>,
    dump_dir: Option<PathBuf>,
}

impl<P: Publisher, F: Fetcher + 'static> SyncController<P, F> {
    /// Create a controller with an empty registry.
    pub fn new(
        publisher: P,
        catalog: Arc<dyn SchemaResolver>,
        scheme: TopicScheme,
        snapshots: Arc<SnapshotCache<F>>,
    ) -> Self {
        Self {
            publisher,
            catalog,
            scheme,
            registry: Registry::new(),
            snapshots,
            pictures: HashMap::new(),
            commands: None,
            dump_dir: None,
        }
    }

    /// Forward accepted camera commands to `commands`.
    #[must_use]
    pub fn with_commands(mut self, commands: mpsc::Sender<CameraCommand>) -> Self {
        self.commands = Some(commands);
        self
    }

    /// Dump the raw properties of every added device under `dir`.
    #[must_use]
    pub fn with_dump_dir(mut self, dir: PathBuf) -> Self {
        self.dump_dir = Some(dir);
        self
    }

    /// Known owners.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handle one upstream event.
    pub async fn handle(&mut self, event: BridgeEvent) {
        tracing::debug!(serial = %event.serial(), class = %event.class(), "Handling upstream event");

        match event {
            BridgeEvent::DeviceAdded { device } => self.add(OwnerClass::Device, device).await,
            BridgeEvent::StationAdded { station } => self.add(OwnerClass::Station, station).await,
            BridgeEvent::DeviceRemoved { serial } => self.remove(OwnerClass::Device, &serial).await,
            BridgeEvent::StationRemoved { serial } => {
                self.remove(OwnerClass::Station, &serial).await;
            }
            BridgeEvent::DevicePropertyChanged {
                serial,
                name,
                value,
            } => {
                self.property_changed(OwnerClass::Device, &serial, &name, value)
                    .await;
            }
            BridgeEvent::StationPropertyChanged {
                serial,
                name,
                value,
            } => {
                self.property_changed(OwnerClass::Station, &serial, &name, value)
                    .await;
            }
        }
    }

    /// Handle one inbound bus message.
    pub async fn handle_message(&mut self, topic: &str, payload: &[u8]) {
        let Some(serial) = self.scheme.parse_command(topic) else {
            tracing::debug!(topic, "Ignoring message on unexpected topic");
            return;
        };

        let Some(camera) = self
            .registry
            .get(OwnerClass::Device, serial)
            .filter(|owner| owner.is_camera())
        else {
            tracing::warn!(serial, "Command for unknown camera");
            return;
        };

        let Some(station_serial) = camera
            .station_serial
            .as_deref()
            .filter(|station| self.registry.get(OwnerClass::Station, station).is_some())
        else {
            tracing::warn!(
                serial,
                station_serial = ?camera.station_serial,
                "Command for camera without a known station"
            );
            return;
        };

        let command = CameraCommand {
            device_serial: serial.to_string(),
            station_serial: station_serial.to_string(),
            action: LivestreamAction::from_payload(payload),
        };

        match &self.commands {
            Some(commands) => {
                if commands.send(command).await.is_err() {
                    tracing::warn!(serial, "Command writer stopped, dropping command");
                }
            }
            None => tracing::debug!(serial, action = ?command.action, "No command sink configured"),
        }
    }

    /// Subscribe again to every camera command topic after a reconnect.
    pub async fn resubscribe(&self) {
        for camera in self.registry.cameras() {
            self.subscribe_commands(&camera.serial).await;
        }
    }

    /// Stop every picture worker and wait for in-flight pictures.
    pub async fn shutdown(self) {
        for (serial, worker) in self.pictures {
            drop(worker.locator);
            if let Err(err) = worker.task.await {
                tracing::warn!(error = %err, %serial, "Picture worker failed");
            }
        }
    }

    async fn add(&mut self, class: OwnerClass, snapshot: OwnerSnapshot) {
        let catalog = Arc::clone(&self.catalog);
        let mut owner = OwnerEntity::from_snapshot(&self.scheme, class, &snapshot);

        for property in catalog.generic(class) {
            if let Some(value) = snapshot.properties.get(property.key) {
                owner.set_attribute(property, &value.value);
            }
        }

        let declared = catalog.declared(class, snapshot.type_tag);
        if declared.is_empty() {
            tracing::info!(
                serial = %snapshot.serial,
                type_tag = snapshot.type_tag,
                "No property schema for owner type"
            );
        }

        for property in declared {
            if !OwnerIdentity::surfaces(catalog.as_ref(), class, property) {
                continue;
            }
            let Some(value) = snapshot.properties.get(property.key) else {
                continue;
            };
            let Some(entity) = SubEntity::for_property(&self.scheme, &owner, property) else {
                tracing::debug!(
                    serial = %snapshot.serial,
                    key = property.key,
                    kind = ?property.kind,
                    "Skipping property without entity kind"
                );
                continue;
            };

            owner
                .state
                .insert(property.key.to_string(), entity.encode(&value.value));
            owner.sub_entities.insert(property.key.to_string(), entity);
        }

        for key in snapshot.properties.keys() {
            if catalog.resolve(class, snapshot.type_tag, key).is_none()
                && !catalog.is_generic(class, key)
            {
                tracing::debug!(serial = %snapshot.serial, key, "Skipping unsupported property");
            }
        }

        if let Some(previous) = self.registry.get(class, &snapshot.serial) {
            tracing::info!(serial = %snapshot.serial, %class, "Owner re-added, replacing");
            let was_camera = previous.is_camera();
            for (key, entity) in &previous.sub_entities {
                if !owner.sub_entities.contains_key(key) {
                    entity.unregister(&self.publisher).await;
                }
            }
            if was_camera {
                self.stop_picture_worker(&snapshot.serial).await;
            }
        }

        owner.register(&self.publisher).await;
        owner.publish_attributes(&self.publisher).await;
        for entity in owner.sub_entities.values() {
            entity.register(&self.publisher).await;
        }
        owner.publish_state(&self.publisher).await;

        tracing::info!(
            serial = %owner.serial,
            %class,
            kind = ?owner.kind,
            entities = owner.sub_entities.len(),
            "Owner registered"
        );

        if owner.is_camera() {
            self.subscribe_commands(&owner.serial).await;
            self.start_picture_worker(&owner);
            if let Some(locator) = snapshot
                .properties
                .get(PICTURE_URL)
                .and_then(|value| picture_locator(&value.value))
            {
                self.update_picture(&owner.serial, locator);
            }
        }

        if class == OwnerClass::Device {
            self.dump_properties(&snapshot).await;
        }

        self.registry.insert(owner);
    }

    async fn remove(&mut self, class: OwnerClass, serial: &str) {
        let Some(owner) = self.registry.remove(class, serial) else {
            tracing::warn!(serial, %class, "Removal for unknown owner");
            return;
        };

        if owner.is_camera() {
            self.stop_picture_worker(serial).await;
        }

        for entity in owner.sub_entities.values() {
            entity.unregister(&self.publisher).await;
        }
        owner.unregister(&self.publisher).await;

        tracing::info!(serial, %class, "Owner removed");
    }

    async fn property_changed(
        &mut self,
        class: OwnerClass,
        serial: &str,
        key: &str,
        value: PropertyValue,
    ) {
        let catalog = Arc::clone(&self.catalog);
        let Some(owner) = self.registry.get_mut(class, serial) else {
            tracing::warn!(serial, %class, key, "Property change for unknown owner");
            return;
        };

        if owner.is_camera() && key == PICTURE_URL {
            match picture_locator(&value.value) {
                Some(locator) => self.update_picture(serial, locator),
                None => tracing::debug!(serial, "Ignoring non-text picture locator"),
            }
            return;
        }

        if owner.set_state(key, &value.value) {
            tracing::debug!(serial, key, "Republishing state");
            owner.publish_state(&self.publisher).await;
            return;
        }

        if let Some(property) = catalog
            .generic(class)
            .iter()
            .find(|property| property.key == key)
        {
            owner.set_attribute(property, &value.value);
            owner.publish_attributes(&self.publisher).await;
            return;
        }

        tracing::debug!(serial, key, "No entity for changed property");
    }

    async fn subscribe_commands(&self, serial: &str) {
        let topic = self.scheme.command(serial);
        if let Err(err) = self.publisher.subscribe(&topic).await {
            tracing::warn!(error = %err, topic, "Failed to subscribe to command topic");
        }
    }

    fn start_picture_worker(&mut self, camera: &OwnerEntity) {
        let (locator, rx) = watch::channel(None);
        let task = tokio::spawn(picture_worker(
            self.publisher.clone(),
            Arc::clone(&self.snapshots),
            camera.serial.clone(),
            camera.base.topics.base.clone(),
            rx,
        ));
        self.pictures
            .insert(camera.serial.clone(), PictureWorker { locator, task });
    }

    /// Cancel the camera's picture worker, discarding pending locators.
    ///
    /// Returns once the worker has terminated, so nothing it fetched can be
    /// published afterwards.
    async fn stop_picture_worker(&mut self, serial: &str) {
        let Some(worker) = self.pictures.remove(serial) else {
            return;
        };

        worker.task.abort();
        match worker.task.await {
            Err(err) if err.is_panic() => {
                tracing::warn!(error = %err, serial, "Picture worker failed");
            }
            _ => tracing::debug!(serial, "Picture worker stopped"),
        }
    }

    fn update_picture(&self, serial: &str, locator: &str) {
        match self.pictures.get(serial) {
            Some(worker) => {
                worker.locator.send_replace(Some(locator.to_string()));
            }
            None => tracing::warn!(serial, "No picture worker for camera"),
        }
    }

    async fn dump_properties(&self, snapshot: &OwnerSnapshot) {
        let Some(dir) = &self.dump_dir else {
            return;
        };

        let path = dir.join(format!("device-{}.json", snapshot.serial));
        let body = match serde_json::to_vec_pretty(&snapshot.properties) {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(error = %err, serial = %snapshot.serial, "Failed to encode property dump");
                return;
            }
        };

        match tokio::fs::write(&path, body).await {
            Ok(()) => tracing::debug!(path = %path.display(), "Wrote property dump"),
            Err(err) => {
                tracing::warn!(error = %err, path = %path.display(), "Failed to write property dump");
            }
        }
    }
}

fn picture_locator(value: &Value) -> Option<&str> {
    value.as_str().filter(|locator| !locator.is_empty())
}

/// Fetch each new locator for one camera and publish the picture bytes.
///
/// Locators are processed in order; if several arrive during a fetch only
/// the latest is fetched next. Ends when the sender is dropped.
async fn picture_worker<P: Publisher, F: Fetcher>(
    publisher: P,
    snapshots: Arc<SnapshotCache<F>>,
    serial: String,
    topic: String,
    mut locator: watch::Receiver<Option<String>>,
) {
    while locator.changed().await.is_ok() {
        let current = locator.borrow_and_update().clone();
        let Some(current) = current else {
            continue;
        };

        match snapshots.get(&serial, &current).await {
            Ok(bytes) => {
                tracing::debug!(serial, bytes = bytes.len(), "Publishing camera picture");
                if let Err(err) = publisher.publish(&topic, bytes, true).await {
                    tracing::warn!(error = %err, serial, "Failed to publish camera picture");
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, serial, "Failed to fetch camera picture");
            }
        }
    }
}
