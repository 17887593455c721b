//! Discovery entities.
//!
//! An owner (camera, station or generic device) is published as one entity
//! with an attributes document; each supported property becomes a binary
//! sensor or sensor reading its value out of the owner's merged state bundle.

use crate::publisher::Publisher;
use eufy_bridge_core::{
    encode_attribute, encode_bool, encode_number, OwnerClass, OwnerSnapshot, Property,
};
use eufy_bridge_proto::{
    encode_discovery, encode_document, Component, DeviceDescriptor, DiscoveryPayload,
    EntityTopics, OwnerIdentity, OwnerKind, PropertyIdentity, TopicScheme,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;

/// Identity and topics shared by every entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityBase {
    /// Discovery component
    pub component: Component,
    /// Stable unique identifier
    pub unique_id: String,
    /// Device the entity is grouped under
    pub device: DeviceDescriptor,
    /// Derived topics
    pub topics: EntityTopics,
}

impl EntityBase {
    fn for_owner(owner: &OwnerIdentity) -> Self {
        Self {
            component: owner.component(),
            unique_id: owner.unique_id.clone(),
            device: owner.device.clone(),
            topics: owner.topics.clone(),
        }
    }

    fn for_property(owner: &OwnerIdentity, property: &PropertyIdentity) -> Self {
        Self {
            component: property.component(),
            unique_id: property.unique_id.clone(),
            device: owner.device.clone(),
            topics: property.topics.clone(),
        }
    }

    /// Publish `payload` merged with the device descriptor, retained.
    pub async fn publish_discovery<P: Publisher>(&self, publisher: &P, payload: &DiscoveryPayload) {
        let body = match encode_discovery(&self.device, payload) {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(error = %err, unique_id = %self.unique_id, "Failed to encode discovery");
                return;
            }
        };

        if let Err(err) = publisher.publish(&self.topics.discovery, body, true).await {
            tracing::warn!(error = %err, unique_id = %self.unique_id, "Failed to publish discovery");
        }
    }

    /// Publish the empty retained tombstone on the discovery topic.
    pub async fn unregister<P: Publisher>(&self, publisher: &P) {
        tracing::debug!(unique_id = %self.unique_id, "Unregistering entity");

        if let Err(err) = publisher
            .publish(&self.topics.discovery, Vec::new(), true)
            .await
        {
            tracing::warn!(error = %err, unique_id = %self.unique_id, "Failed to unregister entity");
        }
    }
}

/// An individually discoverable entity.
pub trait Entity: Sync {
    /// Identity and topics.
    fn base(&self) -> &EntityBase;

    /// Kind-specific discovery fields. Pure.
    fn discovery_payload(&self) -> DiscoveryPayload;

    /// Announce the entity. Repeating the call republishes the same payload.
    fn register<P: Publisher>(&self, publisher: &P) -> impl Future<Output = ()> + Send {
        let payload = self.discovery_payload();
        let base = self.base();
        async move { base.publish_discovery(publisher, &payload).await }
    }

    /// Withdraw the entity.
    fn unregister<P: Publisher>(&self, publisher: &P) -> impl Future<Output = ()> + Send {
        self.base().unregister(publisher)
    }
}

/// Two-state property entity.
#[derive(Debug, Clone)]
pub struct BinarySensor {
    base: EntityBase,
    payload: DiscoveryPayload,
}

impl Entity for BinarySensor {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn discovery_payload(&self) -> DiscoveryPayload {
        self.payload.clone()
    }
}

/// Numeric or enumerated property entity.
#[derive(Debug, Clone)]
pub struct Sensor {
    base: EntityBase,
    payload: DiscoveryPayload,
    property: Property,
}

impl Entity for Sensor {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn discovery_payload(&self) -> DiscoveryPayload {
        self.payload.clone()
    }
}

/// A property surfaced as its own entity.
#[derive(Debug, Clone)]
pub enum SubEntity {
    /// Boolean property
    Binary(BinarySensor),
    /// Numeric or enumerated property
    Numeric(Sensor),
}

impl SubEntity {
    /// Build the sub-entity for `property` of `owner`.
    ///
    /// Returns `None` for kinds that have no entity representation.
    #[must_use]
    pub fn for_property(
        scheme: &TopicScheme,
        owner: &OwnerEntity,
        property: &Property,
    ) -> Option<Self> {
        let identity = PropertyIdentity::new(scheme, &owner.identity, property)?;
        let base = EntityBase::for_property(&owner.identity, &identity);
        let payload = identity.payload;

        if property.is_numeric() {
            Some(Self::Numeric(Sensor {
                base,
                payload,
                property: *property,
            }))
        } else {
            Some(Self::Binary(BinarySensor { base, payload }))
        }
    }

    /// Display-encode a raw value for the state bundle.
    #[must_use]
    pub fn encode(&self, value: &Value) -> String {
        match self {
            Self::Binary(_) => encode_bool(value).to_string(),
            Self::Numeric(sensor) => encode_number(&sensor.property, value),
        }
    }
}

impl Entity for SubEntity {
    fn base(&self) -> &EntityBase {
        match self {
            Self::Binary(sensor) => sensor.base(),
            Self::Numeric(sensor) => sensor.base(),
        }
    }

    fn discovery_payload(&self) -> DiscoveryPayload {
        match self {
            Self::Binary(sensor) => sensor.discovery_payload(),
            Self::Numeric(sensor) => sensor.discovery_payload(),
        }
    }
}

/// A device or station together with everything published for it.
#[derive(Debug, Clone)]
pub struct OwnerEntity {
    /// Owner entity identity
    pub base: EntityBase,
    /// Owner kind
    pub kind: OwnerKind,
    /// Device or station
    pub class: OwnerClass,
    /// Upstream serial
    pub serial: String,
    /// Station serial for devices attached to a station
    pub station_serial: Option<String>,
    /// Sub-entities keyed by property key
    pub sub_entities: BTreeMap<String, SubEntity>,
    /// Merged state bundle
    pub state: BTreeMap<String, String>,
    /// Generic attributes document
    pub attributes: BTreeMap<String, String>,
    identity: OwnerIdentity,
}

impl OwnerEntity {
    /// Build the owner entity for an added device or station.
    #[must_use]
    pub fn from_snapshot(
        scheme: &TopicScheme,
        class: OwnerClass,
        snapshot: &OwnerSnapshot,
    ) -> Self {
        let identity = OwnerIdentity::new(scheme, class, snapshot);

        Self {
            base: EntityBase::for_owner(&identity),
            kind: identity.kind,
            class,
            serial: snapshot.serial.clone(),
            station_serial: snapshot.station_serial.clone(),
            sub_entities: BTreeMap::new(),
            state: BTreeMap::new(),
            attributes: BTreeMap::new(),
            identity,
        }
    }

    /// Whether picture updates apply to this owner.
    #[must_use]
    pub fn is_camera(&self) -> bool {
        self.kind == OwnerKind::Camera
    }

    /// Store the display form of a generic property.
    pub fn set_attribute(&mut self, property: &Property, value: &Value) {
        self.attributes
            .insert(property.key.to_string(), encode_attribute(property, value));
    }

    /// Re-encode `value` into the state bundle.
    ///
    /// Returns `false` if no sub-entity exists for `key`.
    pub fn set_state(&mut self, key: &str, value: &Value) -> bool {
        let Some(entity) = self.sub_entities.get(key) else {
            return false;
        };
        let encoded = entity.encode(value);
        self.state.insert(key.to_string(), encoded);
        true
    }

    /// Publish the attributes document, retained.
    pub async fn publish_attributes<P: Publisher>(&self, publisher: &P) {
        self.publish_document(publisher, &self.base.topics.attributes, &self.attributes)
            .await;
    }

    /// Publish the full state bundle, retained.
    pub async fn publish_state<P: Publisher>(&self, publisher: &P) {
        self.publish_document(publisher, &self.base.topics.state, &self.state)
            .await;
    }

    async fn publish_document<P: Publisher>(
        &self,
        publisher: &P,
        topic: &str,
        document: &BTreeMap<String, String>,
    ) {
        let body = match encode_document(document) {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(error = %err, serial = %self.serial, topic, "Failed to encode document");
                return;
            }
        };

        if let Err(err) = publisher.publish(topic, body, true).await {
            tracing::warn!(error = %err, serial = %self.serial, topic, "Failed to publish document");
        }
    }
}

impl Entity for OwnerEntity {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn discovery_payload(&self) -> DiscoveryPayload {
        self.identity.discovery_payload()
    }
}
