//! Mapping of devices, stations and their properties onto discovery entities.
//!
//! Owners publish as `<serial>_camera`, `<serial>_station` or
//! `<serial>_device`; each surfaced property publishes as `<serial>_<key>`
//! reading its value out of the owner's merged state bundle.

use crate::discovery::{value_template, DeviceDescriptor, DiscoveryPayload};
use crate::topics::{Component, EntityTopics, TopicScheme};
use eufy_bridge_core::{
    humanize_key, DeviceType, OwnerClass, OwnerSnapshot, Property, PropertyKind, SchemaResolver,
    PICTURE_URL,
};

/// Which kind of owner entity is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    /// Camera-capable device; pictures go to its base topic
    Camera,
    /// Hub or base station
    Station,
    /// Any other device, published as a summary sensor
    Device,
}

impl OwnerKind {
    /// Decide the owner kind from its class and upstream type tag.
    #[must_use]
    pub fn classify(class: OwnerClass, type_tag: u16) -> Self {
        match class {
            OwnerClass::Station => Self::Station,
            OwnerClass::Device
                if DeviceType::from_code(type_tag).is_some_and(DeviceType::is_camera) =>
            {
                Self::Camera
            }
            OwnerClass::Device => Self::Device,
        }
    }

    /// Discovery component of the owner entity.
    #[must_use]
    pub const fn component(self) -> Component {
        match self {
            Self::Camera => Component::Camera,
            Self::Station | Self::Device => Component::Sensor,
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Station => "station",
            Self::Device => "device",
        }
    }
}

/// Discovery identity of a device or station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerIdentity {
    /// Owner kind
    pub kind: OwnerKind,
    /// Upstream serial
    pub serial: String,
    /// Stable unique identifier
    pub unique_id: String,
    /// Device the owner and its properties are grouped under
    pub device: DeviceDescriptor,
    /// Owner topics; the state topic carries the merged bundle
    pub topics: EntityTopics,
}

impl OwnerIdentity {
    /// Identity of an added device or station.
    #[must_use]
    pub fn new(scheme: &TopicScheme, class: OwnerClass, snapshot: &OwnerSnapshot) -> Self {
        let kind = OwnerKind::classify(class, snapshot.type_tag);
        let unique_id = format!("{}_{}", snapshot.serial, kind.suffix());

        let device = match kind {
            OwnerKind::Station => DeviceDescriptor::new(
                unique_id.clone(),
                snapshot.model.clone(),
                format!("{} Station", snapshot.name),
                snapshot.software_version.clone(),
            ),
            OwnerKind::Camera | OwnerKind::Device => DeviceDescriptor::new(
                snapshot.serial.clone(),
                snapshot.model.clone(),
                snapshot.name.clone(),
                snapshot.software_version.clone(),
            ),
        };

        Self {
            kind,
            serial: snapshot.serial.clone(),
            topics: scheme.entity(kind.component(), &unique_id),
            unique_id,
            device,
        }
    }

    /// Discovery component of the owner entity.
    #[must_use]
    pub const fn component(&self) -> Component {
        self.kind.component()
    }

    /// Discovery fields of the owner entity.
    #[must_use]
    pub fn discovery_payload(&self) -> DiscoveryPayload {
        match self.kind {
            OwnerKind::Camera => DiscoveryPayload::Camera {
                name: self.device.name.clone(),
                unique_id: self.unique_id.clone(),
                topic: self.topics.base.clone(),
                json_attributes_topic: self.topics.attributes.clone(),
            },
            OwnerKind::Station | OwnerKind::Device => DiscoveryPayload::Owner {
                name: self.device.name.clone(),
                unique_id: self.unique_id.clone(),
                state_topic: self.topics.base.clone(),
                json_attributes_topic: self.topics.attributes.clone(),
            },
        }
    }

    /// Whether `property` is a candidate for its own entity.
    ///
    /// Generic properties go to the attributes document and the picture
    /// locator goes through the snapshot path instead.
    #[must_use]
    pub fn surfaces(resolver: &dyn SchemaResolver, class: OwnerClass, property: &Property) -> bool {
        property.key != PICTURE_URL && !resolver.is_generic(class, property.key)
    }
}

/// Discovery identity of a property surfaced as its own entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyIdentity {
    /// Stable unique identifier
    pub unique_id: String,
    /// Entity topics
    pub topics: EntityTopics,
    /// Discovery fields
    pub payload: DiscoveryPayload,
}

impl PropertyIdentity {
    /// Identity of `property` under `owner`.
    ///
    /// Returns `None` for kinds that have no entity representation.
    #[must_use]
    pub fn new(scheme: &TopicScheme, owner: &OwnerIdentity, property: &Property) -> Option<Self> {
        let unique_id = format!("{}_{}", owner.serial, property.key);
        let name = format!("{} {}", owner.device.name, humanize_key(property.key));
        let state_topic = owner.topics.state.clone();

        let payload = match property.kind {
            PropertyKind::Boolean => DiscoveryPayload::BinarySensor {
                name,
                unique_id: unique_id.clone(),
                state_topic,
                value_template: value_template(property.key),
            },
            PropertyKind::Numeric | PropertyKind::Enumerated => DiscoveryPayload::Sensor {
                name,
                unique_id: unique_id.clone(),
                state_topic,
                value_template: value_template(property.key),
                unit_of_measurement: property.unit.map(str::to_string),
            },
            PropertyKind::String => return None,
        };

        Some(Self {
            topics: scheme.entity(payload.component(), &unique_id),
            unique_id,
            payload,
        })
    }

    /// Discovery component of the property entity.
    #[must_use]
    pub const fn component(&self) -> Component {
        self.payload.component()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn snapshot(type_tag: u16) -> OwnerSnapshot {
        OwnerSnapshot {
            serial: "T8010N1234".to_string(),
            model: "T8010".to_string(),
            name: "Front".to_string(),
            software_version: "2.1.7".to_string(),
            type_tag,
            station_serial: None,
            properties: BTreeMap::new(),
        }
    }

    #[test]
    fn owner_kinds_and_identifiers() {
        let scheme = TopicScheme::default();

        let camera = OwnerIdentity::new(&scheme, OwnerClass::Device, &snapshot(1));
        assert_eq!(camera.kind, OwnerKind::Camera);
        assert_eq!(camera.unique_id, "T8010N1234_camera");
        assert_eq!(camera.topics.base, "homeassistant/camera/T8010N1234_camera");
        assert_eq!(camera.device.identifiers, vec!["T8010N1234"]);

        let station = OwnerIdentity::new(&scheme, OwnerClass::Station, &snapshot(0));
        assert_eq!(station.kind, OwnerKind::Station);
        assert_eq!(station.unique_id, "T8010N1234_station");
        assert_eq!(station.device.name, "Front Station");
        assert_eq!(station.device.identifiers, vec!["T8010N1234_station"]);

        let sensor = OwnerIdentity::new(&scheme, OwnerClass::Device, &snapshot(2));
        assert_eq!(sensor.kind, OwnerKind::Device);
        assert_eq!(sensor.unique_id, "T8010N1234_device");
        assert_eq!(sensor.component(), Component::Sensor);

        let unknown = OwnerIdentity::new(&scheme, OwnerClass::Device, &snapshot(999));
        assert_eq!(unknown.kind, OwnerKind::Device);
    }

    #[test]
    fn owner_payload_topics() {
        let scheme = TopicScheme::default();

        let camera = OwnerIdentity::new(&scheme, OwnerClass::Device, &snapshot(1));
        assert_eq!(
            camera.discovery_payload(),
            DiscoveryPayload::Camera {
                name: "Front".to_string(),
                unique_id: "T8010N1234_camera".to_string(),
                topic: "homeassistant/camera/T8010N1234_camera".to_string(),
                json_attributes_topic: "homeassistant/camera/T8010N1234_camera/attributes"
                    .to_string(),
            }
        );

        let station = OwnerIdentity::new(&scheme, OwnerClass::Station, &snapshot(0));
        let DiscoveryPayload::Owner { state_topic, .. } = station.discovery_payload() else {
            panic!("station publishes as a summary sensor");
        };
        assert_eq!(state_topic, "homeassistant/sensor/T8010N1234_station");
    }

    #[test]
    fn properties_read_from_owner_state() {
        let scheme = TopicScheme::default();
        let owner = OwnerIdentity::new(&scheme, OwnerClass::Device, &snapshot(1));

        let motion = PropertyIdentity::new(&scheme, &owner, &Property::boolean("motionDetected"))
            .unwrap();
        assert_eq!(motion.component(), Component::BinarySensor);
        assert_eq!(
            motion.topics.discovery,
            "homeassistant/binary_sensor/T8010N1234_motionDetected/config"
        );
        assert_eq!(
            motion.payload,
            DiscoveryPayload::BinarySensor {
                name: "Front Motion Detected".to_string(),
                unique_id: "T8010N1234_motionDetected".to_string(),
                state_topic: "homeassistant/camera/T8010N1234_camera/state".to_string(),
                value_template: "{{ value_json.motionDetected }}".to_string(),
            }
        );

        let battery =
            PropertyIdentity::new(&scheme, &owner, &Property::numeric("battery", Some("%")))
                .unwrap();
        assert_eq!(battery.component(), Component::Sensor);
        let DiscoveryPayload::Sensor {
            unit_of_measurement,
            ..
        } = battery.payload
        else {
            panic!("numeric properties publish as sensors");
        };
        assert_eq!(unit_of_measurement.as_deref(), Some("%"));

        assert!(PropertyIdentity::new(&scheme, &owner, &Property::string("wifiSsid")).is_none());
    }

    #[test]
    fn generic_and_picture_keys_stay_off_entities() {
        let catalog = eufy_bridge_core::StaticCatalog;

        assert!(!OwnerIdentity::surfaces(
            &catalog,
            OwnerClass::Device,
            &Property::string(PICTURE_URL)
        ));
        assert!(!OwnerIdentity::surfaces(
            &catalog,
            OwnerClass::Device,
            &Property::string("name")
        ));
        assert!(OwnerIdentity::surfaces(
            &catalog,
            OwnerClass::Device,
            &Property::numeric("battery", Some("%"))
        ));
    }
}
