//! Discovery payloads and the shared JSON encoder.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::topics::Component;

/// Manufacturer reported in every device descriptor.
pub const MANUFACTURER: &str = "eufy";

/// Descriptive block grouping entities under one device in the automation platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Stable identifiers of the physical device
    pub identifiers: Vec<String>,
    /// Manufacturer name
    pub manufacturer: String,
    /// Model code
    pub model: String,
    /// Display name
    pub name: String,
    /// Firmware version
    pub sw_version: String,
}

impl DeviceDescriptor {
    /// Descriptor for a device identified by `identifier`.
    #[must_use]
    pub fn new(
        identifier: impl Into<String>,
        model: impl Into<String>,
        name: impl Into<String>,
        sw_version: impl Into<String>,
    ) -> Self {
        Self {
            identifiers: vec![identifier.into()],
            manufacturer: MANUFACTURER.to_string(),
            model: model.into(),
            name: name.into(),
            sw_version: sw_version.into(),
        }
    }
}

/// Kind-specific discovery fields.
///
/// Each variant lists exactly the fields its component needs; the device
/// descriptor is merged in by [`encode_discovery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DiscoveryPayload {
    /// Camera showing the latest picture published on `topic`
    Camera {
        /// Display name
        name: String,
        /// Unique identifier
        unique_id: String,
        /// Topic carrying picture bytes
        topic: String,
        /// Topic carrying the attributes document
        json_attributes_topic: String,
    },
    /// Station or non-camera device summary sensor
    Owner {
        /// Display name
        name: String,
        /// Unique identifier
        unique_id: String,
        /// State topic
        state_topic: String,
        /// Topic carrying the attributes document
        json_attributes_topic: String,
    },
    /// Boolean property
    BinarySensor {
        /// Display name
        name: String,
        /// Unique identifier
        unique_id: String,
        /// Owner's merged state topic
        state_topic: String,
        /// Template extracting this property from the merged state
        value_template: String,
    },
    /// Numeric property
    Sensor {
        /// Display name
        name: String,
        /// Unique identifier
        unique_id: String,
        /// Owner's merged state topic
        state_topic: String,
        /// Template extracting this property from the merged state
        value_template: String,
        /// Unit of measurement
        #[serde(skip_serializing_if = "Option::is_none")]
        unit_of_measurement: Option<String>,
    },
}

impl DiscoveryPayload {
    /// Unique identifier carried by the payload.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        match self {
            Self::Camera { unique_id, .. }
            | Self::Owner { unique_id, .. }
            | Self::BinarySensor { unique_id, .. }
            | Self::Sensor { unique_id, .. } => unique_id,
        }
    }

    /// Component the payload announces.
    #[must_use]
    pub const fn component(&self) -> Component {
        match self {
            Self::Camera { .. } => Component::Camera,
            Self::BinarySensor { .. } => Component::BinarySensor,
            Self::Owner { .. } | Self::Sensor { .. } => Component::Sensor,
        }
    }
}

/// Template extracting `key` from a merged state bundle.
#[must_use]
pub fn value_template(key: &str) -> String {
    format!("{{{{ value_json.{key} }}}}")
}

#[derive(Serialize)]
struct DiscoveryMessage<'a> {
    device: &'a DeviceDescriptor,
    #[serde(flatten)]
    payload: &'a DiscoveryPayload,
}

/// Encode a discovery message body.
///
/// # Errors
///
/// Returns error if serialization fails.
pub fn encode_discovery(
    device: &DeviceDescriptor,
    payload: &DiscoveryPayload,
) -> Result<Vec<u8>, EncodeError> {
    let message = DiscoveryMessage { device, payload };
    serde_json::to_vec(&message).map_err(|e| EncodeError::Json(e.to_string()))
}

/// Encode a state bundle or attributes document.
///
/// # Errors
///
/// Returns error if serialization fails.
pub fn encode_document(document: &BTreeMap<String, String>) -> Result<Vec<u8>, EncodeError> {
    serde_json::to_vec(document).map_err(|e| EncodeError::Json(e.to_string()))
}

/// Errors that can occur while encoding bus payloads.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EncodeError {
    /// JSON serialization failed
    #[error("JSON encode error: {0}")]
    Json(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn descriptor() -> DeviceDescriptor {
        DeviceDescriptor::new("T8113N1234", "T8113", "Driveway", "2.1.7")
    }

    #[test]
    fn camera_discovery_merges_device() {
        let payload = DiscoveryPayload::Camera {
            name: "Driveway".to_string(),
            unique_id: "T8113N1234_camera".to_string(),
            topic: "homeassistant/camera/T8113N1234_camera".to_string(),
            json_attributes_topic: "homeassistant/camera/T8113N1234_camera/attributes".to_string(),
        };

        let bytes = encode_discovery(&descriptor(), &payload).unwrap();
        let decoded: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(
            decoded,
            json!({
                "device": {
                    "identifiers": ["T8113N1234"],
                    "manufacturer": "eufy",
                    "model": "T8113",
                    "name": "Driveway",
                    "sw_version": "2.1.7"
                },
                "name": "Driveway",
                "unique_id": "T8113N1234_camera",
                "topic": "homeassistant/camera/T8113N1234_camera",
                "json_attributes_topic": "homeassistant/camera/T8113N1234_camera/attributes"
            })
        );
        assert_eq!(payload.component(), Component::Camera);
    }

    #[test]
    fn sensor_unit_is_optional() {
        let mut payload = DiscoveryPayload::Sensor {
            name: "Driveway Battery".to_string(),
            unique_id: "T8113N1234_battery".to_string(),
            state_topic: "homeassistant/camera/T8113N1234_camera/state".to_string(),
            value_template: value_template("battery"),
            unit_of_measurement: Some("%".to_string()),
        };

        let decoded: Value =
            serde_json::from_slice(&encode_discovery(&descriptor(), &payload).unwrap()).unwrap();
        assert_eq!(decoded["unit_of_measurement"], "%");
        assert_eq!(decoded["value_template"], "{{ value_json.battery }}");

        if let DiscoveryPayload::Sensor {
            unit_of_measurement,
            ..
        } = &mut payload
        {
            *unit_of_measurement = None;
        }
        let decoded: Value =
            serde_json::from_slice(&encode_discovery(&descriptor(), &payload).unwrap()).unwrap();
        assert!(decoded.get("unit_of_measurement").is_none());
        assert_eq!(payload.unique_id(), "T8113N1234_battery");
    }

    #[test]
    fn document_encoding_is_stable() {
        let mut state = BTreeMap::new();
        state.insert("motionDetection".to_string(), "ON".to_string());
        state.insert("battery".to_string(), "87".to_string());

        let first = encode_document(&state).unwrap();
        let second = encode_document(&state).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, br#"{"battery":"87","motionDetection":"ON"}"#);
    }
}
