//! Upstream events and the owner snapshots they carry.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::schema::CatalogError;

/// A single upstream property value.
///
/// The upstream client reports properties as `{ "value": ... }` records;
/// any additional fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    /// The raw, dynamically typed value
    pub value: Value,
}

impl PropertyValue {
    /// Wrap a raw value.
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        Self { value }
    }
}

/// Whether an owner is a device or a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerClass {
    /// A camera, sensor, lock or other device
    Device,
    /// A hub/base station
    Station,
}

impl fmt::Display for OwnerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device => f.write_str("device"),
            Self::Station => f.write_str("station"),
        }
    }
}

impl FromStr for OwnerClass {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "device" => Ok(Self::Device),
            "station" => Ok(Self::Station),
            other => Err(CatalogError::UnknownClass(other.to_string())),
        }
    }
}

/// Everything the upstream client exposes about a device or station when it
/// becomes known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSnapshot {
    /// Serial number, stable across restarts
    pub serial: String,
    /// Model code (e.g. `T8113`)
    pub model: String,
    /// User-assigned name
    pub name: String,
    /// Firmware version
    #[serde(default)]
    pub software_version: String,
    /// Upstream device type tag
    #[serde(rename = "type")]
    pub type_tag: u16,
    /// Serial of the station a device is attached to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_serial: Option<String>,
    /// Current property values keyed by property name
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

/// A typed event emitted by the upstream device/session client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BridgeEvent {
    /// A device became known
    DeviceAdded {
        /// Device snapshot
        device: OwnerSnapshot,
    },
    /// A device went away
    DeviceRemoved {
        /// Device serial
        serial: String,
    },
    /// A station became known
    StationAdded {
        /// Station snapshot
        station: OwnerSnapshot,
    },
    /// A station went away
    StationRemoved {
        /// Station serial
        serial: String,
    },
    /// A device property changed
    DevicePropertyChanged {
        /// Device serial
        serial: String,
        /// Property key
        name: String,
        /// New value
        value: PropertyValue,
    },
    /// A station property changed
    StationPropertyChanged {
        /// Station serial
        serial: String,
        /// Property key
        name: String,
        /// New value
        value: PropertyValue,
    },
}

impl BridgeEvent {
    /// Serial of the device or station the event refers to.
    #[must_use]
    pub fn serial(&self) -> &str {
        match self {
            Self::DeviceAdded { device: owner } | Self::StationAdded { station: owner } => {
                &owner.serial
            }
            Self::DeviceRemoved { serial }
            | Self::StationRemoved { serial }
            | Self::DevicePropertyChanged { serial, .. }
            | Self::StationPropertyChanged { serial, .. } => serial,
        }
    }

    /// Whether the event refers to a device or a station.
    #[must_use]
    pub fn class(&self) -> OwnerClass {
        match self {
            Self::DeviceAdded { .. }
            | Self::DeviceRemoved { .. }
            | Self::DevicePropertyChanged { .. } => OwnerClass::Device,
            Self::StationAdded { .. }
            | Self::StationRemoved { .. }
            | Self::StationPropertyChanged { .. } => OwnerClass::Station,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_added_from_json() {
        let raw = json!({
            "event": "device_added",
            "device": {
                "serial": "T8113N1234",
                "model": "T8113",
                "name": "Driveway",
                "softwareVersion": "2.1.7",
                "type": 9,
                "stationSerial": "T8010N5678",
                "properties": {
                    "battery": { "value": 87, "timestamp": 0 },
                    "enabled": { "value": true }
                }
            }
        });

        let event: BridgeEvent = serde_json::from_value(raw).unwrap();
        let BridgeEvent::DeviceAdded { device } = &event else {
            panic!("unexpected event {event:?}");
        };

        assert_eq!(device.type_tag, 9);
        assert_eq!(device.station_serial.as_deref(), Some("T8010N5678"));
        assert_eq!(device.properties["battery"].value, json!(87));
        assert_eq!(event.serial(), "T8113N1234");
        assert_eq!(event.class(), OwnerClass::Device);
    }

    #[test]
    fn property_changed_from_json() {
        let raw = json!({
            "event": "station_property_changed",
            "serial": "T8010N5678",
            "name": "guardMode",
            "value": { "value": 63 }
        });

        let event: BridgeEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(
            event,
            BridgeEvent::StationPropertyChanged {
                serial: "T8010N5678".to_string(),
                name: "guardMode".to_string(),
                value: PropertyValue::new(63),
            }
        );
        assert_eq!(event.class(), OwnerClass::Station);
    }

    #[test]
    fn owner_class_parsing() {
        assert_eq!("device".parse::<OwnerClass>().unwrap(), OwnerClass::Device);
        assert_eq!("station".parse::<OwnerClass>().unwrap(), OwnerClass::Station);
        assert!("hub".parse::<OwnerClass>().is_err());
    }
}
