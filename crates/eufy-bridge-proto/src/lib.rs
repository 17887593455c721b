//! # eufy-bridge Protocol
//!
//! Discovery payloads and MQTT topic scheme for the home-automation bus.
//!
//! ## Messages
//!
//! - Discovery: retained JSON merging a `device` descriptor with kind-specific fields
//! - State: retained JSON bundle of property key to display string
//! - Attributes: retained JSON document of the generic property subset
//! - Picture: retained raw image bytes on the camera base topic
//!
//! ## Entities
//!
//! Owners publish as `<serial>_camera`, `<serial>_station` or `<serial>_device`;
//! surfaced properties as `<serial>_<key>`.
//!
//! ## MQTT Topics
//!
//! Topic scheme: `{prefix}/{component}/{unique_id}/{config|state|attributes}`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod discovery;
pub mod entities;
pub mod topics;

pub use discovery::{
    encode_discovery, encode_document, value_template, DeviceDescriptor, DiscoveryPayload,
    EncodeError,
};
pub use entities::{OwnerIdentity, OwnerKind, PropertyIdentity};
pub use topics::{Component, EntityTopics, TopicScheme};
