//! # eufy-bridge Core
//!
//! Property model shared by every eufy-bridge crate.
//!
//! This crate provides:
//! - Typed upstream events and the device/station snapshots they carry
//! - The closed set of upstream device type tags
//! - The static property schema catalog and its resolver trait
//! - Display encoding of property values for the home-automation bus

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod device_type;
pub mod encoding;
pub mod event;
pub mod schema;

pub use catalog::{StaticCatalog, PICTURE_URL};
pub use device_type::DeviceType;
pub use encoding::{encode_attribute, encode_bool, encode_number, humanize_key, render};
pub use event::{BridgeEvent, OwnerClass, OwnerSnapshot, PropertyValue};
pub use schema::{CatalogError, Property, PropertyKind, SchemaResolver};
