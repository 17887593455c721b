//! # Ingress Adapter
//!
//! Feeds upstream device/session events into the bridge.
//!
//! The upstream client runs out of process and writes one JSON event per
//! line; this crate parses those lines into [`BridgeEvent`]s and delivers
//! them, in order, on a single-consumer channel.
//!
//! [`BridgeEvent`]: eufy_bridge_core::BridgeEvent

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod events;
pub mod reader;

pub use events::{parse_line, EventParseError, EVENT_TYPES};
pub use reader::EventReader;
