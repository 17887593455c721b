//! Parsing of upstream event lines.

use eufy_bridge_core::BridgeEvent;

/// Event tags the bridge understands.
pub const EVENT_TYPES: &[&str] = &[
    "device_added",
    "device_removed",
    "station_added",
    "station_removed",
    "device_property_changed",
    "station_property_changed",
];

/// Parse one line of the upstream event feed.
///
/// Returns `Ok(None)` for blank lines.
///
/// # Errors
///
/// Returns error if the line is not a JSON object or names an unknown event.
pub fn parse_line(line: &str) -> Result<Option<BridgeEvent>, EventParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let raw: serde_json::Value =
        serde_json::from_str(line).map_err(|e| EventParseError::Json(e.to_string()))?;

    let Some(kind) = raw.get("event").and_then(serde_json::Value::as_str) else {
        return Err(EventParseError::MissingEventType);
    };
    if !EVENT_TYPES.contains(&kind) {
        return Err(EventParseError::UnknownEventType(kind.to_string()));
    }
    let kind = kind.to_string();

    serde_json::from_value(raw)
        .map(Some)
        .map_err(|e| EventParseError::InvalidEvent {
            event: kind,
            message: e.to_string(),
        })
}

/// Errors that can occur parsing upstream events.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventParseError {
    /// Line is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(String),
    /// Object has no `event` tag
    #[error("missing event type")]
    MissingEventType,
    /// Event tag is not recognized
    #[error("unknown event type: {0}")]
    UnknownEventType(String),
    /// Event fields do not match the event type
    #[error("invalid {event} event: {message}")]
    InvalidEvent {
        /// Event tag
        event: String,
        /// Decoder message
        message: String,
    },
}
