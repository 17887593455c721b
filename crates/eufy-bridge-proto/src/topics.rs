//! MQTT topic scheme for discovery, state, and camera commands.
//!
//! Entity topics: `{prefix}/{component}/{unique_id}` with the suffixes
//! `config`, `state` and `attributes`. Camera commands arrive on
//! `eufy/{serial}/p2p`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default discovery prefix of the automation platform.
pub const DEFAULT_PREFIX: &str = "homeassistant";

/// Root of the inbound camera command topics.
pub const COMMAND_ROOT: &str = "eufy";

/// Last segment of a camera command topic.
pub const COMMAND_SUFFIX: &str = "p2p";

/// Entity kind understood by the discovery protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    /// Picture entity
    Camera,
    /// Two-state entity
    BinarySensor,
    /// Scalar entity
    Sensor,
}

impl Component {
    /// Topic segment for the component.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::BinarySensor => "binary_sensor",
            Self::Sensor => "sensor",
        }
    }

    /// Parse a topic segment.
    #[must_use]
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "camera" => Some(Self::Camera),
            "binary_sensor" => Some(Self::BinarySensor),
            "sensor" => Some(Self::Sensor),
            _ => None,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full topic set of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTopics {
    /// Base topic; cameras publish picture bytes here
    pub base: String,
    /// Discovery config topic
    pub discovery: String,
    /// JSON attributes topic
    pub attributes: String,
    /// State topic
    pub state: String,
}

/// Topic scheme configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicScheme {
    /// Discovery prefix (default: "homeassistant")
    pub prefix: String,
}

impl Default for TopicScheme {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl TopicScheme {
    /// Create a topic scheme with the given discovery prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Base topic of an entity.
    #[must_use]
    pub fn base(&self, component: Component, unique_id: &str) -> String {
        format!("{}/{}/{}", self.prefix, component, unique_id)
    }

    /// Discovery config topic of an entity.
    #[must_use]
    pub fn discovery(&self, component: Component, unique_id: &str) -> String {
        format!("{}/config", self.base(component, unique_id))
    }

    /// State topic of an entity.
    #[must_use]
    pub fn state(&self, component: Component, unique_id: &str) -> String {
        format!("{}/state", self.base(component, unique_id))
    }

    /// JSON attributes topic of an entity.
    #[must_use]
    pub fn attributes(&self, component: Component, unique_id: &str) -> String {
        format!("{}/attributes", self.base(component, unique_id))
    }

    /// All topics of an entity.
    #[must_use]
    pub fn entity(&self, component: Component, unique_id: &str) -> EntityTopics {
        EntityTopics {
            base: self.base(component, unique_id),
            discovery: self.discovery(component, unique_id),
            attributes: self.attributes(component, unique_id),
            state: self.state(component, unique_id),
        }
    }

    /// Wildcard subscription for every discovery config under the prefix.
    #[must_use]
    pub fn discovery_wildcard(&self) -> String {
        format!("{}/+/+/config", self.prefix)
    }

    /// Inbound command topic of a camera.
    #[must_use]
    pub fn command(&self, serial: &str) -> String {
        format!("{COMMAND_ROOT}/{serial}/{COMMAND_SUFFIX}")
    }

    /// Parse a command topic.
    ///
    /// Returns the camera serial if the topic is a command topic.
    #[must_use]
    pub fn parse_command<'a>(&self, topic: &'a str) -> Option<&'a str> {
        let mut parts = topic.split('/');
        let root = parts.next()?;
        let serial = parts.next()?;
        let suffix = parts.next()?;

        if root != COMMAND_ROOT || suffix != COMMAND_SUFFIX || serial.is_empty() {
            return None;
        }
        if parts.next().is_some() {
            return None;
        }

        Some(serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_generation() {
        let scheme = TopicScheme::default();
        let uid = "T8113N1234_camera";

        assert_eq!(
            scheme.base(Component::Camera, uid),
            "homeassistant/camera/T8113N1234_camera"
        );
        assert_eq!(
            scheme.discovery(Component::Camera, uid),
            "homeassistant/camera/T8113N1234_camera/config"
        );
        assert_eq!(
            scheme.state(Component::BinarySensor, "T8113N1234_enabled"),
            "homeassistant/binary_sensor/T8113N1234_enabled/state"
        );
        assert_eq!(
            scheme.attributes(Component::Sensor, "T8010_station"),
            "homeassistant/sensor/T8010_station/attributes"
        );
    }

    #[test]
    fn entity_topics_share_base() {
        let scheme = TopicScheme::new("ha");
        let topics = scheme.entity(Component::Sensor, "abc");

        assert_eq!(topics.base, "ha/sensor/abc");
        assert!(topics.discovery.starts_with(&topics.base));
        assert!(topics.state.starts_with(&topics.base));
        assert!(topics.attributes.starts_with(&topics.base));
        assert_eq!(scheme.discovery_wildcard(), "ha/+/+/config");
    }

    #[test]
    fn command_topic_parsing() {
        let scheme = TopicScheme::default();

        assert_eq!(scheme.command("T8113N1234"), "eufy/T8113N1234/p2p");
        assert_eq!(
            scheme.parse_command("eufy/T8113N1234/p2p"),
            Some("T8113N1234")
        );
        assert_eq!(scheme.parse_command("eufy/T8113N1234/other"), None);
        assert_eq!(scheme.parse_command("eufy//p2p"), None);
        assert_eq!(scheme.parse_command("eufy/a/p2p/extra"), None);
        assert_eq!(scheme.parse_command("homeassistant/camera/x/config"), None);
    }

    #[test]
    fn component_segments() {
        for component in [Component::Camera, Component::BinarySensor, Component::Sensor] {
            assert_eq!(Component::parse(component.as_str()), Some(component));
        }
        assert_eq!(Component::parse("light"), None);
    }
}
