//! Upstream device type tags.

use serde::{Deserialize, Serialize};

/// Known upstream device/station type tags.
///
/// Stations and devices share one tag space: a hub reports [`DeviceType::Station`],
/// while standalone cameras act as their own station and report their camera tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum DeviceType {
    Station,
    Camera,
    Sensor,
    Floodlight,
    CameraE,
    Doorbell,
    BatteryDoorbell,
    Camera2C,
    Camera2,
    MotionSensor,
    Keypad,
    Camera2Pro,
    Camera2CPro,
    BatteryDoorbell2,
    IndoorCamera,
    IndoorPtCamera,
    SoloCamera,
    SoloCameraPro,
    IndoorCamera1080,
    IndoorPtCamera1080,
    LockBasic,
    LockAdvanced,
    LockBasicNoFinger,
    LockAdvancedNoFinger,
}

impl DeviceType {
    /// Every known type, in tag order.
    pub const ALL: [Self; 24] = [
        Self::Station,
        Self::Camera,
        Self::Sensor,
        Self::Floodlight,
        Self::CameraE,
        Self::Doorbell,
        Self::BatteryDoorbell,
        Self::Camera2C,
        Self::Camera2,
        Self::MotionSensor,
        Self::Keypad,
        Self::Camera2Pro,
        Self::Camera2CPro,
        Self::BatteryDoorbell2,
        Self::IndoorCamera,
        Self::IndoorPtCamera,
        Self::SoloCamera,
        Self::SoloCameraPro,
        Self::IndoorCamera1080,
        Self::IndoorPtCamera1080,
        Self::LockBasic,
        Self::LockAdvanced,
        Self::LockBasicNoFinger,
        Self::LockAdvancedNoFinger,
    ];

    /// Look up a type by its numeric tag.
    #[must_use]
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.code() == code)
    }

    /// Numeric tag reported by the upstream client.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Station => 0,
            Self::Camera => 1,
            Self::Sensor => 2,
            Self::Floodlight => 3,
            Self::CameraE => 4,
            Self::Doorbell => 5,
            Self::BatteryDoorbell => 7,
            Self::Camera2C => 8,
            Self::Camera2 => 9,
            Self::MotionSensor => 10,
            Self::Keypad => 11,
            Self::Camera2Pro => 14,
            Self::Camera2CPro => 15,
            Self::BatteryDoorbell2 => 16,
            Self::IndoorCamera => 30,
            Self::IndoorPtCamera => 31,
            Self::SoloCamera => 32,
            Self::SoloCameraPro => 33,
            Self::IndoorCamera1080 => 34,
            Self::IndoorPtCamera1080 => 35,
            Self::LockBasic => 50,
            Self::LockAdvanced => 51,
            Self::LockBasicNoFinger => 52,
            Self::LockAdvancedNoFinger => 53,
        }
    }

    /// Human readable type name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Station => "Station",
            Self::Camera => "Camera",
            Self::Sensor => "Sensor",
            Self::Floodlight => "Floodlight",
            Self::CameraE => "Camera E",
            Self::Doorbell => "Doorbell",
            Self::BatteryDoorbell => "Battery Doorbell",
            Self::Camera2C => "Camera 2C",
            Self::Camera2 => "Camera 2",
            Self::MotionSensor => "Motion Sensor",
            Self::Keypad => "Keypad",
            Self::Camera2Pro => "Camera 2 Pro",
            Self::Camera2CPro => "Camera 2C Pro",
            Self::BatteryDoorbell2 => "Battery Doorbell 2",
            Self::IndoorCamera => "Indoor Camera",
            Self::IndoorPtCamera => "Indoor Camera PT",
            Self::SoloCamera => "Solo Camera",
            Self::SoloCameraPro => "Solo Camera Pro",
            Self::IndoorCamera1080 => "Indoor Camera 1080",
            Self::IndoorPtCamera1080 => "Indoor Camera PT 1080",
            Self::LockBasic => "Lock Basic",
            Self::LockAdvanced => "Lock Advanced",
            Self::LockBasicNoFinger => "Lock Basic No Finger",
            Self::LockAdvancedNoFinger => "Lock Advanced No Finger",
        }
    }

    /// Whether devices of this type produce pictures and get a camera entity.
    #[must_use]
    pub const fn is_camera(self) -> bool {
        matches!(
            self,
            Self::Camera
                | Self::CameraE
                | Self::Camera2
                | Self::Camera2C
                | Self::Camera2Pro
                | Self::Camera2CPro
                | Self::Doorbell
                | Self::BatteryDoorbell
                | Self::BatteryDoorbell2
                | Self::Floodlight
                | Self::IndoorCamera
                | Self::IndoorPtCamera
                | Self::IndoorCamera1080
                | Self::IndoorPtCamera1080
                | Self::SoloCamera
                | Self::SoloCameraPro
        )
    }
}
