//! Built-in property catalog for every known device and station type.

use crate::device_type::DeviceType;
use crate::event::OwnerClass;
use crate::schema::{Property, SchemaResolver};

/// Property key carrying the latest snapshot locator of a camera.
pub const PICTURE_URL: &str = "pictureUrl";

const TYPE_LABELS: &[(i64, &str)] = &[
    (0, "Station"),
    (1, "Camera"),
    (2, "Sensor"),
    (3, "Floodlight"),
    (4, "Camera E"),
    (5, "Doorbell"),
    (7, "Battery Doorbell"),
    (8, "Camera 2C"),
    (9, "Camera 2"),
    (10, "Motion Sensor"),
    (11, "Keypad"),
    (14, "Camera 2 Pro"),
    (15, "Camera 2C Pro"),
    (16, "Battery Doorbell 2"),
    (30, "Indoor Camera"),
    (31, "Indoor Camera PT"),
    (32, "Solo Camera"),
    (33, "Solo Camera Pro"),
    (34, "Indoor Camera 1080"),
    (35, "Indoor Camera PT 1080"),
    (50, "Lock Basic"),
    (51, "Lock Advanced"),
    (52, "Lock Basic No Finger"),
    (53, "Lock Advanced No Finger"),
];

const GUARD_MODE_LABELS: &[(i64, &str)] = &[
    (0, "Away"),
    (1, "Home"),
    (2, "Schedule"),
    (3, "Custom 1"),
    (4, "Custom 2"),
    (5, "Custom 3"),
    (47, "Geofencing"),
    (63, "Disarmed"),
];

// Generic descriptive properties
const NAME: Property = Property::string("name");
const MODEL: Property = Property::string("model");
const SERIAL_NUMBER: Property = Property::string("serialNumber");
const HARDWARE_VERSION: Property = Property::string("hardwareVersion");
const SOFTWARE_VERSION: Property = Property::string("softwareVersion");
const TYPE: Property = Property::enumerated("type", TYPE_LABELS);
const STATION_SERIAL_NUMBER: Property = Property::string("stationSerialNumber");

// Device properties
const BATTERY: Property = Property::numeric("battery", Some("%"));
const BATTERY_TEMPERATURE: Property = Property::numeric("batteryTemperature", Some("°C"));
const BATTERY_LOW: Property = Property::boolean("batteryLow");
const BATTERY_USAGE_LAST_WEEK: Property = Property::numeric("batteryUsageLastWeek", Some("%"));
const CHARGING_STATUS: Property = Property::enumerated(
    "chargingStatus",
    &[
        (1, "Charging"),
        (2, "Unplugged"),
        (3, "Plugged"),
        (4, "Solar charging"),
    ],
);
const LAST_CHARGING_DAYS: Property = Property::numeric("lastChargingDays", None);
const LAST_CHARGING_TOTAL_EVENTS: Property = Property::numeric("lastChargingTotalEvents", None);
const LAST_CHARGING_RECORDED_EVENTS: Property =
    Property::numeric("lastChargingRecordedEvents", None);
const LAST_CHARGING_FALSE_EVENTS: Property = Property::numeric("lastChargingFalseEvents", None);
const WIFI_RSSI: Property = Property::numeric("wifiRssi", Some("dBm"));
const WIFI_SIGNAL_LEVEL: Property = Property::enumerated(
    "wifiSignalLevel",
    &[
        (0, "No signal"),
        (1, "Weak"),
        (2, "Normal"),
        (3, "Strong"),
        (4, "Full"),
    ],
);
const ENABLED: Property = Property::boolean("enabled");
const STATE: Property = Property::enumerated(
    "state",
    &[
        (0, "Offline"),
        (1, "Online"),
        (2, "Manually disabled"),
        (3, "Offline low battery"),
        (4, "Remove and readd"),
        (5, "Reset and readd"),
    ],
);
const ANTITHEFT_DETECTION: Property = Property::boolean("antitheftDetection");
const AUTO_NIGHTVISION: Property = Property::boolean("autoNightvision");
const NIGHTVISION: Property = Property::enumerated(
    "nightvision",
    &[
        (0, "Off"),
        (1, "B&W Night Vision"),
        (2, "Color Night Vision"),
    ],
);
const STATUS_LED: Property = Property::boolean("statusLed");
const WATERMARK: Property = Property::enumerated(
    "watermark",
    &[(0, "Off"), (1, "Timestamp"), (2, "Timestamp and logo")],
);
const POWER_WORKING_MODE: Property = Property::enumerated(
    "powerWorkingMode",
    &[
        (0, "Optimal Battery Life"),
        (1, "Optimal Surveillance"),
        (2, "Custom Recording"),
    ],
);
const MOTION_DETECTION: Property = Property::boolean("motionDetection");
const MOTION_DETECTION_SENSITIVITY: Property =
    Property::numeric("motionDetectionSensitivity", None);
const MOTION_DETECTED: Property = Property::boolean("motionDetected");
const PERSON_DETECTED: Property = Property::boolean("personDetected");
const PERSON_NAME: Property = Property::string("personName");
const PET_DETECTED: Property = Property::boolean("petDetected");
const SOUND_DETECTED: Property = Property::boolean("soundDetected");
const CRYING_DETECTED: Property = Property::boolean("cryingDetected");
const RINGING: Property = Property::boolean("ringing");
const RTSP_STREAM: Property = Property::boolean("rtspStream");
const RTSP_STREAM_URL: Property = Property::string("rtspStreamUrl");
const PICTURE: Property = Property::string(PICTURE_URL);
const MICROPHONE: Property = Property::boolean("microphone");
const SPEAKER: Property = Property::boolean("speaker");
const SPEAKER_VOLUME: Property =
    Property::enumerated("speakerVolume", &[(90, "Low"), (92, "Medium"), (93, "High")]);
const AUDIO_RECORDING: Property = Property::boolean("audioRecording");
const LIGHT: Property = Property::boolean("light");
const LIGHT_BRIGHTNESS: Property = Property::numeric("lightSettingsBrightnessManual", Some("%"));
const LOCKED: Property = Property::boolean("locked");
const LOCK_STATUS: Property = Property::numeric("lockStatus", None);
const SENSOR_OPEN: Property = Property::boolean("sensorOpen");
const SENSOR_CHANGE_TIME: Property = Property::numeric("sensorChangeTime", None);
const MOTION_SENSOR_PIR_EVENT: Property = Property::numeric("motionSensorPirEvent", None);

// Station properties
const LAN_IP_ADDRESS: Property = Property::string("lanIpAddress");
const MAC_ADDRESS: Property = Property::string("macAddress");
const GUARD_MODE: Property = Property::enumerated("guardMode", GUARD_MODE_LABELS);
const CURRENT_MODE: Property = Property::enumerated("currentMode", GUARD_MODE_LABELS);
const TIME_FORMAT: Property = Property::enumerated("timeFormat", &[(0, "12h"), (1, "24h")]);
const ALARM: Property = Property::boolean("alarm");
const ALARM_TYPE: Property = Property::numeric("alarmType", None);
const ALARM_ARMED: Property = Property::boolean("alarmArmed");
const ALARM_VOLUME: Property = Property::numeric("alarmVolume", None);
const ALARM_TONE: Property =
    Property::enumerated("alarmTone", &[(1, "Alarm sound 1"), (2, "Alarm sound 2")]);
const PROMPT_VOLUME: Property = Property::numeric("promptVolume", None);
const NOTIFY_MODE_SCHEDULE: Property = Property::boolean("notificationSwitchModeSchedule");
const NOTIFY_MODE_GEOFENCE: Property = Property::boolean("notificationSwitchModeGeofence");
const NOTIFY_MODE_APP: Property = Property::boolean("notificationSwitchModeApp");
const NOTIFY_MODE_KEYPAD: Property = Property::boolean("notificationSwitchModeKeypad");
const NOTIFY_START_ALARM_DELAY: Property = Property::boolean("notificationStartAlarmDelay");

const GENERIC_DEVICE: &[Property] = &[
    NAME,
    MODEL,
    SERIAL_NUMBER,
    HARDWARE_VERSION,
    SOFTWARE_VERSION,
    TYPE,
    STATION_SERIAL_NUMBER,
];

const BASE_STATION: &[Property] = &[
    NAME,
    MODEL,
    SERIAL_NUMBER,
    HARDWARE_VERSION,
    SOFTWARE_VERSION,
    TYPE,
];

const BATTERY_CAMERA: &[Property] = &[
    NAME,
    MODEL,
    SERIAL_NUMBER,
    HARDWARE_VERSION,
    SOFTWARE_VERSION,
    TYPE,
    STATION_SERIAL_NUMBER,
    BATTERY,
    BATTERY_TEMPERATURE,
    BATTERY_USAGE_LAST_WEEK,
    LAST_CHARGING_DAYS,
    LAST_CHARGING_TOTAL_EVENTS,
    LAST_CHARGING_RECORDED_EVENTS,
    LAST_CHARGING_FALSE_EVENTS,
    CHARGING_STATUS,
    WIFI_RSSI,
    WIFI_SIGNAL_LEVEL,
    ENABLED,
    STATE,
    ANTITHEFT_DETECTION,
    AUTO_NIGHTVISION,
    STATUS_LED,
    WATERMARK,
    POWER_WORKING_MODE,
    MOTION_DETECTION,
    MOTION_DETECTION_SENSITIVITY,
    MOTION_DETECTED,
    PERSON_DETECTED,
    PERSON_NAME,
    RTSP_STREAM,
    RTSP_STREAM_URL,
    MICROPHONE,
    SPEAKER,
    SPEAKER_VOLUME,
    AUDIO_RECORDING,
    PICTURE,
];

const WIRED_DOORBELL: &[Property] = &[
    NAME,
    MODEL,
    SERIAL_NUMBER,
    HARDWARE_VERSION,
    SOFTWARE_VERSION,
    TYPE,
    STATION_SERIAL_NUMBER,
    WIFI_RSSI,
    WIFI_SIGNAL_LEVEL,
    ENABLED,
    STATE,
    STATUS_LED,
    WATERMARK,
    MOTION_DETECTION,
    MOTION_DETECTED,
    PERSON_DETECTED,
    PERSON_NAME,
    RINGING,
    MICROPHONE,
    AUDIO_RECORDING,
    PICTURE,
];

const BATTERY_DOORBELL: &[Property] = &[
    NAME,
    MODEL,
    SERIAL_NUMBER,
    HARDWARE_VERSION,
    SOFTWARE_VERSION,
    TYPE,
    STATION_SERIAL_NUMBER,
    BATTERY,
    BATTERY_TEMPERATURE,
    BATTERY_LOW,
    CHARGING_STATUS,
    LAST_CHARGING_DAYS,
    LAST_CHARGING_TOTAL_EVENTS,
    LAST_CHARGING_RECORDED_EVENTS,
    LAST_CHARGING_FALSE_EVENTS,
    WIFI_RSSI,
    WIFI_SIGNAL_LEVEL,
    ENABLED,
    STATE,
    STATUS_LED,
    WATERMARK,
    POWER_WORKING_MODE,
    MOTION_DETECTION,
    MOTION_DETECTED,
    PERSON_DETECTED,
    PERSON_NAME,
    RINGING,
    MICROPHONE,
    AUDIO_RECORDING,
    PICTURE,
];

const FLOODLIGHT: &[Property] = &[
    NAME,
    MODEL,
    SERIAL_NUMBER,
    HARDWARE_VERSION,
    SOFTWARE_VERSION,
    TYPE,
    STATION_SERIAL_NUMBER,
    WIFI_RSSI,
    WIFI_SIGNAL_LEVEL,
    ENABLED,
    STATE,
    STATUS_LED,
    AUTO_NIGHTVISION,
    WATERMARK,
    MOTION_DETECTION,
    MOTION_DETECTION_SENSITIVITY,
    MOTION_DETECTED,
    PERSON_DETECTED,
    PERSON_NAME,
    LIGHT,
    LIGHT_BRIGHTNESS,
    RTSP_STREAM,
    RTSP_STREAM_URL,
    MICROPHONE,
    SPEAKER,
    AUDIO_RECORDING,
    PICTURE,
];

const INDOOR_CAMERA: &[Property] = &[
    NAME,
    MODEL,
    SERIAL_NUMBER,
    HARDWARE_VERSION,
    SOFTWARE_VERSION,
    TYPE,
    STATION_SERIAL_NUMBER,
    WIFI_RSSI,
    WIFI_SIGNAL_LEVEL,
    ENABLED,
    STATE,
    STATUS_LED,
    NIGHTVISION,
    WATERMARK,
    MOTION_DETECTION,
    MOTION_DETECTION_SENSITIVITY,
    MOTION_DETECTED,
    PERSON_DETECTED,
    PERSON_NAME,
    PET_DETECTED,
    SOUND_DETECTED,
    CRYING_DETECTED,
    RTSP_STREAM,
    RTSP_STREAM_URL,
    MICROPHONE,
    SPEAKER,
    SPEAKER_VOLUME,
    AUDIO_RECORDING,
    PICTURE,
];

const SOLO_CAMERA: &[Property] = &[
    NAME,
    MODEL,
    SERIAL_NUMBER,
    HARDWARE_VERSION,
    SOFTWARE_VERSION,
    TYPE,
    STATION_SERIAL_NUMBER,
    BATTERY,
    BATTERY_TEMPERATURE,
    CHARGING_STATUS,
    WIFI_RSSI,
    WIFI_SIGNAL_LEVEL,
    ENABLED,
    STATE,
    STATUS_LED,
    NIGHTVISION,
    WATERMARK,
    POWER_WORKING_MODE,
    MOTION_DETECTION,
    MOTION_DETECTION_SENSITIVITY,
    MOTION_DETECTED,
    PERSON_DETECTED,
    PERSON_NAME,
    MICROPHONE,
    SPEAKER,
    AUDIO_RECORDING,
    PICTURE,
];

const ENTRY_SENSOR: &[Property] = &[
    NAME,
    MODEL,
    SERIAL_NUMBER,
    HARDWARE_VERSION,
    SOFTWARE_VERSION,
    TYPE,
    STATION_SERIAL_NUMBER,
    ENABLED,
    STATE,
    WIFI_RSSI,
    BATTERY_LOW,
    SENSOR_OPEN,
    SENSOR_CHANGE_TIME,
];

const MOTION_SENSOR: &[Property] = &[
    NAME,
    MODEL,
    SERIAL_NUMBER,
    HARDWARE_VERSION,
    SOFTWARE_VERSION,
    TYPE,
    STATION_SERIAL_NUMBER,
    ENABLED,
    STATE,
    WIFI_RSSI,
    BATTERY_LOW,
    MOTION_DETECTED,
    MOTION_DETECTION_SENSITIVITY,
    MOTION_SENSOR_PIR_EVENT,
];

const KEYPAD: &[Property] = &[
    NAME,
    MODEL,
    SERIAL_NUMBER,
    HARDWARE_VERSION,
    SOFTWARE_VERSION,
    TYPE,
    STATION_SERIAL_NUMBER,
    ENABLED,
    STATE,
    WIFI_RSSI,
    BATTERY_LOW,
];

const LOCK: &[Property] = &[
    NAME,
    MODEL,
    SERIAL_NUMBER,
    HARDWARE_VERSION,
    SOFTWARE_VERSION,
    TYPE,
    STATION_SERIAL_NUMBER,
    BATTERY,
    WIFI_RSSI,
    WIFI_SIGNAL_LEVEL,
    ENABLED,
    STATE,
    LOCKED,
    LOCK_STATUS,
];

const HOMEBASE: &[Property] = &[
    NAME,
    MODEL,
    SERIAL_NUMBER,
    HARDWARE_VERSION,
    SOFTWARE_VERSION,
    TYPE,
    LAN_IP_ADDRESS,
    MAC_ADDRESS,
    GUARD_MODE,
    CURRENT_MODE,
    TIME_FORMAT,
    ALARM,
    ALARM_TYPE,
    ALARM_ARMED,
    ALARM_VOLUME,
    ALARM_TONE,
    PROMPT_VOLUME,
    NOTIFY_MODE_SCHEDULE,
    NOTIFY_MODE_GEOFENCE,
    NOTIFY_MODE_APP,
    NOTIFY_MODE_KEYPAD,
    NOTIFY_START_ALARM_DELAY,
];

const STANDALONE_STATION: &[Property] = &[
    NAME,
    MODEL,
    SERIAL_NUMBER,
    HARDWARE_VERSION,
    SOFTWARE_VERSION,
    TYPE,
    LAN_IP_ADDRESS,
    MAC_ADDRESS,
    GUARD_MODE,
    CURRENT_MODE,
    TIME_FORMAT,
    NOTIFY_MODE_SCHEDULE,
    NOTIFY_MODE_GEOFENCE,
    NOTIFY_MODE_APP,
];

/// The catalog shipped with the bridge.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl StaticCatalog {
    fn device_properties(ty: DeviceType) -> &'static [Property] {
        match ty {
            DeviceType::Station => &[],
            DeviceType::Camera
            | DeviceType::CameraE
            | DeviceType::Camera2
            | DeviceType::Camera2C
            | DeviceType::Camera2Pro
            | DeviceType::Camera2CPro => BATTERY_CAMERA,
            DeviceType::Doorbell => WIRED_DOORBELL,
            DeviceType::BatteryDoorbell | DeviceType::BatteryDoorbell2 => BATTERY_DOORBELL,
            DeviceType::Floodlight => FLOODLIGHT,
            DeviceType::IndoorCamera
            | DeviceType::IndoorPtCamera
            | DeviceType::IndoorCamera1080
            | DeviceType::IndoorPtCamera1080 => INDOOR_CAMERA,
            DeviceType::SoloCamera | DeviceType::SoloCameraPro => SOLO_CAMERA,
            DeviceType::Sensor => ENTRY_SENSOR,
            DeviceType::MotionSensor => MOTION_SENSOR,
            DeviceType::Keypad => KEYPAD,
            DeviceType::LockBasic
            | DeviceType::LockAdvanced
            | DeviceType::LockBasicNoFinger
            | DeviceType::LockAdvancedNoFinger => LOCK,
        }
    }

    fn station_properties(ty: DeviceType) -> &'static [Property] {
        match ty {
            DeviceType::Station => HOMEBASE,
            DeviceType::Doorbell
            | DeviceType::Floodlight
            | DeviceType::IndoorCamera
            | DeviceType::IndoorPtCamera
            | DeviceType::IndoorCamera1080
            | DeviceType::IndoorPtCamera1080
            | DeviceType::SoloCamera
            | DeviceType::SoloCameraPro => STANDALONE_STATION,
            _ => BASE_STATION,
        }
    }
}

impl SchemaResolver for StaticCatalog {
    fn generic(&self, class: OwnerClass) -> &[Property] {
        match class {
            OwnerClass::Device => GENERIC_DEVICE,
            OwnerClass::Station => BASE_STATION,
        }
    }

    fn declared(&self, class: OwnerClass, type_tag: u16) -> &[Property] {
        let Some(ty) = DeviceType::from_code(type_tag) else {
            return &[];
        };

        match class {
            OwnerClass::Device => Self::device_properties(ty),
            OwnerClass::Station => Self::station_properties(ty),
        }
    }
}
