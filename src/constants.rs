pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const CONFIG_FILE: &str = "plant-probe.toml";
pub const MACHINE_ID_FILE: &str = "/etc/machine-id";

pub const DISCOVERY_PREFIX: &str = "homeassistant";
pub const CONFIG_TOPIC_SUFFIX: &str = "config";
pub const STATE_TOPIC_SUFFIX: &str = "state";

pub const PAYLOAD_ON: &str = "ON";
pub const PAYLOAD_OFF: &str = "OFF";

pub const RESTART_DELAY_SECS: u64 = 5;

// Calibrated range of the stand-in moisture reading
pub const MOISTURE_MIN: u8 = 20;
pub const MOISTURE_MAX: u8 = 50;
pub const MOISTURE_DRY_THRESHOLD: u8 = 30;
