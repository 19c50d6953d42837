use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::constants::{CONFIG_FILE, DISCOVERY_PREFIX};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub publish_interval: u32,
    pub mqtt: MqttSettings,
    pub homeassistant: HomeAssistantSettings,
    pub sensor: SensorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            publish_interval: 5,
            mqtt: MqttSettings::default(),
            homeassistant: HomeAssistantSettings::default(),
            sensor: SensorSettings::default(),
        }
    }
}

impl Settings {
    pub fn new(config: Option<&str>) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(config.unwrap_or(CONFIG_FILE)))
            .merge(Env::raw().map(|k| {
                if k.starts_with("mqtt_") {
                    k.as_str().to_lowercase().replace("mqtt_", "mqtt.").into()
                } else if k.starts_with("homeassistant_") {
                    k.as_str()
                        .to_lowercase()
                        .replace("homeassistant_", "homeassistant.")
                        .into()
                } else if k.starts_with("sensor_") {
                    k.as_str().to_lowercase().replace("sensor_", "sensor.").into()
                } else {
                    k.into()
                }
            }))
            .extract()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MqttSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: Option<String>,
    pub keepalive: u16,
}

impl Default for MqttSettings {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 1883,
            username: None,
            password: None,
            client_id: None,
            keepalive: 60,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HomeAssistantSettings {
    pub discovery_prefix: String,
    pub node_id: Option<String>,
}

impl Default for HomeAssistantSettings {
    fn default() -> Self {
        Self {
            discovery_prefix: DISCOVERY_PREFIX.into(),
            node_id: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SensorSettings {
    pub name: String,
    pub object_id: String,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            name: "Soil Moisture".into(),
            object_id: "soil_moisture".into(),
        }
    }
}
