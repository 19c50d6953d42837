use std::{fs, time::Duration};

use paho_mqtt as mqtt;

use crate::{
    constants::{APP_NAME, MACHINE_ID_FILE},
    error::Error,
    settings::MqttSettings,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttMessage {
    pub topic: String,
    pub payload: String,
    pub retained: bool,
    pub qos: i32,
}

impl MqttMessage {
    pub fn new(topic: String, payload: String, retained: bool, qos: i32) -> Self {
        Self {
            topic,
            payload,
            retained,
            qos,
        }
    }
}

/// Minimal publish seam so entity code and tests don't depend on a live broker.
#[allow(async_fn_in_trait)]
pub trait MqttPublish {
    async fn publish(&self, message: MqttMessage) -> Result<(), Error>;
}

pub struct MqttClient {
    client: mqtt::AsyncClient,
    settings: MqttSettings,
}

impl MqttClient {
    pub fn new(settings: &MqttSettings) -> Result<Self, Error> {
        let uri = format!("tcp://{}:{}", settings.host, settings.port);
        let create_options = mqtt::CreateOptionsBuilder::new()
            .mqtt_version(mqtt::MQTT_VERSION_3_1_1)
            .server_uri(uri)
            .client_id(client_id(settings))
            .finalize();
        let client = mqtt::AsyncClient::new(create_options)?;

        Ok(MqttClient {
            client,
            settings: settings.clone(),
        })
    }

    pub async fn connect(&self) -> Result<(), Error> {
        let mut builder = mqtt::ConnectOptionsBuilder::new();
        builder
            .clean_session(true)
            .keep_alive_interval(Duration::from_secs(self.settings.keepalive as u64));
        if let Some(username) = &self.settings.username {
            builder.user_name(username);
        }
        if let Some(password) = &self.settings.password {
            builder.password(password);
        }

        match self.client.connect(builder.finalize()).await {
            Ok(_) => {
                log::info!("Connected to MQTT broker");
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to connect to MQTT broker: {}", e);
                Err(e.into())
            }
        }
    }

    pub async fn disconnect(&self) {
        match self.client.disconnect(None).await {
            Ok(_) => log::info!("Disconnected from MQTT"),
            Err(e) => log::error!("Failed to disconnect from MQTT: {}", e),
        }
    }
}

impl MqttPublish for MqttClient {
    async fn publish(&self, message: MqttMessage) -> Result<(), Error> {
        let msg = if message.retained {
            mqtt::Message::new_retained(&message.topic, message.payload, message.qos)
        } else {
            mqtt::Message::new(&message.topic, message.payload, message.qos)
        };

        match self.client.publish(msg).await {
            Ok(()) => {
                log::debug!("Published MQTT message for topic '{}'", message.topic);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to publish MQTT message: {}", e);
                Err(e.into())
            }
        }
    }
}

// The machine id is already hex encoded, so it can serve as the unique part
// of the client identity as-is.
fn client_id(settings: &MqttSettings) -> String {
    if let Some(client_id) = &settings.client_id {
        return client_id.clone();
    }
    match fs::read_to_string(MACHINE_ID_FILE) {
        Ok(machine_id) => format!("{}-{}", APP_NAME, machine_id.trim()),
        Err(_) => APP_NAME.to_owned(),
    }
}
