use std::{sync::Arc, time::Duration};

use serde_json::json;
use tokio::time;

use crate::{
    constants::{APP_NAME, APP_VERSION},
    error::Error,
    homeassistant::{binary_sensor::BinarySensor, entity::DiscoveryConfig, sensor::Sensor},
    moisture::MoistureProbe,
    mqtt::MqttClient,
    settings::Settings,
};

pub struct PlantProbe {
    settings: Settings,
    mqtt: Arc<MqttClient>,
}

impl PlantProbe {
    pub fn new(settings: Settings) -> Result<Self, Error> {
        let mqtt = MqttClient::new(&settings.mqtt)?;
        Ok(PlantProbe {
            settings,
            mqtt: Arc::new(mqtt),
        })
    }

    pub async fn run(&self) -> Result<(), Error> {
        log::info!("Starting {} {}", APP_NAME, APP_VERSION);

        self.mqtt.connect().await?;
        let (moisture, dryness) = self.register_entities().await?;

        let result = tokio::select! {
            res = handle_signals() => res,
            res = self.publish_loop(&moisture, &dryness) => res,
        };

        log::info!("Shutting down");
        self.mqtt.disconnect().await;
        result
    }

    /// Connects, deregisters the discovered entities and exits.
    pub async fn clean(&self) -> Result<(), Error> {
        self.mqtt.connect().await?;
        let (moisture, dryness) = self.register_entities().await?;
        moisture.unpublish().await?;
        dryness.unpublish().await?;
        log::info!("Removed retained discovery topics");
        self.mqtt.disconnect().await;
        Ok(())
    }

    async fn register_entities(
        &self,
    ) -> Result<(Sensor<MqttClient>, BinarySensor<MqttClient>), Error> {
        let ha = &self.settings.homeassistant;
        let sensor = &self.settings.sensor;

        let mut extra_conf = DiscoveryConfig::new();
        extra_conf.insert("unit_of_measurement".into(), json!("%"));
        extra_conf.insert("device_class".into(), json!("moisture"));
        let moisture = Sensor::new(
            self.mqtt.clone(),
            &sensor.name,
            &sensor.object_id,
            ha.node_id.as_deref(),
            &ha.discovery_prefix,
            &extra_conf,
        )
        .await?;
        log::info!("Publishing moisture to '{}'", moisture.state_topic());

        let mut extra_conf = DiscoveryConfig::new();
        extra_conf.insert("device_class".into(), json!("problem"));
        let dryness = BinarySensor::new(
            self.mqtt.clone(),
            &format!("{} Dry", sensor.name),
            &format!("{}_dry", sensor.object_id),
            ha.node_id.as_deref(),
            &ha.discovery_prefix,
            &extra_conf,
        )
        .await?;

        Ok((moisture, dryness))
    }

    async fn publish_loop(
        &self,
        moisture: &Sensor<MqttClient>,
        dryness: &BinarySensor<MqttClient>,
    ) -> Result<(), Error> {
        let mut probe = MoistureProbe::new();
        loop {
            let reading = probe.read();
            log::debug!("Publishing moisture reading {}%", reading);
            moisture.publish_state(&reading.to_string()).await?;
            if probe.is_dry(reading) {
                dryness.on().await?;
            } else {
                dryness.off().await?;
            }

            time::sleep(Duration::from_secs(self.settings.publish_interval as u64)).await;
        }
    }
}

async fn handle_signals() -> Result<(), Error> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => log::debug!("Received SIGINT signal"),
        _ = sigterm.recv() => log::debug!("Received SIGTERM signal"),
    };
    Ok(())
}
