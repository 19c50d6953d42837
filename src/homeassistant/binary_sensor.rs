use std::sync::Arc;

use crate::{
    constants::{PAYLOAD_OFF, PAYLOAD_ON},
    error::Error,
    mqtt::MqttPublish,
};

use super::entity::{Component, DiscoveryConfig, Entity};

pub struct BinarySensor<P> {
    entity: Entity<P>,
}

impl<P: MqttPublish> BinarySensor<P> {
    pub async fn new(
        mqtt: Arc<P>,
        name: &str,
        object_id: &str,
        node_id: Option<&str>,
        discovery_prefix: &str,
        extra_conf: &DiscoveryConfig,
    ) -> Result<Self, Error> {
        let entity = Entity::new(
            mqtt,
            name,
            Component::BinarySensor,
            object_id,
            node_id,
            discovery_prefix,
            extra_conf,
        )
        .await?;
        Ok(BinarySensor { entity })
    }

    pub async fn publish_state(&self, state: bool) -> Result<(), Error> {
        let payload = if state { PAYLOAD_ON } else { PAYLOAD_OFF };
        self.entity.publish_state(payload).await
    }

    pub async fn on(&self) -> Result<(), Error> {
        self.publish_state(true).await
    }

    pub async fn off(&self) -> Result<(), Error> {
        self.publish_state(false).await
    }

    pub async fn unpublish(&self) -> Result<(), Error> {
        self.entity.unpublish().await
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::mqtt::testing::MessageLog;

    use super::{BinarySensor, DiscoveryConfig};

    async fn binary_sensor(mqtt: Arc<MessageLog>) -> BinarySensor<MessageLog> {
        BinarySensor::new(
            mqtt,
            "dry_sensor",
            "sensorid",
            None,
            "homeassistant",
            &DiscoveryConfig::new(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_component_topics() {
        let mqtt = Arc::new(MessageLog::new());
        binary_sensor(mqtt.clone()).await;

        assert_eq!(
            mqtt.messages()[0].topic,
            "homeassistant/binary_sensor/sensorid/config"
        );
    }

    #[tokio::test]
    async fn test_state_encoding() {
        let mqtt = Arc::new(MessageLog::new());
        let sensor = binary_sensor(mqtt.clone()).await;

        sensor.publish_state(true).await.unwrap();
        sensor.publish_state(false).await.unwrap();

        let messages = mqtt.messages();
        assert_eq!(messages[1].payload, "ON");
        assert_eq!(messages[2].payload, "OFF");
        assert_eq!(
            messages[1].topic,
            "homeassistant/binary_sensor/sensorid/state"
        );
    }

    #[tokio::test]
    async fn test_on_off() {
        let mqtt = Arc::new(MessageLog::new());
        let sensor = binary_sensor(mqtt.clone()).await;

        sensor.on().await.unwrap();
        sensor.off().await.unwrap();

        let messages = mqtt.messages();
        assert_eq!(messages[1].payload, "ON");
        assert_eq!(messages[2].payload, "OFF");
    }
}
