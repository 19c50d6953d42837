use std::sync::Arc;

use crate::{error::Error, mqtt::MqttPublish};

use super::entity::{Component, DiscoveryConfig, Entity};

pub struct Sensor<P> {
    entity: Entity<P>,
}

impl<P: MqttPublish> Sensor<P> {
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
            Component::Sensor,
            object_id,
            node_id,
            discovery_prefix,
            extra_conf,
        )
        .await?;
        Ok(Sensor { entity })
    }

    pub async fn publish_state(&self, state: &str) -> Result<(), Error> {
        self.entity.publish_state(state).await
    }

    pub async fn unpublish(&self) -> Result<(), Error> {
        self.entity.unpublish().await
    }

    pub fn state_topic(&self) -> &str {
        self.entity.state_topic()
    }
}
