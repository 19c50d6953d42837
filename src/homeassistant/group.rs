use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::{
    error::Error,
    mqtt::{MqttMessage, MqttPublish},
};

use super::entity::{merge, Component, DiscoveryConfig, Entity};

/// Registers several entities that share one state topic; each member picks
/// its field out of the shared JSON payload with its `value_template`.
#[allow(dead_code)]
pub struct EntityGroup<P> {
    mqtt: Arc<P>,
    node_id: String,
    discovery_prefix: String,
    extra_conf: DiscoveryConfig,
    state_topic: String,
    entities: Vec<Entity<P>>,
}

#[allow(dead_code)]
impl<P: MqttPublish> EntityGroup<P> {
    pub fn new(
        mqtt: Arc<P>,
        node_id: &str,
        discovery_prefix: &str,
        mut extra_conf: DiscoveryConfig,
    ) -> Result<Self, Error> {
        // A caller-provided state topic is reused, otherwise one is
        // synthesized and injected so every member merge picks it up.
        let state_topic = match extra_conf.get("state_topic") {
            Some(Value::String(topic)) => topic.clone(),
            Some(_) => {
                return Err(Error::Config("group state_topic must be a string".into()));
            }
            None => {
                let topic = format!("{}/sensor/{}/state", discovery_prefix, node_id);
                extra_conf.insert("state_topic".into(), Value::String(topic.clone()));
                topic
            }
        };

        Ok(EntityGroup {
            mqtt,
            node_id: node_id.into(),
            discovery_prefix: discovery_prefix.into(),
            extra_conf,
            state_topic,
            entities: Vec::new(),
        })
    }

    pub async fn create_sensor(
        &mut self,
        name: &str,
        object_id: &str,
        extra_conf: &DiscoveryConfig,
    ) -> Result<(), Error> {
        self.create_entity(name, Component::Sensor, object_id, extra_conf)
            .await
    }

    pub async fn create_binary_sensor(
        &mut self,
        name: &str,
        object_id: &str,
        extra_conf: &DiscoveryConfig,
    ) -> Result<(), Error> {
        self.create_entity(name, Component::BinarySensor, object_id, extra_conf)
            .await
    }

    async fn create_entity(
        &mut self,
        name: &str,
        component: Component,
        object_id: &str,
        extra_conf: &DiscoveryConfig,
    ) -> Result<(), Error> {
        let conf = self.member_conf(extra_conf)?;
        let entity = Entity::new(
            self.mqtt.clone(),
            name,
            component,
            object_id,
            Some(&self.node_id),
            &self.discovery_prefix,
            &conf,
        )
        .await?;
        self.entities.push(entity);
        Ok(())
    }

    // Members read their state out of the shared JSON payload, so a
    // value_template is required and the state topic belongs to the group.
    fn member_conf(&self, extra_conf: &DiscoveryConfig) -> Result<DiscoveryConfig, Error> {
        if !extra_conf.contains_key("value_template") {
            return Err(Error::Config(
                "grouped entities need value_template to be set".into(),
            ));
        }
        if extra_conf.contains_key("state_topic") {
            return Err(Error::Config(
                "state_topic of a grouped entity is managed by the group".into(),
            ));
        }
        let mut conf = extra_conf.clone();
        merge(&mut conf, &self.extra_conf);
        Ok(conf)
    }

    /// Publishes one JSON payload that fans out to all members.
    pub async fn publish_state<T: Serialize>(&self, state: &T) -> Result<(), Error> {
        let payload = serde_json::to_string(state)?;
        self.mqtt
            .publish(MqttMessage::new(self.state_topic.clone(), payload, false, 0))
            .await
    }

    /// Unpublishes every member, in creation order.
    pub async fn unpublish(&self) -> Result<(), Error> {
        for entity in &self.entities {
            entity.unpublish().await?;
        }
        Ok(())
    }

    pub fn state_topic(&self) -> &str {
        &self.state_topic
    }

    pub fn extra_conf(&self) -> &DiscoveryConfig {
        &self.extra_conf
    }
}
