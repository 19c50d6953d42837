use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{
    constants::{CONFIG_TOPIC_SUFFIX, STATE_TOPIC_SUFFIX},
    error::Error,
    mqtt::{MqttMessage, MqttPublish},
};

/// Discovery configuration of a single entity. Keys serialize in a stable
/// order, so identical inputs produce byte-identical payloads.
pub type DiscoveryConfig = Map<String, Value>;

/// Merges `overlay` into `base`; overlay keys win on conflict.
pub fn merge(base: &mut DiscoveryConfig, overlay: &DiscoveryConfig) {
    for (key, value) in overlay {
        base.insert(key.clone(), value.clone());
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Component {
    Sensor,
    BinarySensor,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Sensor => "sensor",
            Component::BinarySensor => "binary_sensor",
        }
    }
}

// The node segment is left out entirely when there is no node id.
fn build_topic(
    discovery_prefix: &str,
    component: Component,
    node_id: Option<&str>,
    object_id: &str,
    suffix: &str,
) -> String {
    match node_id {
        Some(node_id) => format!(
            "{}/{}/{}/{}/{}",
            discovery_prefix,
            component.as_str(),
            node_id,
            object_id,
            suffix
        ),
        None => format!(
            "{}/{}/{}/{}",
            discovery_prefix,
            component.as_str(),
            object_id,
            suffix
        ),
    }
}

pub struct Entity<P> {
    mqtt: Arc<P>,
    config_topic: String,
    state_topic: String,
}

impl<P: MqttPublish> Entity<P> {
    /// Registers the entity with the hub: builds its topics and publishes the
    /// retained discovery configuration before any state is published.
    pub async fn new(
        mqtt: Arc<P>,
        name: &str,
        component: Component,
        object_id: &str,
        node_id: Option<&str>,
        discovery_prefix: &str,
        extra_conf: &DiscoveryConfig,
    ) -> Result<Self, Error> {
        let config_topic = build_topic(
            discovery_prefix,
            component,
            node_id,
            object_id,
            CONFIG_TOPIC_SUFFIX,
        );
        let state_topic = build_topic(
            discovery_prefix,
            component,
            node_id,
            object_id,
            STATE_TOPIC_SUFFIX,
        );

        let mut config = DiscoveryConfig::new();
        config.insert("name".into(), Value::String(name.into()));
        config.insert("state_topic".into(), Value::String(state_topic.clone()));
        merge(&mut config, extra_conf);
        let payload = serde_json::to_string(&config)?;

        let entity = Entity {
            mqtt,
            config_topic,
            state_topic,
        };
        entity
            .mqtt
            .publish(MqttMessage::new(
                entity.config_topic.clone(),
                payload,
                true,
                1,
            ))
            .await?;
        Ok(entity)
    }

    /// Publishes an empty retained payload so the hub forgets the entity.
    pub async fn unpublish(&self) -> Result<(), Error> {
        self.mqtt
            .publish(MqttMessage::new(
                self.config_topic.clone(),
                String::new(),
                true,
                1,
            ))
            .await
    }

    pub async fn publish_state(&self, state: &str) -> Result<(), Error> {
        self.mqtt
            .publish(MqttMessage::new(
                self.state_topic.clone(),
                state.into(),
                false,
                0,
            ))
            .await
    }

    pub fn state_topic(&self) -> &str {
        &self.state_topic
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use crate::mqtt::testing::MessageLog;

    use super::{build_topic, merge, Component, DiscoveryConfig, Entity};

    #[test]
    fn test_topic_without_node() {
        let topic = build_topic("homeassistant", Component::Sensor, None, "sensorid", "config");
        assert_eq!(topic, "homeassistant/sensor/sensorid/config");
        assert!(!topic.contains("//"));
    }

    #[test]
    fn test_topic_with_node() {
        let topic = build_topic(
            "homeassistant",
            Component::BinarySensor,
            Some("node1"),
            "sensorid",
            "state",
        );
        assert_eq!(topic, "homeassistant/binary_sensor/node1/sensorid/state");
        assert_eq!(topic.matches("node1").count(), 1);
    }

    #[test]
    fn test_merge_overlay_wins() {
        let mut base = DiscoveryConfig::new();
        base.insert("name".into(), json!("base"));
        base.insert("icon".into(), json!("mdi:water"));

        let mut overlay = DiscoveryConfig::new();
        overlay.insert("name".into(), json!("overlay"));

        merge(&mut base, &overlay);
        assert_eq!(base.get("name"), Some(&json!("overlay")));
        assert_eq!(base.get("icon"), Some(&json!("mdi:water")));
    }

    #[tokio::test]
    async fn test_new_publishes_discovery() {
        let mqtt = Arc::new(MessageLog::new());
        let mut extra_conf = DiscoveryConfig::new();
        extra_conf.insert("unit_of_measurement".into(), json!("%"));

        let entity = Entity::new(
            mqtt.clone(),
            "moisture_sensor",
            Component::Sensor,
            "sensorid",
            None,
            "homeassistant",
            &extra_conf,
        )
        .await
        .unwrap();

        let messages = mqtt.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].topic, "homeassistant/sensor/sensorid/config");
        assert!(messages[0].retained);
        assert_eq!(messages[0].qos, 1);

        let config: Value = serde_json::from_str(&messages[0].payload).unwrap();
        assert_eq!(config["name"], json!("moisture_sensor"));
        assert_eq!(config["state_topic"], json!(entity.state_topic()));
        assert_eq!(config["unit_of_measurement"], json!("%"));
    }

    #[tokio::test]
    async fn test_discovery_payload_is_stable() {
        let mqtt = Arc::new(MessageLog::new());
        let mut extra_conf = DiscoveryConfig::new();
        extra_conf.insert("unit_of_measurement".into(), json!("%"));
        extra_conf.insert("device_class".into(), json!("moisture"));

        for _ in 0..2 {
            Entity::new(
                mqtt.clone(),
                "moisture_sensor",
                Component::Sensor,
                "sensorid",
                None,
                "homeassistant",
                &extra_conf,
            )
            .await
            .unwrap();
        }

        let messages = mqtt.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].payload, messages[1].payload);
    }

    #[tokio::test]
    async fn test_extra_conf_overrides_state_topic() {
        let mqtt = Arc::new(MessageLog::new());
        let mut extra_conf = DiscoveryConfig::new();
        extra_conf.insert("state_topic".into(), json!("homeassistant/sensor/node1/state"));

        let entity = Entity::new(
            mqtt.clone(),
            "grouped_sensor",
            Component::Sensor,
            "sensorid",
            Some("node1"),
            "homeassistant",
            &extra_conf,
        )
        .await
        .unwrap();

        let config: Value = serde_json::from_str(&mqtt.messages()[0].payload).unwrap();
        assert_eq!(config["state_topic"], json!("homeassistant/sensor/node1/state"));
        // The entity keeps its own per-entity state topic regardless
        assert_eq!(entity.state_topic(), "homeassistant/sensor/node1/sensorid/state");
    }

    #[tokio::test]
    async fn test_publish_state_is_verbatim() {
        let mqtt = Arc::new(MessageLog::new());
        let entity = Entity::new(
            mqtt.clone(),
            "moisture_sensor",
            Component::Sensor,
            "sensorid",
            None,
            "homeassistant",
            &DiscoveryConfig::new(),
        )
        .await
        .unwrap();

        entity.publish_state("42").await.unwrap();

        let messages = mqtt.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].topic, "homeassistant/sensor/sensorid/state");
        assert_eq!(messages[1].payload, "42");
        assert!(!messages[1].retained);
        assert_eq!(messages[1].qos, 0);
    }

    #[tokio::test]
    async fn test_unpublish() {
        let mqtt = Arc::new(MessageLog::new());
        let entity = Entity::new(
            mqtt.clone(),
            "moisture_sensor",
            Component::Sensor,
            "sensorid",
            None,
            "homeassistant",
            &DiscoveryConfig::new(),
        )
        .await
        .unwrap();

        entity.unpublish().await.unwrap();

        let messages = mqtt.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].topic, "homeassistant/sensor/sensorid/config");
        assert_eq!(messages[1].payload, "");
        assert!(messages[1].retained);
        assert_eq!(messages[1].qos, 1);
    }
}
