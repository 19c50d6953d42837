use paho_mqtt as mqtt;

/// Errors are split so the supervisory loop can tell failures apart: only
/// transport failures are recovered by restarting, everything else is fatal.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("MQTT transport error: {0}")]
    Transport(#[from] mqtt::Error),

    #[error("invalid entity configuration: {0}")]
    Config(String),

    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
