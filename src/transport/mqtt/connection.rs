//! Pure connection state, options and topic construction for the MQTT client

use crate::config::Credentials;
use rumqttc::MqttOptions;
use std::time::Duration;
use thiserror::Error;

/// Connection state of the broker session
///
/// Exactly one state is active at a time. It is mutated only in response to
/// broker-reported lifecycle events (plus the explicit connect/disconnect
/// calls); the publish loop only ever reads a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Initial state, and terminal state of every shutdown path
    Disconnected,
    /// connect() issued, ConnAck not yet received
    Connecting,
    /// Broker acknowledged the connection; publishing is allowed
    Connected,
}

/// MQTT transport errors
#[derive(Debug, Error)]
pub enum MqttError {
    #[error("publishing failed")]
    PublishFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("not connected - current state: {state:?}")]
    NotConnected { state: ConnectionState },
    #[error("connect() was already issued for this client")]
    AlreadyConnected,
}

/// Build rumqttc options from resolved credentials.
/// Credentials are validated for completeness before this point.
pub fn configure_mqtt_options(credentials: &Credentials) -> MqttOptions {
    let mut options = MqttOptions::new(
        &credentials.client_id,
        &credentials.broker_host,
        credentials.broker_port,
    );
    options.set_credentials(&credentials.username, &credentials.password);
    options.set_keep_alive(Duration::from_secs(60));
    options
}

/// ThingSpeak channel update topic: `channels/{id}/publish`
pub fn publish_topic(channel_id: &str) -> String {
    format!("channels/{channel_id}/publish")
}
