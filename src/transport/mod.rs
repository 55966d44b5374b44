//! Transport layer for telemetry publishing
//!
//! The [`Transport`] trait abstracts the broker connection so the publish
//! loop can be driven against a mock in tests. The only production
//! implementation is the MQTT client in [`mqtt`].

use crate::transport::mqtt::ConnectionState;

pub mod mqtt;

/// Broker transport abstraction
///
/// Implementors own the broker session. `connection_state` is a cheap,
/// thread-safe snapshot updated only from broker lifecycle events; callers
/// never mutate it.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issue a single connection attempt to the broker
    async fn connect(&mut self) -> Result<(), Self::Error>;

    /// Tear down the broker session; idempotent
    async fn disconnect(&mut self) -> Result<(), Self::Error>;

    /// Submit a payload to the configured topic. Valid only while connected;
    /// delivery acknowledgment arrives asynchronously and is not guaranteed
    /// to have happened when this returns.
    async fn publish(&self, payload: &str) -> Result<(), Self::Error>;

    /// Snapshot of the current connection state
    fn connection_state(&self) -> ConnectionState;

    fn is_connected(&self) -> bool {
        self.connection_state() == ConnectionState::Connected
    }
}

/// Type alias for the MQTT transport
pub type MqttTransport = mqtt::MqttClient;
