//! MQTT implementation of the transport layer
//!
//! Split the way the rest of the crate is: `connection` and `events` hold
//! pure state and routing logic, `client` holds the impure I/O around
//! rumqttc.

pub mod client;
pub mod connection;
pub mod events;

pub use client::MqttClient;
pub use connection::{configure_mqtt_options, publish_topic, ConnectionState, MqttError};
pub use events::{can_publish, next_state, route_error, route_event, LifecycleEvent};
