//! sensorsim - synthetic sensor telemetry publisher
//!
//! Generates synthetic temperature/humidity/CO2 readings and publishes them
//! to a ThingSpeak MQTT channel on a fixed interval. The crate is split
//! into:
//!
//! - [`sensor`]: reading generation and the ThingSpeak wire encoding
//! - [`transport`]: the broker session, its state machine and the
//!   lifecycle-event plumbing around rumqttc
//! - [`publisher`]: the publish loop that ties the two together, with
//!   cancellable sleeps and guaranteed disconnect on shutdown
//! - [`config`]: TOML settings plus environment-resolved credentials
//!
//! # Quick start
//!
//! ```no_run
//! use sensorsim::config::SimulatorConfig;
//! use sensorsim::publisher::Publisher;
//! use sensorsim::transport::mqtt::MqttClient;
//! use tokio::sync::watch;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SimulatorConfig::load(None)?;
//! let credentials = config.resolve_credentials()?;
//! let transport = MqttClient::new(&credentials);
//!
//! let (shutdown_tx, shutdown_rx) = watch::channel(false);
//! let publisher = Publisher::new(
//!     transport,
//!     config.publish_interval(),
//!     config.poll_backoff(),
//!     shutdown_rx,
//! );
//! publisher.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod observability;
pub mod publisher;
pub mod sensor;
pub mod testing;
pub mod transport;

pub use config::{ConfigError, Credentials, SimulatorConfig};
pub use error::{SimulatorError, SimulatorResult};
pub use publisher::Publisher;
pub use sensor::{encode, ReadingGenerator, SensorReading};
pub use transport::mqtt::{ConnectionState, MqttClient};
pub use transport::Transport;
