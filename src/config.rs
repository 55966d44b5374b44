//! Configuration for the sensor simulator
//!
//! Settings come from an optional TOML file with sensible defaults; secrets
//! are never stored in the file itself. Instead the `[mqtt]` section names
//! the environment variables that hold the channel id, client id, username
//! and password, and `resolve_credentials` reads them once at startup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// ThingSpeak public MQTT broker, used when the config file omits a host.
pub const DEFAULT_BROKER_HOST: &str = "mqtt3.thingspeak.com";
pub const DEFAULT_BROKER_PORT: u16 = 1883;

/// Top-level simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub mqtt: MqttSection,
    #[serde(default)]
    pub publish: PublishSection,
}

/// MQTT section: broker endpoint plus the names of the environment
/// variables carrying credentials
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MqttSection {
    #[serde(default = "default_broker_host")]
    pub broker_host: String,
    #[serde(default = "default_broker_port")]
    pub broker_port: u16,
    /// Environment variable containing the ThingSpeak channel id
    #[serde(default = "default_channel_id_env")]
    pub channel_id_env: String,
    /// Environment variable containing the MQTT client id
    #[serde(default = "default_client_id_env")]
    pub client_id_env: String,
    /// Environment variable containing the username
    #[serde(default = "default_username_env")]
    pub username_env: String,
    /// Environment variable containing the password
    #[serde(default = "default_password_env")]
    pub password_env: String,
}

impl Default for MqttSection {
    fn default() -> Self {
        Self {
            broker_host: default_broker_host(),
            broker_port: default_broker_port(),
            channel_id_env: default_channel_id_env(),
            client_id_env: default_client_id_env(),
            username_env: default_username_env(),
            password_env: default_password_env(),
        }
    }
}

/// Publish cadence settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublishSection {
    /// Seconds between published readings (default: 900 = 15 minutes)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Seconds to wait between connectivity checks while disconnected
    #[serde(default = "default_poll_backoff_secs")]
    pub poll_backoff_secs: u64,
}

impl Default for PublishSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            poll_backoff_secs: default_poll_backoff_secs(),
        }
    }
}

fn default_broker_host() -> String {
    DEFAULT_BROKER_HOST.to_string()
}

fn default_broker_port() -> u16 {
    DEFAULT_BROKER_PORT
}

fn default_channel_id_env() -> String {
    "CHANNEL_ID".to_string()
}

fn default_client_id_env() -> String {
    "MQTT_CLIENT_ID".to_string()
}

fn default_username_env() -> String {
    "MQTT_USERNAME".to_string()
}

fn default_password_env() -> String {
    "MQTT_PASSWORD".to_string()
}

fn default_interval_secs() -> u64 {
    900 // 15 minutes
}

fn default_poll_backoff_secs() -> u64 {
    1
}

/// Fully resolved broker credentials, immutable for the process lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub broker_host: String,
    pub broker_port: u16,
    pub channel_id: String,
    pub client_id: String,
    pub username: String,
    pub password: String,
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("missing credential: environment variable {0} is not set or empty")]
    MissingCredential(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SimulatorConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: SimulatorConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the given path, from a default location, or
    /// fall back to built-in defaults when no file exists
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        for candidate in ["sensorsim.toml", "config/sensorsim.toml"] {
            let candidate = Path::new(candidate);
            if candidate.exists() {
                return Self::load_from_file(candidate);
            }
        }

        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants that do not depend on the environment
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mqtt.broker_host.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "mqtt.broker_host must not be empty".to_string(),
            ));
        }
        if self.publish.interval_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "publish.interval_secs must be strictly positive".to_string(),
            ));
        }
        if self.publish.poll_backoff_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "publish.poll_backoff_secs must be strictly positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve credentials from the environment. Any missing or empty
    /// variable is a fatal error, checked before any network activity.
    pub fn resolve_credentials(&self) -> Result<Credentials, ConfigError> {
        Ok(Credentials {
            broker_host: self.mqtt.broker_host.clone(),
            broker_port: self.mqtt.broker_port,
            channel_id: require_env(&self.mqtt.channel_id_env)?,
            client_id: require_env(&self.mqtt.client_id_env)?,
            username: require_env(&self.mqtt.username_env)?,
            password: require_env(&self.mqtt.password_env)?,
        })
    }

    /// Interval between published readings
    pub fn publish_interval(&self) -> Duration {
        Duration::from_secs(self.publish.interval_secs)
    }

    /// Wait between connectivity re-checks while disconnected
    pub fn poll_backoff(&self) -> Duration {
        Duration::from_secs(self.publish.poll_backoff_secs)
    }
}

/// Read an environment variable, treating absent and empty values alike
fn require_env(name: &str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingCredential(name.to_string())),
    }
}
