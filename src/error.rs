//! Error taxonomy for the simulator
//!
//! Errors are classified at the publish-loop boundary: configuration and
//! connection-setup failures are fatal and terminate the process, while
//! publish failures are transient and only skip the current reading.

use thiserror::Error;

/// Top-level error type for simulator operations
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("broker connection setup failed: {0}")]
    ConnectionSetup(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SimulatorError {
    /// Wrap an error from the initial connect path
    pub fn connection_setup<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConnectionSetup(Box::new(error))
    }

    /// Wrap a transport error encountered after startup
    pub fn transport<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport(Box::new(error))
    }

    /// Whether this error class should terminate the process.
    /// Transport errors after startup are recovered by the publish loop.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Config(_) | Self::ConnectionSetup(_) => true,
            Self::Transport(_) => false,
        }
    }
}

/// Result type for simulator operations
pub type SimulatorResult<T> = Result<T, SimulatorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn config_errors_are_fatal() {
        let err = SimulatorError::from(ConfigError::MissingCredential("MQTT_USERNAME".into()));
        assert!(err.is_fatal());
    }

    #[test]
    fn connection_setup_errors_are_fatal() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(SimulatorError::connection_setup(io).is_fatal());
    }

    #[test]
    fn transport_errors_are_recoverable() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe");
        assert!(!SimulatorError::transport(io).is_fatal());
    }

    #[test]
    fn display_includes_source_message() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = SimulatorError::connection_setup(io);
        assert!(err.to_string().contains("connection setup failed"));
    }
}
