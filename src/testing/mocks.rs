//! Mock transport for driving the publish loop without a broker
//!
//! The mock records every connect/disconnect/publish call and exposes the
//! connection state through the same watch-channel mechanism as the real
//! client, so tests can play the role of the broker's lifecycle callbacks.

use crate::transport::mqtt::ConnectionState;
use crate::transport::Transport;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error)]
pub enum MockError {
    #[error("mock connect failure")]
    ConnectFailed,
    #[error("mock publish rejected")]
    PublishRejected,
    #[error("publish called while {0:?}")]
    NotConnected(ConnectionState),
}

#[derive(Debug)]
struct MockInner {
    published: Mutex<Vec<String>>,
    publish_attempts: AtomicUsize,
    connect_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
    publish_should_fail: AtomicBool,
    state_tx: watch::Sender<ConnectionState>,
    state_rx: watch::Receiver<ConnectionState>,
}

/// Mock transport handed to a [`crate::publisher::Publisher`] under test
#[derive(Debug)]
pub struct MockTransport {
    inner: Arc<MockInner>,
    connect_should_fail: bool,
}

/// Observer/controller half of a [`MockTransport`], kept by the test after
/// the transport moves into the publisher
#[derive(Debug, Clone)]
pub struct MockHandle {
    inner: Arc<MockInner>,
}

impl MockTransport {
    pub fn new() -> Self {
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        Self {
            inner: Arc::new(MockInner {
                published: Mutex::new(Vec::new()),
                publish_attempts: AtomicUsize::new(0),
                connect_calls: AtomicUsize::new(0),
                disconnect_calls: AtomicUsize::new(0),
                publish_should_fail: AtomicBool::new(false),
                state_tx,
                state_rx,
            }),
            connect_should_fail: false,
        }
    }

    /// A transport whose initial connect() fails
    pub fn failing_connect() -> Self {
        Self {
            connect_should_fail: true,
            ..Self::new()
        }
    }

    pub fn handle(&self) -> MockHandle {
        MockHandle {
            inner: self.inner.clone(),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHandle {
    /// Simulate the broker's on-connect callback with code 0
    pub fn set_connected(&self) {
        let _ = self.inner.state_tx.send(ConnectionState::Connected);
    }

    /// Simulate an arbitrary lifecycle transition
    pub fn set_state(&self, state: ConnectionState) {
        let _ = self.inner.state_tx.send(state);
    }

    /// Make subsequent publish submissions return an error
    pub fn fail_publishes(&self, fail: bool) {
        self.inner.publish_should_fail.store(fail, Ordering::SeqCst);
    }

    /// Number of times publish() was invoked, successful or not
    pub fn publish_attempts(&self) -> usize {
        self.inner.publish_attempts.load(Ordering::SeqCst)
    }

    pub fn connect_calls(&self) -> usize {
        self.inner.connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.inner.disconnect_calls.load(Ordering::SeqCst)
    }

    /// Payloads that reached the mock broker
    pub fn published(&self) -> Vec<String> {
        self.inner
            .published
            .lock()
            .expect("mock payload lock poisoned")
            .clone()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    type Error = MockError;

    async fn connect(&mut self) -> Result<(), Self::Error> {
        self.inner.connect_calls.fetch_add(1, Ordering::SeqCst);
        if self.connect_should_fail {
            return Err(MockError::ConnectFailed);
        }
        let _ = self.inner.state_tx.send(ConnectionState::Connecting);
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), Self::Error> {
        self.inner.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.inner.state_tx.send(ConnectionState::Disconnected);
        Ok(())
    }

    async fn publish(&self, payload: &str) -> Result<(), Self::Error> {
        self.inner.publish_attempts.fetch_add(1, Ordering::SeqCst);

        let state = *self.inner.state_rx.borrow();
        if state != ConnectionState::Connected {
            return Err(MockError::NotConnected(state));
        }
        if self.inner.publish_should_fail.load(Ordering::SeqCst) {
            return Err(MockError::PublishRejected);
        }

        self.inner
            .published
            .lock()
            .expect("mock payload lock poisoned")
            .push(payload.to_string());
        Ok(())
    }

    fn connection_state(&self) -> ConnectionState {
        *self.inner.state_rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_and_payloads() {
        let mut transport = MockTransport::new();
        let handle = transport.handle();

        transport.connect().await.unwrap();
        handle.set_connected();
        transport.publish("field1=1&field2=2&field3=3").await.unwrap();
        transport.disconnect().await.unwrap();

        assert_eq!(handle.connect_calls(), 1);
        assert_eq!(handle.disconnect_calls(), 1);
        assert_eq!(handle.publish_attempts(), 1);
        assert_eq!(handle.published(), vec!["field1=1&field2=2&field3=3"]);
    }

    #[tokio::test]
    async fn publish_without_connected_state_errors() {
        let transport = MockTransport::new();
        let err = transport.publish("payload").await.unwrap_err();
        assert!(matches!(err, MockError::NotConnected(_)));
        assert!(transport.handle().published().is_empty());
    }

    #[tokio::test]
    async fn scripted_publish_failure() {
        let mut transport = MockTransport::new();
        let handle = transport.handle();
        transport.connect().await.unwrap();
        handle.set_connected();
        handle.fail_publishes(true);

        let err = transport.publish("payload").await.unwrap_err();
        assert!(matches!(err, MockError::PublishRejected));
        assert_eq!(handle.publish_attempts(), 1);
        assert!(handle.published().is_empty());
    }
}
