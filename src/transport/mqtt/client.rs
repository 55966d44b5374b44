//! Impure I/O around the rumqttc client
//!
//! [`MqttClient`] owns the broker session. `connect()` spawns a background
//! task that drives the rumqttc event loop and is the only writer of the
//! shared [`ConnectionState`]; the publish loop observes the state through
//! a watch receiver and never mutates it.

use super::connection::{configure_mqtt_options, publish_topic, ConnectionState, MqttError};
use super::events::{can_publish, next_state, route_error, route_event, LifecycleEvent};
use crate::config::Credentials;
use crate::transport::Transport;
use rumqttc::{AsyncClient, ConnectReturnCode, EventLoop, QoS};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Pause between event-loop polls after a network error. rumqttc re-dials
/// on the next poll; the pause keeps a dead broker from spinning the task.
const POLL_ERROR_PAUSE: Duration = Duration::from_secs(1);

/// MQTT transport client for ThingSpeak channel updates
pub struct MqttClient {
    client: AsyncClient,
    // Mutex only to make the struct `Sync`; the event loop is taken once
    // under `&mut self` in `connect()` and never locked concurrently.
    event_loop: Mutex<Option<EventLoop>>,
    topic: String,
    state_tx: watch::Sender<ConnectionState>,
    state_rx: watch::Receiver<ConnectionState>,
    shutdown_tx: Option<watch::Sender<bool>>,
    event_task: Option<JoinHandle<()>>,
}

impl MqttClient {
    /// Build a client from resolved credentials. No network activity happens
    /// until `connect()` is called.
    pub fn new(credentials: &Credentials) -> Self {
        let options = configure_mqtt_options(credentials);
        let (client, event_loop) = AsyncClient::new(options, 10);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);

        MqttClient {
            client,
            event_loop: Mutex::new(Some(event_loop)),
            topic: publish_topic(&credentials.channel_id),
            state_tx,
            state_rx,
            shutdown_tx: None,
            event_task: None,
        }
    }

    /// Issue the single connection attempt: move to `Connecting` and spawn
    /// the event-loop task. The transition to `Connected` (or back to
    /// `Disconnected`) happens asynchronously when the broker answers.
    pub fn connect(&mut self) -> Result<(), MqttError> {
        let mut event_loop = self
            .event_loop
            .get_mut()
            .expect("event loop mutex poisoned")
            .take()
            .ok_or(MqttError::AlreadyConnected)?;

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        self.shutdown_tx = Some(shutdown_tx);

        let state_tx = self.state_tx.clone();
        let _ = state_tx.send(ConnectionState::Connecting);
        info!(topic = %self.topic, "connecting to MQTT broker");

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            info!("shutdown signal received, stopping MQTT event loop");
                            break;
                        }
                    }
                    polled = event_loop.poll() => {
                        match polled {
                            Ok(event) => {
                                if let Some(lifecycle) = route_event(&event) {
                                    apply_lifecycle_event(&state_tx, &lifecycle);
                                }
                            }
                            Err(err) => {
                                let lifecycle = route_error(&err);
                                apply_lifecycle_event(&state_tx, &lifecycle);
                                if !interruptible_sleep(shutdown_rx.clone(), POLL_ERROR_PAUSE).await {
                                    break;
                                }
                            }
                        }
                    }
                }
            }
            info!("MQTT event loop stopped");
        });

        self.event_task = Some(handle);
        Ok(())
    }

    /// Tear down the session: stop the event task, tell the broker goodbye
    /// and force the state to `Disconnected`. Safe to call more than once.
    pub async fn disconnect(&mut self) -> Result<(), MqttError> {
        if let Some(shutdown_tx) = &self.shutdown_tx {
            let _ = shutdown_tx.send(true);
        }

        // Best effort; the broker may already be gone
        let _ = self.client.disconnect().await;
        let _ = self.state_tx.send(ConnectionState::Disconnected);

        if let Some(handle) = self.event_task.take() {
            match tokio::time::timeout(Duration::from_secs(2), handle).await {
                Ok(Ok(())) => info!("MQTT event loop task shut down cleanly"),
                Ok(Err(e)) if !e.is_cancelled() => {
                    warn!(error = %e, "MQTT event loop task ended with error")
                }
                Err(_) => {
                    // The shutdown signal already told the task to exit;
                    // dropping the JoinHandle detaches it.
                    warn!("MQTT event loop task did not stop in time, detaching");
                }
                _ => {}
            }
        }

        info!("MQTT client disconnected");
        Ok(())
    }

    /// Submit a payload to the channel topic at QoS 1. Rejected without
    /// touching the wire unless the current snapshot is `Connected`; the
    /// PubAck arrives later via the event task.
    pub async fn publish(&self, payload: &str) -> Result<(), MqttError> {
        let state = *self.state_rx.borrow();
        if !can_publish(state) {
            return Err(MqttError::NotConnected { state });
        }

        self.client
            .publish(&self.topic, QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|e| MqttError::PublishFailed(Box::new(e)))
    }

    /// Snapshot of the current connection state
    pub fn connection_state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Receiver half of the state channel, for callers that want to await
    /// transitions instead of polling
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }
}

/// Log a lifecycle event and advance the shared state accordingly.
/// Runs only on the event-loop task, which keeps transitions totally ordered.
fn apply_lifecycle_event(state_tx: &watch::Sender<ConnectionState>, event: &LifecycleEvent) {
    let current = *state_tx.borrow();
    match event {
        LifecycleEvent::ConnAck {
            code: ConnectReturnCode::Success,
        } => info!("connected to MQTT broker"),
        LifecycleEvent::ConnAck { code } => {
            // The specific code is broker-defined; log it and nothing more
            warn!(code = ?code, "broker refused connection")
        }
        LifecycleEvent::Disconnected => warn!("broker closed the connection"),
        LifecycleEvent::ConnectionLost { reason } => {
            error!(%reason, "connection to MQTT broker lost")
        }
        LifecycleEvent::PublishAck { pkid } => {
            info!(pkid, "broker acknowledged publish")
        }
    }
    let _ = state_tx.send(next_state(current, event));
}

/// Sleep that wakes early on the shutdown signal.
/// Returns false when shutdown was requested.
async fn interruptible_sleep(mut shutdown_rx: watch::Receiver<bool>, duration: Duration) -> bool {
    tokio::select! {
        _ = shutdown_rx.changed() => !*shutdown_rx.borrow(),
        _ = tokio::time::sleep(duration) => true,
    }
}

#[async_trait::async_trait]
impl Transport for MqttClient {
    type Error = MqttError;

    async fn connect(&mut self) -> Result<(), Self::Error> {
        MqttClient::connect(self)
    }

    async fn disconnect(&mut self) -> Result<(), Self::Error> {
        MqttClient::disconnect(self).await
    }

    async fn publish(&self, payload: &str) -> Result<(), Self::Error> {
        MqttClient::publish(self, payload).await
    }

    fn connection_state(&self) -> ConnectionState {
        MqttClient::connection_state(self)
    }
}

impl Drop for MqttClient {
    fn drop(&mut self) {
        if let Some(shutdown_tx) = &self.shutdown_tx {
            let _ = shutdown_tx.send(true);
        }
        if let Some(handle) = self.event_task.take() {
            handle.abort();
        }
        // disconnect() is async and cannot run here; callers shut down
        // gracefully through the publish loop's cleanup path.
    }
}
