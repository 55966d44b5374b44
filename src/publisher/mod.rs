//! The publish loop
//!
//! Drives the whole process: one connect() at startup, then an endless
//! cycle of wait-for-connected, generate, encode, publish, sleep. Every
//! sleep is cancellable through the shutdown channel, and disconnect()
//! runs unconditionally on the way out, whatever ended the loop.

use crate::error::{SimulatorError, SimulatorResult};
use crate::sensor::{encode, ReadingGenerator};
use crate::transport::Transport;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Periodic telemetry publisher over an abstract transport
pub struct Publisher<T: Transport> {
    transport: T,
    generator: ReadingGenerator,
    interval: Duration,
    poll_backoff: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl<T: Transport> Publisher<T> {
    pub fn new(
        transport: T,
        interval: Duration,
        poll_backoff: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            transport,
            generator: ReadingGenerator::new(),
            interval,
            poll_backoff,
            shutdown_rx,
        }
    }

    /// Run until shutdown. The initial connect() is issued exactly once and
    /// a failure there is fatal; after that the loop never aborts on
    /// transient publish errors. disconnect() always runs before returning.
    pub async fn run(mut self) -> SimulatorResult<()> {
        self.transport
            .connect()
            .await
            .map_err(SimulatorError::connection_setup)?;

        let outcome = self.drive().await;
        if let Err(e) = &outcome {
            error!(error = %e, "publish loop failed, shutting down");
        }

        // Cleanup runs on every exit path
        match self.transport.disconnect().await {
            Ok(()) => info!("disconnected from broker"),
            Err(e) => warn!(error = %e, "disconnect failed during shutdown"),
        }

        outcome
    }

    async fn drive(&mut self) -> SimulatorResult<()> {
        loop {
            if self.shutdown_requested() {
                info!("shutdown requested, stopping publish loop");
                return Ok(());
            }

            // Publishing while not connected is skipped, never queued.
            // connect() was issued once; any transparent re-dial belongs to
            // the transport, so this loop only polls the state snapshot.
            if !self.transport.is_connected() {
                info!(state = ?self.transport.connection_state(), "waiting for broker connection");
                if !self.sleep(self.poll_backoff).await {
                    return Ok(());
                }
                continue;
            }

            let reading = self.generator.generate();
            let payload = encode(&reading);
            match self.transport.publish(&payload).await {
                Ok(()) => info!(
                    temperature = reading.temperature,
                    humidity = reading.humidity,
                    co2 = reading.co2,
                    "published sensor reading"
                ),
                // Transient: drop the reading and try again next tick
                Err(e) => warn!(error = %e, "publish failed, retrying next interval"),
            }

            if !self.sleep(self.interval).await {
                return Ok(());
            }
        }
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    /// Cancellable sleep; returns false when shutdown arrived mid-sleep
    async fn sleep(&mut self, duration: Duration) -> bool {
        tokio::select! {
            _ = self.shutdown_rx.changed() => {
                if *self.shutdown_rx.borrow() {
                    info!("shutdown requested, waking from sleep");
                    false
                } else {
                    true
                }
            }
            _ = tokio::time::sleep(duration) => true,
        }
    }
}
