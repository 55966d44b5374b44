//! Pure lifecycle-event routing for MQTT events
//!
//! rumqttc reports broker activity through its event loop. This module
//! reduces those events to the three lifecycle notifications the simulator
//! cares about (connect result, disconnect, publish acknowledgment) and
//! implements the state machine as pure, testable functions.

use super::connection::ConnectionState;
use rumqttc::{ConnectReturnCode, ConnectionError, Event, Packet};

/// Broker lifecycle notifications relevant to the publisher
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// CONNACK received; `code` is the broker's result code
    ConnAck { code: ConnectReturnCode },
    /// Broker-initiated disconnect
    Disconnected,
    /// Network or protocol failure reported by the event loop
    ConnectionLost { reason: String },
    /// Broker acknowledged delivery of packet `pkid`
    PublishAck { pkid: u16 },
}

/// Reduce a polled MQTT event to a lifecycle notification, if it is one
pub fn route_event(event: &Event) -> Option<LifecycleEvent> {
    match event {
        Event::Incoming(Packet::ConnAck(ack)) => {
            Some(LifecycleEvent::ConnAck { code: ack.code })
        }
        Event::Incoming(Packet::Disconnect) => Some(LifecycleEvent::Disconnected),
        Event::Incoming(Packet::PubAck(ack)) => {
            Some(LifecycleEvent::PublishAck { pkid: ack.pkid })
        }
        // Pings, outgoing packets and everything else carry no state
        _ => None,
    }
}

/// Reduce an event-loop poll error to a lifecycle notification
pub fn route_error(error: &ConnectionError) -> LifecycleEvent {
    LifecycleEvent::ConnectionLost {
        reason: error.to_string(),
    }
}

/// State machine: next connection state after a broker lifecycle event.
/// Transitions into `Connecting` happen only via connect(), never here.
pub fn next_state(current: ConnectionState, event: &LifecycleEvent) -> ConnectionState {
    match event {
        LifecycleEvent::ConnAck {
            code: ConnectReturnCode::Success,
        } => ConnectionState::Connected,
        LifecycleEvent::ConnAck { .. } => ConnectionState::Disconnected,
        LifecycleEvent::Disconnected | LifecycleEvent::ConnectionLost { .. } => {
            ConnectionState::Disconnected
        }
        LifecycleEvent::PublishAck { .. } => current,
    }
}

/// Whether the current state permits submitting a publish
pub fn can_publish(state: ConnectionState) -> bool {
    state == ConnectionState::Connected
}
