mod error;
mod websocket;

pub use websocket::WebSocketTransport;

use serde::{Deserialize, Serialize};

use crate::aircraft::AircraftUpdate;

/// Outbound commands. Fire-and-forget: nothing acknowledges them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, strum_macros::Display)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransportCommand {
    StartTracking { registration: String },
    StopTracking { registration: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Connected,
    Disconnected,
    ConnectError(String),
    Update(Box<AircraftUpdate>),
}

/// A persistent link to the tracking backend.
///
/// Implementations reconnect on their own and buffer commands emitted while
/// disconnected, flushing them once the link is up.
pub trait Transport {
    fn is_connected(&self) -> bool;
    fn connect(&mut self);
    fn emit(&mut self, command: TransportCommand);
}

/// Subscription commands on top of a [`Transport`].
pub struct TransportAdapter<T> {
    transport: T,
}

impl<T: Transport> TransportAdapter<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub fn subscribe(&mut self, registration: &str) {
        if !self.transport.is_connected() {
            log::info!("Transport not connected, reconnecting before subscribing");
            self.transport.connect();
        }
        log::info!("Starting tracking for {}", registration);
        self.transport.emit(TransportCommand::StartTracking {
            registration: registration.to_string(),
        });
    }

    pub fn unsubscribe(&mut self, registration: &str) {
        if !self.transport.is_connected() {
            log::debug!("No connection, skipping stop for {}", registration);
            return;
        }
        log::info!("Stopping tracking for {}", registration);
        self.transport.emit(TransportCommand::StopTracking {
            registration: registration.to_string(),
        });
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[cfg(test)]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
