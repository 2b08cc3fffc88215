use std::sync::{Arc, Mutex as StdMutex};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use utoipa::ToSchema;

use super::controller::SessionController;
use super::types::{ControllerEvent, ControllerStatus, LookupTicket, UserCommand};
use super::TrackError;
use crate::lookup::{authenticated_lookup, LookupService};
use crate::render::{HeadlessMap, HeadlessPanel, MapState, PanelState};
use crate::transport::Transport;

pub type HeadlessController<T> = SessionController<T, HeadlessMap, HeadlessPanel>;

/// Published after every event for readers outside the event loop.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StatusSnapshot {
    pub tracking: ControllerStatus,
    pub map: MapState,
    pub panel: PanelState,
}

impl StatusSnapshot {
    pub fn capture<T: Transport>(controller: &HeadlessController<T>) -> Self {
        Self {
            tracking: controller.status(),
            map: controller.render().map().state().clone(),
            panel: controller.render().panel().state().clone(),
        }
    }
}

#[derive(Debug, Error)]
#[error("event loop has shut down")]
pub struct RunnerClosed;

/// Cloneable entry point into a running [`Runner`].
#[derive(Clone)]
pub struct RunnerHandle {
    events: mpsc::UnboundedSender<ControllerEvent>,
    status: Arc<StdMutex<StatusSnapshot>>,
}

impl RunnerHandle {
    /// Queues a user command. Fails once the event loop has shut down.
    pub fn send(&self, command: UserCommand) -> Result<(), RunnerClosed> {
        log::debug!("Queueing {}", command);
        self.events
            .send(ControllerEvent::User(command))
            .map_err(|_| RunnerClosed)
    }

    pub fn status(&self) -> StatusSnapshot {
        self.status
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// The single event loop: every state change happens inside [`Runner::run`].
pub struct Runner<T, L> {
    controller: HeadlessController<T>,
    lookup: Arc<L>,
    events_tx: mpsc::UnboundedSender<ControllerEvent>,
    events_rx: mpsc::UnboundedReceiver<ControllerEvent>,
    status: Arc<StdMutex<StatusSnapshot>>,
}

impl<T, L> Runner<T, L>
where
    T: Transport,
    L: LookupService + 'static,
{
    /// `events` must be the pair whose sender was handed to the transport.
    pub fn new(
        controller: HeadlessController<T>,
        lookup: L,
        events: (
            mpsc::UnboundedSender<ControllerEvent>,
            mpsc::UnboundedReceiver<ControllerEvent>,
        ),
    ) -> Self {
        let status = Arc::new(StdMutex::new(StatusSnapshot::capture(&controller)));
        Self {
            controller,
            lookup: Arc::new(lookup),
            events_tx: events.0,
            events_rx: events.1,
            status,
        }
    }

    pub fn handle(&self) -> RunnerHandle {
        RunnerHandle {
            events: self.events_tx.clone(),
            status: self.status.clone(),
        }
    }

    pub async fn run(mut self) {
        self.spawn_auth_check();

        while let Some(event) = self.events_rx.recv().await {
            if let Some(ticket) = self.controller.dispatch(event) {
                self.spawn_lookup(ticket);
            }
            self.publish();
        }
    }

    fn spawn_auth_check(&self) {
        let lookup = self.lookup.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = lookup.check_auth().await.map_err(TrackError::from);
            let _ = events.send(ControllerEvent::AuthChecked(result));
        });
    }

    // No timeout and no cancellation: a superseded result is dropped by the controller.
    fn spawn_lookup(&self, ticket: LookupTicket) {
        let lookup = self.lookup.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = authenticated_lookup(lookup.as_ref(), &ticket.registration)
                .await
                .map_err(TrackError::from);
            let _ = events.send(ControllerEvent::LookupFinished { ticket, result });
        });
    }

    fn publish(&self) {
        let snapshot = StatusSnapshot::capture(&self.controller);
        let mut locked = self
            .status
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *locked = snapshot;
    }
}
