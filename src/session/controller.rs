use super::error::TrackError;
use super::types::{ControllerEvent, ControllerStatus, LookupTicket, Session, UserCommand};
use crate::aircraft::{same_registration, AircraftUpdate};
use crate::render::{DisplayPanel, MapSurface, RenderBridge};
use crate::transport::{Transport, TransportAdapter, TransportEvent};
use crate::view::{ViewEvent, ViewSettings, ViewState};

const SEARCHING_MESSAGE: &str = "Searching for aircraft...";
const EMPTY_ID_MESSAGE: &str = "Please enter an aircraft ID";

/// Owns the tracked aircraft, the view state and the render bridge.
///
/// All mutation goes through [`SessionController::dispatch`], one event at a
/// time. Lookups are not run here: `dispatch` hands back a [`LookupTicket`]
/// and the caller feeds the result in as [`ControllerEvent::LookupFinished`].
pub struct SessionController<T, M, D> {
    transport: TransportAdapter<T>,
    view: ViewState,
    render: RenderBridge<M, D>,
    session: Option<Session>,
    pending: Option<LookupTicket>,
    next_token: u64,
    resubscribe_on_connect: bool,
    login_url: String,
}

impl<T: Transport, M: MapSurface, D: DisplayPanel> SessionController<T, M, D> {
    pub fn new(
        transport: T,
        render: RenderBridge<M, D>,
        settings: ViewSettings,
        login_url: String,
    ) -> Self {
        Self {
            transport: TransportAdapter::new(transport),
            view: ViewState::new(settings),
            render,
            session: None,
            pending: None,
            next_token: 0,
            resubscribe_on_connect: false,
            login_url,
        }
    }

    pub fn dispatch(&mut self, event: ControllerEvent) -> Option<LookupTicket> {
        match event {
            ControllerEvent::User(command) => return self.handle_command(command),
            ControllerEvent::Transport(event) => self.handle_transport(event),
            ControllerEvent::AuthChecked(result) => match result {
                Ok(()) => log::info!("User authenticated"),
                Err(TrackError::AuthenticationRequired) => {
                    self.report(TrackError::AuthenticationRequired)
                }
                Err(e) => log::warn!("Authentication check failed: {}", e),
            },
            ControllerEvent::LookupFinished { ticket, result } => {
                self.finish_lookup(ticket, result)
            }
        }
        None
    }

    /// Starts a lookup for `registration`. The returned ticket must be
    /// resolved through [`ControllerEvent::LookupFinished`].
    pub fn search(&mut self, registration: &str) -> Option<LookupTicket> {
        let registration = registration.trim();
        if registration.is_empty() {
            self.render.show_error(EMPTY_ID_MESSAGE);
            return None;
        }

        log::info!("Searching for aircraft: {}", registration);
        self.render.show_loading(SEARCHING_MESSAGE);
        self.render.clear_results();

        if let Some(session) = &self.session {
            if !same_registration(&session.registration, registration) {
                self.transport.unsubscribe(&session.registration);
            }
        }

        self.next_token += 1;
        let ticket = LookupTicket {
            token: self.next_token,
            registration: registration.to_string(),
        };
        self.pending = Some(ticket.clone());
        Some(ticket)
    }

    /// Stops following the current aircraft. The trail stays on screen.
    pub fn stop(&mut self) {
        if self.pending.take().is_some() {
            self.render.hide_loading();
        }
        if let Some(session) = self.session.take() {
            self.transport.unsubscribe(&session.registration);
            log::info!("Stopped tracking {}", session.registration);
        }
    }

    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            session: self.session.clone(),
            connected: self.transport.is_connected(),
            pending_search: self.pending.as_ref().map(|p| p.registration.clone()),
            mode: self.view.mode(),
            trail: self.view.trail().points().to_vec(),
        }
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn render(&self) -> &RenderBridge<M, D> {
        &self.render
    }

    fn handle_command(&mut self, command: UserCommand) -> Option<LookupTicket> {
        let view_event = match command {
            UserCommand::Search(registration) => return self.search(&registration),
            UserCommand::Stop => {
                self.stop();
                return None;
            }
            UserCommand::Pan => ViewEvent::UserPanned,
            UserCommand::CenterOnEntity => ViewEvent::CenterOnEntity,
            UserCommand::ZoomToRadius => ViewEvent::ZoomToRadius,
            UserCommand::ResetZoom => ViewEvent::ResetZoom,
            UserCommand::ToggleFullTrail => ViewEvent::ToggleFullTrail,
        };
        self.apply_view(view_event);
        None
    }

    fn handle_transport(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Connected => {
                if self.resubscribe_on_connect {
                    if let Some(session) = &self.session {
                        log::info!("Reconnected, resubscribing to {}", session.registration);
                        self.transport.subscribe(&session.registration);
                    }
                }
                self.resubscribe_on_connect = false;
            }
            TransportEvent::Disconnected => {
                log::warn!("Disconnected from tracking backend");
                self.resubscribe_on_connect = true;
            }
            TransportEvent::ConnectError(e) => log::warn!("Transport connection error: {}", e),
            TransportEvent::Update(update) => {
                if let Err(e) = self.handle_update(&update) {
                    log::trace!("Dropped update: {}", e);
                }
            }
        }
    }

    fn handle_update(&mut self, update: &AircraftUpdate) -> Result<(), TrackError> {
        let Some(session) = &self.session else {
            log::debug!("No active session, ignoring update");
            return Ok(());
        };
        if update.names_other_than(&session.registration) {
            log::debug!(
                "Ignoring update for {:?} while tracking {}",
                update.registration,
                session.registration
            );
            return Ok(());
        }
        self.show_update(update)
    }

    fn finish_lookup(&mut self, ticket: LookupTicket, result: Result<AircraftUpdate, TrackError>) {
        if self.pending.as_ref() != Some(&ticket) {
            log::debug!(
                "Discarding stale lookup result for {} (token {})",
                ticket.registration,
                ticket.token
            );
            return;
        }
        self.pending = None;
        self.render.hide_loading();

        match result {
            Ok(snapshot) => {
                self.start_session(ticket.registration);
                if let Err(e) = self.show_update(&snapshot) {
                    log::debug!("Lookup snapshot not placed on map: {}", e);
                }
            }
            Err(e) => {
                log::warn!("Lookup for {} failed: {}", ticket.registration, e);
                // The search already unsubscribed the kept session.
                if let Some(registration) = self
                    .session
                    .as_ref()
                    .map(|s| s.registration.clone())
                    .filter(|r| !same_registration(r, &ticket.registration))
                {
                    self.subscribe(&registration);
                }
                self.report(e);
            }
        }
    }

    fn start_session(&mut self, registration: String) {
        let session = Session::new(registration);
        log::info!(
            "Tracking {} (session {})",
            session.registration,
            session.id
        );
        self.apply_view(ViewEvent::SessionStarted);
        self.subscribe(&session.registration);
        self.session = Some(session);
    }

    // A command sent while the link is down is flushed on reconnect.
    fn subscribe(&mut self, registration: &str) {
        if !self.transport.is_connected() {
            self.resubscribe_on_connect = false;
        }
        self.transport.subscribe(registration);
    }

    fn show_update(&mut self, update: &AircraftUpdate) -> Result<(), TrackError> {
        self.render.show_attributes(update);
        if update.position().is_none() {
            return Err(TrackError::MalformedUpdate);
        }
        self.apply_view(ViewEvent::PositionReceived {
            lat: update.lat,
            lon: update.lon,
            heading: update.heading,
        });
        Ok(())
    }

    fn apply_view(&mut self, event: ViewEvent) {
        let before = self.view.mode();
        let outcome = self.view.apply(event);
        if outcome.mode_changed {
            log::info!("View mode {} -> {} on {}", before, outcome.mode, event);
        }
        self.render.apply(&outcome, self.view.trail());
    }

    fn report(&mut self, error: TrackError) {
        match error {
            TrackError::AuthenticationRequired => self.render.redirect_to_login(&self.login_url),
            TrackError::LookupFailed(message) => self.render.show_error(&message),
            TrackError::MalformedUpdate => {}
        }
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &TransportAdapter<T> {
        &self.transport
    }

    #[cfg(test)]
    pub(crate) fn transport_mut(&mut self) -> &mut TransportAdapter<T> {
        &mut self.transport
    }
}
