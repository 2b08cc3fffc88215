use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::TrackError;
use crate::aircraft::AircraftUpdate;
use crate::transport::TransportEvent;
use crate::view::{Position, ViewMode};

/// One aircraft being followed.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Session {
    pub id: Uuid,
    pub registration: String,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(registration: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            registration,
            started_at: Utc::now(),
        }
    }
}

/// Identifies one lookup. Only the newest ticket may change the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub token: u64,
    pub registration: String,
}

#[derive(Debug, Clone, PartialEq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum UserCommand {
    Search(String),
    Stop,
    Pan,
    CenterOnEntity,
    ZoomToRadius,
    ResetZoom,
    ToggleFullTrail,
}

/// Everything that reaches the controller, in queue order.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    User(UserCommand),
    Transport(TransportEvent),
    AuthChecked(Result<(), TrackError>),
    LookupFinished {
        ticket: LookupTicket,
        result: Result<AircraftUpdate, TrackError>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ControllerStatus {
    pub session: Option<Session>,
    pub connected: bool,
    pub pending_search: Option<String>,
    pub mode: ViewMode,
    pub trail: Vec<Position>,
}
