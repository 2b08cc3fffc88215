mod state;
mod trail;
mod types;

pub use state::{ViewEvent, ViewOutcome, ViewSettings, ViewState};
pub use trail::Trail;
pub use types::{
    Bounds, LatLng, MarkerChange, Position, TrailChange, ViewInstruction, ViewMode,
    METERS_PER_MILE,
};
