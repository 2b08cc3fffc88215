mod headless;
mod panel;

pub use headless::{HeadlessMap, HeadlessPanel, MapState, PanelState};
pub use panel::AttributePanel;

use crate::aircraft::AircraftUpdate;
use crate::view::{
    Bounds, LatLng, MarkerChange, Position, Trail, TrailChange, ViewInstruction, ViewMode,
    ViewOutcome,
};

/// Operations the map widget must provide.
pub trait MapSurface {
    fn pan_to(&mut self, center: LatLng);
    fn fit_bounds(&mut self, bounds: Bounds);
    fn set_view(&mut self, center: LatLng, zoom: u8);
    /// Draws one connected line through `points`, replacing any previous line.
    fn draw_trail(&mut self, points: &[LatLng]);
    fn clear_trail(&mut self);
    /// Places the aircraft marker, or moves it, rotated to `position.heading_deg`.
    fn place_marker(&mut self, position: Position);
    fn clear_marker(&mut self);
}

/// Text regions around the map: result panel, loading indicator, error area.
pub trait DisplayPanel {
    fn show_attributes(&mut self, panel: &AttributePanel);
    fn show_loading(&mut self, message: &str);
    fn hide_loading(&mut self);
    fn show_error(&mut self, message: &str);
    fn clear_results(&mut self);
    fn set_full_trail_active(&mut self, active: bool);
    fn redirect_to_login(&mut self, url: &str);
}

/// Applies view decisions and attributes to the surfaces. Holds no state of its own.
pub struct RenderBridge<M, D> {
    map: M,
    panel: D,
}

impl<M: MapSurface, D: DisplayPanel> RenderBridge<M, D> {
    pub fn new(map: M, panel: D) -> Self {
        Self { map, panel }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn panel(&self) -> &D {
        &self.panel
    }

    pub fn apply(&mut self, outcome: &ViewOutcome, trail: &Trail) {
        match outcome.trail {
            TrailChange::Clear => self.map.clear_trail(),
            TrailChange::Redraw => self.map.draw_trail(&trail.latlngs()),
            TrailChange::Unchanged => {}
        }

        match outcome.marker {
            MarkerChange::Place(position) => self.map.place_marker(position),
            MarkerChange::Clear => self.map.clear_marker(),
            MarkerChange::Unchanged => {}
        }

        match outcome.instruction {
            ViewInstruction::PanTo(center) => self.map.pan_to(center),
            ViewInstruction::FitBounds(bounds) => self.map.fit_bounds(bounds),
            ViewInstruction::SetView { center, zoom } => self.map.set_view(center, zoom),
            ViewInstruction::None => {}
        }

        if outcome.mode_changed {
            self.panel
                .set_full_trail_active(outcome.mode == ViewMode::FullTrail);
        }
    }

    pub fn show_attributes(&mut self, update: &AircraftUpdate) {
        self.panel
            .show_attributes(&AttributePanel::from_update(update));
    }

    pub fn show_loading(&mut self, message: &str) {
        self.panel.show_loading(message);
    }

    pub fn hide_loading(&mut self) {
        self.panel.hide_loading();
    }

    pub fn show_error(&mut self, message: &str) {
        self.panel.show_error(message);
    }

    pub fn clear_results(&mut self) {
        self.panel.clear_results();
    }

    pub fn redirect_to_login(&mut self, url: &str) {
        self.panel.redirect_to_login(url);
    }
}
