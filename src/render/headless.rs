use serde::Serialize;
use utoipa::ToSchema;

use super::{AttributePanel, DisplayPanel, MapSurface};
use crate::view::{Bounds, LatLng, Position};

/// What a headless map would currently be showing.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MapState {
    pub center: LatLng,
    /// `None` after a bounds fit, where the zoom is chosen by the surface.
    pub zoom: Option<u8>,
    pub fitted_bounds: Option<Bounds>,
    pub marker: Option<Position>,
    pub trail: Vec<LatLng>,
}

/// Map surface without a screen: keeps the last rendered state and logs each operation.
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    state: MapState,
}

impl HeadlessMap {
    pub fn new(center: LatLng, zoom: u8) -> Self {
        Self {
            state: MapState {
                center,
                zoom: Some(zoom),
                fitted_bounds: None,
                marker: None,
                trail: Vec::new(),
            },
        }
    }

    pub fn state(&self) -> &MapState {
        &self.state
    }
}

impl MapSurface for HeadlessMap {
    fn pan_to(&mut self, center: LatLng) {
        log::info!("map: pan to {:.5}, {:.5}", center.lat, center.lon);
        self.state.center = center;
        self.state.fitted_bounds = None;
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        log::info!(
            "map: fit bounds sw={:.5},{:.5} ne={:.5},{:.5}",
            bounds.south_west.lat,
            bounds.south_west.lon,
            bounds.north_east.lat,
            bounds.north_east.lon
        );
        self.state.center = bounds.center();
        self.state.zoom = None;
        self.state.fitted_bounds = Some(bounds);
    }

    fn set_view(&mut self, center: LatLng, zoom: u8) {
        log::info!(
            "map: set view {:.5}, {:.5} at zoom {}",
            center.lat,
            center.lon,
            zoom
        );
        self.state.center = center;
        self.state.zoom = Some(zoom);
        self.state.fitted_bounds = None;
    }

    fn draw_trail(&mut self, points: &[LatLng]) {
        log::debug!("map: trail redrawn with {} points", points.len());
        self.state.trail = points.to_vec();
    }

    fn clear_trail(&mut self) {
        log::debug!("map: trail cleared");
        self.state.trail.clear();
    }

    fn place_marker(&mut self, position: Position) {
        log::debug!(
            "map: marker at {:.5}, {:.5} heading {:.0}",
            position.lat,
            position.lon,
            position.heading_deg
        );
        self.state.marker = Some(position);
    }

    fn clear_marker(&mut self) {
        log::debug!("map: marker cleared");
        self.state.marker = None;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct PanelState {
    pub attributes: Option<AttributePanel>,
    pub loading: Option<String>,
    pub error: Option<String>,
    pub full_trail_active: bool,
    pub full_trail_label: String,
    pub login_redirect: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HeadlessPanel {
    state: PanelState,
}

impl HeadlessPanel {
    pub fn new() -> Self {
        Self {
            state: PanelState {
                full_trail_label: full_trail_label(false).to_string(),
                ..Default::default()
            },
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }
}

impl Default for HeadlessPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPanel for HeadlessPanel {
    fn show_attributes(&mut self, panel: &AttributePanel) {
        log::info!("{}", panel);
        self.state.attributes = Some(panel.clone());
        self.state.error = None;
    }

    fn show_loading(&mut self, message: &str) {
        log::info!("{}", message);
        self.state.loading = Some(message.to_string());
    }

    fn hide_loading(&mut self) {
        self.state.loading = None;
    }

    fn show_error(&mut self, message: &str) {
        log::warn!("{}", message);
        self.state.attributes = None;
        self.state.error = Some(message.to_string());
    }

    fn clear_results(&mut self) {
        self.state.attributes = None;
        self.state.error = None;
    }

    fn set_full_trail_active(&mut self, active: bool) {
        self.state.full_trail_active = active;
        self.state.full_trail_label = full_trail_label(active).to_string();
    }

    fn redirect_to_login(&mut self, url: &str) {
        log::error!("Not authenticated, log in at {}", url);
        self.state.login_redirect = Some(url.to_string());
    }
}

fn full_trail_label(active: bool) -> &'static str {
    if active {
        "Disable Full Trail"
    } else {
        "Show Full Trail"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_bounds_drops_explicit_zoom() {
        let mut map = HeadlessMap::new(LatLng::new(0.0, 0.0), 4);
        let mut bounds = Bounds::from_point(LatLng::new(40.0, -75.0));
        bounds.extend(LatLng::new(42.0, -73.0));

        map.fit_bounds(bounds);
        assert_eq!(map.state().zoom, None);
        assert_eq!(map.state().center, LatLng::new(41.0, -74.0));

        map.set_view(LatLng::new(1.0, 2.0), 4);
        assert_eq!(map.state().fitted_bounds, None);
        assert_eq!(map.state().zoom, Some(4));
    }

    #[test]
    fn error_replaces_result_panel() {
        let mut panel = HeadlessPanel::new();
        panel.show_attributes(&AttributePanel::from_update(&Default::default()));
        panel.show_error("No aircraft found");

        assert!(panel.state().attributes.is_none());
        assert_eq!(panel.state().error.as_deref(), Some("No aircraft found"));
        assert_eq!(panel.state().full_trail_label, "Show Full Trail");
    }
}
