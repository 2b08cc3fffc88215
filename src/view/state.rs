use super::trail::Trail;
use super::types::{
    Bounds, MarkerChange, Position, TrailChange, ViewInstruction, ViewMode, DEFAULT_RADIUS_M,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub initial_zoom: u8,
    pub radius_m: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            initial_zoom: 4,
            radius_m: DEFAULT_RADIUS_M,
        }
    }
}

/// Everything that can change the view.
#[derive(Debug, Clone, Copy, PartialEq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ViewEvent {
    SessionStarted,
    PositionReceived {
        lat: Option<f64>,
        lon: Option<f64>,
        heading: Option<f64>,
    },
    UserPanned,
    CenterOnEntity,
    ZoomToRadius,
    ResetZoom,
    ToggleFullTrail,
}

/// The effects a single event asks of the render side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOutcome {
    pub instruction: ViewInstruction,
    pub marker: MarkerChange,
    pub trail: TrailChange,
    pub mode: ViewMode,
    pub mode_changed: bool,
}

impl ViewOutcome {
    fn idle(mode: ViewMode) -> Self {
        Self {
            instruction: ViewInstruction::None,
            marker: MarkerChange::Unchanged,
            trail: TrailChange::Unchanged,
            mode,
            mode_changed: false,
        }
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.instruction == ViewInstruction::None
            && self.marker == MarkerChange::Unchanged
            && self.trail == TrailChange::Unchanged
            && !self.mode_changed
    }
}

#[derive(Debug, Clone)]
pub struct ViewState {
    mode: ViewMode,
    trail: Trail,
    settings: ViewSettings,
}

impl ViewState {
    pub fn new(settings: ViewSettings) -> Self {
        Self {
            mode: ViewMode::AutoFollow,
            trail: Trail::new(),
            settings,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// The marker always sits on the newest recorded position.
    pub fn last_position(&self) -> Option<Position> {
        self.trail.last().copied()
    }

    pub fn apply(&mut self, event: ViewEvent) -> ViewOutcome {
        match event {
            ViewEvent::SessionStarted => {
                self.trail.clear();
                let mut outcome = self.switch_mode(ViewMode::AutoFollow);
                outcome.marker = MarkerChange::Clear;
                outcome.trail = TrailChange::Clear;
                outcome
            }
            ViewEvent::PositionReceived { lat, lon, heading } => {
                match Position::from_parts(lat, lon, heading) {
                    Some(position) => self.record(position),
                    None => ViewOutcome::idle(self.mode),
                }
            }
            ViewEvent::UserPanned => self.switch_mode(ViewMode::Manual),
            ViewEvent::CenterOnEntity => self.take_control(|_, last| {
                ViewInstruction::PanTo(last.latlng())
            }),
            ViewEvent::ZoomToRadius => self.take_control(|settings, last| {
                ViewInstruction::FitBounds(Bounds::around(last.latlng(), settings.radius_m))
            }),
            ViewEvent::ResetZoom => self.take_control(|settings, last| ViewInstruction::SetView {
                center: last.latlng(),
                zoom: settings.initial_zoom,
            }),
            ViewEvent::ToggleFullTrail => {
                if self.mode == ViewMode::FullTrail {
                    self.switch_mode(ViewMode::AutoFollow)
                } else {
                    let mut outcome = self.switch_mode(ViewMode::FullTrail);
                    if let Some(bounds) = self.trail.bounds() {
                        outcome.instruction = ViewInstruction::FitBounds(bounds);
                    }
                    outcome
                }
            }
        }
    }

    fn record(&mut self, position: Position) -> ViewOutcome {
        let first = self.trail.is_empty();
        self.trail.push(position);

        let instruction = if first {
            ViewInstruction::SetView {
                center: position.latlng(),
                zoom: self.settings.initial_zoom,
            }
        } else {
            match self.mode {
                ViewMode::AutoFollow => ViewInstruction::PanTo(position.latlng()),
                ViewMode::Manual => ViewInstruction::None,
                ViewMode::FullTrail => self
                    .trail
                    .bounds()
                    .map(ViewInstruction::FitBounds)
                    .unwrap_or(ViewInstruction::None),
            }
        };

        ViewOutcome {
            instruction,
            marker: MarkerChange::Place(position),
            trail: TrailChange::Redraw,
            mode: self.mode,
            mode_changed: false,
        }
    }

    // Controls that act on the marker do nothing until a position exists.
    fn take_control<F>(&mut self, instruction: F) -> ViewOutcome
    where
        F: FnOnce(&ViewSettings, &Position) -> ViewInstruction,
    {
        let Some(last) = self.last_position() else {
            return ViewOutcome::idle(self.mode);
        };
        let mut outcome = self.switch_mode(ViewMode::Manual);
        outcome.instruction = instruction(&self.settings, &last);
        outcome
    }

    fn switch_mode(&mut self, mode: ViewMode) -> ViewOutcome {
        let changed = self.mode != mode;
        self.mode = mode;
        ViewOutcome {
            mode_changed: changed,
            ..ViewOutcome::idle(mode)
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(ViewSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::LatLng;

    fn fix(lat: f64, lon: f64) -> ViewEvent {
        ViewEvent::PositionReceived {
            lat: Some(lat),
            lon: Some(lon),
            heading: None,
        }
    }

    fn started() -> ViewState {
        let mut state = ViewState::default();
        state.apply(ViewEvent::SessionStarted);
        state
    }

    #[test]
    fn first_position_sets_view_at_initial_zoom() {
        let mut state = started();
        let outcome = state.apply(fix(40.0, -74.0));

        assert_eq!(state.mode(), ViewMode::AutoFollow);
        assert_eq!(state.trail().len(), 1);
        assert_eq!(
            outcome.instruction,
            ViewInstruction::SetView {
                center: LatLng::new(40.0, -74.0),
                zoom: 4
            }
        );
        assert!(matches!(outcome.marker, MarkerChange::Place(p) if p.lat == 40.0));
        assert_eq!(outcome.trail, TrailChange::Redraw);
    }

    #[test]
    fn first_position_bootstraps_even_in_full_trail() {
        let mut state = started();
        state.apply(ViewEvent::ToggleFullTrail);
        let outcome = state.apply(fix(40.0, -74.0));

        assert_eq!(state.mode(), ViewMode::FullTrail);
        assert!(matches!(outcome.instruction, ViewInstruction::SetView { .. }));
    }

    #[test]
    fn auto_follow_pans_to_each_new_position() {
        let mut state = started();
        state.apply(fix(40.0, -74.0));
        state.apply(fix(40.1, -74.1));
        let outcome = state.apply(fix(40.2, -74.2));

        assert_eq!(state.trail().len(), 3);
        assert_eq!(
            state.trail().latlngs(),
            vec![
                LatLng::new(40.0, -74.0),
                LatLng::new(40.1, -74.1),
                LatLng::new(40.2, -74.2)
            ]
        );
        assert_eq!(
            outcome.instruction,
            ViewInstruction::PanTo(LatLng::new(40.2, -74.2))
        );
    }

    #[test]
    fn zoom_to_radius_takes_manual_control() {
        let mut state = started();
        state.apply(fix(40.0, -74.0));

        let outcome = state.apply(ViewEvent::ZoomToRadius);
        assert_eq!(state.mode(), ViewMode::Manual);
        assert!(outcome.mode_changed);
        match outcome.instruction {
            ViewInstruction::FitBounds(bounds) => {
                assert!(bounds.contains(LatLng::new(40.0, -74.0)));
                assert!((bounds.center().lat - 40.0).abs() < 1e-9);
            }
            other => panic!("expected fit bounds, got {other:?}"),
        }

        let outcome = state.apply(fix(40.5, -74.5));
        assert_eq!(state.trail().len(), 2);
        assert_eq!(outcome.instruction, ViewInstruction::None);
        assert_eq!(state.mode(), ViewMode::Manual);
    }

    #[test]
    fn center_and_reset_zoom_use_last_position() {
        let mut state = started();
        state.apply(fix(40.0, -74.0));
        state.apply(fix(41.0, -75.0));

        assert_eq!(
            state.apply(ViewEvent::CenterOnEntity).instruction,
            ViewInstruction::PanTo(LatLng::new(41.0, -75.0))
        );
        assert_eq!(
            state.apply(ViewEvent::ResetZoom).instruction,
            ViewInstruction::SetView {
                center: LatLng::new(41.0, -75.0),
                zoom: 4
            }
        );
        assert_eq!(state.mode(), ViewMode::Manual);
    }

    #[test]
    fn marker_controls_without_position_do_nothing() {
        let mut state = started();
        for event in [
            ViewEvent::CenterOnEntity,
            ViewEvent::ZoomToRadius,
            ViewEvent::ResetZoom,
        ] {
            assert!(state.apply(event).is_idle());
            assert_eq!(state.mode(), ViewMode::AutoFollow);
        }
    }

    #[test]
    fn user_pan_switches_to_manual_from_any_mode() {
        let mut state = started();
        state.apply(fix(40.0, -74.0));
        state.apply(ViewEvent::ToggleFullTrail);

        let outcome = state.apply(ViewEvent::UserPanned);
        assert_eq!(state.mode(), ViewMode::Manual);
        assert_eq!(outcome.instruction, ViewInstruction::None);
        assert_eq!(state.trail().len(), 1);
    }

    #[test]
    fn full_trail_fits_on_entry_and_on_each_update() {
        let mut state = started();
        state.apply(fix(40.0, -74.0));
        state.apply(fix(41.0, -75.0));
        state.apply(ViewEvent::UserPanned);

        let outcome = state.apply(ViewEvent::ToggleFullTrail);
        assert_eq!(state.mode(), ViewMode::FullTrail);
        let ViewInstruction::FitBounds(bounds) = outcome.instruction else {
            panic!("expected fit bounds");
        };
        assert_eq!(bounds.south_west, LatLng::new(40.0, -75.0));

        let outcome = state.apply(fix(42.0, -76.0));
        let ViewInstruction::FitBounds(bounds) = outcome.instruction else {
            panic!("expected refit");
        };
        assert_eq!(bounds.north_east, LatLng::new(42.0, -74.0));
    }

    #[test]
    fn toggle_on_empty_trail_changes_mode_only() {
        let mut state = started();
        let outcome = state.apply(ViewEvent::ToggleFullTrail);
        assert_eq!(state.mode(), ViewMode::FullTrail);
        assert_eq!(outcome.instruction, ViewInstruction::None);
    }

    #[test]
    fn toggle_on_then_off_keeps_trail_and_returns_to_auto_follow() {
        for count in 0..3 {
            let mut state = started();
            for i in 0..count {
                state.apply(fix(40.0 + i as f64, -74.0));
            }
            state.apply(ViewEvent::UserPanned);
            let before = state.trail().latlngs();

            state.apply(ViewEvent::ToggleFullTrail);
            let outcome = state.apply(ViewEvent::ToggleFullTrail);

            assert_eq!(state.mode(), ViewMode::AutoFollow);
            assert_eq!(outcome.instruction, ViewInstruction::None);
            assert_eq!(state.trail().latlngs(), before);
        }
    }

    #[test]
    fn malformed_position_is_ignored() {
        let mut state = started();
        state.apply(fix(40.0, -74.0));

        let outcome = state.apply(ViewEvent::PositionReceived {
            lat: Some(41.0),
            lon: None,
            heading: Some(90.0),
        });
        assert!(outcome.is_idle());
        assert_eq!(state.trail().len(), 1);
    }

    #[test]
    fn session_start_resets_trail_and_mode() {
        let mut state = started();
        state.apply(fix(40.0, -74.0));
        state.apply(ViewEvent::ZoomToRadius);

        let outcome = state.apply(ViewEvent::SessionStarted);
        assert_eq!(state.mode(), ViewMode::AutoFollow);
        assert!(state.trail().is_empty());
        assert_eq!(outcome.marker, MarkerChange::Clear);
        assert_eq!(outcome.trail, TrailChange::Clear);

        // The next fix is a fresh bootstrap.
        let outcome = state.apply(fix(10.0, 10.0));
        assert!(matches!(outcome.instruction, ViewInstruction::SetView { .. }));
    }

    #[test]
    fn trail_only_grows_between_resets() {
        let mut state = started();
        let events = [
            fix(1.0, 1.0),
            ViewEvent::UserPanned,
            fix(2.0, 2.0),
            ViewEvent::ToggleFullTrail,
            ViewEvent::PositionReceived {
                lat: None,
                lon: None,
                heading: None,
            },
            fix(3.0, 3.0),
            ViewEvent::ZoomToRadius,
            ViewEvent::ToggleFullTrail,
            ViewEvent::ResetZoom,
            fix(4.0, 4.0),
        ];

        let mut previous: Vec<LatLng> = Vec::new();
        for event in events {
            state.apply(event);
            let current = state.trail().latlngs();
            assert!(current.len() >= previous.len());
            assert_eq!(&current[..previous.len()], &previous[..]);
            previous = current;
        }
        assert_eq!(previous.len(), 4);
    }
}
