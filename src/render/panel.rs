use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use crate::aircraft::{AircraftUpdate, Altitude};

const PLACEHOLDER: &str = "N/A";

/// Formatted attribute rows for the result panel.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttributePanel {
    pub registration: String,
    pub aircraft_type: String,
    pub flight: String,
    pub altitude: String,
    pub speed: String,
    pub heading: String,
    pub lat: String,
    pub lon: String,
}

impl AttributePanel {
    pub fn from_update(update: &AircraftUpdate) -> Self {
        Self {
            registration: text(update.registration.as_deref()),
            aircraft_type: text(update.aircraft_type.as_deref()),
            flight: text(update.flight.as_deref().map(str::trim)),
            altitude: match &update.altitude {
                Some(Altitude::Feet(ft)) => format!("{} ft", number(*ft)),
                Some(Altitude::Label(label)) if !label.trim().is_empty() => label.clone(),
                _ => format!("{PLACEHOLDER} ft"),
            },
            speed: with_unit(update.ground_speed, " kts"),
            heading: with_unit(update.heading, "°"),
            lat: with_unit(update.lat, ""),
            lon: with_unit(update.lon, ""),
        }
    }
}

impl fmt::Display for AttributePanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Registration: {} | Type: {} | Flight: {} | Alt: {} | Speed: {} | Heading: {} | Lat: {} | Lon: {}",
            self.registration,
            self.aircraft_type,
            self.flight,
            self.altitude,
            self.speed,
            self.heading,
            self.lat,
            self.lon
        )
    }
}

fn text(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{}{}", number(v), unit),
        None => format!("{PLACEHOLDER}{unit}"),
    }
}

fn number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
