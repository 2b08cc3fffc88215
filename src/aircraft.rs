use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::view::Position;

/// Barometric altitude as reported upstream: feet, or a label such as `"ground"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Altitude {
    Feet(f64),
    Label(String),
}

/// Attribute bag carried by lookup results and streamed updates.
/// Every field is optional; unknown fields are kept but not interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AircraftUpdate {
    #[serde(rename = "r", default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<String>,
    #[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
    pub aircraft_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight: Option<String>,
    #[serde(rename = "alt_baro", default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<Altitude>,
    #[serde(rename = "gs", default, skip_serializing_if = "Option::is_none")]
    pub ground_speed: Option<f64>,
    #[serde(rename = "track", default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AircraftUpdate {
    pub fn position(&self) -> Option<Position> {
        Position::from_parts(self.lat, self.lon, self.heading)
    }

    /// Whether this update names a different aircraft than `registration`.
    /// Updates without a registration match anything.
    pub fn names_other_than(&self, registration: &str) -> bool {
        self.registration
            .as_deref()
            .map(|r| !same_registration(r, registration))
            .unwrap_or(false)
    }
}

/// Registrations compare case-insensitively, ignoring surrounding whitespace.
pub fn same_registration(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_upstream_field_names() {
        let update: AircraftUpdate = serde_json::from_str(
            r#"{"r":"N12345","t":"C172","flight":"N12345  ","alt_baro":3500,
                "gs":112.4,"track":271.0,"lat":40.0,"lon":-74.0,"squawk":"1200"}"#,
        )
        .unwrap();

        assert_eq!(update.registration.as_deref(), Some("N12345"));
        assert_eq!(update.altitude, Some(Altitude::Feet(3500.0)));
        assert_eq!(update.extra.get("squawk"), Some(&serde_json::json!("1200")));
        let p = update.position().unwrap();
        assert_eq!((p.lat, p.lon, p.heading_deg), (40.0, -74.0, 271.0));
    }

    #[test]
    fn accepts_ground_altitude_and_missing_fields() {
        let update: AircraftUpdate = serde_json::from_str(r#"{"alt_baro":"ground"}"#).unwrap();
        assert_eq!(update.altitude, Some(Altitude::Label("ground".into())));
        assert!(update.position().is_none());
    }

    #[test]
    fn registration_match_ignores_case_and_padding() {
        let update = AircraftUpdate {
            registration: Some(" n12345 ".into()),
            ..Default::default()
        };
        assert!(!update.names_other_than("N12345"));
        assert!(update.names_other_than("G-ABCD"));
        assert!(!AircraftUpdate::default().names_other_than("N12345"));
        assert!(same_registration(" n12345", "N12345 "));
        assert!(!same_registration("N12345", "N1234"));
    }
}
