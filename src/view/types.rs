use serde::Serialize;
use utoipa::ToSchema;

pub const METERS_PER_MILE: f64 = 1609.34;
pub const DEFAULT_RADIUS_M: f64 = 250.0 * METERS_PER_MILE;

// Mean length of one degree of latitude.
const METERS_PER_DEGREE: f64 = 111_319.49;
const MIN_COS_LAT: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Parses a `"lat, lon"` coordinate string.
    pub fn from_coordinates(coordinates: &str) -> Option<Self> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return None;
        }
        let lat: f64 = parts[0].parse().ok()?;
        let lon: f64 = parts[1].parse().ok()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some(Self { lat, lon })
    }
}

/// A recorded aircraft fix. Heading is in degrees, clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
    pub heading_deg: f64,
}

impl Position {
    /// Builds a position from optional wire fields. Returns `None` unless both
    /// coordinates are present and finite; a missing heading becomes 0.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>, heading: Option<f64>) -> Option<Self> {
        let lat = lat.filter(|v| v.is_finite())?;
        let lon = lon.filter(|v| v.is_finite())?;
        Some(Self {
            lat,
            lon,
            heading_deg: heading.filter(|h| h.is_finite()).unwrap_or(0.0),
        })
    }

    pub fn latlng(&self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    pub fn from_point(point: LatLng) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    pub fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lon = self.south_west.lon.min(point.lon);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lon = self.north_east.lon.max(point.lon);
    }

    /// Square bounds reaching `radius_m` from `center` in each cardinal direction.
    pub fn around(center: LatLng, radius_m: f64) -> Self {
        let lat_extent = radius_m / METERS_PER_DEGREE;
        let cos_lat = center.lat.to_radians().cos().abs().max(MIN_COS_LAT);
        let lon_extent = lat_extent / cos_lat;

        Self {
            south_west: LatLng::new((center.lat - lat_extent).max(-90.0), center.lon - lon_extent),
            north_east: LatLng::new((center.lat + lat_extent).min(90.0), center.lon + lon_extent),
        }
    }

    #[cfg(test)]
    pub fn contains(&self, point: LatLng) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lon..=self.north_east.lon).contains(&point.lon)
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lon + self.north_east.lon) / 2.0,
        )
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViewMode {
    /// Recenter on every new position.
    #[default]
    AutoFollow,
    /// The user has taken control of the view.
    Manual,
    /// Keep the whole trail in view.
    FullTrail,
}

/// What the map surface should do with its viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewInstruction {
    None,
    PanTo(LatLng),
    FitBounds(Bounds),
    SetView { center: LatLng, zoom: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerChange {
    Unchanged,
    Place(Position),
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailChange {
    Unchanged,
    Redraw,
    Clear,
}
