use super::types::{Bounds, LatLng, Position};

/// Positions recorded during the current session, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: Vec<Position>,
}

impl Trail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, position: Position) {
        self.points.push(position);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&Position> {
        self.points.last()
    }

    pub fn points(&self) -> &[Position] {
        &self.points
    }

    pub fn latlngs(&self) -> Vec<LatLng> {
        self.points.iter().map(Position::latlng).collect()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let (first, rest) = self.points.split_first()?;
        let mut bounds = Bounds::from_point(first.latlng());
        for point in rest {
            bounds.extend(point.latlng());
        }
        Some(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(lat: f64, lon: f64) -> Position {
        Position {
            lat,
            lon,
            heading_deg: 0.0,
        }
    }

    #[test]
    fn empty_trail_has_no_bounds() {
        assert!(Trail::new().bounds().is_none());
    }

    #[test]
    fn bounds_cover_every_point() {
        let mut trail = Trail::new();
        trail.push(at(40.0, -74.0));
        trail.push(at(41.5, -75.0));
        trail.push(at(39.0, -73.5));

        let bounds = trail.bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(39.0, -75.0));
        assert_eq!(bounds.north_east, LatLng::new(41.5, -73.5));
        assert!(trail.points().iter().all(|p| bounds.contains(p.latlng())));
    }

    #[test]
    fn keeps_arrival_order() {
        let mut trail = Trail::new();
        trail.push(at(1.0, 1.0));
        trail.push(at(2.0, 2.0));
        assert_eq!(
            trail.latlngs(),
            vec![LatLng::new(1.0, 1.0), LatLng::new(2.0, 2.0)]
        );
        assert_eq!(trail.last(), Some(&at(2.0, 2.0)));
    }
}
