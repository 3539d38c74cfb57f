//! Sites and their classrooms.

use super::ids::{RoomId, SiteId};

const EARTH_RADIUS_KM: f64 = 6371.0088;

#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: SiteId,
    pub code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rooms: Vec<RoomId>,
}

impl Site {
    /// Great-circle distance in kilometres.
    pub fn distance_km(&self, other: &Site) -> f64 {
        haversine_km(
            (self.latitude, self.longitude),
            (other.latitude, other.longitude),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRoom {
    pub id: RoomId,
    pub code: String,
    pub name: String,
    pub capacity: u32,
    pub site: SiteId,
}

/// Haversine distance between two `(latitude, longitude)` pairs in degrees.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_zero_for_same_point() {
        assert_eq!(haversine_km((50.8, 4.35), (50.8, 4.35)), 0.0);
    }

    #[test]
    fn test_haversine_brussels_to_ghent() {
        let distance = haversine_km((50.8503, 4.3517), (51.0543, 3.7174));
        assert!((distance - 49.9).abs() < 0.5, "got {distance}");
    }
}
