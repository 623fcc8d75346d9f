/// Mean Earth radius used by the haversine formula, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn distance_to(self, other: Self) -> f64 {
        distance(self.lat, self.lng, other.lat, other.lng)
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

/// Great-circle distance between two points given in degrees, in kilometers.
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < tolerance,
            "expected {expected}, got {actual} (diff {diff})"
        );
    }

    #[test]
    fn same_point_is_zero() {
        for (lat, lon) in [(0.0, 0.0), (10.0, 10.0), (-33.86, 151.21), (89.9, -179.9)] {
            assert_close(distance(lat, lon, lat, lon), 0.0, 1e-9);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let a = LatLng::new(51.5074, -0.1278);
        let b = LatLng::new(48.8566, 2.3522);
        assert_close(a.distance_to(b), b.distance_to(a), 1e-9);
    }

    #[test]
    fn london_to_paris() {
        let km = distance(51.5074, -0.1278, 48.8566, 2.3522);
        assert_close(km, 343.5, 1.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        // 2 * pi * 6371 / 360
        assert_close(distance(0.0, 0.0, 1.0, 0.0), 111.195, 0.01);
    }

    #[test]
    fn antipodes_are_half_circumference() {
        let km = distance(0.0, 0.0, 0.0, 180.0);
        assert_close(km, std::f64::consts::PI * EARTH_RADIUS_KM, 1e-6);
    }

    #[test]
    fn latlng_from_config_pair() {
        let center: LatLng = [10.0, 20.0].into();
        assert_eq!(center, LatLng::new(10.0, 20.0));
    }
}
