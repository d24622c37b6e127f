use serde::{Deserialize, Serialize};

/// A geographic coordinate in degrees (WGS84)
///
/// No range clamping is applied: any finite pair is a valid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate from latitude/longitude in degrees
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Creates a coordinate only if both components are finite
    pub fn finite(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude.is_finite() && longitude.is_finite() {
            Some(Self::new(latitude, longitude))
        } else {
            None
        }
    }

    /// Creates a coordinate from optional record fields
    pub fn from_fields(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        Self::finite(latitude?, longitude?)
    }
}

/// A point in Web Mercator meters (EPSG:3857)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_rejects_nan_and_infinity() {
        assert!(Coordinate::finite(f64::NAN, 9.19).is_none());
        assert!(Coordinate::finite(45.0, f64::INFINITY).is_none());
        assert_eq!(Coordinate::finite(45.0, 9.0), Some(Coordinate::new(45.0, 9.0)));
    }

    #[test]
    fn test_out_of_range_is_accepted() {
        let coord = Coordinate::finite(120.0, -400.0).unwrap();
        assert_eq!(coord.latitude, 120.0);
        assert_eq!(coord.longitude, -400.0);
    }

    #[test]
    fn test_from_fields_requires_both() {
        assert!(Coordinate::from_fields(Some(45.0), None).is_none());
        assert!(Coordinate::from_fields(None, Some(9.0)).is_none());
        assert!(Coordinate::from_fields(Some(45.0), Some(9.0)).is_some());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(Coordinate::new(45.4642, 9.19)).unwrap();
        assert_eq!(json, serde_json::json!({ "lat": 45.4642, "lng": 9.19 }));
    }
}
