//! Spherical Web Mercator (EPSG:3857) forward and inverse transforms

use std::f64::consts::PI;

use super::coordinate::{Coordinate, PlanarPoint};

/// Half of the projected equator length in meters
pub const ORIGIN_SHIFT: f64 = 20037508.34;

/// Ground resolution at zoom 0 in meters per pixel (256px tiles)
pub const INITIAL_RESOLUTION: f64 = 156543.03392804097;

/// Projects a geographic coordinate to Web Mercator meters.
///
/// Defined for latitudes in the open interval (-90, 90). At the poles the
/// tangent term diverges and the result is not finite.
#[inline]
pub fn to_web_mercator(coord: Coordinate) -> PlanarPoint {
    let x = (coord.longitude * ORIGIN_SHIFT) / 180.0;
    let mut y = ((90.0 + coord.latitude) * PI / 360.0).tan().ln() / (PI / 180.0);
    y = (y * ORIGIN_SHIFT) / 180.0;
    PlanarPoint::new(x, y)
}

/// Converts Web Mercator meters back to a geographic coordinate
#[inline]
pub fn from_web_mercator(point: PlanarPoint) -> Coordinate {
    let longitude = (point.x / ORIGIN_SHIFT) * 180.0;
    let y = (point.y / ORIGIN_SHIFT) * 180.0;
    let latitude = 180.0 / PI * (2.0 * (y * PI / 180.0).exp().atan() - PI / 2.0);
    Coordinate::new(latitude, longitude)
}

/// Meters per pixel at the given zoom level
#[inline]
pub fn ground_resolution(zoom: u8) -> f64 {
    INITIAL_RESOLUTION / 2f64.powi(i32::from(zoom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_origin() {
        let p = to_web_mercator(Coordinate::new(0.0, 0.0));
        assert_eq!(p.x, 0.0);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn test_antimeridian() {
        let p = to_web_mercator(Coordinate::new(0.0, 180.0));
        assert!((p.x - ORIGIN_SHIFT).abs() < 1e-6);
    }

    #[test]
    fn test_milan() {
        let p = to_web_mercator(Coordinate::new(45.4642, 9.19));
        assert!((p.x - 1_023_026.12).abs() < 0.01, "x = {}", p.x);
        assert!((p.y - 5_694_898.73).abs() < 0.01, "y = {}", p.y);
    }

    #[test]
    fn test_web_mercator_limit_maps_to_square() {
        let p = to_web_mercator(Coordinate::new(85.05112878, 0.0));
        assert!((p.y - ORIGIN_SHIFT).abs() < 1.0, "y = {}", p.y);
    }

    #[test]
    fn test_pole_is_not_finite() {
        let p = to_web_mercator(Coordinate::new(90.0, 0.0));
        assert!(!p.y.is_finite() || p.y > 1e8);
    }

    #[test]
    fn test_ground_resolution_halves_per_zoom() {
        assert_eq!(ground_resolution(0), INITIAL_RESOLUTION);
        assert_eq!(ground_resolution(1), INITIAL_RESOLUTION / 2.0);
        assert!((ground_resolution(19) - 0.29858214173896974).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_roundtrip(lat in -85.0f64..85.0, lng in -180.0f64..=180.0) {
            let back = from_web_mercator(to_web_mercator(Coordinate::new(lat, lng)));
            prop_assert!((back.latitude - lat).abs() < 1e-9);
            prop_assert!((back.longitude - lng).abs() < 1e-9);
        }
    }
}
