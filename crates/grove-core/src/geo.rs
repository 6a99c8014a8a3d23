//! Proximity tests over (latitude, longitude) pairs.
//!
//! Plant lookups always run in two phases: a coarse latitude-band pre-filter
//! that the store can answer from an index, followed by an exact great-circle
//! distance check. The band alone is never treated as "nearby" — a raw degree
//! window distorts with latitude and over-matches longitude near the poles.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters (IUGG).
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Meters spanned by one degree of latitude on the sphere.
pub const METERS_PER_DEGREE_LAT: f64 = EARTH_RADIUS_METERS * PI / 180.0;

/// Radius for quest discovery around a user.
pub const NEARBY_RADIUS_METERS: f64 = 500.0;

/// Radius for duplicate-registration proximity: two registrations this close
/// are candidates for the same physical plant.
pub const DUPLICATE_RADIUS_METERS: f64 = 3.5;

/// A point on the globe in double-precision degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// An inclusive latitude window used as the store-side pre-filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatBand {
    pub lower: f64,
    pub upper: f64,
}

impl LatBand {
    /// Builds the latitude window covering every point within `radius_meters`
    /// of `center`. The half-width is doubled so the window stays
    /// over-inclusive; candidates it admits must still pass [`is_within`].
    pub fn around(center: GeoPoint, radius_meters: f64) -> Self {
        let half_width = radius_meters / METERS_PER_DEGREE_LAT * 2.0;
        Self {
            lower: center.lat - half_width,
            upper: center.lat + half_width,
        }
    }
}

/// Great-circle (haversine) distance between two points, in meters.
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
}

/// Exact-distance membership test. Inclusive: a point exactly on the radius
/// counts as within.
pub fn is_within(a: GeoPoint, b: GeoPoint, radius_meters: f64) -> bool {
    distance_meters(a, b) <= radius_meters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let d = distance_meters(a, b);
        assert!((d - METERS_PER_DEGREE_LAT).abs() < 0.01, "got {d}");
    }

    #[test]
    fn one_degree_of_longitude_shrinks_with_latitude() {
        let equator = distance_meters(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
        let sixty = distance_meters(GeoPoint::new(60.0, 0.0), GeoPoint::new(60.0, 1.0));
        // cos(60°) = 0.5
        assert!((sixty / equator - 0.5).abs() < 0.001);
    }

    #[test]
    fn zero_distance_to_self() {
        let p = GeoPoint::new(12.97, 77.59);
        assert_eq!(distance_meters(p, p), 0.0);
        assert!(is_within(p, p, 0.0));
    }

    #[test]
    fn within_is_inclusive_at_the_boundary() {
        let center = GeoPoint::new(0.0, 0.0);
        // Degree offsets chosen to land just inside and just outside 500 m
        // along a meridian, where haversine is linear in latitude.
        let just_inside = GeoPoint::new(499.9 / METERS_PER_DEGREE_LAT, 0.0);
        let just_outside = GeoPoint::new(500.1 / METERS_PER_DEGREE_LAT, 0.0);

        assert!(is_within(center, just_inside, NEARBY_RADIUS_METERS));
        assert!(!is_within(center, just_outside, NEARBY_RADIUS_METERS));
    }

    #[test]
    fn lat_band_is_over_inclusive() {
        let center = GeoPoint::new(45.0, 7.0);
        let band = LatBand::around(center, NEARBY_RADIUS_METERS);
        // A point exactly at the radius due north must fall inside the band
        // with room to spare.
        let edge_lat = center.lat + NEARBY_RADIUS_METERS / METERS_PER_DEGREE_LAT;
        assert!(band.lower < center.lat);
        assert!(band.upper > edge_lat);
    }

    #[test]
    fn duplicate_radius_matches_the_degree_constant_scale() {
        // The legacy pre-filter constant was 0.00003°, about 3.3 m of
        // latitude. The exact radius sits just above it.
        let legacy_box_meters = 0.00003 * METERS_PER_DEGREE_LAT;
        assert!(DUPLICATE_RADIUS_METERS > legacy_box_meters);
        assert!(DUPLICATE_RADIUS_METERS < 2.0 * legacy_box_meters);
    }
}
