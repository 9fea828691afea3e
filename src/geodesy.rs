//! # Loxodromic geodesy provider
//!
//! The navigation passes only ever need two primitives: the rhumb-line bearing
//! and distance between two points, and the projection of a point along a
//! constant bearing. Both are exposed behind the [`Geodesy`] trait so the host
//! application can substitute its own chart projection; [`MercatorGeodesy`] is
//! the built-in spherical implementation.
//!
//! All distances are nautical miles and all angles degrees, one nautical mile
//! being one arc minute of latitude.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::angles::normalize_course;
use crate::constants::{Degree, NauticalMile, MINUTES_PER_DEGREE};

/// A geographic position in degrees, latitude positive north, longitude positive east.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: Degree,
    pub lon: Degree,
}

impl Position {
    pub fn new(lat: Degree, lon: Degree) -> Self {
        Position { lat, lon }
    }
}

/// Chart-projection seam used by the enrichment, simplification, and
/// track-building passes.
pub trait Geodesy {
    /// Rhumb-line bearing (degrees, [0, 360)) and distance (nautical miles)
    /// from `from` to `to`.
    fn bearing_distance(&self, from: Position, to: Position) -> (Degree, NauticalMile);

    /// Project `from` along a constant `bearing` for `distance` nautical miles.
    fn project(&self, from: Position, bearing: Degree, distance: NauticalMile) -> Position;
}

/// Spherical Mercator (loxodrome) implementation of [`Geodesy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MercatorGeodesy;

/// Stretched latitude difference used by the Mercator projection.
fn delta_psi(phi1: f64, phi2: f64) -> f64 {
    ((PI / 4.0 + phi2 / 2.0).tan() / (PI / 4.0 + phi1 / 2.0).tan()).ln()
}

/// East-west convergence factor; degenerates to cos(lat) on a parallel.
fn stretch_factor(phi1: f64, phi2: f64, dpsi: f64) -> f64 {
    if dpsi.abs() > 1e-12 {
        (phi2 - phi1) / dpsi
    } else {
        phi1.cos()
    }
}

fn normalize_lon(lon: Degree) -> Degree {
    let mut wrapped = lon.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped -= 360.0;
    }
    wrapped
}

impl Geodesy for MercatorGeodesy {
    fn bearing_distance(&self, from: Position, to: Position) -> (Degree, NauticalMile) {
        let phi1 = from.lat.to_radians();
        let phi2 = to.lat.to_radians();

        // Always take the short way around the antimeridian
        let mut dlon = (to.lon - from.lon).to_radians();
        if dlon.abs() > PI {
            dlon -= dlon.signum() * 2.0 * PI;
        }

        let dpsi = delta_psi(phi1, phi2);
        let q = stretch_factor(phi1, phi2, dpsi);

        let bearing = normalize_course(dlon.atan2(dpsi).to_degrees());
        let dist_rad = ((phi2 - phi1).powi(2) + (q * dlon).powi(2)).sqrt();
        let distance = dist_rad.to_degrees() * MINUTES_PER_DEGREE;

        (bearing, distance)
    }

    fn project(&self, from: Position, bearing: Degree, distance: NauticalMile) -> Position {
        let theta = bearing.to_radians();
        let delta = (distance / MINUTES_PER_DEGREE).to_radians();

        let phi1 = from.lat.to_radians();
        let phi2 = phi1 + delta * theta.cos();

        let dpsi = delta_psi(phi1, phi2);
        let q = stretch_factor(phi1, phi2, dpsi);
        let dlon = delta * theta.sin() / q;

        Position {
            lat: phi2.to_degrees(),
            lon: normalize_lon(from.lon + dlon.to_degrees()),
        }
    }
}

#[cfg(test)]
mod geodesy_test {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn due_east_on_the_equator() {
        let geo = MercatorGeodesy;
        let start = Position::new(0.0, 0.0);

        let end = geo.project(start, 90.0, 60.0);
        assert_relative_eq!(end.lat, 0.0, epsilon = 1e-9);
        assert_relative_eq!(end.lon, 1.0, epsilon = 1e-9);

        let (bearing, distance) = geo.bearing_distance(start, end);
        assert_relative_eq!(bearing, 90.0, epsilon = 1e-9);
        assert_relative_eq!(distance, 60.0, epsilon = 1e-6);
    }

    #[test]
    fn due_north_shortens_no_longitude() {
        let geo = MercatorGeodesy;
        let start = Position::new(54.0, 10.0);

        let end = geo.project(start, 0.0, 30.0);
        assert_relative_eq!(end.lat, 54.5, epsilon = 1e-9);
        assert_relative_eq!(end.lon, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn projection_inverts_bearing_distance() {
        let geo = MercatorGeodesy;
        let start = Position::new(47.3, -2.9);
        let end = geo.project(start, 215.0, 42.0);

        let (bearing, distance) = geo.bearing_distance(start, end);
        assert_relative_eq!(bearing, 215.0, epsilon = 1e-6);
        assert_relative_eq!(distance, 42.0, epsilon = 1e-6);
    }

    #[test]
    fn bearing_crosses_the_antimeridian_the_short_way() {
        let geo = MercatorGeodesy;
        let (bearing, distance) =
            geo.bearing_distance(Position::new(-35.0, 179.5), Position::new(-35.0, -179.5));

        assert_relative_eq!(bearing, 90.0, epsilon = 1e-6);
        assert!(distance < 60.0);
    }
}
