//! Great-circle distance on the WGS84 sphere approximation.

use geo::Coord;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates, in kilometres.
///
/// Coordinates follow the crate convention: `x = longitude`,
/// `y = latitude`, both in degrees.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use tripweaver_routing::haversine_km;
///
/// let saigon = Coord { x: 106.6297, y: 10.8231 };
/// let hanoi = Coord { x: 105.8342, y: 21.0278 };
/// let d = haversine_km(saigon, hanoi);
/// assert!((d - 1137.0).abs() < 10.0);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "spherical trigonometry is float maths"
)]
pub fn haversine_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let delta_lat = (b.y - a.y).to_radians();
    let delta_lon = (b.x - a.x).to_radians();
    let half_chord = (delta_lat / 2.0).sin().powi(2)
        + a.y.to_radians().cos() * b.y.to_radians().cos() * (delta_lon / 2.0).sin().powi(2);
    let angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());
    EARTH_RADIUS_KM * angle
}

/// Haversine distance in metres; used for road-graph edge lengths.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "unit conversion")]
pub(crate) fn haversine_m(a: Coord<f64>, b: Coord<f64>) -> f64 {
    haversine_km(a, b) * 1000.0
}
