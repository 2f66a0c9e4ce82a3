//! Road-distance oracle seam between the planner and the routing layer.
//!
//! The trait is total: every coordinate pair yields a finite, non-negative
//! number of kilometres. Implementations degrade internally (road network →
//! great-circle → zero) instead of surfacing availability problems.

use geo::Coord;

/// Symmetric pairwise distance matrix in kilometres.
pub type DistanceMatrix = Vec<Vec<f64>>;

/// Resolve the distance in kilometres between two coordinates.
///
/// Implementations must be thread-safe (`Send + Sync`) so one oracle can
/// serve concurrent builds, and must uphold:
/// - the result is finite and `>= 0.0`;
/// - `distance_km(city, a, a) == 0.0` for any valid `a`;
/// - non-finite input coordinates yield `0.0` ("cannot be assessed") —
///   the same convention in point-to-point and matrix contexts;
/// - when no road network is available the result falls back to
///   great-circle distance rather than erroring.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use tripweaver_core::DistanceOracle;
///
/// struct UnitOracle;
///
/// impl DistanceOracle for UnitOracle {
///     fn distance_km(&self, _city: &str, from: Coord<f64>, to: Coord<f64>) -> f64 {
///         if from == to { 0.0 } else { 1.0 }
///     }
/// }
///
/// let a = Coord { x: 106.7, y: 10.78 };
/// assert_eq!(UnitOracle.distance_km("hcm", a, a), 0.0);
/// ```
pub trait DistanceOracle: Send + Sync {
    /// Distance in kilometres from `from` to `to` within `city`.
    fn distance_km(&self, city: &str, from: Coord<f64>, to: Coord<f64>) -> f64;
}

impl<T: DistanceOracle + ?Sized> DistanceOracle for &T {
    fn distance_km(&self, city: &str, from: Coord<f64>, to: Coord<f64>) -> f64 {
        (**self).distance_km(city, from, to)
    }
}
