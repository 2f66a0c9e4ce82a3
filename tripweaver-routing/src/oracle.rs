//! Distance oracle implementations.
//!
//! [`RoadNetworkOracle`] walks the fallback ladder the planner relies on:
//! road network when one is cached, great-circle when the network is
//! absent or disconnected, zero when the coordinates themselves cannot be
//! assessed. [`HaversineOracle`] skips the network entirely.

use geo::Coord;

use tripweaver_core::DistanceOracle;

use crate::cache::{GraphCache, GraphSource};
use crate::geodesy::haversine_km;

const M_PER_KM: f64 = 1000.0;

fn assessable(c: Coord<f64>) -> bool {
    c.x.is_finite() && c.y.is_finite()
}

/// Distance oracle backed by per-city road networks.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use tripweaver_core::DistanceOracle;
/// use tripweaver_routing::{NoGraphs, RoadNetworkOracle};
///
/// let oracle = RoadNetworkOracle::new(NoGraphs);
/// let a = Coord { x: 106.7, y: 10.78 };
/// // No graph available: the answer is great-circle, and self-distance
/// // stays zero.
/// assert_eq!(oracle.distance_km("hcm", a, a), 0.0);
/// ```
#[derive(Debug)]
pub struct RoadNetworkOracle<S> {
    cache: GraphCache<S>,
}

impl<S: GraphSource> RoadNetworkOracle<S> {
    /// Build an oracle with a fresh cache over `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            cache: GraphCache::new(source),
        }
    }

    /// Build an oracle over an existing (possibly shared) cache.
    #[must_use]
    pub const fn with_cache(cache: GraphCache<S>) -> Self {
        Self { cache }
    }

    /// Access the underlying cache, e.g. to pre-warm a city.
    #[must_use]
    pub const fn cache(&self) -> &GraphCache<S> {
        &self.cache
    }
}

impl<S: GraphSource> DistanceOracle for RoadNetworkOracle<S> {
    #[expect(
        clippy::float_arithmetic,
        reason = "metre to kilometre conversion"
    )]
    fn distance_km(&self, city: &str, from: Coord<f64>, to: Coord<f64>) -> f64 {
        if !assessable(from) || !assessable(to) {
            return 0.0;
        }
        let Some(graph) = self.cache.graph_for(city) else {
            return haversine_km(from, to);
        };
        let (Some(a), Some(b)) = (graph.nearest_node(from), graph.nearest_node(to)) else {
            return haversine_km(from, to);
        };
        graph.shortest_path_m(a, b).map_or_else(
            || {
                log::debug!("no path between snapped nodes {a} and {b} in '{city}'");
                haversine_km(from, to)
            },
            |metres| metres / M_PER_KM,
        )
    }
}

/// Graph-free oracle: every distance is great-circle.
///
/// Useful in tests and in deployments that have no road data at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineOracle;

impl DistanceOracle for HaversineOracle {
    fn distance_km(&self, _city: &str, from: Coord<f64>, to: Coord<f64>) -> f64 {
        if !assessable(from) || !assessable(to) {
            return 0.0;
        }
        haversine_km(from, to)
    }
}
