//! In-memory road network: nearest-node lookup and shortest paths.
//!
//! Graphs are directed; two-way streets arrive as two edges. Edge lengths
//! are resolved once at build time — explicit metres when the source
//! provides them, otherwise the haversine length of the edge geometry, or
//! of the endpoints as a last resort — so distance queries never touch
//! geometry.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use geo::Coord;
use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::geodesy::haversine_m;

type IndexedNode = GeomWithData<[f64; 2], usize>;

/// One directed road segment, as described by a graph source.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadEdge {
    /// Source node id, in the source's id space.
    pub from: u64,
    /// Target node id, in the source's id space.
    pub to: u64,
    /// Explicit length in metres, when the source carries one.
    pub length_m: Option<f64>,
    /// Polyline of the segment; used to derive a missing length.
    pub geometry: Vec<Coord<f64>>,
}

impl RoadEdge {
    /// A straight connection with no explicit length or geometry.
    #[must_use]
    pub const fn between(from: u64, to: u64) -> Self {
        Self {
            from,
            to,
            length_m: None,
            geometry: Vec::new(),
        }
    }
}

/// A queryable road network for one city.
#[derive(Debug)]
pub struct RoadGraph {
    locations: Vec<Coord<f64>>,
    adjacency: Vec<Vec<(usize, f64)>>,
    index: RTree<IndexedNode>,
}

impl RoadGraph {
    /// Build a graph from source nodes and edges.
    ///
    /// Edges referring to unknown node ids are skipped. Non-finite or
    /// negative explicit lengths are treated as missing and re-derived.
    #[must_use]
    pub fn from_parts(nodes: &[(u64, Coord<f64>)], edges: &[RoadEdge]) -> Self {
        let mut ids: std::collections::HashMap<u64, usize> =
            std::collections::HashMap::with_capacity(nodes.len());
        let mut locations = Vec::with_capacity(nodes.len());
        for &(id, location) in nodes {
            if !ids.contains_key(&id) {
                ids.insert(id, locations.len());
                locations.push(location);
            }
        }
        let mut adjacency = vec![Vec::new(); locations.len()];
        for edge in edges {
            let (Some(&from), Some(&to)) = (ids.get(&edge.from), ids.get(&edge.to)) else {
                log::debug!(
                    "skipping edge {} -> {}: unknown endpoint",
                    edge.from,
                    edge.to
                );
                continue;
            };
            let length = resolve_length_m(edge, &locations, from, to);
            if let Some(out) = adjacency.get_mut(from) {
                out.push((to, length));
            }
        }
        let index = RTree::bulk_load(
            locations
                .iter()
                .enumerate()
                .map(|(i, c)| IndexedNode::new([c.x, c.y], i))
                .collect(),
        );
        Self {
            locations,
            adjacency,
            index,
        }
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.locations.len()
    }

    /// Index of the node nearest to `point`, or `None` for an empty graph.
    ///
    /// Nearest is by planar lon/lat distance, which is adequate at city
    /// scale for snapping a POI onto the network.
    #[must_use]
    pub fn nearest_node(&self, point: Coord<f64>) -> Option<usize> {
        self.index
            .nearest_neighbor(&[point.x, point.y])
            .map(|node| node.data)
    }

    /// Location of a node by index.
    #[must_use]
    pub fn node_location(&self, node: usize) -> Option<Coord<f64>> {
        self.locations.get(node).copied()
    }

    /// Length in metres of the shortest path between two nodes, or `None`
    /// when no path exists.
    ///
    /// Dijkstra over the length-weighted adjacency; ties resolve by node
    /// index so repeated queries are identical.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "path relaxation accumulates edge lengths"
    )]
    pub fn shortest_path_m(&self, from: usize, to: usize) -> Option<f64> {
        if from >= self.node_count() || to >= self.node_count() {
            return None;
        }
        if from == to {
            return Some(0.0);
        }
        let mut best = vec![f64::INFINITY; self.node_count()];
        let mut heap = BinaryHeap::new();
        if let Some(slot) = best.get_mut(from) {
            *slot = 0.0;
        }
        heap.push(QueueEntry {
            distance_m: 0.0,
            node: from,
        });
        while let Some(QueueEntry { distance_m, node }) = heap.pop() {
            if node == to {
                return Some(distance_m);
            }
            if best.get(node).is_some_and(|&b| distance_m > b) {
                continue;
            }
            let Some(neighbours) = self.adjacency.get(node) else {
                continue;
            };
            for &(next, length_m) in neighbours {
                let candidate = distance_m + length_m;
                if best.get(next).is_some_and(|&b| candidate < b) {
                    if let Some(slot) = best.get_mut(next) {
                        *slot = candidate;
                    }
                    heap.push(QueueEntry {
                        distance_m: candidate,
                        node: next,
                    });
                }
            }
        }
        None
    }
}

/// Build-time edge length resolution, in metres.
#[expect(
    clippy::float_arithmetic,
    reason = "summing polyline segment lengths"
)]
fn resolve_length_m(edge: &RoadEdge, locations: &[Coord<f64>], from: usize, to: usize) -> f64 {
    if let Some(length) = edge.length_m {
        if length.is_finite() && length >= 0.0 {
            return length;
        }
    }
    if edge.geometry.len() >= 2 {
        return edge
            .geometry
            .iter()
            .zip(edge.geometry.iter().skip(1))
            .map(|(&a, &b)| haversine_m(a, b))
            .sum();
    }
    match (locations.get(from), locations.get(to)) {
        (Some(&a), Some(&b)) => haversine_m(a, b),
        _ => 0.0,
    }
}

/// Min-heap entry; the reversed ordering turns `BinaryHeap` into a
/// priority queue on distance, with node index as the deterministic tie
/// break.
#[derive(Debug, Clone, Copy, PartialEq)]
struct QueueEntry {
    distance_m: f64,
    node: usize,
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance_m
            .total_cmp(&self.distance_m)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    /// Four nodes on a line of longitude, roughly 111 m apart per 0.001°.
    #[fixture]
    fn chain_graph() -> RoadGraph {
        let nodes = vec![
            (10, Coord { x: 0.0, y: 0.0 }),
            (20, Coord { x: 0.001, y: 0.0 }),
            (30, Coord { x: 0.002, y: 0.0 }),
            (40, Coord { x: 0.003, y: 0.0 }),
        ];
        let edges = vec![
            RoadEdge::between(10, 20),
            RoadEdge::between(20, 10),
            RoadEdge::between(20, 30),
            RoadEdge::between(30, 20),
            RoadEdge::between(30, 40),
            RoadEdge::between(40, 30),
        ];
        RoadGraph::from_parts(&nodes, &edges)
    }

    #[rstest]
    fn nearest_node_snaps_to_the_closest_location(chain_graph: RoadGraph) {
        let hit = chain_graph.nearest_node(Coord {
            x: 0.00201,
            y: 0.00005,
        });
        assert_eq!(hit, Some(2));
    }

    #[test]
    fn nearest_node_on_empty_graph_is_none() {
        let graph = RoadGraph::from_parts(&[], &[]);
        assert_eq!(graph.nearest_node(Coord { x: 0.0, y: 0.0 }), None);
    }

    #[rstest]
    fn shortest_path_sums_derived_edge_lengths(chain_graph: RoadGraph) {
        let d = chain_graph
            .shortest_path_m(0, 3)
            .expect("chain is connected");
        // Three hops of ~111.19 m each.
        assert!((d - 333.6).abs() < 1.0);
    }

    #[rstest]
    fn shortest_path_to_self_is_zero(chain_graph: RoadGraph) {
        assert_eq!(chain_graph.shortest_path_m(2, 2), Some(0.0));
    }

    #[test]
    fn disconnected_nodes_have_no_path() {
        let nodes = vec![
            (1, Coord { x: 0.0, y: 0.0 }),
            (2, Coord { x: 1.0, y: 0.0 }),
        ];
        let graph = RoadGraph::from_parts(&nodes, &[]);
        assert_eq!(graph.shortest_path_m(0, 1), None);
    }

    #[test]
    fn explicit_lengths_win_over_geometry() {
        let nodes = vec![
            (1, Coord { x: 0.0, y: 0.0 }),
            (2, Coord { x: 0.001, y: 0.0 }),
        ];
        let edges = vec![RoadEdge {
            from: 1,
            to: 2,
            length_m: Some(500.0),
            geometry: vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 0.001, y: 0.0 }],
        }];
        let graph = RoadGraph::from_parts(&nodes, &edges);
        assert_eq!(graph.shortest_path_m(0, 1), Some(500.0));
    }

    #[test]
    fn geometry_length_beats_endpoint_estimate_for_winding_roads() {
        let nodes = vec![
            (1, Coord { x: 0.0, y: 0.0 }),
            (2, Coord { x: 0.001, y: 0.0 }),
        ];
        // A detour through a point well off the straight line.
        let winding = vec![RoadEdge {
            from: 1,
            to: 2,
            length_m: None,
            geometry: vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 0.0005, y: 0.001 },
                Coord { x: 0.001, y: 0.0 },
            ],
        }];
        let graph = RoadGraph::from_parts(&nodes, &winding);
        let d = graph.shortest_path_m(0, 1).expect("edge exists");
        let straight = haversine_m(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.001, y: 0.0 });
        assert!(d > straight * 1.5);
    }

    #[test]
    fn dijkstra_prefers_the_shorter_of_two_routes() {
        let nodes = vec![
            (1, Coord { x: 0.0, y: 0.0 }),
            (2, Coord { x: 0.001, y: 0.0 }),
            (3, Coord { x: 0.002, y: 0.0 }),
        ];
        let edges = vec![
            // Direct but long.
            RoadEdge {
                from: 1,
                to: 3,
                length_m: Some(900.0),
                geometry: Vec::new(),
            },
            // Two short hops.
            RoadEdge {
                from: 1,
                to: 2,
                length_m: Some(100.0),
                geometry: Vec::new(),
            },
            RoadEdge {
                from: 2,
                to: 3,
                length_m: Some(100.0),
                geometry: Vec::new(),
            },
        ];
        let graph = RoadGraph::from_parts(&nodes, &edges);
        assert_eq!(graph.shortest_path_m(0, 2), Some(200.0));
    }

    #[test]
    fn edges_with_unknown_endpoints_are_skipped() {
        let nodes = vec![(1, Coord { x: 0.0, y: 0.0 })];
        let edges = vec![RoadEdge::between(1, 99)];
        let graph = RoadGraph::from_parts(&nodes, &edges);
        assert_eq!(graph.node_count(), 1);
    }
}
