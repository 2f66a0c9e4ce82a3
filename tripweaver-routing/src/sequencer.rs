//! Order a day's POIs into a short visiting route.
//!
//! Two interchangeable heuristics over the pairwise distance matrix:
//! a minimum spanning tree walked in depth-first preorder (the default),
//! and nearest-neighbour greedy. Neither dominates the other across input
//! shapes, so the strategy is selectable per sequencer. Both are
//! deterministic: ties resolve by lowest index, and the reported total is
//! the realised path length, not the tree weight.

use geo::Coord;

use tripweaver_core::{DistanceMatrix, DistanceOracle, Poi};

/// Stand-in weight for a non-finite matrix entry. Large enough to be
/// avoided, finite so a spanning structure always exists.
const UNREACHABLE_PENALTY_KM: f64 = 1e9;

/// Route-ordering heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SequencingStrategy {
    /// Minimum spanning tree, visited in depth-first preorder from the
    /// first POI.
    #[default]
    MstPreorder,
    /// Always step to the nearest unvisited POI.
    NearestNeighbour,
}

/// A computed visiting order with its realised distances.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencedRoute {
    /// Permutation of the input indices, in visiting order.
    pub order: Vec<usize>,
    /// Distance from each stop to the next; one entry fewer than stops.
    pub leg_distances_km: Vec<f64>,
    /// Sum of the leg distances.
    pub total_km: f64,
}

impl SequencedRoute {
    fn trivial(order: Vec<usize>) -> Self {
        Self {
            order,
            leg_distances_km: Vec::new(),
            total_km: 0.0,
        }
    }
}

/// Sequences one day's POIs via a [`DistanceOracle`].
#[derive(Debug, Clone, Copy)]
pub struct RouteSequencer<O> {
    oracle: O,
    strategy: SequencingStrategy,
}

impl<O: DistanceOracle> RouteSequencer<O> {
    /// Construct with the default MST-preorder strategy.
    #[must_use]
    pub fn new(oracle: O) -> Self {
        Self::with_strategy(oracle, SequencingStrategy::default())
    }

    /// Construct with an explicit strategy.
    #[must_use]
    pub const fn with_strategy(oracle: O, strategy: SequencingStrategy) -> Self {
        Self { oracle, strategy }
    }

    /// Compute the visiting order and distances for `pois` in `city`.
    ///
    /// Fewer than two POIs is trivially ordered with zero distance. POIs
    /// without coordinates contribute zero-distance pairs, per the oracle
    /// convention for non-assessable input.
    #[must_use]
    pub fn sequence(&self, city: &str, pois: &[Poi]) -> SequencedRoute {
        if pois.len() < 2 {
            return SequencedRoute::trivial((0..pois.len()).collect());
        }
        let matrix = self.distance_matrix(city, pois);
        let order = match self.strategy {
            SequencingStrategy::MstPreorder => mst_preorder(&matrix),
            SequencingStrategy::NearestNeighbour => nearest_neighbour(&matrix),
        };
        let (leg_distances_km, total_km) = realised_legs(&matrix, &order);
        SequencedRoute {
            order,
            leg_distances_km,
            total_km,
        }
    }

    /// The symmetric pairwise distance matrix for `pois`.
    ///
    /// Non-finite oracle answers are replaced by a large finite penalty so
    /// downstream spanning structures always exist.
    #[must_use]
    pub fn distance_matrix(&self, city: &str, pois: &[Poi]) -> DistanceMatrix {
        let n = pois.len();
        let mut matrix = vec![vec![0.0_f64; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let distance = match (poi_location(pois, i), poi_location(pois, j)) {
                    (Some(a), Some(b)) => {
                        let d = self.oracle.distance_km(city, a, b);
                        if d.is_finite() { d } else { UNREACHABLE_PENALTY_KM }
                    }
                    // Missing coordinates cannot be assessed.
                    _ => 0.0,
                };
                set_entry(&mut matrix, i, j, distance);
                set_entry(&mut matrix, j, i, distance);
            }
        }
        matrix
    }
}

fn poi_location(pois: &[Poi], index: usize) -> Option<Coord<f64>> {
    pois.get(index).and_then(|poi| poi.location)
}

fn set_entry(matrix: &mut DistanceMatrix, i: usize, j: usize, value: f64) {
    if let Some(cell) = matrix.get_mut(i).and_then(|row| row.get_mut(j)) {
        *cell = value;
    }
}

fn entry(matrix: &DistanceMatrix, i: usize, j: usize) -> f64 {
    matrix
        .get(i)
        .and_then(|row| row.get(j))
        .copied()
        .unwrap_or(UNREACHABLE_PENALTY_KM)
}

/// Prim's minimum spanning tree over the complete graph, then a
/// depth-first preorder walk from index 0.
///
/// Ties in edge weight break towards the lower index, and children are
/// visited in ascending order, so the walk is deterministic.
fn mst_preorder(matrix: &DistanceMatrix) -> Vec<usize> {
    let n = matrix.len();
    let mut in_tree = vec![false; n];
    let mut best_cost = vec![f64::INFINITY; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    if let Some(first) = best_cost.get_mut(0) {
        *first = 0.0;
    }
    for _ in 0..n {
        let Some(next) = (0..n)
            .filter(|&v| !in_tree.get(v).copied().unwrap_or(true))
            .min_by(|&a, &b| entry_cost(&best_cost, a).total_cmp(&entry_cost(&best_cost, b)))
        else {
            break;
        };
        if let Some(flag) = in_tree.get_mut(next) {
            *flag = true;
        }
        for v in 0..n {
            if in_tree.get(v).copied().unwrap_or(true) {
                continue;
            }
            let weight = entry(matrix, next, v);
            if weight < entry_cost(&best_cost, v) {
                if let Some(cost) = best_cost.get_mut(v) {
                    *cost = weight;
                }
                if let Some(p) = parent.get_mut(v) {
                    *p = Some(next);
                }
            }
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (v, p) in parent.iter().enumerate() {
        if let Some(&p) = p.as_ref() {
            if let Some(list) = children.get_mut(p) {
                list.push(v);
            }
        }
    }

    let mut order = Vec::with_capacity(n);
    let mut stack = vec![0_usize];
    while let Some(node) = stack.pop() {
        order.push(node);
        if let Some(kids) = children.get(node) {
            // Reverse push so the walk visits lower indices first.
            for &child in kids.iter().rev() {
                stack.push(child);
            }
        }
    }
    order
}

fn entry_cost(costs: &[f64], index: usize) -> f64 {
    costs.get(index).copied().unwrap_or(f64::INFINITY)
}

/// Greedy walk: from index 0, repeatedly step to the nearest unvisited
/// index, lower index winning ties.
fn nearest_neighbour(matrix: &DistanceMatrix) -> Vec<usize> {
    let n = matrix.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut current = 0_usize;
    if let Some(flag) = visited.get_mut(current) {
        *flag = true;
    }
    order.push(current);
    while order.len() < n {
        let Some(next) = (0..n)
            .filter(|&v| !visited.get(v).copied().unwrap_or(true))
            .min_by(|&a, &b| entry(matrix, current, a).total_cmp(&entry(matrix, current, b)))
        else {
            break;
        };
        if let Some(flag) = visited.get_mut(next) {
            *flag = true;
        }
        order.push(next);
        current = next;
    }
    order
}

/// Distances realised along `order`, and their sum.
#[expect(
    clippy::float_arithmetic,
    reason = "leg lengths accumulate into the day total"
)]
fn realised_legs(matrix: &DistanceMatrix, order: &[usize]) -> (Vec<f64>, f64) {
    let legs: Vec<f64> = order
        .iter()
        .zip(order.iter().skip(1))
        .map(|(&a, &b)| entry(matrix, a, b))
        .collect();
    let total = legs.iter().sum();
    (legs, total)
}
