//! Road-network distances and route sequencing for Tripweaver.
//!
//! The crate supplies the two routing pieces of the engine: the
//! [`DistanceOracle`](tripweaver_core::DistanceOracle) implementations
//! ([`RoadNetworkOracle`] over a cached per-city [`RoadGraph`], and the
//! graph-free [`HaversineOracle`]), and the [`RouteSequencer`] that turns
//! a day's POIs into a visiting order via MST-preorder or
//! nearest-neighbour heuristics.
//!
//! Road graphs are injected through the [`GraphSource`] seam; the engine
//! itself never performs I/O.

#![forbid(unsafe_code)]

mod cache;
mod geodesy;
mod graph;
mod oracle;
mod sequencer;

pub use cache::{GraphCache, GraphSource, NoGraphs};
pub use geodesy::haversine_km;
pub use graph::{RoadEdge, RoadGraph};
pub use oracle::{HaversineOracle, RoadNetworkOracle};
pub use sequencer::{RouteSequencer, SequencedRoute, SequencingStrategy};
