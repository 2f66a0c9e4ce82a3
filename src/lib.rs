//! Facade crate for the Tripweaver itinerary engine.
//!
//! Re-exports the core domain types together with the scorer, routing and
//! planner implementations, so most applications only depend on this
//! crate.

#![forbid(unsafe_code)]

pub use tripweaver_core::{
    Category, DayQuota, DistanceMatrix, DistanceOracle, Itinerary, ItineraryDay, PlannedStop,
    Poi, PoiRecord, ScoreContext, ScoredPoi, TripParams, TripParamsError, sanitise,
};

pub use tripweaver_scorer::{RankWeights, RelevanceRanker};

pub use tripweaver_routing::{
    GraphCache, GraphSource, HaversineOracle, NoGraphs, RoadEdge, RoadGraph, RoadNetworkOracle,
    RouteSequencer, SequencedRoute, SequencingStrategy, haversine_km,
};

pub use tripweaver_planner::{DailyAllocator, ItineraryBuilder, PlanError};
