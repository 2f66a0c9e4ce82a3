//! Core domain types for the Tripweaver itinerary engine.
//!
//! This crate defines the catalogue schema ([`PoiRecord`], [`Poi`],
//! [`Category`]), the trip configuration ([`TripParams`], [`DayQuota`],
//! [`ScoreContext`]), the itinerary output model, and the
//! [`DistanceOracle`] seam the routing layer implements. Sanitation of
//! dirty source fields lives in [`sanitise`]; the planner applies it
//! defensively rather than trusting upstream normalisation.

#![forbid(unsafe_code)]

mod category;
mod itinerary;
mod oracle;
mod params;
mod poi;
mod query;
mod quota;
pub mod sanitise;

pub use category::Category;
pub use itinerary::{Itinerary, ItineraryDay, PlannedStop};
pub use oracle::{DistanceMatrix, DistanceOracle};
pub use params::{DAY_RANGE, POI_PER_DAY_RANGE, TripParams, TripParamsError};
pub use poi::{Poi, PoiRecord, ScoredPoi};
pub use query::{DEFAULT_TOP_K, ScoreContext};
pub use quota::DayQuota;
