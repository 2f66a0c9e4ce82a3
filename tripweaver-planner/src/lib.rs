//! Day allocation and itinerary orchestration for Tripweaver.
//!
//! [`DailyAllocator`] turns a ranked POI pool into one day's selection
//! under category quotas, deduplicated across the whole trip by a shared
//! used-key set. [`ItineraryBuilder`] drives the full pipeline — rank,
//! allocate, sequence — across every requested day and returns the
//! finished [`Itinerary`](tripweaver_core::Itinerary).

#![forbid(unsafe_code)]

mod allocator;
mod builder;

pub use allocator::DailyAllocator;
pub use builder::{ItineraryBuilder, PlanError};
