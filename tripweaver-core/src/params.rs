//! Trip parameters and their fail-fast validation.
//!
//! Parameter problems are caller misuse, not data noise, so they are the
//! one error class the planner refuses to absorb.

use thiserror::Error;

/// Bounds for the number of itinerary days.
pub const DAY_RANGE: std::ops::RangeInclusive<u8> = 1..=10;
/// Bounds for the POIs planned per day.
pub const POI_PER_DAY_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// Configuration for one itinerary build.
///
/// # Examples
/// ```
/// use tripweaver_core::TripParams;
///
/// let params = TripParams {
///     city: "Ho Chi Minh City".into(),
///     days: 3,
///     ..TripParams::default()
/// };
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TripParams {
    /// Destination city; also the road-graph cache key.
    pub city: String,
    /// Number of itinerary days, 1–10.
    pub days: u8,
    /// Daily budget in local currency; must be positive and finite.
    pub budget_per_day: f64,
    /// Upper bound on POIs per day, 1–10.
    pub max_poi_per_day: u8,
    /// Food preferences, matched against POI tags.
    pub taste_tags: Vec<String>,
    /// Activity preferences, folded into the query text.
    pub activity_tags: Vec<String>,
    /// Whether a cafe slot is planned each day.
    pub do_cafe: bool,
    /// Whether a shopping slot is planned each day.
    pub do_shopping: bool,
    /// Whether attractions compete for the shared slots.
    pub do_attraction: bool,
    /// Whether entertainment competes for the shared slots.
    pub do_entertainment: bool,
    /// Soft tag filter applied to the attraction pool.
    pub attraction_tags: Vec<String>,
    /// Soft tag filter applied to the entertainment pool.
    pub entertainment_tags: Vec<String>,
    /// Soft tag filter applied to the shopping pool.
    pub shopping_tags: Vec<String>,
    /// Advisory walking tolerance; reserved for route-length capping.
    pub walk_tolerance_km: f64,
    /// Seed for the selection shuffles, for reproducible builds.
    pub seed: u64,
}

impl Default for TripParams {
    fn default() -> Self {
        Self {
            city: String::new(),
            days: 2,
            budget_per_day: 1_500_000.0,
            max_poi_per_day: 6,
            taste_tags: Vec::new(),
            activity_tags: Vec::new(),
            do_cafe: true,
            do_shopping: false,
            do_attraction: true,
            do_entertainment: true,
            attraction_tags: Vec::new(),
            entertainment_tags: Vec::new(),
            shopping_tags: Vec::new(),
            walk_tolerance_km: 5.0,
            seed: 0,
        }
    }
}

/// Errors returned by [`TripParams::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TripParamsError {
    /// The day count fell outside [`DAY_RANGE`].
    #[error("days must be between 1 and 10, got {days}")]
    InvalidDays {
        /// The rejected value.
        days: u8,
    },
    /// The budget was zero, negative, or not finite.
    #[error("budget per day must be a positive amount, got {budget}")]
    InvalidBudget {
        /// The rejected value.
        budget: f64,
    },
    /// The per-day POI bound fell outside [`POI_PER_DAY_RANGE`].
    #[error("max POIs per day must be between 1 and 10, got {max}")]
    InvalidMaxPerDay {
        /// The rejected value.
        max: u8,
    },
}

impl TripParams {
    /// Check the contract bounds.
    ///
    /// # Errors
    /// Returns the first violated bound; data-quality concerns are not
    /// validated here and never fail a build.
    pub fn validate(&self) -> Result<(), TripParamsError> {
        if !DAY_RANGE.contains(&self.days) {
            return Err(TripParamsError::InvalidDays { days: self.days });
        }
        if !self.budget_per_day.is_finite() || self.budget_per_day <= 0.0 {
            return Err(TripParamsError::InvalidBudget {
                budget: self.budget_per_day,
            });
        }
        if !POI_PER_DAY_RANGE.contains(&self.max_poi_per_day) {
            return Err(TripParamsError::InvalidMaxPerDay {
                max: self.max_poi_per_day,
            });
        }
        Ok(())
    }
}
