//! Orchestration: rank, allocate, and sequence each day of a trip.

use std::collections::{HashMap, HashSet};

use log::warn;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use tripweaver_core::{
    Category, DEFAULT_TOP_K, DayQuota, DistanceOracle, Itinerary, ItineraryDay, PlannedStop, Poi,
    PoiRecord, ScoreContext, ScoredPoi, TripParams, TripParamsError,
};
use tripweaver_routing::{RouteSequencer, SequencingStrategy};
use tripweaver_scorer::RelevanceRanker;

/// A day counts as severely under-filled below this share of the bound,
/// triggering one corrective category-blind pass.
const UNDERFILL_NUM: usize = 3;
const UNDERFILL_DEN: usize = 5;

/// Errors returned by [`ItineraryBuilder::build`].
///
/// Only contract violations surface; data-quality and availability
/// problems are absorbed per the engine's degradation rules.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The trip parameters failed validation.
    #[error("invalid trip parameters: {0}")]
    InvalidParams(#[from] TripParamsError),
}

/// Builds a multi-day itinerary from a catalogue snapshot.
///
/// Each day runs the ranker over the enabled category pools (weather-aware,
/// so a rainy day re-ranks), allocates against the running used-key set,
/// and sequences the selection into a visiting order with per-leg
/// distances.
#[derive(Debug)]
pub struct ItineraryBuilder<O> {
    oracle: O,
    ranker: RelevanceRanker,
    allocator: crate::DailyAllocator,
    strategy: SequencingStrategy,
}

impl<O: DistanceOracle> ItineraryBuilder<O> {
    /// Construct a builder with default ranking, allocation and
    /// MST-preorder sequencing.
    #[must_use]
    pub fn new(oracle: O) -> Self {
        Self {
            oracle,
            ranker: RelevanceRanker::default(),
            allocator: crate::DailyAllocator::default(),
            strategy: SequencingStrategy::default(),
        }
    }

    /// Select the sequencing strategy, consuming `self`.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: SequencingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Replace the allocator, consuming `self`.
    #[must_use]
    pub const fn with_allocator(mut self, allocator: crate::DailyAllocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Build the itinerary.
    ///
    /// `weather_by_day` supplies one free-text description per day; a
    /// short or empty slice means "no penalty" for the remaining days.
    /// The catalogue is sanitised defensively, so malformed records cost
    /// data, never the build.
    ///
    /// # Errors
    /// Returns [`PlanError::InvalidParams`] for out-of-contract
    /// parameters; every syntactically valid request yields an itinerary,
    /// however sparse.
    pub fn build(
        &self,
        params: &TripParams,
        catalog: &[PoiRecord],
        weather_by_day: &[String],
    ) -> Result<Itinerary, PlanError> {
        params.validate()?;
        let pois: Vec<Poi> = catalog
            .iter()
            .enumerate()
            .map(|(row, record)| Poi::from_record(record, row))
            .collect();
        let by_category = partition(&pois);
        let quota = DayQuota::derive(params);
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let mut used: HashSet<String> = HashSet::new();

        let mut days = Vec::with_capacity(usize::from(params.days));
        for day in 0..usize::from(params.days) {
            let weather = weather_by_day
                .get(day)
                .map(String::as_str)
                .unwrap_or_default();
            let pool = self.day_pool(params, &by_category, &quota, weather, &mut rng);
            let mut selected = self
                .allocator
                .allocate(&pool, &mut used, &quota, &mut rng);
            if selected.len() * UNDERFILL_DEN < quota.max_total * UNDERFILL_NUM {
                warn!(
                    "day {} selected only {} of {} stops; running corrective pass",
                    day + 1,
                    selected.len(),
                    quota.max_total
                );
                self.corrective_pass(params, &pois, weather, &mut used, &quota, &mut selected, &mut rng);
            }
            days.push(self.sequence_day(params, selected, weather));
        }
        Ok(Itinerary::new(days))
    }

    /// Rank every enabled category pool for one day and merge the results,
    /// best first.
    fn day_pool(
        &self,
        params: &TripParams,
        by_category: &HashMap<Category, Vec<Poi>>,
        quota: &DayQuota,
        weather: &str,
        rng: &mut ChaCha8Rng,
    ) -> Vec<ScoredPoi> {
        let mut pool: Vec<ScoredPoi> = Vec::new();
        for category in Category::QUOTA_ORDER {
            if quota.target(category) == 0 {
                continue;
            }
            let Some(candidates) = by_category.get(&category) else {
                continue;
            };
            let ctx = context_for(params, category, weather);
            pool.extend(self.ranker.rank(candidates, &ctx, rng));
        }
        pool.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        pool
    }

    /// One category-blind top-up over the whole catalogue, still
    /// deduplicated against `used`.
    #[expect(
        clippy::too_many_arguments,
        reason = "the corrective pass touches every piece of day state once"
    )]
    fn corrective_pass(
        &self,
        params: &TripParams,
        pois: &[Poi],
        weather: &str,
        used: &mut HashSet<String>,
        quota: &DayQuota,
        selected: &mut Vec<Poi>,
        rng: &mut ChaCha8Rng,
    ) {
        let ctx = ScoreContext {
            top_k: pois.len(),
            ..context_for(params, Category::Unknown, weather)
        };
        let ranked = self.ranker.rank(pois, &ctx, rng);
        for sp in ranked {
            if selected.len() >= quota.max_total {
                break;
            }
            if used.insert(sp.unique_key()) {
                selected.push(sp.poi);
            }
        }
    }

    /// Order a day's stops and attach leg distances.
    fn sequence_day(&self, params: &TripParams, selected: Vec<Poi>, weather: &str) -> ItineraryDay {
        let weather = (!weather.is_empty()).then(|| weather.to_owned());
        if selected.len() < 2 {
            return ItineraryDay {
                stops: selected
                    .into_iter()
                    .map(|poi| PlannedStop {
                        poi,
                        next_distance_km: None,
                    })
                    .collect(),
                total_distance_km: 0.0,
                weather,
            };
        }
        let sequencer = RouteSequencer::with_strategy(&self.oracle, self.strategy);
        let route = sequencer.sequence(&params.city, &selected);
        let stops = route
            .order
            .iter()
            .enumerate()
            .filter_map(|(position, &index)| {
                selected.get(index).map(|poi| PlannedStop {
                    poi: poi.clone(),
                    next_distance_km: route.leg_distances_km.get(position).copied(),
                })
            })
            .collect();
        ItineraryDay {
            stops,
            total_distance_km: route.total_km,
            weather,
        }
    }
}

/// Split the sanitised catalogue by canonical category.
fn partition(pois: &[Poi]) -> HashMap<Category, Vec<Poi>> {
    let mut by_category: HashMap<Category, Vec<Poi>> = HashMap::new();
    for poi in pois {
        by_category.entry(poi.category).or_default().push(poi.clone());
    }
    by_category
}

/// The per-category score context for one day.
///
/// Per-category tag preferences become the soft filter; the ranked depth
/// grows with the trip so later days still see fresh candidates.
fn context_for(params: &TripParams, category: Category, weather: &str) -> ScoreContext {
    let tag_filter = match category {
        Category::Attraction => params.attraction_tags.clone(),
        Category::Entertainment => params.entertainment_tags.clone(),
        Category::Shopping => params.shopping_tags.clone(),
        Category::Food | Category::Cafe | Category::Unknown => Vec::new(),
    };
    let depth = usize::from(params.max_poi_per_day) * usize::from(params.days);
    ScoreContext {
        city: params.city.clone(),
        query: String::new(),
        taste_tags: params.taste_tags.clone(),
        activity_tags: params.activity_tags.clone(),
        budget_per_day: params.budget_per_day,
        weather: weather.to_owned(),
        tag_filter,
        top_k: DEFAULT_TOP_K.max(depth),
    }
}
