//! Composite relevance ranking for Tripweaver points of interest.
//!
//! [`RelevanceRanker`] scores a candidate pool against a
//! [`ScoreContext`]: TF-IDF text similarity over name, tags and
//! description; closeness of the average cost to a per-activity budget
//! target; a weather penalty for outdoor-leaning places on rainy days;
//! and smaller rating and image signals. A soft tag filter narrows the
//! pool first but is dropped entirely rather than emptying it.
//!
//! Ties are broken by an injected RNG: the pool is shuffled before a
//! stable sort on the composite score, so equal-scoring POIs are not
//! ordered by their position in the input.
//!
//! # Examples
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use tripweaver_core::{Category, Poi, ScoreContext};
//! use tripweaver_scorer::RelevanceRanker;
//!
//! let pois = vec![
//!     Poi::new("War Remnants Museum", Category::Attraction).with_tags(&["history", "museum"]),
//!     Poi::new("Secret Garden", Category::Food).with_tags(&["vietnamese", "rooftop"]),
//! ];
//! let ctx = ScoreContext {
//!     city: "Ho Chi Minh City".into(),
//!     query: "history museum".into(),
//!     ..ScoreContext::default()
//! };
//! let mut rng = StdRng::seed_from_u64(7);
//! let ranked = RelevanceRanker::default().rank(&pois, &ctx, &mut rng);
//! assert_eq!(ranked[0].poi.name, "War Remnants Museum");
//! ```

#![forbid(unsafe_code)]

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use tripweaver_core::{Category, Poi, ScoreContext, ScoredPoi};

mod tfidf;

use tfidf::{TfidfModel, cosine};

/// Tags that mark a POI as weather-exposed.
const OUTDOOR_HINTS: [&str; 6] = ["park", "garden", "viewpoint", "beach", "lake", "outdoor"];

/// Substrings of a weather description that trigger the outdoor penalty.
const RAIN_MARKERS: [&str; 4] = ["rain", "storm", "shower", "drizzle"];

/// Weather multiplier applied to outdoor-leaning POIs on rainy days.
const WEATHER_PENALTY: f32 = 0.6;

/// Budget fit assigned when a POI carries no cost data.
const NEUTRAL_BUDGET_FIT: f32 = 0.5;

/// A day's budget is spread over roughly this many paid activities.
const PAID_ACTIVITIES_PER_DAY: f64 = 3.0;

/// Rating values are normalised against this scale.
const RATING_SCALE: f64 = 5.0;

/// Hard cap on the number of ranked candidates returned.
const MAX_TOP_K: usize = 50;

/// Relative weights of the score components.
///
/// The defaults favour text relevance, with budget and weather as
/// moderating signals and rating/image as weak preferences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankWeights {
    /// Weight of the TF-IDF similarity component.
    pub similarity: f32,
    /// Weight of the budget-fit component.
    pub budget_fit: f32,
    /// Weight of the weather-fit component.
    pub weather_fit: f32,
    /// Weight of the normalised rating.
    pub rating: f32,
    /// Weight of the has-image signal.
    pub image: f32,
    /// Additive boost for dining POIs matching the caller's taste tags.
    pub taste_boost: f32,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self {
            similarity: 0.55,
            budget_fit: 0.20,
            weather_fit: 0.15,
            rating: 0.10,
            image: 0.05,
            taste_boost: 0.05,
        }
    }
}

/// Ranks candidate POIs for a query context.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceRanker {
    weights: RankWeights,
}

impl RelevanceRanker {
    /// Construct a ranker with explicit weights.
    #[must_use]
    pub const fn with_weights(weights: RankWeights) -> Self {
        Self { weights }
    }

    /// Score and order a candidate pool.
    ///
    /// Returns at most `ctx.top_k` (capped at 50) POIs, highest composite
    /// score first. An empty pool yields an empty result; a tag filter
    /// that would eliminate every candidate is ignored.
    #[expect(
        clippy::float_arithmetic,
        reason = "composite scoring is weighted float maths"
    )]
    pub fn rank<R: Rng>(&self, pois: &[Poi], ctx: &ScoreContext, rng: &mut R) -> Vec<ScoredPoi> {
        if pois.is_empty() {
            return Vec::new();
        }
        let candidates = soft_tag_filter(pois, &ctx.tag_filter);
        let similarities = text_similarities(&candidates, ctx);
        let budget_fits = budget_fits(&candidates, ctx.budget_per_day);
        let taste: Vec<String> = normalise_tags(&ctx.taste_tags);

        let mut scored: Vec<ScoredPoi> = candidates
            .iter()
            .zip(similarities)
            .zip(budget_fits)
            .map(|((poi, similarity), budget_fit)| {
                let weather_fit = weather_fit(poi, &ctx.weather);
                let mut final_score = self.weights.similarity * similarity
                    + self.weights.budget_fit * budget_fit
                    + self.weights.weather_fit * weather_fit
                    + self.weights.rating * rating_signal(poi)
                    + self.weights.image * f32::from(u8::from(poi.has_image()));
                if poi.category.is_dining() && poi.tags_intersect(&taste) {
                    final_score += self.weights.taste_boost;
                }
                ScoredPoi {
                    poi: (*poi).clone(),
                    similarity,
                    budget_fit,
                    weather_fit,
                    final_score,
                }
            })
            .collect();

        scored.shuffle(rng);
        scored.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        scored.truncate(ctx.top_k.min(MAX_TOP_K));
        scored
    }
}

fn normalise_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Keep POIs whose tags intersect the filter or whose raw tag text
/// contains a filter term. Dropping everyone drops the filter instead.
fn soft_tag_filter<'a>(pois: &'a [Poi], tag_filter: &[String]) -> Vec<&'a Poi> {
    let wanted = normalise_tags(tag_filter);
    if wanted.is_empty() {
        return pois.iter().collect();
    }
    let matched: Vec<&Poi> = pois
        .iter()
        .filter(|poi| {
            poi.tags_intersect(&wanted) || wanted.iter().any(|w| poi.tag_text.contains(w))
        })
        .collect();
    if matched.is_empty() {
        debug!("tag filter {wanted:?} matched nothing; keeping the full pool");
        pois.iter().collect()
    } else {
        matched
    }
}

fn text_similarities(candidates: &[&Poi], ctx: &ScoreContext) -> Vec<f32> {
    let texts: Vec<String> = candidates
        .iter()
        .map(|poi| {
            format!(
                "{} {} {}",
                poi.name,
                poi.tag_text,
                poi.description.as_deref().unwrap_or("")
            )
        })
        .collect();
    TfidfModel::fit(&texts).map_or_else(
        || vec![0.0; candidates.len()],
        |model| {
            let query = model.vector(&ctx.query_text());
            texts
                .iter()
                .map(|text| cosine(&query, &model.vector(text)))
                .collect()
        },
    )
}

/// Score cost proximity to one-third of the daily budget.
///
/// The deviation is normalised by the worst deviation in the pool, so the
/// component is relative to the candidates at hand. Pools without any cost
/// data score neutrally.
#[expect(
    clippy::cast_possible_truncation,
    clippy::float_arithmetic,
    reason = "fit values are small ratios; f32 precision is ample"
)]
fn budget_fits(candidates: &[&Poi], budget_per_day: f64) -> Vec<f32> {
    let target = budget_per_day / PAID_ACTIVITIES_PER_DAY;
    let deviations: Vec<Option<f64>> = candidates
        .iter()
        .map(|poi| poi.avg_cost.map(|cost| (cost - target).abs()))
        .collect();
    let max_deviation = deviations
        .iter()
        .flatten()
        .copied()
        .fold(f64::NAN, f64::max);
    if !max_deviation.is_finite() {
        return vec![NEUTRAL_BUDGET_FIT; candidates.len()];
    }
    let scale = max_deviation.max(1.0);
    deviations
        .into_iter()
        .map(|deviation| {
            deviation.map_or(NEUTRAL_BUDGET_FIT, |dev| {
                ((1.0 - dev / scale).clamp(0.0, 1.0)) as f32
            })
        })
        .collect()
}

/// Penalise outdoor-leaning POIs when the day's weather mentions rain.
fn weather_fit(poi: &Poi, weather: &str) -> f32 {
    if weather.is_empty() {
        return 1.0;
    }
    let lowered = weather.to_lowercase();
    if !RAIN_MARKERS.iter().any(|m| lowered.contains(m)) {
        return 1.0;
    }
    let outdoor = poi
        .tags
        .iter()
        .any(|t| OUTDOOR_HINTS.contains(&t.as_str()));
    if poi.category == Category::Attraction || outdoor {
        WEATHER_PENALTY
    } else {
        1.0
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::float_arithmetic,
    reason = "ratings are tiny values normalised into [0, 1]"
)]
fn rating_signal(poi: &Poi) -> f32 {
    poi.rating
        .map_or(0.0, |r| ((r / RATING_SCALE).clamp(0.0, 1.0)) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[fixture]
    fn mixed_pool() -> Vec<Poi> {
        vec![
            Poi::new("War Remnants Museum", Category::Attraction)
                .with_tags(&["history", "museum"])
                .with_rating(4.6),
            Poi::new("Saigon Seafood House", Category::Food)
                .with_tags(&["seafood", "dinner"])
                .with_cost(400_000.0),
            Poi::new("Turtle Lake Cafe", Category::Cafe).with_tags(&["coffee", "outdoor"]),
            Poi::new("Landmark 81 SkyView", Category::Attraction).with_tags(&["viewpoint"]),
            Poi::new("Ben Thanh Market", Category::Shopping).with_tags(&["market", "souvenirs"]),
        ]
    }

    #[rstest]
    fn empty_pool_is_an_empty_result(#[from(mixed_pool)] _pool: Vec<Poi>) {
        let ranked = RelevanceRanker::default().rank(&[], &ScoreContext::default(), &mut rng());
        assert!(ranked.is_empty());
    }

    #[rstest]
    fn empty_tag_filter_keeps_the_whole_pool(mixed_pool: Vec<Poi>) {
        let ctx = ScoreContext {
            city: "X".into(),
            ..ScoreContext::default()
        };
        let ranked = RelevanceRanker::default().rank(&mixed_pool, &ctx, &mut rng());
        assert_eq!(ranked.len(), mixed_pool.len());
    }

    #[rstest]
    fn hopeless_tag_filter_is_dropped(mixed_pool: Vec<Poi>) {
        let ctx = ScoreContext {
            tag_filter: vec!["submarine".into()],
            ..ScoreContext::default()
        };
        let ranked = RelevanceRanker::default().rank(&mixed_pool, &ctx, &mut rng());
        assert_eq!(ranked.len(), mixed_pool.len());
    }

    #[rstest]
    fn matching_tag_filter_narrows_the_pool(mixed_pool: Vec<Poi>) {
        let ctx = ScoreContext {
            tag_filter: vec!["seafood".into()],
            ..ScoreContext::default()
        };
        let ranked = RelevanceRanker::default().rank(&mixed_pool, &ctx, &mut rng());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].poi.name, "Saigon Seafood House");
    }

    #[rstest]
    fn query_text_drives_the_top_result(mixed_pool: Vec<Poi>) {
        let ctx = ScoreContext {
            query: "history museum".into(),
            ..ScoreContext::default()
        };
        let ranked = RelevanceRanker::default().rank(&mixed_pool, &ctx, &mut rng());
        assert_eq!(ranked[0].poi.name, "War Remnants Museum");
    }

    #[test]
    fn rainy_weather_penalises_outdoor_places_only() {
        let museum = Poi::new("museum", Category::Attraction);
        let cafe = Poi::new("indoor cafe", Category::Cafe);
        let garden_cafe = Poi::new("garden cafe", Category::Cafe).with_tags(&["garden"]);
        assert_eq!(weather_fit(&museum, "heavy rain"), WEATHER_PENALTY);
        assert_eq!(weather_fit(&garden_cafe, "thundery showers"), WEATHER_PENALTY);
        assert_eq!(weather_fit(&cafe, "heavy rain"), 1.0);
        assert_eq!(weather_fit(&museum, "clear sky"), 1.0);
        assert_eq!(weather_fit(&museum, ""), 1.0);
    }

    #[test]
    fn costless_pool_scores_neutral_budget_fit() {
        let pois = vec![
            Poi::new("a", Category::Food),
            Poi::new("b", Category::Food),
        ];
        let refs: Vec<&Poi> = pois.iter().collect();
        assert_eq!(
            budget_fits(&refs, 900_000.0),
            vec![NEUTRAL_BUDGET_FIT, NEUTRAL_BUDGET_FIT]
        );
    }

    #[test]
    fn budget_fit_prefers_costs_near_a_third_of_budget() {
        let pois = vec![
            Poi::new("on target", Category::Food).with_cost(300_000.0),
            Poi::new("splurge", Category::Food).with_cost(900_000.0),
        ];
        let refs: Vec<&Poi> = pois.iter().collect();
        let fits = budget_fits(&refs, 900_000.0);
        assert!(fits[0] > fits[1]);
        assert_eq!(fits[1], 0.0);
    }

    #[rstest]
    fn taste_overlap_boosts_dining(#[from(mixed_pool)] _pool: Vec<Poi>) {
        let pois = vec![
            Poi::new("grill", Category::Food).with_tags(&["seafood"]),
            Poi::new("grill", Category::Food).with_tags(&["noodles"]),
        ];
        let ctx = ScoreContext {
            taste_tags: vec!["Seafood".into()],
            ..ScoreContext::default()
        };
        let ranked = RelevanceRanker::default().rank(&pois, &ctx, &mut rng());
        assert_eq!(ranked[0].poi.tags, vec!["seafood"]);
        assert!(ranked[0].final_score > ranked[1].final_score);
    }

    #[rstest]
    fn ranking_is_reproducible_for_a_fixed_seed(mixed_pool: Vec<Poi>) {
        let ctx = ScoreContext::default();
        let ranker = RelevanceRanker::default();
        let first = ranker.rank(&mixed_pool, &ctx, &mut rng());
        let second = ranker.rank(&mixed_pool, &ctx, &mut rng());
        let names = |ranked: &[tripweaver_core::ScoredPoi]| {
            ranked.iter().map(|s| s.poi.name.clone()).collect::<Vec<_>>()
        };
        assert_eq!(names(&first), names(&second));
    }

    #[rstest]
    fn scores_are_sorted_descending(mixed_pool: Vec<Poi>) {
        let ctx = ScoreContext {
            query: "market".into(),
            ..ScoreContext::default()
        };
        let ranked = RelevanceRanker::default().rank(&mixed_pool, &ctx, &mut rng());
        for pair in ranked.windows(2) {
            assert!(pair[0].final_score >= pair[1].final_score);
        }
    }
}
