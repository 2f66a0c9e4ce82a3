//! Quota-constrained selection of one day's POIs.
//!
//! The allocator consumes a ranked pool and a [`DayQuota`], drawing per
//! category in score order while the shared used-key set guarantees that
//! no place is ever booked twice across the itinerary. Draws prefer
//! geotagged POIs; coordinate-less ones are a fallback so sparse datasets
//! still fill their days.

use std::collections::HashSet;
use std::hash::BuildHasher;

use geo::Coord;
use log::{debug, warn};
use rand::Rng;

use tripweaver_core::{Category, DayQuota, Poi, ScoredPoi};

/// Minimum food-plus-cafe stops per day, pool permitting.
const DINING_FLOOR: usize = 2;

/// Default minimum geotagged stops per day.
const MIN_GEOTAGGED_PER_DAY: usize = 3;

/// Maximum offset, in degrees, for synthesised coordinates.
const JITTER_DEGREES: f64 = 0.005;

/// Selects a day's POIs from a ranked pool under quota constraints.
///
/// The allocator is monotonic in the used-key set: it only ever inserts
/// keys, so once a POI has been drawn — or displaced after being drawn —
/// it can never reappear later in the same build.
#[derive(Debug, Clone, Copy)]
pub struct DailyAllocator {
    min_geotagged: usize,
}

impl Default for DailyAllocator {
    fn default() -> Self {
        Self {
            min_geotagged: MIN_GEOTAGGED_PER_DAY,
        }
    }
}

impl DailyAllocator {
    /// Construct with an explicit geotagged-per-day minimum.
    #[must_use]
    pub const fn with_min_geotagged(min_geotagged: usize) -> Self {
        Self { min_geotagged }
    }

    /// Pick one day's POIs.
    ///
    /// `pool` must already be ranked (highest score first); draws follow
    /// that order. Every drawn key is inserted into `used` immediately.
    /// When the pool cannot honour the quota the day comes back short
    /// rather than padded with fabricated entries.
    pub fn allocate<S: BuildHasher, R: Rng>(
        &self,
        pool: &[ScoredPoi],
        used: &mut HashSet<String, S>,
        quota: &DayQuota,
        rng: &mut R,
    ) -> Vec<Poi> {
        let mut selection: Vec<ScoredPoi> = Vec::with_capacity(quota.max_total);

        // Per-category targets, geotagged sub-pool first.
        for category in Category::QUOTA_ORDER {
            let target = quota.target(category);
            take(pool, used, &mut selection, target, |sp| {
                sp.poi.category == category && sp.poi.has_location()
            });
            let drawn = count_of(&selection, category);
            take(pool, used, &mut selection, target.saturating_sub(drawn), |sp| {
                sp.poi.category == category
            });
        }

        enforce_dining_floor(pool, used, &mut selection, quota);
        enforce_dining_ceiling(&mut selection, quota);
        fill_remaining(pool, used, &mut selection, quota);
        self.ensure_geotagged(pool, used, &mut selection, rng);

        if selection.len() < quota.max_total {
            debug!(
                "day under-filled: {} of {} slots",
                selection.len(),
                quota.max_total
            );
        }
        selection.into_iter().map(|sp| sp.poi).collect()
    }

    /// Step 5: guarantee a minimum number of geotagged stops.
    fn ensure_geotagged<S: BuildHasher, R: Rng>(
        &self,
        pool: &[ScoredPoi],
        used: &mut HashSet<String, S>,
        selection: &mut [ScoredPoi],
        rng: &mut R,
    ) {
        let wanted = self.min_geotagged.min(selection.len());
        // First try swapping in real coordinates from the leftover pool.
        while geotagged_count(selection) < wanted {
            let Some(slot) = lowest_scored(selection, |sp| !sp.poi.has_location()) else {
                return;
            };
            let Some(candidate) = next_unused(pool, used, |sp| sp.poi.has_location()) else {
                break;
            };
            used.insert(candidate.unique_key());
            if let Some(entry) = selection.get_mut(slot) {
                *entry = candidate.clone();
            }
        }
        // A sparse dataset may leave no swaps; approximate around the
        // day's centroid instead of dropping the guarantee entirely.
        let Some(centre) = centroid(selection) else {
            return;
        };
        while geotagged_count(selection) < wanted {
            let Some(slot) = lowest_scored(selection, |sp| !sp.poi.has_location()) else {
                return;
            };
            let Some(entry) = selection.get_mut(slot) else {
                return;
            };
            entry.poi.location = Some(jitter(centre, rng));
            entry.poi.location_approximate = true;
            warn!(
                "synthesised approximate coordinates for '{}'",
                entry.poi.name
            );
        }
    }
}

/// Step 3a: guarantee the dining floor by substitution.
fn enforce_dining_floor<S: BuildHasher>(
    pool: &[ScoredPoi],
    used: &mut HashSet<String, S>,
    selection: &mut Vec<ScoredPoi>,
    quota: &DayQuota,
) {
    let floor = DINING_FLOOR.min(quota.max_total);
    while dining_count(selection) < floor {
        let Some(candidate) = next_unused(pool, used, |sp| sp.poi.category.is_dining()) else {
            break;
        };
        used.insert(candidate.unique_key());
        if selection.len() < quota.max_total {
            selection.push(candidate.clone());
        } else if let Some(slot) = lowest_scored(selection, |sp| !sp.poi.category.is_dining()) {
            if let Some(entry) = selection.get_mut(slot) {
                *entry = candidate.clone();
            }
        } else {
            break;
        }
    }
}

/// Draw up to `limit` matching, unused POIs from the pool in order.
fn take<S: BuildHasher, F: Fn(&ScoredPoi) -> bool>(
    pool: &[ScoredPoi],
    used: &mut HashSet<String, S>,
    selection: &mut Vec<ScoredPoi>,
    limit: usize,
    matches: F,
) {
    if limit == 0 {
        return;
    }
    let mut taken = 0;
    for sp in pool {
        if taken == limit {
            break;
        }
        if !matches(sp) {
            continue;
        }
        if used.insert(sp.unique_key()) {
            selection.push(sp.clone());
            taken += 1;
        }
    }
}

fn next_unused<'a, F: Fn(&ScoredPoi) -> bool>(
    pool: &'a [ScoredPoi],
    used: &HashSet<String, impl BuildHasher>,
    matches: F,
) -> Option<&'a ScoredPoi> {
    pool.iter()
        .find(|sp| matches(sp) && !used.contains(&sp.unique_key()))
}

fn count_of(selection: &[ScoredPoi], category: Category) -> usize {
    selection
        .iter()
        .filter(|sp| sp.poi.category == category)
        .count()
}

fn dining_count(selection: &[ScoredPoi]) -> usize {
    selection
        .iter()
        .filter(|sp| sp.poi.category.is_dining())
        .count()
}

fn geotagged_count(selection: &[ScoredPoi]) -> usize {
    selection.iter().filter(|sp| sp.poi.has_location()).count()
}

/// Index of the lowest-scored entry satisfying `matches`.
fn lowest_scored<F: Fn(&ScoredPoi) -> bool>(selection: &[ScoredPoi], matches: F) -> Option<usize> {
    selection
        .iter()
        .enumerate()
        .filter(|(_, sp)| matches(sp))
        .min_by(|(_, a), (_, b)| a.final_score.total_cmp(&b.final_score))
        .map(|(index, _)| index)
}

/// Step 3b: trim dining back under the quota ceiling, cafe first.
fn enforce_dining_ceiling(selection: &mut Vec<ScoredPoi>, quota: &DayQuota) {
    let ceiling = quota.food_ceiling();
    while dining_count(selection) > ceiling {
        let victim = lowest_scored(selection, |sp| sp.poi.category == Category::Cafe)
            .or_else(|| lowest_scored(selection, |sp| sp.poi.category == Category::Food));
        let Some(index) = victim else { break };
        // The displaced key stays in the used set: monotonicity over
        // perfect reuse.
        selection.remove(index);
    }
}

/// Step 4: top up with non-dining first, then dining under the ceiling.
fn fill_remaining<S: BuildHasher>(
    pool: &[ScoredPoi],
    used: &mut HashSet<String, S>,
    selection: &mut Vec<ScoredPoi>,
    quota: &DayQuota,
) {
    let open = quota.max_total.saturating_sub(selection.len());
    take(pool, used, selection, open, |sp| {
        !sp.poi.category.is_dining() && sp.poi.has_location()
    });
    let open = quota.max_total.saturating_sub(selection.len());
    take(pool, used, selection, open, |sp| !sp.poi.category.is_dining());
    let ceiling = quota.food_ceiling();
    while selection.len() < quota.max_total && dining_count(selection) < ceiling {
        let Some(candidate) = next_unused(pool, used, |sp| sp.poi.category.is_dining()) else {
            break;
        };
        used.insert(candidate.unique_key());
        selection.push(candidate.clone());
    }
}

/// Mean location of the geotagged entries.
#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "averaging a handful of coordinates"
)]
fn centroid(selection: &[ScoredPoi]) -> Option<Coord<f64>> {
    let located: Vec<Coord<f64>> = selection.iter().filter_map(|sp| sp.poi.location).collect();
    if located.is_empty() {
        return None;
    }
    let n = located.len() as f64;
    Some(Coord {
        x: located.iter().map(|c| c.x).sum::<f64>() / n,
        y: located.iter().map(|c| c.y).sum::<f64>() / n,
    })
}

#[expect(clippy::float_arithmetic, reason = "offsetting the centroid")]
fn jitter<R: Rng>(centre: Coord<f64>, rng: &mut R) -> Coord<f64> {
    Coord {
        x: centre.x + rng.gen_range(-JITTER_DEGREES..=JITTER_DEGREES),
        y: centre.y + rng.gen_range(-JITTER_DEGREES..=JITTER_DEGREES),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    fn scored(poi: Poi, final_score: f32) -> ScoredPoi {
        ScoredPoi {
            poi,
            similarity: 0.0,
            budget_fit: 0.5,
            weather_fit: 1.0,
            final_score,
        }
    }

    fn located(name: &str, category: Category, score: f32, lat: f64) -> ScoredPoi {
        scored(
            Poi::new(name, category).with_location(lat, 106.7),
            score,
        )
    }

    /// Ample pool: ten food, five cafes, eight attractions, all geotagged.
    #[fixture]
    fn ample_pool() -> Vec<ScoredPoi> {
        let mut pool = Vec::new();
        for i in 0..10 {
            pool.push(located(&format!("food-{i}"), Category::Food, 0.9, 10.70 + f64::from(i) * 0.01));
        }
        for i in 0..5 {
            pool.push(located(&format!("cafe-{i}"), Category::Cafe, 0.8, 10.80 + f64::from(i) * 0.01));
        }
        for i in 0..8 {
            pool.push(located(&format!("att-{i}"), Category::Attraction, 0.7, 10.90 + f64::from(i) * 0.01));
        }
        pool
    }

    fn counts(selection: &[Poi]) -> (usize, usize, usize) {
        let of = |category: Category| {
            selection
                .iter()
                .filter(|poi| poi.category == category)
                .count()
        };
        (of(Category::Food), of(Category::Cafe), of(Category::Attraction))
    }

    #[rstest]
    fn fills_targets_exactly_from_an_ample_pool(ample_pool: Vec<ScoredPoi>) {
        let quota = DayQuota {
            food: 2,
            cafe: 1,
            attraction: 3,
            entertainment: 0,
            shopping: 0,
            max_total: 6,
        };
        let mut used = HashSet::new();
        let selection =
            DailyAllocator::default().allocate(&ample_pool, &mut used, &quota, &mut rng());
        assert_eq!(selection.len(), 6);
        assert_eq!(counts(&selection), (2, 1, 3));
        let keys: HashSet<String> = selection.iter().map(Poi::unique_key).collect();
        assert_eq!(keys.len(), 6);
    }

    #[rstest]
    fn consecutive_days_never_repeat_a_place(ample_pool: Vec<ScoredPoi>) {
        let quota = DayQuota {
            food: 2,
            cafe: 1,
            attraction: 3,
            entertainment: 0,
            shopping: 0,
            max_total: 6,
        };
        let allocator = DailyAllocator::default();
        let mut used = HashSet::new();
        let mut rng = rng();
        let day_one = allocator.allocate(&ample_pool, &mut used, &quota, &mut rng);
        let used_after_day_one = used.len();
        let day_two = allocator.allocate(&ample_pool, &mut used, &quota, &mut rng);
        assert!(used.len() >= used_after_day_one, "used keys only grow");
        let one: HashSet<String> = day_one.iter().map(Poi::unique_key).collect();
        let two: HashSet<String> = day_two.iter().map(Poi::unique_key).collect();
        assert!(one.is_disjoint(&two));
    }

    #[test]
    fn geotagged_candidates_win_over_higher_scores() {
        let pool = vec![
            scored(Poi::new("floating", Category::Attraction), 0.99),
            located("anchored-1", Category::Attraction, 0.5, 10.7),
            located("anchored-2", Category::Attraction, 0.4, 10.8),
        ];
        let quota = DayQuota {
            food: 0,
            cafe: 0,
            attraction: 2,
            entertainment: 0,
            shopping: 0,
            max_total: 2,
        };
        let mut used = HashSet::new();
        let selection = DailyAllocator::with_min_geotagged(0)
            .allocate(&pool, &mut used, &quota, &mut rng());
        let names: Vec<&str> = selection.iter().map(|poi| poi.name.as_str()).collect();
        assert_eq!(names, vec!["anchored-1", "anchored-2"]);
    }

    #[test]
    fn dining_floor_is_met_by_substitution() {
        let pool = vec![
            located("att-0", Category::Attraction, 0.9, 10.70),
            located("att-1", Category::Attraction, 0.8, 10.71),
            located("att-2", Category::Attraction, 0.7, 10.72),
            located("att-3", Category::Attraction, 0.6, 10.73),
            located("pho", Category::Food, 0.3, 10.74),
            located("espresso", Category::Cafe, 0.2, 10.75),
        ];
        let quota = DayQuota {
            food: 0,
            cafe: 0,
            attraction: 4,
            entertainment: 0,
            shopping: 0,
            max_total: 4,
        };
        let mut used = HashSet::new();
        let selection =
            DailyAllocator::default().allocate(&pool, &mut used, &quota, &mut rng());
        assert_eq!(selection.len(), 4);
        let dining = selection
            .iter()
            .filter(|poi| poi.category.is_dining())
            .count();
        assert_eq!(dining, 2);
        // The lowest-scored attractions were the ones displaced.
        assert!(selection.iter().any(|poi| poi.name == "att-0"));
        assert!(selection.iter().any(|poi| poi.name == "att-1"));
    }

    #[test]
    fn full_mix_day_caps_dining_at_the_ceiling() {
        let mut pool = vec![
            located("food-0", Category::Food, 0.9, 10.70),
            located("food-1", Category::Food, 0.85, 10.71),
            located("food-2", Category::Food, 0.8, 10.72),
            located("cafe-0", Category::Cafe, 0.75, 10.73),
            located("cafe-1", Category::Cafe, 0.7, 10.74),
            located("mall", Category::Shopping, 0.6, 10.75),
            located("mall-2", Category::Shopping, 0.55, 10.76),
        ];
        for i in 0..4 {
            pool.push(located(
                &format!("att-{i}"),
                Category::Attraction,
                0.5,
                10.80 + f64::from(i) * 0.01,
            ));
        }
        // Shopping plus attraction slots: a full-mix day with a ceiling of
        // max(2, floor(0.4 * 6)) = 2 dining stops.
        let quota = DayQuota {
            food: 2,
            cafe: 1,
            attraction: 2,
            entertainment: 0,
            shopping: 1,
            max_total: 6,
        };
        assert!(quota.is_full_mix());
        let mut used = HashSet::new();
        let selection =
            DailyAllocator::default().allocate(&pool, &mut used, &quota, &mut rng());
        assert_eq!(selection.len(), 6);
        let dining = selection
            .iter()
            .filter(|poi| poi.category.is_dining())
            .count();
        assert!(dining <= quota.food_ceiling());
        assert!(dining >= 2);
    }

    #[test]
    fn sparse_geotags_are_synthesised_around_the_centroid() {
        let pool = vec![
            scored(Poi::new("att-a", Category::Attraction), 0.9),
            scored(Poi::new("att-b", Category::Attraction), 0.8),
            scored(Poi::new("att-c", Category::Attraction), 0.7),
            located("food-a", Category::Food, 0.6, 10.70),
            located("food-b", Category::Food, 0.5, 10.80),
        ];
        let quota = DayQuota {
            food: 0,
            cafe: 0,
            attraction: 3,
            entertainment: 0,
            shopping: 0,
            max_total: 3,
        };
        let mut used = HashSet::new();
        let selection =
            DailyAllocator::default().allocate(&pool, &mut used, &quota, &mut rng());
        assert_eq!(selection.len(), 3);
        assert!(selection.iter().all(Poi::has_location));
        let synthesised: Vec<&Poi> = selection
            .iter()
            .filter(|poi| poi.location_approximate)
            .collect();
        assert_eq!(synthesised.len(), 1);
        let centre_y = f64::midpoint(10.70, 10.80);
        let approx = synthesised[0].location.expect("just synthesised");
        assert!((approx.y - centre_y).abs() <= JITTER_DEGREES + 1e-12);
        assert!((approx.x - 106.7).abs() <= JITTER_DEGREES + 1e-12);
    }

    #[test]
    fn a_thin_pool_yields_a_short_day_not_padding() {
        let pool = vec![
            located("att-0", Category::Attraction, 0.9, 10.70),
            located("att-1", Category::Attraction, 0.8, 10.71),
        ];
        let quota = DayQuota {
            food: 2,
            cafe: 1,
            attraction: 2,
            entertainment: 1,
            shopping: 0,
            max_total: 6,
        };
        let mut used = HashSet::new();
        let selection =
            DailyAllocator::default().allocate(&pool, &mut used, &quota, &mut rng());
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn empty_pool_is_an_empty_day() {
        let quota = DayQuota {
            food: 2,
            cafe: 0,
            attraction: 2,
            entertainment: 0,
            shopping: 0,
            max_total: 4,
        };
        let mut used = HashSet::new();
        let selection = DailyAllocator::default().allocate(&[], &mut used, &quota, &mut rng());
        assert!(selection.is_empty());
        assert!(used.is_empty());
    }
}
