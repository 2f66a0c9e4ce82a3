//! Per-day category quotas derived from trip preferences.
//!
//! Food is essential and always gets at least two slots; cafe and shopping
//! are optional single slots; attraction and entertainment share whatever
//! remains. The allocator treats these as targets, not guarantees — a thin
//! pool yields a shorter day.

use crate::{Category, TripParams};

/// Target POI counts per category for one day.
///
/// # Examples
/// ```
/// use tripweaver_core::{DayQuota, TripParams};
///
/// let quota = DayQuota::derive(&TripParams::default());
/// assert_eq!(quota.total(), usize::from(TripParams::default().max_poi_per_day));
/// assert!(quota.food >= 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayQuota {
    /// Food slots; at least two whenever the day bound allows.
    pub food: usize,
    /// Cafe slots, zero or one.
    pub cafe: usize,
    /// Attraction slots.
    pub attraction: usize,
    /// Entertainment slots.
    pub entertainment: usize,
    /// Shopping slots, zero or one.
    pub shopping: usize,
    /// Upper bound on the day's total POI count.
    pub max_total: usize,
}

impl DayQuota {
    /// Derive the distribution from trip preferences.
    ///
    /// Slot order: two food slots first, then the optional cafe and
    /// shopping singles, then attraction/entertainment split the rest
    /// (evenly when both are enabled, attraction taking the odd slot).
    /// Slots nobody claims fall back to food.
    #[must_use]
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "slot splitting is integral by construction"
    )]
    pub fn derive(params: &TripParams) -> Self {
        let max_total = usize::from(params.max_poi_per_day);
        let food = max_total.min(2);
        let cafe = usize::from(params.do_cafe && max_total > food);
        let shopping = usize::from(params.do_shopping && max_total > food + cafe);
        let shared = max_total - food - cafe - shopping;
        let (attraction, entertainment) = match (params.do_attraction, params.do_entertainment) {
            (true, true) => (shared - shared / 2, shared / 2),
            (true, false) => (shared, 0),
            (false, true) => (0, shared),
            (false, false) => (0, 0),
        };
        let unclaimed = shared - attraction - entertainment;
        Self {
            food: food + unclaimed,
            cafe,
            attraction,
            entertainment,
            shopping,
            max_total,
        }
    }

    /// Target for one category; [`Category::Unknown`] has none.
    #[must_use]
    pub const fn target(&self, category: Category) -> usize {
        match category {
            Category::Food => self.food,
            Category::Cafe => self.cafe,
            Category::Attraction => self.attraction,
            Category::Entertainment => self.entertainment,
            Category::Shopping => self.shopping,
            Category::Unknown => 0,
        }
    }

    /// Sum of all category targets.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.food + self.cafe + self.attraction + self.entertainment + self.shopping
    }

    /// A "full mix" day plans shopping alongside at least one of
    /// attraction/entertainment, which tightens the food ceiling.
    #[must_use]
    pub const fn is_full_mix(&self) -> bool {
        self.shopping >= 1 && (self.attraction >= 1 || self.entertainment >= 1)
    }

    /// Upper bound on food slots, keeping days from being food-dominated.
    ///
    /// Full mix: 40% of the day bound, capped at four. Otherwise a softer
    /// 50% cap. Never below the dining floor of two.
    #[must_use]
    #[expect(
        clippy::integer_division,
        clippy::integer_division_remainder_used,
        reason = "percentage caps round down to whole slots"
    )]
    pub const fn food_ceiling(&self) -> usize {
        let cap = if self.is_full_mix() {
            let two_fifths = self.max_total * 2 / 5;
            if two_fifths > 4 { 4 } else { two_fifths }
        } else {
            self.max_total / 2
        };
        if cap < 2 { 2 } else { cap }
    }
}
