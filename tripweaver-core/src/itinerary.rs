//! Itineraries: ordered days of ordered stops with realised distances.

use crate::Poi;

/// One POI in a day's visiting order, with the distance to the next stop.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedStop {
    /// The place to visit.
    pub poi: Poi,
    /// Road (or great-circle) kilometres to the following stop; `None` on
    /// the day's last stop.
    pub next_distance_km: Option<f64>,
}

/// One day of the itinerary.
///
/// # Examples
/// ```
/// use tripweaver_core::ItineraryDay;
///
/// let day = ItineraryDay::empty(Some("light rain".into()));
/// assert!(day.stops.is_empty());
/// assert_eq!(day.total_distance_km, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItineraryDay {
    /// Stops in visiting order.
    pub stops: Vec<PlannedStop>,
    /// Sum of consecutive leg distances along the visiting order.
    pub total_distance_km: f64,
    /// Weather summary used when this day's selection was penalised.
    pub weather: Option<String>,
}

impl ItineraryDay {
    /// Construct a day with no stops and zero distance.
    #[must_use]
    pub const fn empty(weather: Option<String>) -> Self {
        Self {
            stops: Vec::new(),
            total_distance_km: 0.0,
            weather,
        }
    }

    /// Deduplication keys of this day's stops, in visiting order.
    #[must_use]
    pub fn unique_keys(&self) -> impl Iterator<Item = String> + '_ {
        self.stops.iter().map(|stop| stop.poi.unique_key())
    }
}

/// The full multi-day result of one build.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Itinerary {
    /// One entry per requested day, in order.
    pub days: Vec<ItineraryDay>,
}

impl Itinerary {
    /// Wrap the built days.
    #[must_use]
    pub const fn new(days: Vec<ItineraryDay>) -> Self {
        Self { days }
    }

    /// Total stops across all days.
    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.days.iter().map(|day| day.stops.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    #[test]
    fn day_reports_keys_in_visiting_order() {
        let day = ItineraryDay {
            stops: vec![
                PlannedStop {
                    poi: Poi::new("A", Category::Food),
                    next_distance_km: Some(1.2),
                },
                PlannedStop {
                    poi: Poi::new("B", Category::Cafe),
                    next_distance_km: None,
                },
            ],
            total_distance_km: 1.2,
            weather: None,
        };
        let keys: Vec<_> = day.unique_keys().collect();
        assert_eq!(keys.len(), 2);
        assert!(keys[0].starts_with("a@"));
    }

    #[test]
    fn itinerary_counts_stops_across_days() {
        let one = ItineraryDay {
            stops: vec![PlannedStop {
                poi: Poi::new("A", Category::Food),
                next_distance_km: None,
            }],
            total_distance_km: 0.0,
            weather: None,
        };
        let itinerary = Itinerary::new(vec![one.clone(), ItineraryDay::empty(None), one]);
        assert_eq!(itinerary.stop_count(), 2);
    }
}
