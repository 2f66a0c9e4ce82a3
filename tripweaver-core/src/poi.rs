//! Points of interest: the raw catalogue row and its canonical form.
//!
//! Coordinates are WGS84 with `x = longitude` and `y = latitude`. The
//! planner never trusts upstream normalisation: [`Poi::from_record`]
//! re-applies the full sanitation pass even when the ingestion collaborator
//! claims to have done so.

use geo::Coord;

use crate::Category;
use crate::sanitise;

/// One row of a source catalogue, before sanitation.
///
/// Every field that sources routinely mangle is a string here; the
/// numeric interpretations live on [`Poi`]. Unknown columns are ignored at
/// the deserialisation boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoiRecord {
    /// Display name; may be blank.
    pub name: Option<String>,
    /// Free-form category string.
    pub category: Option<String>,
    /// Delimited tag field (`,`, `;` or `|`).
    pub tag: Option<String>,
    /// Longer descriptive text.
    pub description: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Latitude as exported, possibly locale-mangled.
    pub lat: Option<String>,
    /// Longitude as exported, possibly locale-mangled.
    pub lon: Option<String>,
    /// Average cost in local currency, with possible currency noise.
    pub avg_cost: Option<String>,
    /// Review rating, nominally on a 0–5 scale.
    pub rating: Option<String>,
    /// Primary image URL.
    pub image_url1: Option<String>,
    /// Secondary image URL.
    pub image_url2: Option<String>,
    /// Stable identifier from the source system, when present.
    pub external_id: Option<String>,
}

/// A sanitised point of interest.
///
/// Instances are read-only inputs to one itinerary build; scoring works on
/// copies and the catalogue is never mutated.
///
/// # Examples
/// ```
/// use tripweaver_core::{Category, Poi};
///
/// let poi = Poi::new("Ben Thanh Market", Category::Shopping).with_location(10.772, 106.698);
/// assert!(poi.has_location());
/// assert!(poi.unique_key().starts_with("ben-thanh-market@"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Poi {
    /// Non-empty display name.
    pub name: String,
    /// Canonical category.
    pub category: Category,
    /// Lowercase tags split from the raw tag field.
    pub tags: Vec<String>,
    /// The raw tag field, lowercased, kept for substring filters.
    pub tag_text: String,
    /// Position, when the source coordinates survived repair.
    pub location: Option<Coord<f64>>,
    /// True when `location` was synthesised rather than observed.
    pub location_approximate: bool,
    /// Average cost in local currency.
    pub avg_cost: Option<f64>,
    /// Review rating, nominally 0–5.
    pub rating: Option<f64>,
    /// Longer descriptive text.
    pub description: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Primary image URL.
    pub image_url1: Option<String>,
    /// Secondary image URL.
    pub image_url2: Option<String>,
    /// Stable identifier from the source system.
    pub external_id: Option<String>,
}

/// Grid resolution for the coordinate part of [`Poi::unique_key`], degrees.
const KEY_GRID_DECIMALS: usize = 3;

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

impl Poi {
    /// Construct a minimal POI; the remaining fields start empty.
    #[must_use]
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            tags: Vec::new(),
            tag_text: String::new(),
            location: None,
            location_approximate: false,
            avg_cost: None,
            rating: None,
            description: None,
            address: None,
            image_url1: None,
            image_url2: None,
            external_id: None,
        }
    }

    /// Set the location from latitude and longitude, consuming `self`.
    #[must_use]
    pub fn with_location(mut self, lat: f64, lon: f64) -> Self {
        self.location = Some(Coord { x: lon, y: lat });
        self
    }

    /// Set tags from slices, consuming `self`. Updates `tag_text` to match.
    #[must_use]
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tag_text = tags.join(", ").to_lowercase();
        self.tags = tags.iter().map(|t| t.to_lowercase()).collect();
        self
    }

    /// Set the average cost, consuming `self`.
    #[must_use]
    pub fn with_cost(mut self, avg_cost: f64) -> Self {
        self.avg_cost = Some(avg_cost);
        self
    }

    /// Set the rating, consuming `self`.
    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Set the primary image URL, consuming `self`.
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url1 = Some(url.into());
        self
    }

    /// Set the external identifier, consuming `self`.
    #[must_use]
    pub fn with_external_id(mut self, id: impl Into<String>) -> Self {
        self.external_id = Some(id.into());
        self
    }

    /// Sanitise one catalogue row.
    ///
    /// The name falls back to the external id, then the address, then a
    /// synthetic `poi-{row}` label, so it is always non-empty. Coordinate,
    /// cost and rating fields go through the repair helpers and end up
    /// `None` rather than erroring.
    #[must_use]
    pub fn from_record(record: &PoiRecord, row: usize) -> Self {
        let name = non_blank(record.name.as_deref())
            .or_else(|| non_blank(record.external_id.as_deref()))
            .or_else(|| non_blank(record.address.as_deref()))
            .unwrap_or_else(|| format!("poi-{row}"));
        let category = record
            .category
            .as_deref()
            .map_or(Category::Unknown, Category::canonicalise);
        let raw_tag = record.tag.as_deref().unwrap_or("");
        let lat = record.lat.as_deref().and_then(sanitise::repair_coordinate);
        let lon = record.lon.as_deref().and_then(sanitise::repair_coordinate);
        let location = lat
            .zip(lon)
            .filter(|(y, x)| y.is_finite() && x.is_finite())
            .map(|(y, x)| Coord { x, y });
        Self {
            name,
            category,
            tags: sanitise::split_tags(raw_tag),
            tag_text: raw_tag.to_lowercase(),
            location,
            location_approximate: false,
            avg_cost: record.avg_cost.as_deref().and_then(sanitise::parse_cost),
            rating: record.rating.as_deref().and_then(sanitise::parse_rating),
            description: non_blank(record.description.as_deref()),
            address: non_blank(record.address.as_deref()),
            image_url1: non_blank(record.image_url1.as_deref()),
            image_url2: non_blank(record.image_url2.as_deref()),
            external_id: non_blank(record.external_id.as_deref()),
        }
    }

    /// Deduplication fingerprint: name slug, coordinates quantised to a
    /// 0.001° grid, and the external id when present.
    ///
    /// Two POIs with equal keys are the same real-world place and must not
    /// both appear in one itinerary.
    #[must_use]
    pub fn unique_key(&self) -> String {
        let geo_part = self.location.map_or_else(
            || "?".to_owned(),
            |c| format!("{:.prec$},{:.prec$}", c.y, c.x, prec = KEY_GRID_DECIMALS),
        );
        let id_part = self.external_id.as_deref().unwrap_or("");
        format!("{}@{}#{}", sanitise::slug(&self.name), geo_part, id_part)
    }

    /// True when the POI has usable coordinates.
    #[must_use]
    pub const fn has_location(&self) -> bool {
        self.location.is_some()
    }

    /// True when the primary image URL looks fetchable.
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image_url1
            .as_deref()
            .is_some_and(|u| u.starts_with("http://") || u.starts_with("https://"))
    }

    /// True when any of the POI's tags appears in `wanted` (both lowercase).
    #[must_use]
    pub fn tags_intersect(&self, wanted: &[String]) -> bool {
        self.tags.iter().any(|t| wanted.contains(t))
    }
}

/// A POI together with its per-query score components.
///
/// Produced by the ranker, consumed by the allocator; never persisted and
/// recomputed for every query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPoi {
    /// The underlying POI.
    pub poi: Poi,
    /// TF-IDF cosine similarity to the query text.
    pub similarity: f32,
    /// Closeness of `avg_cost` to the per-activity budget target.
    pub budget_fit: f32,
    /// Weather suitability multiplier input.
    pub weather_fit: f32,
    /// Composite ranking score.
    pub final_score: f32,
}

impl ScoredPoi {
    /// Shorthand for the underlying POI's deduplication key.
    #[must_use]
    pub fn unique_key(&self) -> String {
        self.poi.unique_key()
    }
}
