//! Canonical POI categories.
//!
//! Upstream catalogues carry free-form category strings; the planner only
//! reasons about this fixed set. [`Category::canonicalise`] maps arbitrary
//! source strings into it by keyword matching.
//!
//! # Examples
//! ```
//! use tripweaver_core::Category;
//!
//! assert_eq!(Category::canonicalise("Seafood Restaurant"), Category::Food);
//! assert_eq!(Category::Cafe.as_str(), "cafe");
//! ```
/// Canonical POI category the planner reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Category {
    /// Restaurants and other places to eat.
    Food,
    /// Coffee shops; tracked separately from food in day quotas.
    Cafe,
    /// Theatres, cinemas, arcades and similar venues.
    Entertainment,
    /// Sights: museums, landmarks, parks, temples, beaches.
    Attraction,
    /// Malls, markets and boutiques.
    Shopping,
    /// Anything the keyword matcher could not place.
    Unknown,
}

const FOOD_KEYWORDS: [&str; 3] = ["restaurant", "eatery", "food"];
const CAFE_KEYWORDS: [&str; 2] = ["cafe", "coffee"];
const ENTERTAINMENT_KEYWORDS: [&str; 6] = [
    "entertainment",
    "theater",
    "cinema",
    "amusement",
    "game",
    "arcade",
];
const ATTRACTION_KEYWORDS: [&str; 8] = [
    "attraction",
    "museum",
    "landmark",
    "park",
    "sightseeing",
    "temple",
    "church",
    "beach",
];
const SHOPPING_KEYWORDS: [&str; 5] = ["shopping", "mall", "market", "boutique", "store"];

impl Category {
    /// Every category that can carry a day-quota target.
    ///
    /// Listed in allocation order: dining first, then the slot-sharing
    /// categories.
    pub const QUOTA_ORDER: [Self; 5] = [
        Self::Food,
        Self::Cafe,
        Self::Attraction,
        Self::Entertainment,
        Self::Shopping,
    ];

    /// Return the category as a lowercase `&str`.
    ///
    /// # Examples
    /// ```
    /// use tripweaver_core::Category;
    ///
    /// assert_eq!(Category::Attraction.as_str(), "attraction");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Cafe => "cafe",
            Self::Entertainment => "entertainment",
            Self::Attraction => "attraction",
            Self::Shopping => "shopping",
            Self::Unknown => "unknown",
        }
    }

    /// True for the categories that count towards the dining floor.
    #[must_use]
    pub const fn is_dining(self) -> bool {
        matches!(self, Self::Food | Self::Cafe)
    }

    /// Map a free-form source category string into the canonical set.
    ///
    /// Exact canonical names win; otherwise the first keyword family with a
    /// substring match decides. Unmatched strings become
    /// [`Category::Unknown`].
    ///
    /// # Examples
    /// ```
    /// use tripweaver_core::Category;
    ///
    /// assert_eq!(Category::canonicalise("  FOOD "), Category::Food);
    /// assert_eq!(Category::canonicalise("night market"), Category::Shopping);
    /// assert_eq!(Category::canonicalise("boat tour"), Category::Unknown);
    /// ```
    #[must_use]
    pub fn canonicalise(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        if let Ok(exact) = lowered.parse() {
            return exact;
        }
        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));
        if contains_any(&FOOD_KEYWORDS) {
            Self::Food
        } else if contains_any(&CAFE_KEYWORDS) {
            Self::Cafe
        } else if contains_any(&ENTERTAINMENT_KEYWORDS) {
            Self::Entertainment
        } else if contains_any(&ATTRACTION_KEYWORDS) {
            Self::Attraction
        } else if contains_any(&SHOPPING_KEYWORDS) {
            Self::Shopping
        } else {
            Self::Unknown
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "cafe" => Ok(Self::Cafe),
            "entertainment" => Ok(Self::Entertainment),
            "attraction" => Ok(Self::Attraction),
            "shopping" => Ok(Self::Shopping),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("unknown category '{s}'")),
        }
    }
}
