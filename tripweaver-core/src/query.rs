//! The query context a ranking pass runs against.

/// Default number of candidates a ranking pass returns.
pub const DEFAULT_TOP_K: usize = 30;

/// Everything the ranker needs to know about one query.
///
/// A context is typically built per category pool: the soft `tag_filter`
/// differs between attraction, entertainment and shopping pools while the
/// rest stays constant for the trip.
///
/// # Examples
/// ```
/// use tripweaver_core::ScoreContext;
///
/// let ctx = ScoreContext {
///     city: "Hue".into(),
///     taste_tags: vec!["seafood".into()],
///     ..ScoreContext::default()
/// };
/// assert!(ctx.query_text().contains("seafood"));
/// assert!(ctx.query_text().contains("Hue"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreContext {
    /// Destination city; folded into the query text.
    pub city: String,
    /// Free-text user query, possibly empty.
    pub query: String,
    /// Food preferences; also drive the food/cafe taste boost.
    pub taste_tags: Vec<String>,
    /// Activity preferences.
    pub activity_tags: Vec<String>,
    /// Daily budget in local currency.
    pub budget_per_day: f64,
    /// Weather description for the day; empty means no penalty.
    pub weather: String,
    /// Soft tag filter; empty means no filtering.
    pub tag_filter: Vec<String>,
    /// Maximum number of ranked candidates to return.
    pub top_k: usize,
}

impl Default for ScoreContext {
    fn default() -> Self {
        Self {
            city: String::new(),
            query: String::new(),
            taste_tags: Vec::new(),
            activity_tags: Vec::new(),
            budget_per_day: 1_500_000.0,
            weather: String::new(),
            tag_filter: Vec::new(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl ScoreContext {
    /// The text the TF-IDF query vector is built from: free text, taste
    /// and activity tags, and the city name, space-joined.
    #[must_use]
    pub fn query_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(
            2 + self.taste_tags.len() + self.activity_tags.len(),
        );
        parts.push(self.query.as_str());
        parts.extend(self.taste_tags.iter().map(String::as_str));
        parts.extend(self.activity_tags.iter().map(String::as_str));
        parts.push(self.city.as_str());
        parts
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_text_skips_blank_parts() {
        let ctx = ScoreContext {
            city: "Da Lat".into(),
            activity_tags: vec!["hiking".into(), " ".into()],
            ..ScoreContext::default()
        };
        assert_eq!(ctx.query_text(), "hiking Da Lat");
    }
}
