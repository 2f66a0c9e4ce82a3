//! Field-level repair for dirty catalogue data.
//!
//! Source catalogues arrive with run-together coordinate strings, currency
//! noise in cost columns, and inconsistently delimited tag lists. These
//! helpers recover what they can and report `None` for the rest; none of
//! them can fail.

/// Repair a coordinate string into a valid float.
///
/// Keeps the optional leading sign and every digit in order; the first
/// `.` or `,` becomes the decimal point and later separators are dropped.
/// This recovers values such as `"10.791.858.651.304.300"`, a common
/// artefact of locale-mangled exports.
///
/// # Examples
/// ```
/// use tripweaver_core::sanitise::repair_coordinate;
///
/// assert_eq!(repair_coordinate("10.791.858.651.304.300"), Some(10.7918586513043));
/// assert_eq!(repair_coordinate("-106,68"), Some(-106.68));
/// assert_eq!(repair_coordinate("n/a"), None);
/// ```
#[must_use]
pub fn repair_coordinate(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(trimmed.len());
    let mut chars = trimmed.chars().peekable();
    if let Some(&first) = chars.peek() {
        if first == '+' || first == '-' {
            out.push(first);
            chars.next();
        }
    }
    let mut used_decimal = false;
    let mut saw_digit = false;
    for ch in chars {
        if ch.is_ascii_digit() {
            out.push(ch);
            saw_digit = true;
        } else if (ch == '.' || ch == ',') && !used_decimal {
            out.push('.');
            used_decimal = true;
        }
    }
    if !saw_digit {
        return None;
    }
    out.parse().ok()
}

/// Parse a cost field, tolerating currency symbols and grouping noise.
///
/// Strips everything but digits and separators, normalises a decimal comma,
/// and gives up (`None`) on anything still ambiguous, e.g. multiple
/// grouping dots.
#[must_use]
pub fn parse_cost(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Parse a rating field; whitespace is tolerated, anything else is absent.
#[must_use]
pub fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim().parse().ok()
}

/// Split a delimited tag field into lowercase tags.
///
/// Accepts `,`, `;` and `|` as delimiters; blanks are dropped.
///
/// # Examples
/// ```
/// use tripweaver_core::sanitise::split_tags;
///
/// assert_eq!(split_tags("Seafood; outdoor |  Rooftop,,"), vec!["seafood", "outdoor", "rooftop"]);
/// ```
#[must_use]
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.to_lowercase()
        .split(|c| c == ',' || c == ';' || c == '|')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Reduce a display name to a slug of alphanumeric runs joined by `-`.
///
/// Used for deduplication fingerprints, not for display.
///
/// # Examples
/// ```
/// use tripweaver_core::sanitise::slug;
///
/// assert_eq!(slug("  The   Old Market! "), "the-old-market");
/// ```
#[must_use]
pub fn slug(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("10.791.858.651.304.300", Some(10.791_858_651_304_3))]
    #[case("106,7009", Some(106.7009))]
    #[case("-10.79", Some(-10.79))]
    #[case("+0,5", Some(0.5))]
    #[case("12a34", Some(1234.0))]
    #[case("", None)]
    #[case("   ", None)]
    #[case("-", None)]
    #[case("abc", None)]
    fn repairs_coordinates(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(repair_coordinate(raw), expected);
    }

    #[rstest]
    #[case("120000", Some(120_000.0))]
    #[case("120000 VND", Some(120_000.0))]
    #[case("45,5", Some(45.5))]
    #[case("1.500.000", None)]
    #[case("free", None)]
    fn parses_costs(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_cost(raw), expected);
    }

    #[rstest]
    #[case(" 4.5 ", Some(4.5))]
    #[case("no reviews", None)]
    fn parses_ratings(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_rating(raw), expected);
    }

    #[test]
    fn splits_tags_on_all_delimiters() {
        assert_eq!(
            split_tags("a,b;c|d"),
            vec!["a".to_owned(), "b".into(), "c".into(), "d".into()]
        );
        assert!(split_tags(" ;; | ").is_empty());
    }

    #[test]
    fn slug_is_stable_under_punctuation() {
        assert_eq!(slug("Chợ Bến Thành"), slug("chợ   bến-thành!"));
    }
}
