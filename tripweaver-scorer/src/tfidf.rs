//! A small TF-IDF vector space for ranking POIs against a query.
//!
//! Tokens are lowercase alphanumeric runs of at least two characters; the
//! IDF is smoothed so unseen terms never divide by zero, and vectors are
//! L2-normalised so cosine similarity reduces to a dot product. Candidate
//! pools are small (≤ 50 documents), so everything stays dense.

use std::collections::HashMap;

/// Minimum token length; single characters carry no signal.
const MIN_TOKEN_LEN: usize = 2;

/// Lowercase alphanumeric tokens of a text.
pub(crate) fn tokenise(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(ToOwned::to_owned)
        .collect()
}

/// A fitted vocabulary with smoothed inverse document frequencies.
#[derive(Debug)]
pub(crate) struct TfidfModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfModel {
    /// Fit over the candidate documents.
    ///
    /// Returns `None` when the corpus yields no usable vocabulary, which
    /// callers treat as "similarity is zero for everyone".
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "document counts are tiny; IDF smoothing is float maths"
    )]
    pub(crate) fn fit(documents: &[String]) -> Option<Self> {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<u32> = Vec::new();
        for document in documents {
            let mut seen: Vec<usize> = Vec::new();
            for token in tokenise(document) {
                let next_index = vocabulary.len();
                let index = *vocabulary.entry(token).or_insert(next_index);
                if index == document_frequency.len() {
                    document_frequency.push(0);
                }
                if !seen.contains(&index) {
                    seen.push(index);
                }
            }
            for index in seen {
                if let Some(count) = document_frequency.get_mut(index) {
                    *count += 1;
                }
            }
        }
        if vocabulary.is_empty() {
            return None;
        }
        let total = documents.len() as f32;
        let idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + total) / (1.0 + df as f32)).ln() + 1.0)
            .collect();
        Some(Self { vocabulary, idf })
    }

    /// L2-normalised TF-IDF vector of a text; out-of-vocabulary tokens are
    /// ignored.
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "term counts are tiny; normalisation is float maths"
    )]
    pub(crate) fn vector(&self, text: &str) -> Vec<f32> {
        let mut counts: HashMap<usize, u32> = HashMap::new();
        for token in tokenise(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                *counts.entry(index).or_insert(0) += 1;
            }
        }
        let mut vector = vec![0.0_f32; self.idf.len()];
        for (index, count) in counts {
            if let (Some(slot), Some(&idf)) = (vector.get_mut(index), self.idf.get(index)) {
                *slot = count as f32 * idf;
            }
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

/// Cosine similarity of two normalised vectors.
#[expect(
    clippy::float_arithmetic,
    reason = "dot product of normalised vectors"
)]
pub(crate) fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
