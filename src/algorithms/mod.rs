//! String similarity primitives and text normalization
//!
//! Each metric is available as a standalone function and through the
//! [`Similarity`] trait so the fuzzy strategy can be configured at runtime.

pub mod damerau;
pub mod jaro;
pub mod levenshtein;
pub mod normalize;

pub use damerau::*;
pub use jaro::*;
pub use levenshtein::*;
pub use normalize::{normalize_text, tokenize, Tokens};

use serde::{Deserialize, Serialize};

/// Trait for all similarity metrics.
/// Returns a value between 0.0 (completely different) and 1.0 (identical).
pub trait Similarity: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;

    /// Name of the algorithm for debugging/logging
    fn name(&self) -> &'static str;
}

/// Trait for edit distance algorithms that return integer distances
pub trait EditDistance: Send + Sync {
    fn distance(&self, a: &str, b: &str) -> usize;

    /// Convert to normalized similarity score (0.0 to 1.0)
    fn similarity(&self, a: &str, b: &str) -> f64 {
        ratio(self.distance(a, b), a, b)
    }

    fn name(&self) -> &'static str;
}

/// Any EditDistance is also a Similarity
impl<T: EditDistance> Similarity for T {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        EditDistance::similarity(self, a, b)
    }

    fn name(&self) -> &'static str {
        EditDistance::name(self)
    }
}

/// `1 - distance / max_len`, with two empty strings counting as identical.
#[inline]
pub(crate) fn ratio(distance: usize, a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        1.0
    } else {
        (1.0 - distance as f64 / max_len as f64).max(0.0)
    }
}

/// Token similarity measure used by the fuzzy match strategy.
///
/// Jaro-Winkler is the default: it rewards shared prefixes, which is what
/// an as-you-type query looks like ("scrw" against "screws").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyAlgorithm {
    #[default]
    JaroWinkler,
    Levenshtein,
    DamerauLevenshtein,
}

impl FuzzyAlgorithm {
    /// Similarity in [0, 1] between two already-normalized tokens.
    #[inline]
    pub fn similarity(self, a: &str, b: &str) -> f64 {
        match self {
            FuzzyAlgorithm::JaroWinkler => jaro_winkler_similarity(a, b),
            FuzzyAlgorithm::Levenshtein => levenshtein_similarity(a, b),
            FuzzyAlgorithm::DamerauLevenshtein => damerau_levenshtein_similarity(a, b),
        }
    }

    /// Boxed metric, for callers that want a trait object.
    pub fn metric(self) -> Box<dyn Similarity> {
        match self {
            FuzzyAlgorithm::JaroWinkler => Box::new(JaroWinkler::new()),
            FuzzyAlgorithm::Levenshtein => Box::new(Levenshtein::new()),
            FuzzyAlgorithm::DamerauLevenshtein => Box::new(DamerauLevenshtein::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FuzzyAlgorithm::JaroWinkler => "jaro_winkler",
            FuzzyAlgorithm::Levenshtein => "levenshtein",
            FuzzyAlgorithm::DamerauLevenshtein => "damerau_levenshtein",
        }
    }
}
