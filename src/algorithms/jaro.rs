//! Jaro and Jaro-Winkler similarity
//!
//! Jaro-Winkler boosts pairs that share a prefix, so a partially typed
//! word scores close to the word it is heading towards.

use super::Similarity;
use smallvec::SmallVec;

/// Default Winkler prefix scale
pub const DEFAULT_PREFIX_WEIGHT: f64 = 0.1;

/// Default number of prefix characters considered
pub const DEFAULT_MAX_PREFIX: usize = 4;

/// Jaro-Winkler similarity calculator
#[derive(Debug, Clone, PartialEq)]
pub struct JaroWinkler {
    /// Prefix weight, kept in [0.0, 0.25] so scores stay in [0, 1]
    pub prefix_weight: f64,
    /// Maximum prefix length to consider
    pub max_prefix_length: usize,
}

impl Default for JaroWinkler {
    fn default() -> Self {
        Self {
            prefix_weight: DEFAULT_PREFIX_WEIGHT,
            max_prefix_length: DEFAULT_MAX_PREFIX,
        }
    }
}

impl JaroWinkler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_prefix_weight(mut self, weight: f64) -> Self {
        self.prefix_weight = weight.clamp(0.0, 0.25);
        self
    }
}

impl Similarity for JaroWinkler {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        jaro_winkler_similarity_params(a, b, self.prefix_weight, self.max_prefix_length)
    }

    fn name(&self) -> &'static str {
        "jaro_winkler"
    }
}

/// Jaro similarity in [0, 1].
#[must_use]
pub fn jaro_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let a_chars: SmallVec<[char; 32]> = a.chars().collect();
    let b_chars: SmallVec<[char; 32]> = b.chars().collect();
    jaro_chars(&a_chars, &b_chars)
}

fn jaro_chars(a: &[char], b: &[char]) -> f64 {
    let a_len = a.len();
    let b_len = b.len();
    if a_len == 0 && b_len == 0 {
        return 1.0;
    }
    if a_len == 0 || b_len == 0 {
        return 0.0;
    }

    let window = (a_len.max(b_len) / 2).saturating_sub(1);
    let mut a_matched: SmallVec<[bool; 32]> = smallvec::smallvec![false; a_len];
    let mut b_matched: SmallVec<[bool; 32]> = smallvec::smallvec![false; b_len];
    let mut matches = 0usize;

    for (i, &ac) in a.iter().enumerate() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(b_len);
        for j in start..end {
            if !b_matched[j] && b[j] == ac {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Matched chars of `a` and `b` in order; each out-of-place pair is half a transposition
    let a_seq = a.iter().zip(&a_matched).filter(|&(_, &m)| m).map(|(c, _)| c);
    let b_seq = b.iter().zip(&b_matched).filter(|&(_, &m)| m).map(|(c, _)| c);
    let half_transpositions = a_seq.zip(b_seq).filter(|(x, y)| x != y).count();

    let m = matches as f64;
    let t = (half_transpositions / 2) as f64;
    (m / a_len as f64 + m / b_len as f64 + (m - t) / m) / 3.0
}

/// Jaro-Winkler similarity with explicit prefix parameters.
#[must_use]
pub fn jaro_winkler_similarity_params(
    a: &str,
    b: &str,
    prefix_weight: f64,
    max_prefix_len: usize,
) -> f64 {
    let jaro = jaro_similarity(a, b);
    if jaro == 0.0 {
        return 0.0;
    }
    let prefix_weight = prefix_weight.clamp(0.0, 0.25);
    let prefix_len = a
        .chars()
        .zip(b.chars())
        .take(max_prefix_len)
        .take_while(|(x, y)| x == y)
        .count();
    jaro + prefix_len as f64 * prefix_weight * (1.0 - jaro)
}

/// Jaro-Winkler similarity with the standard 0.1 / 4 parameters.
#[must_use]
pub fn jaro_winkler_similarity(a: &str, b: &str) -> f64 {
    jaro_winkler_similarity_params(a, b, DEFAULT_PREFIX_WEIGHT, DEFAULT_MAX_PREFIX)
}
