//! Optimal string alignment distance (restricted Damerau-Levenshtein)
//!
//! Like Levenshtein but an adjacent transposition ("hnige" → "hinge")
//! costs one edit instead of two, which suits keyboard typos.

use super::{ratio, EditDistance};
use smallvec::SmallVec;

/// Restricted Damerau-Levenshtein calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct DamerauLevenshtein;

impl DamerauLevenshtein {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EditDistance for DamerauLevenshtein {
    fn distance(&self, a: &str, b: &str) -> usize {
        damerau_levenshtein(a, b)
    }

    fn name(&self) -> &'static str {
        "damerau_levenshtein"
    }
}

/// Optimal string alignment distance.
///
/// A substring is never edited more than once, so this is the restricted
/// variant, not the unrestricted Damerau distance.
#[must_use]
pub fn damerau_levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_chars: SmallVec<[char; 32]> = a.chars().collect();
    let b_chars: SmallVec<[char; 32]> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Three rows: transpositions look two rows back
    let mut prev2: SmallVec<[usize; 64]> = smallvec::smallvec![0; n + 1];
    let mut prev: SmallVec<[usize; 64]> = (0..=n).collect();
    let mut curr: SmallVec<[usize; 64]> = smallvec::smallvec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            let mut best = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
            if i > 1
                && j > 1
                && a_chars[i - 1] == b_chars[j - 2]
                && a_chars[i - 2] == b_chars[j - 1]
            {
                best = best.min(prev2[j - 2] + 1);
            }
            curr[j] = best;
        }
        std::mem::swap(&mut prev2, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Normalized similarity: `1 - distance / max(len)`.
#[must_use]
pub fn damerau_levenshtein_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    ratio(damerau_levenshtein(a, b), a, b)
}
