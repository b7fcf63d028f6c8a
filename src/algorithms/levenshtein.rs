//! Levenshtein (edit) distance
//!
//! Tokens in an inventory catalog are short, so the common path is the
//! Myers bit-parallel algorithm over a single 64-bit word. Longer inputs
//! fall back to a single-row dynamic program.

use super::{ratio, EditDistance};
use ahash::AHashMap;
use smallvec::SmallVec;

/// Pattern length that fits in one Myers block
const MYERS_BLOCK_SIZE: usize = 64;

type CharBuf = SmallVec<[char; 32]>;

/// Myers bit-parallel distance. `pattern` must be 1..=64 chars.
///
/// Based on: Myers, G. (1999). "A fast bit-vector algorithm for approximate string matching"
#[inline]
fn myers_64(pattern: &[char], text: &[char]) -> usize {
    let m = pattern.len();

    let mut peq: AHashMap<char, u64> = AHashMap::with_capacity(m);
    for (i, &c) in pattern.iter().enumerate() {
        *peq.entry(c).or_insert(0) |= 1u64 << i;
    }

    let mut vp: u64 = !0u64;
    let mut vn: u64 = 0u64;
    let mut score = m;
    let last = 1u64 << (m - 1);

    for &tc in text {
        let eq = peq.get(&tc).copied().unwrap_or(0);
        let xv = eq | vn;
        let xh = (((eq & vp).wrapping_add(vp)) ^ vp) | eq;
        let hp = vn | !(xh | vp);
        let hn = vp & xh;

        if hp & last != 0 {
            score += 1;
        } else if hn & last != 0 {
            score -= 1;
        }

        let hp = (hp << 1) | 1;
        let hn = hn << 1;
        vp = hn | !(xv | hp);
        vn = hp & xv;
    }

    score
}

/// Single-row DP over char slices
fn dp_distance(a: &[char], b: &[char]) -> usize {
    // Keep the shorter string on the row axis
    let (row_chars, col_chars) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut row: SmallVec<[usize; 64]> = (0..=row_chars.len()).collect();

    for (i, &cc) in col_chars.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, &rc) in row_chars.iter().enumerate() {
            let substitution = diag + usize::from(cc != rc);
            diag = row[j + 1];
            row[j + 1] = substitution.min(row[j + 1] + 1).min(row[j] + 1);
        }
    }

    row[row_chars.len()]
}

fn distance_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let (pattern, text) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if pattern.len() <= MYERS_BLOCK_SIZE {
        myers_64(pattern, text)
    } else {
        dp_distance(a, b)
    }
}

/// Levenshtein distance calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct Levenshtein;

impl Levenshtein {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl EditDistance for Levenshtein {
    fn distance(&self, a: &str, b: &str) -> usize {
        levenshtein(a, b)
    }

    fn name(&self) -> &'static str {
        "levenshtein"
    }
}

/// Number of single-character insertions, deletions and substitutions
/// needed to turn `a` into `b`.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a_chars: CharBuf = a.chars().collect();
    let b_chars: CharBuf = b.chars().collect();
    distance_chars(&a_chars, &b_chars)
}

/// Distance if it is at most `max_distance`, otherwise `None`.
///
/// Rejects on the length difference before running the full computation.
#[must_use]
pub fn levenshtein_bounded(a: &str, b: &str, max_distance: usize) -> Option<usize> {
    let a_chars: CharBuf = a.chars().collect();
    let b_chars: CharBuf = b.chars().collect();
    if a_chars.len().abs_diff(b_chars.len()) > max_distance {
        return None;
    }
    let d = distance_chars(&a_chars, &b_chars);
    (d <= max_distance).then_some(d)
}

/// Normalized similarity: `1 - distance / max(len)`.
#[must_use]
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    ratio(levenshtein(a, b), a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_basic() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("scrw", "screws"), 2);
        assert_eq!(levenshtein("bolt", "bolt"), 0);
    }

    #[test]
    fn test_levenshtein_unicode() {
        assert_eq!(levenshtein("café", "cafe"), 1);
        assert_eq!(levenshtein("日本", "日本語"), 1);
    }

    #[test]
    fn test_myers_agrees_with_dp() {
        let pairs = [
            ("hinge", "hnige"),
            ("plywood", "playwood"),
            ("galvanized", "galvanised"),
            ("a", "bbbb"),
            ("lumber", "umber"),
        ];
        for (a, b) in pairs {
            let a: CharBuf = a.chars().collect();
            let b: CharBuf = b.chars().collect();
            assert_eq!(myers_64(&a, &b), dp_distance(&a, &b));
        }
    }

    #[test]
    fn test_long_strings_use_dp() {
        let a = "x".repeat(80);
        let b = format!("{}y", "x".repeat(79));
        assert_eq!(levenshtein(&a, &b), 1);
    }

    #[test]
    fn test_bounded() {
        assert_eq!(levenshtein_bounded("kitten", "sitting", 3), Some(3));
        assert_eq!(levenshtein_bounded("kitten", "sitting", 2), None);
        assert_eq!(levenshtein_bounded("a", "abcdef", 2), None);
    }

    #[test]
    fn test_similarity() {
        assert_eq!(levenshtein_similarity("", ""), 1.0);
        assert!((levenshtein_similarity("scrw", "screws") - (1.0 - 2.0 / 6.0)).abs() < 1e-9);
        assert_eq!(EditDistance::similarity(&Levenshtein::new(), "abc", "xyz"), 0.0);
    }
}
