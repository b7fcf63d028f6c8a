//! Match strategies
//!
//! Four independent ways a query can match one field. Each returns a score
//! in (0, 1] or `None` when it does not apply. Score ceilings are ordered so
//! that, for the same coverage, literal evidence outranks typo-tolerant or
//! synonym evidence:
//!
//! | strategy | score range   |
//! |----------|---------------|
//! | exact    | 1.0           |
//! | partial  | 0.85 ..= 0.95 |
//! | fuzzy    | 0 < s ≤ 0.85  |
//! | semantic | 0 < s ≤ 0.80  |
//!
//! [`FieldMatcher`] runs them in that order and keeps the single best
//! score for the field. Strategies are never summed.

use super::record::PreparedField;
use super::synonyms::SynonymTable;
use crate::algorithms::FuzzyAlgorithm;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest score of a partial match
pub const PARTIAL_BASE: f64 = 0.85;

/// Extra partial score available for full coverage of the field
pub const PARTIAL_SPAN: f64 = 0.10;

/// Best possible fuzzy score
pub const FUZZY_CEILING: f64 = 0.85;

/// Best possible semantic score
pub const SEMANTIC_CEILING: f64 = 0.80;

/// How a field (and by extension a record) matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Partial,
    Fuzzy,
    Semantic,
}

impl MatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Partial => "partial",
            MatchKind::Fuzzy => "fuzzy",
            MatchKind::Semantic => "semantic",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score one strategy produced for one field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyScore {
    pub kind: MatchKind,
    pub score: f64,
}

/// A single way of matching a normalized query against a normalized field
pub trait MatchStrategy: Send + Sync {
    fn kind(&self) -> MatchKind;

    /// Score in (0, 1], or `None` if the strategy does not match
    fn score(&self, query: &PreparedField, field: &PreparedField) -> Option<f64>;
}

/// Whole normalized field equals the whole normalized query
#[derive(Debug, Clone, Copy, Default)]
pub struct Exact;

impl MatchStrategy for Exact {
    fn kind(&self) -> MatchKind {
        MatchKind::Exact
    }

    fn score(&self, query: &PreparedField, field: &PreparedField) -> Option<f64> {
        (!query.is_empty() && query.text == field.text).then_some(1.0)
    }
}

/// Every query token occurs somewhere in the field text
#[derive(Debug, Clone, Copy, Default)]
pub struct Partial;

impl MatchStrategy for Partial {
    fn kind(&self) -> MatchKind {
        MatchKind::Partial
    }

    fn score(&self, query: &PreparedField, field: &PreparedField) -> Option<f64> {
        if query.is_empty() || field.is_empty() {
            return None;
        }
        if !query.tokens.iter().all(|t| field.text.contains(t.as_str())) {
            return None;
        }
        let covered: usize = query.tokens.iter().map(|t| t.chars().count()).sum();
        let coverage = (covered as f64 / field.content_len() as f64).min(1.0);
        Some(PARTIAL_BASE + PARTIAL_SPAN * coverage)
    }
}

/// Typo-tolerant token matching
///
/// Each query token takes its best similarity against the field's tokens.
/// Tokens under the threshold contribute nothing but still count in the
/// denominator, so a half-matched query scores half as much.
#[derive(Debug, Clone, Copy)]
pub struct Fuzzy {
    pub algorithm: FuzzyAlgorithm,
    pub threshold: f64,
}

impl Fuzzy {
    pub fn new(algorithm: FuzzyAlgorithm, threshold: f64) -> Self {
        Self {
            algorithm,
            threshold,
        }
    }

    /// Best similarity of `token` against any field token
    fn best_similarity(&self, token: &str, field: &PreparedField) -> f64 {
        let mut best = 0.0f64;
        for candidate in &field.tokens {
            if candidate == token {
                return 1.0;
            }
            best = best.max(self.algorithm.similarity(token, candidate));
        }
        best
    }
}

impl MatchStrategy for Fuzzy {
    fn kind(&self) -> MatchKind {
        MatchKind::Fuzzy
    }

    fn score(&self, query: &PreparedField, field: &PreparedField) -> Option<f64> {
        if query.is_empty() || field.is_empty() {
            return None;
        }
        let matched: f64 = query
            .tokens
            .iter()
            .map(|t| self.best_similarity(t, field))
            .filter(|&s| s > 0.0 && s >= self.threshold)
            .sum();
        let score = FUZZY_CEILING * matched / query.tokens.len() as f64;
        (score > 0.0).then_some(score)
    }
}

/// Matching through related terms
///
/// A query token is satisfied when it occurs literally in the field or when
/// one of its related terms does. The strategy only applies if at least one
/// token needed a related term.
#[derive(Debug, Clone, Copy)]
pub struct Semantic<'a> {
    pub synonyms: &'a SynonymTable,
}

impl<'a> Semantic<'a> {
    pub fn new(synonyms: &'a SynonymTable) -> Self {
        Self { synonyms }
    }
}

/// Multi-word terms match as a phrase; single words match the start of a
/// field token, which covers plurals ("screw" in "screws").
fn contains_term(field: &PreparedField, term: &str) -> bool {
    if term.contains(' ') {
        field.text.contains(term)
    } else {
        field.tokens.iter().any(|t| t.starts_with(term))
    }
}

impl MatchStrategy for Semantic<'_> {
    fn kind(&self) -> MatchKind {
        MatchKind::Semantic
    }

    fn score(&self, query: &PreparedField, field: &PreparedField) -> Option<f64> {
        if query.is_empty() || field.is_empty() {
            return None;
        }
        let mut satisfied = 0usize;
        let mut via_synonym = false;
        for token in &query.tokens {
            if field.text.contains(token.as_str()) {
                satisfied += 1;
            } else if self
                .synonyms
                .expand(token)
                .iter()
                .any(|term| contains_term(field, term))
            {
                satisfied += 1;
                via_synonym = true;
            }
        }
        via_synonym.then(|| SEMANTIC_CEILING * satisfied as f64 / query.tokens.len() as f64)
    }
}

/// Runs all strategies for a field and keeps the best one
#[derive(Debug, Clone, Copy)]
pub struct FieldMatcher<'a> {
    fuzzy: Fuzzy,
    semantic: Semantic<'a>,
}

impl<'a> FieldMatcher<'a> {
    pub fn new(fuzzy: Fuzzy, synonyms: &'a SynonymTable) -> Self {
        Self {
            fuzzy,
            semantic: Semantic::new(synonyms),
        }
    }

    /// Best strategy score for this field; ties keep the earlier strategy.
    pub fn best(&self, query: &PreparedField, field: &PreparedField) -> Option<StrategyScore> {
        // Nothing beats an exact match
        if let Some(score) = Exact.score(query, field) {
            return Some(StrategyScore {
                kind: MatchKind::Exact,
                score,
            });
        }

        let strategies: [&dyn MatchStrategy; 3] = [&Partial, &self.fuzzy, &self.semantic];
        let mut best: Option<StrategyScore> = None;
        for strategy in strategies {
            if let Some(score) = strategy.score(query, field) {
                if best.map_or(true, |b| score > b.score) {
                    best = Some(StrategyScore {
                        kind: strategy.kind(),
                        score,
                    });
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(s: &str) -> PreparedField {
        PreparedField::new(s)
    }

    fn matcher(synonyms: &SynonymTable) -> FieldMatcher<'_> {
        FieldMatcher::new(Fuzzy::new(FuzzyAlgorithm::JaroWinkler, 0.7), synonyms)
    }

    #[test]
    fn test_exact_is_whole_string() {
        assert_eq!(Exact.score(&f("Deck Screws"), &f("deck  screws")), Some(1.0));
        assert_eq!(Exact.score(&f("screws deck"), &f("deck screws")), None);
        assert_eq!(Exact.score(&f(""), &f("")), None);
    }

    #[test]
    fn test_partial_requires_all_tokens() {
        assert!(Partial.score(&f("deck scr"), &f("deck screws 3in")).is_some());
        assert_eq!(Partial.score(&f("deck scrw"), &f("deck screws 3in")), None);
    }

    #[test]
    fn test_partial_score_reflects_coverage() {
        let short = Partial.score(&f("deck"), &f("deck screws 3in")).unwrap();
        let long = Partial.score(&f("deck screws"), &f("deck screws 3in")).unwrap();
        assert!(long > short);
        assert!((PARTIAL_BASE..=PARTIAL_BASE + PARTIAL_SPAN).contains(&short));
        // 4 of 13 chars
        assert!((short - (0.85 + 0.10 * 4.0 / 13.0)).abs() < 1e-9);
    }

    #[test]
    fn test_fuzzy_typo() {
        let fuzzy = Fuzzy::new(FuzzyAlgorithm::JaroWinkler, 0.7);
        let score = fuzzy.score(&f("deck scrw"), &f("deck screws 3in")).unwrap();
        // (1.0 + 0.9222) / 2 * 0.85
        assert!((score - 0.85 * (1.0 + 0.92222) / 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_fuzzy_unmatched_tokens_lower_score() {
        let fuzzy = Fuzzy::new(FuzzyAlgorithm::JaroWinkler, 0.7);
        let full = fuzzy.score(&f("deck"), &f("composite deck clips")).unwrap();
        let half = fuzzy.score(&f("deck scrw"), &f("composite deck clips")).unwrap();
        assert!((full - FUZZY_CEILING).abs() < 1e-9);
        assert!((half - FUZZY_CEILING / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_fuzzy_threshold_rejects() {
        let strict = Fuzzy::new(FuzzyAlgorithm::Levenshtein, 0.7);
        // 1 - 2/6 = 0.667 < 0.7
        assert_eq!(strict.score(&f("scrw"), &f("screws")), None);
        let lenient = Fuzzy::new(FuzzyAlgorithm::Levenshtein, 0.6);
        assert!(lenient.score(&f("scrw"), &f("screws")).is_some());
    }

    #[test]
    fn test_fuzzy_monotone_in_matching_tokens() {
        let fuzzy = Fuzzy::new(FuzzyAlgorithm::JaroWinkler, 0.7);
        let field = f("galvanized deck screws");
        let before = fuzzy.score(&f("scrw"), &field).unwrap();
        let after = fuzzy.score(&f("scrw deck"), &field).unwrap();
        assert!(after >= before);
    }

    #[test]
    fn test_semantic_via_synonym() {
        let synonyms = SynonymTable::builtin();
        let semantic = Semantic::new(&synonyms);
        let score = semantic.score(&f("fasteners"), &f("Wood Screw")).unwrap();
        assert!((score - SEMANTIC_CEILING).abs() < 1e-9);
        // Literal-only coverage is not a semantic match
        assert_eq!(semantic.score(&f("wood"), &f("Wood Screw")), None);
        // Plural field token still counts
        assert!(semantic.score(&f("fasteners"), &f("Deck Screws")).is_some());
        // Substrings inside unrelated words do not
        assert_eq!(semantic.score(&f("fasteners"), &f("Walnut Stain")), None);
    }

    #[test]
    fn test_semantic_mixed_literal_and_synonym() {
        let synonyms = SynonymTable::builtin();
        let semantic = Semantic::new(&synonyms);
        let both = semantic.score(&f("wood fasteners"), &f("Wood Screw")).unwrap();
        let half = semantic.score(&f("oak fasteners"), &f("Wood Screw")).unwrap();
        assert!((both - SEMANTIC_CEILING).abs() < 1e-9);
        assert!((half - SEMANTIC_CEILING / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_prefers_exact_then_partial() {
        let synonyms = SynonymTable::builtin();
        let m = matcher(&synonyms);
        let exact = m.best(&f("hex bolt"), &f("Hex Bolt")).unwrap();
        assert_eq!(exact.kind, MatchKind::Exact);
        assert_eq!(exact.score, 1.0);

        // Partial (>= 0.85) ties or beats an all-literal fuzzy match (0.85)
        let partial = m.best(&f("hex"), &f("Hex Bolt")).unwrap();
        assert_eq!(partial.kind, MatchKind::Partial);
    }

    #[test]
    fn test_best_none_for_unrelated() {
        let synonyms = SynonymTable::builtin();
        let m = matcher(&synonyms);
        assert_eq!(m.best(&f("deck scrw"), &f("Paint Brush")), None);
        assert_eq!(m.best(&f("deck"), &f("")), None);
    }

    #[test]
    fn test_match_kind_display() {
        assert_eq!(MatchKind::Semantic.to_string(), "semantic");
        assert_eq!(serde_json::to_string(&MatchKind::Exact).unwrap(), "\"exact\"");
    }
}
