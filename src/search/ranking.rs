//! Filtering, ordering and truncation of scored records

use super::options::{SearchOptions, SortBy};
use super::scoring::FieldScores;
use super::strategies::MatchKind;
use std::cmp::Ordering;

/// A scored record before it is turned into a public result
#[derive(Debug, Clone)]
pub struct Candidate<'p> {
    /// Position in the input collection
    pub index: usize,
    pub score: f64,
    pub kind: Option<MatchKind>,
    pub fields: FieldScores,
    /// Lowercased display name
    pub sort_key: &'p str,
}

fn by_relevance(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.sort_key.cmp(b.sort_key))
        .then(a.index.cmp(&b.index))
}

fn by_name(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    a.sort_key
        .cmp(b.sort_key)
        .then_with(|| b.score.total_cmp(&a.score))
        .then(a.index.cmp(&b.index))
}

/// Comparator for a sort mode. Both are total orders: the input index
/// breaks every remaining tie.
pub fn comparator(sort_by: SortBy) -> fn(&Candidate<'_>, &Candidate<'_>) -> Ordering {
    match sort_by {
        SortBy::Relevance => by_relevance,
        SortBy::Name => by_name,
    }
}

/// Drop candidates under `min_score`, order them and keep the first
/// `max_results`.
///
/// Out-of-range options are repaired first, so a NaN `min_score` filters
/// like the default instead of dropping every candidate.
pub fn rank<'p>(
    mut candidates: Vec<Candidate<'p>>,
    options: &SearchOptions,
) -> Vec<Candidate<'p>> {
    let options = options.sanitized();
    candidates.retain(|c| c.score >= options.min_score);

    let cmp = comparator(options.sort_by);
    let limit = options.max_results;
    if candidates.len() > limit {
        // Partition the top `limit` first so only they get fully sorted
        candidates.select_nth_unstable_by(limit - 1, cmp);
        candidates.truncate(limit);
    }
    candidates.sort_unstable_by(cmp);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(index: usize, score: f64, name: &'static str) -> Candidate<'static> {
        Candidate {
            index,
            score,
            kind: Some(MatchKind::Fuzzy),
            fields: FieldScores::new(),
            sort_key: name,
        }
    }

    fn order(cands: &[Candidate<'_>]) -> Vec<usize> {
        cands.iter().map(|c| c.index).collect()
    }

    #[test]
    fn test_filters_by_min_score() {
        let ranked = rank(
            vec![cand(0, 0.2, "a"), cand(1, 0.3, "b"), cand(2, 0.9, "c")],
            &SearchOptions::default(),
        );
        assert_eq!(order(&ranked), [2, 1]);
    }

    #[test]
    fn test_relevance_ties_by_name_then_index() {
        let ranked = rank(
            vec![
                cand(0, 0.5, "zinc hinge"),
                cand(1, 0.5, "brass hinge"),
                cand(2, 0.5, "brass hinge"),
                cand(3, 0.8, "zz top"),
            ],
            &SearchOptions::default(),
        );
        assert_eq!(order(&ranked), [3, 1, 2, 0]);
    }

    #[test]
    fn test_name_sort() {
        let ranked = rank(
            vec![cand(0, 0.9, "zinc"), cand(1, 0.4, "anchor"), cand(2, 0.6, "anchor")],
            &SearchOptions::default().with_sort(SortBy::Name),
        );
        assert_eq!(order(&ranked), [2, 1, 0]);
    }

    #[test]
    fn test_truncates_to_top_results() {
        let cands: Vec<_> = (0..50).map(|i| cand(i, i as f64 / 100.0 + 0.3, "x")).collect();
        let ranked = rank(cands, &SearchOptions::default().with_limit(5));
        assert_eq!(order(&ranked), [49, 48, 47, 46, 45]);
    }

    #[test]
    fn test_deterministic() {
        let make = || {
            (0..30)
                .map(|i| cand(i, if i % 3 == 0 { 0.7 } else { 0.5 }, "same"))
                .collect::<Vec<_>>()
        };
        let opts = SearchOptions::default().with_limit(10);
        assert_eq!(order(&rank(make(), &opts)), order(&rank(make(), &opts)));
    }

    #[test]
    fn test_invalid_options_repaired() {
        let cands = || vec![cand(0, 0.2, "a"), cand(1, 0.3, "b"), cand(2, 0.9, "c")];

        let nan = SearchOptions {
            min_score: f64::NAN,
            ..SearchOptions::default()
        };
        assert_eq!(order(&rank(cands(), &nan)), [2, 1]);

        let out_of_range = SearchOptions {
            min_score: -1.0,
            max_results: 0,
            ..SearchOptions::default()
        };
        assert_eq!(order(&rank(cands(), &out_of_range)), [2, 1, 0]);
    }
}
