//! Autocomplete strings derived from a lightweight search pass

use super::engine::MatchResult;
use super::fields::FieldSet;
use super::options::SearchOptions;
use super::record::Searchable;
use crate::algorithms::tokenize;
use ahash::AHashSet;

/// Queries without a token at least this long get no suggestions.
/// Separators never count, so "a b" is rejected.
pub const MIN_SUGGEST_CHARS: usize = 2;

/// Results fetched per requested suggestion
const POOL_FACTOR: usize = 4;

pub(crate) fn accepts(partial_query: &str, max_suggestions: usize, records: usize) -> bool {
    max_suggestions > 0
        && records > 0
        && tokenize(partial_query).any(|t| t.chars().count() >= MIN_SUGGEST_CHARS)
}

/// Options for the suggestion pass: the engine defaults with a pool a few
/// times larger than the number of suggestions.
pub(crate) fn pass_options(base: &SearchOptions, max_suggestions: usize) -> SearchOptions {
    SearchOptions {
        max_results: max_suggestions.saturating_mul(POOL_FACTOR),
        sort_by: Default::default(),
        ..base.clone()
    }
}

/// Distinct names in rank order, then the categories that matched.
pub(crate) fn collect<R: Searchable>(results: &[MatchResult<'_, R>], max: usize) -> Vec<String> {
    let mut seen = AHashSet::new();
    let mut out = Vec::with_capacity(max);

    let names = results.iter().map(|r| r.record.display_name());
    let categories = results
        .iter()
        .filter(|r| r.matched_field(FieldSet::CATEGORY))
        .filter_map(|r| r.record.field(FieldSet::CATEGORY));

    for value in names.chain(categories) {
        if out.len() >= max {
            break;
        }
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        if seen.insert(value.to_lowercase()) {
            out.push(value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::engine::SearchEngine;
    use crate::search::record::InventoryItem;

    fn items() -> Vec<InventoryItem> {
        vec![
            InventoryItem::new("1", "Deck Screws 3in").with_category("Decking"),
            InventoryItem::new("2", "deck screws 3in").with_category("Fasteners"),
            InventoryItem::new("3", "Deck Board 12ft").with_category("Decking"),
            InventoryItem::new("4", "Paint Brush"),
        ]
    }

    #[test]
    fn test_short_query_returns_nothing() {
        let engine = SearchEngine::default();
        let items = items();
        assert!(engine.suggest(&items, "d", 5).is_empty());
        assert!(engine.suggest(&items, " d- ", 5).is_empty());
        assert!(engine.suggest(&items, "", 5).is_empty());
    }

    #[test]
    fn test_separators_do_not_count() {
        assert!(!accepts("a b", 5, 1));
        assert!(!accepts("d - e", 5, 1));
        assert!(!accepts("é", 5, 1));
        assert!(accepts("de", 5, 1));
        assert!(accepts("x deck", 5, 1));

        let engine = SearchEngine::default();
        assert!(engine.suggest(&items(), "d b", 5).is_empty());
    }

    #[test]
    fn test_zero_max() {
        let engine = SearchEngine::default();
        assert!(engine.suggest(&items(), "deck", 0).is_empty());
    }

    #[test]
    fn test_names_are_distinct() {
        let engine = SearchEngine::default();
        let items = items();
        let suggestions = engine.suggest(&items, "deck", 10);
        let lowered: Vec<String> = suggestions.iter().map(|s| s.to_lowercase()).collect();
        assert_eq!(
            lowered.iter().filter(|s| *s == "deck screws 3in").count(),
            1
        );
        assert!(lowered.contains(&"deck board 12ft".to_string()));
        assert!(!lowered.contains(&"paint brush".to_string()));
        // "Decking" matched through the category field
        assert!(suggestions.contains(&"Decking".to_string()));
    }

    #[test]
    fn test_respects_max() {
        let engine = SearchEngine::default();
        let items = items();
        assert_eq!(engine.suggest(&items, "deck", 1).len(), 1);
    }

    #[test]
    fn test_pass_options() {
        let opts = pass_options(&SearchOptions::with_min_score(0.5), 5);
        assert_eq!(opts.max_results, 20);
        assert_eq!(opts.min_score, 0.5);
    }
}
