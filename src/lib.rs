//! stocksearch - Multi-strategy search ranking for inventory catalogs
//!
//! Ranks an in-memory collection of item records against a typed query.
//!
//! # Features
//! - Exact, partial, fuzzy (typo-tolerant) and semantic (related-term) matching
//! - Per-field weights with aggregation over the fields that matched
//! - Deterministic ranking with a total order
//! - Autocomplete suggestions
//! - Parallel scoring for large collections
//! - Thread-safe pre-tokenized catalog for repeated queries
//!
//! # Example
//!
//! ```rust
//! use stocksearch::{search, InventoryItem, MatchKind, SearchOptions};
//!
//! let items = vec![
//!     InventoryItem::new("1", "Deck Screws 3in"),
//!     InventoryItem::new("2", "Composite Deck Clips"),
//!     InventoryItem::new("3", "Paint Brush"),
//! ];
//!
//! let results = search(&items, "deck scrw", &SearchOptions::default());
//! assert_eq!(results[0].record.name, "Deck Screws 3in");
//! assert_eq!(results[0].match_kind, Some(MatchKind::Fuzzy));
//! assert!(results.iter().all(|r| r.record.name != "Paint Brush"));
//! ```

pub mod algorithms;
pub mod config;
pub mod search;

use once_cell::sync::Lazy;

pub use algorithms::{EditDistance, FuzzyAlgorithm, Similarity};
pub use config::{ConfigError, SearchConfig};
pub use search::{
    Catalog, FieldSet, InventoryItem, MatchKind, MatchResult, Record, SearchEngine,
    SearchOptions, Searchable, SortBy, SynonymTable,
};

/// Minimum collection size for parallel scoring.
///
/// Below this, rayon's coordination costs more than scoring the records
/// on the calling thread.
pub const PARALLEL_THRESHOLD: usize = 100;

static DEFAULT_ENGINE: Lazy<SearchEngine> = Lazy::new(SearchEngine::default);

/// Search `records` for `query` with the inventory field weights and the
/// built-in related-term table.
///
/// Never fails: an empty query returns records in input order, and invalid
/// option values are repaired.
pub fn search<'r, R: Searchable + Sync>(
    records: &'r [R],
    query: &str,
    options: &SearchOptions,
) -> Vec<MatchResult<'r, R>> {
    DEFAULT_ENGINE.search_with(records, query, options)
}

/// Up to `max_suggestions` autocomplete strings for a partial query.
pub fn suggest<R: Searchable + Sync>(
    records: &[R],
    partial_query: &str,
    max_suggestions: usize,
) -> Vec<String> {
    DEFAULT_ENGINE.suggest(records, partial_query, max_suggestions)
}
