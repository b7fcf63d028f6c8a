//! Search engine: runs the full pipeline over a record collection
//!
//! ```text
//! records ─► PreparedRecord (tokenize) ─► FieldMatcher per field ─► aggregate ─► rank
//! ```
//!
//! Every call is a pure function of (records, query, options). Nothing is
//! cached between calls here; [`Catalog`](super::catalog::Catalog) keeps
//! prepared records around when the same collection is searched repeatedly.

use super::fields::FieldSet;
use super::options::SearchOptions;
use super::ranking::{self, Candidate};
use super::record::{PreparedField, PreparedRecord, Searchable};
use super::scoring::{aggregate, FieldScore, FieldScores};
use super::strategies::{FieldMatcher, Fuzzy, MatchKind};
use super::suggest;
use super::synonyms::SynonymTable;
use crate::PARALLEL_THRESHOLD;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, debug_span};

/// Score of one matched field in a result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMatch {
    pub name: String,
    pub kind: MatchKind,
    pub score: f64,
}

/// One ranked search result
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult<'r, R> {
    /// The matched record, borrowed from the caller's collection
    pub record: &'r R,

    /// Position of the record in the searched collection
    pub index: usize,

    /// Relevance score (0.0 - 1.0)
    pub score: f64,

    /// Dominant match type; `None` only when browsing with an empty query
    pub match_kind: Option<MatchKind>,

    /// Fields that contributed, best first
    pub matched_fields: Vec<FieldMatch>,
}

impl<R> MatchResult<'_, R> {
    /// Names of the contributing fields, best first
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.matched_fields.iter().map(|f| f.name.as_str())
    }

    pub fn matched_field(&self, name: &str) -> bool {
        self.matched_fields.iter().any(|f| f.name == name)
    }
}

/// Field set, related terms and default options for a collection type
///
/// # Example
///
/// ```rust
/// use stocksearch::search::{InventoryItem, MatchKind, SearchEngine};
///
/// let items = vec![
///     InventoryItem::new("1", "Wood Screw"),
///     InventoryItem::new("2", "Hex Bolt"),
///     InventoryItem::new("3", "Paint Roller"),
/// ];
///
/// let engine = SearchEngine::default();
/// let results = engine.search(&items, "fasteners");
/// assert_eq!(results.len(), 2);
/// assert!(results.iter().all(|r| r.match_kind == Some(MatchKind::Semantic)));
/// ```
#[derive(Debug, Clone)]
pub struct SearchEngine {
    fields: FieldSet,
    synonyms: Arc<SynonymTable>,
    options: SearchOptions,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(FieldSet::inventory(), SynonymTable::builtin())
    }
}

impl SearchEngine {
    pub fn new(fields: FieldSet, synonyms: Arc<SynonymTable>) -> Self {
        Self {
            fields,
            synonyms,
            options: SearchOptions::default(),
        }
    }

    /// Set the options used by [`search`](Self::search) and [`suggest`](Self::suggest)
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Normalize every record's searchable fields.
    pub fn prepare<R: Searchable + Sync>(&self, records: &[R]) -> Vec<PreparedRecord> {
        if records.len() >= PARALLEL_THRESHOLD {
            records
                .par_iter()
                .map(|r| PreparedRecord::new(r, &self.fields))
                .collect()
        } else {
            records
                .iter()
                .map(|r| PreparedRecord::new(r, &self.fields))
                .collect()
        }
    }

    /// Search with the engine's default options.
    pub fn search<'r, R: Searchable + Sync>(
        &self,
        records: &'r [R],
        query: &str,
    ) -> Vec<MatchResult<'r, R>> {
        self.search_with(records, query, &self.options)
    }

    /// Search with explicit options.
    pub fn search_with<'r, R: Searchable + Sync>(
        &self,
        records: &'r [R],
        query: &str,
        options: &SearchOptions,
    ) -> Vec<MatchResult<'r, R>> {
        let query = PreparedField::new(query);
        if query.is_empty() {
            return browse(records, options.sanitized().max_results);
        }
        let prepared = self.prepare(records);
        self.run(records, &prepared, &query, options)
    }

    /// Search records whose prepared form was computed earlier by
    /// [`prepare`](Self::prepare) with this engine's field set.
    ///
    /// `prepared` must be parallel to `records`; extra entries on either
    /// side are ignored.
    pub fn search_prepared<'r, R: Searchable + Sync>(
        &self,
        records: &'r [R],
        prepared: &[PreparedRecord],
        query: &str,
        options: &SearchOptions,
    ) -> Vec<MatchResult<'r, R>> {
        let query = PreparedField::new(query);
        if query.is_empty() {
            return browse(records, options.sanitized().max_results);
        }
        self.run(records, prepared, &query, options)
    }

    /// Autocomplete strings for a partially typed query.
    pub fn suggest<R: Searchable + Sync>(
        &self,
        records: &[R],
        partial_query: &str,
        max_suggestions: usize,
    ) -> Vec<String> {
        if !suggest::accepts(partial_query, max_suggestions, records.len()) {
            return Vec::new();
        }
        let options = suggest::pass_options(&self.options, max_suggestions);
        let results = self.search_with(records, partial_query, &options);
        suggest::collect(&results, max_suggestions)
    }

    /// [`suggest`](Self::suggest) over already prepared records.
    pub fn suggest_prepared<R: Searchable + Sync>(
        &self,
        records: &[R],
        prepared: &[PreparedRecord],
        partial_query: &str,
        max_suggestions: usize,
    ) -> Vec<String> {
        if !suggest::accepts(partial_query, max_suggestions, records.len()) {
            return Vec::new();
        }
        let options = suggest::pass_options(&self.options, max_suggestions);
        let results = self.search_prepared(records, prepared, partial_query, &options);
        suggest::collect(&results, max_suggestions)
    }

    fn run<'r, R: Searchable + Sync>(
        &self,
        records: &'r [R],
        prepared: &[PreparedRecord],
        query: &PreparedField,
        options: &SearchOptions,
    ) -> Vec<MatchResult<'r, R>> {
        let start = Instant::now();
        let options = options.sanitized();
        let count = records.len().min(prepared.len());
        let span = debug_span!(
            "search",
            query_tokens = query.tokens.len(),
            records = count
        );
        let _guard = span.enter();

        let matcher = FieldMatcher::new(
            Fuzzy::new(options.fuzzy_algorithm, options.fuzzy_threshold),
            &self.synonyms,
        );
        let prepared = &prepared[..count];

        let candidates: Vec<Candidate<'_>> = if count >= PARALLEL_THRESHOLD {
            prepared
                .par_iter()
                .enumerate()
                .filter_map(|(index, p)| self.score_record(&matcher, query, index, p))
                .collect()
        } else {
            prepared
                .iter()
                .enumerate()
                .filter_map(|(index, p)| self.score_record(&matcher, query, index, p))
                .collect()
        };
        let matched = candidates.len();

        let results: Vec<MatchResult<'r, R>> = ranking::rank(candidates, &options)
            .into_iter()
            .map(|c| self.to_result(records, c))
            .collect();

        debug!(
            matched,
            returned = results.len(),
            elapsed_micros = start.elapsed().as_micros() as u64,
            "search complete"
        );
        results
    }

    fn score_record<'p>(
        &self,
        matcher: &FieldMatcher<'_>,
        query: &PreparedField,
        index: usize,
        prepared: &'p PreparedRecord,
    ) -> Option<Candidate<'p>> {
        let fields: FieldScores = self
            .fields
            .fields()
            .iter()
            .zip(&prepared.fields)
            .enumerate()
            .filter_map(|(field, (spec, text))| {
                matcher
                    .best(query, text)
                    .map(|best| FieldScore::new(field, best.kind, best.score, spec.weight))
            })
            .collect();

        let agg = aggregate(fields)?;
        Some(Candidate {
            index,
            score: agg.score,
            kind: Some(agg.kind),
            fields: agg.fields,
            sort_key: &prepared.sort_key,
        })
    }

    fn to_result<'r, R>(&self, records: &'r [R], candidate: Candidate<'_>) -> MatchResult<'r, R> {
        let matched_fields = candidate
            .fields
            .iter()
            .map(|fs| FieldMatch {
                name: self.fields.fields()[fs.field].name.clone(),
                kind: fs.kind,
                score: fs.score,
            })
            .collect();
        MatchResult {
            record: &records[candidate.index],
            index: candidate.index,
            score: candidate.score,
            match_kind: candidate.kind,
            matched_fields,
        }
    }
}

/// Empty query: records in input order, unscored.
fn browse<R>(records: &[R], max_results: usize) -> Vec<MatchResult<'_, R>> {
    records
        .iter()
        .take(max_results)
        .enumerate()
        .map(|(index, record)| MatchResult {
            record,
            index,
            score: 0.0,
            match_kind: None,
            matched_fields: Vec::new(),
        })
        .collect()
}
