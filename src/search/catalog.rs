//! Shared, pre-tokenized record collection
//!
//! A [`Catalog`] owns the records currently loaded in the view together with
//! their prepared form, so repeated searches (one per keystroke) skip
//! tokenization. Loading a new page of records swaps the whole snapshot.
//!
//! # Concurrency
//!
//! - The snapshot sits behind a `parking_lot::RwLock<Arc<_>>`; readers hold
//!   the lock only long enough to clone the `Arc`
//! - [`replace`](Catalog::replace) prepares the new records before taking
//!   the write lock
//! - Query tickets come from an atomic generation counter. A caller that
//!   fires overlapping searches keeps only the results whose ticket is
//!   still current
//!
//! ```rust
//! use stocksearch::search::{Catalog, InventoryItem, SearchEngine};
//!
//! let catalog = Catalog::new(SearchEngine::default());
//! catalog.replace(vec![InventoryItem::new("1", "Hex Bolt")]);
//!
//! let ticket = catalog.begin_query();
//! let snapshot = catalog.snapshot();
//! let results = snapshot.search("hex");
//! assert!(catalog.is_current(ticket));
//! assert_eq!(results[0].record.name, "Hex Bolt");
//! ```

use super::engine::{MatchResult, SearchEngine};
use super::options::SearchOptions;
use super::record::{PreparedRecord, Searchable};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Generation number handed out by [`Catalog::begin_query`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryTicket(u64);

impl QueryTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Records and their prepared form, kept parallel
struct Snapshot<R> {
    records: Vec<R>,
    prepared: Vec<PreparedRecord>,
}

struct Inner<R> {
    engine: SearchEngine,
    snapshot: RwLock<Arc<Snapshot<R>>>,
    generation: AtomicU64,
}

/// Thread-safe record collection with snapshot swapping.
///
/// Cloning is cheap and shares the same collection.
pub struct Catalog<R> {
    inner: Arc<Inner<R>>,
}

impl<R> Clone for Catalog<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Searchable + Send + Sync> Catalog<R> {
    /// Create an empty catalog searched with `engine`.
    pub fn new(engine: SearchEngine) -> Self {
        Self {
            inner: Arc::new(Inner {
                engine,
                snapshot: RwLock::new(Arc::new(Snapshot {
                    records: Vec::new(),
                    prepared: Vec::new(),
                })),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Create a catalog already holding `records`.
    pub fn with_records(engine: SearchEngine, records: Vec<R>) -> Self {
        let catalog = Self::new(engine);
        catalog.replace(records);
        catalog
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.inner.engine
    }

    /// Swap in a new record collection.
    ///
    /// Searches already running keep the snapshot they started with.
    /// Outstanding query tickets become stale.
    pub fn replace(&self, records: Vec<R>) {
        let prepared = self.inner.engine.prepare(&records);
        let count = records.len();
        let next = Arc::new(Snapshot { records, prepared });
        *self.inner.snapshot.write() = next;
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        debug!(records = count, "catalog replaced");
    }

    /// Number of records in the current snapshot
    pub fn len(&self) -> usize {
        self.inner.snapshot.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current snapshot; stays valid after later replacements.
    pub fn snapshot(&self) -> CatalogSnapshot<R> {
        CatalogSnapshot {
            inner: Arc::clone(&self.inner),
            snapshot: self.inner.snapshot.read().clone(),
        }
    }

    /// Autocomplete over the current snapshot
    pub fn suggest(&self, partial_query: &str, max_suggestions: usize) -> Vec<String> {
        self.snapshot().suggest(partial_query, max_suggestions)
    }

    /// Start a query. Any ticket handed out earlier is now stale.
    pub fn begin_query(&self) -> QueryTicket {
        QueryTicket(self.inner.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether no query was started and no records were replaced since
    /// `ticket` was issued
    pub fn is_current(&self, ticket: QueryTicket) -> bool {
        self.inner.generation.load(Ordering::Acquire) == ticket.0
    }
}

/// A fixed view of a catalog's records
pub struct CatalogSnapshot<R> {
    inner: Arc<Inner<R>>,
    snapshot: Arc<Snapshot<R>>,
}

impl<R: Searchable + Send + Sync> CatalogSnapshot<R> {
    pub fn records(&self) -> &[R] {
        &self.snapshot.records
    }

    pub fn len(&self) -> usize {
        self.snapshot.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.records.is_empty()
    }

    /// Search with the engine's default options
    pub fn search(&self, query: &str) -> Vec<MatchResult<'_, R>> {
        self.search_with(query, self.inner.engine.options())
    }

    pub fn search_with(&self, query: &str, options: &SearchOptions) -> Vec<MatchResult<'_, R>> {
        self.inner.engine.search_prepared(
            &self.snapshot.records,
            &self.snapshot.prepared,
            query,
            options,
        )
    }

    pub fn suggest(&self, partial_query: &str, max_suggestions: usize) -> Vec<String> {
        self.inner.engine.suggest_prepared(
            &self.snapshot.records,
            &self.snapshot.prepared,
            partial_query,
            max_suggestions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::record::InventoryItem;
    use std::thread;

    fn items() -> Vec<InventoryItem> {
        vec![
            InventoryItem::new("1", "Deck Screws 3in").with_category("Fasteners"),
            InventoryItem::new("2", "Composite Deck Clips"),
            InventoryItem::new("3", "Paint Brush"),
        ]
    }

    #[test]
    fn test_search_matches_engine() {
        let engine = SearchEngine::default();
        let items = items();
        let expected: Vec<usize> = engine
            .search(&items, "deck scrw")
            .iter()
            .map(|r| r.index)
            .collect();

        let catalog = Catalog::with_records(engine, items);
        let snapshot = catalog.snapshot();
        let got: Vec<usize> = snapshot.search("deck scrw").iter().map(|r| r.index).collect();
        assert_eq!(got, expected);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let catalog = Catalog::with_records(SearchEngine::default(), items());
        let old = catalog.snapshot();
        catalog.replace(vec![InventoryItem::new("9", "Joist Hanger")]);

        assert_eq!(old.len(), 3);
        assert_eq!(old.search("paint brush")[0].record.id, "3");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.snapshot().search("paint brush").is_empty());
    }

    #[test]
    fn test_stale_tickets() {
        let catalog = Catalog::with_records(SearchEngine::default(), items());
        let first = catalog.begin_query();
        assert!(catalog.is_current(first));

        let second = catalog.begin_query();
        assert!(!catalog.is_current(first));
        assert!(catalog.is_current(second));
        assert!(second > first);

        catalog.replace(items());
        assert!(!catalog.is_current(second));
    }

    #[test]
    fn test_empty_catalog() {
        let catalog: Catalog<InventoryItem> = Catalog::new(SearchEngine::default());
        assert!(catalog.is_empty());
        assert!(catalog.snapshot().search("deck").is_empty());
        assert!(catalog.suggest("deck", 5).is_empty());
    }

    #[test]
    fn test_concurrent_readers_and_writer() {
        let catalog = Catalog::with_records(SearchEngine::default(), items());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let catalog = catalog.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..50 {
                    let snapshot = catalog.snapshot();
                    let results = snapshot.search("deck");
                    assert!(results.len() <= snapshot.len());
                }
            }));
        }
        let writer = {
            let catalog = catalog.clone();
            thread::spawn(move || {
                for _ in 0..10 {
                    catalog.replace(items());
                }
            })
        };
        for handle in handles {
            handle.join().unwrap();
        }
        writer.join().unwrap();
        assert_eq!(catalog.len(), 3);
    }
}
