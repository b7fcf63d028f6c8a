//! Inventory search pipeline
//!
//! A query and each record field are normalized into tokens, every field is
//! scored by four match strategies (exact, partial, fuzzy, semantic), field
//! scores are combined with per-field weights, and records are filtered and
//! ranked in a total order.
//!
//! Modules:
//! - [`fields`] / [`record`]: which fields are searched and how records expose them
//! - [`strategies`]: per-field matching
//! - [`scoring`]: weighted aggregation per record
//! - [`ranking`]: filtering, ordering and truncation
//! - [`engine`]: the pipeline end to end
//! - [`suggest`]: autocomplete strings
//! - [`catalog`]: shared pre-tokenized collection for repeated queries

pub mod catalog;
pub mod engine;
pub mod fields;
pub mod options;
pub mod ranking;
pub mod record;
pub mod scoring;
pub mod strategies;
pub mod suggest;
pub mod synonyms;

pub use catalog::{Catalog, CatalogSnapshot, QueryTicket};
pub use engine::{FieldMatch, MatchResult, SearchEngine};
pub use fields::{FieldSet, FieldSetBuilder, FieldSpec, SchemaError};
pub use options::{OptionsError, SearchOptions, SortBy};
pub use record::{InventoryItem, PreparedField, PreparedRecord, Record, Searchable};
pub use strategies::{MatchKind, StrategyScore};
pub use suggest::MIN_SUGGEST_CHARS;
pub use synonyms::SynonymTable;
