//! JSON configuration for a search engine
//!
//! ```json
//! {
//!   "options": { "fuzzy_threshold": 0.75, "min_score": 0.3, "max_results": 50 },
//!   "field_weights": { "description": 1.5 },
//!   "synonyms": { "fasteners": ["lag", "toggle"] },
//!   "builtin_synonyms": true
//! }
//! ```
//!
//! Every key is optional. Unlike [`SearchOptions::sanitized`], loading is
//! strict: out-of-range values are reported instead of repaired.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::search::{FieldSet, OptionsError, SchemaError, SearchEngine, SearchOptions, SynonymTable};

/// Errors that can occur when loading a search configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse JSON config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid search options: {0}")]
    Options(#[from] OptionsError),

    #[error("invalid field weights: {0}")]
    Schema(#[from] SchemaError),

    /// A weight was given for a field the engine does not search
    #[error("unknown field in field_weights: {0}")]
    UnknownField(String),
}

fn true_value() -> bool {
    true
}

/// Search engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub options: SearchOptions,

    /// Weight overrides for the inventory fields
    #[serde(default)]
    pub field_weights: AHashMap<String, f64>,

    /// Extra related terms, canonical term first
    #[serde(default)]
    pub synonyms: AHashMap<String, Vec<String>>,

    /// Start from the built-in building-supply vocabulary
    #[serde(default = "true_value")]
    pub builtin_synonyms: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            options: SearchOptions::default(),
            field_weights: AHashMap::new(),
            synonyms: AHashMap::new(),
            builtin_synonyms: true,
        }
    }
}

impl SearchConfig {
    /// Load and validate a JSON configuration file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.options.validate()?;
        self.fields()?;
        Ok(())
    }

    /// Inventory field set with the configured weights applied
    pub fn fields(&self) -> Result<FieldSet, ConfigError> {
        let base = FieldSet::inventory();
        if let Some(unknown) = self.field_weights.keys().find(|k| base.get(k).is_none()) {
            return Err(ConfigError::UnknownField(unknown.clone()));
        }
        Ok(base.with_weights(&self.field_weights)?)
    }

    pub fn synonym_table(&self) -> Arc<SynonymTable> {
        if self.synonyms.is_empty() && self.builtin_synonyms {
            return SynonymTable::builtin();
        }
        let extra = self
            .synonyms
            .iter()
            .map(|(canonical, related)| (canonical.as_str(), related.iter().map(String::as_str)));
        let table = if self.builtin_synonyms {
            SynonymTable::with_extra(extra)
        } else {
            let mut table = SynonymTable::new();
            for (canonical, related) in extra {
                table.insert(canonical, related);
            }
            table
        };
        Arc::new(table)
    }

    /// Build the configured engine
    pub fn into_engine(self) -> Result<SearchEngine, ConfigError> {
        self.options.validate()?;
        let fields = self.fields()?;
        let synonyms = self.synonym_table();
        Ok(SearchEngine::new(fields, synonyms).with_options(self.options))
    }
}
