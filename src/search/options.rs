//! Caller-supplied search options

use crate::algorithms::FuzzyAlgorithm;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.7;
pub const DEFAULT_MIN_SCORE: f64 = 0.3;
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Invalid option values, reported when options come from configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionsError {
    #[error("{name} must be a finite number in [0.0, 1.0], got {value}")]
    OutOfRange { name: &'static str, value: f64 },

    #[error("max_results must be greater than zero")]
    ZeroMaxResults,
}

/// Result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Score descending, then name
    #[default]
    Relevance,
    /// Name ascending, then score
    Name,
}

/// Search options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Similarity below which a fuzzy token pair is rejected (0.0 - 1.0)
    pub fuzzy_threshold: f64,

    /// Minimum record score kept in the results (0.0 - 1.0)
    pub min_score: f64,

    /// Maximum number of results to return
    pub max_results: usize,

    pub sort_by: SortBy,

    /// Token similarity used by the fuzzy strategy
    pub fuzzy_algorithm: FuzzyAlgorithm,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            min_score: DEFAULT_MIN_SCORE,
            max_results: DEFAULT_MAX_RESULTS,
            sort_by: SortBy::Relevance,
            fuzzy_algorithm: FuzzyAlgorithm::default(),
        }
    }
}

fn check_unit(name: &'static str, value: f64) -> Result<(), OptionsError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(OptionsError::OutOfRange { name, value })
    }
}

/// Repair a [0, 1] value: non-finite falls back to `default`, the rest is clamped.
fn repair_unit(name: &'static str, value: f64, default: f64) -> f64 {
    let repaired = if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        default
    };
    if repaired != value {
        warn!(option = name, value, repaired, "search option out of range");
    }
    repaired
}

impl SearchOptions {
    /// Create options with a minimum score threshold
    pub fn with_min_score(min_score: f64) -> Self {
        Self {
            min_score,
            ..Default::default()
        }
    }

    /// Set the result limit
    pub fn with_limit(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn with_algorithm(mut self, algorithm: FuzzyAlgorithm) -> Self {
        self.fuzzy_algorithm = algorithm;
        self
    }

    /// Strict check, used at the configuration boundary
    pub fn validate(&self) -> Result<(), OptionsError> {
        check_unit("fuzzy_threshold", self.fuzzy_threshold)?;
        check_unit("min_score", self.min_score)?;
        if self.max_results == 0 {
            return Err(OptionsError::ZeroMaxResults);
        }
        Ok(())
    }

    /// Copy with every invalid value replaced, so searching never fails.
    pub fn sanitized(&self) -> Self {
        let max_results = if self.max_results == 0 {
            warn!(
                repaired = DEFAULT_MAX_RESULTS,
                "max_results of zero replaced with default"
            );
            DEFAULT_MAX_RESULTS
        } else {
            self.max_results
        };
        Self {
            fuzzy_threshold: repair_unit(
                "fuzzy_threshold",
                self.fuzzy_threshold,
                DEFAULT_FUZZY_THRESHOLD,
            ),
            min_score: repair_unit("min_score", self.min_score, DEFAULT_MIN_SCORE),
            max_results,
            sort_by: self.sort_by,
            fuzzy_algorithm: self.fuzzy_algorithm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = SearchOptions::default();
        assert_eq!(opts.fuzzy_threshold, 0.7);
        assert_eq!(opts.min_score, 0.3);
        assert_eq!(opts.max_results, 100);
        assert_eq!(opts.sort_by, SortBy::Relevance);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let opts = SearchOptions::with_min_score(0.5)
            .with_limit(10)
            .with_fuzzy_threshold(0.8)
            .with_sort(SortBy::Name)
            .with_algorithm(FuzzyAlgorithm::Levenshtein);
        assert_eq!(opts.min_score, 0.5);
        assert_eq!(opts.max_results, 10);
        assert_eq!(opts.fuzzy_threshold, 0.8);
        assert_eq!(opts.sort_by, SortBy::Name);
        assert_eq!(opts.fuzzy_algorithm, FuzzyAlgorithm::Levenshtein);
    }

    #[test]
    fn test_validate_rejects() {
        let err = SearchOptions::with_min_score(1.5).validate().unwrap_err();
        assert_eq!(
            err,
            OptionsError::OutOfRange {
                name: "min_score",
                value: 1.5
            }
        );
        assert!(SearchOptions::default()
            .with_fuzzy_threshold(f64::NAN)
            .validate()
            .is_err());
        assert_eq!(
            SearchOptions::default().with_limit(0).validate(),
            Err(OptionsError::ZeroMaxResults)
        );
    }

    #[test]
    fn test_sanitized_repairs() {
        let opts = SearchOptions::with_min_score(-0.5)
            .with_fuzzy_threshold(f64::INFINITY)
            .with_limit(0)
            .sanitized();
        assert_eq!(opts.min_score, 0.0);
        assert_eq!(opts.fuzzy_threshold, DEFAULT_FUZZY_THRESHOLD);
        assert_eq!(opts.max_results, DEFAULT_MAX_RESULTS);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let opts: SearchOptions =
            serde_json::from_str(r#"{"min_score": 0.5, "sort_by": "name"}"#).unwrap();
        assert_eq!(opts.min_score, 0.5);
        assert_eq!(opts.sort_by, SortBy::Name);
        assert_eq!(opts.max_results, DEFAULT_MAX_RESULTS);
    }
}
