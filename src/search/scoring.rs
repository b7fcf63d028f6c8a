//! Combining per-field scores into one record score
//!
//! Only fields that matched take part in the weighted average, so an item
//! that matches on its description alone is not dragged down by the
//! fields that did not match:
//!
//! ```text
//! record_score = Σ(score_i × weight_i) / Σ(weight_i where score_i > 0)
//! ```
//!
//! A record with an exact field match takes the maximum score of 1.0;
//! weaker matches on its other fields do not dilute it.

use super::strategies::MatchKind;
use smallvec::SmallVec;
use std::cmp::Ordering;

/// Best strategy score for one field of one record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldScore {
    /// Position of the field in its field set
    pub field: usize,

    pub kind: MatchKind,

    /// Similarity score (0.0 - 1.0)
    pub score: f64,

    pub weight: f64,
}

impl FieldScore {
    pub fn new(field: usize, kind: MatchKind, score: f64, weight: f64) -> Self {
        Self {
            field,
            kind,
            score: score.clamp(0.0, 1.0),
            weight: weight.max(0.0),
        }
    }

    /// Get the weighted score (score × weight)
    pub fn weighted_score(&self) -> f64 {
        self.score * self.weight
    }
}

pub type FieldScores = SmallVec<[FieldScore; 4]>;

/// Weighted average over matched fields
pub struct WeightedAverage;

impl WeightedAverage {
    /// Overall score in [0.0, 1.0]; 0.0 when nothing matched.
    pub fn combine(field_scores: &[FieldScore]) -> f64 {
        let mut total_weighted_score = 0.0;
        let mut total_weight = 0.0;

        for fs in field_scores {
            if fs.score > 0.0 && fs.weight > 0.0 {
                total_weighted_score += fs.weighted_score();
                total_weight += fs.weight;
            }
        }

        if total_weight > 0.0 {
            (total_weighted_score / total_weight).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Record-level outcome of aggregation
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub score: f64,

    /// Kind of the best-scoring field
    pub kind: MatchKind,

    /// Nonzero fields, best first
    pub fields: FieldScores,
}

/// Field order for reporting: score descending, then weight descending,
/// then field-set order.
fn by_strength(a: &FieldScore, b: &FieldScore) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.weight.total_cmp(&a.weight))
        .then(a.field.cmp(&b.field))
}

/// Aggregate field scores for one record.
///
/// The dominant kind is the kind of the best-scoring field, so an exact
/// field match always makes the record exact. Returns `None` when no field
/// scored above zero; such records are never results.
pub fn aggregate(mut fields: FieldScores) -> Option<Aggregate> {
    fields.retain(|fs| fs.score > 0.0 && fs.weight > 0.0);
    fields.sort_by(by_strength);
    let dominant = *fields.first()?;

    let score = if dominant.kind == MatchKind::Exact {
        1.0
    } else {
        WeightedAverage::combine(&fields)
    };

    Some(Aggregate {
        score,
        kind: dominant.kind,
        fields,
    })
}
