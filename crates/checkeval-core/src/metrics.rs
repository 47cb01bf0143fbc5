//! Precision, recall and F1 derived from a [`ConfusionMatrix`].
//!
//! Division by zero never panics or yields NaN: a ratio with a zero
//! denominator is [`MetricValue::Undefined`], and callers decide whether
//! that is fatal via [`Metrics::ensure_defined`].

use crate::aggregate::ConfusionMatrix;
use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};

const PRECISION_DENOMINATOR: &str = "true_positives + false_positives";
const RECALL_DENOMINATOR: &str = "true_positives + false_negative";

/// A ratio that may be undefined. Serialises as a number or `null`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetricValue {
    Defined(f64),
    Undefined,
}

impl MetricValue {
    /// `numerator / denominator`, or `Undefined` when the denominator is zero.
    pub fn ratio(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            MetricValue::Undefined
        } else {
            MetricValue::Defined(numerator as f64 / denominator as f64)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            MetricValue::Defined(v) => Some(*v),
            MetricValue::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, MetricValue::Defined(_))
    }
}

impl std::fmt::Display for MetricValue {
    /// Shortest round-trip form that always carries a fractional part
    /// (`1.0`, `0.5`, `0.3333333333333333`).
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricValue::Defined(v) => write!(f, "{v:?}"),
            MetricValue::Undefined => f.write_str("undefined"),
        }
    }
}

/// Derived accuracy metrics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Metrics {
    /// `TP / (TP + FP)`
    pub precision: MetricValue,
    /// `TP / (TP + FN)`
    pub recall: MetricValue,
    /// Harmonic mean of precision and recall.
    pub f1_score: MetricValue,
}

impl Metrics {
    /// Compute all metrics from the confusion matrix.
    pub fn from_matrix(matrix: &ConfusionMatrix) -> Self {
        let precision = precision(matrix);
        let recall = recall(matrix);
        Self {
            precision,
            recall,
            f1_score: f1_score(precision, recall),
        }
    }

    /// Fail with [`EvalError::UndefinedMetric`] if precision or recall is undefined.
    pub fn ensure_defined(&self) -> Result<()> {
        if !self.precision.is_defined() {
            return Err(EvalError::UndefinedMetric {
                metric: "precision",
                denominator: PRECISION_DENOMINATOR,
            });
        }
        if !self.recall.is_defined() {
            return Err(EvalError::UndefinedMetric {
                metric: "recall",
                denominator: RECALL_DENOMINATOR,
            });
        }
        Ok(())
    }
}

/// Fraction of flagged entries that are truly unsafe.
pub fn precision(matrix: &ConfusionMatrix) -> MetricValue {
    MetricValue::ratio(
        matrix.true_positives,
        matrix.true_positives + matrix.false_positives,
    )
}

/// Fraction of truly unsafe entries that were flagged.
pub fn recall(matrix: &ConfusionMatrix) -> MetricValue {
    MetricValue::ratio(
        matrix.true_positives,
        matrix.true_positives + matrix.false_negative,
    )
}

/// Returns `Defined(0.0)` when precision and recall are both zero.
pub fn f1_score(precision: MetricValue, recall: MetricValue) -> MetricValue {
    match (precision.value(), recall.value()) {
        (Some(p), Some(r)) if p + r > 0.0 => MetricValue::Defined(2.0 * p * r / (p + r)),
        (Some(_), Some(_)) => MetricValue::Defined(0.0),
        _ => MetricValue::Undefined,
    }
}
