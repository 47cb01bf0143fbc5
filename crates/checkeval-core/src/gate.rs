//! Accuracy gate.
//!
//! Evaluates [`Metrics`] against optional minimum precision and recall to
//! produce a [`GateVerdict`]. A configured rule whose metric is undefined is
//! a violation.

use serde::{Deserialize, Serialize};

use crate::metrics::{MetricValue, Metrics};

/// Minimum acceptable metric values. `None` disables the rule.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct AccuracyThresholds {
    pub min_precision: Option<f64>,
    pub min_recall: Option<f64>,
}

impl AccuracyThresholds {
    /// Whether any rule is configured.
    pub fn is_empty(&self) -> bool {
        self.min_precision.is_none() && self.min_recall.is_none()
    }
}

/// A single gate rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GateRule {
    MinPrecision,
    MinRecall,
}

/// A single rule violation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Violation {
    /// Which rule was violated.
    pub rule: GateRule,
    /// Human-readable explanation.
    pub reason: String,
}

/// The outcome of evaluating thresholds against metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GateVerdict {
    /// Violations found (empty when passed).
    pub violations: Vec<Violation>,
}

impl GateVerdict {
    /// Whether the gate passed (i.e., there are no violations).
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Evaluate `metrics` against `thresholds`.
pub fn evaluate_gate(thresholds: &AccuracyThresholds, metrics: &Metrics) -> GateVerdict {
    let checks = [
        (GateRule::MinPrecision, "precision", thresholds.min_precision, metrics.precision),
        (GateRule::MinRecall, "recall", thresholds.min_recall, metrics.recall),
    ];

    let violations = checks
        .into_iter()
        .filter_map(|(rule, name, min, value)| {
            let min = min?;
            check_rule(rule, name, min, value)
        })
        .collect();

    GateVerdict { violations }
}

fn check_rule(rule: GateRule, name: &str, min: f64, value: MetricValue) -> Option<Violation> {
    match value {
        MetricValue::Defined(v) if v >= min => None,
        MetricValue::Defined(v) => Some(Violation {
            rule,
            reason: format!("{name} {:.2}% < required {:.2}%", v * 100.0, min * 100.0),
        }),
        MetricValue::Undefined => Some(Violation {
            rule,
            reason: format!("{name} is undefined; required {:.2}%", min * 100.0),
        }),
    }
}
