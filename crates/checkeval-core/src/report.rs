//! Evaluation report rendering.
//!
//! Two formats:
//! - text: `<name> = <value>` lines on stdout, counts first, a blank line,
//!   then precision and recall. Labels are stable for grepping.
//! - json: [`EvalResults`], the full outcome plus the gate verdict.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::ConfusionMatrix;
use crate::error::Result;
use crate::evaluator::{EvalOutcome, RunSummary};
use crate::gate::GateVerdict;
use crate::metrics::Metrics;

/// Output format of the report.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Render the plain-text report for a matrix and its metrics.
pub fn render_text(matrix: &ConfusionMatrix, metrics: &Metrics) -> String {
    let mut out = String::new();
    out.push_str(&format!("false_positives = {}\n", matrix.false_positives));
    out.push_str(&format!("true_negative = {}\n", matrix.true_negative));
    out.push_str(&format!("true_positives = {}\n", matrix.true_positives));
    out.push_str(&format!("false_negative = {}\n", matrix.false_negative));
    out.push('\n');
    out.push_str(&format!("precision = {}\n", metrics.precision));
    out.push_str(&format!("recall = {}\n", metrics.recall));
    out
}

// ── machine-readable report ───────────────────────────────────────────────

/// Machine-readable evaluation results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalResults {
    pub eval_id: Uuid,
    pub run_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub runs: Vec<RunSummary>,
    pub matrix: ConfusionMatrix,
    pub metrics: Metrics,
    /// Output lines that matched no marker, across all runs.
    pub unclassified: u64,
    pub gate: Option<GateVerdict>,
}

impl EvalResults {
    /// Build results from an outcome and an optional gate verdict.
    pub fn new(outcome: &EvalOutcome, gate: Option<GateVerdict>) -> Self {
        Self {
            eval_id: outcome.eval_id,
            run_at: outcome.started_at,
            duration_ms: outcome.duration_ms,
            runs: outcome.runs.clone(),
            matrix: outcome.matrix,
            metrics: outcome.metrics,
            unclassified: outcome.unclassified(),
            gate,
        }
    }
}

/// Render an outcome in the requested format.
pub fn render(
    format: ReportFormat,
    outcome: &EvalOutcome,
    gate: Option<&GateVerdict>,
) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(&outcome.matrix, &outcome.metrics)),
        ReportFormat::Json => {
            let results = EvalResults::new(outcome, gate.cloned());
            let mut json = serde_json::to_string_pretty(&results)?;
            json.push('\n');
            Ok(json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricValue;

    #[test]
    fn test_render_text_layout() {
        let matrix = ConfusionMatrix {
            false_positives: 0,
            true_negative: 2,
            true_positives: 1,
            false_negative: 1,
        };
        let metrics = Metrics::from_matrix(&matrix);
        let text = render_text(&matrix, &metrics);
        assert_eq!(
            text,
            "false_positives = 0\n\
             true_negative = 2\n\
             true_positives = 1\n\
             false_negative = 1\n\
             \n\
             precision = 1.0\n\
             recall = 0.5\n"
        );
    }

    #[test]
    fn test_render_text_undefined_still_emits_counts() {
        let matrix = ConfusionMatrix {
            false_positives: 0,
            true_negative: 3,
            true_positives: 0,
            false_negative: 2,
        };
        let metrics = Metrics::from_matrix(&matrix);
        assert_eq!(metrics.precision, MetricValue::Undefined);

        let text = render_text(&matrix, &metrics);
        assert!(text.contains("true_negative = 3\n"));
        assert!(text.contains("false_negative = 2\n"));
        assert!(text.contains("precision = undefined\n"));
        assert!(text.contains("recall = 0.0\n"));
    }
}
