//! Structured lifecycle events for an evaluation.
//!
//! Events are emitted at `info!` level except unclassified-output warnings.
//! Filter with `RUST_LOG`; pass `--json` to the binary for JSON lines.

use crate::aggregate::{ConfusionMatrix, RunTally};
use crate::fixture::FixtureSet;
use tracing::{info, warn};

/// Span tagged with the evaluation id, for use with `Instrument`.
///
/// ```ignore
/// evaluate().instrument(eval_span("6f1c...")).await
/// // every log line inside now carries eval_id
/// ```
pub fn eval_span(eval_id: &str) -> tracing::Span {
    tracing::info_span!("checkeval.eval", eval_id = %eval_id)
}

/// Emit event: evaluation started.
pub fn emit_eval_started(eval_id: &str, fixtures: usize, parallel: bool) {
    info!(event = "eval.started", eval_id = %eval_id, fixtures, parallel);
}

/// Emit event: checker launched for a fixture set.
pub fn emit_invocation_started(fixture: &FixtureSet, command: &[String]) {
    info!(
        event = "invocation.started",
        fixture = %fixture.display_path(),
        label = %fixture.label,
        command = %command.join(" "),
    );
}

/// Emit event: checker exited.
pub fn emit_invocation_finished(fixture: &FixtureSet, exit_code: i32, duration_ms: u64) {
    info!(
        event = "invocation.finished",
        fixture = %fixture.display_path(),
        exit_code,
        duration_ms,
    );
}

/// Emit event: a run's output was classified.
///
/// Unclassified lines are excluded from every metric, so a non-zero count is
/// reported as a warning.
pub fn emit_run_classified(fixture: &FixtureSet, tally: &RunTally) {
    info!(
        event = "run.classified",
        fixture = %fixture.display_path(),
        label = %tally.label,
        flagged = tally.flagged,
        cleared = tally.cleared,
        unclassified = tally.unclassified,
    );
    if tally.unclassified > 0 {
        warn!(
            event = "run.unclassified_lines",
            fixture = %fixture.display_path(),
            unclassified = tally.unclassified,
            "output lines matched neither marker and were not counted"
        );
    }
}

/// Emit event: evaluation finished with the final matrix.
pub fn emit_eval_finished(eval_id: &str, duration_ms: u64, matrix: &ConfusionMatrix) {
    info!(
        event = "eval.finished",
        eval_id = %eval_id,
        duration_ms,
        false_positives = matrix.false_positives,
        true_negative = matrix.true_negative,
        true_positives = matrix.true_positives,
        false_negative = matrix.false_negative,
    );
}

/// Emit event: accuracy gate evaluated.
pub fn emit_gate_evaluated(passed: bool, violations: usize) {
    info!(event = "gate.evaluated", passed, violations);
}
