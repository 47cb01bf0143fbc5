//! Evaluation orchestration: invoke, classify, tally, score.

use crate::aggregate::{tally, ConfusionMatrix, RunTally};
use crate::classify::{classify_output, OutputProtocol};
use crate::error::Result;
use crate::fixture::FixtureSet;
use crate::invoker::{Invocation, InvokerConfig, OutputSource, ToolInvoker};
use crate::metrics::Metrics;
use crate::obs;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Instant;
use tracing::{info, Instrument};
use uuid::Uuid;

/// Everything needed to run one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvalConfig {
    /// Fixture set whose entries are all safe.
    pub safe: FixtureSet,

    /// Fixture set whose entries are all unsafe.
    pub unsafe_set: FixtureSet,

    /// How to launch the checker.
    pub invoker: InvokerConfig,

    /// Format of the checker's stdout.
    pub protocol: OutputProtocol,

    /// Run both checker invocations concurrently.
    pub parallel: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            safe: FixtureSet::safe("./tests/compile_commands_safe.json"),
            unsafe_set: FixtureSet::unsafe_set("./tests/compile_commands_unsafe.json"),
            invoker: InvokerConfig::default(),
            protocol: OutputProtocol::Text,
            parallel: false,
        }
    }
}

impl EvalConfig {
    /// Create a configuration for the given fixture paths with default invoker settings.
    pub fn new(safe: FixtureSet, unsafe_set: FixtureSet) -> Self {
        Self {
            safe,
            unsafe_set,
            ..Self::default()
        }
    }

    pub fn with_protocol(mut self, protocol: OutputProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_invoker(mut self, invoker: InvokerConfig) -> Self {
        self.invoker = invoker;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Result of classifying one checker run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    /// Fixture set the run covered.
    pub fixture: FixtureSet,

    /// Category counts for the run's output.
    pub tally: RunTally,

    /// Checker exit code.
    pub exit_code: i32,

    /// Duration in milliseconds.
    pub duration_ms: u64,

    /// SHA-256 of the captured stdout.
    pub output_digest: String,
}

/// Result of a complete evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvalOutcome {
    pub eval_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,

    /// Safe run first, then unsafe.
    pub runs: Vec<RunSummary>,

    pub matrix: ConfusionMatrix,
    pub metrics: Metrics,
}

impl EvalOutcome {
    /// Total unclassified lines across all runs.
    pub fn unclassified(&self) -> u64 {
        self.runs.iter().map(|r| r.tally.unclassified).sum()
    }
}

/// Evaluation orchestrator.
pub struct Evaluator;

impl Evaluator {
    /// Launch the real checker described by `config.invoker`.
    pub async fn run_tool(config: &EvalConfig) -> Result<EvalOutcome> {
        let invoker = ToolInvoker::new(config.invoker.clone());
        Self::run(&invoker, config).await
    }

    /// Run the checker over both fixture sets and score the result.
    ///
    /// In sequential mode the safe run completes before the unsafe run
    /// begins. Any invocation or decoding error aborts the evaluation.
    pub async fn run(source: &dyn OutputSource, config: &EvalConfig) -> Result<EvalOutcome> {
        let eval_id = Uuid::new_v4();
        let span = obs::eval_span(&eval_id.to_string());
        Self::run_inner(source, config, eval_id).instrument(span).await
    }

    async fn run_inner(
        source: &dyn OutputSource,
        config: &EvalConfig,
        eval_id: Uuid,
    ) -> Result<EvalOutcome> {
        let start = Instant::now();
        let started_at = Utc::now();
        let eval_id_str = eval_id.to_string();

        obs::emit_eval_started(&eval_id_str, 2, config.parallel);

        let (safe, unsafe_run) = if config.parallel {
            tokio::try_join!(source.invoke(&config.safe), source.invoke(&config.unsafe_set))?
        } else {
            let safe = source.invoke(&config.safe).await?;
            let unsafe_run = source.invoke(&config.unsafe_set).await?;
            (safe, unsafe_run)
        };

        let runs = vec![
            summarize(&safe, config.protocol)?,
            summarize(&unsafe_run, config.protocol)?,
        ];

        let matrix = ConfusionMatrix::from_tallies(runs.iter().map(|r| &r.tally));
        let metrics = Metrics::from_matrix(&matrix);
        let duration_ms = start.elapsed().as_millis() as u64;

        obs::emit_eval_finished(&eval_id_str, duration_ms, &matrix);
        info!(
            precision = %metrics.precision,
            recall = %metrics.recall,
            "Evaluation complete"
        );

        Ok(EvalOutcome {
            eval_id,
            started_at,
            duration_ms,
            runs,
            matrix,
            metrics,
        })
    }
}

/// Classify and tally one invocation.
pub fn summarize(invocation: &Invocation, protocol: OutputProtocol) -> Result<RunSummary> {
    let lines = invocation.lines();
    let categories = classify_output(protocol, &lines)?;
    let run_tally = tally(invocation.fixture.label, &categories);
    obs::emit_run_classified(&invocation.fixture, &run_tally);

    Ok(RunSummary {
        fixture: invocation.fixture.clone(),
        tally: run_tally,
        exit_code: invocation.exit_code,
        duration_ms: invocation.duration_ms,
        output_digest: compute_output_digest(&invocation.stdout),
    })
}

/// Compute the SHA-256 hex digest of captured output.
fn compute_output_digest(stdout: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(stdout.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::GroundTruth;

    fn invocation(label: GroundTruth, stdout: &str) -> Invocation {
        Invocation {
            fixture: FixtureSet::new(format!("{label}.json"), label),
            exit_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
            duration_ms: 5,
        }
    }

    #[test]
    fn test_summarize_text_output() {
        let inv = invocation(
            GroundTruth::Unsafe,
            "a: problematic\nb: successfully\nnoise\n",
        );
        let summary = summarize(&inv, OutputProtocol::Text).expect("summarize");
        assert_eq!(summary.tally.flagged, 1);
        assert_eq!(summary.tally.cleared, 1);
        assert_eq!(summary.tally.unclassified, 1);
        assert_eq!(summary.output_digest.len(), 64);
    }

    #[test]
    fn test_summarize_json_lines_rejects_free_text() {
        let inv = invocation(GroundTruth::Safe, "a: successfully\n");
        assert!(summarize(&inv, OutputProtocol::JsonLines).is_err());
    }

    #[test]
    fn test_output_digest_deterministic() {
        assert_eq!(
            compute_output_digest("same output"),
            compute_output_digest("same output")
        );
        assert_ne!(compute_output_digest("a"), compute_output_digest("b"));
    }

    #[test]
    fn test_default_config_matches_reference_paths() {
        let config = EvalConfig::default();
        assert_eq!(config.safe.label, GroundTruth::Safe);
        assert_eq!(config.unsafe_set.label, GroundTruth::Unsafe);
        assert_eq!(
            config.unsafe_set.display_path(),
            "./tests/compile_commands_unsafe.json"
        );
        assert!(!config.parallel);
        assert_eq!(config.protocol, OutputProtocol::Text);
    }
}
