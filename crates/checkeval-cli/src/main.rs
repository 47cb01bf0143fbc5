//! checkeval - accuracy evaluation CLI
//!
//! Runs the checker against the safe and unsafe fixture sets and prints the
//! confusion matrix, precision and recall.
//!
//! The defaults reproduce `just run <fixture> --do-not-report` against
//! `./tests/compile_commands_{safe,unsafe}.json`.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn, Level};

use checkeval_core::{
    evaluate_gate, obs, render, AccuracyThresholds, EvalConfig, Evaluator, FixtureSet,
    InvokerConfig, OutputProtocol, ReportFormat,
};

#[derive(Parser, Debug)]
#[command(name = "checkeval")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Measure a checker's precision and recall on labelled fixtures", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,

    /// Checker executable
    #[arg(long, env = "CHECKEVAL_PROGRAM", default_value = "just")]
    program: String,

    /// Argument placed before the fixture path (repeatable)
    #[arg(
        long = "arg",
        value_name = "ARG",
        allow_hyphen_values = true,
        default_values_t = vec!["run".to_string()]
    )]
    leading_args: Vec<String>,

    /// Argument placed after the fixture path (repeatable)
    #[arg(
        long = "trailing-arg",
        value_name = "ARG",
        allow_hyphen_values = true,
        default_values_t = vec!["--do-not-report".to_string()]
    )]
    trailing_args: Vec<String>,

    /// Fixture manifest whose entries are all safe
    #[arg(long, default_value = "./tests/compile_commands_safe.json")]
    safe: PathBuf,

    /// Fixture manifest whose entries are all unsafe
    #[arg(long = "unsafe", default_value = "./tests/compile_commands_unsafe.json")]
    unsafe_path: PathBuf,

    /// Format of the checker's stdout
    #[arg(long, value_enum, default_value_t = ProtocolArg::Text)]
    protocol: ProtocolArg,

    /// Report format
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,

    /// Run both checker invocations concurrently
    #[arg(long)]
    parallel: bool,

    /// Abort a checker run after this many seconds (0 = wait indefinitely)
    #[arg(long, default_value = "0")]
    timeout_secs: u64,

    /// Fail unless precision is at least this value (0.0-1.0)
    #[arg(long)]
    min_precision: Option<f64>,

    /// Fail unless recall is at least this value (0.0-1.0)
    #[arg(long)]
    min_recall: Option<f64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProtocolArg {
    Text,
    JsonLines,
}

impl From<ProtocolArg> for OutputProtocol {
    fn from(arg: ProtocolArg) -> Self {
        match arg {
            ProtocolArg::Text => OutputProtocol::Text,
            ProtocolArg::JsonLines => OutputProtocol::JsonLines,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

impl Cli {
    fn eval_config(&self) -> EvalConfig {
        let invoker = InvokerConfig::custom(
            self.program.clone(),
            self.leading_args.clone(),
            self.trailing_args.clone(),
        )
        .with_timeout(self.timeout_secs);

        EvalConfig::new(
            FixtureSet::safe(&self.safe),
            FixtureSet::unsafe_set(&self.unsafe_path),
        )
        .with_invoker(invoker)
        .with_protocol(self.protocol.into())
        .parallel(self.parallel)
    }

    fn thresholds(&self) -> AccuracyThresholds {
        AccuracyThresholds {
            min_precision: self.min_precision,
            min_recall: self.min_recall,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    checkeval_core::init_tracing(cli.json, level);

    cmd_evaluate(&cli).await
}

/// Run the evaluation, print the report, then apply the undefined-metric
/// and gate checks.
async fn cmd_evaluate(cli: &Cli) -> Result<()> {
    let config = cli.eval_config();
    info!(
        safe = %config.safe.display_path(),
        unsafe_set = %config.unsafe_set.display_path(),
        program = %config.invoker.program,
        "Starting evaluation"
    );

    let outcome = Evaluator::run_tool(&config)
        .await
        .context("Evaluation failed")?;

    let thresholds = cli.thresholds();
    let verdict = if thresholds.is_empty() {
        None
    } else {
        let verdict = evaluate_gate(&thresholds, &outcome.metrics);
        obs::emit_gate_evaluated(verdict.passed(), verdict.violations.len());
        Some(verdict)
    };

    let report = render(cli.format.into(), &outcome, verdict.as_ref())?;
    print!("{}", report);

    if outcome.unclassified() > 0 {
        warn!(
            unclassified = outcome.unclassified(),
            "Some checker output lines were not counted"
        );
    }

    outcome
        .metrics
        .ensure_defined()
        .context("Metrics could not be computed")?;

    if let Some(verdict) = verdict {
        if !verdict.passed() {
            for violation in &verdict.violations {
                eprintln!("  - {}", violation.reason);
            }
            anyhow::bail!(
                "Accuracy gate failed with {} violation(s)",
                verdict.violations.len()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkeval_core::GroundTruth;

    #[test]
    fn test_cli_defaults_match_reference_invocation() {
        let cli = Cli::parse_from(["checkeval"]);
        let config = cli.eval_config();
        assert_eq!(
            config.invoker.command_for(&config.safe),
            vec![
                "just".to_string(),
                "run".to_string(),
                "./tests/compile_commands_safe.json".to_string(),
                "--do-not-report".to_string(),
            ]
        );
        assert_eq!(config.unsafe_set.label, GroundTruth::Unsafe);
        assert_eq!(config.invoker.timeout_secs, 0);
        assert!(!config.parallel);
        assert!(cli.thresholds().is_empty());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "checkeval",
            "--program",
            "azhdaha",
            "--arg",
            "analyze",
            "--arg",
            "--path",
            "--trailing-arg",
            "--quiet",
            "--unsafe",
            "bad.json",
            "--protocol",
            "json-lines",
            "--parallel",
            "--timeout-secs",
            "30",
            "--min-recall",
            "0.8",
        ]);
        let config = cli.eval_config();
        assert_eq!(
            config.invoker.command_for(&config.unsafe_set),
            vec![
                "azhdaha".to_string(),
                "analyze".to_string(),
                "--path".to_string(),
                "bad.json".to_string(),
                "--quiet".to_string(),
            ]
        );
        assert_eq!(config.protocol, OutputProtocol::JsonLines);
        assert!(config.parallel);
        assert_eq!(config.invoker.timeout_secs, 30);
        assert_eq!(cli.thresholds().min_recall, Some(0.8));
    }

    #[tokio::test]
    async fn test_cmd_evaluate_missing_checker_fails() {
        let cli = Cli::parse_from(["checkeval", "--program", "checkeval-no-such-checker"]);
        let err = cmd_evaluate(&cli).await.expect_err("should fail");
        assert!(format!("{:#}", err).contains("checkeval-no-such-checker"));
    }
}
