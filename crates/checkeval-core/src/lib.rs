//! checkeval - accuracy evaluation for a binary static-analysis checker
//!
//! Runs the checker over a safe and an unsafe fixture set and:
//! - Classifies each output line as flagged, cleared or unclassified
//! - Folds the per-run counts into a confusion matrix
//! - Reports precision and recall, with explicit undefined values
//! - Optionally gates on minimum precision/recall

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod evaluator;
pub mod fakes;
pub mod fixture;
pub mod gate;
pub mod invoker;
pub mod metrics;
pub mod obs;
pub mod report;
pub mod telemetry;

// Re-export key types
pub use aggregate::{cell_for, tally, Cell, ConfusionMatrix, RunTally};
pub use classify::{
    classify_line, classify_lines, classify_output, decode_records, Category, EntryRecord,
    OutputProtocol, Verdict, CLEARED_MARKER, FLAGGED_MARKER,
};
pub use error::{EvalError, Result};
pub use evaluator::{EvalConfig, EvalOutcome, Evaluator, RunSummary};
pub use fixture::{FixtureSet, GroundTruth};
pub use gate::{evaluate_gate, AccuracyThresholds, GateRule, GateVerdict, Violation};
pub use invoker::{split_output, Invocation, InvokerConfig, OutputSource, ToolInvoker};
pub use metrics::{MetricValue, Metrics};
pub use report::{render, render_text, EvalResults, ReportFormat};
pub use telemetry::init_tracing;
