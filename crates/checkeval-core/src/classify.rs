//! Per-line classification of checker output.
//!
//! Two protocols are understood:
//! - `Text`: free-form lines matched for the marker substrings
//!   [`FLAGGED_MARKER`] and [`CLEARED_MARKER`]; lines with neither marker
//!   are `Unclassified`.
//! - `JsonLines`: one [`EntryRecord`] per line with an explicit
//!   classification; undecodable lines are errors, never dropped.

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};

/// Substring the checker prints for an entry it flags.
pub const FLAGGED_MARKER: &str = "problematic";

/// Substring the checker prints for an entry it clears.
pub const CLEARED_MARKER: &str = "successfully";

/// Category assigned to one line of checker output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// The checker reported the entry as problematic.
    Flagged,

    /// The checker reported the entry as passing.
    Cleared,

    /// The line carries no verdict and is excluded from every count.
    Unclassified,
}

/// Wire format of the checker's stdout.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputProtocol {
    /// Marker substrings in free text.
    #[default]
    Text,

    /// One JSON [`EntryRecord`] per line.
    JsonLines,
}

/// Verdict field of a structured record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Flagged,
    Cleared,
}

/// A structured per-entry record emitted by the checker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntryRecord {
    /// Identifier of the compilation entry.
    pub entry: String,

    /// Checker verdict for the entry.
    pub classification: Verdict,
}

impl From<Verdict> for Category {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Flagged => Category::Flagged,
            Verdict::Cleared => Category::Cleared,
        }
    }
}

/// Classify one free-text line. `Flagged` wins when both markers appear.
pub fn classify_line(line: &str) -> Category {
    if line.contains(FLAGGED_MARKER) {
        Category::Flagged
    } else if line.contains(CLEARED_MARKER) {
        Category::Cleared
    } else {
        Category::Unclassified
    }
}

/// Classify free-text lines, one category per line in order.
pub fn classify_lines<S: AsRef<str>>(lines: &[S]) -> Vec<Category> {
    lines.iter().map(|l| classify_line(l.as_ref())).collect()
}

/// Decode structured records, skipping blank lines.
///
/// Line numbers in errors are 1-based.
pub fn decode_records<S: AsRef<str>>(lines: &[S]) -> Result<Vec<EntryRecord>> {
    let mut records = Vec::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        let line: &str = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str::<EntryRecord>(line).map_err(|e| {
            EvalError::MalformedRecord {
                line: idx + 1,
                reason: e.to_string(),
            }
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Classify checker output under the given protocol.
pub fn classify_output<S: AsRef<str>>(
    protocol: OutputProtocol,
    lines: &[S],
) -> Result<Vec<Category>> {
    match protocol {
        OutputProtocol::Text => Ok(classify_lines(lines)),
        OutputProtocol::JsonLines => Ok(decode_records(lines)?
            .into_iter()
            .map(|r| r.classification.into())
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_line_markers() {
        assert_eq!(classify_line("a.c: problematic leak"), Category::Flagged);
        assert_eq!(classify_line("b.c: analyzed successfully"), Category::Cleared);
        assert_eq!(classify_line("Compiling azhdaha"), Category::Unclassified);
        assert_eq!(classify_line(""), Category::Unclassified);
    }

    #[test]
    fn test_flagged_wins_tie_break() {
        assert_eq!(
            classify_line("successfully parsed, but problematic"),
            Category::Flagged
        );
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        assert_eq!(classify_line("PROBLEMATIC"), Category::Unclassified);
        assert_eq!(classify_line("Successfully"), Category::Unclassified);
    }

    #[test]
    fn test_classify_lines_is_parallel_to_input() {
        let lines = vec![
            "x: successfully",
            "noise",
            "y: problematic",
            "z: successfully",
        ];
        assert_eq!(
            classify_lines(&lines),
            vec![
                Category::Cleared,
                Category::Unclassified,
                Category::Flagged,
                Category::Cleared,
            ]
        );
    }

    #[test]
    fn test_synthetic_k_m_n_mix() {
        let (k, m, n) = (4, 7, 3);
        let mut lines = Vec::new();
        lines.extend((0..k).map(|i| format!("entry{i}: problematic")));
        lines.extend((0..m).map(|i| format!("entry{i}: successfully")));
        lines.extend((0..n).map(|i| format!("warning {i}")));

        let categories = classify_lines(&lines);
        let count = |c: Category| categories.iter().filter(|&&x| x == c).count();
        assert_eq!(count(Category::Flagged), k);
        assert_eq!(count(Category::Cleared), m);
        assert_eq!(count(Category::Unclassified), n);
    }

    #[test]
    fn test_decode_records() {
        let lines = vec![
            r#"{"entry": "case-1.c", "classification": "flagged"}"#,
            "",
            r#"{"entry": "case-2.c", "classification": "cleared"}"#,
        ];
        let records = decode_records(&lines).expect("decode");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].entry, "case-1.c");
        assert_eq!(records[1].classification, Verdict::Cleared);
    }

    #[test]
    fn test_decode_records_rejects_unknown_line() {
        let lines = vec![
            r#"{"entry": "case-1.c", "classification": "flagged"}"#,
            "case-2.c: successfully",
        ];
        let err = decode_records(&lines).expect_err("should reject free text");
        match err {
            EvalError::MalformedRecord { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_records_rejects_unknown_verdict() {
        let lines = vec![r#"{"entry": "case-1.c", "classification": "maybe"}"#];
        assert!(decode_records(&lines).is_err());
    }

    #[test]
    fn test_classify_output_json_lines() {
        let lines = vec![
            r#"{"entry": "a", "classification": "cleared"}"#,
            r#"{"entry": "b", "classification": "flagged"}"#,
        ];
        let categories = classify_output(OutputProtocol::JsonLines, &lines).expect("classify");
        assert_eq!(categories, vec![Category::Cleared, Category::Flagged]);
    }
}
