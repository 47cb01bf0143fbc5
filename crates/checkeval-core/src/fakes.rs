//! In-memory output source (testing only)
//!
//! `CannedOutput` answers each fixture set with pre-recorded checker stdout
//! keyed by fixture path, without launching a process.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{EvalError, Result};
use crate::fixture::FixtureSet;
use crate::invoker::{Invocation, OutputSource};

/// Pre-recorded checker output keyed by fixture path.
#[derive(Debug, Default)]
pub struct CannedOutput {
    outputs: HashMap<PathBuf, String>,
    calls: Mutex<Vec<PathBuf>>,
}

impl CannedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `fixture` with `stdout`.
    pub fn with_output(mut self, fixture: &FixtureSet, stdout: impl Into<String>) -> Self {
        self.outputs.insert(fixture.path.clone(), stdout.into());
        self
    }

    /// Answer `fixture` with the given lines joined by newlines.
    pub fn with_lines<S: AsRef<str>>(self, fixture: &FixtureSet, lines: &[S]) -> Self {
        let stdout = lines
            .iter()
            .map(AsRef::<str>::as_ref)
            .collect::<Vec<_>>()
            .join("\n");
        self.with_output(fixture, stdout)
    }

    /// Fixture paths in the order they were invoked.
    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl OutputSource for CannedOutput {
    async fn invoke(&self, fixture: &FixtureSet) -> Result<Invocation> {
        self.calls.lock().unwrap().push(fixture.path.clone());

        // Unknown fixtures behave like a checker that cannot be launched.
        let stdout = self.outputs.get(&fixture.path).cloned().ok_or_else(|| {
            EvalError::Spawn {
                program: "canned-output".to_string(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no canned output for {}", fixture.display_path()),
                ),
            }
        })?;

        Ok(Invocation {
            fixture: fixture.clone(),
            exit_code: 0,
            stdout,
            stderr: String::new(),
            duration_ms: 0,
        })
    }
}
