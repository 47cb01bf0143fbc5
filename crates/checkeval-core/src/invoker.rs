//! Checker invocation and output capture.

use crate::error::{EvalError, Result};
use crate::fixture::FixtureSet;
use crate::obs;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

/// How to launch the checker for one fixture set.
///
/// The command line is `program leading_args... <fixture-path> trailing_args...`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvokerConfig {
    /// Executable to launch.
    pub program: String,

    /// Arguments placed before the fixture path.
    pub leading_args: Vec<String>,

    /// Arguments placed after the fixture path.
    pub trailing_args: Vec<String>,

    /// Timeout in seconds (0 = wait for the checker indefinitely).
    pub timeout_secs: u64,
}

impl Default for InvokerConfig {
    /// `just run <fixture> --do-not-report`, no timeout.
    fn default() -> Self {
        Self {
            program: "just".to_string(),
            leading_args: vec!["run".to_string()],
            trailing_args: vec!["--do-not-report".to_string()],
            timeout_secs: 0,
        }
    }
}

impl InvokerConfig {
    /// Create a custom invoker configuration.
    pub fn custom(program: String, leading_args: Vec<String>, trailing_args: Vec<String>) -> Self {
        Self {
            program,
            leading_args,
            trailing_args,
            timeout_secs: 0,
        }
    }

    /// Abort a checker run that exceeds `secs` seconds.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Full command line for a fixture set (first element is the executable).
    pub fn command_for(&self, fixture: &FixtureSet) -> Vec<String> {
        let mut command = Vec::with_capacity(self.leading_args.len() + self.trailing_args.len() + 2);
        command.push(self.program.clone());
        command.extend(self.leading_args.iter().cloned());
        command.push(fixture.display_path());
        command.extend(self.trailing_args.iter().cloned());
        command
    }
}

/// Captured output of one checker run against one fixture set.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Fixture set the checker was pointed at.
    pub fixture: FixtureSet,

    /// Exit code reported by the checker.
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

impl Invocation {
    /// Stdout split into ordered lines, trailing empty lines trimmed.
    pub fn lines(&self) -> Vec<String> {
        split_output(&self.stdout)
    }
}

/// Split captured text into lines, dropping trailing whitespace and `\r`.
pub fn split_output(text: &str) -> Vec<String> {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// Anything that can produce checker output for a fixture set.
#[async_trait]
pub trait OutputSource: Send + Sync {
    /// Run the checker against `fixture` and return its captured output.
    async fn invoke(&self, fixture: &FixtureSet) -> Result<Invocation>;
}

/// Runs the real checker as a child process.
#[derive(Debug, Clone, Default)]
pub struct ToolInvoker {
    config: InvokerConfig,
}

impl ToolInvoker {
    pub fn new(config: InvokerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }
}

#[async_trait]
impl OutputSource for ToolInvoker {
    /// Launch the checker and wait for it to exit.
    ///
    /// A non-zero exit code is logged but not treated as a failure; only a
    /// spawn failure, a timeout, or termination by signal is fatal.
    async fn invoke(&self, fixture: &FixtureSet) -> Result<Invocation> {
        let start = Instant::now();
        let command = self.config.command_for(fixture);

        if self.config.program.is_empty() {
            return Err(EvalError::EmptyCommand {
                fixture: fixture.display_path(),
            });
        }

        obs::emit_invocation_started(fixture, &command);

        let child = Command::new(&command[0])
            .args(&command[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EvalError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;

        let output = if self.config.timeout_secs > 0 {
            let timeout = Duration::from_secs(self.config.timeout_secs);
            tokio::time::timeout(timeout, child.wait_with_output())
                .await
                .map_err(|_| EvalError::Timeout {
                    fixture: fixture.display_path(),
                    timeout,
                })??
        } else {
            child.wait_with_output().await?
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let exit_code = output.status.code().ok_or_else(|| EvalError::AbnormalExit {
            fixture: fixture.display_path(),
        })?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if exit_code != 0 {
            warn!(
                fixture = %fixture.display_path(),
                exit_code,
                "checker exited with non-zero status"
            );
        }
        if !stderr.is_empty() {
            debug!(fixture = %fixture.display_path(), stderr = %stderr.trim_end(), "checker stderr");
        }
        obs::emit_invocation_finished(fixture, exit_code, duration_ms);

        Ok(Invocation {
            fixture: fixture.clone(),
            exit_code,
            stdout,
            stderr,
            duration_ms,
        })
    }
}
