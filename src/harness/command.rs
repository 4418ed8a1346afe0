// src/harness/command.rs
//! Shell-command test harness.
//!
//! `load` overwrites the program file with the variant; `run` executes a
//! command template (e.g. `ruby -Ilib test/test_people.rb --name {test}`) and
//! treats exit status 0 as a pass. The original file is put back when the
//! harness is dropped.

use super::{TestHarness, TestOutcome};
use crate::error::RepairError;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

/// Placeholder replaced with the test id in every command argument.
pub const TEST_PLACEHOLDER: &str = "{test}";

/// Result of one test command execution.
#[derive(Debug, Clone, Serialize)]
pub struct CommandResult {
    /// The command that was executed (display form).
    command: String,
    /// Process exit code (-1 if unavailable, e.g., killed by signal).
    exit_code: i32,
    stdout: String,
    stderr: String,
    duration_ms: u64,
}

impl CommandResult {
    #[must_use]
    pub fn new(
        command: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
        duration_ms: u64,
    ) -> Self {
        Self {
            command,
            exit_code,
            stdout,
            stderr,
            duration_ms,
        }
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Whether the command succeeded (exit code 0).
    #[must_use]
    pub fn passed(&self) -> bool {
        self.exit_code == 0
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

pub struct CommandHarness {
    workdir: PathBuf,
    program: PathBuf,
    original: String,
    command: Vec<String>,
    tests: Vec<String>,
}

impl CommandHarness {
    /// Creates a harness for `program`, remembering its current contents.
    ///
    /// # Errors
    /// Returns `RepairError::Harness` if the program cannot be read or the
    /// command template is empty or does not parse as shell words.
    pub fn new(
        workdir: &Path,
        program: &Path,
        command: &str,
        tests: Vec<String>,
    ) -> Result<Self> {
        let program = workdir.join(program);
        let original = fs::read_to_string(&program).map_err(|e| {
            RepairError::Harness(format!("Failed to read {}: {e}", program.display()))
        })?;
        let command = shell_words::split(command).map_err(|e| {
            RepairError::Harness(format!("Failed to parse test command `{command}`: {e}"))
        })?;
        if command.is_empty() {
            return Err(RepairError::Harness("Empty test command".to_string()).into());
        }

        Ok(Self {
            workdir: workdir.to_path_buf(),
            program,
            original,
            command,
            tests,
        })
    }

    /// Contents of the program file when the harness was created.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    fn argv_for(&self, test: &str) -> Vec<String> {
        self.command
            .iter()
            .map(|arg| arg.replace(TEST_PLACEHOLDER, test))
            .collect()
    }

    fn restore(&self) -> Result<()> {
        fs::write(&self.program, &self.original)
            .with_context(|| format!("Failed to restore {}", self.program.display()))
    }
}

impl TestHarness for CommandHarness {
    fn tests(&self) -> &[String] {
        &self.tests
    }

    fn load(&mut self, source: &str) -> Result<()> {
        fs::write(&self.program, source)
            .with_context(|| format!("Failed to write {}", self.program.display()))
    }

    fn run(&mut self, test: &str) -> Result<TestOutcome> {
        let argv = self.argv_for(test);
        let result = run_argv(&self.workdir, &argv)?;
        log::trace!(
            "{} -> exit {} in {}ms",
            result.command(),
            result.exit_code(),
            result.duration_ms()
        );
        if result.passed() {
            return Ok(TestOutcome::Pass);
        }
        log::debug!(
            "{test} failed (exit {})\n--- stdout ---\n{}\n--- stderr ---\n{}",
            result.exit_code(),
            result.stdout().trim_end(),
            result.stderr().trim_end()
        );
        Ok(TestOutcome::Fail)
    }
}

impl Drop for CommandHarness {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::error!("{e:#}");
        }
    }
}

/// Runs an already-split command and captures stdout/stderr separately.
///
/// # Errors
/// Returns error if the program cannot be spawned.
pub fn run_argv(workdir: &Path, argv: &[String]) -> Result<CommandResult> {
    let start = Instant::now();
    let (program, args) = argv.split_first().context("Empty command")?;

    let output = Command::new(program)
        .args(args)
        .current_dir(workdir)
        .output()
        .with_context(|| format!("Failed to execute {program}"))?;

    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    Ok(CommandResult::new(
        shell_words::join(argv),
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        duration_ms,
    ))
}
