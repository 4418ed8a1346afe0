// src/harness/mod.rs
//! The execution-environment seam.
//!
//! A harness installs one program variant at a time and runs individual
//! tests against it. `load` takes `&mut self`, so at most one variant can be
//! live per harness, and each load fully supersedes the previous one.

pub mod command;
pub mod minitest;

use anyhow::Result;
use serde::Serialize;

pub use command::{CommandHarness, CommandResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestOutcome {
    Pass,
    Fail,
}

impl TestOutcome {
    #[must_use]
    pub fn passed(self) -> bool {
        self == Self::Pass
    }
}

pub trait TestHarness {
    /// Every test of the suite, in execution order.
    fn tests(&self) -> &[String];

    /// Installs `source` as the active program.
    ///
    /// # Errors
    /// Returns error if the variant cannot be installed.
    fn load(&mut self, source: &str) -> Result<()>;

    /// Runs one test against the active program.
    ///
    /// # Errors
    /// Returns error if the test run itself breaks (as opposed to failing).
    fn run(&mut self, test: &str) -> Result<TestOutcome>;
}
