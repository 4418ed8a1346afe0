// src/config/mod.rs
pub mod types;

pub use self::types::{Config, ProgramConfig, SearchConfig, TestsConfig};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "autofix.toml";

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `path`, falling back to defaults when the file does not exist.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("{} not found, using defaults", path.display());
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse_toml(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// # Errors
    /// Returns error if `content` is not a valid config document.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Checks that everything a repair run needs is present.
    ///
    /// # Errors
    /// Returns error naming the first missing or invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.program.source.is_none() {
            anyhow::bail!("No program to repair: set [program] source or pass --source");
        }
        if self.tests.command.is_none() {
            anyhow::bail!("No test command: set [tests] command or pass --command");
        }
        if self.tests.names.is_empty() && self.tests.file.is_none() {
            anyhow::bail!("No tests: set [tests] names or file, or pass --test / --test-file");
        }
        regex::Regex::new(&self.tests.pattern)
            .with_context(|| format!("Invalid test pattern: {}", self.tests.pattern))?;
        Ok(())
    }
}
