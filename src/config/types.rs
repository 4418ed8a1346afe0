use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProgramConfig {
    /// The Ruby file under repair, relative to the working directory.
    #[serde(default)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestsConfig {
    /// Command template run once per test; `{test}` is replaced by the test name.
    #[serde(default)]
    pub command: Option<String>,
    /// Explicit test names. Takes precedence over discovery.
    #[serde(default)]
    pub names: Vec<String>,
    /// Minitest file to discover test names from.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Regex selecting discovered method names.
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

impl Default for TestsConfig {
    fn default() -> Self {
        Self {
            command: None,
            names: Vec::new(),
            file: None,
            pattern: default_pattern(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_lookahead")]
    pub lookahead: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            lookahead: default_lookahead(),
        }
    }
}

fn default_pattern() -> String { crate::harness::minitest::DEFAULT_PATTERN.to_string() }
const fn default_lookahead() -> usize { 1 }

/// On-disk shape of `autofix.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub program: ProgramConfig,
    #[serde(default)]
    pub tests: TestsConfig,
    #[serde(default)]
    pub search: SearchConfig,
}
