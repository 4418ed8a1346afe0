// src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepairError {
    #[error("Parse error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Assignment has no alternative for hotspot #{hotspot}")]
    IncompleteAssignment { hotspot: usize },

    #[error("Alternative {choice} is out of range for hotspot #{hotspot} ({available} available)")]
    InvalidChoice {
        hotspot: usize,
        choice: usize,
        available: usize,
    },

    #[error("Test harness error: {0}")]
    Harness(String),
}

pub type Result<T> = std::result::Result<T, RepairError>;

impl RepairError {
    /// True for malformed-source errors, which abort before any search.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
