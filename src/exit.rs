// src/exit.rs
//! Standardized process exit codes for `autofix`.
//!
//! Provides a stable contract for scripts and automation.

use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum AutofixExit {
    /// A fix was found, or there was nothing to fix.
    Success = 0,
    /// Generic error (e.g. IO, harness, test command).
    Error = 1,
    /// Input validation failed (Parse error, Invalid config).
    InvalidInput = 2,
    /// Every candidate variant was rejected.
    NoFix = 3,
}

impl AutofixExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl Termination for AutofixExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}
