// src/report/diff.rs
//! Unified diff of the original program against the accepted fix.

use colored::Colorize;
use similar::TextDiff;

pub const CONTEXT_LINES: usize = 3;

/// Plain unified diff with `original file` / `fixed file` headers.
#[must_use]
pub fn unified_diff(original: &str, fixed: &str) -> String {
    TextDiff::from_lines(original, fixed)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header("original file", "fixed file")
        .to_string()
}

/// Colors a unified diff line by line for the terminal.
#[must_use]
pub fn colorize(diff: &str) -> String {
    let mut out = String::with_capacity(diff.len());
    for line in diff.split_inclusive('\n') {
        let (body, newline) = match line.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (line, ""),
        };
        let painted = if body.starts_with("---") || body.starts_with("+++") {
            body.bold().to_string()
        } else if body.starts_with("@@") {
            body.cyan().to_string()
        } else if body.starts_with('+') {
            body.green().to_string()
        } else if body.starts_with('-') {
            body.red().to_string()
        } else {
            body.to_string()
        };
        out.push_str(&painted);
        out.push_str(newline);
    }
    out
}
