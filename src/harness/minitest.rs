// src/harness/minitest.rs
//! Discovers Minitest test names from a Ruby test file.
//!
//! Collects every `def <name>` whose name matches the pattern (by default
//! `^test_`), in source order, without duplicates.

use crate::syntax::{ruby, SyntaxNode};
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

pub const DEFAULT_PATTERN: &str = "^test_";

/// Reads and scans a test file.
///
/// # Errors
/// Returns error if the file cannot be read or does not parse.
pub fn discover_tests(path: &Path, pattern: &Regex) -> Result<Vec<String>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let tree =
        ruby::parse(&source).with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(test_names(&tree, pattern))
}

/// Test method names defined anywhere in `tree`.
#[must_use]
pub fn test_names(tree: &SyntaxNode, pattern: &Regex) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    tree.walk(&mut |node: &SyntaxNode| {
        if node.kind() != "method" {
            return;
        }
        if let Some(name) = node.field_text("name") {
            if pattern.is_match(name) && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    });
    names
}
