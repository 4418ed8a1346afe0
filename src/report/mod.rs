// src/report/mod.rs
//! Report formatting for repair searches and hotspot inventories.

pub mod diff;

use crate::hotspot::Template;
use crate::search::{SearchOutcome, SearchReport, Verdict};
use colored::Colorize;
use std::fmt::Write;

/// Formats a progress line for one judged variant.
#[must_use]
pub fn format_progress(index: usize, total: u128, verdict: Verdict) -> String {
    let status = match verdict {
        Verdict::Accepted => "ACCEPTED".green().bold(),
        Verdict::BugOracleFailed => "still failing".yellow(),
        Verdict::RegressionOracleFailed => "regression".red(),
        Verdict::LoadFailed => "load failed".red().bold(),
    };
    format!("[{index}/{total}] variant ... {status}")
}

/// Formats the final human-readable result, including the diff when a fix
/// was found.
#[must_use]
pub fn format_outcome(report: &SearchReport, original: &str) -> String {
    let mut out = String::new();
    match &report.outcome {
        SearchOutcome::NoFailures => {
            let _ = writeln!(out, "{}", "All tests pass. Nothing to fix.".green());
        }
        SearchOutcome::Accepted(fix) => {
            let _ = writeln!(out, "{}", "Generated fix for failing tests:".green().bold());
            let _ = writeln!(out);
            out.push_str(&diff::colorize(&diff::unified_diff(original, &fix.source)));
        }
        SearchOutcome::Exhausted => {
            let _ = writeln!(out, "{}", "No fixes found".yellow().bold());
        }
    }
    out
}

/// Formats the search statistics block.
#[must_use]
pub fn format_summary(report: &SearchReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "═".repeat(60));
    let _ = writeln!(out, "{}", "REPAIR SEARCH COMPLETE".bold());
    let _ = writeln!(out, "{}", "═".repeat(60));
    let _ = writeln!(out, "  Failing tests:    {}", report.failing.len());
    let _ = writeln!(out, "  Variants judged:  {}", stats.judged);
    let _ = writeln!(out, "  Bug oracle:       {} rejected", stats.bug_rejections);
    let _ = writeln!(out, "  Regression:       {} rejected", stats.regression_rejections);
    if stats.load_failures > 0 {
        let _ = writeln!(out, "  Load failures:    {}", stats.load_failures.to_string().red());
    }
    let _ = writeln!(out, "  Duration:         {}ms", stats.duration_ms);
    out
}

/// Formats the search report as JSON for machine consumption.
#[must_use]
pub fn format_json(report: &SearchReport, original: &str) -> String {
    let diff = report
        .fix()
        .map(|fix| diff::unified_diff(original, &fix.source));

    let output = serde_json::json!({
        "outcome": report.outcome,
        "failing": report.failing,
        "stats": report.stats,
        "diff": diff,
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

/// One row of the hotspot inventory.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HotspotRow {
    pub id: usize,
    pub kind: &'static str,
    pub depth: usize,
    pub line: usize,
    pub text: String,
    pub alternatives: usize,
}

/// Lists every hotspot, outermost first, with its location in `source`.
#[must_use]
pub fn hotspot_rows(template: &Template, source: &str) -> Vec<HotspotRow> {
    template
        .preorder_with_depth()
        .into_iter()
        .filter_map(|(id, depth)| {
            let hotspot = template.hotspot(id)?;
            let span = hotspot.node().span().unwrap_or(0..0);
            let line = source
                .get(..span.start)
                .map_or(1, |s| s.matches('\n').count() + 1);
            let text = source
                .get(span)
                .and_then(|s| s.lines().next())
                .unwrap_or_default()
                .to_string();
            Some(HotspotRow {
                id: id.index(),
                kind: hotspot.kind().label(),
                depth,
                line,
                text,
                alternatives: hotspot.kind().alternative_count(),
            })
        })
        .collect()
}

#[must_use]
pub fn format_hotspots(template: &Template, source: &str) -> String {
    let rows = hotspot_rows(template, source);
    let mut out = String::new();

    if rows.is_empty() {
        let _ = writeln!(out, "{}", "No hotspots found.".yellow());
        return out;
    }

    for row in &rows {
        let indent = "  ".repeat(row.depth);
        let _ = writeln!(
            out,
            "{indent}[{}] line {}  {}  ({} alternatives)",
            row.kind.cyan(),
            row.line,
            row.text.trim(),
            row.alternatives
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} hotspots, {} variants",
        rows.len(),
        template.space_size().to_string().bold()
    );
    out
}

#[must_use]
pub fn format_hotspots_json(template: &Template, source: &str) -> String {
    let output = serde_json::json!({
        "hotspots": hotspot_rows(template, source),
        "variants": template.space_size().to_string(),
    });
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}
