// src/search/mod.rs
//! The two-oracle repair search.
//!
//! # Architecture
//!
//! - `enumerate`: Lazy odometer over joint alternative choices
//! - `builder`: Template + assignment → concrete variant tree
//!
//! The loop captures the failing tests once against the original program,
//! then judges variants in enumeration order: the bug oracle (every
//! originally-failing test now passes) first, the regression oracle (the whole
//! suite passes) second. The first variant accepted by both ends the search
//! and nothing further is pulled from the enumerator.

pub mod builder;
pub mod enumerate;

use crate::harness::{TestHarness, TestOutcome};
use crate::hotspot::Template;
use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

pub use builder::build;
pub use enumerate::{enumerate, Alternatives, Assignment};

/// Options for a repair search.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Variants materialized ahead of judging, in parallel.
    pub lookahead: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { lookahead: 1 }
    }
}

/// Why a single variant was accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    /// At least one originally-failing test still fails.
    BugOracleFailed,
    /// The failing tests pass now, but something else broke.
    RegressionOracleFailed,
    /// The harness could not install the variant.
    LoadFailed,
}

/// The accepted variant.
#[derive(Debug, Clone, Serialize)]
pub struct Fix {
    /// 1-based position in enumeration order.
    pub index: usize,
    pub assignment: Assignment,
    pub source: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// The original program already passes every test.
    NoFailures,
    Accepted(Fix),
    /// Every variant was rejected by at least one oracle.
    Exhausted,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchStats {
    pub judged: usize,
    pub bug_rejections: usize,
    pub regression_rejections: usize,
    pub load_failures: usize,
    pub duration_ms: u64,
}

impl SearchStats {
    fn record(&mut self, verdict: Verdict) {
        self.judged += 1;
        match verdict {
            Verdict::Accepted => {}
            Verdict::BugOracleFailed => self.bug_rejections += 1,
            Verdict::RegressionOracleFailed => self.regression_rejections += 1,
            Verdict::LoadFailed => self.load_failures += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    /// Tests failing against the original program.
    pub failing: Vec<String>,
    pub stats: SearchStats,
}

impl SearchReport {
    #[must_use]
    pub fn fix(&self) -> Option<&Fix> {
        match &self.outcome {
            SearchOutcome::Accepted(fix) => Some(fix),
            _ => None,
        }
    }
}

/// Runs the search over every variant of `template`.
///
/// `original` is the unmodified program text; it is loaded once to capture
/// the failing tests. `on_verdict` is called after each variant is judged
/// with its 1-based index.
///
/// # Errors
/// Returns error if the original program cannot be loaded or a variant
/// cannot be built.
pub fn run<H, F>(
    template: &Template,
    original: &str,
    harness: &mut H,
    options: &SearchOptions,
    on_verdict: F,
) -> Result<SearchReport>
where
    H: TestHarness,
    F: FnMut(usize, Verdict),
{
    run_assignments(
        template,
        original,
        harness,
        options,
        || enumerate(template),
        on_verdict,
    )
}

/// Same as [`run`] but judges the assignments produced by `assignments`.
///
/// The source is only invoked once failing tests exist.
///
/// # Errors
/// Same as [`run`].
pub fn run_assignments<H, I, S, F>(
    template: &Template,
    original: &str,
    harness: &mut H,
    options: &SearchOptions,
    assignments: S,
    mut on_verdict: F,
) -> Result<SearchReport>
where
    H: TestHarness,
    I: Iterator<Item = Assignment>,
    S: FnOnce() -> I,
    F: FnMut(usize, Verdict),
{
    let start = Instant::now();
    let failing = failing_tests(harness, original)?;
    let mut stats = SearchStats::default();

    if failing.is_empty() {
        log::info!("All tests pass on the original program; nothing to repair");
        return Ok(finish(SearchOutcome::NoFailures, failing, stats, start));
    }
    log::info!(
        "{} failing test(s): {}",
        failing.len(),
        failing.join(", ")
    );

    let window = options.lookahead.max(1);
    let mut pending = assignments();
    let mut index = 0;

    loop {
        let batch: Vec<Assignment> = pending.by_ref().take(window).collect();
        if batch.is_empty() {
            break;
        }

        let sources = batch
            .par_iter()
            .map(|a| build(template, a).map(|tree| tree.to_source()))
            .collect::<crate::error::Result<Vec<String>>>()?;

        for (assignment, source) in batch.into_iter().zip(sources) {
            index += 1;
            let verdict = judge(harness, &failing, &source);
            log::debug!("variant {index}: {verdict:?}");
            stats.record(verdict);
            on_verdict(index, verdict);

            if verdict == Verdict::Accepted {
                let fix = Fix {
                    index,
                    assignment,
                    source,
                };
                return Ok(finish(SearchOutcome::Accepted(fix), failing, stats, start));
            }
        }
    }

    log::info!("No variant satisfied both oracles ({index} tried)");
    Ok(finish(SearchOutcome::Exhausted, failing, stats, start))
}

fn finish(
    outcome: SearchOutcome,
    failing: Vec<String>,
    mut stats: SearchStats,
    start: Instant,
) -> SearchReport {
    stats.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    SearchReport {
        outcome,
        failing,
        stats,
    }
}

/// Loads the original program and returns the tests it fails.
///
/// # Errors
/// Returns error if the original program cannot be loaded.
pub fn failing_tests<H: TestHarness>(harness: &mut H, original: &str) -> Result<Vec<String>> {
    harness.load(original)?;
    let tests = harness.tests().to_vec();
    Ok(tests
        .into_iter()
        .filter(|test| !passes(harness, test))
        .collect())
}

fn judge<H: TestHarness>(harness: &mut H, failing: &[String], source: &str) -> Verdict {
    if let Err(e) = harness.load(source) {
        log::warn!("Could not load variant: {e:#}");
        return Verdict::LoadFailed;
    }
    if !bug_oracle(harness, failing) {
        return Verdict::BugOracleFailed;
    }
    if !regression_oracle(harness) {
        return Verdict::RegressionOracleFailed;
    }
    Verdict::Accepted
}

/// Every originally-failing test passes under the loaded variant.
pub fn bug_oracle<H: TestHarness>(harness: &mut H, failing: &[String]) -> bool {
    failing.iter().all(|test| passes(harness, test))
}

/// The whole suite passes under the loaded variant.
pub fn regression_oracle<H: TestHarness>(harness: &mut H) -> bool {
    let tests = harness.tests().to_vec();
    tests.iter().all(|test| passes(harness, test))
}

/// A broken test run counts as a failure, never as a skip.
fn passes<H: TestHarness>(harness: &mut H, test: &str) -> bool {
    match harness.run(test) {
        Ok(outcome) => outcome == TestOutcome::Pass,
        Err(e) => {
            log::warn!("Test {test} errored: {e:#}");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::hotspot::detect;
    use crate::syntax::ruby;
    use std::collections::HashMap;

    /// Tests are predicates over the loaded text.
    struct FakeHarness {
        names: Vec<String>,
        checks: HashMap<String, fn(&str) -> bool>,
        loaded: String,
        loads: usize,
    }

    impl FakeHarness {
        fn new(checks: &[(&str, fn(&str) -> bool)]) -> Self {
            Self {
                names: checks.iter().map(|(n, _)| (*n).to_string()).collect(),
                checks: checks.iter().map(|(n, f)| ((*n).to_string(), *f)).collect(),
                loaded: String::new(),
                loads: 0,
            }
        }
    }

    impl TestHarness for FakeHarness {
        fn tests(&self) -> &[String] {
            &self.names
        }

        fn load(&mut self, source: &str) -> Result<()> {
            self.loads += 1;
            self.loaded = source.to_string();
            Ok(())
        }

        fn run(&mut self, test: &str) -> Result<TestOutcome> {
            let check = self
                .checks
                .get(test)
                .ok_or_else(|| anyhow::anyhow!("unknown test {test}"))?;
            Ok(if check(&self.loaded) {
                TestOutcome::Pass
            } else {
                TestOutcome::Fail
            })
        }
    }

    fn template(src: &str) -> Template {
        detect(&ruby::parse(src).expect("parse"))
    }

    #[test]
    fn accepts_first_variant_passing_both_oracles() {
        let src = "x < 5";
        let mut harness = FakeHarness::new(&[
            ("test_ge", |s| s.contains(">=")),
            ("test_sane", |s| s.starts_with('x')),
        ]);
        let report = run(&template(src), src, &mut harness, &SearchOptions::default(), |_, _| {})
            .expect("search");
        let fix = report.fix().expect("fix");
        assert_eq!(fix.source, "x >= 5");
        assert_eq!(fix.index, 2);
        assert_eq!(report.failing, vec!["test_ge"]);
        assert_eq!(report.stats.bug_rejections, 1);
        // original + two variants
        assert_eq!(harness.loads, 3);
    }

    #[test]
    fn unsatisfiable_bug_oracle_exhausts() {
        let src = "a == b";
        let mut harness = FakeHarness::new(&[
            ("test_ne", |s| s.contains("!=")),
            ("test_never", |_| false),
        ]);
        let mut verdicts = Vec::new();
        let report = run(&template(src), src, &mut harness, &SearchOptions::default(), |i, v| {
            verdicts.push((i, v));
        })
        .expect("search");
        assert!(matches!(report.outcome, SearchOutcome::Exhausted));
        assert_eq!(
            verdicts,
            vec![
                (1, Verdict::BugOracleFailed),
                (2, Verdict::BugOracleFailed)
            ]
        );
    }

    #[test]
    fn regression_verdict_is_reported() {
        let src = "a == b";
        let mut harness = FakeHarness::new(&[
            ("test_ne", |s| s.contains("!=")),
            ("test_eq_kept", |s| s.contains("==")),
        ]);
        let report = run(&template(src), src, &mut harness, &SearchOptions::default(), |_, _| {})
            .expect("search");
        assert!(matches!(report.outcome, SearchOutcome::Exhausted));
        assert_eq!(report.stats.regression_rejections, 1);
    }

    #[test]
    fn no_failures_skips_enumeration() {
        let src = "x > 5";
        let mut harness = FakeHarness::new(&[("test_ok", |_| true)]);
        let mut pulled = false;
        let t = template(src);
        let report = run_assignments(
            &t,
            src,
            &mut harness,
            &SearchOptions::default(),
            || {
                pulled = true;
                enumerate(&t)
            },
            |_, _| {},
        )
        .expect("search");
        assert!(matches!(report.outcome, SearchOutcome::NoFailures));
        assert!(!pulled);
        assert_eq!(harness.loads, 1);
    }

    #[test]
    fn lookahead_keeps_enumeration_order() {
        let src = "a > b\nc > d\n";
        let check: fn(&str) -> bool = |s| s.contains("a < b") && s.contains("c <= d");
        for lookahead in [1, 3, 64] {
            let mut harness = FakeHarness::new(&[("test_fix", check)]);
            let options = SearchOptions { lookahead };
            let report = run(&template(src), src, &mut harness, &options, |_, _| {})
                .expect("search");
            let fix = report.fix().expect("fix");
            // digits (2, 3) in a 4×4 odometer
            assert_eq!(fix.index, 2 * 4 + 3 + 1);
            assert_eq!(report.stats.judged, fix.index);
        }
    }

    #[test]
    fn unloadable_variant_is_skipped() {
        struct Picky {
            names: Vec<String>,
            loaded: String,
        }
        impl TestHarness for Picky {
            fn tests(&self) -> &[String] {
                &self.names
            }
            fn load(&mut self, source: &str) -> Result<()> {
                if source == "x < 5" {
                    anyhow::bail!("refused to load {source}");
                }
                self.loaded = source.to_string();
                Ok(())
            }
            fn run(&mut self, _: &str) -> Result<TestOutcome> {
                Ok(if self.loaded.contains("x <") {
                    TestOutcome::Pass
                } else {
                    TestOutcome::Fail
                })
            }
        }

        let src = "x > 5";
        let mut harness = Picky {
            names: vec!["test_below".into()],
            loaded: String::new(),
        };
        let mut verdicts = Vec::new();
        let report = run(&template(src), src, &mut harness, &SearchOptions::default(), |i, v| {
            verdicts.push((i, v));
        })
        .expect("search");

        assert_eq!(
            verdicts,
            vec![
                (1, Verdict::BugOracleFailed),
                (2, Verdict::BugOracleFailed),
                (3, Verdict::LoadFailed),
                (4, Verdict::Accepted),
            ]
        );
        let fix = report.fix().expect("fix");
        assert_eq!(fix.source, "x <= 5");
        assert_eq!(report.stats.load_failures, 1);
        assert_eq!(report.stats.bug_rejections, 2);
        assert_eq!(report.stats.judged, 4);
    }

    #[test]
    fn harness_errors_count_as_failures() {
        struct Broken {
            names: Vec<String>,
        }
        impl TestHarness for Broken {
            fn tests(&self) -> &[String] {
                &self.names
            }
            fn load(&mut self, _: &str) -> Result<()> {
                Ok(())
            }
            fn run(&mut self, _: &str) -> Result<TestOutcome> {
                anyhow::bail!("interpreter crashed")
            }
        }
        let src = "x > 5";
        let mut harness = Broken {
            names: vec!["test_a".into()],
        };
        let report = run(&template(src), src, &mut harness, &SearchOptions::default(), |_, _| {})
            .expect("search");
        assert_eq!(report.failing, vec!["test_a"]);
        assert!(matches!(report.outcome, SearchOutcome::Exhausted));
        assert_eq!(report.stats.bug_rejections, 4);
    }
}
