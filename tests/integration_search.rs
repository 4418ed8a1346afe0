// tests/integration_search.rs
//! End-to-end search scenarios against an in-memory harness.
//!
//! VERIFICATION STRATEGY:
//! 1. Counting: the enumerator visits exactly the product of alternative counts.
//! 2. Order: variants come out in a fixed, reproducible order.
//! 3. Oracles: acceptance needs both the bug and the regression oracle.

use anyhow::{anyhow, Result};
use autofix_core::harness::{TestHarness, TestOutcome};
use autofix_core::hotspot::{self, catalog, Template};
use autofix_core::search::{self, build, enumerate, Assignment, SearchOptions, SearchOutcome};
use autofix_core::syntax::ruby;
use regex::Regex;
use std::cell::Cell;
use std::collections::HashSet;

// --- Helpers ---

type Check = Box<dyn Fn(&str) -> bool>;

fn check(f: impl Fn(&str) -> bool + 'static) -> Check {
    Box::new(f)
}

struct FakeHarness {
    names: Vec<String>,
    checks: Vec<Check>,
    loaded: String,
    history: Vec<String>,
}

impl FakeHarness {
    fn new(tests: Vec<(&str, Check)>) -> Self {
        let (names, checks) = tests
            .into_iter()
            .map(|(name, check)| (name.to_string(), check))
            .unzip();
        Self {
            names,
            checks,
            loaded: String::new(),
            history: Vec::new(),
        }
    }
}

impl TestHarness for FakeHarness {
    fn tests(&self) -> &[String] {
        &self.names
    }

    fn load(&mut self, source: &str) -> Result<()> {
        self.loaded = source.to_string();
        self.history.push(source.to_string());
        Ok(())
    }

    fn run(&mut self, test: &str) -> Result<TestOutcome> {
        let idx = self
            .names
            .iter()
            .position(|n| n == test)
            .ok_or_else(|| anyhow!("unknown test {test}"))?;
        let passed = self.checks.get(idx).is_some_and(|check| check(&self.loaded));
        Ok(if passed {
            TestOutcome::Pass
        } else {
            TestOutcome::Fail
        })
    }
}

fn template(src: &str) -> Result<Template> {
    Ok(hotspot::detect(&ruby::parse(src)?))
}

const AGES: [i64; 4] = [12, 65, 68, 80];

/// Evaluates `list.<filter> { |p| p.age <op> 65 }` over `AGES`.
fn retired(source: &str) -> Option<Vec<i64>> {
    let re = Regex::new(r"list\.(select|reject) \{ \|p\| p\.age (>=|>|<=|<) 65 \}").ok()?;
    let caps = re.captures(source)?;
    let keep = caps.get(1)?.as_str() == "select";
    let op = caps.get(2)?.as_str();
    Some(
        AGES.iter()
            .copied()
            .filter(|&age| {
                let hit = match op {
                    ">" => age > 65,
                    ">=" => age >= 65,
                    "<" => age < 65,
                    _ => age <= 65,
                };
                hit == keep
            })
            .collect(),
    )
}

const SCENARIO_B: &str = "list.select { |p| p.age <= 65 }\n";

// --- Enumeration properties ---

#[test]
fn independent_hotspots_yield_product() -> Result<()> {
    // comparison(4) × equality(2) × predicate(2) × quantifier(4)
    let t = template("a < b\nc != d\ne.empty?\nxs.all? { |x| x }\n")?;
    assert_eq!(t.roots().len(), 4);

    let all: Vec<Assignment> = enumerate(&t).collect();
    assert_eq!(all.len(), 64);
    assert!(all.iter().all(|a| a.is_total(&t)));

    let distinct: HashSet<&Assignment> = all.iter().collect();
    assert_eq!(distinct.len(), 64);
    Ok(())
}

#[test]
fn nesting_composes_multiplicatively() -> Result<()> {
    // filter(2) × [comparison(4), equality(2), predicate(2)]
    let t = template("xs.reject { |p| p.age > 3 && p.kind == :a && p.ok? }\n")?;
    assert_eq!(t.roots().len(), 1);
    let outer = t.hotspot(t.roots()[0]).ok_or_else(|| anyhow!("outer"))?;
    assert_eq!(outer.children().len(), 3);
    assert_eq!(enumerate(&t).count(), 2 * 4 * 2 * 2);
    assert_eq!(t.space_size(), 32);
    Ok(())
}

#[test]
fn detection_and_enumeration_are_deterministic() -> Result<()> {
    let src = "@list.select {|person| person.male? }.select {|person| person.dni.even? }\n";
    let first = template(src)?;
    let second = template(src)?;

    let a: Vec<String> = enumerate(&first)
        .map(|x| build(&first, &x).map(|n| n.to_source()))
        .collect::<Result<_, _>>()?;
    let b: Vec<String> = enumerate(&second)
        .map(|x| build(&second, &x).map(|n| n.to_source()))
        .collect::<Result<_, _>>()?;
    assert_eq!(a, b);
    assert_eq!(a.len(), 16);
    Ok(())
}

#[test]
fn identity_law_reproduces_original() -> Result<()> {
    let src = r"class PeopleIdiom
  def initialize(*list)
    @list = list
  end

  def retired
    @list.select {|person| person.age <= 65 }
  end

  def drafted
    @list.select {|person| person.male? }.select {|person| person.dni.even? }
  end

  def draftable?
    @list.any? {|person| !person.female? }
  end
end
";
    let tree = ruby::parse(src)?;
    let t = hotspot::detect(&tree);
    assert!(!t.roots().is_empty());

    let mut identity = Assignment::new(t.arena().len());
    for id in t.preorder() {
        let h = t.hotspot(id).ok_or_else(|| anyhow!("hotspot"))?;
        let idx = catalog::identity_index(h.kind(), h.node())
            .ok_or_else(|| anyhow!("no identity"))?;
        identity.set(id, idx);
    }

    let rebuilt = build(&t, &identity)?;
    assert_eq!(rebuilt, tree);
    assert_eq!(rebuilt.to_source(), src);
    Ok(())
}

// --- Scenarios ---

#[test]
fn scenario_a_comparison_variants_in_order() -> Result<()> {
    let t = template("x > 5")?;
    let texts: Vec<String> = enumerate(&t)
        .map(|a| build(&t, &a).map(|n| n.to_source()))
        .collect::<Result<_, _>>()?;
    assert_eq!(texts, vec!["x > 5", "x >= 5", "x < 5", "x <= 5"]);
    Ok(())
}

#[test]
fn scenario_b_filter_with_comparison() -> Result<()> {
    let t = template(SCENARIO_B)?;
    assert_eq!(t.space_size(), 8);

    let mut harness = FakeHarness::new(vec![
        (
            "test_retired",
            check(|s| retired(s) == Some(vec![65, 68, 80])),
        ),
        ("test_parses", check(|s| retired(s).is_some())),
    ]);
    let report = search::run(&t, SCENARIO_B, &mut harness, &SearchOptions::default(), |_, _| {})?;

    assert_eq!(report.failing, vec!["test_retired"]);
    let fix = report.fix().ok_or_else(|| anyhow!("expected a fix"))?;
    assert_eq!(fix.source, "list.select { |p| p.age >= 65 }\n");
    assert_eq!(fix.index, 2);
    Ok(())
}

#[test]
fn scenario_c_no_failures() -> Result<()> {
    let t = template(SCENARIO_B)?;
    let mut harness = FakeHarness::new(vec![("test_parses", check(|s| retired(s).is_some()))]);

    let pulled = Cell::new(false);
    let report = search::run_assignments(
        &t,
        SCENARIO_B,
        &mut harness,
        &SearchOptions::default(),
        || {
            pulled.set(true);
            enumerate(&t)
        },
        |_, _| {},
    )?;

    assert!(matches!(report.outcome, SearchOutcome::NoFailures));
    assert!(!pulled.get());
    assert_eq!(harness.history.len(), 1);
    Ok(())
}

#[test]
fn scenario_d_exhaustion_visits_each_variant_once() -> Result<()> {
    let t = template(SCENARIO_B)?;
    let mut harness = FakeHarness::new(vec![(
        "test_impossible",
        check(|s| retired(s) == Some(vec![12, 80])),
    )]);
    let report = search::run(&t, SCENARIO_B, &mut harness, &SearchOptions::default(), |_, _| {})?;

    assert!(matches!(report.outcome, SearchOutcome::Exhausted));
    assert_eq!(report.stats.judged, 8);
    assert_eq!(report.stats.bug_rejections, 8);

    // First load is the original program.
    let variants: Vec<&String> = harness.history.iter().skip(1).collect();
    assert_eq!(variants.len(), 8);
    let distinct: HashSet<&&String> = variants.iter().collect();
    assert_eq!(distinct.len(), 8);
    Ok(())
}

#[test]
fn search_stops_pulling_after_acceptance() -> Result<()> {
    let src = "a > b\nc > d\n";
    let t = template(src)?;
    let mut harness = FakeHarness::new(vec![(
        "test_target",
        check(|s| s.contains("a >= b") && s.contains("c < d")),
    )]);

    let pulled = Cell::new(0usize);
    let report = search::run_assignments(
        &t,
        src,
        &mut harness,
        &SearchOptions::default(),
        || enumerate(&t).inspect(|_| pulled.set(pulled.get() + 1)),
        |_, _| {},
    )?;

    let fix = report.fix().ok_or_else(|| anyhow!("expected a fix"))?;
    assert_eq!(fix.index, 4 + 2 + 1);
    assert_eq!(pulled.get(), fix.index);
    assert_eq!(harness.history.len(), fix.index + 1);
    Ok(())
}

#[test]
fn parse_error_stops_before_search() {
    let err = ruby::parse("def broken(\n  x >\n").expect_err("malformed");
    assert!(err.is_parse());
}
