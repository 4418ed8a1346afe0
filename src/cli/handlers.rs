// src/cli/handlers.rs
//! Command handlers.

use super::args::RepairArgs;
use crate::config::Config;
use crate::exit::AutofixExit;
use crate::harness::{minitest, CommandHarness};
use crate::hotspot;
use crate::report;
use crate::search::{self, SearchOptions, SearchOutcome};
use crate::syntax::ruby;
use anyhow::{Context, Result};
use colored::Colorize;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

#[must_use]
pub fn get_repo_root() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Handles the repair command.
///
/// # Errors
/// Returns error if the harness cannot be set up or the search fails.
pub fn handle_repair(args: &RepairArgs) -> Result<AutofixExit> {
    let workdir = get_repo_root();
    let mut config = Config::load(&args.config)?;
    apply_overrides(&mut config, args);

    if let Err(e) = config.validate() {
        eprintln!("{} {e:#}", "error:".red().bold());
        return Ok(AutofixExit::InvalidInput);
    }
    let (Some(source_path), Some(command)) =
        (config.program.source.clone(), config.tests.command.clone())
    else {
        return Ok(AutofixExit::InvalidInput);
    };

    let tests = resolve_tests(&config, &workdir)?;
    let mut harness = CommandHarness::new(&workdir, &source_path, &command, tests)?;
    let original = harness.original().to_string();

    let tree = match ruby::parse(&original) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("{} {}: {e}", "error:".red().bold(), source_path.display());
            return Ok(AutofixExit::InvalidInput);
        }
    };
    let template = hotspot::detect(&tree);
    let total = template.space_size();

    if !args.json {
        print_header(&source_path, &template, total);
    }

    let options = SearchOptions {
        lookahead: config.search.lookahead,
    };
    let json = args.json;
    let report = search::run(&template, &original, &mut harness, &options, |idx, verdict| {
        if !json {
            println!("{}", report::format_progress(idx, total, verdict));
        }
    })?;
    drop(harness);

    if args.json {
        println!("{}", report::format_json(&report, &original));
    } else {
        print!("{}", report::format_outcome(&report, &original));
        if !matches!(report.outcome, SearchOutcome::NoFailures) {
            print!("{}", report::format_summary(&report));
        }
    }

    Ok(match report.outcome {
        SearchOutcome::NoFailures | SearchOutcome::Accepted(_) => AutofixExit::Success,
        SearchOutcome::Exhausted => AutofixExit::NoFix,
    })
}

/// Handles the hotspots command.
///
/// # Errors
/// Returns error if the file cannot be read.
pub fn handle_hotspots(file: &Path, json: bool) -> Result<AutofixExit> {
    let source =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let tree = match ruby::parse(&source) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("{} {}: {e}", "error:".red().bold(), file.display());
            return Ok(AutofixExit::InvalidInput);
        }
    };
    let template = hotspot::detect(&tree);

    if json {
        println!("{}", report::format_hotspots_json(&template, &source));
    } else {
        print!("{}", report::format_hotspots(&template, &source));
    }
    Ok(AutofixExit::Success)
}

/// CLI flags win over the config file.
pub fn apply_overrides(config: &mut Config, args: &RepairArgs) {
    if let Some(source) = &args.source {
        config.program.source = Some(source.clone());
    }
    if let Some(command) = &args.command {
        config.tests.command = Some(command.clone());
    }
    if let Some(file) = &args.test_file {
        config.tests.file = Some(file.clone());
    }
    if !args.tests.is_empty() {
        config.tests.names.clone_from(&args.tests);
    }
    if let Some(lookahead) = args.lookahead {
        config.search.lookahead = lookahead;
    }
}

/// Explicit names if given, otherwise Minitest discovery.
///
/// # Errors
/// Returns error if discovery fails or finds nothing.
pub fn resolve_tests(config: &Config, workdir: &Path) -> Result<Vec<String>> {
    if !config.tests.names.is_empty() {
        return Ok(config.tests.names.clone());
    }
    let file = config
        .tests
        .file
        .as_ref()
        .context("No test names and no test file configured")?;
    let pattern = Regex::new(&config.tests.pattern)?;
    let names = minitest::discover_tests(&workdir.join(file), &pattern)?;
    if names.is_empty() {
        anyhow::bail!("No tests matching '{}' in {}", config.tests.pattern, file.display());
    }
    log::info!("Discovered {} tests in {}", names.len(), file.display());
    Ok(names)
}

fn print_header(source: &Path, template: &hotspot::Template, total: u128) {
    println!();
    println!("{}", "AUTOMATED REPAIR".bold().cyan());
    println!("{}", "═".repeat(60));
    println!("  Program:   {}", source.display().to_string().cyan());
    println!(
        "  Hotspots:  {}",
        template.arena().len().to_string().cyan()
    );
    println!("  Variants:  {}", total.to_string().cyan());
    println!("{}", "═".repeat(60));
    println!();
}
