use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "autofix", version, about = "Search small mutations of a Ruby program for one that fixes its failing tests")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for a variant that makes every test pass
    Repair(RepairArgs),
    /// List mutation hotspots in a file and the size of the search space
    Hotspots {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct RepairArgs {
    /// Config file
    #[arg(long, short, value_name = "FILE", default_value = crate::config::CONFIG_FILE)]
    pub config: PathBuf,
    /// Ruby file to repair (overrides [program] source)
    #[arg(long, value_name = "FILE")]
    pub source: Option<PathBuf>,
    /// Test command template, `{test}` is replaced by the test name
    #[arg(long, value_name = "CMD")]
    pub command: Option<String>,
    /// Minitest file to discover tests from
    #[arg(long, value_name = "FILE")]
    pub test_file: Option<PathBuf>,
    /// Test name (repeatable); replaces discovery
    #[arg(long = "test", value_name = "NAME")]
    pub tests: Vec<String>,
    /// Variants materialized ahead of judging
    #[arg(long)]
    pub lookahead: Option<usize>,
    #[arg(long)]
    pub json: bool,
}
