//! Automated program repair by mutation search.
//!
//! Detects mutable hotspots in a Ruby program, enumerates every joint choice
//! of catalog alternatives lazily, and returns the first variant that makes
//! the failing tests pass without breaking the rest of the suite.

pub mod cli;
pub mod config;
pub mod error;
pub mod exit;
pub mod harness;
pub mod hotspot;
pub mod report;
pub mod search;
pub mod syntax;
