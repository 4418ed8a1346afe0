//! Command dispatch logic extracted from binary to reduce main function size.

use super::args::Commands;
use super::handlers::{handle_hotspots, handle_repair};
use crate::exit::AutofixExit;
use anyhow::Result;

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(command: &Commands) -> Result<AutofixExit> {
    match command {
        Commands::Repair(args) => handle_repair(args),
        Commands::Hotspots { file, json } => handle_hotspots(file, *json),
    }
}
