//! CLI front door.
//!
//! `run_move` glues argument parsing to the engine and shapes the JSON
//! response. The CLI never exits non-zero for a failed motion; the JSON
//! object carries the outcome.

use std::path::Path;

use crate::error::Result;
use crate::output::{MoveFailure, MoveSuccess};
use crate::project::{ModuleName, Project};
use crate::refactor::move_symbol;

/// Execute a move and return the names of the edited modules.
pub fn run_move(
    root: &Path,
    module_start: &str,
    line: u32,
    column: u32,
    module_end: &str,
) -> Result<Vec<String>> {
    let mut project = Project::open(root)?;
    let origin = ModuleName::parse(module_start)?;
    let dest = ModuleName::parse(module_end)?;
    let outcome = move_symbol(&mut project, &origin, line, column, &dest)?;
    Ok(outcome.edited.iter().map(ModuleName::dotted).collect())
}

/// Run a move and render the result as the CLI's JSON object.
pub fn run_move_json(
    root: &Path,
    module_start: &str,
    line: u32,
    column: u32,
    module_end: &str,
) -> String {
    match run_move(root, module_start, line, column, module_end) {
        Ok(edited) => serde_json::to_string(&MoveSuccess::new(edited))
            .unwrap_or_else(|err| format!("{{\"success\": false, \"errorMsg\": \"{err}\"}}")),
        Err(err) => serde_json::to_string(&MoveFailure::from(&err))
            .unwrap_or_else(|err| format!("{{\"success\": false, \"errorMsg\": \"{err}\"}}")),
    }
}
