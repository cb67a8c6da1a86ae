//! haul: cross-module symbol motion for Python codebases.
//!
//! Given the position of a top-level symbol, haul relocates it to
//! another module and updates every import and qualified access in the
//! project that depends on it, leaving the project semantically
//! equivalent modulo the symbol's new location.

// The CST collaborator: parser, codegen, visitors, scope analysis.
pub use haul_cst as cst;

pub mod cli;
pub mod error;
pub mod module;
pub mod output;
pub mod project;
pub mod refactor;

pub use error::{MoveError, Result};
pub use module::Module;
pub use project::{ModuleName, Project};
pub use refactor::{move_symbol, MoveOutcome, SymbolKind};
