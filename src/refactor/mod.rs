//! Refactoring passes.
//!
//! Each pass is a transient transformer over one module tree: it is
//! built from a fresh scope index, consumes the tree, and returns a new
//! one. Passes never share mutable state across modules; the orchestrator
//! owns the modules and sequences the passes.

pub mod extract;
pub mod imports;
pub mod move_symbol;
pub mod unused;

pub use extract::{extract_symbol, ExtractedSymbol, SymbolKind};
pub use imports::{is_import_of, AddImports, ReplaceImport};
pub use move_symbol::{move_symbol, MoveOutcome};
pub use unused::{find_unused_imports, RemoveUnusedImports};
