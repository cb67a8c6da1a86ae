//! Error types for haul.
//!
//! `MoveError` is the single error type for the engine and CLI. Each
//! variant carries enough context to produce the human-readable
//! `errorMsg` of the JSON failure object; the `trace` field is built by
//! walking the error's source chain.
//!
//! A motion either succeeds completely or fails before anything is
//! written; the one exception is a failure during the terminal persist
//! pass, which reports the files already written.

use haul_cst::ParserError;
use thiserror::Error;

/// Unified error type for move operations.
#[derive(Debug, Error)]
pub enum MoveError {
    /// No top-level statement covers the requested position.
    #[error("no symbol found at L{line} C{col}")]
    SymbolNotFound { line: u32, col: u32 },

    /// The statement at the position cannot be extracted.
    #[error("cannot extract statement at L{line} C{col}: {reason}")]
    UnsupportedStatement { line: u32, col: u32, reason: String },

    /// A string-typed annotation names a symbol the motion would rewrite.
    #[error("string annotation mentions '{name}', which this move would need to rewrite")]
    UnsupportedAnnotation { name: String },

    /// A qualified name was malformed (empty module path and similar).
    #[error("malformed qualified name: {0}")]
    ImportShape(String),

    /// A module failed to parse.
    #[error("cannot parse module '{module}'")]
    Parse {
        module: String,
        #[source]
        source: ParserError,
    },

    /// A referenced module has no file in the project.
    #[error("module '{0}' not found in project")]
    ModuleNotFound(String),

    /// The project root is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// Filesystem failure before the persist pass.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Filesystem failure during the persist pass; `written` lists the
    /// files already overwritten.
    #[error("persist failed after writing {}: {message}", written.join(", "))]
    Persist { written: Vec<String>, message: String },

    /// A bug: an engine invariant did not hold.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MoveError {
    /// Render the error and its source chain as a pseudo-traceback for
    /// the JSON `trace` field.
    pub fn trace(&self) -> String {
        let mut out = format!("{self}");
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            out.push_str("\ncaused by: ");
            out.push_str(&err.to_string());
            source = err.source();
        }
        out
    }
}

/// Result alias for move operations.
pub type Result<T> = std::result::Result<T, MoveError>;
