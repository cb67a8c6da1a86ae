// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A lossless Python parser and Concrete Syntax Tree (CST) library.
//!
//! This crate parses Python source into a CST that preserves all
//! whitespace and comments, so that rendering an unmodified tree
//! reproduces the input byte-for-byte.
//!
//! # Quick start
//!
//! ```
//! use haul_cst::{parse_module, render};
//!
//! let source = "def hello():\n    print('world')\n";
//! let module = parse_module(source).expect("parse error");
//! assert_eq!(render(&module), source);
//! ```
//!
//! # Analyses
//!
//! - [`ScopeIndex`] builds the bidirectional assignment/access relation
//!   used for import and reference rewriting.
//! - [`ExportCollector`] gathers a module's `__all__` export set.
//!
//! # Supported language
//!
//! The grammar covers the statement and expression subset a refactoring
//! engine operates on; constructs outside it (`match`, type-parameter
//! syntax, structural pattern matching) are parse errors rather than
//! silent data loss. Formatted-string interiors are kept as raw text and
//! are opaque to analysis.

mod codegen;
mod nodes;
mod parser;
pub mod visitor;

pub use codegen::{render, Codegen, CodegenState, DEFAULT_INDENT, DEFAULT_NEWLINE};
pub use nodes::*;
pub use parser::{parse_module, ParserError};
pub use visitor::{
    transform_module, Access, AccessId, Assignment, AssignmentId, BindingKind, ExportCollector,
    ScopeId, ScopeIndex, ScopeKind, Transform, Transformer, VisitResult, Visitor,
};
