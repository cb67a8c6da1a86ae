// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor and transformer infrastructure for CST traversal.
//!
//! The [`Visitor`] trait provides read-only traversal with macro-generated
//! `visit_*`/`leave_*` pairs; the [`Transformer`] trait provides bottom-up
//! rewriting where list-context methods return [`Transform`] to keep,
//! remove, or split nodes. Scope analysis ([`ScopeIndex`]) and export
//! extraction ([`ExportCollector`]) build on these.

mod dispatch;
mod exports;
mod scope;
mod traits;

pub use dispatch::{
    transform_expression, transform_module, walk_ann_assign, walk_assign, walk_aug_assign,
    walk_class_def, walk_expression, walk_for, walk_function_def, walk_if, walk_module,
    walk_simple_statement_line, walk_small_statement, walk_statement, walk_try, walk_while,
    walk_with,
};
pub use exports::ExportCollector;
pub use scope::{
    Access, AccessId, Assignment, AssignmentId, BindingKind, Scope, ScopeId, ScopeIndex,
    ScopeKind,
};
pub use traits::{Transform, Transformer, VisitResult, Visitor};
