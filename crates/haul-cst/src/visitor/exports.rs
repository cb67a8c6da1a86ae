// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! `__all__` export extraction.
//!
//! Collects the statically evaluable string names a module re-exports:
//!
//! ```python
//! __all__ = ["Date", "Time"]         # list, tuple, or set
//! __all__: list[str] = ["Date"]      # annotated assignment
//! __all__ += ["Duration"]            # augmented assignment
//! __all__, x = ("Date",), 1          # tuple destructuring
//! ```
//!
//! Only simple and concatenated string literals count; computed
//! expressions are ignored. Names in `__all__` are treated as used for
//! the purpose of dead-import pruning.

use std::collections::HashSet;

use super::dispatch::walk_module;
use super::traits::{VisitResult, Visitor};
use crate::nodes::{
    AnnAssign, Assign, AugAssign, BinaryOpKind, Expression, Module,
};

/// Collects the module's export set from `__all__` assignments.
#[derive(Debug, Default)]
pub struct ExportCollector {
    exported: HashSet<String>,
}

impl ExportCollector {
    /// Gather the export set of a module.
    pub fn collect(module: &Module) -> HashSet<String> {
        let mut collector = ExportCollector::default();
        walk_module(&mut collector, module);
        collector.exported
    }

    fn is_all_target(target: &Expression) -> bool {
        matches!(target.unparenthesized(), Expression::Name(name) if name.value == "__all__")
    }

    fn collect_value(&mut self, value: &Expression) {
        let elements = match value.unparenthesized() {
            Expression::List(list) => &list.elements,
            Expression::Tuple(tuple) => &tuple.elements,
            Expression::Set(set) => &set.elements,
            _ => return,
        };
        for element in elements {
            match element.value.unparenthesized() {
                Expression::SimpleString(string) => {
                    if let Some(name) = string.evaluated_value() {
                        self.exported.insert(name);
                    }
                }
                Expression::ConcatenatedString(string) => {
                    if let Some(name) = string.evaluated_value() {
                        self.exported.insert(name);
                    }
                }
                _ => {}
            }
        }
    }

    fn handle_target(&mut self, target: &Expression, value: &Expression) {
        if Self::is_all_target(target) {
            self.collect_value(value);
            return;
        }
        // `__all__, x = ("a",), 1`
        if let (Expression::Tuple(targets), Expression::Tuple(values)) =
            (target.unparenthesized(), value.unparenthesized())
        {
            for (target_el, value_el) in targets.elements.iter().zip(values.elements.iter()) {
                if Self::is_all_target(&target_el.value) {
                    self.collect_value(&value_el.value);
                }
            }
        }
    }
}

impl Visitor for ExportCollector {
    fn visit_assign(&mut self, node: &Assign) -> VisitResult {
        for target in &node.targets {
            self.handle_target(&target.target, &node.value);
        }
        VisitResult::SkipChildren
    }

    fn visit_ann_assign(&mut self, node: &AnnAssign) -> VisitResult {
        if let Some(value) = &node.value {
            self.handle_target(&node.target, value);
        }
        VisitResult::SkipChildren
    }

    fn visit_aug_assign(&mut self, node: &AugAssign) -> VisitResult {
        if node.op.kind == BinaryOpKind::Add && Self::is_all_target(&node.target) {
            self.collect_value(&node.value);
        }
        VisitResult::SkipChildren
    }
}
