// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor and transformer trait definitions for CST traversal.

use crate::nodes::{
    AnnAssign, Assert, Assign, Attribute, AugAssign, Call, ClassDef, CompFor, ConcatenatedString,
    Del, Dict, DictComp, Expr, Expression, FormattedString, For, FunctionDef, GeneratorExp,
    Global, If, Import, ImportFrom, Lambda, List, ListComp, Module, Name, NamedExpr, Nonlocal,
    Param, Raise, Return, SetComp, SetExp, SimpleStatementLine, SimpleString, SmallStatement,
    Statement, Subscript, Try, Tuple, While, With,
};

/// Result of visiting a node; controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children. `leave_*` is called afterwards.
    #[default]
    Continue,
    /// Skip children; `leave_*` is still called.
    SkipChildren,
    /// Stop traversal entirely.
    Stop,
}

/// Result of transforming a node that lives in a list context.
///
/// This models LibCST's removal and flatten sentinels as plain data: the
/// driver interprets the variants instead of unwinding through exceptions.
#[derive(Debug, Clone)]
pub enum Transform<T> {
    /// Keep the transformed node.
    Keep(T),
    /// Remove the node from the list.
    Remove,
    /// Replace the node with a sequence of nodes.
    Flatten(Vec<T>),
}

impl<T> Transform<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep(_))
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, Self::Remove)
    }
}

impl<T> From<T> for Transform<T> {
    fn from(value: T) -> Self {
        Transform::Keep(value)
    }
}

/// Macro generating `visit_*`/`leave_*` method pairs with default
/// implementations.
macro_rules! visitor_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node before its children.")]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](&mut self, node: &$node_type) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] node after its children.")]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &$node_type) {}
            )*
        }
    };
}

/// Immutable, read-only CST traversal.
///
/// `visit_*` runs pre-order, `leave_*` post-order; children are visited in
/// source order. Drive an implementation with
/// [`walk_module`](crate::visitor::walk_module).
pub trait Visitor {
    visitor_methods! {
        module: Module,
        statement: Statement,
        simple_statement_line: SimpleStatementLine,
        small_statement: SmallStatement,
        function_def: FunctionDef,
        class_def: ClassDef,
        if_stmt: If,
        while_stmt: While,
        for_stmt: For,
        try_stmt: Try,
        with_stmt: With,
        import_stmt: Import,
        import_from: ImportFrom,
        assign: Assign,
        ann_assign: AnnAssign,
        aug_assign: AugAssign,
        expr_stmt: Expr,
        return_stmt: Return,
        raise_stmt: Raise,
        assert_stmt: Assert,
        global_stmt: Global,
        nonlocal_stmt: Nonlocal,
        del_stmt: Del,
        expression: Expression,
        name: Name,
        attribute: Attribute,
        call: Call,
        subscript: Subscript,
        tuple: Tuple,
        list: List,
        set: SetExp,
        dict: Dict,
        lambda: Lambda,
        named_expr: NamedExpr,
        list_comp: ListComp,
        set_comp: SetComp,
        dict_comp: DictComp,
        generator_exp: GeneratorExp,
        comp_for: CompFor,
        param: Param,
        simple_string: SimpleString,
        concatenated_string: ConcatenatedString,
        formatted_string: FormattedString,
    }
}

/// Mutable bottom-up CST transformation.
///
/// The driver ([`transform_module`](crate::visitor::transform_module))
/// rebuilds children first, then hands each node to the matching
/// `transform_*` method. Statement- and small-statement-level methods may
/// remove or split nodes via [`Transform`]; a simple statement line whose
/// body empties out is dropped by the driver.
pub trait Transformer {
    /// Transform a statement in its block's list context.
    #[allow(unused_variables)]
    fn transform_statement(&mut self, node: Statement) -> Transform<Statement> {
        Transform::Keep(node)
    }

    /// Transform a small statement within its line.
    #[allow(unused_variables)]
    fn transform_small_statement(&mut self, node: SmallStatement) -> Transform<SmallStatement> {
        Transform::Keep(node)
    }

    /// Transform an expression (called after its children were rebuilt).
    #[allow(unused_variables)]
    fn transform_expression(&mut self, node: Expression) -> Expression {
        node
    }

    /// Final pass over the whole module.
    #[allow(unused_variables)]
    fn leave_module(&mut self, node: Module) -> Module {
        node
    }
}
