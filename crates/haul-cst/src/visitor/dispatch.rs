// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk and transform drivers.
//!
//! The walk functions drive a [`Visitor`] depth-first in source order.
//! Import alias paths and attribute names are deliberately not walked as
//! [`Name`] nodes: they are not independent name references.
//!
//! [`transform_module`] drives a [`Transformer`] bottom-up, interpreting
//! [`Transform`] results in list contexts. A simple statement line whose
//! body empties out disappears; an indented block that empties out receives
//! a synthesized `pass`.

use super::traits::{Transform, Transformer, VisitResult, Visitor};
use crate::nodes::*;

macro_rules! check {
    ($expr:expr) => {
        if $expr == VisitResult::Stop {
            return VisitResult::Stop;
        }
    };
}

// ============================================================================
// Visitor drivers
// ============================================================================

/// Walk a whole module.
pub fn walk_module(visitor: &mut impl Visitor, module: &Module) -> VisitResult {
    match visitor.visit_module(module) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for statement in &module.body {
                check!(walk_statement(visitor, statement));
            }
        }
    }
    visitor.leave_module(module);
    VisitResult::Continue
}

pub fn walk_statement(visitor: &mut impl Visitor, statement: &Statement) -> VisitResult {
    match visitor.visit_statement(statement) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => match statement {
            Statement::Simple(line) => check!(walk_simple_statement_line(visitor, line)),
            Statement::Compound(compound) => match compound {
                CompoundStatement::FunctionDef(node) => check!(walk_function_def(visitor, node)),
                CompoundStatement::ClassDef(node) => check!(walk_class_def(visitor, node)),
                CompoundStatement::If(node) => check!(walk_if(visitor, node)),
                CompoundStatement::While(node) => check!(walk_while(visitor, node)),
                CompoundStatement::For(node) => check!(walk_for(visitor, node)),
                CompoundStatement::Try(node) => check!(walk_try(visitor, node)),
                CompoundStatement::With(node) => check!(walk_with(visitor, node)),
            },
        },
    }
    visitor.leave_statement(statement);
    VisitResult::Continue
}

pub fn walk_simple_statement_line(
    visitor: &mut impl Visitor,
    line: &SimpleStatementLine,
) -> VisitResult {
    match visitor.visit_simple_statement_line(line) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for small in &line.body {
                check!(walk_small_statement(visitor, small));
            }
        }
    }
    visitor.leave_simple_statement_line(line);
    VisitResult::Continue
}

fn walk_suite(visitor: &mut impl Visitor, suite: &Suite) -> VisitResult {
    match suite {
        Suite::IndentedBlock(block) => {
            for statement in &block.body {
                check!(walk_statement(visitor, statement));
            }
        }
        Suite::Simple(simple) => {
            for small in &simple.body {
                check!(walk_small_statement(visitor, small));
            }
        }
    }
    VisitResult::Continue
}

pub fn walk_small_statement(visitor: &mut impl Visitor, small: &SmallStatement) -> VisitResult {
    match visitor.visit_small_statement(small) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => match small {
            SmallStatement::Pass | SmallStatement::Break | SmallStatement::Continue => {}
            SmallStatement::Expr(node) => {
                check!(visitor.visit_expr_stmt(node));
                check!(walk_expression(visitor, &node.value));
                visitor.leave_expr_stmt(node);
            }
            SmallStatement::Return(node) => {
                check!(visitor.visit_return_stmt(node));
                if let Some(value) = &node.value {
                    check!(walk_expression(visitor, value));
                }
                visitor.leave_return_stmt(node);
            }
            SmallStatement::Assign(node) => check!(walk_assign(visitor, node)),
            SmallStatement::AnnAssign(node) => check!(walk_ann_assign(visitor, node)),
            SmallStatement::AugAssign(node) => check!(walk_aug_assign(visitor, node)),
            SmallStatement::Import(node) => {
                check!(visitor.visit_import_stmt(node));
                visitor.leave_import_stmt(node);
            }
            SmallStatement::ImportFrom(node) => {
                check!(visitor.visit_import_from(node));
                visitor.leave_import_from(node);
            }
            SmallStatement::Raise(node) => {
                check!(visitor.visit_raise_stmt(node));
                if let Some(value) = &node.value {
                    check!(walk_expression(visitor, value));
                }
                if let Some(cause) = &node.cause {
                    check!(walk_expression(visitor, &cause.expression));
                }
                visitor.leave_raise_stmt(node);
            }
            SmallStatement::Assert(node) => {
                check!(visitor.visit_assert_stmt(node));
                check!(walk_expression(visitor, &node.test));
                if let Some((_, msg)) = &node.msg {
                    check!(walk_expression(visitor, msg));
                }
                visitor.leave_assert_stmt(node);
            }
            SmallStatement::Global(node) => {
                check!(visitor.visit_global_stmt(node));
                visitor.leave_global_stmt(node);
            }
            SmallStatement::Nonlocal(node) => {
                check!(visitor.visit_nonlocal_stmt(node));
                visitor.leave_nonlocal_stmt(node);
            }
            SmallStatement::Del(node) => {
                check!(visitor.visit_del_stmt(node));
                check!(walk_expression(visitor, &node.target));
                visitor.leave_del_stmt(node);
            }
        },
    }
    visitor.leave_small_statement(small);
    VisitResult::Continue
}

pub fn walk_assign(visitor: &mut impl Visitor, node: &Assign) -> VisitResult {
    match visitor.visit_assign(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for target in &node.targets {
                check!(walk_expression(visitor, &target.target));
            }
            check!(walk_expression(visitor, &node.value));
        }
    }
    visitor.leave_assign(node);
    VisitResult::Continue
}

pub fn walk_ann_assign(visitor: &mut impl Visitor, node: &AnnAssign) -> VisitResult {
    match visitor.visit_ann_assign(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            check!(walk_expression(visitor, &node.target));
            check!(walk_expression(visitor, &node.annotation.annotation));
            if let Some(value) = &node.value {
                check!(walk_expression(visitor, value));
            }
        }
    }
    visitor.leave_ann_assign(node);
    VisitResult::Continue
}

pub fn walk_aug_assign(visitor: &mut impl Visitor, node: &AugAssign) -> VisitResult {
    match visitor.visit_aug_assign(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            check!(walk_expression(visitor, &node.target));
            check!(walk_expression(visitor, &node.value));
        }
    }
    visitor.leave_aug_assign(node);
    VisitResult::Continue
}

fn walk_decorators(visitor: &mut impl Visitor, decorators: &[Decorator]) -> VisitResult {
    for decorator in decorators {
        check!(walk_expression(visitor, &decorator.decorator));
    }
    VisitResult::Continue
}

fn walk_parameters(visitor: &mut impl Visitor, params: &Parameters) -> VisitResult {
    for item in &params.items {
        if let ParamItem::Param(param) = item {
            check!(visitor.visit_param(param));
            if let Some(annotation) = &param.annotation {
                check!(walk_expression(visitor, &annotation.annotation));
            }
            if let Some(default) = &param.default {
                check!(walk_expression(visitor, default));
            }
            visitor.leave_param(param);
        }
    }
    VisitResult::Continue
}

pub fn walk_function_def(visitor: &mut impl Visitor, node: &FunctionDef) -> VisitResult {
    match visitor.visit_function_def(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            check!(walk_decorators(visitor, &node.decorators));
            check!(walk_parameters(visitor, &node.params));
            if let Some(returns) = &node.returns {
                check!(walk_expression(visitor, &returns.annotation));
            }
            check!(walk_suite(visitor, &node.body));
        }
    }
    visitor.leave_function_def(node);
    VisitResult::Continue
}

pub fn walk_class_def(visitor: &mut impl Visitor, node: &ClassDef) -> VisitResult {
    match visitor.visit_class_def(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            check!(walk_decorators(visitor, &node.decorators));
            if let Some(args) = &node.args {
                for arg in &args.args {
                    check!(walk_expression(visitor, &arg.value));
                }
            }
            check!(walk_suite(visitor, &node.body));
        }
    }
    visitor.leave_class_def(node);
    VisitResult::Continue
}

pub fn walk_if(visitor: &mut impl Visitor, node: &If) -> VisitResult {
    match visitor.visit_if_stmt(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            check!(walk_expression(visitor, &node.test));
            check!(walk_suite(visitor, &node.body));
            if let Some(orelse) = &node.orelse {
                match &**orelse {
                    OrElse::Elif(elif) => check!(walk_if(visitor, elif)),
                    OrElse::Else(els) => check!(walk_suite(visitor, &els.body)),
                }
            }
        }
    }
    visitor.leave_if_stmt(node);
    VisitResult::Continue
}

pub fn walk_while(visitor: &mut impl Visitor, node: &While) -> VisitResult {
    match visitor.visit_while_stmt(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            check!(walk_expression(visitor, &node.test));
            check!(walk_suite(visitor, &node.body));
            if let Some(orelse) = &node.orelse {
                check!(walk_suite(visitor, &orelse.body));
            }
        }
    }
    visitor.leave_while_stmt(node);
    VisitResult::Continue
}

pub fn walk_for(visitor: &mut impl Visitor, node: &For) -> VisitResult {
    match visitor.visit_for_stmt(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            check!(walk_expression(visitor, &node.target));
            check!(walk_expression(visitor, &node.iter));
            check!(walk_suite(visitor, &node.body));
            if let Some(orelse) = &node.orelse {
                check!(walk_suite(visitor, &orelse.body));
            }
        }
    }
    visitor.leave_for_stmt(node);
    VisitResult::Continue
}

pub fn walk_try(visitor: &mut impl Visitor, node: &Try) -> VisitResult {
    match visitor.visit_try_stmt(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            check!(walk_suite(visitor, &node.body));
            for handler in &node.handlers {
                if let Some(kind) = &handler.kind {
                    check!(walk_expression(visitor, kind));
                }
                check!(walk_suite(visitor, &handler.body));
            }
            if let Some(orelse) = &node.orelse {
                check!(walk_suite(visitor, &orelse.body));
            }
            if let Some(finalbody) = &node.finalbody {
                check!(walk_suite(visitor, &finalbody.body));
            }
        }
    }
    visitor.leave_try_stmt(node);
    VisitResult::Continue
}

pub fn walk_with(visitor: &mut impl Visitor, node: &With) -> VisitResult {
    match visitor.visit_with_stmt(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for item in &node.items {
                check!(walk_expression(visitor, &item.item));
            }
            check!(walk_suite(visitor, &node.body));
        }
    }
    visitor.leave_with_stmt(node);
    VisitResult::Continue
}

fn walk_comp_for(visitor: &mut impl Visitor, node: &CompFor) -> VisitResult {
    check!(visitor.visit_comp_for(node));
    check!(walk_expression(visitor, &node.target));
    check!(walk_expression(visitor, &node.iter));
    for if_clause in &node.ifs {
        check!(walk_expression(visitor, &if_clause.test));
    }
    if let Some(inner) = &node.inner_for_in {
        check!(walk_comp_for(visitor, inner));
    }
    visitor.leave_comp_for(node);
    VisitResult::Continue
}

fn walk_elements(visitor: &mut impl Visitor, elements: &[Element]) -> VisitResult {
    for element in elements {
        check!(walk_expression(visitor, &element.value));
    }
    VisitResult::Continue
}

pub fn walk_expression(visitor: &mut impl Visitor, expression: &Expression) -> VisitResult {
    match visitor.visit_expression(expression) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {
            visitor.leave_expression(expression);
            return VisitResult::Continue;
        }
        VisitResult::Continue => {}
    }
    match expression {
        Expression::Name(node) => {
            check!(visitor.visit_name(node));
            visitor.leave_name(node);
        }
        Expression::Attribute(node) => {
            check!(visitor.visit_attribute(node));
            check!(walk_expression(visitor, &node.value));
            visitor.leave_attribute(node);
        }
        Expression::Call(node) => {
            check!(visitor.visit_call(node));
            check!(walk_expression(visitor, &node.func));
            for arg in &node.args {
                check!(walk_expression(visitor, &arg.value));
            }
            visitor.leave_call(node);
        }
        Expression::Subscript(node) => {
            check!(visitor.visit_subscript(node));
            check!(walk_expression(visitor, &node.value));
            for element in &node.slice {
                match &element.slice {
                    BaseSlice::Index(index) => check!(walk_expression(visitor, &index.value)),
                    BaseSlice::Slice(slice) => {
                        if let Some(lower) = &slice.lower {
                            check!(walk_expression(visitor, lower));
                        }
                        if let Some(upper) = &slice.upper {
                            check!(walk_expression(visitor, upper));
                        }
                        if let Some(step) = &slice.step {
                            check!(walk_expression(visitor, step));
                        }
                    }
                }
            }
            visitor.leave_subscript(node);
        }
        Expression::Parenthesized(node) => {
            check!(walk_expression(visitor, &node.expression));
        }
        Expression::BinaryOperation(node) => {
            check!(walk_expression(visitor, &node.left));
            check!(walk_expression(visitor, &node.right));
        }
        Expression::BooleanOperation(node) => {
            check!(walk_expression(visitor, &node.left));
            check!(walk_expression(visitor, &node.right));
        }
        Expression::UnaryOperation(node) => {
            check!(walk_expression(visitor, &node.expression));
        }
        Expression::Comparison(node) => {
            check!(walk_expression(visitor, &node.left));
            for target in &node.comparisons {
                check!(walk_expression(visitor, &target.comparator));
            }
        }
        Expression::IfExp(node) => {
            check!(walk_expression(visitor, &node.body));
            check!(walk_expression(visitor, &node.test));
            check!(walk_expression(visitor, &node.orelse));
        }
        Expression::Lambda(node) => {
            check!(visitor.visit_lambda(node));
            for item in &node.params.items {
                if let ParamItem::Param(param) = item {
                    if let Some(default) = &param.default {
                        check!(walk_expression(visitor, default));
                    }
                }
            }
            check!(walk_expression(visitor, &node.body));
            visitor.leave_lambda(node);
        }
        Expression::NamedExpr(node) => {
            check!(visitor.visit_named_expr(node));
            check!(walk_expression(visitor, &node.value));
            visitor.leave_named_expr(node);
        }
        Expression::Await(node) => {
            check!(walk_expression(visitor, &node.expression));
        }
        Expression::Yield(node) => {
            if let Some(value) = &node.value {
                match &**value {
                    YieldValue::Value(expression) => check!(walk_expression(visitor, expression)),
                    YieldValue::From { expression, .. } => {
                        check!(walk_expression(visitor, expression))
                    }
                }
            }
        }
        Expression::Starred(node) => {
            check!(walk_expression(visitor, &node.expression));
        }
        Expression::Tuple(node) => {
            check!(visitor.visit_tuple(node));
            check!(walk_elements(visitor, &node.elements));
            visitor.leave_tuple(node);
        }
        Expression::List(node) => {
            check!(visitor.visit_list(node));
            check!(walk_elements(visitor, &node.elements));
            visitor.leave_list(node);
        }
        Expression::Set(node) => {
            check!(visitor.visit_set(node));
            check!(walk_elements(visitor, &node.elements));
            visitor.leave_set(node);
        }
        Expression::Dict(node) => {
            check!(visitor.visit_dict(node));
            for element in &node.elements {
                match element {
                    DictElement::Simple { key, value, .. } => {
                        check!(walk_expression(visitor, key));
                        check!(walk_expression(visitor, value));
                    }
                    DictElement::Starred { value, .. } => {
                        check!(walk_expression(visitor, value));
                    }
                }
            }
            visitor.leave_dict(node);
        }
        Expression::ListComp(node) => {
            check!(visitor.visit_list_comp(node));
            check!(walk_expression(visitor, &node.elt));
            check!(walk_comp_for(visitor, &node.for_in));
            visitor.leave_list_comp(node);
        }
        Expression::SetComp(node) => {
            check!(visitor.visit_set_comp(node));
            check!(walk_expression(visitor, &node.elt));
            check!(walk_comp_for(visitor, &node.for_in));
            visitor.leave_set_comp(node);
        }
        Expression::DictComp(node) => {
            check!(visitor.visit_dict_comp(node));
            check!(walk_expression(visitor, &node.key));
            check!(walk_expression(visitor, &node.value));
            check!(walk_comp_for(visitor, &node.for_in));
            visitor.leave_dict_comp(node);
        }
        Expression::GeneratorExp(node) => {
            check!(visitor.visit_generator_exp(node));
            check!(walk_expression(visitor, &node.elt));
            check!(walk_comp_for(visitor, &node.for_in));
            visitor.leave_generator_exp(node);
        }
        Expression::SimpleString(node) => {
            check!(visitor.visit_simple_string(node));
            visitor.leave_simple_string(node);
        }
        Expression::ConcatenatedString(node) => {
            check!(visitor.visit_concatenated_string(node));
            visitor.leave_concatenated_string(node);
        }
        Expression::FormattedString(node) => {
            check!(visitor.visit_formatted_string(node));
            visitor.leave_formatted_string(node);
        }
        Expression::Integer(_) | Expression::Float(_) | Expression::Ellipsis(_) => {}
    }
    visitor.leave_expression(expression);
    VisitResult::Continue
}

// ============================================================================
// Transformer driver
// ============================================================================

/// Transform a module bottom-up.
pub fn transform_module(module: Module, transformer: &mut impl Transformer) -> Module {
    let Module { body, footer } = module;
    let body = transform_statement_list(body, transformer);
    transformer.leave_module(Module { body, footer })
}

fn transform_statement_list(
    statements: Vec<Statement>,
    transformer: &mut impl Transformer,
) -> Vec<Statement> {
    let mut out = Vec::new();
    for statement in statements {
        let Some(statement) = descend_statement(statement, transformer) else {
            continue;
        };
        match transformer.transform_statement(statement) {
            Transform::Keep(statement) => out.push(statement),
            Transform::Remove => {}
            Transform::Flatten(list) => out.extend(list),
        }
    }
    out
}

fn descend_statement(
    statement: Statement,
    transformer: &mut impl Transformer,
) -> Option<Statement> {
    match statement {
        Statement::Simple(mut line) => {
            let body = std::mem::take(&mut line.body);
            let original_len = body.len();
            let mut new_body = Vec::new();
            for small in body {
                let small = descend_small_statement(small, transformer);
                match transformer.transform_small_statement(small) {
                    Transform::Keep(small) => new_body.push(small),
                    Transform::Remove => {}
                    Transform::Flatten(list) => new_body.extend(list),
                }
            }
            if new_body.is_empty() {
                return None;
            }
            if new_body.len() != original_len {
                line.semicolons = Vec::new();
            }
            line.body = new_body;
            Some(Statement::Simple(line))
        }
        Statement::Compound(compound) => Some(Statement::Compound(descend_compound(
            compound,
            transformer,
        ))),
    }
}

fn transform_suite(suite: Suite, transformer: &mut impl Transformer) -> Suite {
    match suite {
        Suite::IndentedBlock(mut block) => {
            let body = std::mem::take(&mut block.body);
            let mut body = transform_statement_list(body, transformer);
            if body.is_empty() {
                body.push(Statement::Simple(SimpleStatementLine::new(
                    SmallStatement::Pass,
                )));
            }
            block.body = body;
            Suite::IndentedBlock(block)
        }
        Suite::Simple(mut simple) => {
            let body = std::mem::take(&mut simple.body);
            let original_len = body.len();
            let mut new_body = Vec::new();
            for small in body {
                let small = descend_small_statement(small, transformer);
                match transformer.transform_small_statement(small) {
                    Transform::Keep(small) => new_body.push(small),
                    Transform::Remove => {}
                    Transform::Flatten(list) => new_body.extend(list),
                }
            }
            if new_body.is_empty() {
                new_body.push(SmallStatement::Pass);
            }
            if new_body.len() != original_len {
                simple.semicolons = Vec::new();
            }
            simple.body = new_body;
            Suite::Simple(simple)
        }
    }
}

fn descend_small_statement(
    small: SmallStatement,
    transformer: &mut impl Transformer,
) -> SmallStatement {
    match small {
        SmallStatement::Expr(mut node) => {
            node.value = transform_expression(node.value, transformer);
            SmallStatement::Expr(node)
        }
        SmallStatement::Return(mut node) => {
            node.value = node
                .value
                .map(|value| transform_expression(value, transformer));
            SmallStatement::Return(node)
        }
        SmallStatement::Assign(mut node) => {
            node.targets = node
                .targets
                .into_iter()
                .map(|mut target| {
                    target.target = transform_expression(target.target, transformer);
                    target
                })
                .collect();
            node.value = transform_expression(node.value, transformer);
            SmallStatement::Assign(node)
        }
        SmallStatement::AnnAssign(mut node) => {
            node.target = transform_expression(node.target, transformer);
            node.annotation.annotation =
                transform_expression(node.annotation.annotation, transformer);
            node.value = node
                .value
                .map(|value| transform_expression(value, transformer));
            SmallStatement::AnnAssign(node)
        }
        SmallStatement::AugAssign(mut node) => {
            node.target = transform_expression(node.target, transformer);
            node.value = transform_expression(node.value, transformer);
            SmallStatement::AugAssign(node)
        }
        SmallStatement::Raise(mut node) => {
            node.value = node
                .value
                .map(|value| transform_expression(value, transformer));
            node.cause = node.cause.map(|mut cause| {
                cause.expression = transform_expression(cause.expression, transformer);
                cause
            });
            SmallStatement::Raise(node)
        }
        SmallStatement::Assert(mut node) => {
            node.test = transform_expression(node.test, transformer);
            node.msg = node
                .msg
                .map(|(comma, msg)| (comma, transform_expression(msg, transformer)));
            SmallStatement::Assert(node)
        }
        SmallStatement::Del(mut node) => {
            node.target = transform_expression(node.target, transformer);
            SmallStatement::Del(node)
        }
        other => other,
    }
}

fn descend_compound(
    compound: CompoundStatement,
    transformer: &mut impl Transformer,
) -> CompoundStatement {
    match compound {
        CompoundStatement::FunctionDef(mut node) => {
            node.decorators = transform_decorators(node.decorators, transformer);
            node.params = transform_parameters(node.params, transformer);
            node.returns = node.returns.map(|mut returns| {
                returns.annotation = transform_expression(returns.annotation, transformer);
                returns
            });
            node.body = transform_suite(node.body, transformer);
            CompoundStatement::FunctionDef(node)
        }
        CompoundStatement::ClassDef(mut node) => {
            node.decorators = transform_decorators(node.decorators, transformer);
            node.args = node.args.map(|mut args| {
                args.args = args
                    .args
                    .into_iter()
                    .map(|mut arg| {
                        arg.value = transform_expression(arg.value, transformer);
                        arg
                    })
                    .collect();
                args
            });
            node.body = transform_suite(node.body, transformer);
            CompoundStatement::ClassDef(node)
        }
        CompoundStatement::If(node) => CompoundStatement::If(transform_if(node, transformer)),
        CompoundStatement::While(mut node) => {
            node.test = transform_expression(node.test, transformer);
            node.body = transform_suite(node.body, transformer);
            node.orelse = node.orelse.map(|mut orelse| {
                orelse.body = transform_suite(orelse.body, transformer);
                orelse
            });
            CompoundStatement::While(node)
        }
        CompoundStatement::For(mut node) => {
            node.target = transform_expression(node.target, transformer);
            node.iter = transform_expression(node.iter, transformer);
            node.body = transform_suite(node.body, transformer);
            node.orelse = node.orelse.map(|mut orelse| {
                orelse.body = transform_suite(orelse.body, transformer);
                orelse
            });
            CompoundStatement::For(node)
        }
        CompoundStatement::Try(mut node) => {
            node.body = transform_suite(node.body, transformer);
            node.handlers = node
                .handlers
                .into_iter()
                .map(|mut handler| {
                    handler.kind = handler
                        .kind
                        .map(|kind| transform_expression(kind, transformer));
                    handler.body = transform_suite(handler.body, transformer);
                    handler
                })
                .collect();
            node.orelse = node.orelse.map(|mut orelse| {
                orelse.body = transform_suite(orelse.body, transformer);
                orelse
            });
            node.finalbody = node.finalbody.map(|mut finalbody| {
                finalbody.body = transform_suite(finalbody.body, transformer);
                finalbody
            });
            CompoundStatement::Try(node)
        }
        CompoundStatement::With(mut node) => {
            node.items = node
                .items
                .into_iter()
                .map(|mut item| {
                    item.item = transform_expression(item.item, transformer);
                    item
                })
                .collect();
            node.body = transform_suite(node.body, transformer);
            CompoundStatement::With(node)
        }
    }
}

fn transform_if(mut node: If, transformer: &mut impl Transformer) -> If {
    node.test = transform_expression(node.test, transformer);
    node.body = transform_suite(node.body, transformer);
    node.orelse = node.orelse.map(|orelse| {
        Box::new(match *orelse {
            OrElse::Elif(elif) => OrElse::Elif(transform_if(elif, transformer)),
            OrElse::Else(mut els) => {
                els.body = transform_suite(els.body, transformer);
                OrElse::Else(els)
            }
        })
    });
    node
}

fn transform_decorators(
    decorators: Vec<Decorator>,
    transformer: &mut impl Transformer,
) -> Vec<Decorator> {
    decorators
        .into_iter()
        .map(|mut decorator| {
            decorator.decorator = transform_expression(decorator.decorator, transformer);
            decorator
        })
        .collect()
}

fn transform_parameters(
    params: Parameters,
    transformer: &mut impl Transformer,
) -> Parameters {
    Parameters {
        items: params
            .items
            .into_iter()
            .map(|item| match item {
                ParamItem::Param(mut param) => {
                    param.annotation = param.annotation.map(|mut annotation| {
                        annotation.annotation =
                            transform_expression(annotation.annotation, transformer);
                        annotation
                    });
                    param.default = param
                        .default
                        .map(|default| transform_expression(default, transformer));
                    ParamItem::Param(param)
                }
                other => other,
            })
            .collect(),
    }
}

fn transform_elements(
    elements: Vec<Element>,
    transformer: &mut impl Transformer,
) -> Vec<Element> {
    elements
        .into_iter()
        .map(|mut element| {
            element.value = transform_expression(element.value, transformer);
            element
        })
        .collect()
}

fn transform_comp_for(mut node: CompFor, transformer: &mut impl Transformer) -> CompFor {
    node.target = transform_expression(node.target, transformer);
    node.iter = transform_expression(node.iter, transformer);
    node.ifs = node
        .ifs
        .into_iter()
        .map(|mut if_clause| {
            if_clause.test = transform_expression(if_clause.test, transformer);
            if_clause
        })
        .collect();
    node.inner_for_in = node
        .inner_for_in
        .map(|inner| Box::new(transform_comp_for(*inner, transformer)));
    node
}

/// Rebuild an expression bottom-up, handing each node to the transformer.
pub fn transform_expression(
    expression: Expression,
    transformer: &mut impl Transformer,
) -> Expression {
    let rebuilt = match expression {
        Expression::Name(node) => Expression::Name(node),
        Expression::Attribute(mut node) => {
            node.value = transform_expression(node.value, transformer);
            Expression::Attribute(node)
        }
        Expression::Call(mut node) => {
            node.func = transform_expression(node.func, transformer);
            node.args = node
                .args
                .into_iter()
                .map(|mut arg| {
                    arg.value = transform_expression(arg.value, transformer);
                    arg
                })
                .collect();
            Expression::Call(node)
        }
        Expression::Subscript(mut node) => {
            node.value = transform_expression(node.value, transformer);
            node.slice = node
                .slice
                .into_iter()
                .map(|mut element| {
                    element.slice = match element.slice {
                        BaseSlice::Index(mut index) => {
                            index.value = transform_expression(index.value, transformer);
                            BaseSlice::Index(index)
                        }
                        BaseSlice::Slice(mut slice) => {
                            slice.lower = slice
                                .lower
                                .map(|lower| transform_expression(lower, transformer));
                            slice.upper = slice
                                .upper
                                .map(|upper| transform_expression(upper, transformer));
                            slice.step = slice
                                .step
                                .map(|step| transform_expression(step, transformer));
                            BaseSlice::Slice(slice)
                        }
                    };
                    element
                })
                .collect();
            Expression::Subscript(node)
        }
        Expression::Parenthesized(mut node) => {
            node.expression = transform_expression(node.expression, transformer);
            Expression::Parenthesized(node)
        }
        Expression::BinaryOperation(mut node) => {
            node.left = transform_expression(node.left, transformer);
            node.right = transform_expression(node.right, transformer);
            Expression::BinaryOperation(node)
        }
        Expression::BooleanOperation(mut node) => {
            node.left = transform_expression(node.left, transformer);
            node.right = transform_expression(node.right, transformer);
            Expression::BooleanOperation(node)
        }
        Expression::UnaryOperation(mut node) => {
            node.expression = transform_expression(node.expression, transformer);
            Expression::UnaryOperation(node)
        }
        Expression::Comparison(mut node) => {
            node.left = transform_expression(node.left, transformer);
            node.comparisons = node
                .comparisons
                .into_iter()
                .map(|mut target| {
                    target.comparator = transform_expression(target.comparator, transformer);
                    target
                })
                .collect();
            Expression::Comparison(node)
        }
        Expression::IfExp(mut node) => {
            node.body = transform_expression(node.body, transformer);
            node.test = transform_expression(node.test, transformer);
            node.orelse = transform_expression(node.orelse, transformer);
            Expression::IfExp(node)
        }
        Expression::Lambda(mut node) => {
            node.params = transform_parameters(node.params, transformer);
            node.body = transform_expression(node.body, transformer);
            Expression::Lambda(node)
        }
        Expression::NamedExpr(mut node) => {
            node.value = transform_expression(node.value, transformer);
            Expression::NamedExpr(node)
        }
        Expression::Await(mut node) => {
            node.expression = transform_expression(node.expression, transformer);
            Expression::Await(node)
        }
        Expression::Yield(mut node) => {
            node.value = node.value.map(|value| {
                Box::new(match *value {
                    YieldValue::Value(expression) => {
                        YieldValue::Value(transform_expression(expression, transformer))
                    }
                    YieldValue::From {
                        whitespace_after_from,
                        expression,
                    } => YieldValue::From {
                        whitespace_after_from,
                        expression: transform_expression(expression, transformer),
                    },
                })
            });
            Expression::Yield(node)
        }
        Expression::Starred(mut node) => {
            node.expression = transform_expression(node.expression, transformer);
            Expression::Starred(node)
        }
        Expression::Tuple(mut node) => {
            node.elements = transform_elements(node.elements, transformer);
            Expression::Tuple(node)
        }
        Expression::List(mut node) => {
            node.elements = transform_elements(node.elements, transformer);
            Expression::List(node)
        }
        Expression::Set(mut node) => {
            node.elements = transform_elements(node.elements, transformer);
            Expression::Set(node)
        }
        Expression::Dict(mut node) => {
            node.elements = node
                .elements
                .into_iter()
                .map(|element| match element {
                    DictElement::Simple {
                        key,
                        colon,
                        value,
                        comma,
                    } => DictElement::Simple {
                        key: transform_expression(key, transformer),
                        colon,
                        value: transform_expression(value, transformer),
                        comma,
                    },
                    DictElement::Starred {
                        whitespace_after_star,
                        value,
                        comma,
                    } => DictElement::Starred {
                        whitespace_after_star,
                        value: transform_expression(value, transformer),
                        comma,
                    },
                })
                .collect();
            Expression::Dict(node)
        }
        Expression::ListComp(mut node) => {
            node.elt = transform_expression(node.elt, transformer);
            node.for_in = transform_comp_for(node.for_in, transformer);
            Expression::ListComp(node)
        }
        Expression::SetComp(mut node) => {
            node.elt = transform_expression(node.elt, transformer);
            node.for_in = transform_comp_for(node.for_in, transformer);
            Expression::SetComp(node)
        }
        Expression::DictComp(mut node) => {
            node.key = transform_expression(node.key, transformer);
            node.value = transform_expression(node.value, transformer);
            node.for_in = transform_comp_for(node.for_in, transformer);
            Expression::DictComp(node)
        }
        Expression::GeneratorExp(mut node) => {
            node.elt = transform_expression(node.elt, transformer);
            node.for_in = transform_comp_for(node.for_in, transformer);
            Expression::GeneratorExp(node)
        }
        other => other,
    };
    transformer.transform_expression(rebuilt)
}
