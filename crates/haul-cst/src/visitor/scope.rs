// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Scope and reference analysis.
//!
//! [`ScopeIndex::build`] walks a freshly parsed module and produces the
//! bidirectional assignment/access relation: every name-introducing node
//! (imports, definitions, assignment targets, parameters, loop and with
//! targets, comprehension targets) becomes an [`Assignment`]; every name
//! use becomes an [`Access`] whose referents are resolved through the
//! lexical scope chain.
//!
//! # Qualified accesses
//!
//! A dotted head such as `pkg.mod.fn(...)` is recorded as a single access
//! on the base name, carrying the full segment chain and the span of the
//! outermost attribute node. Import rewriting consumes these chains
//! directly instead of re-walking parent links.
//!
//! # Scoping rules
//!
//! Function (and lambda, and comprehension) scopes are function-wide:
//! a name assigned anywhere in the scope is local to it. Class bodies are
//! visible only to direct accesses, never to nested scopes. `global`
//! escapes to module scope; `nonlocal` to the nearest enclosing function
//! scope. Unresolved names (builtins among them) have no referents.

use std::collections::{HashMap, HashSet};

use crate::nodes::*;

/// Index of a scope within a [`ScopeIndex`]. Module scope is `0`.
pub type ScopeId = usize;
/// Index of an [`Assignment`] within a [`ScopeIndex`].
pub type AssignmentId = usize;
/// Index of an [`Access`] within a [`ScopeIndex`].
pub type AccessId = usize;

/// The kind of a lexical scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Module,
    Function,
    Class,
    Lambda,
    Comprehension,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Module => "module",
            ScopeKind::Function => "function",
            ScopeKind::Class => "class",
            ScopeKind::Lambda => "lambda",
            ScopeKind::Comprehension => "comprehension",
        }
    }
}

/// What kind of node introduced a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Import,
    ImportFrom,
    FunctionDef,
    ClassDef,
    Assign,
    AnnAssign,
    AugAssign,
    NamedExpr,
    Param,
    ForTarget,
    WithTarget,
    ExceptName,
    CompTarget,
}

impl BindingKind {
    /// True for bindings created by an import statement.
    pub fn is_import(&self) -> bool {
        matches!(self, BindingKind::Import | BindingKind::ImportFrom)
    }
}

/// One scope in the scope tree.
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// Names declared `global` in this scope.
    globals: HashSet<String>,
    /// Names declared `nonlocal` in this scope.
    nonlocals: HashSet<String>,
}

/// A name-introducing node.
#[derive(Debug)]
pub struct Assignment {
    /// The local name bound.
    pub name: String,
    pub scope: ScopeId,
    /// Span of the defining node. For imports this is the span of the
    /// whole import small-statement.
    pub node: Span,
    pub kind: BindingKind,
    /// Accesses resolved to this assignment.
    pub references: Vec<AccessId>,
}

/// A name use site.
#[derive(Debug)]
pub struct Access {
    pub scope: ScopeId,
    /// Span of the base name.
    pub node: Span,
    /// Span of the outermost dotted expression containing the base name
    /// (equals `node` for a bare name).
    pub top: Span,
    /// Dotted segments starting with the base name.
    pub chain: Vec<String>,
    /// Assignments this access resolves to; empty for builtins and
    /// undefined names.
    pub referents: Vec<AssignmentId>,
}

/// The scope/reference index of one module revision.
#[derive(Debug, Default)]
pub struct ScopeIndex {
    scopes: Vec<Scope>,
    assignments: Vec<Assignment>,
    accesses: Vec<Access>,
}

impl ScopeIndex {
    /// Analyze a module.
    pub fn build(module: &Module) -> ScopeIndex {
        let mut collector = Collector::new();
        collector.collect_module(module);
        collector.resolve();
        collector.index
    }

    /// The module (global) scope.
    pub fn module_scope(&self) -> ScopeId {
        0
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn accesses(&self) -> &[Access] {
        &self.accesses
    }

    pub fn assignment(&self, id: AssignmentId) -> &Assignment {
        &self.assignments[id]
    }

    pub fn access(&self, id: AccessId) -> &Access {
        &self.accesses[id]
    }

    /// Assignments of the module scope.
    pub fn module_assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(|a| a.scope == 0)
    }
}

// ============================================================================
// Collection
// ============================================================================

struct Collector {
    index: ScopeIndex,
    /// Per-scope name -> assignment ids.
    bindings: Vec<HashMap<String, Vec<AssignmentId>>>,
    stack: Vec<ScopeId>,
}

impl Collector {
    fn new() -> Self {
        let mut collector = Self {
            index: ScopeIndex::default(),
            bindings: Vec::new(),
            stack: Vec::new(),
        };
        collector.push_scope(ScopeKind::Module);
        collector
    }

    fn current(&self) -> ScopeId {
        *self.stack.last().expect("scope stack is never empty")
    }

    fn push_scope(&mut self, kind: ScopeKind) -> ScopeId {
        let parent = self.stack.last().copied();
        let id = self.index.scopes.len();
        self.index.scopes.push(Scope {
            kind,
            parent,
            globals: HashSet::new(),
            nonlocals: HashSet::new(),
        });
        self.bindings.push(HashMap::new());
        self.stack.push(id);
        id
    }

    fn pop_scope(&mut self) {
        self.stack.pop();
    }

    fn bind(&mut self, name: &str, node: Span, kind: BindingKind) {
        let scope = self.current();
        let id = self.index.assignments.len();
        self.index.assignments.push(Assignment {
            name: name.to_owned(),
            scope,
            node,
            kind,
            references: Vec::new(),
        });
        self.bindings[scope]
            .entry(name.to_owned())
            .or_default()
            .push(id);
    }

    fn record_access(&mut self, node: Span, top: Span, chain: Vec<String>) {
        let scope = self.current();
        self.index.accesses.push(Access {
            scope,
            node,
            top,
            chain,
            referents: Vec::new(),
        });
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn collect_module(&mut self, module: &Module) {
        for statement in &module.body {
            self.collect_statement(statement);
        }
    }

    fn collect_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Simple(line) => {
                for small in &line.body {
                    self.collect_small(small);
                }
            }
            Statement::Compound(compound) => self.collect_compound(compound),
        }
    }

    fn collect_suite(&mut self, suite: &Suite) {
        match suite {
            Suite::IndentedBlock(block) => {
                for statement in &block.body {
                    self.collect_statement(statement);
                }
            }
            Suite::Simple(simple) => {
                for small in &simple.body {
                    self.collect_small(small);
                }
            }
        }
    }

    fn collect_small(&mut self, small: &SmallStatement) {
        match small {
            SmallStatement::Pass | SmallStatement::Break | SmallStatement::Continue => {}
            SmallStatement::Expr(node) => self.load(&node.value),
            SmallStatement::Return(node) => {
                if let Some(value) = &node.value {
                    self.load(value);
                }
            }
            SmallStatement::Assign(node) => {
                self.load(&node.value);
                for target in &node.targets {
                    self.bind_target(&target.target, BindingKind::Assign);
                }
            }
            SmallStatement::AnnAssign(node) => {
                self.load(&node.annotation.annotation);
                if let Some(value) = &node.value {
                    self.load(value);
                }
                self.bind_target(&node.target, BindingKind::AnnAssign);
            }
            SmallStatement::AugAssign(node) => {
                self.load(&node.value);
                // The target is read and rebound.
                self.load(&node.target);
                self.bind_target(&node.target, BindingKind::AugAssign);
            }
            SmallStatement::Import(node) => {
                for alias in &node.names {
                    self.bind(&alias.bound_name(), node.span, BindingKind::Import);
                }
            }
            SmallStatement::ImportFrom(node) => {
                if let ImportNames::Aliases(aliases) = &node.names {
                    for alias in aliases {
                        self.bind(&alias.bound_name(), node.span, BindingKind::ImportFrom);
                    }
                }
            }
            SmallStatement::Raise(node) => {
                if let Some(value) = &node.value {
                    self.load(value);
                }
                if let Some(cause) = &node.cause {
                    self.load(&cause.expression);
                }
            }
            SmallStatement::Assert(node) => {
                self.load(&node.test);
                if let Some((_, msg)) = &node.msg {
                    self.load(msg);
                }
            }
            SmallStatement::Global(node) => {
                let scope = self.current();
                for item in &node.names {
                    self.index.scopes[scope]
                        .globals
                        .insert(item.name.value.clone());
                }
            }
            SmallStatement::Nonlocal(node) => {
                let scope = self.current();
                for item in &node.names {
                    self.index.scopes[scope]
                        .nonlocals
                        .insert(item.name.value.clone());
                }
            }
            SmallStatement::Del(node) => self.load(&node.target),
        }
    }

    fn collect_compound(&mut self, compound: &CompoundStatement) {
        match compound {
            CompoundStatement::FunctionDef(node) => {
                for decorator in &node.decorators {
                    self.load(&decorator.decorator);
                }
                // Defaults and annotations evaluate in the enclosing scope.
                for param in node.params.params() {
                    if let Some(annotation) = &param.annotation {
                        self.load(&annotation.annotation);
                    }
                    if let Some(default) = &param.default {
                        self.load(default);
                    }
                }
                if let Some(returns) = &node.returns {
                    self.load(&returns.annotation);
                }
                self.bind(&node.name.value, node.span, BindingKind::FunctionDef);
                self.push_scope(ScopeKind::Function);
                for param in node.params.params() {
                    self.bind(&param.name.value, param.name.span, BindingKind::Param);
                }
                self.collect_suite(&node.body);
                self.pop_scope();
            }
            CompoundStatement::ClassDef(node) => {
                for decorator in &node.decorators {
                    self.load(&decorator.decorator);
                }
                if let Some(args) = &node.args {
                    for arg in &args.args {
                        self.load(&arg.value);
                    }
                }
                self.bind(&node.name.value, node.span, BindingKind::ClassDef);
                self.push_scope(ScopeKind::Class);
                self.collect_suite(&node.body);
                self.pop_scope();
            }
            CompoundStatement::If(node) => self.collect_if(node),
            CompoundStatement::While(node) => {
                self.load(&node.test);
                self.collect_suite(&node.body);
                if let Some(orelse) = &node.orelse {
                    self.collect_suite(&orelse.body);
                }
            }
            CompoundStatement::For(node) => {
                self.load(&node.iter);
                self.bind_target(&node.target, BindingKind::ForTarget);
                self.collect_suite(&node.body);
                if let Some(orelse) = &node.orelse {
                    self.collect_suite(&orelse.body);
                }
            }
            CompoundStatement::Try(node) => {
                self.collect_suite(&node.body);
                for handler in &node.handlers {
                    if let Some(kind) = &handler.kind {
                        self.load(kind);
                    }
                    if let Some(asname) = &handler.name {
                        self.bind(
                            &asname.name.value,
                            asname.name.span,
                            BindingKind::ExceptName,
                        );
                    }
                    self.collect_suite(&handler.body);
                }
                if let Some(orelse) = &node.orelse {
                    self.collect_suite(&orelse.body);
                }
                if let Some(finalbody) = &node.finalbody {
                    self.collect_suite(&finalbody.body);
                }
            }
            CompoundStatement::With(node) => {
                for item in &node.items {
                    self.load(&item.item);
                    if let Some(asname) = &item.asname {
                        self.bind(
                            &asname.name.value,
                            asname.name.span,
                            BindingKind::WithTarget,
                        );
                    }
                }
                self.collect_suite(&node.body);
            }
        }
    }

    fn collect_if(&mut self, node: &If) {
        self.load(&node.test);
        self.collect_suite(&node.body);
        if let Some(orelse) = &node.orelse {
            match &**orelse {
                OrElse::Elif(elif) => self.collect_if(elif),
                OrElse::Else(els) => self.collect_suite(&els.body),
            }
        }
    }

    // ------------------------------------------------------------------
    // Targets
    // ------------------------------------------------------------------

    fn bind_target(&mut self, target: &Expression, kind: BindingKind) {
        match target {
            Expression::Name(name) => self.bind(&name.value, name.span, kind),
            Expression::Tuple(tuple) => {
                for element in &tuple.elements {
                    self.bind_target(&element.value, kind);
                }
            }
            Expression::List(list) => {
                for element in &list.elements {
                    self.bind_target(&element.value, kind);
                }
            }
            Expression::Starred(starred) => self.bind_target(&starred.expression, kind),
            Expression::Parenthesized(inner) => self.bind_target(&inner.expression, kind),
            // Attribute and subscript targets read their base.
            other => self.load(other),
        }
    }

    // ------------------------------------------------------------------
    // Loads
    // ------------------------------------------------------------------

    /// Flatten a pure dotted head into `(base, segments)`.
    fn qualified_chain(expression: &Expression) -> Option<(&Name, Vec<String>)> {
        match expression {
            Expression::Name(name) => Some((name, vec![name.value.clone()])),
            Expression::Attribute(attr) => {
                let (base, mut chain) = Self::qualified_chain(&attr.value)?;
                chain.push(attr.attr.value.clone());
                Some((base, chain))
            }
            _ => None,
        }
    }

    fn load(&mut self, expression: &Expression) {
        match expression {
            Expression::Name(name) => {
                self.record_access(name.span, name.span, vec![name.value.clone()]);
            }
            Expression::Attribute(attr) => {
                match Self::qualified_chain(expression) {
                    Some((base, chain)) => self.record_access(base.span, attr.span, chain),
                    // Not a pure dotted head; only the base is a use.
                    None => self.load(&attr.value),
                }
            }
            Expression::Call(node) => {
                self.load(&node.func);
                for arg in &node.args {
                    self.load(&arg.value);
                }
            }
            Expression::Subscript(node) => {
                self.load(&node.value);
                for element in &node.slice {
                    match &element.slice {
                        BaseSlice::Index(index) => self.load(&index.value),
                        BaseSlice::Slice(slice) => {
                            if let Some(lower) = &slice.lower {
                                self.load(lower);
                            }
                            if let Some(upper) = &slice.upper {
                                self.load(upper);
                            }
                            if let Some(step) = &slice.step {
                                self.load(step);
                            }
                        }
                    }
                }
            }
            Expression::Parenthesized(node) => self.load(&node.expression),
            Expression::BinaryOperation(node) => {
                self.load(&node.left);
                self.load(&node.right);
            }
            Expression::BooleanOperation(node) => {
                self.load(&node.left);
                self.load(&node.right);
            }
            Expression::UnaryOperation(node) => self.load(&node.expression),
            Expression::Comparison(node) => {
                self.load(&node.left);
                for target in &node.comparisons {
                    self.load(&target.comparator);
                }
            }
            Expression::IfExp(node) => {
                self.load(&node.body);
                self.load(&node.test);
                self.load(&node.orelse);
            }
            Expression::Lambda(node) => {
                for param in node.params.params() {
                    if let Some(default) = &param.default {
                        self.load(default);
                    }
                }
                self.push_scope(ScopeKind::Lambda);
                for param in node.params.params() {
                    self.bind(&param.name.value, param.name.span, BindingKind::Param);
                }
                self.load(&node.body);
                self.pop_scope();
            }
            Expression::NamedExpr(node) => {
                self.load(&node.value);
                self.bind(&node.target.value, node.target.span, BindingKind::NamedExpr);
            }
            Expression::Await(node) => self.load(&node.expression),
            Expression::Yield(node) => {
                if let Some(value) = &node.value {
                    match &**value {
                        YieldValue::Value(expression) => self.load(expression),
                        YieldValue::From { expression, .. } => self.load(expression),
                    }
                }
            }
            Expression::Starred(node) => self.load(&node.expression),
            Expression::Tuple(node) => {
                for element in &node.elements {
                    self.load(&element.value);
                }
            }
            Expression::List(node) => {
                for element in &node.elements {
                    self.load(&element.value);
                }
            }
            Expression::Set(node) => {
                for element in &node.elements {
                    self.load(&element.value);
                }
            }
            Expression::Dict(node) => {
                for element in &node.elements {
                    match element {
                        DictElement::Simple { key, value, .. } => {
                            self.load(key);
                            self.load(value);
                        }
                        DictElement::Starred { value, .. } => self.load(value),
                    }
                }
            }
            Expression::ListComp(node) => {
                self.collect_comprehension(&node.for_in, |collector| collector.load(&node.elt));
            }
            Expression::SetComp(node) => {
                self.collect_comprehension(&node.for_in, |collector| collector.load(&node.elt));
            }
            Expression::DictComp(node) => {
                self.collect_comprehension(&node.for_in, |collector| {
                    collector.load(&node.key);
                    collector.load(&node.value);
                });
            }
            Expression::GeneratorExp(node) => {
                self.collect_comprehension(&node.for_in, |collector| collector.load(&node.elt));
            }
            Expression::SimpleString(_)
            | Expression::ConcatenatedString(_)
            | Expression::FormattedString(_)
            | Expression::Integer(_)
            | Expression::Float(_)
            | Expression::Ellipsis(_) => {}
        }
    }

    /// The outermost iterable evaluates in the enclosing scope; targets,
    /// conditions, inner clauses, and the element all live in a fresh
    /// comprehension scope.
    fn collect_comprehension<F>(&mut self, for_in: &CompFor, load_elt: F)
    where
        F: FnOnce(&mut Self),
    {
        self.load(&for_in.iter);
        self.push_scope(ScopeKind::Comprehension);
        self.bind_target(&for_in.target, BindingKind::CompTarget);
        for if_clause in &for_in.ifs {
            self.load(&if_clause.test);
        }
        let mut inner = for_in.inner_for_in.as_deref();
        while let Some(comp) = inner {
            self.load(&comp.iter);
            self.bind_target(&comp.target, BindingKind::CompTarget);
            for if_clause in &comp.ifs {
                self.load(&if_clause.test);
            }
            inner = comp.inner_for_in.as_deref();
        }
        load_elt(self);
        self.pop_scope();
    }

    // ------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------

    fn resolve(&mut self) {
        for access_id in 0..self.index.accesses.len() {
            let name = self.index.accesses[access_id].chain[0].clone();
            let start = self.index.accesses[access_id].scope;
            if let Some(assignment_ids) = self.resolve_name(&name, start) {
                for assignment_id in &assignment_ids {
                    self.index.assignments[*assignment_id]
                        .references
                        .push(access_id);
                }
                self.index.accesses[access_id].referents = assignment_ids;
            }
        }
    }

    fn resolve_name(&self, name: &str, start: ScopeId) -> Option<Vec<AssignmentId>> {
        let mut current = Some(start);
        let mut first = true;
        while let Some(scope_id) = current {
            let scope = &self.index.scopes[scope_id];
            if scope.globals.contains(name) {
                return self.lookup(0, name);
            }
            if scope.nonlocals.contains(name) {
                current = scope.parent;
                first = false;
                // Skip to the nearest enclosing function-like scope.
                while let Some(id) = current {
                    let kind = self.index.scopes[id].kind;
                    if matches!(
                        kind,
                        ScopeKind::Function | ScopeKind::Lambda | ScopeKind::Comprehension
                    ) {
                        break;
                    }
                    current = self.index.scopes[id].parent;
                }
                continue;
            }
            let visible = first || scope.kind != ScopeKind::Class;
            if visible {
                if let Some(found) = self.lookup(scope_id, name) {
                    return Some(found);
                }
            }
            current = scope.parent;
            first = false;
        }
        None
    }

    fn lookup(&self, scope_id: ScopeId, name: &str) -> Option<Vec<AssignmentId>> {
        self.bindings
            .get(scope_id)
            .and_then(|map| map.get(name))
            .cloned()
            .filter(|ids| !ids.is_empty())
    }
}
