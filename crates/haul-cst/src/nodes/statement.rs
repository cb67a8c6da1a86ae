// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Statement nodes.
//!
//! Statements own their leading trivia (blank lines and comments before
//! them, stored with absolute whitespace) and their line tail. Indentation
//! is not stored per statement; [`IndentedBlock`] records the relative
//! indent of its body and codegen maintains the stack.

use crate::codegen::{Codegen, CodegenState, DEFAULT_INDENT};
use crate::nodes::expression::{
    Annotation, Arg, Asynchronous, Expression, Name, Parameters,
};
use crate::nodes::op::{
    AssignEqual, AugOp, Comma, Dot, ImportStar, LeftParen, RightParen, Semicolon,
};
use crate::nodes::traits::{Span, Spanned};
use crate::nodes::whitespace::{EmptyLine, SimpleWhitespace, TrailingWhitespace};

/// A whole module: top-level statements plus end-of-file trivia.
///
/// Leading blank lines and comments of the file belong to the first
/// statement; a file with no statements keeps everything in `footer`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    pub body: Vec<Statement>,
    pub footer: Vec<EmptyLine>,
}

impl Codegen for Module {
    fn codegen(&self, state: &mut CodegenState) {
        for statement in &self.body {
            statement.codegen(state);
        }
        for line in &self.footer {
            line.codegen(state);
        }
    }
}

/// A top-level or block-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Simple(SimpleStatementLine),
    Compound(CompoundStatement),
}

impl Statement {
    pub fn leading_lines(&self) -> &Vec<EmptyLine> {
        match self {
            Statement::Simple(s) => &s.leading_lines,
            Statement::Compound(c) => c.leading_lines(),
        }
    }

    pub fn leading_lines_mut(&mut self) -> &mut Vec<EmptyLine> {
        match self {
            Statement::Simple(s) => &mut s.leading_lines,
            Statement::Compound(c) => c.leading_lines_mut(),
        }
    }
}

impl Spanned for Statement {
    fn span(&self) -> Span {
        match self {
            Statement::Simple(s) => s.span,
            Statement::Compound(c) => c.span(),
        }
    }
}

impl Codegen for Statement {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Statement::Simple(s) => s.codegen(state),
            Statement::Compound(c) => c.codegen(state),
        }
    }
}

/// A compound (block-introducing) statement.
#[derive(Debug, Clone, PartialEq)]
pub enum CompoundStatement {
    FunctionDef(FunctionDef),
    ClassDef(ClassDef),
    If(If),
    While(While),
    For(For),
    Try(Try),
    With(With),
}

impl CompoundStatement {
    pub fn leading_lines(&self) -> &Vec<EmptyLine> {
        match self {
            CompoundStatement::FunctionDef(n) => &n.leading_lines,
            CompoundStatement::ClassDef(n) => &n.leading_lines,
            CompoundStatement::If(n) => &n.leading_lines,
            CompoundStatement::While(n) => &n.leading_lines,
            CompoundStatement::For(n) => &n.leading_lines,
            CompoundStatement::Try(n) => &n.leading_lines,
            CompoundStatement::With(n) => &n.leading_lines,
        }
    }

    pub fn leading_lines_mut(&mut self) -> &mut Vec<EmptyLine> {
        match self {
            CompoundStatement::FunctionDef(n) => &mut n.leading_lines,
            CompoundStatement::ClassDef(n) => &mut n.leading_lines,
            CompoundStatement::If(n) => &mut n.leading_lines,
            CompoundStatement::While(n) => &mut n.leading_lines,
            CompoundStatement::For(n) => &mut n.leading_lines,
            CompoundStatement::Try(n) => &mut n.leading_lines,
            CompoundStatement::With(n) => &mut n.leading_lines,
        }
    }
}

impl Spanned for CompoundStatement {
    fn span(&self) -> Span {
        match self {
            CompoundStatement::FunctionDef(n) => n.span,
            CompoundStatement::ClassDef(n) => n.span,
            CompoundStatement::If(n) => n.span,
            CompoundStatement::While(n) => n.span,
            CompoundStatement::For(n) => n.span,
            CompoundStatement::Try(n) => n.span,
            CompoundStatement::With(n) => n.span,
        }
    }
}

impl Codegen for CompoundStatement {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            CompoundStatement::FunctionDef(n) => n.codegen(state),
            CompoundStatement::ClassDef(n) => n.codegen(state),
            CompoundStatement::If(n) => n.codegen(state),
            CompoundStatement::While(n) => n.codegen(state),
            CompoundStatement::For(n) => n.codegen(state),
            CompoundStatement::Try(n) => n.codegen(state),
            CompoundStatement::With(n) => n.codegen(state),
        }
    }
}

/// One physical line of semicolon-separated small statements.
///
/// `semicolons[i]` follows `body[i]`; a trailing semicolon is allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleStatementLine {
    pub leading_lines: Vec<EmptyLine>,
    pub body: Vec<SmallStatement>,
    pub semicolons: Vec<Semicolon>,
    pub trailing: TrailingWhitespace,
    pub span: Span,
}

impl SimpleStatementLine {
    /// A synthesized line holding one small statement.
    pub fn new(statement: SmallStatement) -> Self {
        Self {
            leading_lines: Vec::new(),
            body: vec![statement],
            semicolons: Vec::new(),
            trailing: TrailingWhitespace::default(),
            span: Span::SYNTHETIC,
        }
    }
}

impl Spanned for SimpleStatementLine {
    fn span(&self) -> Span {
        self.span
    }
}

impl Codegen for SimpleStatementLine {
    fn codegen(&self, state: &mut CodegenState) {
        for line in &self.leading_lines {
            line.codegen(state);
        }
        state.add_indent();
        for (idx, small) in self.body.iter().enumerate() {
            small.codegen(state);
            match self.semicolons.get(idx) {
                Some(semicolon) => semicolon.codegen(state),
                None => {
                    if idx + 1 < self.body.len() {
                        Semicolon::default().codegen(state);
                    }
                }
            }
        }
        self.trailing.codegen(state);
    }
}

/// A statement that fits on one line.
#[derive(Debug, Clone, PartialEq)]
pub enum SmallStatement {
    Pass,
    Break,
    Continue,
    Expr(Expr),
    Return(Return),
    Assign(Assign),
    AnnAssign(AnnAssign),
    AugAssign(AugAssign),
    Import(Import),
    ImportFrom(ImportFrom),
    Raise(Raise),
    Assert(Assert),
    Global(Global),
    Nonlocal(Nonlocal),
    Del(Del),
}

impl Codegen for SmallStatement {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            SmallStatement::Pass => state.add("pass"),
            SmallStatement::Break => state.add("break"),
            SmallStatement::Continue => state.add("continue"),
            SmallStatement::Expr(n) => n.codegen(state),
            SmallStatement::Return(n) => n.codegen(state),
            SmallStatement::Assign(n) => n.codegen(state),
            SmallStatement::AnnAssign(n) => n.codegen(state),
            SmallStatement::AugAssign(n) => n.codegen(state),
            SmallStatement::Import(n) => n.codegen(state),
            SmallStatement::ImportFrom(n) => n.codegen(state),
            SmallStatement::Raise(n) => n.codegen(state),
            SmallStatement::Assert(n) => n.codegen(state),
            SmallStatement::Global(n) => n.codegen(state),
            SmallStatement::Nonlocal(n) => n.codegen(state),
            SmallStatement::Del(n) => n.codegen(state),
        }
    }
}

/// An expression used as a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub value: Expression,
}

impl Codegen for Expr {
    fn codegen(&self, state: &mut CodegenState) {
        self.value.codegen(state);
    }
}

/// A `return` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub whitespace_after_return: SimpleWhitespace,
    pub value: Option<Expression>,
}

impl Codegen for Return {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("return");
        self.whitespace_after_return.codegen(state);
        self.value.codegen(state);
    }
}

/// One `target =` of an assignment (chains have several).
#[derive(Debug, Clone, PartialEq)]
pub struct AssignTarget {
    pub target: Expression,
    pub whitespace_before_equal: SimpleWhitespace,
    pub whitespace_after_equal: SimpleWhitespace,
}

impl Codegen for AssignTarget {
    fn codegen(&self, state: &mut CodegenState) {
        self.target.codegen(state);
        self.whitespace_before_equal.codegen(state);
        state.add("=");
        self.whitespace_after_equal.codegen(state);
    }
}

/// An assignment `a = b = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub targets: Vec<AssignTarget>,
    pub value: Expression,
    pub span: Span,
}

impl Spanned for Assign {
    fn span(&self) -> Span {
        self.span
    }
}

impl Codegen for Assign {
    fn codegen(&self, state: &mut CodegenState) {
        for target in &self.targets {
            target.codegen(state);
        }
        self.value.codegen(state);
    }
}

/// An annotated assignment `target: annotation [= value]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnAssign {
    pub target: Expression,
    pub annotation: Annotation,
    pub equal: Option<AssignEqual>,
    pub value: Option<Expression>,
    pub span: Span,
}

impl Spanned for AnnAssign {
    fn span(&self) -> Span {
        self.span
    }
}

impl Codegen for AnnAssign {
    fn codegen(&self, state: &mut CodegenState) {
        self.target.codegen(state);
        self.annotation.codegen(state);
        self.equal.codegen(state);
        self.value.codegen(state);
    }
}

/// An augmented assignment `target op= value`.
#[derive(Debug, Clone, PartialEq)]
pub struct AugAssign {
    pub target: Expression,
    pub op: AugOp,
    pub value: Expression,
    pub span: Span,
}

impl Codegen for AugAssign {
    fn codegen(&self, state: &mut CodegenState) {
        self.target.codegen(state);
        self.op.codegen(state);
        self.value.codegen(state);
    }
}

/// A dotted module path: a bare name or an attribute chain of names.
#[derive(Debug, Clone, PartialEq)]
pub enum NameOrAttribute {
    N(Name),
    A(Box<crate::nodes::expression::Attribute>),
}

impl NameOrAttribute {
    /// Flatten into dotted segments, left to right.
    pub fn segments(&self) -> Vec<&str> {
        fn collect<'a>(expr: &'a Expression, out: &mut Vec<&'a str>) {
            match expr {
                Expression::Name(name) => out.push(name.value.as_str()),
                Expression::Attribute(attr) => {
                    collect(&attr.value, out);
                    out.push(attr.attr.value.as_str());
                }
                _ => {}
            }
        }
        let mut out = Vec::new();
        match self {
            NameOrAttribute::N(name) => out.push(name.value.as_str()),
            NameOrAttribute::A(attr) => {
                collect(&attr.value, &mut out);
                out.push(attr.attr.value.as_str());
            }
        }
        out
    }

    /// The rightmost segment.
    pub fn last_segment(&self) -> &str {
        match self {
            NameOrAttribute::N(name) => &name.value,
            NameOrAttribute::A(attr) => &attr.attr.value,
        }
    }
}

impl Codegen for NameOrAttribute {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            NameOrAttribute::N(name) => name.codegen(state),
            NameOrAttribute::A(attr) => attr.codegen(state),
        }
    }
}

/// An `as alias` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct AsName {
    pub whitespace_before_as: SimpleWhitespace,
    pub whitespace_after_as: SimpleWhitespace,
    pub name: Name,
}

impl Codegen for AsName {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace_before_as.codegen(state);
        state.add("as");
        self.whitespace_after_as.codegen(state);
        self.name.codegen(state);
    }
}

/// One imported name with its optional alias and trailing comma.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportAlias {
    pub name: NameOrAttribute,
    pub asname: Option<AsName>,
    pub comma: Option<Comma>,
}

impl ImportAlias {
    /// A synthesized `name` alias with no `as` clause.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: NameOrAttribute::N(Name::new(name)),
            asname: None,
            comma: None,
        }
    }

    /// The local name this alias binds: the alias if present, else the
    /// first dotted segment (for `import a.b`) or the plain name.
    pub fn bound_name(&self) -> String {
        if let Some(asname) = &self.asname {
            return asname.name.value.clone();
        }
        match &self.name {
            NameOrAttribute::N(name) => name.value.clone(),
            NameOrAttribute::A(_) => self
                .dotted_segments()
                .first()
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Flatten the imported path into owned dotted segments.
    pub fn dotted_segments(&self) -> Vec<String> {
        fn collect(expr: &Expression, out: &mut Vec<String>) {
            match expr {
                Expression::Name(name) => out.push(name.value.clone()),
                Expression::Attribute(attr) => {
                    collect(&attr.value, out);
                    out.push(attr.attr.value.clone());
                }
                _ => {}
            }
        }
        let mut out = Vec::new();
        match &self.name {
            NameOrAttribute::N(name) => out.push(name.value.clone()),
            NameOrAttribute::A(attr) => {
                collect(&attr.value, &mut out);
                out.push(attr.attr.value.clone());
            }
        }
        out
    }
}

impl Codegen for ImportAlias {
    fn codegen(&self, state: &mut CodegenState) {
        self.name.codegen(state);
        self.asname.codegen(state);
        self.comma.codegen(state);
    }
}

/// An `import a.b, c as d` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub whitespace_after_import: SimpleWhitespace,
    pub names: Vec<ImportAlias>,
    pub span: Span,
}

impl Spanned for Import {
    fn span(&self) -> Span {
        self.span
    }
}

impl Codegen for Import {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("import");
        self.whitespace_after_import.codegen(state);
        for name in &self.names {
            name.codegen(state);
        }
    }
}

/// The names clause of a from-import.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportNames {
    Aliases(Vec<ImportAlias>),
    Star(ImportStar),
}

impl Codegen for ImportNames {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            ImportNames::Aliases(aliases) => {
                for alias in aliases {
                    alias.codegen(state);
                }
            }
            ImportNames::Star(star) => star.codegen(state),
        }
    }
}

/// A `from module import names` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportFrom {
    pub whitespace_after_from: SimpleWhitespace,
    /// Leading dots of a relative import.
    pub relative: Vec<Dot>,
    pub module: Option<NameOrAttribute>,
    pub whitespace_before_import: SimpleWhitespace,
    pub whitespace_after_import: SimpleWhitespace,
    pub lpar: Option<LeftParen>,
    pub names: ImportNames,
    pub rpar: Option<RightParen>,
    pub span: Span,
}

impl ImportFrom {
    /// Module path segments; empty for purely relative imports.
    pub fn module_segments(&self) -> Vec<String> {
        match &self.module {
            Some(module) => ImportAlias {
                name: module.clone(),
                asname: None,
                comma: None,
            }
            .dotted_segments(),
            None => Vec::new(),
        }
    }

    /// True for `from module import *`.
    pub fn is_star(&self) -> bool {
        matches!(self.names, ImportNames::Star(_))
    }

    /// True when the import path has no leading dots.
    pub fn is_absolute(&self) -> bool {
        self.relative.is_empty()
    }
}

impl Spanned for ImportFrom {
    fn span(&self) -> Span {
        self.span
    }
}

impl Codegen for ImportFrom {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("from");
        self.whitespace_after_from.codegen(state);
        for dot in &self.relative {
            dot.codegen(state);
        }
        self.module.codegen(state);
        self.whitespace_before_import.codegen(state);
        state.add("import");
        self.whitespace_after_import.codegen(state);
        self.lpar.codegen(state);
        self.names.codegen(state);
        self.rpar.codegen(state);
    }
}

/// A `raise` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Raise {
    pub whitespace_after_raise: SimpleWhitespace,
    pub value: Option<Expression>,
    pub cause: Option<RaiseFrom>,
}

/// The `from cause` clause of a raise.
#[derive(Debug, Clone, PartialEq)]
pub struct RaiseFrom {
    pub whitespace_before_from: SimpleWhitespace,
    pub whitespace_after_from: SimpleWhitespace,
    pub expression: Expression,
}

impl Codegen for Raise {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("raise");
        self.whitespace_after_raise.codegen(state);
        self.value.codegen(state);
        if let Some(cause) = &self.cause {
            cause.whitespace_before_from.codegen(state);
            state.add("from");
            cause.whitespace_after_from.codegen(state);
            cause.expression.codegen(state);
        }
    }
}

/// An `assert` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Assert {
    pub whitespace_after_assert: SimpleWhitespace,
    pub test: Expression,
    pub msg: Option<(Comma, Expression)>,
}

impl Codegen for Assert {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("assert");
        self.whitespace_after_assert.codegen(state);
        self.test.codegen(state);
        if let Some((comma, msg)) = &self.msg {
            comma.codegen(state);
            msg.codegen(state);
        }
    }
}

/// One name of a `global`/`nonlocal` list.
#[derive(Debug, Clone, PartialEq)]
pub struct NameItem {
    pub name: Name,
    pub comma: Option<Comma>,
}

impl Codegen for NameItem {
    fn codegen(&self, state: &mut CodegenState) {
        self.name.codegen(state);
        self.comma.codegen(state);
    }
}

/// A `global` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Global {
    pub whitespace_after_global: SimpleWhitespace,
    pub names: Vec<NameItem>,
}

impl Codegen for Global {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("global");
        self.whitespace_after_global.codegen(state);
        for name in &self.names {
            name.codegen(state);
        }
    }
}

/// A `nonlocal` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Nonlocal {
    pub whitespace_after_nonlocal: SimpleWhitespace,
    pub names: Vec<NameItem>,
}

impl Codegen for Nonlocal {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("nonlocal");
        self.whitespace_after_nonlocal.codegen(state);
        for name in &self.names {
            name.codegen(state);
        }
    }
}

/// A `del` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Del {
    pub whitespace_after_del: SimpleWhitespace,
    pub target: Expression,
}

impl Codegen for Del {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("del");
        self.whitespace_after_del.codegen(state);
        self.target.codegen(state);
    }
}

/// A decorator line.
#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    pub leading_lines: Vec<EmptyLine>,
    pub whitespace_after_at: SimpleWhitespace,
    pub decorator: Expression,
    pub trailing: TrailingWhitespace,
}

impl Codegen for Decorator {
    fn codegen(&self, state: &mut CodegenState) {
        for line in &self.leading_lines {
            line.codegen(state);
        }
        state.add_indent();
        state.add("@");
        self.whitespace_after_at.codegen(state);
        self.decorator.codegen(state);
        self.trailing.codegen(state);
    }
}

/// The `-> annotation` clause of a function signature.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnAnnotation {
    pub whitespace_before_arrow: SimpleWhitespace,
    pub whitespace_after_arrow: SimpleWhitespace,
    pub annotation: Expression,
}

impl Codegen for ReturnAnnotation {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace_before_arrow.codegen(state);
        state.add("->");
        self.whitespace_after_arrow.codegen(state);
        self.annotation.codegen(state);
    }
}

/// The body of a compound statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Suite {
    IndentedBlock(IndentedBlock),
    Simple(SimpleStatementSuite),
}

impl Codegen for Suite {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Suite::IndentedBlock(block) => block.codegen(state),
            Suite::Simple(suite) => suite.codegen(state),
        }
    }
}

/// An indented block following a colon.
///
/// `indent` is the increment relative to the enclosing block.
#[derive(Debug, Clone, PartialEq)]
pub struct IndentedBlock {
    /// End of the header line, including any comment after the colon.
    pub trailing: TrailingWhitespace,
    pub indent: String,
    pub body: Vec<Statement>,
}

impl IndentedBlock {
    /// A synthesized block with canonical indentation.
    pub fn new(body: Vec<Statement>) -> Self {
        Self {
            trailing: TrailingWhitespace::default(),
            indent: DEFAULT_INDENT.to_owned(),
            body,
        }
    }
}

impl Codegen for IndentedBlock {
    fn codegen(&self, state: &mut CodegenState) {
        self.trailing.codegen(state);
        state.push_indent(&self.indent);
        for statement in &self.body {
            statement.codegen(state);
        }
        state.pop_indent();
    }
}

/// Small statements on the same line as the colon.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleStatementSuite {
    pub leading_whitespace: SimpleWhitespace,
    pub body: Vec<SmallStatement>,
    pub semicolons: Vec<Semicolon>,
    pub trailing: TrailingWhitespace,
}

impl Codegen for SimpleStatementSuite {
    fn codegen(&self, state: &mut CodegenState) {
        self.leading_whitespace.codegen(state);
        for (idx, small) in self.body.iter().enumerate() {
            small.codegen(state);
            match self.semicolons.get(idx) {
                Some(semicolon) => semicolon.codegen(state),
                None => {
                    if idx + 1 < self.body.len() {
                        Semicolon::default().codegen(state);
                    }
                }
            }
        }
        self.trailing.codegen(state);
    }
}

/// A function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub leading_lines: Vec<EmptyLine>,
    pub decorators: Vec<Decorator>,
    /// Trivia between the last decorator and the `def` line.
    pub lines_after_decorators: Vec<EmptyLine>,
    pub asynchronous: Option<Asynchronous>,
    pub whitespace_after_def: SimpleWhitespace,
    pub name: Name,
    pub whitespace_after_name: SimpleWhitespace,
    pub lpar: LeftParen,
    pub params: Parameters,
    pub rpar: RightParen,
    pub returns: Option<ReturnAnnotation>,
    pub whitespace_before_colon: SimpleWhitespace,
    pub body: Suite,
    pub span: Span,
}

impl Spanned for FunctionDef {
    fn span(&self) -> Span {
        self.span
    }
}

impl Codegen for FunctionDef {
    fn codegen(&self, state: &mut CodegenState) {
        for line in &self.leading_lines {
            line.codegen(state);
        }
        for decorator in &self.decorators {
            decorator.codegen(state);
        }
        for line in &self.lines_after_decorators {
            line.codegen(state);
        }
        state.add_indent();
        self.asynchronous.codegen(state);
        state.add("def");
        self.whitespace_after_def.codegen(state);
        self.name.codegen(state);
        self.whitespace_after_name.codegen(state);
        self.lpar.codegen(state);
        self.params.codegen(state);
        self.rpar.codegen(state);
        self.returns.codegen(state);
        self.whitespace_before_colon.codegen(state);
        state.add(":");
        self.body.codegen(state);
    }
}

/// The parenthesized argument list of a class definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassArgs {
    pub lpar: LeftParen,
    pub args: Vec<Arg>,
    pub rpar: RightParen,
}

impl Codegen for ClassArgs {
    fn codegen(&self, state: &mut CodegenState) {
        self.lpar.codegen(state);
        for arg in &self.args {
            arg.codegen(state);
        }
        self.rpar.codegen(state);
    }
}

/// A class definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub leading_lines: Vec<EmptyLine>,
    pub decorators: Vec<Decorator>,
    /// Trivia between the last decorator and the `class` line.
    pub lines_after_decorators: Vec<EmptyLine>,
    pub whitespace_after_class: SimpleWhitespace,
    pub name: Name,
    pub whitespace_after_name: SimpleWhitespace,
    pub args: Option<ClassArgs>,
    pub whitespace_before_colon: SimpleWhitespace,
    pub body: Suite,
    pub span: Span,
}

impl Spanned for ClassDef {
    fn span(&self) -> Span {
        self.span
    }
}

impl Codegen for ClassDef {
    fn codegen(&self, state: &mut CodegenState) {
        for line in &self.leading_lines {
            line.codegen(state);
        }
        for decorator in &self.decorators {
            decorator.codegen(state);
        }
        for line in &self.lines_after_decorators {
            line.codegen(state);
        }
        state.add_indent();
        state.add("class");
        self.whitespace_after_class.codegen(state);
        self.name.codegen(state);
        self.whitespace_after_name.codegen(state);
        self.args.codegen(state);
        self.whitespace_before_colon.codegen(state);
        state.add(":");
        self.body.codegen(state);
    }
}

/// An `if`/`elif`/`else` chain. `elif` arms are nested `If`s in `orelse`.
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub leading_lines: Vec<EmptyLine>,
    pub whitespace_before_test: SimpleWhitespace,
    pub test: Expression,
    pub whitespace_after_test: SimpleWhitespace,
    pub body: Suite,
    pub orelse: Option<Box<OrElse>>,
    pub span: Span,
}

impl If {
    fn codegen_with_keyword(&self, state: &mut CodegenState, keyword: &str) {
        for line in &self.leading_lines {
            line.codegen(state);
        }
        state.add_indent();
        state.add(keyword);
        self.whitespace_before_test.codegen(state);
        self.test.codegen(state);
        self.whitespace_after_test.codegen(state);
        state.add(":");
        self.body.codegen(state);
        if let Some(orelse) = &self.orelse {
            orelse.codegen(state);
        }
    }
}

impl Codegen for If {
    fn codegen(&self, state: &mut CodegenState) {
        self.codegen_with_keyword(state, "if");
    }
}

/// The continuation of an `if`: an `elif` arm or an `else` block.
#[derive(Debug, Clone, PartialEq)]
pub enum OrElse {
    Elif(If),
    Else(Else),
}

impl Codegen for OrElse {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            OrElse::Elif(elif) => elif.codegen_with_keyword(state, "elif"),
            OrElse::Else(els) => els.codegen(state),
        }
    }
}

/// An `else` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Else {
    pub leading_lines: Vec<EmptyLine>,
    pub whitespace_before_colon: SimpleWhitespace,
    pub body: Suite,
}

impl Codegen for Else {
    fn codegen(&self, state: &mut CodegenState) {
        for line in &self.leading_lines {
            line.codegen(state);
        }
        state.add_indent();
        state.add("else");
        self.whitespace_before_colon.codegen(state);
        state.add(":");
        self.body.codegen(state);
    }
}

/// A `while` loop.
#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub leading_lines: Vec<EmptyLine>,
    pub whitespace_after_while: SimpleWhitespace,
    pub test: Expression,
    pub whitespace_before_colon: SimpleWhitespace,
    pub body: Suite,
    pub orelse: Option<Else>,
    pub span: Span,
}

impl Codegen for While {
    fn codegen(&self, state: &mut CodegenState) {
        for line in &self.leading_lines {
            line.codegen(state);
        }
        state.add_indent();
        state.add("while");
        self.whitespace_after_while.codegen(state);
        self.test.codegen(state);
        self.whitespace_before_colon.codegen(state);
        state.add(":");
        self.body.codegen(state);
        self.orelse.codegen(state);
    }
}

/// A `for` loop.
#[derive(Debug, Clone, PartialEq)]
pub struct For {
    pub leading_lines: Vec<EmptyLine>,
    pub asynchronous: Option<Asynchronous>,
    pub whitespace_after_for: SimpleWhitespace,
    pub target: Expression,
    pub whitespace_before_in: SimpleWhitespace,
    pub whitespace_after_in: SimpleWhitespace,
    pub iter: Expression,
    pub whitespace_before_colon: SimpleWhitespace,
    pub body: Suite,
    pub orelse: Option<Else>,
    pub span: Span,
}

impl Codegen for For {
    fn codegen(&self, state: &mut CodegenState) {
        for line in &self.leading_lines {
            line.codegen(state);
        }
        state.add_indent();
        self.asynchronous.codegen(state);
        state.add("for");
        self.whitespace_after_for.codegen(state);
        self.target.codegen(state);
        self.whitespace_before_in.codegen(state);
        state.add("in");
        self.whitespace_after_in.codegen(state);
        self.iter.codegen(state);
        self.whitespace_before_colon.codegen(state);
        state.add(":");
        self.body.codegen(state);
        self.orelse.codegen(state);
    }
}

/// One `except` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ExceptHandler {
    pub leading_lines: Vec<EmptyLine>,
    pub whitespace_after_except: SimpleWhitespace,
    pub kind: Option<Expression>,
    pub name: Option<AsName>,
    pub whitespace_before_colon: SimpleWhitespace,
    pub body: Suite,
}

impl Codegen for ExceptHandler {
    fn codegen(&self, state: &mut CodegenState) {
        for line in &self.leading_lines {
            line.codegen(state);
        }
        state.add_indent();
        state.add("except");
        self.whitespace_after_except.codegen(state);
        self.kind.codegen(state);
        self.name.codegen(state);
        self.whitespace_before_colon.codegen(state);
        state.add(":");
        self.body.codegen(state);
    }
}

/// A `finally` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Finally {
    pub leading_lines: Vec<EmptyLine>,
    pub whitespace_before_colon: SimpleWhitespace,
    pub body: Suite,
}

impl Codegen for Finally {
    fn codegen(&self, state: &mut CodegenState) {
        for line in &self.leading_lines {
            line.codegen(state);
        }
        state.add_indent();
        state.add("finally");
        self.whitespace_before_colon.codegen(state);
        state.add(":");
        self.body.codegen(state);
    }
}

/// A `try` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Try {
    pub leading_lines: Vec<EmptyLine>,
    pub whitespace_before_colon: SimpleWhitespace,
    pub body: Suite,
    pub handlers: Vec<ExceptHandler>,
    pub orelse: Option<Else>,
    pub finalbody: Option<Finally>,
    pub span: Span,
}

impl Codegen for Try {
    fn codegen(&self, state: &mut CodegenState) {
        for line in &self.leading_lines {
            line.codegen(state);
        }
        state.add_indent();
        state.add("try");
        self.whitespace_before_colon.codegen(state);
        state.add(":");
        self.body.codegen(state);
        for handler in &self.handlers {
            handler.codegen(state);
        }
        self.orelse.codegen(state);
        self.finalbody.codegen(state);
    }
}

/// One `item [as name]` of a with statement.
#[derive(Debug, Clone, PartialEq)]
pub struct WithItem {
    pub item: Expression,
    pub asname: Option<AsName>,
    pub comma: Option<Comma>,
}

impl Codegen for WithItem {
    fn codegen(&self, state: &mut CodegenState) {
        self.item.codegen(state);
        self.asname.codegen(state);
        self.comma.codegen(state);
    }
}

/// A `with` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct With {
    pub leading_lines: Vec<EmptyLine>,
    pub asynchronous: Option<Asynchronous>,
    pub whitespace_after_with: SimpleWhitespace,
    pub items: Vec<WithItem>,
    pub whitespace_before_colon: SimpleWhitespace,
    pub body: Suite,
    pub span: Span,
}

impl Codegen for With {
    fn codegen(&self, state: &mut CodegenState) {
        for line in &self.leading_lines {
            line.codegen(state);
        }
        state.add_indent();
        self.asynchronous.codegen(state);
        state.add("with");
        self.whitespace_after_with.codegen(state);
        for item in &self.items {
            item.codegen(state);
        }
        self.whitespace_before_colon.codegen(state);
        state.add(":");
        self.body.codegen(state);
    }
}
