// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression nodes.
//!
//! Grouping parentheses are modeled as an explicit [`Expression::Parenthesized`]
//! wrapper rather than `lpar`/`rpar` vectors on every node; the parser wraps
//! on demand and codegen unwraps nothing, so round-trips are exact.
//!
//! Formatted-string interiors are kept as raw text and are opaque to scope
//! analysis.

use crate::codegen::{Codegen, CodegenState};
use crate::nodes::op::{
    AssignEqual, BinaryOp, BooleanOp, Colon, Comma, CompOp, Dot, LeftCurlyBrace, LeftParen,
    LeftSquareBracket, RightCurlyBrace, RightParen, RightSquareBracket, UnaryOp,
};
use crate::nodes::traits::{Span, Spanned};
use crate::nodes::whitespace::ParenthesizableWhitespace;

/// Any Python expression in the supported subset.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Name(Name),
    Attribute(Box<Attribute>),
    Call(Box<Call>),
    Subscript(Box<Subscript>),
    Parenthesized(Box<Parenthesized>),
    BinaryOperation(Box<BinaryOperation>),
    BooleanOperation(Box<BooleanOperation>),
    UnaryOperation(Box<UnaryOperation>),
    Comparison(Box<Comparison>),
    IfExp(Box<IfExp>),
    Lambda(Box<Lambda>),
    NamedExpr(Box<NamedExpr>),
    Await(Box<Await>),
    Yield(Box<Yield>),
    Starred(Box<Starred>),
    Tuple(Tuple),
    List(List),
    Set(SetExp),
    Dict(Dict),
    ListComp(Box<ListComp>),
    SetComp(Box<SetComp>),
    DictComp(Box<DictComp>),
    GeneratorExp(Box<GeneratorExp>),
    SimpleString(SimpleString),
    ConcatenatedString(ConcatenatedString),
    FormattedString(FormattedString),
    Integer(Integer),
    Float(Float),
    Ellipsis(EllipsisLit),
}

impl Expression {
    /// The bare name, if this expression is exactly a [`Name`].
    pub fn as_name(&self) -> Option<&Name> {
        match self {
            Expression::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Strip grouping parentheses.
    pub fn unparenthesized(&self) -> &Expression {
        match self {
            Expression::Parenthesized(inner) => inner.expression.unparenthesized(),
            other => other,
        }
    }
}

impl Codegen for Expression {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Expression::Name(n) => n.codegen(state),
            Expression::Attribute(n) => n.codegen(state),
            Expression::Call(n) => n.codegen(state),
            Expression::Subscript(n) => n.codegen(state),
            Expression::Parenthesized(n) => n.codegen(state),
            Expression::BinaryOperation(n) => n.codegen(state),
            Expression::BooleanOperation(n) => n.codegen(state),
            Expression::UnaryOperation(n) => n.codegen(state),
            Expression::Comparison(n) => n.codegen(state),
            Expression::IfExp(n) => n.codegen(state),
            Expression::Lambda(n) => n.codegen(state),
            Expression::NamedExpr(n) => n.codegen(state),
            Expression::Await(n) => n.codegen(state),
            Expression::Yield(n) => n.codegen(state),
            Expression::Starred(n) => n.codegen(state),
            Expression::Tuple(n) => n.codegen(state),
            Expression::List(n) => n.codegen(state),
            Expression::Set(n) => n.codegen(state),
            Expression::Dict(n) => n.codegen(state),
            Expression::ListComp(n) => n.codegen(state),
            Expression::SetComp(n) => n.codegen(state),
            Expression::DictComp(n) => n.codegen(state),
            Expression::GeneratorExp(n) => n.codegen(state),
            Expression::SimpleString(n) => n.codegen(state),
            Expression::ConcatenatedString(n) => n.codegen(state),
            Expression::FormattedString(n) => n.codegen(state),
            Expression::Integer(n) => n.codegen(state),
            Expression::Float(n) => n.codegen(state),
            Expression::Ellipsis(n) => n.codegen(state),
        }
    }
}

/// An identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub value: String,
    pub span: Span,
}

impl Name {
    /// A synthesized name with canonical (empty) surroundings.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            span: Span::SYNTHETIC,
        }
    }
}

impl Spanned for Name {
    fn span(&self) -> Span {
        self.span
    }
}

impl Codegen for Name {
    fn codegen(&self, state: &mut CodegenState) {
        state.add(&self.value);
    }
}

/// A dotted attribute access `value.attr`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub value: Expression,
    pub dot: Dot,
    pub attr: Name,
    pub span: Span,
}

impl Spanned for Attribute {
    fn span(&self) -> Span {
        self.span
    }
}

impl Codegen for Attribute {
    fn codegen(&self, state: &mut CodegenState) {
        self.value.codegen(state);
        self.dot.codegen(state);
        self.attr.codegen(state);
    }
}

/// A grouping parenthesis pair around an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Parenthesized {
    pub lpar: LeftParen,
    pub expression: Expression,
    pub rpar: RightParen,
}

impl Codegen for Parenthesized {
    fn codegen(&self, state: &mut CodegenState) {
        self.lpar.codegen(state);
        self.expression.codegen(state);
        self.rpar.codegen(state);
    }
}

/// A call `func(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub func: Expression,
    pub whitespace_after_func: ParenthesizableWhitespace,
    pub whitespace_before_args: ParenthesizableWhitespace,
    pub args: Vec<Arg>,
}

impl Codegen for Call {
    fn codegen(&self, state: &mut CodegenState) {
        self.func.codegen(state);
        self.whitespace_after_func.codegen(state);
        state.add("(");
        self.whitespace_before_args.codegen(state);
        for arg in &self.args {
            arg.codegen(state);
        }
        state.add(")");
    }
}

/// A single call argument, positional, keyword, or starred.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    /// `""`, `"*"`, or `"**"`.
    pub star: &'static str,
    pub whitespace_after_star: ParenthesizableWhitespace,
    pub keyword: Option<Name>,
    pub equal: Option<AssignEqual>,
    pub value: Expression,
    pub whitespace_after_arg: ParenthesizableWhitespace,
    pub comma: Option<Comma>,
}

impl Codegen for Arg {
    fn codegen(&self, state: &mut CodegenState) {
        state.add(self.star);
        self.whitespace_after_star.codegen(state);
        if let Some(keyword) = &self.keyword {
            keyword.codegen(state);
            match &self.equal {
                Some(equal) => equal.codegen(state),
                None => state.add("="),
            }
        }
        self.value.codegen(state);
        self.whitespace_after_arg.codegen(state);
        self.comma.codegen(state);
    }
}

/// A subscript `value[slice]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscript {
    pub value: Expression,
    pub whitespace_after_value: ParenthesizableWhitespace,
    pub lbracket: LeftSquareBracket,
    pub slice: Vec<SubscriptElement>,
    pub rbracket: RightSquareBracket,
}

impl Codegen for Subscript {
    fn codegen(&self, state: &mut CodegenState) {
        self.value.codegen(state);
        self.whitespace_after_value.codegen(state);
        self.lbracket.codegen(state);
        for element in &self.slice {
            element.codegen(state);
        }
        self.rbracket.codegen(state);
    }
}

/// One comma-separated element of a subscript.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptElement {
    pub slice: BaseSlice,
    pub comma: Option<Comma>,
}

impl Codegen for SubscriptElement {
    fn codegen(&self, state: &mut CodegenState) {
        self.slice.codegen(state);
        self.comma.codegen(state);
    }
}

/// A plain index or a `lower:upper:step` slice.
#[derive(Debug, Clone, PartialEq)]
pub enum BaseSlice {
    Index(Index),
    Slice(Slice),
}

impl Codegen for BaseSlice {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            BaseSlice::Index(index) => index.codegen(state),
            BaseSlice::Slice(slice) => slice.codegen(state),
        }
    }
}

/// A plain subscript index.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub value: Expression,
}

impl Codegen for Index {
    fn codegen(&self, state: &mut CodegenState) {
        self.value.codegen(state);
    }
}

/// A `lower:upper:step` slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub lower: Option<Expression>,
    pub first_colon: Colon,
    pub upper: Option<Expression>,
    pub second_colon: Option<Colon>,
    pub step: Option<Expression>,
}

impl Codegen for Slice {
    fn codegen(&self, state: &mut CodegenState) {
        self.lower.codegen(state);
        self.first_colon.codegen(state);
        self.upper.codegen(state);
        self.second_colon.codegen(state);
        self.step.codegen(state);
    }
}

/// A binary operation `left op right`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperation {
    pub left: Expression,
    pub op: BinaryOp,
    pub right: Expression,
}

impl Codegen for BinaryOperation {
    fn codegen(&self, state: &mut CodegenState) {
        self.left.codegen(state);
        self.op.codegen(state);
        self.right.codegen(state);
    }
}

/// A boolean operation `left and right` / `left or right`.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanOperation {
    pub left: Expression,
    pub op: BooleanOp,
    pub right: Expression,
}

impl Codegen for BooleanOperation {
    fn codegen(&self, state: &mut CodegenState) {
        self.left.codegen(state);
        self.op.codegen(state);
        self.right.codegen(state);
    }
}

/// A unary operation.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOperation {
    pub op: UnaryOp,
    pub expression: Expression,
}

impl Codegen for UnaryOperation {
    fn codegen(&self, state: &mut CodegenState) {
        self.op.codegen(state);
        self.expression.codegen(state);
    }
}

/// A comparison chain `left op a op b ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Expression,
    pub comparisons: Vec<ComparisonTarget>,
}

impl Codegen for Comparison {
    fn codegen(&self, state: &mut CodegenState) {
        self.left.codegen(state);
        for target in &self.comparisons {
            target.codegen(state);
        }
    }
}

/// One `op comparator` link of a comparison chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTarget {
    pub operator: CompOp,
    pub comparator: Expression,
}

impl Codegen for ComparisonTarget {
    fn codegen(&self, state: &mut CodegenState) {
        self.operator.codegen(state);
        self.comparator.codegen(state);
    }
}

/// A conditional expression `body if test else orelse`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfExp {
    pub body: Expression,
    pub whitespace_before_if: ParenthesizableWhitespace,
    pub whitespace_after_if: ParenthesizableWhitespace,
    pub test: Expression,
    pub whitespace_before_else: ParenthesizableWhitespace,
    pub whitespace_after_else: ParenthesizableWhitespace,
    pub orelse: Expression,
}

impl Codegen for IfExp {
    fn codegen(&self, state: &mut CodegenState) {
        self.body.codegen(state);
        self.whitespace_before_if.codegen(state);
        state.add("if");
        self.whitespace_after_if.codegen(state);
        self.test.codegen(state);
        self.whitespace_before_else.codegen(state);
        state.add("else");
        self.whitespace_after_else.codegen(state);
        self.orelse.codegen(state);
    }
}

/// A lambda expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub whitespace_after_lambda: ParenthesizableWhitespace,
    pub params: Parameters,
    pub colon: Colon,
    pub body: Expression,
}

impl Codegen for Lambda {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("lambda");
        self.whitespace_after_lambda.codegen(state);
        self.params.codegen(state);
        self.colon.codegen(state);
        self.body.codegen(state);
    }
}

/// A walrus assignment `target := value`.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedExpr {
    pub target: Name,
    pub whitespace_before_walrus: ParenthesizableWhitespace,
    pub whitespace_after_walrus: ParenthesizableWhitespace,
    pub value: Expression,
}

impl Codegen for NamedExpr {
    fn codegen(&self, state: &mut CodegenState) {
        self.target.codegen(state);
        self.whitespace_before_walrus.codegen(state);
        state.add(":=");
        self.whitespace_after_walrus.codegen(state);
        self.value.codegen(state);
    }
}

/// An `await` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Await {
    pub whitespace_after_await: ParenthesizableWhitespace,
    pub expression: Expression,
}

impl Codegen for Await {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("await");
        self.whitespace_after_await.codegen(state);
        self.expression.codegen(state);
    }
}

/// A `yield` or `yield from` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Yield {
    pub whitespace_after_yield: ParenthesizableWhitespace,
    pub value: Option<Box<YieldValue>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum YieldValue {
    Value(Expression),
    From {
        whitespace_after_from: ParenthesizableWhitespace,
        expression: Expression,
    },
}

impl Codegen for Yield {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("yield");
        self.whitespace_after_yield.codegen(state);
        if let Some(value) = &self.value {
            match &**value {
                YieldValue::Value(expression) => expression.codegen(state),
                YieldValue::From {
                    whitespace_after_from,
                    expression,
                } => {
                    state.add("from");
                    whitespace_after_from.codegen(state);
                    expression.codegen(state);
                }
            }
        }
    }
}

/// A starred expression `*value` in unpacking position.
#[derive(Debug, Clone, PartialEq)]
pub struct Starred {
    pub whitespace_after_star: ParenthesizableWhitespace,
    pub expression: Expression,
}

impl Codegen for Starred {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("*");
        self.whitespace_after_star.codegen(state);
        self.expression.codegen(state);
    }
}

/// A tuple, with or without its own parentheses.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    pub lpar: Option<LeftParen>,
    pub elements: Vec<Element>,
    pub rpar: Option<RightParen>,
}

impl Codegen for Tuple {
    fn codegen(&self, state: &mut CodegenState) {
        self.lpar.codegen(state);
        for element in &self.elements {
            element.codegen(state);
        }
        self.rpar.codegen(state);
    }
}

/// A list display.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub lbracket: LeftSquareBracket,
    pub elements: Vec<Element>,
    pub rbracket: RightSquareBracket,
}

impl Codegen for List {
    fn codegen(&self, state: &mut CodegenState) {
        self.lbracket.codegen(state);
        for element in &self.elements {
            element.codegen(state);
        }
        self.rbracket.codegen(state);
    }
}

/// A set display.
#[derive(Debug, Clone, PartialEq)]
pub struct SetExp {
    pub lbrace: LeftCurlyBrace,
    pub elements: Vec<Element>,
    pub rbrace: RightCurlyBrace,
}

impl Codegen for SetExp {
    fn codegen(&self, state: &mut CodegenState) {
        self.lbrace.codegen(state);
        for element in &self.elements {
            element.codegen(state);
        }
        self.rbrace.codegen(state);
    }
}

/// A dict display.
#[derive(Debug, Clone, PartialEq)]
pub struct Dict {
    pub lbrace: LeftCurlyBrace,
    pub elements: Vec<DictElement>,
    pub rbrace: RightCurlyBrace,
}

impl Codegen for Dict {
    fn codegen(&self, state: &mut CodegenState) {
        self.lbrace.codegen(state);
        for element in &self.elements {
            element.codegen(state);
        }
        self.rbrace.codegen(state);
    }
}

/// One element of a tuple, list, or set.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub value: Expression,
    pub comma: Option<Comma>,
}

impl Codegen for Element {
    fn codegen(&self, state: &mut CodegenState) {
        self.value.codegen(state);
        self.comma.codegen(state);
    }
}

/// One entry of a dict display.
#[derive(Debug, Clone, PartialEq)]
pub enum DictElement {
    Simple {
        key: Expression,
        colon: Colon,
        value: Expression,
        comma: Option<Comma>,
    },
    Starred {
        whitespace_after_star: ParenthesizableWhitespace,
        value: Expression,
        comma: Option<Comma>,
    },
}

impl Codegen for DictElement {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            DictElement::Simple {
                key,
                colon,
                value,
                comma,
            } => {
                key.codegen(state);
                colon.codegen(state);
                value.codegen(state);
                comma.codegen(state);
            }
            DictElement::Starred {
                whitespace_after_star,
                value,
                comma,
            } => {
                state.add("**");
                whitespace_after_star.codegen(state);
                value.codegen(state);
                comma.codegen(state);
            }
        }
    }
}

/// A list comprehension.
#[derive(Debug, Clone, PartialEq)]
pub struct ListComp {
    pub lbracket: LeftSquareBracket,
    pub elt: Expression,
    pub for_in: CompFor,
    pub rbracket: RightSquareBracket,
}

impl Codegen for ListComp {
    fn codegen(&self, state: &mut CodegenState) {
        self.lbracket.codegen(state);
        self.elt.codegen(state);
        self.for_in.codegen(state);
        self.rbracket.codegen(state);
    }
}

/// A set comprehension.
#[derive(Debug, Clone, PartialEq)]
pub struct SetComp {
    pub lbrace: LeftCurlyBrace,
    pub elt: Expression,
    pub for_in: CompFor,
    pub rbrace: RightCurlyBrace,
}

impl Codegen for SetComp {
    fn codegen(&self, state: &mut CodegenState) {
        self.lbrace.codegen(state);
        self.elt.codegen(state);
        self.for_in.codegen(state);
        self.rbrace.codegen(state);
    }
}

/// A dict comprehension.
#[derive(Debug, Clone, PartialEq)]
pub struct DictComp {
    pub lbrace: LeftCurlyBrace,
    pub key: Expression,
    pub colon: Colon,
    pub value: Expression,
    pub for_in: CompFor,
    pub rbrace: RightCurlyBrace,
}

impl Codegen for DictComp {
    fn codegen(&self, state: &mut CodegenState) {
        self.lbrace.codegen(state);
        self.key.codegen(state);
        self.colon.codegen(state);
        self.value.codegen(state);
        self.for_in.codegen(state);
        self.rbrace.codegen(state);
    }
}

/// A generator expression; parens absent when it is a sole call argument.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorExp {
    pub lpar: Option<LeftParen>,
    pub elt: Expression,
    pub for_in: CompFor,
    pub rpar: Option<RightParen>,
}

impl Codegen for GeneratorExp {
    fn codegen(&self, state: &mut CodegenState) {
        self.lpar.codegen(state);
        self.elt.codegen(state);
        self.for_in.codegen(state);
        self.rpar.codegen(state);
    }
}

/// The `async` keyword with its trailing whitespace.
#[derive(Debug, Clone, PartialEq)]
pub struct Asynchronous {
    pub whitespace_after: ParenthesizableWhitespace,
}

impl Codegen for Asynchronous {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("async");
        self.whitespace_after.codegen(state);
    }
}

/// The `for target in iter` clause of a comprehension.
#[derive(Debug, Clone, PartialEq)]
pub struct CompFor {
    pub whitespace_before: ParenthesizableWhitespace,
    pub asynchronous: Option<Asynchronous>,
    pub whitespace_after_for: ParenthesizableWhitespace,
    pub target: Expression,
    pub whitespace_before_in: ParenthesizableWhitespace,
    pub whitespace_after_in: ParenthesizableWhitespace,
    pub iter: Expression,
    pub ifs: Vec<CompIf>,
    pub inner_for_in: Option<Box<CompFor>>,
}

impl Codegen for CompFor {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace_before.codegen(state);
        self.asynchronous.codegen(state);
        state.add("for");
        self.whitespace_after_for.codegen(state);
        self.target.codegen(state);
        self.whitespace_before_in.codegen(state);
        state.add("in");
        self.whitespace_after_in.codegen(state);
        self.iter.codegen(state);
        for if_clause in &self.ifs {
            if_clause.codegen(state);
        }
        self.inner_for_in.codegen(state);
    }
}

/// An `if test` clause of a comprehension.
#[derive(Debug, Clone, PartialEq)]
pub struct CompIf {
    pub whitespace_before: ParenthesizableWhitespace,
    pub whitespace_before_test: ParenthesizableWhitespace,
    pub test: Expression,
}

impl Codegen for CompIf {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace_before.codegen(state);
        state.add("if");
        self.whitespace_before_test.codegen(state);
        self.test.codegen(state);
    }
}

/// A string literal, stored raw (prefix and quotes included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleString {
    pub value: String,
    pub span: Span,
}

impl SimpleString {
    /// The string's static value, or `None` for bytes literals and
    /// literals whose value cannot be recovered from the raw text.
    pub fn evaluated_value(&self) -> Option<String> {
        let mut prefix_len = 0;
        let mut raw = false;
        for ch in self.value.chars() {
            match ch {
                'r' | 'R' => {
                    raw = true;
                    prefix_len += 1;
                }
                'u' | 'U' => prefix_len += 1,
                'b' | 'B' | 'f' | 'F' => return None,
                _ => break,
            }
        }
        let rest = &self.value[prefix_len..];
        let body = if let Some(stripped) = rest
            .strip_prefix("\"\"\"")
            .and_then(|s| s.strip_suffix("\"\"\""))
        {
            stripped
        } else if let Some(stripped) =
            rest.strip_prefix("'''").and_then(|s| s.strip_suffix("'''"))
        {
            stripped
        } else if let Some(stripped) =
            rest.strip_prefix('"').and_then(|s| s.strip_suffix('"'))
        {
            stripped
        } else if let Some(stripped) =
            rest.strip_prefix('\'').and_then(|s| s.strip_suffix('\''))
        {
            stripped
        } else {
            return None;
        };
        if raw {
            return Some(body.to_owned());
        }
        Some(unescape(body))
    }
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

impl Spanned for SimpleString {
    fn span(&self) -> Span {
        self.span
    }
}

impl Codegen for SimpleString {
    fn codegen(&self, state: &mut CodegenState) {
        state.add(&self.value);
    }
}

/// One atom of an implicitly concatenated string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringAtom {
    Simple(SimpleString),
    Formatted(FormattedString),
}

impl StringAtom {
    pub fn evaluated_value(&self) -> Option<String> {
        match self {
            StringAtom::Simple(s) => s.evaluated_value(),
            StringAtom::Formatted(_) => None,
        }
    }
}

impl Codegen for StringAtom {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            StringAtom::Simple(s) => s.codegen(state),
            StringAtom::Formatted(s) => s.codegen(state),
        }
    }
}

/// Adjacent string literals joined by implicit concatenation.
///
/// `separators.len() == parts.len() - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatenatedString {
    pub parts: Vec<StringAtom>,
    pub separators: Vec<ParenthesizableWhitespace>,
}

impl ConcatenatedString {
    /// The static value of the whole concatenation, or `None` when any
    /// part is not statically evaluable.
    pub fn evaluated_value(&self) -> Option<String> {
        let mut out = String::new();
        for part in &self.parts {
            out.push_str(&part.evaluated_value()?);
        }
        Some(out)
    }
}

impl Codegen for ConcatenatedString {
    fn codegen(&self, state: &mut CodegenState) {
        for (idx, part) in self.parts.iter().enumerate() {
            part.codegen(state);
            if let Some(sep) = self.separators.get(idx) {
                sep.codegen(state);
            }
        }
    }
}

/// An f-string, stored raw; its interior is opaque to analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedString {
    pub value: String,
    pub span: Span,
}

impl Codegen for FormattedString {
    fn codegen(&self, state: &mut CodegenState) {
        state.add(&self.value);
    }
}

/// An integer literal, stored raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Integer {
    pub value: String,
}

impl Codegen for Integer {
    fn codegen(&self, state: &mut CodegenState) {
        state.add(&self.value);
    }
}

/// A float or imaginary literal, stored raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Float {
    pub value: String,
}

impl Codegen for Float {
    fn codegen(&self, state: &mut CodegenState) {
        state.add(&self.value);
    }
}

/// The `...` literal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EllipsisLit;

impl Codegen for EllipsisLit {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("...");
    }
}

/// The parameter list of a function or lambda (without parentheses).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    pub items: Vec<ParamItem>,
}

impl Parameters {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate the named parameters, skipping `*` and `/` markers.
    pub fn params(&self) -> impl Iterator<Item = &Param> {
        self.items.iter().filter_map(|item| match item {
            ParamItem::Param(param) => Some(param),
            _ => None,
        })
    }
}

impl Codegen for Parameters {
    fn codegen(&self, state: &mut CodegenState) {
        for item in &self.items {
            item.codegen(state);
        }
    }
}

/// One entry of a parameter list.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamItem {
    Param(Param),
    /// A bare `*` keyword-only marker.
    Star(ParamStar),
    /// A `/` positional-only marker.
    Slash(ParamSlash),
}

impl Codegen for ParamItem {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            ParamItem::Param(param) => param.codegen(state),
            ParamItem::Star(star) => star.codegen(state),
            ParamItem::Slash(slash) => slash.codegen(state),
        }
    }
}

/// A named parameter, possibly starred, annotated, or defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// `""`, `"*"`, or `"**"`.
    pub star: &'static str,
    pub whitespace_after_star: ParenthesizableWhitespace,
    pub name: Name,
    pub annotation: Option<Annotation>,
    pub equal: Option<AssignEqual>,
    pub default: Option<Expression>,
    pub comma: Option<Comma>,
}

impl Codegen for Param {
    fn codegen(&self, state: &mut CodegenState) {
        state.add(self.star);
        self.whitespace_after_star.codegen(state);
        self.name.codegen(state);
        self.annotation.codegen(state);
        self.equal.codegen(state);
        self.default.codegen(state);
        self.comma.codegen(state);
    }
}

/// A bare `*` in a parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamStar {
    pub comma: Option<Comma>,
}

impl Codegen for ParamStar {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("*");
        self.comma.codegen(state);
    }
}

/// A `/` in a parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSlash {
    pub comma: Option<Comma>,
}

impl Codegen for ParamSlash {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("/");
        self.comma.codegen(state);
    }
}

/// A `: annotation` clause on a parameter or assignment target.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub colon: Colon,
    pub annotation: Expression,
}

impl Codegen for Annotation {
    fn codegen(&self, state: &mut CodegenState) {
        self.colon.codegen(state);
        self.annotation.codegen(state);
    }
}
