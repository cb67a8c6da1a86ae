// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Punctuation and operator nodes.

use crate::codegen::{Codegen, CodegenState};
use crate::nodes::whitespace::ParenthesizableWhitespace;

/// A comma separator with its surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comma {
    pub whitespace_before: ParenthesizableWhitespace,
    pub whitespace_after: ParenthesizableWhitespace,
}

impl Default for Comma {
    fn default() -> Self {
        Self {
            whitespace_before: ParenthesizableWhitespace::default(),
            whitespace_after: ParenthesizableWhitespace::one(),
        }
    }
}

impl Codegen for Comma {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace_before.codegen(state);
        state.add(",");
        self.whitespace_after.codegen(state);
    }
}

/// A semicolon separating small statements on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Semicolon {
    pub whitespace_before: ParenthesizableWhitespace,
    pub whitespace_after: ParenthesizableWhitespace,
}

impl Default for Semicolon {
    fn default() -> Self {
        Self {
            whitespace_before: ParenthesizableWhitespace::default(),
            whitespace_after: ParenthesizableWhitespace::one(),
        }
    }
}

impl Codegen for Semicolon {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace_before.codegen(state);
        state.add(";");
        self.whitespace_after.codegen(state);
    }
}

/// The dot of an attribute access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dot {
    pub whitespace_before: ParenthesizableWhitespace,
    pub whitespace_after: ParenthesizableWhitespace,
}

impl Codegen for Dot {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace_before.codegen(state);
        state.add(".");
        self.whitespace_after.codegen(state);
    }
}

/// A colon token (annotations, slices, lambda bodies, dict entries).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Colon {
    pub whitespace_before: ParenthesizableWhitespace,
    pub whitespace_after: ParenthesizableWhitespace,
}

impl Colon {
    /// Canonical `: ` spacing for synthesized annotations and dict entries.
    pub fn space_after() -> Self {
        Self {
            whitespace_before: ParenthesizableWhitespace::default(),
            whitespace_after: ParenthesizableWhitespace::one(),
        }
    }
}

impl Codegen for Colon {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace_before.codegen(state);
        state.add(":");
        self.whitespace_after.codegen(state);
    }
}

/// The `=` of an assignment target or keyword argument default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignEqual {
    pub whitespace_before: ParenthesizableWhitespace,
    pub whitespace_after: ParenthesizableWhitespace,
}

impl Default for AssignEqual {
    fn default() -> Self {
        Self {
            whitespace_before: ParenthesizableWhitespace::one(),
            whitespace_after: ParenthesizableWhitespace::one(),
        }
    }
}

impl AssignEqual {
    /// The tight `=` used between keyword arguments and defaults.
    pub fn tight() -> Self {
        Self {
            whitespace_before: ParenthesizableWhitespace::default(),
            whitespace_after: ParenthesizableWhitespace::default(),
        }
    }
}

impl Codegen for AssignEqual {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace_before.codegen(state);
        state.add("=");
        self.whitespace_after.codegen(state);
    }
}

/// An opening parenthesis with the whitespace that follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeftParen {
    pub whitespace_after: ParenthesizableWhitespace,
}

impl Codegen for LeftParen {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("(");
        self.whitespace_after.codegen(state);
    }
}

/// A closing parenthesis with the whitespace that precedes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RightParen {
    pub whitespace_before: ParenthesizableWhitespace,
}

impl Codegen for RightParen {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace_before.codegen(state);
        state.add(")");
    }
}

/// An opening square bracket with the whitespace that follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeftSquareBracket {
    pub whitespace_after: ParenthesizableWhitespace,
}

impl Codegen for LeftSquareBracket {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("[");
        self.whitespace_after.codegen(state);
    }
}

/// A closing square bracket with the whitespace that precedes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RightSquareBracket {
    pub whitespace_before: ParenthesizableWhitespace,
}

impl Codegen for RightSquareBracket {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace_before.codegen(state);
        state.add("]");
    }
}

/// An opening curly brace with the whitespace that follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeftCurlyBrace {
    pub whitespace_after: ParenthesizableWhitespace,
}

impl Codegen for LeftCurlyBrace {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("{");
        self.whitespace_after.codegen(state);
    }
}

/// A closing curly brace with the whitespace that precedes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RightCurlyBrace {
    pub whitespace_before: ParenthesizableWhitespace,
}

impl Codegen for RightCurlyBrace {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace_before.codegen(state);
        state.add("}");
    }
}

/// The `*` of a star import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStar;

impl Codegen for ImportStar {
    fn codegen(&self, state: &mut CodegenState) {
        state.add("*");
    }
}

/// Binary arithmetic and bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOpKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    FloorDivide,
    Modulo,
    Power,
    MatrixMultiply,
    LeftShift,
    RightShift,
    BitOr,
    BitAnd,
    BitXor,
}

impl BinaryOpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOpKind::Add => "+",
            BinaryOpKind::Subtract => "-",
            BinaryOpKind::Multiply => "*",
            BinaryOpKind::Divide => "/",
            BinaryOpKind::FloorDivide => "//",
            BinaryOpKind::Modulo => "%",
            BinaryOpKind::Power => "**",
            BinaryOpKind::MatrixMultiply => "@",
            BinaryOpKind::LeftShift => "<<",
            BinaryOpKind::RightShift => ">>",
            BinaryOpKind::BitOr => "|",
            BinaryOpKind::BitAnd => "&",
            BinaryOpKind::BitXor => "^",
        }
    }
}

/// A binary operator token with surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryOp {
    pub kind: BinaryOpKind,
    pub whitespace_before: ParenthesizableWhitespace,
    pub whitespace_after: ParenthesizableWhitespace,
}

impl Codegen for BinaryOp {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace_before.codegen(state);
        state.add(self.kind.as_str());
        self.whitespace_after.codegen(state);
    }
}

/// Boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BooleanOpKind {
    And,
    Or,
}

impl BooleanOpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BooleanOpKind::And => "and",
            BooleanOpKind::Or => "or",
        }
    }
}

/// A boolean operator token with surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanOp {
    pub kind: BooleanOpKind,
    pub whitespace_before: ParenthesizableWhitespace,
    pub whitespace_after: ParenthesizableWhitespace,
}

impl Codegen for BooleanOp {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace_before.codegen(state);
        state.add(self.kind.as_str());
        self.whitespace_after.codegen(state);
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOpKind {
    Plus,
    Minus,
    BitInvert,
    Not,
}

impl UnaryOpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOpKind::Plus => "+",
            UnaryOpKind::Minus => "-",
            UnaryOpKind::BitInvert => "~",
            UnaryOpKind::Not => "not",
        }
    }
}

/// A unary operator token with the whitespace that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryOp {
    pub kind: UnaryOpKind,
    pub whitespace_after: ParenthesizableWhitespace,
}

impl Codegen for UnaryOp {
    fn codegen(&self, state: &mut CodegenState) {
        state.add(self.kind.as_str());
        self.whitespace_after.codegen(state);
    }
}

/// Comparison operators. Two-word operators keep the whitespace between
/// their words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompOpKind {
    LessThan,
    GreaterThan,
    LessThanEqual,
    GreaterThanEqual,
    Equal,
    NotEqual,
    In,
    NotIn { whitespace_between: ParenthesizableWhitespace },
    Is,
    IsNot { whitespace_between: ParenthesizableWhitespace },
}

/// A comparison operator token with surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompOp {
    pub kind: CompOpKind,
    pub whitespace_before: ParenthesizableWhitespace,
    pub whitespace_after: ParenthesizableWhitespace,
}

impl Codegen for CompOp {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace_before.codegen(state);
        match &self.kind {
            CompOpKind::LessThan => state.add("<"),
            CompOpKind::GreaterThan => state.add(">"),
            CompOpKind::LessThanEqual => state.add("<="),
            CompOpKind::GreaterThanEqual => state.add(">="),
            CompOpKind::Equal => state.add("=="),
            CompOpKind::NotEqual => state.add("!="),
            CompOpKind::In => state.add("in"),
            CompOpKind::NotIn { whitespace_between } => {
                state.add("not");
                whitespace_between.codegen(state);
                state.add("in");
            }
            CompOpKind::Is => state.add("is"),
            CompOpKind::IsNot { whitespace_between } => {
                state.add("is");
                whitespace_between.codegen(state);
                state.add("not");
            }
        }
        self.whitespace_after.codegen(state);
    }
}

/// An augmented-assignment operator (`+=`, `|=`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugOp {
    /// The operator text without the trailing `=`.
    pub kind: BinaryOpKind,
    pub whitespace_before: ParenthesizableWhitespace,
    pub whitespace_after: ParenthesizableWhitespace,
}

impl Codegen for AugOp {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace_before.codegen(state);
        state.add(self.kind.as_str());
        state.add("=");
        self.whitespace_after.codegen(state);
    }
}
