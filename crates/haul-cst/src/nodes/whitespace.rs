// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Whitespace and comment nodes.
//!
//! The CST is lossless: every run of whitespace and every comment in the
//! source is owned by exactly one node. Statement-level trivia (blank lines,
//! end-of-line comments) is structured so transformers can manipulate it;
//! intra-expression whitespace is carried as raw text.

use crate::codegen::{Codegen, CodegenState};

/// A run of spaces and tabs, possibly containing backslash continuations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleWhitespace(pub String);

impl SimpleWhitespace {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// A single space, the canonical separator for synthesized nodes.
    pub fn one() -> Self {
        Self(" ".to_owned())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Codegen for SimpleWhitespace {
    fn codegen(&self, state: &mut CodegenState) {
        state.add(&self.0);
    }
}

/// A comment, from `#` to the end of the line (newline excluded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment(pub String);

impl Codegen for Comment {
    fn codegen(&self, state: &mut CodegenState) {
        state.add(&self.0);
    }
}

/// A physical line terminator. Empty at end of file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Newline(pub String);

impl Default for Newline {
    fn default() -> Self {
        Self(crate::codegen::DEFAULT_NEWLINE.to_owned())
    }
}

impl Codegen for Newline {
    fn codegen(&self, state: &mut CodegenState) {
        state.add(&self.0);
    }
}

/// The tail of a statement line: whitespace, an optional comment, and the
/// line terminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrailingWhitespace {
    pub whitespace: SimpleWhitespace,
    pub comment: Option<Comment>,
    pub newline: Newline,
}

impl Codegen for TrailingWhitespace {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace.codegen(state);
        self.comment.codegen(state);
        self.newline.codegen(state);
    }
}

/// A line that contains no statement: blank, or only a comment.
///
/// The stored whitespace is absolute (the full text before the comment or
/// newline), so empty lines render without consulting the indent stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmptyLine {
    pub whitespace: SimpleWhitespace,
    pub comment: Option<Comment>,
    pub newline: Newline,
}

impl EmptyLine {
    /// A truly blank line.
    pub fn blank() -> Self {
        Self::default()
    }

    /// True when the line carries no comment.
    pub fn is_blank(&self) -> bool {
        self.comment.is_none()
    }
}

impl Codegen for EmptyLine {
    fn codegen(&self, state: &mut CodegenState) {
        self.whitespace.codegen(state);
        self.comment.codegen(state);
        self.newline.codegen(state);
    }
}

/// Whitespace at a position where an open bracket permits line breaks.
///
/// Inside parentheses, brackets, and braces, this may include comments and
/// newlines; the raw text is kept verbatim. Outside brackets it is limited
/// to spaces, tabs, and backslash continuations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParenthesizableWhitespace(pub String);

impl ParenthesizableWhitespace {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// A single space, the canonical separator for synthesized nodes.
    pub fn one() -> Self {
        Self(" ".to_owned())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Codegen for ParenthesizableWhitespace {
    fn codegen(&self, state: &mut CodegenState) {
        state.add(&self.0);
    }
}
