// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node identity and position types.
//!
//! # Node Identity
//!
//! Identity-bearing nodes (statements, imports, names, attributes,
//! definitions, parameters) carry the [`Span`] of the source text they were
//! parsed from. Two nodes of one parse never share a span, so a span is a
//! stable key for the side maps built by analyses (scope index, unused
//! imports, reference replacements).
//!
//! Synthesized nodes carry [`Span::SYNTHETIC`] and must not be used as map
//! keys. Analyses therefore only run against freshly parsed trees; the
//! engine re-renders and re-parses a module after each transform pass.

/// A half-open byte range `[start, end)` into UTF-8 source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: u32,
    /// Exclusive end byte offset.
    pub end: u32,
}

impl Span {
    /// The span of a synthesized node; never a valid parse span.
    pub const SYNTHETIC: Span = Span {
        start: u32::MAX,
        end: u32::MAX,
    };

    /// Create a new span.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// True for spans stamped by the parser.
    pub fn is_parsed(&self) -> bool {
        *self != Self::SYNTHETIC
    }

    /// True if `other` lies entirely within this span.
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True if `offset` lies within this span (end-inclusive).
    ///
    /// Statement lookup uses end-inclusive semantics so a caret sitting
    /// just past the last character of a statement still selects it.
    pub fn covers_offset(&self, offset: u32) -> bool {
        self.start <= offset && offset <= self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A 1-based line and 0-based column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Byte offset of this position within `source`, or `None` when the
    /// position lies beyond the end of its line or the file.
    pub fn to_offset(self, source: &str) -> Option<u32> {
        let mut line = 1u32;
        let mut line_start = 0usize;
        if self.line == 0 {
            return None;
        }
        if self.line > 1 {
            for (idx, ch) in source.char_indices() {
                if ch == '\n' {
                    line += 1;
                    line_start = idx + 1;
                    if line == self.line {
                        break;
                    }
                }
            }
            if line != self.line {
                return None;
            }
        }
        let rest = &source[line_start..];
        let line_len = rest.find('\n').unwrap_or(rest.len());
        if self.col as usize > line_len {
            return None;
        }
        Some((line_start + self.col as usize) as u32)
    }
}

impl std::fmt::Display for LineCol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{} C{}", self.line, self.col)
    }
}

/// Nodes that carry a parse span.
pub trait Spanned {
    fn span(&self) -> Span;
}
