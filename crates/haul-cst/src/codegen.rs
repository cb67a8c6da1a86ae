// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Code generation from CST nodes back to Python source.
//!
//! Every node implements [`Codegen`]; rendering a freshly parsed module
//! reproduces the input byte-for-byte. Synthesized nodes (those built by
//! transformers rather than the parser) render with canonical spacing:
//! single spaces around operators and four-space indents.

/// Default indentation unit for synthesized blocks.
pub const DEFAULT_INDENT: &str = "    ";

/// Default newline for synthesized lines.
pub const DEFAULT_NEWLINE: &str = "\n";

/// Accumulates generated source text during codegen.
///
/// Tracks the indentation stack for nested blocks. Statements do not store
/// their own indentation; [`IndentedBlock`](crate::nodes::IndentedBlock)
/// pushes its indent here and statement lines emit the current total.
#[derive(Debug, Default)]
pub struct CodegenState {
    output: String,
    indents: Vec<String>,
}

impl CodegenState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token of source text.
    pub fn add(&mut self, token: &str) {
        self.output.push_str(token);
    }

    /// Append the current total indentation.
    pub fn add_indent(&mut self) {
        for indent in &self.indents {
            self.output.push_str(indent);
        }
    }

    /// Push one level of indentation.
    pub fn push_indent(&mut self, indent: &str) {
        self.indents.push(indent.to_owned());
    }

    /// Pop one level of indentation.
    pub fn pop_indent(&mut self) {
        self.indents.pop();
    }

    /// Consume the state, returning the generated source.
    pub fn into_source(self) -> String {
        self.output
    }
}

impl std::fmt::Display for CodegenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.output)
    }
}

/// Render a CST node to source text.
pub trait Codegen {
    /// Emit this node into `state`.
    fn codegen(&self, state: &mut CodegenState);
}

impl<T: Codegen> Codegen for Box<T> {
    fn codegen(&self, state: &mut CodegenState) {
        (**self).codegen(state);
    }
}

impl<T: Codegen> Codegen for Option<T> {
    fn codegen(&self, state: &mut CodegenState) {
        if let Some(node) = self {
            node.codegen(state);
        }
    }
}

impl<T: Codegen> Codegen for Vec<T> {
    fn codegen(&self, state: &mut CodegenState) {
        for node in self {
            node.codegen(state);
        }
    }
}

/// Render any node to a standalone string.
pub fn render<T: Codegen>(node: &T) -> String {
    let mut state = CodegenState::new();
    node.codegen(&mut state);
    state.into_source()
}
