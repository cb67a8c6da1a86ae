// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A recursive-descent parser producing a lossless CST.
//!
//! The parser walks the source once. Whitespace is attached to nodes as it
//! is consumed: trivia lines go to the statement that follows them,
//! intra-expression whitespace to the operator or bracket it surrounds.
//! Inside open brackets, newlines and comments count as whitespace
//! (implicit line joining).
//!
//! Indentation is handled per block: the first statement line of a block
//! fixes the block's indent, and every following statement line must match
//! it exactly until a dedent.

mod errors;

pub use errors::{ParserError, Result};

use crate::nodes::*;

/// Parse a complete module.
pub fn parse_module(source: &str) -> Result<Module> {
    let mut parser = Parser::new(source);
    parser.parse_module()
}

/// Reserved words that cannot appear as plain names in expressions.
const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

fn is_ident_continue(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    paren_depth: u32,
    /// Blank and comment lines waiting to be attached to the next
    /// statement (or the module footer).
    pending_lines: Vec<EmptyLine>,
    /// End offset of the most recently finished small-statement group;
    /// compound statements use this as their span end.
    last_stmt_end: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            paren_depth: 0,
            pending_lines: Vec::new(),
            last_stmt_end: 0,
        }
    }

    // ------------------------------------------------------------------
    // Low-level cursor
    // ------------------------------------------------------------------

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn starts_with(&self, text: &str) -> bool {
        self.rest().starts_with(text)
    }

    fn eat(&mut self, text: &str) -> bool {
        if self.starts_with(text) {
            self.pos += text.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, text: &str) -> Result<()> {
        if self.eat(text) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{text}'")))
        }
    }

    fn error(&self, message: impl Into<String>) -> ParserError {
        let lc = self.line_col(self.pos);
        ParserError {
            message: message.into(),
            line: lc.line,
            col: lc.col,
        }
    }

    fn line_col(&self, pos: usize) -> LineCol {
        let mut line = 1u32;
        let mut line_start = 0usize;
        for (idx, ch) in self.src.char_indices() {
            if idx >= pos {
                break;
            }
            if ch == '\n' {
                line += 1;
                line_start = idx + 1;
            }
        }
        LineCol::new(line, (pos - line_start) as u32)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start as u32, self.pos as u32)
    }

    /// True when the previous character permits a word operator with no
    /// whitespace before it (closing brackets and quotes do; identifier
    /// characters do not).
    fn word_boundary_before(&self) -> bool {
        match self.src[..self.pos].chars().next_back() {
            Some(ch) => matches!(ch, ')' | ']' | '}' | '"' | '\''),
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Whitespace
    // ------------------------------------------------------------------

    /// Spaces, tabs, and backslash continuations.
    fn eat_simple_ws(&mut self) -> SimpleWhitespace {
        let start = self.pos;
        loop {
            match self.peek() {
                Some(' ') | Some('\t') => {
                    self.bump();
                }
                Some('\\') => {
                    let after = &self.rest()[1..];
                    if after.starts_with('\n') {
                        self.pos += 2;
                    } else if after.starts_with("\r\n") {
                        self.pos += 3;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        SimpleWhitespace::new(&self.src[start..self.pos])
    }

    /// Like [`Self::eat_simple_ws`], but inside open brackets also consumes
    /// comments and newlines.
    fn eat_paren_ws(&mut self) -> ParenthesizableWhitespace {
        let start = self.pos;
        loop {
            match self.peek() {
                Some(' ') | Some('\t') => {
                    self.bump();
                }
                Some('\\') => {
                    let after = &self.rest()[1..];
                    if after.starts_with('\n') {
                        self.pos += 2;
                    } else if after.starts_with("\r\n") {
                        self.pos += 3;
                    } else {
                        break;
                    }
                }
                Some('#') if self.paren_depth > 0 => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        if self.starts_with("\r\n") {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('\n') if self.paren_depth > 0 => {
                    self.bump();
                }
                Some('\r') if self.paren_depth > 0 && self.rest().starts_with("\r\n") => {
                    self.pos += 2;
                }
                _ => break,
            }
        }
        ParenthesizableWhitespace::new(&self.src[start..self.pos])
    }

    fn eat_comment(&mut self) -> Option<Comment> {
        if self.peek() != Some('#') {
            return None;
        }
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch == '\n' || (ch == '\r' && self.starts_with("\r\n")) {
                break;
            }
            self.bump();
        }
        Some(Comment(self.src[start..self.pos].to_owned()))
    }

    fn eat_newline(&mut self) -> Option<Newline> {
        if self.eat("\r\n") {
            Some(Newline("\r\n".to_owned()))
        } else if self.eat("\n") {
            Some(Newline("\n".to_owned()))
        } else if self.at_eof() {
            Some(Newline(String::new()))
        } else {
            None
        }
    }

    fn parse_trailing(&mut self) -> Result<TrailingWhitespace> {
        let whitespace = self.eat_simple_ws();
        let comment = self.eat_comment();
        let newline = self
            .eat_newline()
            .ok_or_else(|| self.error("expected end of line"))?;
        Ok(TrailingWhitespace {
            whitespace,
            comment,
            newline,
        })
    }

    // ------------------------------------------------------------------
    // Probing helpers
    // ------------------------------------------------------------------

    /// Consume whitespace and a punctuation operator, returning the
    /// whitespace before it; restores the cursor on mismatch.
    fn try_op(&mut self, op: &str) -> Option<ParenthesizableWhitespace> {
        let save = self.pos;
        let ws = self.eat_paren_ws();
        if self.starts_with(op) {
            // Reject prefixes of longer operators: `=` vs `==`, `*` vs
            // `**`, `/` vs `//`, `<` vs `<<` and friends.
            let after = &self.rest()[op.len()..];
            let clash = match op {
                "=" => after.starts_with('='),
                "*" => after.starts_with('*') || after.starts_with('='),
                "**" => after.starts_with('='),
                "/" => after.starts_with('/') || after.starts_with('='),
                "//" => after.starts_with('='),
                "<" => after.starts_with('<') || after.starts_with('='),
                ">" => after.starts_with('>') || after.starts_with('='),
                "-" => after.starts_with('=') || after.starts_with('>'),
                "<<" | ">>" | "%" | "@" | "|" | "&" | "^" | "+" => after.starts_with('='),
                ":" => after.starts_with('='),
                _ => false,
            };
            if !clash {
                self.pos += op.len();
                return Some(ws);
            }
        }
        self.pos = save;
        None
    }

    /// Consume whitespace and a keyword operator (`and`, `in`, ...),
    /// returning the whitespace before it; restores the cursor on mismatch.
    fn try_word(&mut self, word: &str) -> Option<ParenthesizableWhitespace> {
        let save = self.pos;
        let ws = self.eat_paren_ws();
        let boundary = !ws.is_empty() || save == 0 || self.word_boundary_before();
        if boundary && self.starts_with(word) {
            let after = &self.rest()[word.len()..];
            if !after.chars().next().is_some_and(is_ident_continue) {
                self.pos += word.len();
                return Some(ws);
            }
        }
        self.pos = save;
        None
    }

    fn peek_word(&self) -> Option<&'a str> {
        let rest = self.rest();
        let first = rest.chars().next()?;
        if !is_ident_start(first) {
            return None;
        }
        let end = rest
            .char_indices()
            .find(|(_, ch)| !is_ident_continue(*ch))
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        Some(&rest[..end])
    }

    fn eat_word(&mut self, word: &str) -> bool {
        if self.peek_word() == Some(word) {
            self.pos += word.len();
            true
        } else {
            false
        }
    }

    fn parse_name(&mut self) -> Result<Name> {
        let start = self.pos;
        match self.peek_word() {
            Some(word) if !KEYWORDS.contains(&word) => {
                self.pos += word.len();
                Ok(Name {
                    value: word.to_owned(),
                    span: self.span_from(start),
                })
            }
            Some(word) => Err(self.error(format!("keyword '{word}' cannot be used as a name"))),
            None => Err(self.error("expected a name")),
        }
    }

    // ------------------------------------------------------------------
    // Module and statement structure
    // ------------------------------------------------------------------

    fn parse_module(&mut self) -> Result<Module> {
        let body = self.parse_statements("")?;
        if !self.at_eof() {
            return Err(self.error("unexpected dedent"));
        }
        let footer = std::mem::take(&mut self.pending_lines);
        Ok(Module { body, footer })
    }

    /// Parse statements at exactly `indent` until dedent or end of file.
    fn parse_statements(&mut self, indent: &str) -> Result<Vec<Statement>> {
        let mut body = Vec::new();
        loop {
            let line_start = self.pos;
            let ws = self.eat_simple_ws();
            match self.peek() {
                None => {
                    if !ws.is_empty() {
                        self.pending_lines.push(EmptyLine {
                            whitespace: ws,
                            comment: None,
                            newline: Newline(String::new()),
                        });
                    }
                    return Ok(body);
                }
                Some('#') => {
                    let comment = self.eat_comment();
                    let newline = self
                        .eat_newline()
                        .ok_or_else(|| self.error("expected end of line"))?;
                    self.pending_lines.push(EmptyLine {
                        whitespace: ws,
                        comment,
                        newline,
                    });
                }
                Some('\n') | Some('\r') => {
                    let newline = self
                        .eat_newline()
                        .ok_or_else(|| self.error("expected end of line"))?;
                    self.pending_lines.push(EmptyLine {
                        whitespace: ws,
                        comment: None,
                        newline,
                    });
                }
                Some(_) => {
                    if ws.0 == indent {
                        let leading = std::mem::take(&mut self.pending_lines);
                        let statement = self.parse_statement(indent, leading)?;
                        body.push(statement);
                    } else if indent.starts_with(&ws.0) {
                        // Dedent: hand the line (and any pending trivia)
                        // back to the enclosing block.
                        self.pos = line_start;
                        return Ok(body);
                    } else {
                        return Err(self.error("unexpected indent"));
                    }
                }
            }
        }
    }

    fn parse_statement(
        &mut self,
        indent: &str,
        leading_lines: Vec<EmptyLine>,
    ) -> Result<Statement> {
        if self.starts_with("@") {
            return self.parse_decorated(indent, leading_lines);
        }
        match self.peek_word() {
            Some("def") => Ok(Statement::Compound(CompoundStatement::FunctionDef(
                self.parse_function_def(indent, leading_lines, Vec::new(), Vec::new(), None)?,
            ))),
            Some("class") => Ok(Statement::Compound(CompoundStatement::ClassDef(
                self.parse_class_def(indent, leading_lines, Vec::new(), Vec::new())?,
            ))),
            Some("async") => self.parse_async_statement(indent, leading_lines),
            Some("if") => Ok(Statement::Compound(CompoundStatement::If(
                self.parse_if(indent, leading_lines, "if")?,
            ))),
            Some("while") => Ok(Statement::Compound(CompoundStatement::While(
                self.parse_while(indent, leading_lines)?,
            ))),
            Some("for") => Ok(Statement::Compound(CompoundStatement::For(
                self.parse_for(indent, leading_lines, None)?,
            ))),
            Some("try") => Ok(Statement::Compound(CompoundStatement::Try(
                self.parse_try(indent, leading_lines)?,
            ))),
            Some("with") => Ok(Statement::Compound(CompoundStatement::With(
                self.parse_with(indent, leading_lines, None)?,
            ))),
            _ => Ok(Statement::Simple(
                self.parse_simple_statement_line(leading_lines)?,
            )),
        }
    }

    fn parse_async_statement(
        &mut self,
        indent: &str,
        leading_lines: Vec<EmptyLine>,
    ) -> Result<Statement> {
        let save = self.pos;
        self.expect("async")?;
        let ws = self.eat_paren_ws();
        let asynchronous = Some(Asynchronous {
            whitespace_after: ws,
        });
        match self.peek_word() {
            Some("def") => Ok(Statement::Compound(CompoundStatement::FunctionDef(
                self.parse_function_def(indent, leading_lines, Vec::new(), Vec::new(), asynchronous)?,
            ))),
            Some("for") => Ok(Statement::Compound(CompoundStatement::For(
                self.parse_for(indent, leading_lines, asynchronous)?,
            ))),
            Some("with") => Ok(Statement::Compound(CompoundStatement::With(
                self.parse_with(indent, leading_lines, asynchronous)?,
            ))),
            _ => {
                self.pos = save;
                Err(self.error("expected 'def', 'for', or 'with' after 'async'"))
            }
        }
    }

    fn parse_decorated(
        &mut self,
        indent: &str,
        leading_lines: Vec<EmptyLine>,
    ) -> Result<Statement> {
        let dec_start = self.pos as u32;
        let mut decorators = Vec::new();
        let mut decorator_leading = Vec::new();
        loop {
            if self.starts_with("@") {
                self.expect("@")?;
                let whitespace_after_at = self.eat_simple_ws();
                let decorator = self.parse_expression()?;
                let trailing = self.parse_trailing()?;
                decorators.push(Decorator {
                    leading_lines: std::mem::take(&mut decorator_leading),
                    whitespace_after_at,
                    decorator,
                    trailing,
                });
                // Trivia between decorators (and before the def/class
                // line) accumulates here.
                loop {
                    let ws = self.eat_simple_ws();
                    match self.peek() {
                        Some('#') => {
                            let comment = self.eat_comment();
                            let newline = self
                                .eat_newline()
                                .ok_or_else(|| self.error("expected end of line"))?;
                            decorator_leading.push(EmptyLine {
                                whitespace: ws,
                                comment,
                                newline,
                            });
                        }
                        Some('\n') | Some('\r') => {
                            let newline = self
                                .eat_newline()
                                .ok_or_else(|| self.error("expected end of line"))?;
                            decorator_leading.push(EmptyLine {
                                whitespace: ws,
                                comment: None,
                                newline,
                            });
                        }
                        _ => {
                            if ws.0 != indent {
                                return Err(self.error("unexpected indent after decorator"));
                            }
                            break;
                        }
                    }
                }
            } else {
                break;
            }
        }
        let lines_after_decorators = decorator_leading;
        let asynchronous = if self.peek_word() == Some("async") {
            self.expect("async")?;
            Some(Asynchronous {
                whitespace_after: self.eat_paren_ws(),
            })
        } else {
            None
        };
        match self.peek_word() {
            Some("def") => {
                let mut def = self.parse_function_def(
                    indent,
                    leading_lines,
                    decorators,
                    lines_after_decorators,
                    asynchronous,
                )?;
                def.span.start = dec_start;
                Ok(Statement::Compound(CompoundStatement::FunctionDef(def)))
            }
            Some("class") if asynchronous.is_none() => {
                let mut class = self.parse_class_def(
                    indent,
                    leading_lines,
                    decorators,
                    lines_after_decorators,
                )?;
                class.span.start = dec_start;
                Ok(Statement::Compound(CompoundStatement::ClassDef(class)))
            }
            _ => Err(self.error("expected 'def' or 'class' after decorators")),
        }
    }

    // ------------------------------------------------------------------
    // Simple statement lines
    // ------------------------------------------------------------------

    fn parse_simple_statement_line(
        &mut self,
        leading_lines: Vec<EmptyLine>,
    ) -> Result<SimpleStatementLine> {
        let start = self.pos;
        let (body, semicolons, end) = self.parse_small_statements_inline()?;
        let trailing = self.parse_trailing()?;
        Ok(SimpleStatementLine {
            leading_lines,
            body,
            semicolons,
            trailing,
            span: Span::new(start as u32, end as u32),
        })
    }

    /// Parse semicolon-separated small statements up to the end of the
    /// physical line, returning the offset just past the last statement.
    fn parse_small_statements_inline(
        &mut self,
    ) -> Result<(Vec<SmallStatement>, Vec<Semicolon>, usize)> {
        let mut body = Vec::new();
        let mut semicolons = Vec::new();
        let mut end = self.pos;
        loop {
            body.push(self.parse_small_statement()?);
            end = self.pos;
            let save = self.pos;
            let ws_before = self.eat_simple_ws();
            if self.eat(";") {
                let ws_after = self.eat_simple_ws();
                semicolons.push(Semicolon {
                    whitespace_before: ParenthesizableWhitespace(ws_before.0),
                    whitespace_after: ParenthesizableWhitespace(ws_after.0),
                });
                match self.peek() {
                    None | Some('\n') | Some('#') => break,
                    Some('\r') if self.starts_with("\r\n") => break,
                    _ => continue,
                }
            }
            self.pos = save;
            break;
        }
        self.last_stmt_end = end;
        Ok((body, semicolons, end))
    }

    fn parse_small_statement(&mut self) -> Result<SmallStatement> {
        let start = self.pos;
        match self.peek_word() {
            Some("pass") => {
                self.expect("pass")?;
                Ok(SmallStatement::Pass)
            }
            Some("break") => {
                self.expect("break")?;
                Ok(SmallStatement::Break)
            }
            Some("continue") => {
                self.expect("continue")?;
                Ok(SmallStatement::Continue)
            }
            Some("return") => {
                self.expect("return")?;
                let whitespace_after_return = self.eat_simple_ws();
                let value = if self.at_statement_end() {
                    None
                } else {
                    Some(self.parse_expression_list()?)
                };
                Ok(SmallStatement::Return(Return {
                    whitespace_after_return,
                    value,
                }))
            }
            Some("raise") => {
                self.expect("raise")?;
                let whitespace_after_raise = self.eat_simple_ws();
                let value = if self.at_statement_end() {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                let cause = if value.is_some() {
                    match self.try_word("from") {
                        Some(ws) => {
                            let whitespace_after_from = self.eat_simple_ws();
                            let expression = self.parse_expression()?;
                            Some(RaiseFrom {
                                whitespace_before_from: SimpleWhitespace(ws.0),
                                whitespace_after_from,
                                expression,
                            })
                        }
                        None => None,
                    }
                } else {
                    None
                };
                Ok(SmallStatement::Raise(Raise {
                    whitespace_after_raise,
                    value,
                    cause,
                }))
            }
            Some("assert") => {
                self.expect("assert")?;
                let whitespace_after_assert = self.eat_simple_ws();
                let test = self.parse_expression()?;
                let msg = match self.try_op(",") {
                    Some(ws_before) => {
                        let ws_after = self.eat_paren_ws();
                        let message = self.parse_expression()?;
                        Some((
                            Comma {
                                whitespace_before: ws_before,
                                whitespace_after: ws_after,
                            },
                            message,
                        ))
                    }
                    None => None,
                };
                Ok(SmallStatement::Assert(Assert {
                    whitespace_after_assert,
                    test,
                    msg,
                }))
            }
            Some("global") => {
                self.expect("global")?;
                let whitespace_after_global = self.eat_simple_ws();
                let names = self.parse_name_items()?;
                Ok(SmallStatement::Global(Global {
                    whitespace_after_global,
                    names,
                }))
            }
            Some("nonlocal") => {
                self.expect("nonlocal")?;
                let whitespace_after_nonlocal = self.eat_simple_ws();
                let names = self.parse_name_items()?;
                Ok(SmallStatement::Nonlocal(Nonlocal {
                    whitespace_after_nonlocal,
                    names,
                }))
            }
            Some("del") => {
                self.expect("del")?;
                let whitespace_after_del = self.eat_simple_ws();
                let target = self.parse_expression_list()?;
                Ok(SmallStatement::Del(Del {
                    whitespace_after_del,
                    target,
                }))
            }
            Some("import") => self.parse_import(start),
            Some("from") => self.parse_import_from(start),
            _ => self.parse_expression_statement(start),
        }
    }

    fn at_statement_end(&self) -> bool {
        match self.peek() {
            None | Some('\n') | Some('#') | Some(';') => true,
            Some('\r') => self.starts_with("\r\n"),
            _ => false,
        }
    }

    fn parse_name_items(&mut self) -> Result<Vec<NameItem>> {
        let mut names = Vec::new();
        loop {
            let name = self.parse_name()?;
            match self.try_op(",") {
                Some(ws_before) => {
                    let ws_after = self.eat_paren_ws();
                    names.push(NameItem {
                        name,
                        comma: Some(Comma {
                            whitespace_before: ws_before,
                            whitespace_after: ws_after,
                        }),
                    });
                }
                None => {
                    names.push(NameItem { name, comma: None });
                    return Ok(names);
                }
            }
        }
    }

    fn parse_expression_statement(&mut self, start: usize) -> Result<SmallStatement> {
        let first = self.parse_expression_list()?;

        // Annotated assignment.
        if let Some(ws_before) = self.try_op(":") {
            let ws_after = self.eat_paren_ws();
            let annotation = Annotation {
                colon: Colon {
                    whitespace_before: ws_before,
                    whitespace_after: ws_after,
                },
                annotation: self.parse_expression()?,
            };
            let (equal, value) = match self.try_op("=") {
                Some(ws_before_eq) => {
                    let ws_after_eq = self.eat_paren_ws();
                    (
                        Some(AssignEqual {
                            whitespace_before: ws_before_eq,
                            whitespace_after: ws_after_eq,
                        }),
                        Some(self.parse_expression_list()?),
                    )
                }
                None => (None, None),
            };
            return Ok(SmallStatement::AnnAssign(AnnAssign {
                target: first,
                annotation,
                equal,
                value,
                span: self.span_from(start),
            }));
        }

        // Augmented assignment.
        for (text, kind) in [
            ("**=", BinaryOpKind::Power),
            ("//=", BinaryOpKind::FloorDivide),
            ("<<=", BinaryOpKind::LeftShift),
            (">>=", BinaryOpKind::RightShift),
            ("+=", BinaryOpKind::Add),
            ("-=", BinaryOpKind::Subtract),
            ("*=", BinaryOpKind::Multiply),
            ("/=", BinaryOpKind::Divide),
            ("%=", BinaryOpKind::Modulo),
            ("@=", BinaryOpKind::MatrixMultiply),
            ("|=", BinaryOpKind::BitOr),
            ("&=", BinaryOpKind::BitAnd),
            ("^=", BinaryOpKind::BitXor),
        ] {
            let save = self.pos;
            let ws_before = self.eat_paren_ws();
            if self.eat(text) {
                let ws_after = self.eat_paren_ws();
                let value = self.parse_expression_list()?;
                return Ok(SmallStatement::AugAssign(AugAssign {
                    target: first,
                    op: AugOp {
                        kind,
                        whitespace_before: ws_before,
                        whitespace_after: ws_after,
                    },
                    value,
                    span: self.span_from(start),
                }));
            }
            self.pos = save;
        }

        // Plain assignment, possibly chained.
        if let Some(ws_before) = self.try_op("=") {
            let mut targets = vec![AssignTarget {
                target: first,
                whitespace_before_equal: SimpleWhitespace(ws_before.0),
                whitespace_after_equal: SimpleWhitespace(self.eat_paren_ws().0),
            }];
            let mut value = self.parse_expression_list()?;
            while let Some(ws_before_next) = self.try_op("=") {
                let ws_after_next = self.eat_paren_ws();
                targets.push(AssignTarget {
                    target: value,
                    whitespace_before_equal: SimpleWhitespace(ws_before_next.0),
                    whitespace_after_equal: SimpleWhitespace(ws_after_next.0),
                });
                value = self.parse_expression_list()?;
            }
            return Ok(SmallStatement::Assign(Assign {
                targets,
                value,
                span: self.span_from(start),
            }));
        }

        Ok(SmallStatement::Expr(Expr { value: first }))
    }

    // ------------------------------------------------------------------
    // Imports
    // ------------------------------------------------------------------

    fn parse_dotted_name(&mut self) -> Result<NameOrAttribute> {
        let start = self.pos;
        let first = self.parse_name()?;
        let mut expr = Expression::Name(first);
        while let Some(ws_before) = self.try_op(".") {
            let ws_after = self.eat_paren_ws();
            let attr = self.parse_name()?;
            expr = Expression::Attribute(Box::new(Attribute {
                value: expr,
                dot: Dot {
                    whitespace_before: ws_before,
                    whitespace_after: ws_after,
                },
                attr,
                span: self.span_from(start),
            }));
        }
        Ok(match expr {
            Expression::Name(name) => NameOrAttribute::N(name),
            Expression::Attribute(attr) => NameOrAttribute::A(attr),
            _ => unreachable!("dotted name is a name or attribute"),
        })
    }

    fn parse_as_name(&mut self) -> Result<Option<AsName>> {
        match self.try_word("as") {
            Some(ws_before) => {
                let ws_after = self.eat_paren_ws();
                let name = self.parse_name()?;
                Ok(Some(AsName {
                    whitespace_before_as: SimpleWhitespace(ws_before.0),
                    whitespace_after_as: SimpleWhitespace(ws_after.0),
                    name,
                }))
            }
            None => Ok(None),
        }
    }

    fn parse_import_aliases(&mut self) -> Result<Vec<ImportAlias>> {
        let mut aliases = Vec::new();
        loop {
            let name = self.parse_dotted_name()?;
            let asname = self.parse_as_name()?;
            let comma = match self.try_op(",") {
                Some(ws_before) => {
                    let ws_after = self.eat_paren_ws();
                    Some(Comma {
                        whitespace_before: ws_before,
                        whitespace_after: ws_after,
                    })
                }
                None => None,
            };
            let done = comma.is_none();
            aliases.push(ImportAlias {
                name,
                asname,
                comma,
            });
            if done {
                return Ok(aliases);
            }
            // Tolerate a trailing comma before a closing paren.
            let save = self.pos;
            let _ = self.eat_paren_ws();
            if self.peek() == Some(')') {
                self.pos = save;
                return Ok(aliases);
            }
            self.pos = save;
        }
    }

    fn parse_import(&mut self, start: usize) -> Result<SmallStatement> {
        self.expect("import")?;
        let whitespace_after_import = self.eat_simple_ws();
        let names = self.parse_import_aliases()?;
        Ok(SmallStatement::Import(Import {
            whitespace_after_import,
            names,
            span: self.span_from(start),
        }))
    }

    fn parse_import_from(&mut self, start: usize) -> Result<SmallStatement> {
        self.expect("from")?;
        let whitespace_after_from = self.eat_simple_ws();
        let mut relative = Vec::new();
        while self.eat(".") {
            relative.push(Dot {
                whitespace_before: ParenthesizableWhitespace::default(),
                whitespace_after: ParenthesizableWhitespace(self.eat_simple_ws().0),
            });
        }
        let module = if self.peek_word() == Some("import") {
            None
        } else {
            Some(self.parse_dotted_name()?)
        };
        let whitespace_before_import = self.eat_simple_ws();
        self.expect("import")?;
        let whitespace_after_import = self.eat_simple_ws();

        if self.eat("*") {
            return Ok(SmallStatement::ImportFrom(ImportFrom {
                whitespace_after_from,
                relative,
                module,
                whitespace_before_import,
                whitespace_after_import,
                lpar: None,
                names: ImportNames::Star(ImportStar),
                rpar: None,
                span: self.span_from(start),
            }));
        }

        let (lpar, names, rpar) = if self.eat("(") {
            self.paren_depth += 1;
            let lpar = LeftParen {
                whitespace_after: self.eat_paren_ws(),
            };
            let aliases = self.parse_import_aliases()?;
            let ws_before_rpar = self.eat_paren_ws();
            self.paren_depth -= 1;
            self.expect(")")?;
            (
                Some(lpar),
                ImportNames::Aliases(aliases),
                Some(RightParen {
                    whitespace_before: ws_before_rpar,
                }),
            )
        } else {
            (None, ImportNames::Aliases(self.parse_import_aliases()?), None)
        };

        Ok(SmallStatement::ImportFrom(ImportFrom {
            whitespace_after_from,
            relative,
            module,
            whitespace_before_import,
            whitespace_after_import,
            lpar,
            names,
            rpar,
            span: self.span_from(start),
        }))
    }
}

// ============================================================================
// Compound statements and suites
// ============================================================================

impl<'a> Parser<'a> {
    /// Whitespace prefix of the next non-blank, non-comment line.
    fn sniff_block_indent(&self) -> Option<String> {
        let mut rest = self.rest();
        loop {
            let line_end = rest.find('\n').map(|idx| idx + 1).unwrap_or(rest.len());
            if line_end == 0 {
                return None;
            }
            let line = rest[..line_end].trim_end_matches(['\n', '\r']);
            let content = line.trim_start_matches([' ', '\t']);
            if content.is_empty() || content.starts_with('#') {
                if line_end == rest.len() {
                    return None;
                }
                rest = &rest[line_end..];
                continue;
            }
            return Some(line[..line.len() - content.len()].to_owned());
        }
    }

    /// Parse the suite after a compound statement's colon.
    fn parse_suite(&mut self, indent: &str) -> Result<Suite> {
        let ws = self.eat_simple_ws();
        let inline = match self.peek() {
            None | Some('#') | Some('\n') => false,
            Some('\r') if self.starts_with("\r\n") => false,
            Some(_) => true,
        };
        if inline {
            let (body, semicolons, _) = self.parse_small_statements_inline()?;
            let trailing = self.parse_trailing()?;
            return Ok(Suite::Simple(SimpleStatementSuite {
                leading_whitespace: ws,
                body,
                semicolons,
                trailing,
            }));
        }

        let comment = self.eat_comment();
        let newline = self
            .eat_newline()
            .ok_or_else(|| self.error("expected end of line"))?;
        let trailing = TrailingWhitespace {
            whitespace: ws,
            comment,
            newline,
        };
        let child = self
            .sniff_block_indent()
            .ok_or_else(|| self.error("expected an indented block"))?;
        if !child.starts_with(indent) || child.len() <= indent.len() {
            return Err(self.error("expected an indented block"));
        }
        let body = self.parse_statements(&child)?;
        if body.is_empty() {
            return Err(self.error("expected an indented block"));
        }
        Ok(Suite::IndentedBlock(IndentedBlock {
            trailing,
            indent: child[indent.len()..].to_owned(),
            body,
        }))
    }

    /// Look for a dedent-level clause keyword (`elif`, `else`, `except`,
    /// `finally`) at `indent`. On a hit, consumes the keyword and returns
    /// it with the trivia lines before it; otherwise leaves the trivia
    /// pending and restores the cursor to the start of the line.
    fn try_clause(
        &mut self,
        indent: &str,
        keywords: &[&'static str],
    ) -> Result<Option<(&'static str, Vec<EmptyLine>)>> {
        loop {
            let line_start = self.pos;
            let ws = self.eat_simple_ws();
            match self.peek() {
                None => {
                    if !ws.is_empty() {
                        self.pending_lines.push(EmptyLine {
                            whitespace: ws,
                            comment: None,
                            newline: Newline(String::new()),
                        });
                    }
                    return Ok(None);
                }
                Some('#') => {
                    let comment = self.eat_comment();
                    let newline = self
                        .eat_newline()
                        .ok_or_else(|| self.error("expected end of line"))?;
                    self.pending_lines.push(EmptyLine {
                        whitespace: ws,
                        comment,
                        newline,
                    });
                }
                Some('\n') | Some('\r') => {
                    let newline = self
                        .eat_newline()
                        .ok_or_else(|| self.error("expected end of line"))?;
                    self.pending_lines.push(EmptyLine {
                        whitespace: ws,
                        comment: None,
                        newline,
                    });
                }
                Some(_) => {
                    if ws.0 == indent {
                        if let Some(word) = self.peek_word() {
                            if let Some(kw) = keywords.iter().find(|kw| **kw == word) {
                                self.pos += kw.len();
                                return Ok(Some((kw, std::mem::take(&mut self.pending_lines))));
                            }
                        }
                    }
                    self.pos = line_start;
                    return Ok(None);
                }
            }
        }
    }

    fn parse_function_def(
        &mut self,
        indent: &str,
        leading_lines: Vec<EmptyLine>,
        decorators: Vec<Decorator>,
        lines_after_decorators: Vec<EmptyLine>,
        asynchronous: Option<Asynchronous>,
    ) -> Result<FunctionDef> {
        let start = self.pos;
        self.expect("def")?;
        let whitespace_after_def = self.eat_simple_ws();
        let name = self.parse_name()?;
        let whitespace_after_name = self.eat_simple_ws();
        self.expect("(")?;
        self.paren_depth += 1;
        let lpar = LeftParen {
            whitespace_after: self.eat_paren_ws(),
        };
        let params = self.parse_parameters(true, ')')?;
        let rpar = RightParen {
            whitespace_before: self.eat_paren_ws(),
        };
        self.paren_depth -= 1;
        self.expect(")")?;
        let returns = match self.try_op("->") {
            Some(ws_before) => Some(ReturnAnnotation {
                whitespace_before_arrow: SimpleWhitespace(ws_before.0),
                whitespace_after_arrow: self.eat_simple_ws(),
                annotation: self.parse_expression()?,
            }),
            None => None,
        };
        let whitespace_before_colon = self.eat_simple_ws();
        self.expect(":")?;
        let body = self.parse_suite(indent)?;
        Ok(FunctionDef {
            leading_lines,
            decorators,
            lines_after_decorators,
            asynchronous,
            whitespace_after_def,
            name,
            whitespace_after_name,
            lpar,
            params,
            rpar,
            returns,
            whitespace_before_colon,
            body,
            span: Span::new(start as u32, self.last_stmt_end as u32),
        })
    }

    fn parse_class_def(
        &mut self,
        indent: &str,
        leading_lines: Vec<EmptyLine>,
        decorators: Vec<Decorator>,
        lines_after_decorators: Vec<EmptyLine>,
    ) -> Result<ClassDef> {
        let start = self.pos;
        self.expect("class")?;
        let whitespace_after_class = self.eat_simple_ws();
        let name = self.parse_name()?;
        let whitespace_after_name = self.eat_simple_ws();
        let args = if self.eat("(") {
            self.paren_depth += 1;
            let lpar = LeftParen {
                whitespace_after: self.eat_paren_ws(),
            };
            let args = self.parse_args()?;
            let rpar = RightParen {
                whitespace_before: self.eat_paren_ws(),
            };
            self.paren_depth -= 1;
            self.expect(")")?;
            Some(ClassArgs { lpar, args, rpar })
        } else {
            None
        };
        let whitespace_before_colon = self.eat_simple_ws();
        self.expect(":")?;
        let body = self.parse_suite(indent)?;
        Ok(ClassDef {
            leading_lines,
            decorators,
            lines_after_decorators,
            whitespace_after_class,
            name,
            whitespace_after_name,
            args,
            whitespace_before_colon,
            body,
            span: Span::new(start as u32, self.last_stmt_end as u32),
        })
    }

    fn parse_if(
        &mut self,
        indent: &str,
        leading_lines: Vec<EmptyLine>,
        keyword: &str,
    ) -> Result<If> {
        let start = self.pos;
        self.expect(keyword)?;
        let whitespace_before_test = self.eat_simple_ws();
        let test = self.parse_expression()?;
        let whitespace_after_test = self.eat_simple_ws();
        self.expect(":")?;
        let body = self.parse_suite(indent)?;
        let orelse = match self.try_clause(indent, &["elif", "else"])? {
            Some(("elif", clause_leading)) => {
                // parse_if expects the cursor before the keyword
                self.pos -= "elif".len();
                Some(Box::new(OrElse::Elif(
                    self.parse_if(indent, clause_leading, "elif")?,
                )))
            }
            Some((_, clause_leading)) => {
                let whitespace_before_colon = self.eat_simple_ws();
                self.expect(":")?;
                let body = self.parse_suite(indent)?;
                Some(Box::new(OrElse::Else(Else {
                    leading_lines: clause_leading,
                    whitespace_before_colon,
                    body,
                })))
            }
            None => None,
        };
        Ok(If {
            leading_lines,
            whitespace_before_test,
            test,
            whitespace_after_test,
            body,
            orelse,
            span: Span::new(start as u32, self.last_stmt_end as u32),
        })
    }

    fn parse_else(&mut self, indent: &str, leading_lines: Vec<EmptyLine>) -> Result<Else> {
        let whitespace_before_colon = self.eat_simple_ws();
        self.expect(":")?;
        let body = self.parse_suite(indent)?;
        Ok(Else {
            leading_lines,
            whitespace_before_colon,
            body,
        })
    }

    fn parse_while(&mut self, indent: &str, leading_lines: Vec<EmptyLine>) -> Result<While> {
        let start = self.pos;
        self.expect("while")?;
        let whitespace_after_while = self.eat_simple_ws();
        let test = self.parse_expression()?;
        let whitespace_before_colon = self.eat_simple_ws();
        self.expect(":")?;
        let body = self.parse_suite(indent)?;
        let orelse = match self.try_clause(indent, &["else"])? {
            Some((_, clause_leading)) => Some(self.parse_else(indent, clause_leading)?),
            None => None,
        };
        Ok(While {
            leading_lines,
            whitespace_after_while,
            test,
            whitespace_before_colon,
            body,
            orelse,
            span: Span::new(start as u32, self.last_stmt_end as u32),
        })
    }

    fn parse_for(
        &mut self,
        indent: &str,
        leading_lines: Vec<EmptyLine>,
        asynchronous: Option<Asynchronous>,
    ) -> Result<For> {
        let start = self.pos;
        self.expect("for")?;
        let whitespace_after_for = self.eat_simple_ws();
        let target = self.parse_target_list()?;
        let whitespace_before_in = SimpleWhitespace(
            self.try_word("in")
                .ok_or_else(|| self.error("expected 'in'"))?
                .0,
        );
        let whitespace_after_in = self.eat_simple_ws();
        let iter = self.parse_expression_list()?;
        let whitespace_before_colon = self.eat_simple_ws();
        self.expect(":")?;
        let body = self.parse_suite(indent)?;
        let orelse = match self.try_clause(indent, &["else"])? {
            Some((_, clause_leading)) => Some(self.parse_else(indent, clause_leading)?),
            None => None,
        };
        Ok(For {
            leading_lines,
            asynchronous,
            whitespace_after_for,
            target,
            whitespace_before_in,
            whitespace_after_in,
            iter,
            whitespace_before_colon,
            body,
            orelse,
            span: Span::new(start as u32, self.last_stmt_end as u32),
        })
    }

    fn parse_try(&mut self, indent: &str, leading_lines: Vec<EmptyLine>) -> Result<Try> {
        let start = self.pos;
        self.expect("try")?;
        let whitespace_before_colon = self.eat_simple_ws();
        self.expect(":")?;
        let body = self.parse_suite(indent)?;
        let mut handlers = Vec::new();
        while let Some((_, clause_leading)) = self.try_clause(indent, &["except"])? {
            let whitespace_after_except = self.eat_simple_ws();
            let kind = if self.starts_with(":") {
                None
            } else {
                Some(self.parse_expression()?)
            };
            let name = if kind.is_some() {
                self.parse_as_name()?
            } else {
                None
            };
            let whitespace_before_colon = self.eat_simple_ws();
            self.expect(":")?;
            let handler_body = self.parse_suite(indent)?;
            handlers.push(ExceptHandler {
                leading_lines: clause_leading,
                whitespace_after_except,
                kind,
                name,
                whitespace_before_colon,
                body: handler_body,
            });
        }
        let orelse = match self.try_clause(indent, &["else"])? {
            Some((_, clause_leading)) => Some(self.parse_else(indent, clause_leading)?),
            None => None,
        };
        let finalbody = match self.try_clause(indent, &["finally"])? {
            Some((_, clause_leading)) => {
                let whitespace_before_colon = self.eat_simple_ws();
                self.expect(":")?;
                let body = self.parse_suite(indent)?;
                Some(Finally {
                    leading_lines: clause_leading,
                    whitespace_before_colon,
                    body,
                })
            }
            None => None,
        };
        if handlers.is_empty() && finalbody.is_none() {
            return Err(self.error("expected 'except' or 'finally'"));
        }
        Ok(Try {
            leading_lines,
            whitespace_before_colon,
            body,
            handlers,
            orelse,
            finalbody,
            span: Span::new(start as u32, self.last_stmt_end as u32),
        })
    }

    fn parse_with(
        &mut self,
        indent: &str,
        leading_lines: Vec<EmptyLine>,
        asynchronous: Option<Asynchronous>,
    ) -> Result<With> {
        let start = self.pos;
        self.expect("with")?;
        let whitespace_after_with = self.eat_simple_ws();
        let mut items = Vec::new();
        loop {
            let item = self.parse_expression()?;
            let asname = self.parse_as_name()?;
            match self.try_comma() {
                Some(comma) => {
                    items.push(WithItem {
                        item,
                        asname,
                        comma: Some(comma),
                    });
                }
                None => {
                    items.push(WithItem {
                        item,
                        asname,
                        comma: None,
                    });
                    break;
                }
            }
        }
        let whitespace_before_colon = self.eat_simple_ws();
        self.expect(":")?;
        let body = self.parse_suite(indent)?;
        Ok(With {
            leading_lines,
            asynchronous,
            whitespace_after_with,
            items,
            whitespace_before_colon,
            body,
            span: Span::new(start as u32, self.last_stmt_end as u32),
        })
    }
}

// ============================================================================
// Expressions
// ============================================================================

impl<'a> Parser<'a> {
    fn try_comma(&mut self) -> Option<Comma> {
        let whitespace_before = self.try_op(",")?;
        Some(Comma {
            whitespace_before,
            whitespace_after: self.eat_paren_ws(),
        })
    }

    /// A full expression: lambda, yield, ternary, or walrus.
    fn parse_expression(&mut self) -> Result<Expression> {
        match self.peek_word() {
            Some("lambda") => return self.parse_lambda(),
            Some("yield") => return self.parse_yield(),
            _ => {}
        }
        let expr = self.parse_ternary()?;
        if matches!(expr, Expression::Name(_)) {
            if let Some(ws_before) = self.try_op(":=") {
                let whitespace_after_walrus = self.eat_paren_ws();
                let value = self.parse_expression()?;
                if let Expression::Name(target) = expr {
                    return Ok(Expression::NamedExpr(Box::new(NamedExpr {
                        target,
                        whitespace_before_walrus: ws_before,
                        whitespace_after_walrus,
                        value,
                    })));
                }
            }
        }
        Ok(expr)
    }

    fn parse_ternary(&mut self) -> Result<Expression> {
        let body = self.parse_or_test()?;
        if let Some(whitespace_before_if) = self.try_word("if") {
            let whitespace_after_if = self.eat_paren_ws();
            let test = self.parse_or_test()?;
            let whitespace_before_else = self
                .try_word("else")
                .ok_or_else(|| self.error("expected 'else'"))?;
            let whitespace_after_else = self.eat_paren_ws();
            let orelse = self.parse_expression()?;
            return Ok(Expression::IfExp(Box::new(IfExp {
                body,
                whitespace_before_if,
                whitespace_after_if,
                test,
                whitespace_before_else,
                whitespace_after_else,
                orelse,
            })));
        }
        Ok(body)
    }

    fn parse_or_test(&mut self) -> Result<Expression> {
        let mut left = self.parse_and_test()?;
        while let Some(whitespace_before) = self.try_word("or") {
            let op = BooleanOp {
                kind: BooleanOpKind::Or,
                whitespace_before,
                whitespace_after: self.eat_paren_ws(),
            };
            let right = self.parse_and_test()?;
            left = Expression::BooleanOperation(Box::new(BooleanOperation { left, op, right }));
        }
        Ok(left)
    }

    fn parse_and_test(&mut self) -> Result<Expression> {
        let mut left = self.parse_not_test()?;
        while let Some(whitespace_before) = self.try_word("and") {
            let op = BooleanOp {
                kind: BooleanOpKind::And,
                whitespace_before,
                whitespace_after: self.eat_paren_ws(),
            };
            let right = self.parse_not_test()?;
            left = Expression::BooleanOperation(Box::new(BooleanOperation { left, op, right }));
        }
        Ok(left)
    }

    fn parse_not_test(&mut self) -> Result<Expression> {
        if self.peek_word() == Some("not") {
            self.pos += "not".len();
            let op = UnaryOp {
                kind: UnaryOpKind::Not,
                whitespace_after: self.eat_paren_ws(),
            };
            let expression = self.parse_not_test()?;
            return Ok(Expression::UnaryOperation(Box::new(UnaryOperation {
                op,
                expression,
            })));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expression> {
        let left = self.parse_bitor()?;
        let mut comparisons = Vec::new();
        loop {
            let kind_ws = if let Some(ws) = self.try_op("==") {
                Some((CompOpKind::Equal, ws))
            } else if let Some(ws) = self.try_op("!=") {
                Some((CompOpKind::NotEqual, ws))
            } else if let Some(ws) = self.try_op("<=") {
                Some((CompOpKind::LessThanEqual, ws))
            } else if let Some(ws) = self.try_op(">=") {
                Some((CompOpKind::GreaterThanEqual, ws))
            } else if let Some(ws) = self.try_op("<") {
                Some((CompOpKind::LessThan, ws))
            } else if let Some(ws) = self.try_op(">") {
                Some((CompOpKind::GreaterThan, ws))
            } else if let Some(ws) = self.try_word("in") {
                Some((CompOpKind::In, ws))
            } else if let Some(ws) = self.try_word("not") {
                let between = self
                    .try_word("in")
                    .ok_or_else(|| self.error("expected 'in'"))?;
                Some((
                    CompOpKind::NotIn {
                        whitespace_between: between,
                    },
                    ws,
                ))
            } else if let Some(ws) = self.try_word("is") {
                match self.try_word("not") {
                    Some(between) => Some((
                        CompOpKind::IsNot {
                            whitespace_between: between,
                        },
                        ws,
                    )),
                    None => Some((CompOpKind::Is, ws)),
                }
            } else {
                None
            };
            match kind_ws {
                Some((kind, whitespace_before)) => {
                    let operator = CompOp {
                        kind,
                        whitespace_before,
                        whitespace_after: self.eat_paren_ws(),
                    };
                    let comparator = self.parse_bitor()?;
                    comparisons.push(ComparisonTarget {
                        operator,
                        comparator,
                    });
                }
                None => break,
            }
        }
        if comparisons.is_empty() {
            Ok(left)
        } else {
            Ok(Expression::Comparison(Box::new(Comparison {
                left,
                comparisons,
            })))
        }
    }

    fn parse_binary_level<F>(
        &mut self,
        ops: &[(&'static str, BinaryOpKind)],
        mut next: F,
    ) -> Result<Expression>
    where
        F: FnMut(&mut Self) -> Result<Expression>,
    {
        let mut left = next(self)?;
        'outer: loop {
            for (text, kind) in ops {
                if let Some(whitespace_before) = self.try_op(text) {
                    let op = BinaryOp {
                        kind: *kind,
                        whitespace_before,
                        whitespace_after: self.eat_paren_ws(),
                    };
                    let right = next(self)?;
                    left = Expression::BinaryOperation(Box::new(BinaryOperation {
                        left,
                        op,
                        right,
                    }));
                    continue 'outer;
                }
            }
            break;
        }
        Ok(left)
    }

    fn parse_bitor(&mut self) -> Result<Expression> {
        self.parse_binary_level(&[("|", BinaryOpKind::BitOr)], |p| p.parse_bitxor())
    }

    fn parse_bitxor(&mut self) -> Result<Expression> {
        self.parse_binary_level(&[("^", BinaryOpKind::BitXor)], |p| p.parse_bitand())
    }

    fn parse_bitand(&mut self) -> Result<Expression> {
        self.parse_binary_level(&[("&", BinaryOpKind::BitAnd)], |p| p.parse_shift())
    }

    fn parse_shift(&mut self) -> Result<Expression> {
        self.parse_binary_level(
            &[
                ("<<", BinaryOpKind::LeftShift),
                (">>", BinaryOpKind::RightShift),
            ],
            |p| p.parse_arith(),
        )
    }

    fn parse_arith(&mut self) -> Result<Expression> {
        self.parse_binary_level(
            &[("+", BinaryOpKind::Add), ("-", BinaryOpKind::Subtract)],
            |p| p.parse_term(),
        )
    }

    fn parse_term(&mut self) -> Result<Expression> {
        self.parse_binary_level(
            &[
                ("*", BinaryOpKind::Multiply),
                ("@", BinaryOpKind::MatrixMultiply),
                ("//", BinaryOpKind::FloorDivide),
                ("/", BinaryOpKind::Divide),
                ("%", BinaryOpKind::Modulo),
            ],
            |p| p.parse_factor(),
        )
    }

    fn parse_factor(&mut self) -> Result<Expression> {
        let kind = match self.peek() {
            Some('+') => Some(UnaryOpKind::Plus),
            Some('-') => Some(UnaryOpKind::Minus),
            Some('~') => Some(UnaryOpKind::BitInvert),
            _ => None,
        };
        if let Some(kind) = kind {
            self.bump();
            let op = UnaryOp {
                kind,
                whitespace_after: self.eat_paren_ws(),
            };
            let expression = self.parse_factor()?;
            return Ok(Expression::UnaryOperation(Box::new(UnaryOperation {
                op,
                expression,
            })));
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Expression> {
        let base = self.parse_await_expr()?;
        if let Some(whitespace_before) = self.try_op("**") {
            let op = BinaryOp {
                kind: BinaryOpKind::Power,
                whitespace_before,
                whitespace_after: self.eat_paren_ws(),
            };
            let right = self.parse_factor()?;
            return Ok(Expression::BinaryOperation(Box::new(BinaryOperation {
                left: base,
                op,
                right,
            })));
        }
        Ok(base)
    }

    fn parse_await_expr(&mut self) -> Result<Expression> {
        if self.peek_word() == Some("await") {
            self.pos += "await".len();
            let whitespace_after_await = self.eat_paren_ws();
            let expression = self.parse_await_expr()?;
            return Ok(Expression::Await(Box::new(Await {
                whitespace_after_await,
                expression,
            })));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expression> {
        let start = self.pos;
        let mut expr = self.parse_atom()?;
        loop {
            if let Some(whitespace_after_func) = self.try_op("(") {
                self.paren_depth += 1;
                let whitespace_before_args = self.eat_paren_ws();
                let args = self.parse_args()?;
                self.paren_depth -= 1;
                self.expect(")")?;
                expr = Expression::Call(Box::new(Call {
                    func: expr,
                    whitespace_after_func,
                    whitespace_before_args,
                    args,
                }));
            } else if let Some(whitespace_after_value) = self.try_op("[") {
                self.paren_depth += 1;
                let lbracket = LeftSquareBracket {
                    whitespace_after: self.eat_paren_ws(),
                };
                let (slice, rbracket) = self.parse_subscript_elements()?;
                self.paren_depth -= 1;
                self.expect("]")?;
                expr = Expression::Subscript(Box::new(Subscript {
                    value: expr,
                    whitespace_after_value,
                    lbracket,
                    slice,
                    rbracket,
                }));
            } else if let Some(ws_before_dot) = self.try_op(".") {
                let whitespace_after_dot = self.eat_paren_ws();
                let attr = self.parse_name()?;
                expr = Expression::Attribute(Box::new(Attribute {
                    value: expr,
                    dot: Dot {
                        whitespace_before: ws_before_dot,
                        whitespace_after: whitespace_after_dot,
                    },
                    attr,
                    span: self.span_from(start),
                }));
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_args(&mut self) -> Result<Vec<Arg>> {
        let mut args = Vec::new();
        loop {
            let save = self.pos;
            let _ = self.eat_paren_ws();
            if self.peek() == Some(')') || self.at_eof() {
                self.pos = save;
                return Ok(args);
            }
            self.pos = save;

            let (star, whitespace_after_star): (&'static str, _) = if self.eat("**") {
                ("**", self.eat_paren_ws())
            } else if self.eat("*") {
                ("*", self.eat_paren_ws())
            } else {
                ("", ParenthesizableWhitespace::default())
            };

            // Keyword argument: `name=value` with no comparison ambiguity.
            let mut keyword = None;
            let mut equal = None;
            let value;
            if star.is_empty() {
                let kw_save = self.pos;
                if let Some(word) = self.peek_word() {
                    if !KEYWORDS.contains(&word) {
                        let name = self.parse_name()?;
                        if let Some(ws_before) = self.try_op("=") {
                            keyword = Some(name);
                            equal = Some(AssignEqual {
                                whitespace_before: ws_before,
                                whitespace_after: self.eat_paren_ws(),
                            });
                        } else {
                            self.pos = kw_save;
                        }
                    }
                }
                value = self.parse_expression()?;
            } else {
                value = self.parse_expression()?;
            }

            // A bare generator expression as an argument.
            let value = match self.try_comp_for()? {
                Some(for_in) => Expression::GeneratorExp(Box::new(GeneratorExp {
                    lpar: None,
                    elt: value,
                    for_in,
                    rpar: None,
                })),
                None => value,
            };

            let save_after = self.pos;
            let trailing_ws = self.eat_paren_ws();
            if self.peek() == Some(',') {
                self.pos = save_after;
                let comma = self.try_comma();
                args.push(Arg {
                    star,
                    whitespace_after_star,
                    keyword,
                    equal,
                    value,
                    whitespace_after_arg: ParenthesizableWhitespace::default(),
                    comma,
                });
            } else {
                args.push(Arg {
                    star,
                    whitespace_after_star,
                    keyword,
                    equal,
                    value,
                    whitespace_after_arg: trailing_ws,
                    comma: None,
                });
                return Ok(args);
            }
        }
    }

    fn parse_subscript_elements(
        &mut self,
    ) -> Result<(Vec<SubscriptElement>, RightSquareBracket)> {
        let mut elements = Vec::new();
        loop {
            let save = self.pos;
            let ws = self.eat_paren_ws();
            if self.peek() == Some(']') {
                return Ok((
                    elements,
                    RightSquareBracket {
                        whitespace_before: ws,
                    },
                ));
            }
            self.pos = save;

            let lower = if self.slice_colon_next() {
                None
            } else {
                Some(self.parse_expression()?)
            };
            let slice = match self.try_op(":") {
                Some(ws_before) => {
                    let first_colon = Colon {
                        whitespace_before: ws_before,
                        whitespace_after: self.eat_paren_ws(),
                    };
                    let upper = if self.slice_end_next() {
                        None
                    } else {
                        Some(self.parse_expression()?)
                    };
                    let (second_colon, step) = match self.try_op(":") {
                        Some(ws_before_2) => {
                            let colon = Colon {
                                whitespace_before: ws_before_2,
                                whitespace_after: self.eat_paren_ws(),
                            };
                            let step = if self.slice_end_next() {
                                None
                            } else {
                                Some(self.parse_expression()?)
                            };
                            (Some(colon), step)
                        }
                        None => (None, None),
                    };
                    BaseSlice::Slice(Slice {
                        lower,
                        first_colon,
                        upper,
                        second_colon,
                        step,
                    })
                }
                None => BaseSlice::Index(Index {
                    value: lower.ok_or_else(|| self.error("expected a subscript"))?,
                }),
            };
            let comma = self.try_comma();
            let done = comma.is_none();
            elements.push(SubscriptElement { slice, comma });
            if done {
                let ws = self.eat_paren_ws();
                return Ok((
                    elements,
                    RightSquareBracket {
                        whitespace_before: ws,
                    },
                ));
            }
        }
    }

    fn slice_colon_next(&mut self) -> bool {
        let save = self.pos;
        let _ = self.eat_paren_ws();
        let hit = self.starts_with(":") && !self.starts_with(":=");
        self.pos = save;
        hit
    }

    fn slice_end_next(&mut self) -> bool {
        let save = self.pos;
        let _ = self.eat_paren_ws();
        let hit = matches!(self.peek(), Some(']') | Some(',') | Some(':'));
        self.pos = save;
        hit
    }
}


// ============================================================================
// Atoms, displays, and comprehensions
// ============================================================================

impl<'a> Parser<'a> {
    fn parse_atom(&mut self) -> Result<Expression> {
        match self.peek() {
            Some('(') => self.parse_paren_atom(),
            Some('[') => self.parse_list_atom(),
            Some('{') => self.parse_brace_atom(),
            Some('.') if self.starts_with("...") => {
                self.pos += 3;
                Ok(Expression::Ellipsis(EllipsisLit))
            }
            Some('.') if self.rest()[1..].starts_with(|ch: char| ch.is_ascii_digit()) => {
                self.parse_number()
            }
            Some(ch) if ch.is_ascii_digit() => self.parse_number(),
            _ if self.is_string_start() => self.parse_string_expression(),
            _ => match self.peek_word() {
                Some(word) if !KEYWORDS.contains(&word) => {
                    Ok(Expression::Name(self.parse_name()?))
                }
                Some(word) => Err(self.error(format!("unexpected keyword '{word}'"))),
                None => Err(self.error("expected an expression")),
            },
        }
    }

    /// An element value: a starred expression or a full expression.
    fn parse_star_or_expr(&mut self) -> Result<Expression> {
        if self.starts_with("*") && !self.starts_with("**") {
            self.pos += 1;
            let whitespace_after_star = self.eat_paren_ws();
            let expression = self.parse_bitor()?;
            return Ok(Expression::Starred(Box::new(Starred {
                whitespace_after_star,
                expression,
            })));
        }
        self.parse_expression()
    }

    /// A single assignment/loop target: starred or bitwise-or level, so
    /// that a following `in` keyword is left alone.
    fn parse_star_target(&mut self) -> Result<Expression> {
        if self.starts_with("*") && !self.starts_with("**") {
            self.pos += 1;
            let whitespace_after_star = self.eat_paren_ws();
            let expression = self.parse_bitor()?;
            return Ok(Expression::Starred(Box::new(Starred {
                whitespace_after_star,
                expression,
            })));
        }
        self.parse_bitor()
    }

    fn target_list_end(&mut self) -> bool {
        if self.peek_word() == Some("in") {
            return true;
        }
        matches!(
            self.peek(),
            None | Some(':') | Some('=') | Some('\n') | Some('#') | Some(')') | Some(']') | Some(';')
        )
    }

    /// A comma-separated target list, as in `for a, b in ...`.
    fn parse_target_list(&mut self) -> Result<Expression> {
        let mut elements: Vec<Element> = Vec::new();
        let mut current = self.parse_star_target()?;
        loop {
            match self.try_comma() {
                Some(comma) => {
                    elements.push(Element {
                        value: current,
                        comma: Some(comma),
                    });
                    if self.target_list_end() {
                        return Ok(Expression::Tuple(Tuple {
                            lpar: None,
                            elements,
                            rpar: None,
                        }));
                    }
                    current = self.parse_star_target()?;
                }
                None => {
                    if elements.is_empty() {
                        return Ok(current);
                    }
                    elements.push(Element {
                        value: current,
                        comma: None,
                    });
                    return Ok(Expression::Tuple(Tuple {
                        lpar: None,
                        elements,
                        rpar: None,
                    }));
                }
            }
        }
    }

    fn expression_list_end(&mut self) -> bool {
        if self.at_statement_end() {
            return true;
        }
        matches!(
            self.peek(),
            Some('=') | Some(')') | Some(']') | Some('}') | Some(':')
        )
    }

    /// A comma-separated expression list; bare commas build an
    /// unparenthesized tuple.
    fn parse_expression_list(&mut self) -> Result<Expression> {
        let mut elements: Vec<Element> = Vec::new();
        let mut current = self.parse_star_or_expr()?;
        loop {
            match self.try_comma() {
                Some(comma) => {
                    elements.push(Element {
                        value: current,
                        comma: Some(comma),
                    });
                    if self.expression_list_end() {
                        return Ok(Expression::Tuple(Tuple {
                            lpar: None,
                            elements,
                            rpar: None,
                        }));
                    }
                    current = self.parse_star_or_expr()?;
                }
                None => {
                    if elements.is_empty() {
                        return Ok(current);
                    }
                    elements.push(Element {
                        value: current,
                        comma: None,
                    });
                    return Ok(Expression::Tuple(Tuple {
                        lpar: None,
                        elements,
                        rpar: None,
                    }));
                }
            }
        }
    }

    /// Parse elements up to (but not through) `closing`, returning the
    /// whitespace before the closing bracket.
    fn parse_elements_until(
        &mut self,
        elements: &mut Vec<Element>,
        closing: char,
    ) -> Result<ParenthesizableWhitespace> {
        loop {
            let save = self.pos;
            let ws = self.eat_paren_ws();
            if self.peek() == Some(closing) {
                return Ok(ws);
            }
            self.pos = save;
            let value = self.parse_star_or_expr()?;
            match self.try_comma() {
                Some(comma) => elements.push(Element {
                    value,
                    comma: Some(comma),
                }),
                None => {
                    elements.push(Element { value, comma: None });
                    return Ok(self.eat_paren_ws());
                }
            }
        }
    }

    fn parse_paren_atom(&mut self) -> Result<Expression> {
        self.expect("(")?;
        self.paren_depth += 1;
        let lpar = LeftParen {
            whitespace_after: self.eat_paren_ws(),
        };
        if self.starts_with(")") {
            self.pos += 1;
            self.paren_depth -= 1;
            return Ok(Expression::Tuple(Tuple {
                lpar: Some(lpar),
                elements: Vec::new(),
                rpar: Some(RightParen {
                    whitespace_before: ParenthesizableWhitespace::default(),
                }),
            }));
        }
        let first = self.parse_star_or_expr()?;
        if let Some(for_in) = self.try_comp_for()? {
            let ws = self.eat_paren_ws();
            self.paren_depth -= 1;
            self.expect(")")?;
            return Ok(Expression::GeneratorExp(Box::new(GeneratorExp {
                lpar: Some(lpar),
                elt: first,
                for_in,
                rpar: Some(RightParen {
                    whitespace_before: ws,
                }),
            })));
        }
        if let Some(comma) = self.try_comma() {
            let mut elements = vec![Element {
                value: first,
                comma: Some(comma),
            }];
            let ws = self.parse_elements_until(&mut elements, ')')?;
            self.paren_depth -= 1;
            self.expect(")")?;
            return Ok(Expression::Tuple(Tuple {
                lpar: Some(lpar),
                elements,
                rpar: Some(RightParen {
                    whitespace_before: ws,
                }),
            }));
        }
        let ws = self.eat_paren_ws();
        self.paren_depth -= 1;
        self.expect(")")?;
        Ok(Expression::Parenthesized(Box::new(Parenthesized {
            lpar,
            expression: first,
            rpar: RightParen {
                whitespace_before: ws,
            },
        })))
    }

    fn parse_list_atom(&mut self) -> Result<Expression> {
        self.expect("[")?;
        self.paren_depth += 1;
        let lbracket = LeftSquareBracket {
            whitespace_after: self.eat_paren_ws(),
        };
        let save = self.pos;
        let ws = self.eat_paren_ws();
        if self.starts_with("]") {
            self.pos += 1;
            self.paren_depth -= 1;
            return Ok(Expression::List(List {
                lbracket,
                elements: Vec::new(),
                rbracket: RightSquareBracket {
                    whitespace_before: ws,
                },
            }));
        }
        self.pos = save;
        let first = self.parse_star_or_expr()?;
        if let Some(for_in) = self.try_comp_for()? {
            let ws = self.eat_paren_ws();
            self.paren_depth -= 1;
            self.expect("]")?;
            return Ok(Expression::ListComp(Box::new(ListComp {
                lbracket,
                elt: first,
                for_in,
                rbracket: RightSquareBracket {
                    whitespace_before: ws,
                },
            })));
        }
        let mut elements = Vec::new();
        let ws = match self.try_comma() {
            Some(comma) => {
                elements.push(Element {
                    value: first,
                    comma: Some(comma),
                });
                self.parse_elements_until(&mut elements, ']')?
            }
            None => {
                elements.push(Element {
                    value: first,
                    comma: None,
                });
                self.eat_paren_ws()
            }
        };
        self.paren_depth -= 1;
        self.expect("]")?;
        Ok(Expression::List(List {
            lbracket,
            elements,
            rbracket: RightSquareBracket {
                whitespace_before: ws,
            },
        }))
    }

    fn parse_dict_elements(
        &mut self,
        elements: &mut Vec<DictElement>,
    ) -> Result<ParenthesizableWhitespace> {
        loop {
            let save = self.pos;
            let ws = self.eat_paren_ws();
            if self.starts_with("}") {
                return Ok(ws);
            }
            self.pos = save;
            if self.eat("**") {
                let whitespace_after_star = self.eat_paren_ws();
                let value = self.parse_bitor()?;
                let comma = self.try_comma();
                let done = comma.is_none();
                elements.push(DictElement::Starred {
                    whitespace_after_star,
                    value,
                    comma,
                });
                if done {
                    return Ok(self.eat_paren_ws());
                }
                continue;
            }
            let key = self.parse_expression()?;
            let ws_before_colon = self
                .try_op(":")
                .ok_or_else(|| self.error("expected ':' in dict display"))?;
            let colon = Colon {
                whitespace_before: ws_before_colon,
                whitespace_after: self.eat_paren_ws(),
            };
            let value = self.parse_expression()?;
            let comma = self.try_comma();
            let done = comma.is_none();
            elements.push(DictElement::Simple {
                key,
                colon,
                value,
                comma,
            });
            if done {
                return Ok(self.eat_paren_ws());
            }
        }
    }

    fn parse_brace_atom(&mut self) -> Result<Expression> {
        self.expect("{")?;
        self.paren_depth += 1;
        let lbrace = LeftCurlyBrace {
            whitespace_after: self.eat_paren_ws(),
        };
        let save = self.pos;
        let ws = self.eat_paren_ws();
        if self.starts_with("}") {
            self.pos += 1;
            self.paren_depth -= 1;
            return Ok(Expression::Dict(Dict {
                lbrace,
                elements: Vec::new(),
                rbrace: RightCurlyBrace {
                    whitespace_before: ws,
                },
            }));
        }
        self.pos = save;

        if self.starts_with("**") {
            let mut elements = Vec::new();
            let ws = self.parse_dict_elements(&mut elements)?;
            self.paren_depth -= 1;
            self.expect("}")?;
            return Ok(Expression::Dict(Dict {
                lbrace,
                elements,
                rbrace: RightCurlyBrace {
                    whitespace_before: ws,
                },
            }));
        }

        let first = self.parse_star_or_expr()?;
        if let Some(ws_before_colon) = self.try_op(":") {
            let colon = Colon {
                whitespace_before: ws_before_colon,
                whitespace_after: self.eat_paren_ws(),
            };
            let value = self.parse_expression()?;
            if let Some(for_in) = self.try_comp_for()? {
                let ws = self.eat_paren_ws();
                self.paren_depth -= 1;
                self.expect("}")?;
                return Ok(Expression::DictComp(Box::new(DictComp {
                    lbrace,
                    key: first,
                    colon,
                    value,
                    for_in,
                    rbrace: RightCurlyBrace {
                        whitespace_before: ws,
                    },
                })));
            }
            let mut elements = Vec::new();
            let comma = self.try_comma();
            let done = comma.is_none();
            elements.push(DictElement::Simple {
                key: first,
                colon,
                value,
                comma,
            });
            let ws = if done {
                self.eat_paren_ws()
            } else {
                self.parse_dict_elements(&mut elements)?
            };
            self.paren_depth -= 1;
            self.expect("}")?;
            return Ok(Expression::Dict(Dict {
                lbrace,
                elements,
                rbrace: RightCurlyBrace {
                    whitespace_before: ws,
                },
            }));
        }

        if let Some(for_in) = self.try_comp_for()? {
            let ws = self.eat_paren_ws();
            self.paren_depth -= 1;
            self.expect("}")?;
            return Ok(Expression::SetComp(Box::new(SetComp {
                lbrace,
                elt: first,
                for_in,
                rbrace: RightCurlyBrace {
                    whitespace_before: ws,
                },
            })));
        }
        let mut elements = Vec::new();
        let ws = match self.try_comma() {
            Some(comma) => {
                elements.push(Element {
                    value: first,
                    comma: Some(comma),
                });
                self.parse_elements_until(&mut elements, '}')?
            }
            None => {
                elements.push(Element {
                    value: first,
                    comma: None,
                });
                self.eat_paren_ws()
            }
        };
        self.paren_depth -= 1;
        self.expect("}")?;
        Ok(Expression::Set(SetExp {
            lbrace,
            elements,
            rbrace: RightCurlyBrace {
                whitespace_before: ws,
            },
        }))
    }

    fn try_comp_for(&mut self) -> Result<Option<CompFor>> {
        let save = self.pos;
        if let Some(whitespace_before) = self.try_word("async") {
            let ws_after_async = self.eat_paren_ws();
            if self.eat_word("for") {
                let comp = self.finish_comp_for(
                    whitespace_before,
                    Some(Asynchronous {
                        whitespace_after: ws_after_async,
                    }),
                )?;
                return Ok(Some(comp));
            }
            self.pos = save;
            return Ok(None);
        }
        if let Some(whitespace_before) = self.try_word("for") {
            let comp = self.finish_comp_for(whitespace_before, None)?;
            return Ok(Some(comp));
        }
        Ok(None)
    }

    fn finish_comp_for(
        &mut self,
        whitespace_before: ParenthesizableWhitespace,
        asynchronous: Option<Asynchronous>,
    ) -> Result<CompFor> {
        let whitespace_after_for = self.eat_paren_ws();
        let target = self.parse_target_list()?;
        let whitespace_before_in = self
            .try_word("in")
            .ok_or_else(|| self.error("expected 'in'"))?;
        let whitespace_after_in = self.eat_paren_ws();
        let iter = self.parse_or_test()?;
        let mut ifs = Vec::new();
        while let Some(ws_before_if) = self.try_word("if") {
            let whitespace_before_test = self.eat_paren_ws();
            let test = self.parse_or_test()?;
            ifs.push(CompIf {
                whitespace_before: ws_before_if,
                whitespace_before_test,
                test,
            });
        }
        let inner_for_in = self.try_comp_for()?.map(Box::new);
        Ok(CompFor {
            whitespace_before,
            asynchronous,
            whitespace_after_for,
            target,
            whitespace_before_in,
            whitespace_after_in,
            iter,
            ifs,
            inner_for_in,
        })
    }

    fn parse_lambda(&mut self) -> Result<Expression> {
        self.pos += "lambda".len();
        let whitespace_after_lambda = self.eat_paren_ws();
        let params = self.parse_parameters(false, ':')?;
        let ws_before_colon = self.eat_paren_ws();
        self.expect(":")?;
        let colon = Colon {
            whitespace_before: ws_before_colon,
            whitespace_after: self.eat_paren_ws(),
        };
        let body = self.parse_expression()?;
        Ok(Expression::Lambda(Box::new(Lambda {
            whitespace_after_lambda,
            params,
            colon,
            body,
        })))
    }

    fn parse_yield(&mut self) -> Result<Expression> {
        self.pos += "yield".len();
        let whitespace_after_yield = self.eat_paren_ws();
        if self.peek_word() == Some("from") {
            self.pos += "from".len();
            let whitespace_after_from = self.eat_paren_ws();
            let expression = self.parse_expression()?;
            return Ok(Expression::Yield(Box::new(Yield {
                whitespace_after_yield,
                value: Some(Box::new(YieldValue::From {
                    whitespace_after_from,
                    expression,
                })),
            })));
        }
        let ended = self.at_statement_end()
            || matches!(self.peek(), Some(')') | Some(']') | Some('}') | Some(','));
        if ended {
            return Ok(Expression::Yield(Box::new(Yield {
                whitespace_after_yield,
                value: None,
            })));
        }
        let value = self.parse_expression_list()?;
        Ok(Expression::Yield(Box::new(Yield {
            whitespace_after_yield,
            value: Some(Box::new(YieldValue::Value(value))),
        })))
    }

    fn parse_parameters(
        &mut self,
        allow_annotations: bool,
        terminator: char,
    ) -> Result<Parameters> {
        let mut items = Vec::new();
        loop {
            let save = self.pos;
            let _ = self.eat_paren_ws();
            let done = matches!(self.peek(), Some(ch) if ch == terminator) || self.at_eof();
            self.pos = save;
            if done {
                return Ok(Parameters { items });
            }

            if self.starts_with("/") {
                self.pos += 1;
                items.push(ParamItem::Slash(ParamSlash {
                    comma: self.try_comma(),
                }));
                continue;
            }

            let (star, whitespace_after_star) = if self.eat("**") {
                ("**", self.eat_paren_ws())
            } else if self.starts_with("*") {
                self.pos += 1;
                let star_save = self.pos;
                let ws = self.eat_paren_ws();
                if self.peek_word().is_some() {
                    ("*", ws)
                } else {
                    self.pos = star_save;
                    items.push(ParamItem::Star(ParamStar {
                        comma: self.try_comma(),
                    }));
                    continue;
                }
            } else {
                ("", ParenthesizableWhitespace::default())
            };

            let name = self.parse_name()?;
            let annotation = if allow_annotations {
                match self.try_op(":") {
                    Some(ws_before) => Some(Annotation {
                        colon: Colon {
                            whitespace_before: ws_before,
                            whitespace_after: self.eat_paren_ws(),
                        },
                        annotation: self.parse_expression()?,
                    }),
                    None => None,
                }
            } else {
                None
            };
            let (equal, default) = match self.try_op("=") {
                Some(ws_before) => (
                    Some(AssignEqual {
                        whitespace_before: ws_before,
                        whitespace_after: self.eat_paren_ws(),
                    }),
                    Some(self.parse_expression()?),
                ),
                None => (None, None),
            };
            let comma = self.try_comma();
            let done = comma.is_none();
            items.push(ParamItem::Param(Param {
                star,
                whitespace_after_star,
                name,
                annotation,
                equal,
                default,
                comma,
            }));
            if done {
                return Ok(Parameters { items });
            }
        }
    }
}

// ============================================================================
// Strings and numbers
// ============================================================================

impl<'a> Parser<'a> {
    fn string_prefix(text: &str) -> Option<(usize, bool)> {
        let mut len = 0;
        let mut is_f = false;
        for ch in text.chars() {
            match ch {
                'r' | 'R' | 'b' | 'B' | 'u' | 'U' => len += 1,
                'f' | 'F' => {
                    len += 1;
                    is_f = true;
                }
                '"' | '\'' => return Some((len, is_f)),
                _ => return None,
            }
            if len > 2 {
                return None;
            }
        }
        None
    }

    fn is_string_start(&self) -> bool {
        Self::string_prefix(self.rest()).is_some()
    }

    fn parse_string_atom(&mut self) -> Result<StringAtom> {
        let start = self.pos;
        let (prefix_len, is_f) = Self::string_prefix(self.rest())
            .ok_or_else(|| self.error("expected a string literal"))?;
        self.pos += prefix_len;
        let quote = if self.starts_with("\"\"\"") {
            "\"\"\""
        } else if self.starts_with("'''") {
            "'''"
        } else if self.starts_with("\"") {
            "\""
        } else {
            "'"
        };
        self.pos += quote.len();
        let triple = quote.len() == 3;
        loop {
            if self.at_eof() {
                return Err(self.error("unterminated string literal"));
            }
            if self.starts_with(quote) {
                self.pos += quote.len();
                break;
            }
            let ch = self.peek().unwrap_or('\0');
            if ch == '\\' {
                self.bump();
                if self.bump().is_none() {
                    return Err(self.error("unterminated string literal"));
                }
                continue;
            }
            if !triple && ch == '\n' {
                return Err(self.error("unterminated string literal"));
            }
            self.bump();
        }
        let value = self.src[start..self.pos].to_owned();
        let span = self.span_from(start);
        Ok(if is_f {
            StringAtom::Formatted(FormattedString { value, span })
        } else {
            StringAtom::Simple(SimpleString { value, span })
        })
    }

    fn parse_string_expression(&mut self) -> Result<Expression> {
        let mut parts = vec![self.parse_string_atom()?];
        let mut separators = Vec::new();
        loop {
            let save = self.pos;
            let ws = self.eat_paren_ws();
            if self.is_string_start() {
                separators.push(ws);
                parts.push(self.parse_string_atom()?);
            } else {
                self.pos = save;
                break;
            }
        }
        if parts.len() == 1 {
            return Ok(match parts.remove(0) {
                StringAtom::Simple(s) => Expression::SimpleString(s),
                StringAtom::Formatted(f) => Expression::FormattedString(f),
            });
        }
        Ok(Expression::ConcatenatedString(ConcatenatedString {
            parts,
            separators,
        }))
    }

    fn parse_number(&mut self) -> Result<Expression> {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let radix_prefixed = {
            let lower = rest.get(..2).map(|s| s.to_ascii_lowercase());
            matches!(lower.as_deref(), Some("0x") | Some("0o") | Some("0b"))
        };
        let mut i = 0;
        while i < bytes.len() {
            let c = bytes[i] as char;
            if c.is_ascii_alphanumeric() || c == '_' {
                i += 1;
            } else if c == '.' {
                let next = bytes.get(i + 1).map(|b| *b as char);
                let float_dot =
                    !radix_prefixed && next.map_or(true, |n| n.is_ascii_digit() || !is_ident_start(n));
                if float_dot {
                    i += 1;
                } else {
                    break;
                }
            } else if (c == '+' || c == '-')
                && !radix_prefixed
                && i > 0
                && matches!(bytes[i - 1] as char, 'e' | 'E')
            {
                i += 1;
            } else {
                break;
            }
        }
        if i == 0 {
            return Err(self.error("expected a number"));
        }
        let text = rest[..i].to_owned();
        self.pos += i;
        let lower = text.to_ascii_lowercase();
        let is_float = !radix_prefixed
            && (lower.contains('.') || lower.contains('e') || lower.ends_with('j'));
        Ok(if is_float {
            Expression::Float(Float { value: text })
        } else {
            Expression::Integer(Integer { value: text })
        })
    }
}
