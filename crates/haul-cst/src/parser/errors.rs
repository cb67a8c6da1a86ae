// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Parser error types.

use thiserror::Error;

/// An error produced while parsing Python source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("parse error at L{line} C{col}: {message}")]
pub struct ParserError {
    pub message: String,
    /// 1-based line of the error.
    pub line: u32,
    /// 0-based column of the error.
    pub col: u32,
}

pub type Result<T> = std::result::Result<T, ParserError>;
