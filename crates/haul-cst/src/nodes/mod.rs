// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! CST node types.

mod expression;
mod op;
mod statement;
mod traits;
mod whitespace;

pub use expression::{
    Annotation, Arg, Asynchronous, Attribute, Await, BaseSlice, BinaryOperation,
    BooleanOperation, Call, CompFor, CompIf, Comparison, ComparisonTarget, ConcatenatedString,
    Dict, DictComp, DictElement, Element, EllipsisLit, Expression, Float, FormattedString,
    GeneratorExp, IfExp, Index, Integer, Lambda, List, ListComp, Name, NamedExpr, Param,
    ParamItem, ParamSlash, ParamStar, Parameters, Parenthesized, SetComp, SetExp, SimpleString,
    Slice, Starred, StringAtom, Subscript, SubscriptElement, Tuple, UnaryOperation, Yield,
    YieldValue,
};
pub use op::{
    AssignEqual, AugOp, BinaryOp, BinaryOpKind, BooleanOp, BooleanOpKind, Colon, Comma, CompOp,
    CompOpKind, Dot, ImportStar, LeftCurlyBrace, LeftParen, LeftSquareBracket, RightCurlyBrace,
    RightParen, RightSquareBracket, Semicolon, UnaryOp, UnaryOpKind,
};
pub use statement::{
    AnnAssign, AsName, Assert, Assign, AssignTarget, AugAssign, ClassArgs, ClassDef, CompoundStatement,
    Decorator, Del, Else, ExceptHandler, Expr, Finally, For, FunctionDef, Global, If, Import,
    ImportAlias, ImportFrom, ImportNames, IndentedBlock, Module, NameItem, NameOrAttribute,
    Nonlocal, OrElse, Raise, RaiseFrom, Return, ReturnAnnotation, SimpleStatementLine,
    SimpleStatementSuite, SmallStatement, Statement, Suite, Try, While, With, WithItem,
};
pub use traits::{LineCol, Span, Spanned};
pub use whitespace::{
    Comment, EmptyLine, Newline, ParenthesizableWhitespace, SimpleWhitespace, TrailingWhitespace,
};
