// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Token definitions for the lexer.

use crate::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(i64),

    // Names
    Ident(String),
    /// `@name`, a built-in written directly in source.
    Intrinsic(String),
    /// A run of operator characters, e.g. `+`, `*`, `<=`.
    Op(String),

    // Punctuation
    Eq,
    Arrow,
    HashBrace,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Colon,
    Semi,

    Eof,
}

impl TokenKind {
    /// Human-readable name for error messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Int(_) => "a number",
            TokenKind::Ident(_) => "a name",
            TokenKind::Intrinsic(_) => "an intrinsic",
            TokenKind::Op(_) => "an operator",
            TokenKind::Eq => "'='",
            TokenKind::Arrow => "'->'",
            TokenKind::HashBrace => "'#{'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Semi => "';'",
            TokenKind::Eof => "end of file",
        }
    }
}
