// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use etch_ast::token::{Token, TokenKind};
use etch_ast::Span;
use logos::Logos;

/// Raw token type for logos - values are parsed in a second pass.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
enum RawToken {
    // === Delimiters ===
    #[token("#{")]
    HashBrace,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,

    // === Operator runs ===
    // `=` and `->` are split out of this in `convert_token`.
    #[regex(r"[+*/<>=.\-]+")]
    OpRun,

    // === Literals ===
    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"@[A-Za-z_][A-Za-z_0-9]*")]
    Intrinsic,

    #[regex(r"[A-Za-z_][A-Za-z_0-9]*")]
    Ident,
}

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// Largest literal magnitude; `2^31` is only valid when negated.
const MAX_LITERAL: i64 = 1 << 31;

/// The lexer for etch source code.
pub struct Lexer<'a> {
    source: &'a str,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source, collecting multiple errors.
    pub fn tokenize(&mut self) -> LexResult {
        let mut tokens = Vec::new();
        let mut logos_lexer = RawToken::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }

            let span = logos_lexer.span();
            let slice = logos_lexer.slice();

            let kind = match result {
                Ok(raw) => match convert_token(raw, slice, span.start, span.end) {
                    Ok(kind) => kind,
                    Err(e) => {
                        self.errors.push(e);
                        continue;
                    }
                },
                Err(()) => {
                    let ch = self.source[span.start..].chars().next().unwrap_or('?');
                    self.errors.push(LexError::unexpected_char(ch, span.start));
                    continue;
                }
            };

            tokens.push(Token {
                kind,
                span: Span::new(span.start, span.end),
            });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            span: Span::new(self.source.len(), self.source.len()),
        });

        LexResult {
            tokens,
            errors: std::mem::take(&mut self.errors),
        }
    }
}

/// Convert a raw logos token to a `TokenKind`, parsing literals.
fn convert_token(raw: RawToken, slice: &str, start: usize, end: usize) -> Result<TokenKind, LexError> {
    Ok(match raw {
        RawToken::HashBrace => TokenKind::HashBrace,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semi => TokenKind::Semi,
        RawToken::OpRun => match slice {
            "=" => TokenKind::Eq,
            "->" => TokenKind::Arrow,
            _ => TokenKind::Op(slice.to_string()),
        },
        RawToken::Int => {
            let value = slice
                .parse::<i64>()
                .ok()
                .filter(|v| *v <= MAX_LITERAL)
                .ok_or_else(|| LexError::invalid_number(start, end))?;
            TokenKind::Int(value)
        }
        RawToken::Intrinsic => TokenKind::Intrinsic(slice[1..].to_string()),
        RawToken::Ident => TokenKind::Ident(slice.to_string()),
    })
}

/// Result of tokenizing a source file.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    /// Returns true if lexing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A lexer error with location and friendly message.
#[derive(Debug, Clone)]
pub struct LexError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LexError {}

impl LexError {
    fn unexpected_char(ch: char, pos: usize) -> Self {
        let hint = match ch {
            '#' => Some("module literals start with '#{'".to_string()),
            '@' => Some("intrinsics are written '@name', e.g. '@int'".to_string()),
            _ => None,
        };
        Self {
            span: Span::new(pos, pos + ch.len_utf8()),
            message: format!("Unexpected character '{}'", ch),
            hint,
        }
    }

    fn invalid_number(start: usize, end: usize) -> Self {
        Self {
            span: Span::new(start, end),
            message: "Integer literal out of range".to_string(),
            hint: Some("integer literals must fit in 32 bits".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let result = Lexer::new(src).tokenize();
        assert!(result.is_ok(), "Lex errors: {:?}", result.errors);
        result.tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_definition_and_function() {
        assert_eq!(
            kinds("add2 = (x) -> x + 1"),
            vec![
                TokenKind::Ident("add2".into()),
                TokenKind::Eq,
                TokenKind::LParen,
                TokenKind::Ident("x".into()),
                TokenKind::RParen,
                TokenKind::Arrow,
                TokenKind::Ident("x".into()),
                TokenKind::Op("+".into()),
                TokenKind::Int(1),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_operator_runs() {
        assert_eq!(
            kinds("a <= b == c"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Op("<=".into()),
                TokenKind::Ident("b".into()),
                TokenKind::Op("==".into()),
                TokenKind::Ident("c".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lex_module_literal_and_intrinsic() {
        assert_eq!(
            kinds("m = #{ t = @int(8) }"),
            vec![
                TokenKind::Ident("m".into()),
                TokenKind::Eq,
                TokenKind::HashBrace,
                TokenKind::Ident("t".into()),
                TokenKind::Eq,
                TokenKind::Intrinsic("int".into()),
                TokenKind::LParen,
                TokenKind::Int(8),
                TokenKind::RParen,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_and_newlines_are_skipped() {
        assert_eq!(
            kinds("x = 1 // one\ny = 2"),
            vec![
                TokenKind::Ident("x".into()),
                TokenKind::Eq,
                TokenKind::Int(1),
                TokenKind::Ident("y".into()),
                TokenKind::Eq,
                TokenKind::Int(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unexpected_character_recovers() {
        let result = Lexer::new("x = $ 1").tokenize();
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].span, Span::new(4, 5));
        // Lexing continues past the bad character.
        assert!(result.tokens.iter().any(|t| t.kind == TokenKind::Int(1)));
    }

    #[test]
    fn oversized_literal_is_rejected() {
        let result = Lexer::new("x = 99999999999").tokenize();
        assert!(!result.is_ok());
        assert!(result.errors[0].message.contains("out of range"));
    }
}
