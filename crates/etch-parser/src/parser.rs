// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Recursive descent parser.
//!
//! Operators have no precedence: `a OP expr` is right-recursive, so
//! `a * b + c` parses as `a * (b + c)`.

use etch_ast::syntax::{Expr, ExprKind, Module, Stmt, StmtKind};
use etch_ast::token::{Token, TokenKind};
use etch_ast::Span;

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// The parser for etch source code.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Collected errors during parsing
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token {
                kind: TokenKind::Eof,
                span: Span::new(end, end),
            });
        }
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    /// Record error, return if should continue.
    fn record_error(&mut self, error: ParseError) -> bool {
        self.errors.push(error);
        self.errors.len() < MAX_ERRORS
    }

    /// Skip to the start of the next statement after an error.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        let start = self.pos;

        while !self.at_end() {
            match self.current_kind() {
                TokenKind::LBrace | TokenKind::HashBrace | TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth = depth.saturating_sub(1),
                TokenKind::RBrace if depth == 0 => return,
                TokenKind::RBrace => depth -= 1,
                TokenKind::Semi if depth == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::Ident(_) if depth == 0 && self.pos > start => {
                    if matches!(self.peek(1), TokenKind::Eq) {
                        return;
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if !self.at_end() {
            self.pos += 1;
        }
        tok
    }

    /// End offset of the most recently consumed token.
    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span.end)
            .unwrap_or(0)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(
                kind.display_name(),
                self.current_kind(),
                self.current().span,
            ))
        }
    }

    fn skip_semis(&mut self) {
        while self.match_token(&TokenKind::Semi) {}
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Parse a whole file as one module.
    pub fn parse(&mut self) -> ParseResult {
        let start = self.current().span.start;
        let mut stmts = Vec::new();
        self.skip_semis();

        while !self.at_end() {
            let result = if self.check(&TokenKind::RBrace) {
                Err(ParseError::unmatched_brace(self.current().span))
            } else {
                self.parse_statement()
            };
            match result {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    if !self.record_error(e) {
                        break;
                    }
                    if self.check(&TokenKind::RBrace) {
                        self.advance();
                    }
                    self.synchronize();
                }
            }
            self.skip_semis();
        }

        ParseResult {
            module: Module {
                stmts,
                span: Span::new(start, self.current().span.end),
            },
            errors: std::mem::take(&mut self.errors),
        }
    }

    /// statement = definition | expr
    ///
    /// Both alternatives start with an atom; the token after it decides.
    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        if self.check(&TokenKind::HashBrace) {
            let expr = self.parse_module_literal()?;
            return Ok(Stmt {
                span: expr.span,
                kind: StmtKind::Expr(expr),
            });
        }

        let lhs = self.parse_atom()?;
        if self.match_token(&TokenKind::Eq) {
            let value = self.parse_expr()?;
            let span = lhs.span.to(value.span);
            return Ok(Stmt {
                kind: StmtKind::Definition { binding: lhs, value },
                span,
            });
        }

        let expr = self.finish_expr(lhs)?;
        Ok(Stmt {
            span: expr.span,
            kind: StmtKind::Expr(expr),
        })
    }

    /// Statements up to (not including) the closing `}`.
    fn parse_statements_until_brace(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        self.skip_semis();
        while !self.check(&TokenKind::RBrace) {
            if self.at_end() {
                return Err(ParseError::expected("'}'", self.current_kind(), self.current().span));
            }
            stmts.push(self.parse_statement()?);
            self.skip_semis();
        }
        Ok(stmts)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// expr = "#{" module "}" | function | compound
    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        if self.check(&TokenKind::HashBrace) {
            return self.parse_module_literal();
        }
        let lhs = self.parse_atom()?;
        self.finish_expr(lhs)
    }

    fn parse_module_literal(&mut self) -> Result<Expr, ParseError> {
        let open = self.expect(&TokenKind::HashBrace)?.span;
        let stmts = self.parse_statements_until_brace()?;
        let close = self.expect(&TokenKind::RBrace)?.span;
        let span = open.to(close);
        Ok(Expr::new(ExprKind::Module(Module { stmts, span }), span))
    }

    /// Continue an expression whose leading atom is already parsed.
    ///
    /// function = arglist "->" expr
    /// compound = atom OPNAME expr | atom
    fn finish_expr(&mut self, lhs: Expr) -> Result<Expr, ParseError> {
        if self.check(&TokenKind::Arrow) {
            check_arglist(&lhs)?;
            self.advance();
            let body = self.parse_expr()?;
            let span = lhs.span.to(body.span);
            return Ok(Expr::new(
                ExprKind::Function {
                    arg: Box::new(lhs),
                    body: Box::new(body),
                },
                span,
            ));
        }

        if let TokenKind::Op(op) = self.current_kind().clone() {
            self.advance();
            let rhs = self.parse_expr()?;
            let span = lhs.span.to(rhs.span);
            return Ok(Expr::new(
                ExprKind::Op {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            ));
        }

        Ok(lhs)
    }

    /// atom = postfix [ ":" atom ]
    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let value = self.parse_postfix()?;

        if self.match_token(&TokenKind::Colon) {
            let ty = self.parse_atom()?;
            let span = value.span.to(ty.span);
            return Ok(Expr::new(
                ExprKind::Typed {
                    value: Box::new(value),
                    ty: Box::new(ty),
                },
                span,
            ));
        }

        Ok(value)
    }

    /// postfix = primary { "(" args ")" }, with "(" touching the callee.
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        while self.check(&TokenKind::LParen) && self.current().span.start == self.prev_end() {
            self.advance();
            let args = self.parse_expr_list()?;
            let close = self.expect(&TokenKind::RParen)?.span;
            let span = expr.span.to(close);
            expr = Expr::new(
                ExprKind::Call {
                    func: Box::new(expr),
                    args,
                },
                span,
            );
        }

        Ok(expr)
    }

    /// primary = block | tuple | IDENT | INT | "-" INT | INTRINSIC
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let tok = self.current().clone();
        match tok.kind {
            TokenKind::LBrace => {
                self.advance();
                let stmts = self.parse_statements_until_brace()?;
                let close = self.expect(&TokenKind::RBrace)?.span;
                Ok(Expr::new(ExprKind::Block(stmts), tok.span.to(close)))
            }
            TokenKind::LParen => {
                self.advance();
                let elems = self.parse_expr_list()?;
                let close = self.expect(&TokenKind::RParen)?.span;
                Ok(Expr::new(ExprKind::Tuple(elems), tok.span.to(close)))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::new(ExprKind::Ident(name), tok.span))
            }
            TokenKind::Intrinsic(name) => {
                self.advance();
                Ok(Expr::new(ExprKind::Intrinsic(name), tok.span))
            }
            TokenKind::Int(value) => {
                self.advance();
                if value > i64::from(i32::MAX) {
                    return Err(ParseError::literal_out_of_range(tok.span));
                }
                Ok(Expr::new(ExprKind::Int(value), tok.span))
            }
            TokenKind::Op(ref op) if op == "-" => {
                if let TokenKind::Int(value) = self.peek(1).clone() {
                    let lit = self.tokens[self.pos + 1].span;
                    if lit.start == tok.span.end {
                        self.advance();
                        self.advance();
                        return Ok(Expr::new(ExprKind::Int(-value), tok.span.to(lit)));
                    }
                }
                Err(ParseError::expected("expression", &tok.kind, tok.span))
            }
            _ => Err(ParseError::expected("expression", &tok.kind, tok.span)),
        }
    }

    /// Comma-separated expressions up to (not including) `)`.
    fn parse_expr_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut elems = Vec::new();
        if self.check(&TokenKind::RParen) {
            return Ok(elems);
        }
        loop {
            elems.push(self.parse_expr()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        Ok(elems)
    }
}

/// arglist = "(" [ atom { "," atom } ] ")" | atom
///
/// A parenthesised arglist parses as a tuple, so only its elements need
/// checking.
fn check_arglist(arg: &Expr) -> Result<(), ParseError> {
    if let ExprKind::Tuple(elems) = &arg.kind {
        for elem in elems {
            if matches!(
                elem.kind,
                ExprKind::Op { .. } | ExprKind::Function { .. } | ExprKind::Module(_)
            ) {
                return Err(ParseError::invalid_argument(elem.span));
            }
        }
    }
    Ok(())
}

/// Result of parsing a source file.
#[derive(Debug)]
pub struct ParseResult {
    pub module: Module,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// Returns true if parsing completed without errors.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A parser error with location and friendly message.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    fn expected(expected: &str, found: &TokenKind, span: Span) -> Self {
        let message = format_expected_message(expected, found);
        let hint = crate::hints::for_expected(expected, found).map(String::from);
        Self { span, message, hint }
    }

    fn unmatched_brace(span: Span) -> Self {
        Self {
            span,
            message: "Unmatched '}'".to_string(),
            hint: Some("remove it, or add the '{' it closes".to_string()),
        }
    }

    fn invalid_argument(span: Span) -> Self {
        Self {
            span,
            message: "Invalid function argument".to_string(),
            hint: Some("function arguments are names, tuples of names, or 'name: type'".to_string()),
        }
    }

    fn literal_out_of_range(span: Span) -> Self {
        Self {
            span,
            message: "Integer literal out of range".to_string(),
            hint: Some(format!("the largest literal is {}", i32::MAX)),
        }
    }
}

/// Format a user-friendly "expected X, found Y" message.
fn format_expected_message(expected: &str, found: &TokenKind) -> String {
    match (expected, found) {
        ("')'", TokenKind::Eof) => "Unclosed '(' - missing ')'".to_string(),
        ("'}'", TokenKind::Eof) => "Unclosed '{' - missing '}'".to_string(),
        _ => format!("Expected {}, found {}", expected, found.display_name()),
    }
}
