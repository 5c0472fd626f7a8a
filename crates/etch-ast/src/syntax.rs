// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Concrete syntax tree produced by the parser.

use crate::Span;

/// A sequence of statements, either the whole file or a `#{ ... }` literal.
#[derive(Debug, Clone)]
pub struct Module {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// A statement in a module or block.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// `pattern = value`
    Definition { binding: Expr, value: Expr },
    Expr(Expr),
}

/// An expression in the syntax tree.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// The kind of expression.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Integer literal
    Int(i64),
    /// Identifier
    Ident(String),
    /// Intrinsic literal, `@int`
    Intrinsic(String),
    /// `{ stmt* }`
    Block(Vec<Stmt>),
    /// `(e, ...)`
    Tuple(Vec<Expr>),
    /// `lhs OP rhs`, right-recursive
    Op {
        op: String,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `func(args)`
    Call { func: Box<Expr>, args: Vec<Expr> },
    /// `arg -> body`; a parenthesised arglist is a `Tuple`
    Function { arg: Box<Expr>, body: Box<Expr> },
    /// `value : ty`
    Typed { value: Box<Expr>, ty: Box<Expr> },
    /// `#{ stmt* }`
    Module(Module),
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}
