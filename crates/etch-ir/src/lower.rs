// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax→IR lowering.
//!
//! A one-to-one structural translation. No scoping, typing or folding
//! happens here; every identifier comes out unresolved.

use etch_ast::syntax::{Expr, ExprKind, Module, Stmt, StmtKind};

use crate::arena::Ir;
use crate::node::{Node, NodeId};
use crate::{LowerError, Unit};

/// Lower a parsed file into a unit holding one module.
pub fn lower(module: &Module) -> Result<Unit, LowerError> {
    let mut lowerer = Lowerer { ir: Ir::new() };
    let root = lowerer.lower_module(module)?;
    log::debug!("lowered module: {} IR nodes", lowerer.ir.len());
    Ok(Unit {
        ir: lowerer.ir,
        modules: vec![root],
    })
}

struct Lowerer {
    ir: Ir,
}

impl Lowerer {
    fn lower_module(&mut self, module: &Module) -> Result<NodeId, LowerError> {
        let defs = self.lower_stmts(&module.stmts)?;
        Ok(self.ir.add_spanned(Node::Module(defs), Some(module.span)))
    }

    fn lower_stmts(&mut self, stmts: &[Stmt]) -> Result<Vec<NodeId>, LowerError> {
        stmts.iter().map(|s| self.lower_stmt(s)).collect()
    }

    fn lower_stmt(&mut self, stmt: &Stmt) -> Result<NodeId, LowerError> {
        match &stmt.kind {
            StmtKind::Definition { binding, value } => {
                let binding = self.lower_expr(binding)?;
                let value = self.lower_expr(value)?;
                Ok(self
                    .ir
                    .add_spanned(Node::Definition { binding, value }, Some(stmt.span)))
            }
            StmtKind::Expr(expr) => self.lower_expr(expr),
        }
    }

    fn lower_expr(&mut self, expr: &Expr) -> Result<NodeId, LowerError> {
        let node = match &expr.kind {
            ExprKind::Int(value) => Node::constant(*value),
            ExprKind::Ident(name) => Node::identifier(name.as_str()),
            ExprKind::Intrinsic(name) => match name.as_str() {
                "int" => Node::IntrInt,
                "add" => Node::IntrAdd,
                "mul" => Node::IntrMul,
                _ => {
                    return Err(LowerError::UnknownIntrinsic {
                        name: name.clone(),
                        span: expr.span,
                    })
                }
            },
            ExprKind::Block(stmts) => Node::Block(self.lower_stmts(stmts)?),
            ExprKind::Tuple(elems) => Node::Tuple(self.lower_exprs(elems)?),
            ExprKind::Op { op, lhs, rhs } => {
                // `a OP b` is the call `OP(a, b)`; the operator name stays an
                // identifier until resolution decides what it means.
                let func = self
                    .ir
                    .add_spanned(Node::identifier(op.as_str()), Some(expr.span));
                let lhs = self.lower_expr(lhs)?;
                let rhs = self.lower_expr(rhs)?;
                let arg = self.ir.add_spanned(Node::Tuple(vec![lhs, rhs]), Some(expr.span));
                Node::Call { func, arg }
            }
            ExprKind::Call { func, args } => {
                let func = self.lower_expr(func)?;
                let args = self.lower_exprs(args)?;
                let arg = self.ir.add_spanned(Node::Tuple(args), Some(expr.span));
                Node::Call { func, arg }
            }
            ExprKind::Function { arg, body } => {
                let arg = self.lower_expr(arg)?;
                let body = self.lower_expr(body)?;
                Node::Function { arg, body }
            }
            ExprKind::Typed { value, ty } => {
                let value = self.lower_expr(value)?;
                let ty = self.lower_expr(ty)?;
                Node::Cast { value, ty }
            }
            ExprKind::Module(module) => return self.lower_module(module),
        };
        Ok(self.ir.add_spanned(node, Some(expr.span)))
    }

    fn lower_exprs(&mut self, exprs: &[Expr]) -> Result<Vec<NodeId>, LowerError> {
        exprs.iter().map(|e| self.lower_expr(e)).collect()
    }
}
