// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Module-level code generation: globals and hoisted functions.

use etch_ir::{Ir, Node, NodeId};
use etch_mir::{BlockBuilder, GlobalKind, MirGlobal, MirModule, MirOperand, MirTerminator, Signature};

use crate::mangle::mangle;
use crate::scope::{Scope, ScopeKind, Symbol};
use crate::types::{lower_type, value_signature, value_type};
use crate::{CodegenError, CodegenResult};

/// Lowers resolved IR into a [`MirModule`].
pub struct CodeGenerator<'ir> {
    pub(crate) ir: &'ir mut Ir,
    pub(crate) module: MirModule,
    /// Names of the enclosing definitions, outermost first.
    pub(crate) path: Vec<String>,
    /// Counter for anonymous and block-local function names.
    pub(crate) lambda_count: u32,
}

impl<'ir> CodeGenerator<'ir> {
    pub fn new(ir: &'ir mut Ir, module_name: &str) -> Self {
        Self {
            ir,
            module: MirModule::new(module_name),
            path: Vec::new(),
            lambda_count: 0,
        }
    }

    pub fn finish(self) -> MirModule {
        self.module
    }

    /// Emit one top-level module.
    pub fn gen_module(&mut self, id: NodeId) -> CodegenResult<()> {
        let mut root = Scope::root();
        match self.ir.node(id).clone() {
            Node::Module(defs) => self.gen_defs(&defs, &mut root),
            _ => Err(CodegenError::unhandled_global(self.ir, id)),
        }
    }

    fn gen_defs(&mut self, defs: &[NodeId], scope: &mut Scope<'_>) -> CodegenResult<()> {
        for &def in defs {
            match self.ir.node(def).clone() {
                Node::Definition { binding, value } => self.gen_binding(binding, value, scope)?,
                _ => {
                    return Err(CodegenError::ModuleExpression {
                        dump: self.ir.dump(def),
                        span: self.ir.span(def),
                    })
                }
            }
        }
        Ok(())
    }

    fn gen_binding(&mut self, binding: NodeId, value: NodeId, scope: &mut Scope<'_>) -> CodegenResult<()> {
        match self.ir.node(binding).clone() {
            Node::Identifier { name, .. } => {
                self.path.push(name.clone());
                let result = self.gen_global(&name, value, scope);
                self.path.pop();
                result
            }
            Node::Cast { value: inner, ty } => {
                let value = self.converted_global(value, ty)?;
                self.gen_binding(inner, value, scope)
            }
            Node::Tuple(patterns) => match self.ir.node(value).clone() {
                Node::Tuple(values) if values.len() == patterns.len() => {
                    for (p, v) in patterns.into_iter().zip(values) {
                        self.gen_binding(p, v, scope)?;
                    }
                    Ok(())
                }
                _ => Err(CodegenError::unhandled_binding(self.ir, binding)),
            },
            _ => Err(CodegenError::unhandled_binding(self.ir, binding)),
        }
    }

    /// `value` as seen through a typed pattern: a cast when its backend type
    /// differs from the pattern's, so the global gets the declared type.
    fn converted_global(&mut self, value: NodeId, ty: NodeId) -> CodegenResult<NodeId> {
        if self.ir.denotes_type(value) || self.ir.is_unresolved(value) || matches!(self.ir.node(value), Node::Module(_)) {
            return Ok(value);
        }
        if value_type(self.ir, value)? == lower_type(self.ir, ty)? {
            return Ok(value);
        }
        let span = self.ir.span(value);
        Ok(self.ir.add_spanned(Node::Cast { value, ty }, span))
    }

    fn gen_global(&mut self, name: &str, value: NodeId, scope: &mut Scope<'_>) -> CodegenResult<()> {
        // Type aliases exist only at compile time.
        if self.ir.denotes_type(value) {
            log::trace!("skipping type definition `{}`", name);
            return Ok(());
        }
        if self.ir.is_unresolved(value) {
            return Err(CodegenError::unresolved(self.ir, value));
        }

        let symbol = mangle(&self.path);
        match self.ir.node(value).clone() {
            Node::ConstantInt { value: v, width } => {
                let ty = etch_mir::MirType::Int(width);
                self.emit_global(&symbol, GlobalKind::Constant { ty: ty.clone(), value: v });
                scope.define(name, Symbol::Global { name: symbol, ty });
            }
            Node::Identifier { name: target, .. } => match scope.lookup(&target) {
                Some((Symbol::Global { name: target, ty }, _)) => {
                    self.emit_global(&symbol, GlobalKind::Alias { ty: ty.clone(), target });
                    scope.define(name, Symbol::Global { name: symbol, ty });
                }
                Some((Symbol::Function { name: target, sig }, _)) => {
                    scope.define(name, Symbol::Function { name: target, sig });
                }
                Some((Symbol::Local { .. }, _)) => return Err(CodegenError::unhandled_global(self.ir, value)),
                None => {
                    return Err(CodegenError::UnknownSymbol {
                        name: target,
                        span: self.ir.span(value),
                    })
                }
            },
            Node::Function { arg, body } => {
                let sig = value_signature(self.ir, value)?;
                // Defined first so the body can call itself.
                scope.define(
                    name,
                    Symbol::Function {
                        name: symbol.clone(),
                        sig: sig.clone(),
                    },
                );
                self.hoist_function(symbol, arg, body, sig, scope)?;
            }
            Node::Module(defs) => {
                let mut inner = scope.child(ScopeKind::Module);
                self.gen_defs(&defs, &mut inner)?;
            }
            Node::Call { .. } | Node::Tuple(_) | Node::Block(_) | Node::Cast { .. } | Node::Definition { .. } => {
                let ty = value_type(self.ir, value)?;
                let mut b = BlockBuilder::new();
                // The initializer runs like a function with no parameter.
                let mut inner = scope.child(ScopeKind::Function);
                let result = self.local(value, &mut b, &mut inner)?;
                b.terminate(MirTerminator::Return {
                    value: (!ty.is_zero_sized()).then_some(result),
                });
                self.emit_global(
                    &symbol,
                    GlobalKind::Computed {
                        ty: ty.clone(),
                        body: b.finish_blocks(),
                    },
                );
                scope.define(name, Symbol::Global { name: symbol, ty });
            }
            _ => return Err(CodegenError::unhandled_global(self.ir, value)),
        }
        Ok(())
    }

    fn emit_global(&mut self, symbol: &str, kind: GlobalKind) {
        log::debug!("emitting global {}", symbol);
        self.module.add_global(MirGlobal {
            name: symbol.to_string(),
            kind,
        });
    }

    /// Emit `arg -> body` as the top-level function `symbol`. The body sees
    /// the enclosing scopes through a function boundary.
    pub(crate) fn hoist_function(
        &mut self,
        symbol: String,
        arg: NodeId,
        body: NodeId,
        sig: Signature,
        scope: &Scope<'_>,
    ) -> CodegenResult<()> {
        log::debug!("hoisting function {}", symbol);
        let mut b = BlockBuilder::new();
        let mut inner = scope.child(ScopeKind::Function);

        let param = sig.param.clone().map(|ty| (b.alloc_value(), ty));
        let arg_value = match &param {
            Some((v, _)) => MirOperand::Value(*v),
            None => MirOperand::Undef,
        };
        let arg_ty = value_type(self.ir, arg)?;
        self.bind(arg, arg_value, arg_ty, &mut b, &mut inner)?;

        let result = self.local(body, &mut b, &mut inner)?;
        b.terminate(MirTerminator::Return {
            value: (!sig.ret.is_zero_sized()).then_some(result),
        });
        let function = b.finish_function(symbol, param, sig.ret);
        self.module.add_function(function);
        Ok(())
    }

    /// Fresh name for a function hoisted out of an expression.
    pub(crate) fn lambda_symbol(&mut self) -> String {
        let n = self.lambda_count;
        self.lambda_count += 1;
        format!("{}.fn{}", mangle(&self.path), n)
    }
}
