// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Value lowering inside function bodies and global initializers.

use etch_ir::{Node, NodeId};
use etch_mir::{BlockBuilder, Callee, MirOperand, MirType, Signature};

use crate::module::CodeGenerator;
use crate::scope::{Scope, ScopeKind, Symbol};
use crate::types::{lower_type, value_signature, value_type};
use crate::{CodegenError, CodegenResult};

impl<'ir> CodeGenerator<'ir> {
    /// Emit the instructions computing `id` and return the operand holding
    /// its value. Zero-sized values come back as `undef`.
    pub(crate) fn local(&mut self, id: NodeId, b: &mut BlockBuilder, scope: &mut Scope<'_>) -> CodegenResult<MirOperand> {
        if self.ir.is_unresolved(id) {
            return Err(CodegenError::unresolved(self.ir, id));
        }

        match self.ir.node(id).clone() {
            Node::ConstantInt { value, .. } => Ok(MirOperand::Imm(value)),
            Node::Identifier { name, .. } => self.load_symbol(id, &name, b, scope),
            Node::Call { func, arg } => self.call(id, func, arg, b, scope),
            Node::Tuple(vals) => {
                let ty = value_type(self.ir, id)?;
                let mut aggregate = MirOperand::Undef;
                for (i, v) in vals.into_iter().enumerate() {
                    let value = self.local(v, b, scope)?;
                    aggregate = b.insert_value(ty.clone(), aggregate, value, i as u32);
                }
                Ok(aggregate)
            }
            Node::Block(vals) => {
                b.jump_to_new_block();
                let mut inner = scope.child(ScopeKind::Block);
                let mut last = MirOperand::Undef;
                for v in vals {
                    last = self.local(v, b, &mut inner)?;
                }
                Ok(last)
            }
            Node::Function { arg, body } => {
                let symbol = self.lambda_symbol();
                let sig = value_signature(self.ir, id)?;
                self.hoist_function(symbol.clone(), arg, body, sig.clone(), scope)?;
                Ok(b.func_ref(sig, symbol))
            }
            Node::Definition { binding, value } => self.definition(binding, value, b, scope),
            Node::Cast { value, ty } => {
                let from = value_type(self.ir, value)?;
                let to = lower_type(self.ir, ty)?;
                let operand = self.local(value, b, scope)?;
                match convert(b, operand, &from, &to) {
                    Some(converted) => Ok(converted),
                    None => Err(CodegenError::unhandled_local(self.ir, id)),
                }
            }
            Node::TypeType
            | Node::TypeUnresolved
            | Node::TypeInt { .. }
            | Node::TypeModule
            | Node::IntrInt
            | Node::IntrAdd
            | Node::IntrMul
            | Node::Module(_) => Err(CodegenError::unhandled_local(self.ir, id)),
        }
    }

    fn load_symbol(&mut self, id: NodeId, name: &str, b: &mut BlockBuilder, scope: &Scope<'_>) -> CodegenResult<MirOperand> {
        match scope.lookup(name) {
            Some((Symbol::Local { .. }, true)) => Err(CodegenError::CapturedLocal {
                name: name.to_string(),
                span: self.ir.span(id),
            }),
            Some((Symbol::Local { value, .. }, false)) => Ok(value),
            Some((Symbol::Global { ty, .. }, _)) if ty.is_zero_sized() => Ok(MirOperand::Undef),
            Some((Symbol::Global { name, ty }, _)) => Ok(b.load(ty, name)),
            Some((Symbol::Function { name, sig }, _)) => Ok(b.func_ref(sig, name)),
            None => Err(CodegenError::UnknownSymbol {
                name: name.to_string(),
                span: self.ir.span(id),
            }),
        }
    }

    fn call(
        &mut self,
        id: NodeId,
        func: NodeId,
        arg: NodeId,
        b: &mut BlockBuilder,
        scope: &mut Scope<'_>,
    ) -> CodegenResult<MirOperand> {
        match self.ir.node(func).clone() {
            Node::IntrAdd => {
                let ty = value_type(self.ir, id)?;
                let (lhs, rhs) = self.operand_pair(id, arg, &ty, b, scope)?;
                Ok(b.add(ty, lhs, rhs))
            }
            Node::IntrMul => {
                let ty = value_type(self.ir, id)?;
                let (lhs, rhs) = self.operand_pair(id, arg, &ty, b, scope)?;
                Ok(b.mul(ty, lhs, rhs))
            }
            Node::IntrInt => Err(CodegenError::unhandled_local(self.ir, id)),
            Node::Identifier { name, .. } => match scope.lookup(&name) {
                Some((Symbol::Function { name: symbol, sig }, _)) => {
                    let arg = self.call_argument(arg, &sig, b, scope)?;
                    Ok(b.call(sig.ret, Callee::Direct(symbol), arg).unwrap_or(MirOperand::Undef))
                }
                _ => self.indirect_call(func, arg, b, scope),
            },
            _ => self.indirect_call(func, arg, b, scope),
        }
    }

    fn indirect_call(
        &mut self,
        func: NodeId,
        arg: NodeId,
        b: &mut BlockBuilder,
        scope: &mut Scope<'_>,
    ) -> CodegenResult<MirOperand> {
        let sig = value_signature(self.ir, func)?;
        let callee = self.local(func, b, scope)?;
        let arg = self.call_argument(arg, &sig, b, scope)?;
        Ok(b.call(sig.ret, Callee::Indirect(callee), arg).unwrap_or(MirOperand::Undef))
    }

    /// The argument is always evaluated; it is passed only when the
    /// callee takes a parameter, widened or narrowed to the parameter type.
    fn call_argument(
        &mut self,
        arg: NodeId,
        sig: &Signature,
        b: &mut BlockBuilder,
        scope: &mut Scope<'_>,
    ) -> CodegenResult<Option<MirOperand>> {
        let from = value_type(self.ir, arg)?;
        let value = self.local(arg, b, scope)?;
        Ok(sig
            .param
            .as_ref()
            .map(|param| convert(b, value.clone(), &from, param).unwrap_or(value)))
    }

    /// Operands of a binary intrinsic, converted to the result type. A
    /// literal pair is used directly, anything else is taken apart with
    /// `extractvalue`.
    fn operand_pair(
        &mut self,
        id: NodeId,
        arg: NodeId,
        ty: &MirType,
        b: &mut BlockBuilder,
        scope: &mut Scope<'_>,
    ) -> CodegenResult<(MirOperand, MirOperand)> {
        let mut parts = Vec::with_capacity(2);
        match self.ir.node(arg).clone() {
            Node::Tuple(vals) if vals.len() == 2 => {
                for v in vals {
                    let from = value_type(self.ir, v)?;
                    parts.push((self.local(v, b, scope)?, from));
                }
            }
            _ => {
                let aggregate_ty = value_type(self.ir, arg)?;
                let aggregate = self.local(arg, b, scope)?;
                for index in 0..2 {
                    let Some(from) = aggregate_ty.field(index).cloned() else {
                        return Err(CodegenError::unhandled_local(self.ir, id));
                    };
                    let part = b.extract_value(aggregate_ty.clone(), aggregate.clone(), index);
                    parts.push((part, from));
                }
            }
        }

        let mut operands = parts.into_iter().map(|(value, from)| convert(b, value, &from, ty));
        match (operands.next().flatten(), operands.next().flatten()) {
            (Some(lhs), Some(rhs)) => Ok((lhs, rhs)),
            _ => Err(CodegenError::unhandled_local(self.ir, id)),
        }
    }

    fn definition(
        &mut self,
        binding: NodeId,
        value: NodeId,
        b: &mut BlockBuilder,
        scope: &mut Scope<'_>,
    ) -> CodegenResult<MirOperand> {
        if self.ir.denotes_type(value) {
            return Ok(MirOperand::Undef);
        }

        if let (Some(name), Node::Function { arg, body }) = (self.bound_name(binding), self.ir.node(value).clone()) {
            self.path.push(name.clone());
            let symbol = self.lambda_symbol();
            self.path.pop();
            let sig = value_signature(self.ir, value)?;
            scope.define(
                name,
                Symbol::Function {
                    name: symbol.clone(),
                    sig: sig.clone(),
                },
            );
            self.hoist_function(symbol.clone(), arg, body, sig.clone(), scope)?;
            return Ok(b.func_ref(sig, symbol));
        }

        let result = self.local(value, b, scope)?;
        let ty = value_type(self.ir, value)?;
        self.bind(binding, result.clone(), ty, b, scope)?;
        Ok(result)
    }

    fn bound_name(&self, binding: NodeId) -> Option<String> {
        match self.ir.node(binding) {
            Node::Identifier { name, .. } => Some(name.clone()),
            Node::Cast { value, .. } => self.bound_name(*value),
            _ => None,
        }
    }

    /// Bind the names of `pattern` to parts of `value`.
    pub(crate) fn bind(
        &mut self,
        pattern: NodeId,
        value: MirOperand,
        ty: MirType,
        b: &mut BlockBuilder,
        scope: &mut Scope<'_>,
    ) -> CodegenResult<()> {
        match self.ir.node(pattern).clone() {
            Node::Identifier { name, .. } => {
                scope.define(name, Symbol::Local { value, ty });
                Ok(())
            }
            Node::Cast { value: inner, ty: cast_ty } => {
                let to = lower_type(self.ir, cast_ty)?;
                match convert(b, value, &ty, &to) {
                    Some(value) => self.bind(inner, value, to, b, scope),
                    None => Err(CodegenError::unhandled_binding(self.ir, pattern)),
                }
            }
            Node::Tuple(patterns) => {
                let fields = match &ty {
                    MirType::Struct(fields) if fields.len() == patterns.len() => fields.clone(),
                    _ => return Err(CodegenError::unhandled_binding(self.ir, pattern)),
                };
                for (i, (p, field_ty)) in patterns.into_iter().zip(fields).enumerate() {
                    let part = b.extract_value(ty.clone(), value.clone(), i as u32);
                    self.bind(p, part, field_ty, b, scope)?;
                }
                Ok(())
            }
            _ => Err(CodegenError::unhandled_binding(self.ir, pattern)),
        }
    }
}

/// Emit the conversion of `value` from `from` to `to`. Integers change
/// width, tuples convert field by field; any other change is `None`.
pub(crate) fn convert(b: &mut BlockBuilder, value: MirOperand, from: &MirType, to: &MirType) -> Option<MirOperand> {
    if from == to {
        return Some(value);
    }
    match (from, to) {
        (&MirType::Int(from_width), &MirType::Int(to_width)) => Some(b.int_cast(from_width, to_width, value)),
        (MirType::Struct(from_fields), MirType::Struct(to_fields)) if from_fields.len() == to_fields.len() => {
            let mut aggregate = MirOperand::Undef;
            for (i, (f, t)) in from_fields.iter().zip(to_fields).enumerate() {
                let part = b.extract_value(from.clone(), value.clone(), i as u32);
                let part = convert(b, part, f, t)?;
                aggregate = b.insert_value(to.clone(), aggregate, part, i as u32);
            }
            Some(aggregate)
        }
        _ => None,
    }
}
