// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Bottom-up constant folding.

use std::collections::HashMap;

use etch_ir::{Ir, Node, NodeId};

/// Widths accepted by the sized-integer constructor.
const MIN_INT_WIDTH: i64 = 1;
const MAX_INT_WIDTH: i64 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    Module,
    Function,
    Block,
}

/// Names bound in one scope. `Some` holds the constant a name folded to;
/// `None` shadows outer constants of the same name.
pub(crate) struct ConstScope<'p> {
    parent: Option<&'p ConstScope<'p>>,
    kind: ScopeKind,
    names: HashMap<String, Option<NodeId>>,
}

impl<'p> ConstScope<'p> {
    pub(crate) fn root(kind: ScopeKind) -> Self {
        Self {
            parent: None,
            kind,
            names: HashMap::new(),
        }
    }

    fn child(&self, kind: ScopeKind) -> ConstScope<'_> {
        ConstScope {
            parent: Some(self),
            kind,
            names: HashMap::new(),
        }
    }

    fn lookup(&self, name: &str) -> Option<NodeId> {
        let mut scope = Some(self);
        while let Some(s) = scope {
            if let Some(&entry) = s.names.get(name) {
                return entry;
            }
            scope = s.parent;
        }
        None
    }
}

pub(crate) struct Folder<'ir> {
    pub(crate) ir: &'ir mut Ir,
    pub(crate) folded: usize,
}

impl<'ir> Folder<'ir> {
    pub(crate) fn new(ir: &'ir mut Ir) -> Self {
        Self { ir, folded: 0 }
    }

    pub(crate) fn fold(&mut self, id: NodeId, scope: &mut ConstScope<'_>) -> NodeId {
        match self.ir.node(id).clone() {
            // No descent into the type of types.
            Node::TypeType => id,
            Node::TypeUnresolved
            | Node::TypeInt { .. }
            | Node::TypeModule
            | Node::ConstantInt { .. }
            | Node::IntrInt
            | Node::IntrAdd
            | Node::IntrMul => id,

            Node::Identifier { name, ty } => {
                if let Some(constant) = scope.lookup(&name) {
                    self.folded += 1;
                    return constant;
                }
                self.fold_identifier_type(id, name, ty, scope)
            }
            Node::Call { func, arg } => {
                let func = self.fold(func, scope);
                let arg = self.fold(arg, scope);
                match self.eval_call(func, arg) {
                    Some(node) => {
                        self.folded += 1;
                        match node {
                            Node::TypeInt { width } => self.ir.type_int(width),
                            node => self.ir.rebuild(id, node),
                        }
                    }
                    None => self.ir.rebuild(id, Node::Call { func, arg }),
                }
            }
            Node::Tuple(vals) => {
                let mut kept = Vec::with_capacity(vals.len());
                for v in vals {
                    let v = self.fold(v, scope);
                    if !self.is_empty_tuple(v) {
                        kept.push(v);
                    }
                }
                self.finish_tuple(id, kept)
            }
            Node::Block(vals) => {
                let mut inner = scope.child(ScopeKind::Block);
                let vals: Vec<NodeId> = vals.into_iter().map(|v| self.fold(v, &mut inner)).collect();
                let last = vals.len().saturating_sub(1);
                let vals: Vec<NodeId> = vals
                    .into_iter()
                    .enumerate()
                    .filter(|&(i, v)| i == last || !self.is_constant_definition(v))
                    .map(|(_, v)| v)
                    .collect();
                if vals.len() == 1 {
                    return vals[0];
                }
                self.ir.rebuild(id, Node::Block(vals))
            }
            Node::Function { arg, body } => {
                let mut inner = scope.child(ScopeKind::Function);
                let arg = self.fold_pattern(arg, &mut inner);
                self.shadow(arg, &mut inner);
                let body = self.fold(body, &mut inner);
                self.ir.rebuild(id, Node::Function { arg, body })
            }
            Node::Definition { binding, value } => {
                let value = self.fold(value, scope);
                let binding = self.fold_pattern(binding, scope);
                let value = self.narrow_to_pattern(binding, value);
                let constant = match (self.ir.node(binding), self.ir.node(value)) {
                    (Node::Identifier { name, .. }, Node::ConstantInt { .. })
                        if scope.kind != ScopeKind::Module =>
                    {
                        Some(name.clone())
                    }
                    _ => None,
                };
                match constant {
                    Some(name) => {
                        scope.names.insert(name, Some(value));
                    }
                    None => self.shadow(binding, scope),
                }
                self.ir.rebuild(id, Node::Definition { binding, value })
            }
            Node::Cast { value, ty } => {
                let ty = self.fold(ty, scope);
                let value = self.fold(value, scope);
                match (self.ir.node(ty), self.ir.node(value)) {
                    (&Node::TypeInt { width }, &Node::ConstantInt { value, .. }) => {
                        self.folded += 1;
                        self.ir.rebuild(
                            id,
                            Node::ConstantInt {
                                value: wrap(value, width),
                                width,
                            },
                        )
                    }
                    _ => self.ir.rebuild(id, Node::Cast { value, ty }),
                }
            }
            Node::Module(defs) => {
                let mut inner = scope.child(ScopeKind::Module);
                let defs = defs.into_iter().map(|d| self.fold(d, &mut inner)).collect();
                self.ir.rebuild(id, Node::Module(defs))
            }
        }
    }

    /// Fold a binding pattern: tuples collapse, casts fold their type,
    /// identifiers fold their resolved type. Bound names are never
    /// substituted.
    fn fold_pattern(&mut self, id: NodeId, scope: &mut ConstScope<'_>) -> NodeId {
        match self.ir.node(id).clone() {
            Node::Identifier { name, ty } => self.fold_identifier_type(id, name, ty, scope),
            Node::Tuple(elems) => {
                let mut kept = Vec::with_capacity(elems.len());
                for e in elems {
                    let e = self.fold_pattern(e, scope);
                    if !self.is_empty_tuple(e) {
                        kept.push(e);
                    }
                }
                self.finish_tuple(id, kept)
            }
            Node::Cast { value, ty } => {
                let ty = self.fold(ty, scope);
                let value = self.fold_pattern(value, scope);
                self.ir.rebuild(id, Node::Cast { value, ty })
            }
            // Element types of a function type's argument.
            _ => self.fold(id, scope),
        }
    }

    /// Constants bound through a typed pattern take the pattern's width.
    fn narrow_to_pattern(&mut self, pattern: NodeId, value: NodeId) -> NodeId {
        match (self.ir.node(pattern).clone(), self.ir.node(value).clone()) {
            (Node::Cast { value: inner, ty }, Node::ConstantInt { value: v, width }) => {
                let value = match *self.ir.node(ty) {
                    Node::TypeInt { width: w } if w != width => {
                        self.folded += 1;
                        self.ir.rebuild(
                            value,
                            Node::ConstantInt {
                                value: wrap(v, w),
                                width: w,
                            },
                        )
                    }
                    _ => value,
                };
                self.narrow_to_pattern(inner, value)
            }
            (Node::Cast { value: inner, .. }, _) => self.narrow_to_pattern(inner, value),
            (Node::Tuple(patterns), Node::Tuple(values)) if patterns.len() == values.len() => {
                let values = patterns
                    .into_iter()
                    .zip(values)
                    .map(|(p, v)| self.narrow_to_pattern(p, v))
                    .collect();
                self.ir.rebuild(value, Node::Tuple(values))
            }
            _ => value,
        }
    }

    fn fold_identifier_type(
        &mut self,
        id: NodeId,
        name: String,
        ty: Option<NodeId>,
        scope: &mut ConstScope<'_>,
    ) -> NodeId {
        match ty {
            Some(ty) => {
                let ty = self.fold(ty, scope);
                self.ir.rebuild(id, Node::Identifier { name, ty: Some(ty) })
            }
            None => id,
        }
    }

    /// Evaluate an intrinsic call on constant arguments.
    fn eval_call(&self, func: NodeId, arg: NodeId) -> Option<Node> {
        match self.ir.node(func) {
            Node::IntrInt => match *self.ir.node(arg) {
                Node::ConstantInt { value, .. } if (MIN_INT_WIDTH..=MAX_INT_WIDTH).contains(&value) => {
                    Some(Node::TypeInt { width: value as u32 })
                }
                _ => None,
            },
            Node::IntrAdd => self.eval_binary(arg, i64::wrapping_add),
            Node::IntrMul => self.eval_binary(arg, i64::wrapping_mul),
            _ => None,
        }
    }

    fn eval_binary(&self, arg: NodeId, op: fn(i64, i64) -> i64) -> Option<Node> {
        let Node::Tuple(pair) = self.ir.node(arg) else {
            return None;
        };
        match pair.as_slice() {
            &[lhs, rhs] => match (self.ir.node(lhs), self.ir.node(rhs)) {
                (&Node::ConstantInt { value: a, width }, &Node::ConstantInt { value: b, .. }) => {
                    Some(Node::ConstantInt {
                        value: wrap(op(a, b), width),
                        width,
                    })
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn finish_tuple(&mut self, id: NodeId, kept: Vec<NodeId>) -> NodeId {
        if kept.len() == 1 {
            return kept[0];
        }
        self.ir.rebuild(id, Node::Tuple(kept))
    }

    fn is_empty_tuple(&self, id: NodeId) -> bool {
        matches!(self.ir.node(id), Node::Tuple(v) if v.is_empty())
    }

    fn is_constant_definition(&self, id: NodeId) -> bool {
        match self.ir.node(id) {
            Node::Definition { binding, value } => {
                matches!(self.ir.node(*binding), Node::Identifier { .. })
                    && matches!(self.ir.node(*value), Node::ConstantInt { .. })
            }
            _ => false,
        }
    }

    /// Hide outer constants behind every name a pattern binds.
    fn shadow(&self, pattern: NodeId, scope: &mut ConstScope<'_>) {
        match self.ir.node(pattern) {
            Node::Identifier { name, .. } => {
                scope.names.insert(name.clone(), None);
            }
            Node::Tuple(elems) => {
                for &e in elems {
                    self.shadow(e, scope);
                }
            }
            Node::Cast { value, .. } => self.shadow(*value, scope),
            _ => {}
        }
    }
}

/// Truncate to `width` bits and sign-extend back, two's complement.
pub(crate) fn wrap(value: i64, width: u32) -> i64 {
    match width {
        0 => 0,
        w if w >= 64 => value,
        w => {
            let shift = 64 - w;
            (value << shift) >> shift
        }
    }
}
