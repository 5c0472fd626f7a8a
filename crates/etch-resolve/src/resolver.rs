// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The resolver implementation.

use etch_ir::{Ir, Node, NodeId, Unit};

use crate::error::{ResolveError, Unresolved};
use crate::scope::{Scope, ScopeKind};
use crate::Resolution;

/// Width given to names bound without a type, such as unannotated
/// function parameters.
const DEFAULT_INT_WIDTH: u32 = 32;

pub struct Resolver {
    ir: Ir,
    diagnostics: Vec<Unresolved>,
}

impl Resolver {
    pub fn new(ir: Ir) -> Self {
        Self {
            ir,
            diagnostics: Vec::new(),
        }
    }

    /// Resolve every module of a unit, each in a fresh root scope.
    pub fn resolve(unit: Unit) -> Result<Resolution, ResolveError> {
        let mut resolver = Resolver::new(unit.ir);
        let mut modules = Vec::with_capacity(unit.modules.len());
        for module in unit.modules {
            let mut root = Scope::root(ScopeKind::Module);
            modules.push(resolver.resolve_node(module, &mut root)?);
        }
        log::debug!(
            "resolution finished: {} unresolved node(s)",
            resolver.diagnostics.len()
        );
        Ok(Resolution {
            unit: Unit {
                ir: resolver.ir,
                modules,
            },
            diagnostics: resolver.diagnostics,
        })
    }

    fn resolve_node(&mut self, id: NodeId, scope: &mut Scope<'_>) -> Result<NodeId, ResolveError> {
        let resolved = match self.ir.node(id).clone() {
            Node::Identifier { name, ty: None } => self.resolve_identifier(id, &name, scope)?,
            Node::Identifier { ty: Some(_), .. } => id,

            Node::Module(defs) => {
                let mut inner = scope.child(ScopeKind::Module);
                let defs = self.resolve_all(&defs, &mut inner)?;
                self.ir.rebuild(id, Node::Module(defs))
            }
            Node::Block(vals) => {
                let mut inner = scope.child(ScopeKind::Block);
                let vals = self.resolve_all(&vals, &mut inner)?;
                self.ir.rebuild(id, Node::Block(vals))
            }
            Node::Function { arg, body } => {
                let mut inner = scope.child(ScopeKind::Function);
                let arg = self.bind(arg, None, None, &mut inner)?;
                let body = self.resolve_node(body, &mut inner)?;
                self.ir.rebuild(id, Node::Function { arg, body })
            }
            Node::Definition { binding, value } => {
                let value = self.resolve_node(value, scope)?;
                let binding = self.bind(binding, Some(value), None, scope)?;
                self.ir.rebuild(id, Node::Definition { binding, value })
            }
            Node::Tuple(vals) => {
                let vals = self.resolve_all(&vals, scope)?;
                self.ir.rebuild(id, Node::Tuple(vals))
            }
            Node::Call { func, arg } => {
                let func = self.resolve_node(func, scope)?;
                let arg = self.resolve_node(arg, scope)?;
                self.ir.rebuild(id, Node::Call { func, arg })
            }
            Node::Cast { value, ty } => {
                let ty = self.resolve_node(ty, scope)?;
                let value = self.resolve_node(value, scope)?;
                self.ir.rebuild(id, Node::Cast { value, ty })
            }

            Node::TypeType
            | Node::TypeUnresolved
            | Node::TypeInt { .. }
            | Node::TypeModule
            | Node::ConstantInt { .. }
            | Node::IntrInt
            | Node::IntrAdd
            | Node::IntrMul => id,
        };
        self.check_resolved(resolved);
        Ok(resolved)
    }

    fn resolve_all(&mut self, ids: &[NodeId], scope: &mut Scope<'_>) -> Result<Vec<NodeId>, ResolveError> {
        ids.iter().map(|&id| self.resolve_node(id, scope)).collect()
    }

    fn resolve_identifier(&mut self, id: NodeId, name: &str, scope: &Scope<'_>) -> Result<NodeId, ResolveError> {
        let Some(found) = scope.lookup(name) else {
            let builtin = match name {
                "+" => Node::IntrAdd,
                "*" => Node::IntrMul,
                "int" => Node::IntrInt,
                _ => return Ok(id),
            };
            return Ok(self.ir.rebuild(id, builtin));
        };

        // Names of types and type constructors are replaced by what they name.
        if self.ir.denotes_type(found) {
            log::trace!("replacing type name `{}`", name);
            return Ok(found);
        }
        if self.ir.is_unresolved(found) {
            return Ok(id);
        }
        let ty = self.ir.type_of(found);
        Ok(self.ir.resolve_identifier(id, ty)?)
    }

    /// Bind a pattern in `scope`. `value` is the bound value (absent for
    /// function parameters, which bind to themselves); `ty` overrides the
    /// type taken from the value.
    fn bind(
        &mut self,
        pattern: NodeId,
        value: Option<NodeId>,
        ty: Option<NodeId>,
        scope: &mut Scope<'_>,
    ) -> Result<NodeId, ResolveError> {
        match self.ir.node(pattern).clone() {
            Node::Identifier { name, .. } => {
                if scope.kind == ScopeKind::Module {
                    if let Some(previous) = scope.lookup_local(&name) {
                        return Err(ResolveError::Redefinition {
                            name,
                            span: self.ir.span(pattern),
                            previous: self.ir.span(previous),
                        });
                    }
                }
                let ty = match ty.or_else(|| value.map(|v| self.ir.type_of(v))) {
                    Some(ty) if ty != Ir::TYPE_UNRESOLVED => ty,
                    _ => self.ir.type_int(DEFAULT_INT_WIDTH),
                };
                let ident = self.ir.resolve_identifier(pattern, ty)?;
                let target = match value {
                    Some(v) if self.ir.denotes_type(v) => v,
                    _ => ident,
                };
                scope.define(name, target);
                Ok(ident)
            }
            Node::Tuple(elems) => {
                let arity = elems.len();
                let values = value.and_then(|v| self.tuple_parts(v, arity));
                let tys = ty
                    .or_else(|| value.map(|v| self.ir.type_of(v)))
                    .and_then(|t| self.tuple_parts(t, arity));
                let mut bound = Vec::with_capacity(arity);
                for (i, elem) in elems.into_iter().enumerate() {
                    let v = values.as_ref().map(|vs| vs[i]);
                    let t = tys.as_ref().map(|ts| ts[i]);
                    bound.push(self.bind(elem, v, t, scope)?);
                }
                Ok(self.ir.rebuild(pattern, Node::Tuple(bound)))
            }
            Node::Cast { value: inner, ty: cast_ty } => {
                let cast_ty = self.resolve_node(cast_ty, scope)?;
                let inner = self.bind(inner, value, Some(cast_ty), scope)?;
                Ok(self.ir.rebuild(
                    pattern,
                    Node::Cast {
                        value: inner,
                        ty: cast_ty,
                    },
                ))
            }
            _ => Err(ResolveError::UnhandledBinding {
                dump: self.ir.dump(pattern),
                span: self.ir.span(pattern),
            }),
        }
    }

    fn tuple_parts(&self, id: NodeId, arity: usize) -> Option<Vec<NodeId>> {
        match self.ir.node(id) {
            Node::Tuple(parts) if parts.len() == arity => Some(parts.clone()),
            _ => None,
        }
    }

    fn check_resolved(&mut self, id: NodeId) {
        if !self.ir.is_unresolved(id) {
            return;
        }
        let name = match self.ir.node(id) {
            Node::Identifier { name, .. } => Some(name.clone()),
            _ => None,
        };
        let diag = Unresolved {
            node: id,
            name,
            span: self.ir.span(id),
            dump: self.ir.dump(id),
        };
        log::warn!("{}", diag);
        self.diagnostics.push(diag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_src(src: &str) -> Result<Resolution, ResolveError> {
        let lex = etch_lexer::Lexer::new(src).tokenize();
        assert!(lex.is_ok(), "Lex errors: {:?}", lex.errors);
        let parsed = etch_parser::Parser::new(lex.tokens).parse();
        assert!(parsed.is_ok(), "Parse errors: {:?}", parsed.errors);
        let unit = etch_ir::lower(&parsed.module).unwrap();
        Resolver::resolve(unit)
    }

    fn defs(res: &Resolution) -> Vec<(NodeId, NodeId)> {
        let Node::Module(defs) = res.unit.ir.node(res.unit.modules[0]) else {
            panic!("Expected module");
        };
        defs.iter()
            .map(|&d| match res.unit.ir.node(d) {
                Node::Definition { binding, value } => (*binding, *value),
                other => panic!("Expected definition, got {:?}", other),
            })
            .collect()
    }

    #[test]
    fn inner_block_binding_does_not_touch_outer() {
        let mut res = resolve_src("x = 1: int(8); y = { x = 2; x }; z = x").unwrap();
        assert!(res.diagnostics.is_empty(), "{:?}", res.diagnostics);
        let defs = defs(&res);

        // The block's `x` is the inner int32 binding.
        let Node::Block(vals) = res.unit.ir.node(defs[1].1).clone() else {
            panic!("Expected block");
        };
        let int32 = res.unit.ir.type_int(32);
        assert_eq!(res.unit.ir.type_of(vals[1]), int32);

        // The module-level `x` still has its declared type.
        let z_ty = res.unit.ir.type_of(defs[2].1);
        assert!(matches!(res.unit.ir.node(z_ty), Node::Call { .. }));
    }

    #[test]
    fn undefined_name_is_diagnosed_but_resolution_continues() {
        let mut res = resolve_src("a = q + 1\nb = 2").unwrap();
        assert!(res
            .diagnostics
            .iter()
            .any(|d| d.name.as_deref() == Some("q")));
        let defs = defs(&res);
        let int32 = res.unit.ir.type_int(32);
        assert_eq!(res.unit.ir.type_of(defs[1].0), int32);
    }

    #[test]
    fn operators_become_intrinsics() {
        let res = resolve_src("y = 2 * 3 + 4").unwrap();
        let defs = defs(&res);
        let Node::Call { func, arg } = res.unit.ir.node(defs[0].1).clone() else {
            panic!("Expected call");
        };
        assert_eq!(res.unit.ir.node(func), &Node::IntrMul);
        let Node::Tuple(args) = res.unit.ir.node(arg).clone() else {
            panic!("Expected tuple");
        };
        assert!(matches!(
            res.unit.ir.node(args[1]),
            Node::Call { func, .. } if res.unit.ir.node(*func) == &Node::IntrAdd
        ));
    }

    #[test]
    fn type_names_are_replaced_by_their_value() {
        let res = resolve_src("t = int(8)\nv = 3: t").unwrap();
        assert!(res.diagnostics.is_empty(), "{:?}", res.diagnostics);
        let defs = defs(&res);
        let Node::Cast { ty, .. } = res.unit.ir.node(defs[1].1).clone() else {
            panic!("Expected cast");
        };
        assert_eq!(ty, defs[0].1);
        assert!(matches!(
            res.unit.ir.node(ty),
            Node::Call { func, .. } if res.unit.ir.node(*func) == &Node::IntrInt
        ));
    }

    #[test]
    fn parameters_default_to_int32_unless_annotated() {
        let mut res = resolve_src("f = (a, b: int(16)) -> a * b").unwrap();
        let defs = defs(&res);
        let Node::Function { arg, .. } = res.unit.ir.node(defs[0].1).clone() else {
            panic!("Expected function");
        };
        let Node::Tuple(params) = res.unit.ir.node(arg).clone() else {
            panic!("Expected tuple");
        };
        let int32 = res.unit.ir.type_int(32);
        assert_eq!(res.unit.ir.type_of(params[0]), int32);
        let Node::Cast { value: b, ty } = res.unit.ir.node(params[1]).clone() else {
            panic!("Expected cast");
        };
        assert_eq!(res.unit.ir.type_of(b), ty);
    }

    #[test]
    fn add2_resolves_without_diagnostics() {
        let mut res = resolve_src("add2 = (x) -> x + 1\nr = add2(41)").unwrap();
        assert!(res.diagnostics.is_empty(), "{:?}", res.diagnostics);
        let defs = defs(&res);
        let int32 = res.unit.ir.type_int(32);
        assert_eq!(res.unit.ir.type_of(defs[1].1), int32);

        let root = res.unit.modules[0];
        for id in res.unit.ir.reachable(root) {
            assert!(!res.unit.ir.is_unresolved(id), "unresolved {:?}", res.unit.ir.node(id));
        }
    }

    #[test]
    fn tuple_binding_destructures_element_types() {
        let mut res = resolve_src("(p, q) = (1, 2: int(8))").unwrap();
        let defs = defs(&res);
        let Node::Tuple(names) = res.unit.ir.node(defs[0].0).clone() else {
            panic!("Expected tuple");
        };
        let int32 = res.unit.ir.type_int(32);
        assert_eq!(res.unit.ir.type_of(names[0]), int32);
        let q_ty = res.unit.ir.type_of(names[1]);
        assert!(matches!(res.unit.ir.node(q_ty), Node::Call { .. }));
    }

    #[test]
    fn module_names_cannot_be_defined_twice() {
        let err = resolve_src("x = 1\nx = 2").unwrap_err();
        match err {
            ResolveError::Redefinition { name, span, previous } => {
                assert_eq!(name, "x");
                let (span, previous) = (span.unwrap(), previous.unwrap());
                assert!(previous.start < span.start);
                assert_eq!(span.start, 6);
            }
            other => panic!("Expected redefinition, got {:?}", other),
        }

        assert!(matches!(
            resolve_src("(a, a) = (1, 2)"),
            Err(ResolveError::Redefinition { .. })
        ));
        assert!(matches!(
            resolve_src("m = #{ f = 1\n f = 2 }"),
            Err(ResolveError::Redefinition { .. })
        ));
    }

    #[test]
    fn redefinition_is_allowed_outside_modules() {
        let res = resolve_src("y = { x = 1; x = 2; x }\nf = (x) -> { x = 3; x }\nx = 4");
        assert!(res.is_ok(), "{:?}", res.err());
    }

    #[test]
    fn literal_binding_is_fatal() {
        let err = resolve_src("1 = 2").unwrap_err();
        match err {
            ResolveError::UnhandledBinding { dump, .. } => assert!(dump.contains("constant_int 1")),
            other => panic!("Expected unhandled binding, got {:?}", other),
        }
    }
}
