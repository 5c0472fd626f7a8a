// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Node arena and the type relation.

use std::collections::HashMap;

use etch_ast::Span;

use crate::node::{Node, NodeId};
use crate::IrError;

/// Append-only arena owning every node of one compilation unit.
///
/// Nodes never change once added. Passes build new nodes and hand back
/// their ids, so an id seen by one pass keeps meaning the same value.
#[derive(Debug, Clone)]
pub struct Ir {
    nodes: Vec<Node>,
    spans: Vec<Option<Span>>,
    /// Hash-consed type nodes produced by `type_of`.
    interned: HashMap<Node, NodeId>,
}

impl Default for Ir {
    fn default() -> Self {
        Self::new()
    }
}

impl Ir {
    pub const TYPE_TYPE: NodeId = NodeId(0);
    pub const TYPE_UNRESOLVED: NodeId = NodeId(1);
    pub const TYPE_MODULE: NodeId = NodeId(2);

    pub fn new() -> Self {
        let nodes = vec![Node::TypeType, Node::TypeUnresolved, Node::TypeModule];
        let interned = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), NodeId(i as u32)))
            .collect();
        Self {
            spans: vec![None; nodes.len()],
            nodes,
            interned,
        }
    }

    pub fn add(&mut self, node: Node) -> NodeId {
        self.add_spanned(node, None)
    }

    /// Add a fresh node. The sentinels always map to their fixed ids.
    pub fn add_spanned(&mut self, node: Node, span: Option<Span>) -> NodeId {
        if let Some(id) = sentinel_id(&node) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.spans.push(span);
        id
    }

    /// Replacement for `from`, keeping its span. Returns `from` itself when
    /// nothing changed.
    pub fn rebuild(&mut self, from: NodeId, node: Node) -> NodeId {
        if self.nodes[from.index()] == node {
            return from;
        }
        let span = self.span(from);
        self.add_spanned(node, span)
    }

    /// Structurally shared node, used for types.
    pub fn intern(&mut self, node: Node) -> NodeId {
        if let Some(&id) = self.interned.get(&node) {
            return id;
        }
        let id = self.add(node.clone());
        self.interned.insert(node, id);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.spans.get(id.index()).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn type_int(&mut self, width: u32) -> NodeId {
        self.intern(Node::TypeInt { width })
    }

    pub fn empty_tuple(&mut self) -> NodeId {
        self.intern(Node::Tuple(Vec::new()))
    }

    /// Fill an identifier's type. An identifier that already has a type
    /// keeps it; asking for a different one is an error.
    pub fn resolve_identifier(&mut self, id: NodeId, ty: NodeId) -> Result<NodeId, IrError> {
        match self.node(id).clone() {
            Node::Identifier { name, ty: None } => Ok(self.rebuild(id, Node::Identifier { name, ty: Some(ty) })),
            Node::Identifier { ty: Some(existing), .. } if self.same(existing, ty) => Ok(id),
            Node::Identifier { name, .. } => Err(IrError::AlreadyResolved { name }),
            other => Err(IrError::NotAnIdentifier {
                kind: other.kind_name(),
            }),
        }
    }

    // ─── Type relation ───────────────────────────────────────────

    /// The type of a node, itself a node.
    pub fn type_of(&mut self, id: NodeId) -> NodeId {
        match self.node(id).clone() {
            // Guard: the type of types is itself.
            Node::TypeType => Self::TYPE_TYPE,
            Node::TypeUnresolved | Node::TypeInt { .. } | Node::TypeModule => Self::TYPE_TYPE,
            Node::ConstantInt { width, .. } => self.type_int(width),
            Node::Identifier { ty, .. } => ty.unwrap_or(Self::TYPE_UNRESOLVED),
            Node::IntrInt => {
                let int = self.type_int(32);
                self.intern(Node::Function {
                    arg: int,
                    body: Self::TYPE_TYPE,
                })
            }
            Node::IntrAdd | Node::IntrMul => {
                let int = self.type_int(32);
                let pair = self.intern(Node::Tuple(vec![int, int]));
                self.intern(Node::Function { arg: pair, body: int })
            }
            Node::Tuple(vals) => {
                let tys = vals.into_iter().map(|v| self.type_of(v)).collect();
                self.intern(Node::Tuple(tys))
            }
            Node::Block(vals) => match vals.last() {
                Some(&last) => self.type_of(last),
                None => self.empty_tuple(),
            },
            Node::Function { arg, body } => {
                let arg = self.type_of(arg);
                let body = self.type_of(body);
                self.intern(Node::Function { arg, body })
            }
            Node::Call { func, .. } => {
                let fn_ty = self.type_of(func);
                self.function_result(fn_ty).unwrap_or(Self::TYPE_UNRESOLVED)
            }
            Node::Definition { value, .. } => self.type_of(value),
            Node::Cast { ty, .. } => ty,
            Node::Module(_) => Self::TYPE_MODULE,
        }
    }

    /// Result type of a function type, `None` for anything else.
    pub fn function_result(&self, fn_ty: NodeId) -> Option<NodeId> {
        match self.node(fn_ty) {
            Node::Function { body, .. } => Some(*body),
            _ => None,
        }
    }

    /// True when the node denotes a type or a type constructor, i.e. its
    /// type is `type_type` or a function returning `type_type`.
    pub fn denotes_type(&mut self, id: NodeId) -> bool {
        let ty = self.type_of(id);
        ty == Self::TYPE_TYPE || self.function_result(ty) == Some(Self::TYPE_TYPE)
    }

    pub fn is_unresolved(&mut self, id: NodeId) -> bool {
        self.type_of(id) == Self::TYPE_UNRESOLVED
    }

    // ─── Structure ───────────────────────────────────────────────

    /// Structural equality, ignoring ids and spans.
    pub fn same(&self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return true;
        }
        match (self.node(a), self.node(b)) {
            (
                Node::Identifier { name: n1, ty: t1 },
                Node::Identifier { name: n2, ty: t2 },
            ) => {
                n1 == n2
                    && match (t1, t2) {
                        (Some(t1), Some(t2)) => self.same(*t1, *t2),
                        (None, None) => true,
                        _ => false,
                    }
            }
            (Node::Tuple(x), Node::Tuple(y))
            | (Node::Block(x), Node::Block(y))
            | (Node::Module(x), Node::Module(y)) => {
                x.len() == y.len() && x.iter().zip(y).all(|(x, y)| self.same(*x, *y))
            }
            (Node::Function { arg: a1, body: b1 }, Node::Function { arg: a2, body: b2 })
            | (Node::Call { func: a1, arg: b1 }, Node::Call { func: a2, arg: b2 })
            | (Node::Definition { binding: a1, value: b1 }, Node::Definition { binding: a2, value: b2 })
            | (Node::Cast { value: a1, ty: b1 }, Node::Cast { value: a2, ty: b2 }) => {
                self.same(*a1, *a2) && self.same(*b1, *b2)
            }
            (x, y) => x == y,
        }
    }

    /// Every node reachable from `root`, each listed once, parents first.
    pub fn reachable(&self, root: NodeId) -> Vec<NodeId> {
        let mut seen = std::collections::HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            let mut children = self.node(id).children();
            children.reverse();
            stack.extend(children);
        }
        order
    }
}

fn sentinel_id(node: &Node) -> Option<NodeId> {
    match node {
        Node::TypeType => Some(Ir::TYPE_TYPE),
        Node::TypeUnresolved => Some(Ir::TYPE_UNRESOLVED),
        Node::TypeModule => Some(Ir::TYPE_MODULE),
        _ => None,
    }
}
