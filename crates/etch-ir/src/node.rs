// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! IR node kinds.
//!
//! Types are ordinary nodes: `TypeInt`, tuples of types and function nodes
//! whose argument and body are types all describe other values.

/// Index of a node in its [`Ir`](crate::Ir) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A value in the IR. Children are referenced by id and always have a
/// smaller id than their parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    /// The type of types; its own type is itself.
    TypeType,
    /// Placeholder type before resolution.
    TypeUnresolved,
    TypeInt { width: u32 },
    TypeModule,

    ConstantInt { value: i64, width: u32 },
    /// A name. `ty` is filled by resolution by building a new node.
    Identifier { name: String, ty: Option<NodeId> },

    // Built-ins
    IntrInt,
    IntrAdd,
    IntrMul,

    Tuple(Vec<NodeId>),
    Block(Vec<NodeId>),
    Function { arg: NodeId, body: NodeId },
    Call { func: NodeId, arg: NodeId },
    Definition { binding: NodeId, value: NodeId },
    Cast { value: NodeId, ty: NodeId },
    Module(Vec<NodeId>),
}

impl Node {
    pub fn identifier(name: impl Into<String>) -> Node {
        Node::Identifier {
            name: name.into(),
            ty: None,
        }
    }

    pub fn constant(value: i64) -> Node {
        Node::ConstantInt { value, width: 32 }
    }

    /// Short name used by the dump printer and error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::TypeType => "type_type",
            Node::TypeUnresolved => "type_unresolved",
            Node::TypeInt { .. } => "type_int",
            Node::TypeModule => "type_module",
            Node::ConstantInt { .. } => "constant_int",
            Node::Identifier { .. } => "identifier",
            Node::IntrInt => "intr_int",
            Node::IntrAdd => "intr_add",
            Node::IntrMul => "intr_mul",
            Node::Tuple(_) => "tuple",
            Node::Block(_) => "block",
            Node::Function { .. } => "function",
            Node::Call { .. } => "call",
            Node::Definition { .. } => "definition",
            Node::Cast { .. } => "cast",
            Node::Module(_) => "module",
        }
    }

    /// Child ids in evaluation order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            Node::TypeType
            | Node::TypeUnresolved
            | Node::TypeInt { .. }
            | Node::TypeModule
            | Node::ConstantInt { .. }
            | Node::IntrInt
            | Node::IntrAdd
            | Node::IntrMul => Vec::new(),
            Node::Identifier { ty, .. } => ty.iter().copied().collect(),
            Node::Tuple(vals) | Node::Block(vals) | Node::Module(vals) => vals.clone(),
            Node::Function { arg, body } => vec![*arg, *body],
            Node::Call { func, arg } => vec![*func, *arg],
            Node::Definition { binding, value } => vec![*binding, *value],
            Node::Cast { value, ty } => vec![*ty, *value],
        }
    }

    pub fn is_intrinsic(&self) -> bool {
        matches!(self, Node::IntrInt | Node::IntrAdd | Node::IntrMul)
    }
}
