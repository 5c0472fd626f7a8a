// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Typed intermediate representation for the etch compiler.
//!
//! Nodes live in an [`Ir`] arena and are addressed by [`NodeId`]. Types are
//! nodes too: the type of `type_type` is itself, which terminates every
//! `type_of` chain.

mod arena;
mod dump;
mod lower;
mod node;

pub use arena::Ir;
pub use lower::lower;
pub use node::{Node, NodeId};

use etch_ast::Span;
use thiserror::Error;

/// Misuse of the arena API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IrError {
    #[error("identifier `{name}` already has a different resolved type")]
    AlreadyResolved { name: String },

    #[error("expected an identifier, found {kind}")]
    NotAnIdentifier { kind: &'static str },
}

/// Structural lowering failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LowerError {
    #[error("unknown intrinsic `@{name}`")]
    UnknownIntrinsic { name: String, span: Span },
}

impl LowerError {
    pub fn span(&self) -> Span {
        match self {
            LowerError::UnknownIntrinsic { span, .. } => *span,
        }
    }
}

/// One compilation unit: the arena plus its top-level modules.
///
/// Each pass takes a unit by value and hands back a new one whose module
/// ids point at the rewritten trees.
#[derive(Debug, Clone)]
pub struct Unit {
    pub ir: Ir,
    pub modules: Vec<NodeId>,
}

impl Unit {
    pub fn dump(&mut self) -> String {
        let modules = self.modules.clone();
        self.ir.dump_unit(&modules)
    }
}
