// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Resolution error and diagnostic types.

use etch_ast::Span;
use etch_ir::{IrError, NodeId};
use thiserror::Error;

/// A fatal resolution failure. Always an internal defect or an input shape
/// the language does not support; resolution stops immediately.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("unhandled binding: {dump}")]
    UnhandledBinding { dump: String, span: Option<Span> },

    /// A module binds the same name twice. Every module-level name becomes
    /// one global symbol.
    #[error("`{name}` is defined more than once in this module")]
    Redefinition {
        name: String,
        span: Option<Span>,
        previous: Option<Span>,
    },

    #[error(transparent)]
    Ir(#[from] IrError),
}

impl ResolveError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ResolveError::UnhandledBinding { span, .. } | ResolveError::Redefinition { span, .. } => *span,
            ResolveError::Ir(_) => None,
        }
    }
}

/// A node whose type is still unresolved after resolution. Non-fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub node: NodeId,
    /// Set when the node is a bare identifier.
    pub name: Option<String>,
    pub span: Option<Span>,
    pub dump: String,
}

impl std::fmt::Display for Unresolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "unresolved name `{}`", name),
            None => write!(f, "unresolved type: {}", self.dump),
        }
    }
}
