// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Lexical scope chain for name resolution.

use std::collections::HashMap;

use etch_ir::NodeId;

/// The kind of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Block,
}

/// One level of the scope chain. Child scopes borrow their parent, so the
/// chain lives on the call stack of the pass and disappears with it.
#[derive(Debug)]
pub struct Scope<'p> {
    parent: Option<&'p Scope<'p>>,
    pub kind: ScopeKind,
    bindings: HashMap<String, NodeId>,
}

impl<'p> Scope<'p> {
    pub fn root(kind: ScopeKind) -> Self {
        Self {
            parent: None,
            kind,
            bindings: HashMap::new(),
        }
    }

    pub fn child(&self, kind: ScopeKind) -> Scope<'_> {
        Scope {
            parent: Some(self),
            kind,
            bindings: HashMap::new(),
        }
    }

    /// Look a name up through the chain, innermost first.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        let mut scope = Some(self);
        while let Some(s) = scope {
            if let Some(&value) = s.bindings.get(name) {
                return Some(value);
            }
            scope = s.parent;
        }
        None
    }

    /// Look a name up in this scope only.
    pub fn lookup_local(&self, name: &str) -> Option<NodeId> {
        self.bindings.get(name).copied()
    }

    /// Bind a name in this scope. Shadowing replaces an earlier binding.
    pub fn define(&mut self, name: impl Into<String>, value: NodeId) {
        self.bindings.insert(name.into(), value);
    }
}
