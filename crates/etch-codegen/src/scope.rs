// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Symbol scopes used while lowering.

use std::collections::HashMap;

use etch_mir::{MirOperand, MirType, Signature};

/// What a name lowers to.
#[derive(Debug, Clone)]
pub(crate) enum Symbol {
    /// An SSA value of the current function.
    Local { value: MirOperand, ty: MirType },
    /// A global; reading it needs a load.
    Global { name: String, ty: MirType },
    /// A hoisted top-level function.
    Function { name: String, sig: Signature },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    Module,
    Function,
    Block,
}

pub(crate) struct Scope<'p> {
    parent: Option<&'p Scope<'p>>,
    kind: ScopeKind,
    symbols: HashMap<String, Symbol>,
}

impl<'p> Scope<'p> {
    pub(crate) fn root() -> Self {
        Self {
            parent: None,
            kind: ScopeKind::Module,
            symbols: HashMap::new(),
        }
    }

    pub(crate) fn child(&self, kind: ScopeKind) -> Scope<'_> {
        Scope {
            parent: Some(self),
            kind,
            symbols: HashMap::new(),
        }
    }

    pub(crate) fn define(&mut self, name: impl Into<String>, symbol: Symbol) {
        self.symbols.insert(name.into(), symbol);
    }

    /// Find a name, innermost scope first. The flag is set when the symbol
    /// lives outside the innermost enclosing function.
    pub(crate) fn lookup(&self, name: &str) -> Option<(Symbol, bool)> {
        let mut crossed = false;
        let mut scope = Some(self);
        while let Some(s) = scope {
            if let Some(symbol) = s.symbols.get(name) {
                return Some((symbol.clone(), crossed));
            }
            if s.kind == ScopeKind::Function {
                crossed = true;
            }
            scope = s.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_reports_function_boundaries() {
        let mut module = Scope::root();
        module.define(
            "g",
            Symbol::Global {
                name: "etch.1.g".into(),
                ty: MirType::i32(),
            },
        );
        let mut outer = module.child(ScopeKind::Function);
        outer.define(
            "x",
            Symbol::Local {
                value: MirOperand::Imm(1),
                ty: MirType::i32(),
            },
        );
        let block = outer.child(ScopeKind::Block);
        assert!(matches!(block.lookup("x"), Some((Symbol::Local { .. }, false))));

        let inner = block.child(ScopeKind::Function);
        assert!(matches!(inner.lookup("x"), Some((Symbol::Local { .. }, true))));
        assert!(matches!(inner.lookup("g"), Some((Symbol::Global { .. }, true))));
        assert!(inner.lookup("nope").is_none());
    }
}
