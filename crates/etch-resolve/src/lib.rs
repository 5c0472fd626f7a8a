// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Name and type resolution for etch IR.
//!
//! Binds names through lexical scopes (with tuple destructuring),
//! substitutes the built-in operators and tags identifiers with their
//! types. Names that cannot be bound are reported, not fatal.

mod error;
mod resolver;
mod scope;

pub use error::{ResolveError, Unresolved};
pub use resolver::Resolver;
pub use scope::{Scope, ScopeKind};

use etch_ir::Unit;

/// The result of resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub unit: Unit,
    /// Nodes whose type stayed unresolved, in visit order.
    pub diagnostics: Vec<Unresolved>,
}

/// Resolve all names in a unit.
pub fn resolve(unit: Unit) -> Result<Resolution, ResolveError> {
    Resolver::resolve(unit)
}
