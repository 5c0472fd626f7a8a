// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! etch code generator - resolved IR → backend module.
//!
//! Every top-level definition becomes a global named by its mangled path.
//! Functions, including anonymous ones, are hoisted to the top level.
//! Code generation never runs before names are resolved: an unresolved
//! type reaching this stage is an error.

mod builder;
mod mangle;
mod module;
mod scope;
mod types;

pub use mangle::{entry_symbol, mangle, ENTRY_PATH};
pub use module::CodeGenerator;
pub use types::lower_type;

use std::error::Error;
use std::fmt;

use etch_ast::Span;
use etch_ir::{Ir, NodeId, Unit};
use etch_mir::{MirModule, VerifyError};

#[derive(Debug, Clone, PartialEq)]
pub enum CodegenError {
    /// A module-level value with no global form.
    UnhandledGlobal { dump: String, span: Option<Span> },
    /// A value that cannot be computed inside a function body.
    UnhandledLocal { dump: String, span: Option<Span> },
    /// A binding pattern other than a name, cast or tuple.
    UnhandledBinding { dump: String, span: Option<Span> },
    UnresolvedType { dump: String, span: Option<Span> },
    /// A type with no backend representation.
    UnhandledType { dump: String },
    UnknownSymbol { name: String, span: Option<Span> },
    /// A function body refers to a local of an enclosing function.
    CapturedLocal { name: String, span: Option<Span> },
    /// A module member that is not a definition.
    ModuleExpression { dump: String, span: Option<Span> },
    Verify(Vec<VerifyError>),
}

impl CodegenError {
    pub(crate) fn unhandled_global(ir: &mut Ir, id: NodeId) -> Self {
        CodegenError::UnhandledGlobal {
            dump: ir.dump(id),
            span: ir.span(id),
        }
    }

    pub(crate) fn unhandled_local(ir: &mut Ir, id: NodeId) -> Self {
        CodegenError::UnhandledLocal {
            dump: ir.dump(id),
            span: ir.span(id),
        }
    }

    pub(crate) fn unhandled_binding(ir: &mut Ir, id: NodeId) -> Self {
        CodegenError::UnhandledBinding {
            dump: ir.dump(id),
            span: ir.span(id),
        }
    }

    pub(crate) fn unresolved(ir: &mut Ir, id: NodeId) -> Self {
        CodegenError::UnresolvedType {
            dump: ir.dump(id),
            span: ir.span(id),
        }
    }

    pub(crate) fn unhandled_type(ir: &mut Ir, id: NodeId) -> Self {
        CodegenError::UnhandledType { dump: ir.dump(id) }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            CodegenError::UnhandledGlobal { span, .. }
            | CodegenError::UnhandledLocal { span, .. }
            | CodegenError::UnhandledBinding { span, .. }
            | CodegenError::UnresolvedType { span, .. }
            | CodegenError::UnknownSymbol { span, .. }
            | CodegenError::CapturedLocal { span, .. }
            | CodegenError::ModuleExpression { span, .. } => *span,
            CodegenError::UnhandledType { .. } | CodegenError::Verify(_) => None,
        }
    }
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CodegenError::UnhandledGlobal { dump, .. } => write!(f, "cannot emit global for {}", dump),
            CodegenError::UnhandledLocal { dump, .. } => write!(f, "cannot emit value for {}", dump),
            CodegenError::UnhandledBinding { dump, .. } => write!(f, "cannot bind to {}", dump),
            CodegenError::UnresolvedType { dump, .. } => write!(f, "unresolved type reached code generation: {}", dump),
            CodegenError::UnhandledType { dump } => write!(f, "no backend type for {}", dump),
            CodegenError::UnknownSymbol { name, .. } => write!(f, "unknown symbol `{}`", name),
            CodegenError::CapturedLocal { name, .. } => {
                write!(f, "`{}` is a local of an enclosing function; closures cannot capture", name)
            }
            CodegenError::ModuleExpression { dump, .. } => {
                write!(f, "module members must be definitions, found {}", dump)
            }
            CodegenError::Verify(errors) => {
                write!(f, "generated module failed verification")?;
                for e in errors {
                    write!(f, "\n  {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl Error for CodegenError {}

pub type CodegenResult<T> = Result<T, CodegenError>;

/// Lower every module of a resolved unit into one backend module.
pub fn generate(unit: &mut Unit, module_name: &str) -> CodegenResult<MirModule> {
    let modules = unit.modules.clone();
    let mut gen = CodeGenerator::new(&mut unit.ir, module_name);
    for m in modules {
        gen.gen_module(m)?;
    }
    let module = gen.finish();
    log::debug!(
        "codegen finished: {} global(s), {} function(s)",
        module.globals.len(),
        module.functions.len()
    );
    Ok(module)
}

/// Run the backend verifier over a generated module.
pub fn verify_module(module: &MirModule) -> CodegenResult<()> {
    etch_mir::verify(module).map_err(CodegenError::Verify)
}
