// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Pipeline failures.

use etch_codegen::CodegenError;
use etch_diagnostics::{Diagnostic, ToDiagnostic};
use etch_ir::LowerError;
use etch_resolve::ResolveError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CompileError {
    #[error("{} syntax error(s)", .0.len())]
    Syntax(Vec<Diagnostic>),

    #[error("lowering failed: {0}")]
    Lowering(#[from] LowerError),

    #[error("resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    /// Code generation or verification failed. Warnings from resolution
    /// are kept because they usually explain the failure.
    #[error("code generation failed: {source}")]
    Codegen {
        source: CodegenError,
        warnings: Vec<Diagnostic>,
    },

    #[error("{} unresolved name(s) in strict mode", .0.len())]
    Strict(Vec<Diagnostic>),
}

impl CompileError {
    /// Everything worth showing for this failure, warnings first.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            CompileError::Syntax(diags) | CompileError::Strict(diags) => diags.clone(),
            CompileError::Lowering(e) => vec![e.to_diagnostic()],
            CompileError::Resolve(e) => vec![e.to_diagnostic()],
            CompileError::Codegen { source, warnings } => {
                let mut diags = warnings.clone();
                diags.push(source.to_diagnostic());
                diags
            }
        }
    }

    /// Name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            CompileError::Syntax(_) => "parse",
            CompileError::Lowering(_) => "lower",
            CompileError::Resolve(_) | CompileError::Strict(_) => "resolve",
            CompileError::Codegen {
                source: CodegenError::Verify(_),
                ..
            } => "verify",
            CompileError::Codegen { .. } => "codegen",
        }
    }
}
