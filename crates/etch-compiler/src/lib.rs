// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The etch compilation pipeline.
//!
//! lex → parse → lower → resolve → fold → codegen → verify. Each stage is
//! exposed on its own so tools can stop early and inspect the result.

mod error;
mod options;

pub use error::CompileError;
pub use options::CompileOptions;

use etch_ast::syntax::Module;
use etch_diagnostics::{Diagnostic, ToDiagnostic};
use etch_ir::Unit;
use etch_mir::MirModule;

/// A successful compilation.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub module: MirModule,
    /// Non-fatal diagnostics, currently the unresolved-name warnings.
    pub diagnostics: Vec<Diagnostic>,
    /// Dump of the folded IR that code generation consumed.
    pub ir_dump: String,
}

/// IR after resolution (and possibly folding) with its warnings.
#[derive(Debug, Clone)]
pub struct Analyzed {
    pub unit: Unit,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lex and parse. Every lex and parse error is reported, not only the first.
pub fn parse(source: &str) -> Result<Module, CompileError> {
    let lexed = etch_lexer::Lexer::new(source).tokenize();
    if !lexed.is_ok() {
        return Err(CompileError::Syntax(lexed.errors.iter().map(|e| e.to_diagnostic()).collect()));
    }
    let parsed = etch_parser::Parser::new(lexed.tokens).parse();
    if !parsed.is_ok() {
        return Err(CompileError::Syntax(parsed.errors.iter().map(|e| e.to_diagnostic()).collect()));
    }
    Ok(parsed.module)
}

/// Parse and lower to IR.
pub fn lower(source: &str) -> Result<Unit, CompileError> {
    let module = parse(source)?;
    log::debug!("lowering {} statement(s)", module.stmts.len());
    Ok(etch_ir::lower(&module)?)
}

/// Lower and resolve names.
pub fn resolve(source: &str, options: &CompileOptions) -> Result<Analyzed, CompileError> {
    let unit = lower(source)?;
    let resolution = etch_resolve::resolve(unit)?;
    let diagnostics: Vec<Diagnostic> = resolution.diagnostics.iter().map(|u| u.to_diagnostic()).collect();
    if options.strict && !diagnostics.is_empty() {
        return Err(CompileError::Strict(diagnostics.into_iter().map(promote).collect()));
    }
    Ok(Analyzed {
        unit: resolution.unit,
        diagnostics,
    })
}

/// Resolve and fold constants.
pub fn fold(source: &str, options: &CompileOptions) -> Result<Analyzed, CompileError> {
    let analyzed = resolve(source, options)?;
    Ok(Analyzed {
        unit: etch_fold::fold(analyzed.unit),
        diagnostics: analyzed.diagnostics,
    })
}

/// Run the whole pipeline.
pub fn compile(source: &str, options: &CompileOptions) -> Result<Compilation, CompileError> {
    let Analyzed { mut unit, diagnostics } = fold(source, options)?;
    let ir_dump = unit.dump();

    let generated = etch_codegen::generate(&mut unit, &options.module_name).and_then(|module| {
        if options.verify {
            etch_codegen::verify_module(&module)?;
        }
        Ok(module)
    });
    let module = match generated {
        Ok(module) => module,
        Err(source) => {
            return Err(CompileError::Codegen {
                source,
                warnings: diagnostics,
            })
        }
    };

    log::info!(
        "compiled {}: {} global(s), {} function(s)",
        module.name,
        module.globals.len(),
        module.functions.len()
    );
    Ok(Compilation {
        module,
        diagnostics,
        ir_dump,
    })
}

/// Strict mode reports warnings as errors.
fn promote(mut diagnostic: Diagnostic) -> Diagnostic {
    diagnostic.severity = etch_diagnostics::Severity::Error;
    diagnostic
}
