// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Conversions from compiler error types to `Diagnostic`.

use crate::codes::*;
use crate::{Diagnostic, ToDiagnostic};

// ============================================================================
// Syntax
// ============================================================================

impl ToDiagnostic for etch_lexer::LexError {
    fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(&self.message)
            .with_code(INVALID_TOKEN)
            .with_primary(self.span, "not a valid token");
        match &self.hint {
            Some(hint) => diag.with_help(hint.as_str()),
            None => diag,
        }
    }
}

impl ToDiagnostic for etch_parser::ParseError {
    fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(&self.message)
            .with_code(SYNTAX_ERROR)
            .with_primary(self.span, "here");
        match &self.hint {
            Some(hint) => diag.with_help(hint.as_str()),
            None => diag,
        }
    }
}

// ============================================================================
// Lowering and resolution
// ============================================================================

impl ToDiagnostic for etch_ir::LowerError {
    fn to_diagnostic(&self) -> Diagnostic {
        match self {
            etch_ir::LowerError::UnknownIntrinsic { name, span } => {
                Diagnostic::error(format!("unknown intrinsic `@{}`", name))
                    .with_code(UNKNOWN_INTRINSIC)
                    .with_primary(*span, "no such intrinsic")
                    .with_help("the intrinsics are `@int`, `@add` and `@mul`")
            }
        }
    }
}

impl ToDiagnostic for etch_ir::IrError {
    fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string())
            .with_code(IR_MISUSE)
            .with_note("this is a compiler bug")
    }
}

impl ToDiagnostic for etch_resolve::ResolveError {
    fn to_diagnostic(&self) -> Diagnostic {
        match self {
            etch_resolve::ResolveError::UnhandledBinding { dump, span } => {
                Diagnostic::error("cannot bind to this expression")
                    .with_code(UNHANDLED_BINDING)
                    .with_primary_opt(*span, "not a name, typed name or tuple")
                    .with_note(format!("pattern: {}", dump))
            }
            etch_resolve::ResolveError::Redefinition { name, span, previous } => {
                Diagnostic::error(format!("`{}` is defined more than once", name))
                    .with_code(REDEFINED_NAME)
                    .with_primary_opt(*span, "redefined here")
                    .with_secondary_opt(*previous, "first defined here")
                    .with_help("module-level names become globals; pick a different name")
            }
            etch_resolve::ResolveError::Ir(e) => e.to_diagnostic(),
        }
    }
}

impl ToDiagnostic for etch_resolve::Unresolved {
    fn to_diagnostic(&self) -> Diagnostic {
        match &self.name {
            Some(name) => Diagnostic::warning(format!("unresolved name `{}`", name))
                .with_code(UNRESOLVED_NAME)
                .with_primary_opt(self.span, "not found in this scope"),
            None => Diagnostic::warning("type could not be resolved")
                .with_code(UNRESOLVED_TYPE)
                .with_primary_opt(self.span, "type unknown")
                .with_note(format!("node: {}", self.dump)),
        }
    }
}

// ============================================================================
// Code generation
// ============================================================================

impl ToDiagnostic for etch_codegen::CodegenError {
    fn to_diagnostic(&self) -> Diagnostic {
        use etch_codegen::CodegenError::*;

        match self {
            UnhandledGlobal { dump, span } => Diagnostic::error("value cannot be stored in a global")
                .with_code(UNHANDLED_GLOBAL)
                .with_primary_opt(*span, "no global form")
                .with_note(format!("value: {}", dump)),

            UnhandledLocal { dump, span } => Diagnostic::error("value cannot be computed at runtime")
                .with_code(UNHANDLED_LOCAL)
                .with_primary_opt(*span, "compile-time only")
                .with_note(format!("value: {}", dump)),

            UnhandledBinding { dump, span } => Diagnostic::error("cannot bind to this pattern")
                .with_code(UNHANDLED_PATTERN)
                .with_primary_opt(*span, "unsupported pattern")
                .with_note(format!("pattern: {}", dump)),

            UnresolvedType { dump, span } => Diagnostic::error("unresolved type reached code generation")
                .with_code(UNRESOLVED_IN_CODEGEN)
                .with_primary_opt(*span, "type unknown")
                .with_note(format!("node: {}", dump))
                .with_help("define every name before it is used"),

            UnhandledType { dump } => Diagnostic::error("type has no backend representation")
                .with_code(NO_BACKEND_TYPE)
                .with_note(format!("type: {}", dump)),

            UnknownSymbol { name, span } => Diagnostic::error(format!("unknown symbol `{}`", name))
                .with_code(UNKNOWN_SYMBOL)
                .with_primary_opt(*span, "not defined"),

            CapturedLocal { name, span } => Diagnostic::error(format!(
                "function refers to `{}` from an enclosing function",
                name
            ))
            .with_code(CAPTURED_LOCAL)
            .with_primary_opt(*span, "captured here")
            .with_note("functions cannot capture locals")
            .with_help(format!("pass `{}` as an argument instead", name)),

            ModuleExpression { dump, span } => Diagnostic::error("module members must be definitions")
                .with_code(MODULE_EXPRESSION)
                .with_primary_opt(*span, "expression in module")
                .with_note(format!("found: {}", dump))
                .with_help("bind the value to a name: `name = ...`"),

            Verify(errors) => {
                let diag = Diagnostic::error(format!(
                    "generated module failed verification ({} problem{})",
                    errors.len(),
                    if errors.len() == 1 { "" } else { "s" }
                ))
                .with_code(VERIFICATION_FAILED);
                errors.iter().fold(diag, |d, e| d.with_note(e.to_string()))
            }
        }
    }
}

impl ToDiagnostic for etch_mir::VerifyError {
    fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string()).with_code(VERIFICATION_FAILED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;
    use etch_ast::Span;

    #[test]
    fn parse_error_keeps_hint() {
        let err = etch_parser::ParseError {
            span: Span::new(3, 5),
            message: "expected expression, found '->'".into(),
            hint: Some("a function needs an argument before '->'".into()),
        };
        let d = err.to_diagnostic();
        assert_eq!(d.code.clone().map(|c| c.0), Some(SYNTAX_ERROR.to_string()));
        assert_eq!(d.primary_span(), Some(Span::new(3, 5)));
        assert!(d.help.is_some());
    }

    #[test]
    fn unresolved_names_are_warnings() {
        let u = etch_resolve::Unresolved {
            node: etch_ir::NodeId(7),
            name: Some("q".into()),
            span: Some(Span::new(4, 5)),
            dump: "(identifier q) :: type_unresolved".into(),
        };
        let d = u.to_diagnostic();
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.message, "unresolved name `q`");
    }

    #[test]
    fn redefinition_points_at_both_definitions() {
        let err = etch_resolve::ResolveError::Redefinition {
            name: "x".into(),
            span: Some(Span::new(6, 7)),
            previous: Some(Span::new(0, 1)),
        };
        let d = err.to_diagnostic();
        assert_eq!(d.code.clone().map(|c| c.0), Some(REDEFINED_NAME.to_string()));
        assert_eq!(d.primary_span(), Some(Span::new(6, 7)));
        assert_eq!(d.labels.len(), 2);
    }

    #[test]
    fn verify_errors_become_notes() {
        let err = etch_codegen::CodegenError::Verify(vec![
            etch_mir::VerifyError::MissingEntry { symbol: "a".into() },
            etch_mir::VerifyError::DuplicateSymbol { symbol: "b".into() },
        ]);
        let d = err.to_diagnostic();
        assert_eq!(d.notes.len(), 2);
        assert!(d.message.contains("2 problems"));
    }

    #[test]
    fn codegen_error_without_span_has_no_label() {
        let err = etch_codegen::CodegenError::UnhandledType { dump: "type_module".into() };
        assert!(err.to_diagnostic().labels.is_empty());
    }
}
