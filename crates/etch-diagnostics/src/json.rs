// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! JSON diagnostic output for machine consumption (`--format json`).

use serde::Serialize;

use etch_ast::LineMap;

use crate::{codes::ErrorCodeRegistry, Diagnostic, LabelStyle, Severity};

/// All diagnostics of one compiler run.
#[derive(Debug, Serialize)]
pub struct DiagnosticReport {
    /// Schema version.
    pub version: u32,
    pub file: String,
    /// True when no diagnostic is an error.
    pub success: bool,
    /// The command or phase that produced the diagnostics.
    pub phase: String,
    pub diagnostics: Vec<JsonDiagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
}

#[derive(Debug, Serialize)]
pub struct JsonDiagnostic {
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub message: String,
    /// Start of the primary label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
    pub labels: Vec<JsonLabel>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// 1-based line and column.
#[derive(Debug, Serialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub byte_offset: usize,
    pub source_line: String,
}

#[derive(Debug, Serialize)]
pub struct JsonLabel {
    pub role: LabelStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub start: SourceLocation,
    pub end: SourceLocation,
}

/// Build a report for `diagnostics` against `source`.
pub fn to_json_report(diagnostics: &[Diagnostic], source: &str, file: &str, phase: &str) -> DiagnosticReport {
    let registry = ErrorCodeRegistry::default();
    let line_map = LineMap::new(source);
    let locate = |offset: usize| {
        let (line, column) = line_map.offset_to_line_col(offset);
        SourceLocation {
            line,
            column,
            byte_offset: offset,
            source_line: line_map.line_text(source, line).unwrap_or("").to_string(),
        }
    };

    let diagnostics: Vec<JsonDiagnostic> = diagnostics
        .iter()
        .map(|d| {
            let code = d.code.as_ref().map(|c| c.0.clone());
            JsonDiagnostic {
                severity: d.severity,
                category: code
                    .as_deref()
                    .and_then(|c| registry.get(c))
                    .map(|info| info.category.to_string()),
                code,
                message: d.message.clone(),
                location: d.primary_span().map(|s| locate(s.start)),
                labels: d
                    .labels
                    .iter()
                    .map(|l| JsonLabel {
                        role: l.style,
                        message: l.message.clone(),
                        start: locate(l.span.start),
                        end: locate(l.span.end),
                    })
                    .collect(),
                notes: d.notes.clone(),
                help: d.help.clone(),
            }
        })
        .collect();

    let error_count = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
    let warning_count = diagnostics.iter().filter(|d| d.severity == Severity::Warning).count();
    DiagnosticReport {
        version: 1,
        file: file.to_string(),
        success: error_count == 0,
        phase: phase.to_string(),
        diagnostics,
        error_count,
        warning_count,
    }
}

/// Serialize a report to pretty JSON.
pub fn to_json_string(report: &DiagnosticReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use etch_ast::Span;

    #[test]
    fn report_counts_and_locates() {
        let src = "a = q + 1\n";
        let diags = vec![
            Diagnostic::warning("unresolved name `q`")
                .with_code("E0201")
                .with_primary(Span::new(4, 5), "not found in this scope"),
            Diagnostic::error("unresolved type reached code generation").with_code("E0303"),
        ];
        let report = to_json_report(&diags, src, "a.et", "compile");
        assert!(!report.success);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.warning_count, 1);

        let first = &report.diagnostics[0];
        assert_eq!(first.category.as_deref(), Some("Resolution"));
        let loc = first.location.as_ref().unwrap();
        assert_eq!((loc.line, loc.column), (1, 5));
        assert_eq!(loc.source_line, "a = q + 1");

        let value: serde_json::Value = serde_json::from_str(&to_json_string(&report)).unwrap();
        assert_eq!(value["diagnostics"][0]["severity"], "warning");
        assert_eq!(value["diagnostics"][0]["labels"][0]["role"], "primary");
        assert!(value["diagnostics"][1].get("location").is_none());
    }
}
