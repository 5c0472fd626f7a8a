// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terminal formatter for diagnostics.
//!
//! ```text
//! error[E0306]: function refers to `x` from an enclosing function
//!   --> add.et:1:19
//!    |
//!  1 | f = (x) -> (y) -> x + y
//!    |                   ^ captured here
//!    |
//!    = note: functions cannot capture locals
//!    = help: pass `x` as an argument instead
//! ```
//!
//! Colouring goes through `colored`, which already honours `NO_COLOR`.

use std::collections::BTreeMap;

use colored::Colorize;

use etch_ast::LineMap;

use crate::{Diagnostic, LabelStyle, Severity};

/// Formats diagnostics for terminal output.
pub struct DiagnosticFormatter<'a> {
    source: &'a str,
    file_name: Option<&'a str>,
    line_map: LineMap,
}

struct Annotation {
    col_start: usize,
    col_end: usize,
    style: LabelStyle,
    message: Option<String>,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            file_name: None,
            line_map: LineMap::new(source),
        }
    }

    pub fn with_file_name(mut self, name: &'a str) -> Self {
        self.file_name = Some(name);
        self
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        self.format_header(&mut out, diagnostic);

        let lines = self.annotated_lines(diagnostic);
        let gutter = lines
            .keys()
            .last()
            .map(|n| n.to_string().len())
            .unwrap_or(1)
            .max(2);

        if let Some(span) = diagnostic.primary_span() {
            let (line, col) = self.line_map.offset_to_line_col(span.start);
            out.push_str(&format!(
                "{}{} {}:{}:{}\n",
                " ".repeat(gutter - 1),
                "-->".blue(),
                self.file_name.unwrap_or("<source>"),
                line,
                col
            ));
            out.push_str(&format!("{} {}\n", " ".repeat(gutter + 1), "|".blue()));
        }

        let mut prev: Option<usize> = None;
        for (line_num, annotations) in &lines {
            if prev.is_some_and(|p| *line_num > p + 1) {
                out.push_str(&format!("{} {}\n", " ".repeat(gutter), "...".blue()));
            }
            let text = self.line_map.line_text(self.source, *line_num).unwrap_or("");
            out.push_str(&format!(
                "{:>width$} {} {}\n",
                line_num.to_string().blue().bold(),
                "|".blue(),
                text,
                width = gutter + 1,
            ));
            for ann in annotations {
                self.format_annotation(&mut out, ann, gutter);
            }
            prev = Some(*line_num);
        }

        self.format_footer(&mut out, diagnostic, gutter, !lines.is_empty());
        out
    }

    fn format_header(&self, out: &mut String, diagnostic: &Diagnostic) {
        let severity = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Note => "note".blue().bold(),
        };
        match &diagnostic.code {
            Some(code) => out.push_str(&format!(
                "{}[{}]: {}\n",
                severity,
                code.0.as_str().bold(),
                diagnostic.message.bold()
            )),
            None => out.push_str(&format!("{}: {}\n", severity, diagnostic.message.bold())),
        }
    }

    fn format_footer(&self, out: &mut String, diagnostic: &Diagnostic, gutter: usize, has_source: bool) {
        let pad = " ".repeat(gutter + 1);
        if has_source && (!diagnostic.notes.is_empty() || diagnostic.help.is_some()) {
            out.push_str(&format!("{} {}\n", pad, "|".blue()));
        }
        for note in &diagnostic.notes {
            out.push_str(&format!("{} {} {}: {}\n", pad, "=".cyan(), "note".cyan().bold(), note));
        }
        if let Some(help) = &diagnostic.help {
            out.push_str(&format!("{} {} {}: {}\n", pad, "=".cyan(), "help".cyan().bold(), help));
        }
    }

    /// Labels grouped by the line they start on. A label spanning several
    /// lines is underlined to the end of its first line.
    fn annotated_lines(&self, diagnostic: &Diagnostic) -> BTreeMap<usize, Vec<Annotation>> {
        let mut lines: BTreeMap<usize, Vec<Annotation>> = BTreeMap::new();
        for label in &diagnostic.labels {
            let (line, col_start) = self.line_map.offset_to_line_col(label.span.start);
            let (end_line, end_col) = self.line_map.offset_to_line_col(label.span.end);
            let col_end = if end_line == line {
                end_col
            } else {
                self.line_map.line_text(self.source, line).map_or(col_start, |t| t.len() + 1)
            };
            lines.entry(line).or_default().push(Annotation {
                col_start,
                col_end: col_end.max(col_start + 1),
                style: label.style,
                message: label.message.clone(),
            });
        }
        for annotations in lines.values_mut() {
            annotations.sort_by_key(|a| (a.style != LabelStyle::Primary, a.col_start));
        }
        lines
    }

    fn format_annotation(&self, out: &mut String, ann: &Annotation, gutter: usize) {
        let width = ann.col_end - ann.col_start;
        let (marks, message) = match ann.style {
            LabelStyle::Primary => (
                "^".repeat(width).red().bold(),
                ann.message.as_deref().unwrap_or("").red().bold(),
            ),
            LabelStyle::Secondary => (
                "-".repeat(width).blue(),
                ann.message.as_deref().unwrap_or("").blue(),
            ),
        };
        let line = format!(
            "{} {} {}{} {}",
            " ".repeat(gutter + 1),
            "|".blue(),
            " ".repeat(ann.col_start - 1),
            marks,
            message
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etch_ast::Span;

    fn plain(source: &str, diag: &Diagnostic) -> String {
        colored::control::set_override(false);
        DiagnosticFormatter::new(source).with_file_name("t.et").format(diag)
    }

    #[test]
    fn renders_snippet_with_carets() {
        let src = "x = 1\nf = (x) -> (y) -> x + y\n";
        let diag = Diagnostic::error("function refers to `x` from an enclosing function")
            .with_code("E0306")
            .with_primary(Span::new(24, 25), "captured here")
            .with_note("functions cannot capture locals");
        let out = plain(src, &diag);
        assert!(out.starts_with("error[E0306]: function refers to `x`"), "{}", out);
        assert!(out.contains("--> t.et:2:19"), "{}", out);
        assert!(out.contains(" 2 | f = (x) -> (y) -> x + y"), "{}", out);
        assert!(out.contains(&format!("| {}^ captured here", " ".repeat(18))), "{}", out);
        assert!(out.contains("= note: functions cannot capture locals"), "{}", out);
    }

    #[test]
    fn diagnostic_without_labels_prints_header_and_notes() {
        let diag = Diagnostic::error("generated module failed verification").with_note("bb0 is not terminated");
        let out = plain("", &diag);
        assert!(!out.contains("-->"));
        assert!(out.contains("= note: bb0 is not terminated"));
    }

    #[test]
    fn distant_lines_are_separated() {
        let src = "a = 1\nb = 2\nc = 3\nd = 4\n";
        let diag = Diagnostic::error("e")
            .with_primary(Span::new(0, 1), "first")
            .with_secondary(Span::new(18, 19), "second");
        let out = plain(src, &diag);
        assert!(out.contains("..."), "{}", out);
        assert!(out.contains("- second"), "{}", out);
    }
}
