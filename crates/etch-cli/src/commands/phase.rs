// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Compiler phase inspection commands: lex, parse, ir, resolve, fold.

use std::process;

use etch_compiler::{Analyzed, CompileOptions};
use etch_diagnostics::{Diagnostic, ToDiagnostic};

use super::{capitalize, fail};
use crate::{output, read_source, show_diagnostics, Format};

pub fn cmd_lex(path: &str, format: Format) {
    let source = read_source(path);
    let result = etch_lexer::Lexer::new(&source).tokenize();

    if !result.is_ok() {
        let diags: Vec<Diagnostic> = result.errors.iter().map(|e| e.to_diagnostic()).collect();
        show_diagnostics(&diags, &source, path, "lex", format);
        if format == Format::Human {
            eprintln!("\n{}", output::banner_fail("Lex", result.errors.len()));
        }
        process::exit(1);
    }

    if format == Format::Human {
        println!("{}\n", output::section(&format!("Tokens ({})", result.tokens.len())));
        for tok in &result.tokens {
            println!("{:4}:{:<3} {:?}", tok.span.start, tok.span.end, tok.kind);
        }
        println!("\n{}", output::banner_ok("Lex"));
    } else {
        show_diagnostics(&[], &source, path, "lex", format);
    }
}

pub fn cmd_parse(path: &str, format: Format) {
    let source = read_source(path);
    let module = match etch_compiler::parse(&source) {
        Ok(m) => m,
        Err(e) => fail(&e, &source, path, format),
    };

    if format == Format::Human {
        println!("{}\n", output::section(&format!("Syntax ({} statements)", module.stmts.len())));
        for (i, stmt) in module.stmts.iter().enumerate() {
            println!("--- Statement {} ---", i + 1);
            println!("{:#?}", stmt);
            println!();
        }
        println!("{}", output::banner_ok("Parse"));
    } else {
        show_diagnostics(&[], &source, path, "parse", format);
    }
}

pub fn cmd_ir(path: &str, format: Format) {
    let source = read_source(path);
    let mut unit = match etch_compiler::lower(&source) {
        Ok(u) => u,
        Err(e) => fail(&e, &source, path, format),
    };
    if format == Format::Human {
        println!("{}", unit.dump());
        println!("\n{}", output::banner_ok("Lower"));
    } else {
        show_diagnostics(&[], &source, path, "lower", format);
    }
}

pub fn cmd_resolve(path: &str, options: &CompileOptions, format: Format) {
    let source = read_source(path);
    match etch_compiler::resolve(&source, options) {
        Ok(analyzed) => print_analyzed(analyzed, &source, path, "resolve", format),
        Err(e) => fail(&e, &source, path, format),
    }
}

pub fn cmd_fold(path: &str, options: &CompileOptions, format: Format) {
    let source = read_source(path);
    match etch_compiler::fold(&source, options) {
        Ok(analyzed) => print_analyzed(analyzed, &source, path, "fold", format),
        Err(e) => fail(&e, &source, path, format),
    }
}

fn print_analyzed(mut analyzed: Analyzed, source: &str, path: &str, phase: &str, format: Format) {
    match format {
        Format::Human => {
            show_diagnostics(&analyzed.diagnostics, source, path, phase, format);
            println!("{}", analyzed.unit.dump());
            let warnings = analyzed.diagnostics.len();
            let banner = if warnings == 0 {
                capitalize(phase)
            } else {
                format!("{} ({} warning(s))", capitalize(phase), warnings)
            };
            println!("\n{}", output::banner_ok(&banner));
        }
        Format::Json => show_diagnostics(&analyzed.diagnostics, source, path, phase, format),
    }
}
