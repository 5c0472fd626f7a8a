// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Full compilation: `compile` prints the backend module, `check` only
//! reports whether it could be built.

use etch_compiler::{Compilation, CompileOptions};

use super::fail;
use crate::{output, read_source, show_diagnostics, Format};

fn build(path: &str, options: &CompileOptions, format: Format) -> (Compilation, String) {
    let source = read_source(path);
    match etch_compiler::compile(&source, options) {
        Ok(compiled) => (compiled, source),
        Err(e) => fail(&e, &source, path, format),
    }
}

pub fn cmd_compile(path: &str, options: &CompileOptions, format: Format) {
    let (compiled, source) = build(path, options, format);
    show_diagnostics(&compiled.diagnostics, &source, path, "compile", format);
    if format == Format::Human {
        print!("{}", compiled.module);
        println!("; entry {}", etch_codegen::entry_symbol());
    }
}

pub fn cmd_check(path: &str, options: &CompileOptions, format: Format) {
    let (compiled, source) = build(path, options, format);
    show_diagnostics(&compiled.diagnostics, &source, path, "check", format);
    if format == Format::Human {
        println!(
            "{}",
            output::banner_ok(&format!(
                "Check: {} global(s), {} function(s)",
                compiled.module.globals.len(),
                compiled.module.functions.len()
            ))
        );
    }
}
