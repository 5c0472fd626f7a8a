// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI command implementations.

pub mod compile;
pub mod phase;

use std::process;

use etch_compiler::CompileError;

use crate::{output, show_diagnostics, Format};

/// Report a pipeline failure and exit with status 1.
pub(crate) fn fail(err: &CompileError, source: &str, path: &str, format: Format) -> ! {
    let diags = err.diagnostics();
    show_diagnostics(&diags, source, path, err.stage(), format);
    if format == Format::Human {
        let errors = diags.iter().filter(|d| d.is_error()).count();
        eprintln!("\n{}", output::banner_fail(&capitalize(err.stage()), errors));
    }
    process::exit(1);
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
