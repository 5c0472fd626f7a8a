// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Help text.

use crate::output;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_usage() {
    println!("{} {} - the etch compiler", output::title("etch"), output::version(VERSION));
    println!();
    println!(
        "{}: {} {} {} {}",
        output::section_header("Usage"),
        output::command("etch"),
        output::arg("<command>"),
        output::arg("[options]"),
        output::arg("<file>")
    );
    println!();
    println!("{}", output::section_header("Compilation Phases:"));
    println!("  {} {}       Tokenize a file and print tokens", output::command("lex"), output::arg("<file>"));
    println!("  {} {}     Parse a file and print the syntax tree", output::command("parse"), output::arg("<file>"));
    println!("  {} {}        Dump the IR before resolution", output::command("ir"), output::arg("<file>"));
    println!("  {} {}   Dump the IR after name resolution", output::command("resolve"), output::arg("<file>"));
    println!("  {} {}      Dump the IR after constant folding", output::command("fold"), output::arg("<file>"));
    println!("  {} {}   Print the generated backend module", output::command("compile"), output::arg("<file>"));
    println!("  {} {}     Compile without printing the module", output::command("check"), output::arg("<file>"));
    println!("  {}             Show this help", output::command("help"));
    println!("  {}          Show version", output::command("version"));
    println!();
    println!("{}", output::section_header("Options:"));
    println!("  {}            Fail on unresolved names", output::arg("--strict"));
    println!("  {}         Skip backend module verification", output::arg("--no-verify"));
    println!("  {} Diagnostic output format (default: human)", output::arg("--format json|human"));
    println!("  {}        Name of the generated module", output::arg("--module <name>"));
    println!("  {}            More logging (repeat for more)", output::arg("-v, -vv"));
    println!();
    println!("{}", output::section_header("Environment:"));
    println!("  {}    Log level: error, warn, info, debug or trace", output::arg("ETCH_LOG"));
    println!("  {}    Disable colours", output::arg("NO_COLOR"));
    println!("  {} Force colours when not writing to a terminal", output::arg("FORCE_COLOR"));
}
