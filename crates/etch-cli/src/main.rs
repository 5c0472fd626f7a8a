// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! etch CLI - run the compiler pipeline up to any stage.

mod commands;
mod help;
mod logger;
mod output;

use std::env;
use std::fs;
use std::process;

use etch_compiler::CompileOptions;
use etch_diagnostics::formatter::DiagnosticFormatter;
use etch_diagnostics::json;
use etch_diagnostics::Diagnostic;

/// How diagnostics are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Human,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Lex,
    Parse,
    Ir,
    Resolve,
    Fold,
    Compile,
    Check,
    Help,
    Version,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub command: Command,
    pub file: Option<String>,
    pub format: Format,
    pub options: CompileOptions,
    pub verbosity: u8,
}

fn parse_args(args: &[String]) -> Result<Cli, String> {
    let mut iter = args.iter();
    let command = match iter.next().map(String::as_str) {
        None | Some("help" | "--help" | "-h") => Command::Help,
        Some("version" | "--version" | "-V") => Command::Version,
        Some("lex") => Command::Lex,
        Some("parse") => Command::Parse,
        Some("ir") => Command::Ir,
        Some("resolve") => Command::Resolve,
        Some("fold") => Command::Fold,
        Some("compile") => Command::Compile,
        Some("check") => Command::Check,
        Some(other) => return Err(format!("unknown command `{}`", other)),
    };

    let mut cli = Cli {
        command,
        file: None,
        format: Format::Human,
        options: CompileOptions::default(),
        verbosity: 0,
    };

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--strict" => cli.options.strict = true,
            "--no-verify" => cli.options.verify = false,
            "--json" => cli.format = Format::Json,
            "--format" => {
                cli.format = match iter.next().map(String::as_str) {
                    Some("json") => Format::Json,
                    Some("human") => Format::Human,
                    Some(other) => return Err(format!("unknown format `{}`", other)),
                    None => return Err("--format needs a value".to_string()),
                }
            }
            "--module" => match iter.next() {
                Some(name) => cli.options.module_name = name.clone(),
                None => return Err("--module needs a value".to_string()),
            },
            flag if flag.starts_with("-v") && flag[1..].chars().all(|c| c == 'v') => {
                cli.verbosity = cli.verbosity.saturating_add((flag.len() - 1) as u8);
            }
            flag if flag.starts_with('-') => return Err(format!("unknown option `{}`", flag)),
            file => {
                if cli.file.is_some() {
                    return Err(format!("unexpected argument `{}`", file));
                }
                cli.file = Some(file.to_string());
            }
        }
    }

    if cli.file.is_none() && !matches!(cli.command, Command::Help | Command::Version) {
        return Err("missing input file".to_string());
    }
    Ok(cli)
}

fn main() {
    output::init();
    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("{}: {}", output::error_label(), msg);
            eprintln!("Run `etch help` for usage.");
            process::exit(1);
        }
    };
    logger::init(cli.verbosity);

    let path = cli.file.as_deref().unwrap_or_default();
    match cli.command {
        Command::Help => help::print_usage(),
        Command::Version => println!("etch {}", help::VERSION),
        Command::Lex => commands::phase::cmd_lex(path, cli.format),
        Command::Parse => commands::phase::cmd_parse(path, cli.format),
        Command::Ir => commands::phase::cmd_ir(path, cli.format),
        Command::Resolve => commands::phase::cmd_resolve(path, &cli.options, cli.format),
        Command::Fold => commands::phase::cmd_fold(path, &cli.options, cli.format),
        Command::Compile => commands::compile::cmd_compile(path, &cli.options, cli.format),
        Command::Check => commands::compile::cmd_check(path, &cli.options, cli.format),
    }
}

/// Read a source file or exit.
pub fn read_source(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: reading {}: {}", output::error_label(), output::file_path(path), e);
            process::exit(1);
        }
    }
}

/// Write diagnostics to stderr (human) or stdout (JSON).
pub fn show_diagnostics(diags: &[Diagnostic], source: &str, path: &str, phase: &str, format: Format) {
    match format {
        Format::Human => {
            let formatter = DiagnosticFormatter::new(source).with_file_name(path);
            for d in diags {
                eprintln!("{}", formatter.format(d));
            }
        }
        Format::Json => {
            let report = json::to_json_report(diags, source, path, phase);
            println!("{}", json::to_json_string(&report));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_shows_help() {
        assert_eq!(parse_args(&[]).unwrap().command, Command::Help);
    }

    #[test]
    fn flags_fill_options() {
        let cli = parse_args(&args(&[
            "compile",
            "--strict",
            "--no-verify",
            "--format",
            "json",
            "--module",
            "a.e",
            "-vv",
            "a.et",
        ]))
        .unwrap();
        assert_eq!(cli.command, Command::Compile);
        assert_eq!(cli.file.as_deref(), Some("a.et"));
        assert_eq!(cli.format, Format::Json);
        assert!(cli.options.strict);
        assert!(!cli.options.verify);
        assert_eq!(cli.options.module_name, "a.e");
        assert_eq!(cli.verbosity, 2);
    }

    #[test]
    fn defaults_match_compile_options() {
        let cli = parse_args(&args(&["check", "a.et"])).unwrap();
        assert_eq!(cli.format, Format::Human);
        assert_eq!(cli.options, CompileOptions::default());
        assert_eq!(cli.verbosity, 0);
    }

    #[test]
    fn bad_input_is_rejected() {
        assert!(parse_args(&args(&["frobnicate", "a.et"])).is_err());
        assert!(parse_args(&args(&["compile"])).is_err());
        assert!(parse_args(&args(&["compile", "--format", "xml", "a.et"])).is_err());
        assert!(parse_args(&args(&["compile", "--bogus", "a.et"])).is_err());
        assert!(parse_args(&args(&["compile", "a.et", "b.et"])).is_err());
    }
}
