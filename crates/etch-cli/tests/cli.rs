// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Runs the `etch` binary on small programs.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn write_source(dir: &tempfile::TempDir, name: &str, src: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, src).expect("write source");
    path
}

fn etch(args: &[&str], file: &PathBuf) -> Output {
    Command::new(env!("CARGO_BIN_EXE_etch"))
        .args(args)
        .arg(file)
        .env("NO_COLOR", "1")
        .env_remove("ETCH_LOG")
        .output()
        .expect("run etch")
}

#[test]
fn compile_prints_module_and_entry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = write_source(&dir, "add.et", "add2 = (x) -> x + 1\nr = add2(41)\n");
    let out = etch(&["compile"], &file);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("; module module.e"), "{}", stdout);
    assert!(stdout.contains("define i32 @etch.1.add2(i32 %0)"), "{}", stdout);
    assert!(stdout.contains("; entry etch.1.etch.rt.entry"), "{}", stdout);
}

#[test]
fn check_fails_on_codegen_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = write_source(&dir, "cap.et", "f = (x) -> (y) -> x + y\n");
    let out = etch(&["check"], &file);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("error[E0306]"), "{}", stderr);
    assert!(stderr.contains("Codegen FAILED"), "{}", stderr);
}

#[test]
fn strict_json_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = write_source(&dir, "q.et", "a = q + 1\n");
    let out = etch(&["resolve", "--strict", "--format", "json"], &file);
    assert_eq!(out.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json report");
    assert_eq!(report["success"], false);
    assert_eq!(report["phase"], "resolve");
    assert_eq!(report["diagnostics"][0]["code"], "E0201");
    assert_eq!(report["diagnostics"][0]["location"]["column"], 5);
}

#[test]
fn fold_dumps_folded_ir() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = write_source(&dir, "k.et", "x = 1; y = { x = 2; x }\n");
    let out = etch(&["fold"], &file);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("(unit"), "{}", stdout);
    assert!(stdout.contains("(constant_int 2)"), "{}", stdout);
}

#[test]
fn syntax_error_exits_with_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = write_source(&dir, "bad.et", "a = (1\n");
    let out = etch(&["parse"], &file);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("error[E0"));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = etch(&["lex"], &dir.path().join("nope.et"));
    assert_eq!(out.status.code(), Some(1));
}
