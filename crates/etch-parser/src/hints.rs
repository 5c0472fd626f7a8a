// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Error hints - suggestions for fixing common mistakes.

use etch_ast::token::TokenKind;

/// Get a hint for an "expected X" error based on what was found instead.
pub fn for_expected(expected: &str, found: &TokenKind) -> Option<&'static str> {
    match (expected, found) {
        ("'}'", TokenKind::Eof) => Some("every '{' needs a matching '}'"),
        ("')'", TokenKind::Eof) => Some("add ')' to close the parenthesis"),
        ("')'", TokenKind::Arrow) => Some("function arguments are names, tuples of names, or 'name: type'"),
        ("expression", TokenKind::Eq) => Some("definitions need a name or tuple before '='"),
        ("expression", TokenKind::Eof) => Some("the statement is incomplete"),
        ("expression", TokenKind::Op(op)) if op == "-" => {
            Some("negative literals are written '-1' with no space")
        }
        ("expression", TokenKind::Op(_)) => Some("an operator needs a value on its left"),
        ("expression", TokenKind::Arrow) => Some("a function needs an argument before '->'"),
        ("expression", _) => Some("try a value, a name, a block or a tuple"),
        _ => None,
    }
}
