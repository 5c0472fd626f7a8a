// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Parser for the etch language.
//!
//! Transforms a token stream into a concrete syntax tree.

mod hints;
mod parser;

pub use parser::{ParseError, ParseResult, Parser};
