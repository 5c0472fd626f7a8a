// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Syntax types for the etch language.
//!
//! This crate defines the pieces shared between the lexer, the parser and
//! the syntax→IR lowering: source spans, tokens and the concrete syntax tree.

pub mod span;
pub mod syntax;
pub mod token;

pub use span::{LineMap, Span};
