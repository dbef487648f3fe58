//! Lexical analysis module.
//!
//! This module contains the lexer (tokenizer) that converts source text
//! into a stream of tokens for parsing. It handles:
//!
//! - Identifiers, reserved words and the `_` wildcard
//! - Width-suffixed integer literals (`42i32`) and bare integers (`0`)
//! - Punctuation used by types, paths and expressions
//! - Whitespace and `//` line comments
//!
//! Every token records its byte span for error reporting.

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
