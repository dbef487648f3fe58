//! Parser module for building the position-annotated IR.
//!
//! This module contains the parser that transforms a stream of tokens
//! into an expression tree annotated with source spans. It uses a Pratt
//! parser for expressions and handles:
//!
//! - Binders (`let`, `rec` bundles, parameters) and name resolution
//! - Trailing forms (ascription, coercion, calls)
//! - Case arms, tuples, vectors and access paths
//! - Type parsing for annotations
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod types;
