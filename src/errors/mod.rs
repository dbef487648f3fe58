//! Error types and error handling for the front end.
//!
//! This module defines the error type shared by every phase:
//!
//! - Lexer and parser errors (unrecognised or unexpected tokens)
//! - Name resolution errors from the variable space
//! - Type checker errors (scope, shape, type and arity mismatches)
//! - Lowering analysis errors (branch targets outside tail position)
//!
//! Every error carries the source position of the node being processed
//! when the failure was detected.

pub mod errors;
