//! Intermediate representation module.
//!
//! This module defines the typed intermediate representation shared by
//! every phase of the front end:
//!
//! - Types (primitive, vector, array, tuple and function-pointer types)
//! - Expressions, access paths and function bundles
//! - Annotations threaded through every node (spans before checking,
//!   spans plus resolved types after checking)
//! - A loss-free textual rendering that the parser accepts back
//!
//! Expressions are parametric in their annotation so the same tree shape
//! is produced by the parser and rewritten by the type checker.

pub mod display;
pub mod ir;
pub mod types;

#[cfg(test)]
mod tests;
