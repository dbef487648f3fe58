//! Bidirectional type checking.
//!
//! Turns a position-annotated tree into a type-annotated one, or fails
//! with the first error found:
//!
//! - `check` verifies an expression against a known type
//! - `infer` computes the type of an expression
//! - Access paths are resolved step by step against the type reached so far
//!
//! Every checked node also records whether it sits in tail position, which
//! the lowering analysis reads back later.

pub mod type_checker;
