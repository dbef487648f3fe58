//! Lowering facts for `rec` bundles.
//!
//! A bundle member whose body depends on variables from outside the bundle
//! cannot become an independent routine. It is lowered as a branch target
//! that receives its arguments through parameter slots, which is only
//! possible if every call to it is a tail call. This module decides which
//! members are branch targets and rejects programs that use one any other
//! way.

pub mod lowering;

#[cfg(test)]
mod tests;
