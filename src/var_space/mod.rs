//! Variable space: name resolution during parsing.
//!
//! Maps every identifier occurrence to a dense, globally unique integer
//! identity. Binding occurrences (`let` names, parameters, `rec` members)
//! allocate; use occurrences look up the innermost enclosing binding and
//! fail with a located scope error when there is none.

pub mod var_space;

#[cfg(test)]
mod tests;
