//! Dynamic line envelope (online convex hull trick).
//!
//! Purpose
//! - Maintain the lower (or upper) envelope of lines `a·x + b` inserted in any
//!   slope order, and answer point queries for the extremum in O(log n).
//!
//! Why this design
//! - Exact caller arithmetic (`Scalar`) for slopes, intercepts and values;
//!   `f64` only for the crossing thresholds that order the chain.
//! - Repair after an insertion is local: prune to the right of the new line,
//!   then check it against its left neighbour, then cascade leftwards. Each
//!   line is evicted at most once, so inserts are amortized O(log n).
//!
//! References
//! - Code cross-refs: `container::LineEnvelope`, `types::{Scalar, Objective, Line}`,
//!   `naive::naive_extremum`

mod container;
mod naive;
mod types;

pub use container::LineEnvelope;
pub use naive::naive_extremum;
pub use types::{EnvelopeError, Line, Objective, Scalar};

#[cfg(test)]
mod tests;
