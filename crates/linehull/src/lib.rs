//! Dynamic line envelopes for the online convex hull trick.
//!
//! `LineEnvelope` keeps the lower (or upper) envelope of lines `a·x + b`
//! inserted in any slope order and answers point queries in O(log n).
//!
//! API Policy
//! - Numeric domain is any `Scalar` (signed primitive integers). Overflow in
//!   `a·x + b` is the caller's responsibility.
//! - Not thread-safe for mutation; wrap in a lock if shared.

pub mod envelope;
pub mod rand;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use envelope::{naive_extremum, EnvelopeError, Line, LineEnvelope, Objective, Scalar};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::envelope::{
        naive_extremum, EnvelopeError, Line, LineEnvelope, Objective, Scalar,
    };
    pub use crate::rand::{draw_lines, draw_queries, LineCfg, LineCount, ReplayToken};
}
