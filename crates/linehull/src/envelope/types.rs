//! Core types for the line envelope: numeric domain, objective, lines, errors.
//!
//! - `Scalar`: exact numeric domain for slopes, intercepts and query points.
//! - `Objective`: which extremum a query reports (`Min` by default).
//! - `Line`: caller-facing snapshot of one surviving line.
//! - `EnvelopeError`: empty-query and invariant-check failures.
//!
//! References
//! - Code cross-refs: `container::LineEnvelope`, `naive::naive_extremum`

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Exact numeric domain for slopes, intercepts and query points.
///
/// Arithmetic is performed in `Self` without range checks; overflow behaves
/// as the type does (panics in debug builds for primitive integers).
/// `to_f64` is only used for intersection thresholds.
pub trait Scalar:
    Copy
    + Ord
    + fmt::Debug
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    fn to_f64(self) -> f64;
}

macro_rules! impl_scalar {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_scalar!(i8, i16, i32, i64, i128, isize);

/// Which extremum a query reports.
///
/// Lines are stored internally so that the envelope is always an upper
/// (maximum) envelope; `Min` negates slope and intercept on the way in and
/// the value on the way out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Objective {
    #[default]
    Min,
    Max,
}

impl Objective {
    /// Map a caller value into the internal (maximising) sign convention and back.
    #[inline]
    pub(crate) fn orient<T: Scalar>(self, v: T) -> T {
        match self {
            Objective::Min => -v,
            Objective::Max => v,
        }
    }

    /// True if `a` is strictly better than `b` under this objective.
    #[inline]
    pub fn better<T: Scalar>(self, a: T, b: T) -> bool {
        match self {
            Objective::Min => a < b,
            Objective::Max => a > b,
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Objective::Min => write!(f, "min"),
            Objective::Max => write!(f, "max"),
        }
    }
}

/// One line of the envelope as seen by the caller.
///
/// Invariants (for lines obtained from `LineEnvelope::lines`):
/// - `threshold` is the x-coordinate where this line stops being optimal and
///   its right neighbour takes over; `+inf` for the rightmost line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line<T> {
    pub slope: T,
    pub intercept: T,
    pub threshold: f64,
}

impl<T: Scalar> Line<T> {
    #[inline]
    pub fn eval(&self, x: T) -> T {
        self.slope * x + self.intercept
    }
}

/// Errors surfaced by the envelope.
#[derive(Clone, Debug, PartialEq)]
pub enum EnvelopeError {
    /// Query on a container without lines.
    Empty,
    /// `check_invariants` found a broken ordering or threshold at `index`
    /// (position in envelope order).
    Invariant { index: usize, reason: String },
}

impl EnvelopeError {
    pub(crate) fn invariant(index: usize, reason: impl Into<String>) -> Self {
        Self::Invariant {
            index,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeError::Empty => write!(f, "query on an empty line envelope"),
            EnvelopeError::Invariant { index, reason } => {
                write!(f, "envelope invariant broken at line {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for EnvelopeError {}

/// Totally ordered threshold used as the query index key.
///
/// `-0.0` is folded into `0.0` so that `total_cmp` agrees with `>=` on
/// every value a threshold can take (thresholds are never NaN).
#[derive(Clone, Copy, Debug)]
pub(crate) struct Threshold(f64);

impl Threshold {
    #[inline]
    pub(crate) fn new(t: f64) -> Self {
        debug_assert!(!t.is_nan(), "threshold must not be NaN");
        Self(t + 0.0)
    }
}

impl PartialEq for Threshold {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Threshold {}

impl PartialOrd for Threshold {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Threshold {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
