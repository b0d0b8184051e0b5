//! Dynamic line envelope ("convex hull trick" with arbitrary insertion order).
//!
//! Purpose
//! - Keep the pointwise extremum of a growing set of lines `a·x + b` as an
//!   ordered chain of optimal lines, each tagged with the x-coordinate where
//!   its right neighbour takes over.
//!
//! Why this design
//! - Lines live in an ordered map keyed by `(slope, seq)`; the right-end
//!   threshold is plain per-line state rewritten by `refresh`, never through
//!   a shared view of the map.
//! - Queries need "first line whose threshold is >= x". Thresholds are
//!   monotone in slope order once repair finishes, so a second ordered map
//!   keyed by `(threshold, seq)` answers that in O(log n). Every threshold
//!   write and every erase goes through `set_threshold`/`erase`, which keep
//!   both maps in step.
//! - Internally the envelope is always a maximum envelope; `Objective::Min`
//!   flips signs at the boundary (see `Objective::orient`).
//!
//! References
//! - Code cross-refs: `types::{Scalar, Objective, Line, Threshold}`

use std::collections::BTreeMap;
use std::ops::Bound;

use super::types::{EnvelopeError, Line, Objective, Scalar, Threshold};

/// Position of a line: slope first, insertion order among equal slopes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Key<T> {
    pub(crate) slope: T,
    pub(crate) seq: u64,
}

#[derive(Clone, Copy, Debug)]
struct Slot<T> {
    intercept: T,
    /// Right end of this line's optimality interval.
    threshold: f64,
}

/// X-coordinate where `right` overtakes `left` on a maximum envelope.
///
/// Parallel lines never cross: the left one either hides the right one
/// everywhere (`+inf`) or is hidden by it (`-inf`). Equal lines count as
/// hidden, so the earlier copy is the one evicted.
#[inline]
fn crossing<T: Scalar>(left_slope: T, left_b: T, right_slope: T, right_b: T) -> f64 {
    if left_slope == right_slope {
        if left_b > right_b {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        }
    } else {
        (right_b - left_b).to_f64() / (left_slope - right_slope).to_f64()
    }
}

/// Lines `a·x + b` with O(log n) extremum queries and amortized O(log n) inserts.
///
/// Invariants (after every `insert`):
/// - Lines are ordered by (internal) slope, ties by insertion order.
/// - Thresholds strictly increase along that order and each equals the
///   crossing with the right neighbour; the last one is `+inf`.
/// - Every stored line is optimal on a non-empty interval.
#[derive(Clone, Debug)]
pub struct LineEnvelope<T: Scalar> {
    objective: Objective,
    lines: BTreeMap<Key<T>, Slot<T>>,
    by_threshold: BTreeMap<(Threshold, u64), Key<T>>,
    next_seq: u64,
}

impl<T: Scalar> Default for LineEnvelope<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> LineEnvelope<T> {
    /// Empty envelope answering minimum queries.
    pub fn new() -> Self {
        Self::with_objective(Objective::Min)
    }

    /// Empty envelope answering maximum queries.
    pub fn maximizing() -> Self {
        Self::with_objective(Objective::Max)
    }

    pub fn with_objective(objective: Objective) -> Self {
        Self {
            objective,
            lines: BTreeMap::new(),
            by_threshold: BTreeMap::new(),
            next_seq: 0,
        }
    }

    #[inline]
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Number of lines currently on the envelope (evicted lines excluded).
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.by_threshold.clear();
    }

    /// Add the line `slope·x + intercept`.
    ///
    /// Any slope order is accepted, including repeated slopes. Lines that the
    /// new one hides are evicted on both sides; the new line itself is dropped
    /// if its neighbours already hide it.
    pub fn insert(&mut self, slope: T, intercept: T) {
        let m = self.push(
            self.objective.orient(slope),
            self.objective.orient(intercept),
        );

        // Right side: evict neighbours that `m` hides up to their own right end.
        let mut right = self.successor(&m);
        while self.refresh(&m, right.as_ref()) {
            right = right.and_then(|r| self.erase(&r));
        }

        // Left neighbour against `m`; `m` goes if it is hidden between the two.
        let mut cur = m;
        if let Some(left) = self.predecessor(&m) {
            if self.refresh(&left, Some(&m)) {
                let next = self.erase(&m);
                self.refresh(&left, next.as_ref());
            }
            cur = left;
        }

        // Left cascade: a changed right end can hide further lines to the left.
        while let Some(left) = self.predecessor(&cur) {
            if self.threshold(&left) < self.threshold(&cur) {
                break;
            }
            let next = self.erase(&cur);
            self.refresh(&left, next.as_ref());
            cur = left;
        }

        // A parallel tie can leave the leftmost line with an empty interval.
        while let Some(first) = self.first() {
            if self.threshold(&first) > f64::NEG_INFINITY {
                break;
            }
            self.erase(&first);
        }
    }

    /// Extremum of all inserted lines at `x`.
    ///
    /// # Panics
    /// If the envelope is empty. Use `try_query` to get an error instead.
    pub fn query(&self, x: T) -> T {
        match self.try_query(x) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }

    /// Extremum at `x`, or `EnvelopeError::Empty`.
    pub fn try_query(&self, x: T) -> Result<T, EnvelopeError> {
        let (key, slot) = self.locate(x).ok_or(EnvelopeError::Empty)?;
        Ok(self.objective.orient(key.slope * x + slot.intercept))
    }

    /// The line attaining the extremum at `x`, in caller sign convention.
    pub fn query_line(&self, x: T) -> Option<Line<T>> {
        self.locate(x).map(|(key, slot)| self.to_line(key, slot))
    }

    /// Surviving lines from left to right in x (order of their optimality intervals).
    pub fn lines(&self) -> impl Iterator<Item = Line<T>> + '_ {
        self.lines.iter().map(|(key, slot)| self.to_line(key, slot))
    }

    /// Verify ordering, thresholds and index consistency.
    pub fn check_invariants(&self) -> Result<(), EnvelopeError> {
        if self.by_threshold.len() != self.lines.len() {
            return Err(EnvelopeError::invariant(
                0,
                format!(
                    "threshold index holds {} entries for {} lines",
                    self.by_threshold.len(),
                    self.lines.len()
                ),
            ));
        }
        let chain: Vec<(&Key<T>, &Slot<T>)> = self.lines.iter().collect();
        for (i, &(key, slot)) in chain.iter().enumerate() {
            if self.by_threshold.get(&(Threshold::new(slot.threshold), key.seq)) != Some(key) {
                return Err(EnvelopeError::invariant(i, "missing from threshold index"));
            }
            let expected = match chain.get(i + 1) {
                Some(&(next, next_slot)) => {
                    crossing(key.slope, slot.intercept, next.slope, next_slot.intercept)
                }
                None => f64::INFINITY,
            };
            if expected != slot.threshold {
                return Err(EnvelopeError::invariant(
                    i,
                    format!("threshold {} but neighbour crossing is {}", slot.threshold, expected),
                ));
            }
            match i.checked_sub(1).map(|j| chain[j].1.threshold) {
                Some(prev) if prev >= slot.threshold => {
                    return Err(EnvelopeError::invariant(
                        i,
                        format!("threshold {} not above left neighbour {}", slot.threshold, prev),
                    ));
                }
                None if slot.threshold == f64::NEG_INFINITY => {
                    return Err(EnvelopeError::invariant(i, "leftmost line is never optimal"));
                }
                _ => {}
            }
        }
        Ok(())
    }

    #[inline]
    fn to_line(&self, key: &Key<T>, slot: &Slot<T>) -> Line<T> {
        Line {
            slope: self.objective.orient(key.slope),
            intercept: self.objective.orient(slot.intercept),
            threshold: slot.threshold,
        }
    }

    fn locate(&self, x: T) -> Option<(&Key<T>, &Slot<T>)> {
        let probe = (Threshold::new(x.to_f64()), 0);
        let (_, key) = self.by_threshold.range(probe..).next()?;
        self.lines.get_key_value(key)
    }

    /// Insert a line (internal sign convention) behind any equal slopes.
    fn push(&mut self, slope: T, intercept: T) -> Key<T> {
        let key = Key {
            slope,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.lines.insert(
            key,
            Slot {
                intercept,
                threshold: f64::INFINITY,
            },
        );
        self.by_threshold
            .insert((Threshold::new(f64::INFINITY), key.seq), key);
        key
    }

    /// Recompute the right end of `left` against `right` (`+inf` if none).
    /// Returns true if `right` is now hidden, i.e. its interval is empty.
    fn refresh(&mut self, left: &Key<T>, right: Option<&Key<T>>) -> bool {
        let Some(right) = right else {
            self.set_threshold(left, f64::INFINITY);
            return false;
        };
        let left_b = self.lines[left].intercept;
        let right_slot = self.lines[right];
        let t = crossing(left.slope, left_b, right.slope, right_slot.intercept);
        self.set_threshold(left, t);
        t >= right_slot.threshold
    }

    fn set_threshold(&mut self, key: &Key<T>, t: f64) {
        if let Some(slot) = self.lines.get_mut(key) {
            let old = std::mem::replace(&mut slot.threshold, t);
            self.by_threshold.remove(&(Threshold::new(old), key.seq));
            self.by_threshold.insert((Threshold::new(t), key.seq), *key);
        }
    }

    #[inline]
    fn threshold(&self, key: &Key<T>) -> f64 {
        self.lines[key].threshold
    }

    #[inline]
    pub(crate) fn first(&self) -> Option<Key<T>> {
        self.lines.keys().next().copied()
    }

    #[inline]
    pub(crate) fn predecessor(&self, key: &Key<T>) -> Option<Key<T>> {
        self.lines.range(..*key).next_back().map(|(k, _)| *k)
    }

    #[inline]
    pub(crate) fn successor(&self, key: &Key<T>) -> Option<Key<T>> {
        self.lines
            .range((Bound::Excluded(*key), Bound::Unbounded))
            .next()
            .map(|(k, _)| *k)
    }

    /// Remove `key` and return the line that followed it.
    pub(crate) fn erase(&mut self, key: &Key<T>) -> Option<Key<T>> {
        if let Some(slot) = self.lines.remove(key) {
            self.by_threshold
                .remove(&(Threshold::new(slot.threshold), key.seq));
        }
        self.successor(key)
    }
}

impl<T: Scalar> Extend<(T, T)> for LineEnvelope<T> {
    fn extend<I: IntoIterator<Item = (T, T)>>(&mut self, iter: I) {
        for (slope, intercept) in iter {
            self.insert(slope, intercept);
        }
    }
}

impl<T: Scalar> FromIterator<(T, T)> for LineEnvelope<T> {
    fn from_iter<I: IntoIterator<Item = (T, T)>>(iter: I) -> Self {
        let mut env = Self::new();
        env.extend(iter);
        env
    }
}
