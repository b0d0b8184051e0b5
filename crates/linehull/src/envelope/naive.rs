use super::types::{Objective, Scalar};

/// Brute-force extremum of `a·x + b` over `lines`; `None` if `lines` is empty.
///
/// Reference for tests, benchmarks and the CLI `check` command.
pub fn naive_extremum<T: Scalar>(lines: &[(T, T)], x: T, objective: Objective) -> Option<T> {
    lines
        .iter()
        .map(|&(a, b)| a * x + b)
        .reduce(|best, v| if objective.better(v, best) { v } else { best })
}
