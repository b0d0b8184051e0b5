//! Convex hull trick DP on a stone path.
//!
//! Purpose
//! - Show the typical use: `dp[i] = min_j (dp[j] + (h[i] - h[j])^2) + c`, which
//!   expands to a min over lines `(-2 h[j]) x + (dp[j] + h[j]^2)` at `x = h[i]`.
//! - Heights are shuffled so slopes arrive in no particular order, which a
//!   monotone stack cannot handle but `LineEnvelope` can.
//!
//! Run: `cargo run -p linehull --example frog_jumps`

use std::time::Instant;

use linehull::rand::{draw_queries, ReplayToken};
use linehull::LineEnvelope;

const JUMP_COST: i64 = 1_000;

fn main() {
    let heights = draw_queries(2_000, 1_000_000, ReplayToken::new(7, 0));

    let start = Instant::now();
    let fast = solve_with_envelope(&heights);
    let fast_ms = start.elapsed().as_secs_f64() * 1e3;

    let start = Instant::now();
    let slow = solve_quadratic(&heights);
    let slow_ms = start.elapsed().as_secs_f64() * 1e3;

    assert_eq!(fast, slow, "envelope DP disagrees with quadratic DP");
    println!("stones={} cost={fast}", heights.len());
    println!("envelope_time_ms={fast_ms:.3} quadratic_time_ms={slow_ms:.3}");
}

fn solve_with_envelope(h: &[i64]) -> i64 {
    let mut env = LineEnvelope::new();
    let mut dp = 0;
    env.insert(-2 * h[0], h[0] * h[0]);
    for &hi in &h[1..] {
        dp = env.query(hi) + hi * hi + JUMP_COST;
        env.insert(-2 * hi, dp + hi * hi);
    }
    dp
}

fn solve_quadratic(h: &[i64]) -> i64 {
    let mut dp = vec![0i64; h.len()];
    for i in 1..h.len() {
        dp[i] = (0..i)
            .map(|j| dp[j] + (h[i] - h[j]) * (h[i] - h[j]))
            .min()
            .unwrap_or(0)
            + JUMP_COST;
    }
    dp[h.len() - 1]
}
