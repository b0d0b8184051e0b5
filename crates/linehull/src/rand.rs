//! Random line sets and query points (seeded, replayable).
//!
//! Purpose
//! - Provide small deterministic samplers for stress tests, benchmarks and the
//!   CLI `sample`/`check` commands.
//!
//! Model
//! - Slopes and intercepts are uniform in symmetric integer ranges. A fraction
//!   of draws reuses an earlier slope so parallel ties show up regularly.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.
//!
//! References
//! - Code cross-refs: `envelope::LineEnvelope`, `envelope::naive_extremum`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Line count distribution.
#[derive(Clone, Copy, Debug)]
pub enum LineCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}
impl LineCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            LineCount::Fixed(n) => n,
            LineCount::Uniform { min, max } => rng.gen_range(min..=max.max(min)),
        }
    }
}

/// Sampler configuration.
///
/// The defaults keep `|a·x + b|` far below `i64::MAX` for `|x| <= 1e6`.
#[derive(Clone, Copy, Debug)]
pub struct LineCfg {
    pub count: LineCount,
    /// Slopes are drawn from `[-slope_max, slope_max]`.
    pub slope_max: i64,
    /// Intercepts are drawn from `[-intercept_max, intercept_max]`.
    pub intercept_max: i64,
    /// Probability that a line reuses the slope of an earlier one. Clamped to [0, 1].
    pub repeat_slope_frac: f64,
}
impl Default for LineCfg {
    fn default() -> Self {
        Self {
            count: LineCount::Fixed(64),
            slope_max: 1_000_000,
            intercept_max: 1_000_000_000,
            repeat_slope_frac: 0.1,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}
impl ReplayToken {
    #[inline]
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    /// Token for the next draw of the same stream.
    #[inline]
    pub fn next(self) -> Self {
        Self {
            seed: self.seed,
            index: self.index.wrapping_add(1),
        }
    }

    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer on both halves.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a line set `(slope, intercept)` in insertion order.
pub fn draw_lines(cfg: LineCfg, tok: ReplayToken) -> Vec<(i64, i64)> {
    let mut rng = tok.to_std_rng();
    let n = cfg.count.sample(&mut rng);
    let sm = cfg.slope_max.abs();
    let bm = cfg.intercept_max.abs();
    let repeat = cfg.repeat_slope_frac.clamp(0.0, 1.0);
    let mut out: Vec<(i64, i64)> = Vec::with_capacity(n);
    for _ in 0..n {
        let slope = if !out.is_empty() && rng.gen_bool(repeat) {
            out[rng.gen_range(0..out.len())].0
        } else {
            rng.gen_range(-sm..=sm)
        };
        let intercept = rng.gen_range(-bm..=bm);
        out.push((slope, intercept));
    }
    out
}

/// Draw `n` query points uniformly from `[-x_max, x_max]`.
pub fn draw_queries(n: usize, x_max: i64, tok: ReplayToken) -> Vec<i64> {
    let mut rng = tok.to_std_rng();
    let xm = x_max.abs();
    (0..n).map(|_| rng.gen_range(-xm..=xm)).collect()
}
