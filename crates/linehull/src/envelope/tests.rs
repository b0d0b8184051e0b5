use super::*;
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn build(lines: &[(i64, i64)], objective: Objective) -> LineEnvelope<i64> {
    let mut env = LineEnvelope::with_objective(objective);
    for &(a, b) in lines {
        env.insert(a, b);
    }
    env
}

/// Query points around every breakpoint plus a fixed spread and the extremes.
fn probe_points(env: &LineEnvelope<i64>, span: i64) -> Vec<i64> {
    let mut xs: Vec<i64> = vec![-span, -1, 0, 1, span];
    for line in env.lines() {
        if line.threshold.is_finite() {
            let t = line.threshold.floor() as i64;
            xs.extend([t - 1, t, t + 1, t + 2]);
        }
    }
    xs
}

#[test]
fn scenario_three_lines() {
    let mut env = LineEnvelope::new();
    env.insert(1, 0);
    env.insert(-1, 10);
    env.insert(0, 3);
    assert_eq!(env.query(0), 0);
    assert_eq!(env.query(10), 0);
    assert_eq!(env.query(5), 3);
    assert_eq!(env.len(), 3);
    env.check_invariants().unwrap();
}

#[test]
fn single_line_everywhere() {
    let env: LineEnvelope<i64> = [(2, 1)].into_iter().collect();
    assert_eq!(env.query(100), 201);
    assert_eq!(env.query(-7), -13);
    assert_eq!(env.query(0), 1);
    let only: Vec<_> = env.lines().collect();
    assert_eq!(only.len(), 1);
    assert_eq!(only[0].threshold, f64::INFINITY);
}

#[test]
fn parallel_pair_keeps_better_intercept() {
    for order in [[(1, 0), (1, 5)], [(1, 5), (1, 0)]] {
        let env = build(&order, Objective::Min);
        for x in [-1000, -3, 0, 4, 1000] {
            assert_eq!(env.query(x), x);
        }
        assert_eq!(env.len(), 1);
        let line = env.lines().next().unwrap();
        assert_eq!((line.slope, line.intercept), (1, 0));
        env.check_invariants().unwrap();
    }
}

#[test]
#[should_panic(expected = "empty")]
fn query_on_empty_panics() {
    let env: LineEnvelope<i64> = LineEnvelope::new();
    env.query(0);
}

#[test]
fn try_query_on_empty_is_error() {
    let env: LineEnvelope<i32> = LineEnvelope::maximizing();
    assert_eq!(env.try_query(3), Err(EnvelopeError::Empty));
    assert!(env.query_line(3).is_none());
}

#[test]
fn clear_empties_both_maps() {
    let mut env = build(&[(1, 2), (-3, 4), (0, 0)], Objective::Min);
    env.clear();
    assert!(env.is_empty());
    assert!(env.try_query(1).is_err());
    env.check_invariants().unwrap();
    env.insert(5, 5);
    assert_eq!(env.query(1), 10);
}

#[test]
fn maximizing_mirrors_minimizing() {
    let lines = [(3, -4), (-2, 7), (0, 1), (1, 1), (-5, -20)];
    let max_env = build(&lines, Objective::Max);
    let negated: Vec<(i64, i64)> = lines.iter().map(|&(a, b)| (-a, -b)).collect();
    let min_env = build(&negated, Objective::Min);
    for x in -20..=20 {
        assert_eq!(max_env.query(x), -min_env.query(x));
        assert_eq!(
            Some(max_env.query(x)),
            naive_extremum(&lines, x, Objective::Max)
        );
    }
}

#[test]
fn lines_report_caller_convention_left_to_right() {
    // Min envelope of y=x, y=-x+10, y=3: left to right the optimal slopes are 1, 0, -1.
    let env = build(&[(1, 0), (-1, 10), (0, 3)], Objective::Min);
    let chain: Vec<_> = env.lines().collect();
    let slopes: Vec<i64> = chain.iter().map(|l| l.slope).collect();
    assert_eq!(slopes, vec![1, 0, -1]);
    assert_eq!(chain[0].threshold, 3.0);
    assert_eq!(chain[1].threshold, 7.0);
    assert_eq!(chain[2].threshold, f64::INFINITY);
    let at = env.query_line(5).unwrap();
    assert_eq!((at.slope, at.intercept), (0, 3));
    assert_eq!(at.eval(5), 3);
}

#[test]
fn middle_line_hidden_by_neighbours_is_dropped() {
    // Max envelope of y=-x and y=x; y=-1 stays below both everywhere.
    let mut env = LineEnvelope::maximizing();
    env.insert(-1, 0);
    env.insert(1, 0);
    env.insert(0, -1);
    assert_eq!(env.len(), 2);
    assert_eq!(env.query(0), 0);
    env.check_invariants().unwrap();
}

#[test]
fn steep_line_evicts_left_cascade() {
    // Min envelope; the last line undercuts all but the steepest one.
    let mut env = LineEnvelope::new();
    env.insert(5, 0);
    env.insert(4, 1);
    env.insert(3, 3);
    env.insert(2, 6);
    assert_eq!(env.len(), 4);
    env.insert(2, -100);
    env.check_invariants().unwrap();
    assert_eq!(env.len(), 2);
    assert_eq!(env.query(-10), -120);
    assert_eq!(env.query(-100), -500);
    let slopes: Vec<i64> = env.lines().map(|l| l.slope).collect();
    assert_eq!(slopes, vec![5, 2]);
}

#[test]
fn large_magnitude_queries() {
    let lines = [
        (1_000, -1_000_000_000),
        (-1_000, 999_999_999),
        (0, 12_345),
        (7, 0),
    ];
    let env = build(&lines, Objective::Min);
    for x in [
        -1_000_000_000_000i64,
        -999_999,
        0,
        999_999,
        1_000_000_000_000,
    ] {
        assert_eq!(Some(env.query(x)), naive_extremum(&lines, x, Objective::Min));
    }
}

#[test]
fn other_integer_domains() {
    let mut small: LineEnvelope<i32> = LineEnvelope::new();
    small.extend([(2, 0), (-2, 0)]);
    assert_eq!(small.query(3), -6);
    assert_eq!(small.query(-3), -6);

    let mut wide: LineEnvelope<i128> = LineEnvelope::maximizing();
    wide.insert(1i128 << 60, 0);
    wide.insert(-(1i128 << 60), 0);
    assert_eq!(wide.query(1 << 40), 1i128 << 100);
}

#[test]
fn randomized_seeded_against_brute_force() {
    let mut rng = StdRng::seed_from_u64(42);
    for round in 0..200 {
        let objective = if round % 2 == 0 {
            Objective::Min
        } else {
            Objective::Max
        };
        let n = rng.gen_range(1..60);
        let mut lines = Vec::with_capacity(n);
        let mut env = LineEnvelope::with_objective(objective);
        for _ in 0..n {
            let a = rng.gen_range(-20..=20);
            let b = rng.gen_range(-200..=200);
            lines.push((a, b));
            env.insert(a, b);
            env.check_invariants().unwrap();
        }
        for x in probe_points(&env, 10_000) {
            assert_eq!(
                Some(env.query(x)),
                naive_extremum(&lines, x, objective),
                "round {round} x {x}"
            );
        }
    }
}

fn line_strategy() -> impl Strategy<Value = (i64, i64)> {
    (-50i64..=50, -1_000i64..=1_000)
}

fn objective_strategy() -> impl Strategy<Value = Objective> {
    prop_oneof![Just(Objective::Min), Just(Objective::Max)]
}

proptest! {
    #[test]
    fn query_matches_brute_force(
        lines in prop::collection::vec(line_strategy(), 1..80),
        objective in objective_strategy(),
        extra in prop::collection::vec(-100_000i64..=100_000, 0..20),
    ) {
        let env = build(&lines, objective);
        let mut xs = probe_points(&env, 1_000_000);
        xs.extend(extra);
        for x in xs {
            prop_assert_eq!(Some(env.query(x)), naive_extremum(&lines, x, objective));
        }
    }

    #[test]
    fn insertion_order_does_not_matter(
        (lines, shuffled) in prop::collection::vec(line_strategy(), 1..50)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
        objective in objective_strategy(),
    ) {
        let a = build(&lines, objective);
        let b = build(&shuffled, objective);
        for x in -300..=300 {
            prop_assert_eq!(a.query(x), b.query(x));
        }
    }

    #[test]
    fn invariants_hold_after_every_insert(
        lines in prop::collection::vec(line_strategy(), 1..80),
        objective in objective_strategy(),
    ) {
        let mut env = LineEnvelope::with_objective(objective);
        for &(a, b) in &lines {
            env.insert(a, b);
            prop_assert!(env.check_invariants().is_ok(), "{:?}", env.check_invariants());
            let ts: Vec<f64> = env.lines().map(|l| l.threshold).collect();
            prop_assert!(ts.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn every_survivor_is_optimal_somewhere(
        lines in prop::collection::vec(line_strategy(), 2..60),
        objective in objective_strategy(),
    ) {
        let env = build(&lines, objective);
        let chain: Vec<Line<i64>> = env.lines().collect();
        for (i, line) in chain.iter().enumerate() {
            let lo = if i == 0 { f64::NEG_INFINITY } else { chain[i - 1].threshold };
            let hi = line.threshold;
            let x = match (lo.is_finite(), hi.is_finite()) {
                (true, true) => 0.5 * (lo + hi),
                (false, true) => hi - 1.0,
                (true, false) => lo + 1.0,
                (false, false) => continue,
            };
            let eval = |a: i64, b: i64| a as f64 * x + b as f64;
            let mine = eval(line.slope, line.intercept);
            for &(a, b) in &lines {
                let other = eval(a, b);
                let slack = 1e-9 * (1.0 + other.abs());
                match objective {
                    Objective::Min => prop_assert!(mine <= other + slack),
                    Objective::Max => prop_assert!(mine >= other - slack),
                }
            }
        }
    }

    #[test]
    fn duplicate_insert_changes_no_answer(
        lines in prop::collection::vec(line_strategy(), 1..40),
        pick in any::<prop::sample::Index>(),
        objective in objective_strategy(),
    ) {
        let mut env = build(&lines, objective);
        let before: Vec<i64> = (-200..=200).map(|x| env.query(x)).collect();
        let (a, b) = lines[pick.index(lines.len())];
        env.insert(a, b);
        prop_assert!(env.check_invariants().is_ok());
        let after: Vec<i64> = (-200..=200).map(|x| env.query(x)).collect();
        prop_assert_eq!(before, after);
    }
}
