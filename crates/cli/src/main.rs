use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use linehull::rand::{draw_lines, draw_queries, LineCfg, LineCount, ReplayToken};
use linehull::{naive_extremum, LineEnvelope, Objective};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod io;
mod provenance;

use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Line envelope queries, sampling and consistency checks")]
struct Cmd {
    /// Log at debug level
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ObjectiveArg {
    Min,
    Max,
}

impl From<ObjectiveArg> for Objective {
    fn from(arg: ObjectiveArg) -> Self {
        match arg {
            ObjectiveArg::Min => Objective::Min,
            ObjectiveArg::Max => Objective::Max,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Build an envelope from a line table and evaluate query points
    Query {
        /// Table with `slope,intercept` columns (.csv or .parquet)
        #[arg(long)]
        lines: PathBuf,
        /// Table with an `x` column
        #[arg(long)]
        queries: Option<PathBuf>,
        /// Extra query point (repeatable)
        #[arg(long = "x", allow_hyphen_values = true)]
        xs: Vec<i64>,
        #[arg(long, value_enum, default_value_t = ObjectiveArg::Min)]
        objective: ObjectiveArg,
        /// JSON output path; prints to stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write a seeded random line set as CSV
    Sample {
        #[arg(long, default_value_t = 64)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
        #[arg(long, default_value_t = 1_000_000)]
        slope_max: i64,
        #[arg(long, default_value_t = 1_000_000_000)]
        intercept_max: i64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Compare the envelope against brute force on random probes
    Check {
        #[arg(long)]
        lines: PathBuf,
        #[arg(long, default_value_t = 1_000)]
        probes: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Probes are drawn from [-x_max, x_max]
        #[arg(long, default_value_t = 1_000_000)]
        x_max: i64,
        #[arg(long, value_enum, default_value_t = ObjectiveArg::Min)]
        objective: ObjectiveArg,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Query {
            lines,
            queries,
            xs,
            objective,
            out,
        } => query(
            &lines,
            queries.as_deref(),
            xs,
            objective.into(),
            out.as_deref(),
        ),
        Action::Sample {
            count,
            seed,
            index,
            slope_max,
            intercept_max,
            out,
        } => {
            let cfg = LineCfg {
                count: LineCount::Fixed(count),
                slope_max,
                intercept_max,
                ..LineCfg::default()
            };
            sample(cfg, ReplayToken::new(seed, index), &out)
        }
        Action::Check {
            lines,
            probes,
            seed,
            x_max,
            objective,
        } => check(&lines, probes, seed, x_max, objective.into()),
        Action::Report => report(),
    }
}

#[derive(Debug, Serialize)]
struct QueryAnswer {
    x: i64,
    value: i64,
}

#[derive(Debug, Serialize)]
struct QueryReport {
    objective: String,
    lines: usize,
    hull_size: usize,
    results: Vec<QueryAnswer>,
}

fn evaluate(lines: &[(i64, i64)], xs: &[i64], objective: Objective) -> Result<QueryReport> {
    let mut env = LineEnvelope::with_objective(objective);
    env.extend(lines.iter().copied());
    tracing::debug!(lines = lines.len(), hull_size = env.len(), "envelope_built");
    let results = xs
        .iter()
        .map(|&x| {
            let value = env
                .try_query(x)
                .with_context(|| format!("query at x={x}"))?;
            Ok(QueryAnswer { x, value })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(QueryReport {
        objective: objective.to_string(),
        lines: lines.len(),
        hull_size: env.len(),
        results,
    })
}

fn query(
    lines_path: &Path,
    queries: Option<&Path>,
    extra: Vec<i64>,
    objective: Objective,
    out: Option<&Path>,
) -> Result<()> {
    let lines = io::load_lines(lines_path)?;
    let mut xs = match queries {
        Some(path) => io::load_queries(path)?,
        None => Vec::new(),
    };
    xs.extend(extra);
    if xs.is_empty() {
        bail!("no query points; pass --queries and/or --x");
    }
    tracing::info!(
        lines = lines.len(),
        queries = xs.len(),
        objective = %objective,
        "query"
    );
    let report = evaluate(&lines, &xs, objective)?;
    tracing::info!(hull_size = report.hull_size, "evaluated");

    let Some(out) = out else {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(&report)?)
        .with_context(|| format!("writing {}", out.display()))?;
    write_sidecar(
        out,
        Payload::new(serde_json::json!({
            "lines": lines_path.to_string_lossy(),
            "queries": queries.map(|q| q.to_string_lossy().into_owned()),
            "objective": objective.to_string(),
            "query_count": xs.len(),
        })),
    )?;
    Ok(())
}

fn sample(cfg: LineCfg, tok: ReplayToken, out: &Path) -> Result<()> {
    let lines = draw_lines(cfg, tok);
    tracing::info!(count = lines.len(), seed = tok.seed, index = tok.index, "sample");
    io::write_lines(out, &lines)?;
    write_sidecar(
        out,
        Payload::new(serde_json::json!({
            "seed": tok.seed,
            "index": tok.index,
            "count": lines.len(),
            "slope_max": cfg.slope_max,
            "intercept_max": cfg.intercept_max,
            "repeat_slope_frac": cfg.repeat_slope_frac,
        })),
    )?;
    Ok(())
}

/// Number of probe points where the envelope disagrees with brute force.
fn count_mismatches(lines: &[(i64, i64)], xs: &[i64], objective: Objective) -> Result<usize> {
    let mut env = LineEnvelope::with_objective(objective);
    env.extend(lines.iter().copied());
    env.check_invariants()?;
    let mut mismatches = 0;
    for &x in xs {
        let fast = env.try_query(x).ok();
        let slow = naive_extremum(lines, x, objective);
        if fast != slow {
            tracing::warn!(x, fast = ?fast, slow = ?slow, "mismatch");
            mismatches += 1;
        }
    }
    Ok(mismatches)
}

fn check(
    lines_path: &Path,
    probes: usize,
    seed: u64,
    x_max: i64,
    objective: Objective,
) -> Result<()> {
    let lines = io::load_lines(lines_path)?;
    let xs = draw_queries(probes, x_max, ReplayToken::new(seed, 0));
    tracing::info!(lines = lines.len(), probes = xs.len(), objective = %objective, "check");
    let mismatches = count_mismatches(&lines, &xs, objective)?;
    if mismatches > 0 {
        bail!("{mismatches} of {} probes disagree with brute force", xs.len());
    }
    tracing::info!("check_passed");
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "linehull_version": linehull::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
