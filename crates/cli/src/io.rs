//! Tabular line sets and query points (CSV or Parquet via polars).
//!
//! - Line tables carry integer columns `slope` and `intercept`.
//! - Query tables carry an integer column `x`.

use anyhow::{anyhow, bail, Context, Result};
use polars::prelude::*;
use std::fs;
use std::path::Path;

fn scan(path: &Path) -> Result<LazyFrame> {
    let lf = match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .finish()?,
        Some("parquet") => LazyFrame::scan_parquet(path, ScanArgsParquet::default())?,
        _ => bail!(
            "unsupported table {} (expected .csv or .parquet)",
            path.display()
        ),
    };
    Ok(lf)
}

fn int_columns(path: &Path, names: &[&str]) -> Result<DataFrame> {
    let exprs: Vec<Expr> = names
        .iter()
        .map(|n| col(*n).cast(DataType::Int64))
        .collect();
    scan(path)?
        .select(exprs)
        .collect()
        .with_context(|| format!("reading columns {:?} from {}", names, path.display()))
}

/// Load `(slope, intercept)` pairs in file order.
pub fn load_lines(path: &Path) -> Result<Vec<(i64, i64)>> {
    let df = int_columns(path, &["slope", "intercept"])?;
    let slopes = df.column("slope")?.i64()?;
    let intercepts = df.column("intercept")?.i64()?;
    slopes
        .into_iter()
        .zip(intercepts)
        .enumerate()
        .map(|(row, pair)| match pair {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(anyhow!("{} row {row}: missing slope or intercept", path.display())),
        })
        .collect()
}

/// Load query points from column `x`.
pub fn load_queries(path: &Path) -> Result<Vec<i64>> {
    let df = int_columns(path, &["x"])?;
    let xs = df.column("x")?.i64()?;
    xs.into_iter()
        .enumerate()
        .map(|(row, x)| x.ok_or_else(|| anyhow!("{} row {row}: missing x", path.display())))
        .collect()
}

/// Write a line set as CSV with a header row.
pub fn write_lines(path: &Path, lines: &[(i64, i64)]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let slopes: Vec<i64> = lines.iter().map(|&(a, _)| a).collect();
    let intercepts: Vec<i64> = lines.iter().map(|&(_, b)| b).collect();
    let mut df = df!("slope" => slopes, "intercept" => intercepts)?;
    let mut file =
        fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
