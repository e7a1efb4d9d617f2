use std::{fs, io::Cursor, path::Path};

use anyhow::{Context, Result};
use log::{debug, warn};
use polars::prelude::*;
use serde::Serialize;

mod utils;
pub use utils::*;

#[cfg(test)]
mod tests;

/// Score column names, in order of preference, written by the different solver versions.
pub const SCORE_COLUMNS: [&str; 2] = ["score", "nb_colors"];
pub const TIME_COLUMN: &str = "time";
pub const TOTAL_NODE_COLUMN: &str = "nb total node";
pub const CURRENT_NODE_COLUMN: &str = "nb current node";
pub const TURN_COLUMN: &str = "turn";
/// Written by old solver versions instead of `score,time` when the run was aborted.
pub const GIVEUP_MARKER: &str = "giveup";

/// Tree counters reported by tree search methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeCounters {
    pub total: i64,
    pub current: i64,
}

impl NodeCounters {
    /// The solver collapses the tree to its root once every branch was explored.
    /// A tree of a single node never branched and proves nothing.
    pub fn proves_optimality(&self) -> bool {
        self.total > 1 && self.current <= 1
    }
}

/// Final state of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSample {
    pub score: i64,
    /// Elapsed time (s) when the final score was reported
    pub time: f64,
    pub turn: Option<i64>,
    pub counters: Option<NodeCounters>,
    pub optimal: bool,
    /// Duration of the whole search (s), only for runs proving optimality
    pub proof_time: Option<f64>,
}

impl RunSample {
    pub fn new(score: i64, time: f64) -> Self {
        Self {
            score,
            time: time.max(0.0),
            turn: None,
            counters: None,
            optimal: false,
            proof_time: None,
        }
    }
}

/// Reads the run log of the solver: comment lines starting with `#`, a header and the
/// progress rows. The last row holds the result of the run.
pub fn read_run_log(path: &Path) -> Result<RunSample> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read run log {path:?}"))?;
    parse_run_log(&content).with_context(|| format!("invalid run log {path:?}"))
}

pub fn parse_run_log(content: &str) -> Result<RunSample> {
    let (comments, body): (Vec<&str>, Vec<&str>) = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .partition(|line| line.starts_with('#'));
    if body.len() < 2 {
        anyhow::bail!("no data row after the header");
    }
    let df = CsvReader::new(Cursor::new(body.join("\n").into_bytes()))
        .has_header(true)
        .finish()?;
    let last = df.height().checked_sub(1).context("empty run log")?;

    let score_column = SCORE_COLUMNS
        .iter()
        .find(|name| has_column(&df, name))
        .with_context(|| format!("none of the columns {SCORE_COLUMNS:?} found"))?;
    let score = last_i64(&df, score_column, last)?;
    let time = last_f64(&df, TIME_COLUMN, last)?;
    let mut sample = RunSample::new(score, time);

    if has_column(&df, TURN_COLUMN) {
        sample.turn = last_i64(&df, TURN_COLUMN, last).ok();
    }
    if has_column(&df, TOTAL_NODE_COLUMN) && has_column(&df, CURRENT_NODE_COLUMN)
    {
        let counters = NodeCounters {
            total: last_i64(&df, TOTAL_NODE_COLUMN, last)?,
            current: last_i64(&df, CURRENT_NODE_COLUMN, last)?,
        };
        sample.optimal = counters.proves_optimality();
        sample.counters = Some(counters);
    }
    if sample.optimal {
        match search_duration(&comments) {
            Ok(duration) => sample.proof_time = Some(duration),
            Err(err) => {
                warn!("optimal run without usable search dates: {err:#}")
            }
        }
    }
    Ok(sample)
}

/// Reads the log format of old solver versions: a header line then `score,time`.
/// Returns `None` for runs that gave up.
pub fn read_legacy_log(path: &Path) -> Result<Option<RunSample>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read legacy log {path:?}"))?;
    parse_legacy_log(&content)
        .with_context(|| format!("invalid legacy log {path:?}"))
}

pub fn parse_legacy_log(content: &str) -> Result<Option<RunSample>> {
    let line = content
        .lines()
        .nth(1)
        .map(str::trim)
        .context("missing result line")?;
    if line == GIVEUP_MARKER {
        debug!("run gave up, ignored");
        return Ok(None);
    }
    let (score, time) = line
        .split_once(',')
        .with_context(|| format!("expected <score>,<time>, got {line:?}"))?;
    Ok(Some(RunSample::new(
        score.trim().parse()?,
        time.trim().parse()?,
    )))
}

fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_names().contains(&name)
}

fn last_i64(df: &DataFrame, name: &str, row: usize) -> Result<i64> {
    df.column(name)?
        .cast(&DataType::Int64)?
        .i64()?
        .get(row)
        .with_context(|| format!("unparsable value in column {name:?}"))
}

fn last_f64(df: &DataFrame, name: &str, row: usize) -> Result<f64> {
    df.column(name)?
        .cast(&DataType::Float64)?
        .f64()?
        .get(row)
        .with_context(|| format!("unparsable value in column {name:?}"))
}
