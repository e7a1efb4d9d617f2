use std::path::Path;

use anyhow::Result;
use itertools::Itertools;
use log::{debug, warn};
use serde::Serialize;

use crate::datastructures::Metric;
use crate::log_parser::{self, RunSample};
use crate::statistics::{mean, round_to};

#[cfg(test)]
mod tests;

/// Results of every run of one method on one instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodRecord {
    pub name: String,
    pub instance: String,
    /// One sample per seed, in seed order
    pub runs: Vec<RunSample>,
    pub best_score: Metric<i64>,
    pub mean_score: Metric<f64>,
    /// Mean time of the runs reaching `best_score`
    pub mean_best_time: Metric<f64>,
    pub nb_best: usize,
    pub nb_runs: usize,
    /// At least one run explored the whole search space
    pub optimal: bool,
    pub mean_proof_time: Option<f64>,
}

impl MethodRecord {
    /// Reads every log of `instance` in `directory`.
    ///
    /// Unreadable runs are skipped. The legacy format is only looked for when the
    /// directory holds no run log for the instance.
    pub fn build(name: &str, directory: &Path, instance: &str) -> Result<Self> {
        let files = log_parser::discover_run_logs(directory, instance)?;
        let runs = if files.is_empty() {
            let legacy_files =
                log_parser::discover_legacy_logs(directory, instance)?;
            legacy_files
                .iter()
                .filter_map(|file| match log_parser::read_legacy_log(file) {
                    Ok(run) => run,
                    Err(err) => {
                        warn!("skipping run of {name}: {err:#}");
                        None
                    }
                })
                .collect_vec()
        } else {
            files
                .iter()
                .filter_map(|file| match log_parser::read_run_log(file) {
                    Ok(run) => Some(run),
                    Err(err) => {
                        warn!("skipping run of {name}: {err:#}");
                        None
                    }
                })
                .collect_vec()
        };
        debug!("{name} on {instance}: {} runs", runs.len());
        Ok(Self::from_runs(name, instance, runs))
    }

    pub fn from_runs(name: &str, instance: &str, runs: Vec<RunSample>) -> Self {
        let best_score: Metric<i64> = runs.iter().map(|run| run.score).min().into();
        let mean_score = Metric::from(mean(runs.iter().map(|run| run.score as f64)))
            .map(|m| round_to(m, 1));
        let best_runs = runs
            .iter()
            .filter(|run| Metric::Value(run.score) == best_score)
            .collect_vec();
        let mean_best_time = Metric::from(mean(best_runs.iter().map(|run| run.time)))
            .map(|m| round_to(m, 1));
        let mean_proof_time =
            mean(runs.iter().filter(|run| run.optimal).filter_map(|run| run.proof_time));
        Self {
            name: name.to_string(),
            instance: instance.to_string(),
            best_score,
            mean_score,
            mean_best_time,
            nb_best: best_runs.len(),
            nb_runs: runs.len(),
            optimal: runs.iter().any(|run| run.optimal),
            mean_proof_time,
            runs,
        }
    }

    pub fn has_data(&self) -> bool {
        !self.runs.is_empty()
    }

    pub fn scores(&self) -> Vec<i64> {
        self.runs.iter().map(|run| run.score).collect()
    }

    pub fn times(&self) -> Vec<f64> {
        self.runs.iter().map(|run| run.time).collect()
    }

    /// Every run ended on the same score.
    pub fn is_constant(&self) -> bool {
        self.has_data() && self.nb_best == self.nb_runs
    }
}
