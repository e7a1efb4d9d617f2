use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Only gaps with a p-value at or below this threshold decide which method is better.
pub const P_VALUE_STRONG: f64 = 0.001;
/// Second reporting level for p-values.
pub const P_VALUE_MODERATE: f64 = 0.05;
/// Third reporting level for p-values.
pub const P_VALUE_WEAK: f64 = 0.1;
/// Minimal mean time difference (seconds) to consider one method faster than another.
pub const TIME_TIEBREAK_SECONDS: f64 = 1.0;

/// A statistic that is either computed from run data or missing because no run was found.
///
/// `Missing` orders after every `Value`, so a method without data is always ranked worst.
/// Two missing statistics compare equal.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum Metric<T> {
    Value(T),
    Missing,
}

impl<T: Copy> Metric<T> {
    pub fn value(&self) -> Option<T> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Metric::Missing)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Metric<U> {
        match self {
            Metric::Value(v) => Metric::Value(f(v)),
            Metric::Missing => Metric::Missing,
        }
    }

    /// Combines two present values, any missing operand yields `Missing`.
    pub fn zip_with<U: Copy, R>(
        self,
        other: Metric<U>,
        f: impl FnOnce(T, U) -> R,
    ) -> Metric<R> {
        match (self, other) {
            (Metric::Value(a), Metric::Value(b)) => Metric::Value(f(a, b)),
            _ => Metric::Missing,
        }
    }
}

impl<T> From<Option<T>> for Metric<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Metric::Value(v),
            None => Metric::Missing,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Metric<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{v}"),
            Metric::Missing => write!(f, "inf"),
        }
    }
}

/// The optimization problem the solver was run on. Selects the best known score table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Problem {
    /// Graph coloring problem
    Gcp,
    /// Weighted vertex coloring problem
    Wvcp,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Gcp => write!(f, "gcp"),
            Problem::Wvcp => write!(f, "wvcp"),
        }
    }
}

/// A method to compare and the directory holding the logs of its runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodConfig {
    pub name: String,
    pub directory: PathBuf,
}

impl MethodConfig {
    pub fn new(name: &str, directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            directory: directory.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub problem: Problem,
    pub methods: Vec<MethodConfig>,
    #[serde(default)]
    pub instances: Vec<String>,
    /// File with one instance name per line, replaces `instances` when set
    #[serde(default)]
    pub instance_list: Option<PathBuf>,
    /// Prefix of every method directory
    #[serde(default = "default_outputs_dir")]
    pub outputs_dir: PathBuf,
    #[serde(default = "default_instances_dir")]
    pub instances_dir: PathBuf,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

impl Config {
    pub fn from_cli(args: &Args) -> Result<Config> {
        let config_path = &args.config;
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config {config_path:?}"))?;
        let mut config: Config = serde_json::from_str(&config_str)?;
        if let Some(problem) = args.problem {
            config.problem = problem;
        }
        if let Some(instance_list) = &args.instance_list {
            config.instance_list = Some(instance_list.to_path_buf());
        }
        if let Some(instances) = &args.instances {
            config.instances = instances.to_vec();
            config.instance_list = None;
        }
        if let Some(outputs_dir) = &args.outputs_dir {
            config.outputs_dir = outputs_dir.to_path_buf();
        }
        if let Some(instances_dir) = &args.instances_dir {
            config.instances_dir = instances_dir.to_path_buf();
        }
        if let Some(out_dir) = &args.out_dir {
            config.out_dir = out_dir.to_path_buf();
        }
        if let Some(instance_list) = &config.instance_list {
            config.instances = read_instance_list(instance_list)?;
        }
        if config.methods.is_empty() {
            anyhow::bail!("no method configured in {config_path:?}");
        }
        if config.instances.is_empty() {
            anyhow::bail!("no instance configured in {config_path:?}");
        }
        Ok(config)
    }

    /// Directory holding the run logs of `method`.
    pub fn method_directory(&self, method: &MethodConfig) -> PathBuf {
        self.outputs_dir.join(&method.directory)
    }

    pub fn best_scores_path(&self) -> PathBuf {
        self.instances_dir
            .join(format!("best_scores_{}.txt", self.problem))
    }

    pub fn instance_info_path(&self) -> PathBuf {
        self.instances_dir.join("instance_info.txt")
    }
}

fn default_outputs_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_instances_dir() -> PathBuf {
    PathBuf::from("instances")
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("results")
}

/// Reads one instance name per line, blank lines are ignored.
pub fn read_instance_list(path: &PathBuf) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read instance list {path:?}"))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[derive(Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Path to the json config
    #[arg(short, long)]
    pub config: PathBuf,
    /// Problem solved by the methods (selects the best known scores)
    #[arg(short, long, value_enum)]
    pub problem: Option<Problem>,
    /// List of instances to compare the methods on
    #[arg(short, long, value_delimiter = ' ', num_args = 0..)]
    pub instances: Option<Vec<String>>,
    /// Path to a file containing one instance name per line
    #[arg(short = 'l', long, value_name = "FILE")]
    pub instance_list: Option<PathBuf>,
    /// Directory containing the run logs of every method
    #[arg(long, value_name = "DIR")]
    pub outputs_dir: Option<PathBuf>,
    /// Directory containing best_scores_<problem>.txt and instance_info.txt
    #[arg(long, value_name = "DIR")]
    pub instances_dir: Option<PathBuf>,
    /// Path to the output directory
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
    #[command(flatten)]
    pub verbosity: Verbosity,
}
