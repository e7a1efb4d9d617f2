use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::Parser;
use log::info;
use polars::prelude::*;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use coloring_results::log_parser::DATE_FORMAT;

/// Final scores of a method follow `N(mean, mean * std)`.
#[derive(Serialize, Deserialize, Debug, Clone)]
struct MethodLogConfig {
    directory: PathBuf,
    mean: f64,
    std: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct LogGeneratorConfig {
    methods: Vec<MethodLogConfig>,
    instances: Vec<String>,
    runs_per_instance: usize,
    /// Reports written before the final score
    #[serde(default = "default_nb_reports")]
    nb_reports: usize,
    seed: u64,
    out_path: PathBuf,
}

fn default_nb_reports() -> usize {
    3
}

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the json config
    #[arg(short, long)]
    pub config: PathBuf,
    #[command(flatten)]
    verbosity: clap_verbosity_flag::Verbosity,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();
    let config: LogGeneratorConfig =
        serde_json::from_str(&fs::read_to_string(args.config)?)?;
    let nb_logs = generate_logs(&config)?;
    info!("{nb_logs} run logs written to {:?}", config.out_path);
    Ok(())
}

fn start_date() -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2022, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .context("invalid start date")
}

/// Writes `<out_path>/<directory>/<instance>_<seed>.csv` for every method, instance and seed.
fn generate_logs(config: &LogGeneratorConfig) -> Result<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut nb_logs = 0;
    for method in &config.methods {
        let directory = config.out_path.join(&method.directory);
        fs::create_dir_all(&directory)?;
        let distrib = Normal::new(method.mean, (method.mean * method.std).abs())?;
        for instance in &config.instances {
            for seed in 1..=config.runs_per_instance {
                let score = (distrib.sample(&mut rng).round() as i64).max(1);
                let path = directory.join(format!("{instance}_{seed}.csv"));
                write_log(&path, instance, seed, score, config.nb_reports, &mut rng)?;
                nb_logs += 1;
            }
        }
    }
    Ok(nb_logs)
}

/// Local search log whose scores decrease to `score`.
fn write_log(
    path: &Path,
    instance: &str,
    seed: usize,
    score: i64,
    nb_reports: usize,
    rng: &mut ChaCha8Rng,
) -> Result<()> {
    let nb_rows = nb_reports + 1;
    let mut time = 0;
    let mut times = Vec::with_capacity(nb_rows);
    let mut scores = Vec::with_capacity(nb_rows);
    for report in 0..nb_rows {
        time += rng.gen_range(0..10);
        times.push(time);
        scores.push(score + (nb_rows - 1 - report) as i64 * rng.gen_range(1..4));
    }
    let mut body = df! {
        "turn" => (1..=nb_rows as i64).map(|t| t * 100).collect::<Vec<_>>(),
        "time" => times,
        "nb_colors" => vec![5_i64; nb_rows],
        "penalty" => vec![0_i64; nb_rows],
        "score" => scores,
        "solution" => vec!["0"; nb_rows],
    }?;

    let start = start_date()? + Duration::hours(seed as i64);
    let end = start + Duration::seconds(time + 1);
    let mut file = fs::File::create(path)?;
    writeln!(
        file,
        "#date,problem,instance,method,rand_seed,target,use_target,objective,time_limit"
    )?;
    writeln!(
        file,
        "#{},wvcp,{instance},local_search,{seed},0,false,optimality,3600",
        start.format(DATE_FORMAT)
    )?;
    CsvWriter::new(&mut file).has_header(true).finish(&mut body)?;
    writeln!(file, "#{}", end.format(DATE_FORMAT))?;
    Ok(())
}
