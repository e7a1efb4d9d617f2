use anyhow::Result;
use clap::Parser;
use log::{error, info};
use serde::Serialize;
use std::fs;

use coloring_results::datastructures::*;
use coloring_results::table::{self, GapTally, LeaderboardEntry, MethodTally, Table};

#[derive(Serialize)]
struct Summary<'a> {
    problem: Problem,
    instances: Vec<&'a str>,
    tallies: &'a [MethodTally],
    gap_tallies: &'a [GapTally],
    ranks: &'a [Vec<Vec<String>>],
    leaderboard: Vec<LeaderboardEntry>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();
    let config = match Config::from_cli(&args) {
        Ok(config) => config,
        Err(err) => {
            error!("{err:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };
    let out_dir = &config.out_dir;
    fs::create_dir_all(out_dir)?;

    let table = Table::new(&config)?;
    table.log_summary();

    table::df_to_csv(table.results_dataframe()?, &out_dir.join("results.csv"))?;
    table::df_to_csv(table.gaps_dataframe()?, &out_dir.join("gaps.csv"))?;
    serde_json::to_writer_pretty(
        fs::File::create(out_dir.join("summary.json"))?,
        &Summary {
            problem: table.problem,
            instances: table.instances.iter().map(|i| i.name.as_str()).collect(),
            tallies: &table.tallies,
            gap_tallies: &table.gap_tallies,
            ranks: &table.ranks,
            leaderboard: table.leaderboard(),
        },
    )?;
    info!("Results written to {out_dir:?}");
    Ok(())
}
