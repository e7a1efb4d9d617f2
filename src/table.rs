use std::{fs, path::Path};

use anyhow::Result;
use itertools::Itertools;
use log::info;
use ndarray::Array2;
use polars::prelude::*;
use serde::Serialize;

use crate::datastructures::*;
use crate::instance::InstanceRecord;
use crate::reference::ReferenceTables;


/// Per method counters over all instances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MethodTally {
    pub method: String,
    /// Instances where the best score equals the best known score
    pub nb_best_known: usize,
    /// Instances where a run proved optimality
    pub nb_optimal: usize,
    /// Instances where the best score is the best among the methods
    pub nb_best_found: usize,
    /// Instances where the mean score is the best among the methods
    pub nb_best_mean: usize,
    /// Runs reaching the best score of their method, over all instances
    pub nb_best_runs: usize,
    pub nb_runs: usize,
}

/// Number of instances where a method of the pair was better than the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GapTally {
    pub method_1: String,
    pub method_2: String,
    pub method_1_better_score: usize,
    pub method_2_better_score: usize,
    pub method_1_better_time: usize,
    pub method_2_better_time: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub problem: Problem,
    pub methods_names: Vec<String>,
    /// Every pair of methods, in configuration order
    pub gaps: Vec<(String, String)>,
    pub instances: Vec<InstanceRecord>,
    /// Rank tiers of every instance, in instance order
    pub ranks: Vec<Vec<Vec<String>>>,
    /// `rank_counts[(m, k)]`: number of instances where method `m` is in tier `k`
    pub rank_counts: Array2<usize>,
    pub tallies: Vec<MethodTally>,
    pub gap_tallies: Vec<GapTally>,
}

/// Ranking of the methods over all instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub method: String,
    pub score: usize,
    pub rank_counts: Vec<usize>,
}

impl Table {
    /// Reads the reference tables and every run log named by `config`.
    ///
    /// Fails on the first instance missing from the reference tables.
    pub fn new(config: &Config) -> Result<Self> {
        let references = ReferenceTables::load(
            &config.best_scores_path(),
            &config.instance_info_path(),
        )?;
        Self::with_references(config, &references)
    }

    pub fn with_references(
        config: &Config,
        references: &ReferenceTables,
    ) -> Result<Self> {
        let methods_names =
            config.methods.iter().map(|m| m.name.clone()).collect_vec();
        let gaps = pairs(&methods_names);
        let instances = config
            .instances
            .iter()
            .map(|instance| {
                InstanceRecord::build(config, instance, references, &gaps)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_instances(config.problem, methods_names, instances))
    }

    pub fn from_instances(
        problem: Problem,
        methods_names: Vec<String>,
        instances: Vec<InstanceRecord>,
    ) -> Self {
        let gaps = pairs(&methods_names);
        let ranks = instances
            .iter()
            .map(InstanceRecord::rank_tiers)
            .collect_vec();
        let nb_methods = methods_names.len();
        let mut rank_counts = Array2::<usize>::zeros((nb_methods, nb_methods));
        for tiers in &ranks {
            for (tier, members) in tiers.iter().enumerate() {
                for member in members {
                    if let Some(m) = methods_names.iter().position(|n| n == member)
                    {
                        rank_counts[(m, tier)] += 1;
                    }
                }
            }
        }
        let tallies = methods_names
            .iter()
            .map(|name| method_tally(name, &instances))
            .collect_vec();
        let gap_tallies = gaps
            .iter()
            .map(|(m1, m2)| gap_tally(m1, m2, &instances))
            .collect_vec();
        Self {
            problem,
            methods_names,
            gaps,
            instances,
            ranks,
            rank_counts,
            tallies,
            gap_tallies,
        }
    }

    /// Methods sorted by decreasing rank score, the sum over the tiers `k` of the
    /// number of instances in tier `k` times `nb_methods - k`.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let nb_methods = self.methods_names.len();
        self.methods_names
            .iter()
            .zip(self.rank_counts.rows())
            .map(|(method, counts)| LeaderboardEntry {
                method: method.clone(),
                score: counts
                    .iter()
                    .enumerate()
                    .map(|(tier, count)| count * (nb_methods - tier))
                    .sum(),
                rank_counts: counts.to_vec(),
            })
            .sorted_by(|a, b| b.score.cmp(&a.score))
            .collect()
    }

    pub fn tally(&self, method: &str) -> Option<&MethodTally> {
        self.tallies.iter().find(|tally| tally.method == method)
    }

    pub fn gap_tally(&self, m1: &str, m2: &str) -> Option<&GapTally> {
        self.gap_tallies
            .iter()
            .find(|tally| tally.method_1 == m1 && tally.method_2 == m2)
    }

    /// One row per instance and method.
    pub fn results_dataframe(&self) -> Result<DataFrame> {
        let rows = self
            .instances
            .iter()
            .flat_map(|instance| {
                instance.methods.iter().map(move |method| (instance, method))
            })
            .collect_vec();
        let df = df! {
            "instance" => rows.iter().map(|(i, _)| i.name.as_str()).collect_vec(),
            "nb_vertices" => rows.iter().map(|(i, _)| i.info.nb_vertices).collect_vec(),
            "nb_edges" => rows.iter().map(|(i, _)| i.info.nb_edges).collect_vec(),
            "best_known_score" => rows.iter().map(|(i, _)| i.best_known.score).collect_vec(),
            "best_known_optimal" => rows.iter().map(|(i, _)| i.best_known.optimal).collect_vec(),
            "method" => rows.iter().map(|(_, m)| m.name.as_str()).collect_vec(),
            "best_score" => rows.iter().map(|(_, m)| m.best_score.value()).collect_vec(),
            "mean_score" => rows.iter().map(|(_, m)| m.mean_score.value()).collect_vec(),
            "mean_best_time" => rows.iter().map(|(_, m)| m.mean_best_time.value()).collect_vec(),
            "nb_best" => rows.iter().map(|(_, m)| m.nb_best as u32).collect_vec(),
            "nb_runs" => rows.iter().map(|(_, m)| m.nb_runs as u32).collect_vec(),
            "optimal" => rows.iter().map(|(_, m)| m.optimal).collect_vec(),
            "class" => rows.iter().map(|(i, m)| format!("{:?}", i.classify(m))).collect_vec(),
        }?;
        Ok(df)
    }

    /// One row per instance and pair of methods.
    pub fn gaps_dataframe(&self) -> Result<DataFrame> {
        let rows = self
            .instances
            .iter()
            .flat_map(|instance| {
                instance.gaps.iter().map(move |gap| (instance, gap))
            })
            .collect_vec();
        let df = df! {
            "instance" => rows.iter().map(|(i, _)| i.name.as_str()).collect_vec(),
            "method_1" => rows.iter().map(|(_, g)| g.method_1.as_str()).collect_vec(),
            "method_2" => rows.iter().map(|(_, g)| g.method_2.as_str()).collect_vec(),
            "mean_score_difference" => rows.iter().map(|(_, g)| g.mean_score_difference.value()).collect_vec(),
            "p_value" => rows.iter().map(|(_, g)| g.p_value.value()).collect_vec(),
            "mean_best_time_difference" => rows.iter().map(|(_, g)| g.mean_best_time_difference.value()).collect_vec(),
            "significance" => rows.iter().map(|(_, g)| format!("{:?}", g.significance)).collect_vec(),
            "better_method_score" => rows.iter().map(|(_, g)| g.better_method_score.as_deref()).collect_vec(),
            "better_method_time" => rows.iter().map(|(_, g)| g.better_method_time.as_deref()).collect_vec(),
        }?;
        Ok(df)
    }

    pub fn log_summary(&self) {
        let nb_instances = self.instances.len();
        for tally in &self.tallies {
            info!(
                "{}: best known {}/{nb_instances}, best found {}/{nb_instances}, \
                 best mean {}/{nb_instances}, optimal {}/{nb_instances}, \
                 same score reached {}/{}",
                tally.method,
                tally.nb_best_known,
                tally.nb_best_found,
                tally.nb_best_mean,
                tally.nb_optimal,
                tally.nb_best_runs,
                tally.nb_runs,
            );
        }
        for tally in &self.gap_tallies {
            info!(
                "{} vs {}: better score {}-{}, better time {}-{}",
                tally.method_1,
                tally.method_2,
                tally.method_1_better_score,
                tally.method_2_better_score,
                tally.method_1_better_time,
                tally.method_2_better_time,
            );
        }
        for (position, entry) in self.leaderboard().iter().enumerate() {
            info!(
                "#{} {} (score {}, ranks {:?})",
                position + 1,
                entry.method,
                entry.score,
                entry.rank_counts
            );
        }
    }
}

/// Every unordered pair of methods, first method first.
pub fn pairs(methods_names: &[String]) -> Vec<(String, String)> {
    methods_names.iter().cloned().tuple_combinations().collect()
}

fn method_tally(name: &str, instances: &[InstanceRecord]) -> MethodTally {
    let mut tally = MethodTally {
        method: name.to_string(),
        ..Default::default()
    };
    for instance in instances {
        let Ok(method) = instance.method(name) else {
            continue;
        };
        tally.nb_best_known += instance.reaches_best_known(method) as usize;
        tally.nb_optimal += method.optimal as usize;
        tally.nb_best_found += instance.reaches_best_found(method) as usize;
        tally.nb_best_mean += instance.reaches_best_mean(method) as usize;
        tally.nb_best_runs += method.nb_best;
        tally.nb_runs += method.nb_runs;
    }
    tally
}

fn gap_tally(m1: &str, m2: &str, instances: &[InstanceRecord]) -> GapTally {
    let mut tally = GapTally {
        method_1: m1.to_string(),
        method_2: m2.to_string(),
        ..Default::default()
    };
    for gap in instances.iter().filter_map(|instance| instance.gap(m1, m2)) {
        let winner_score = gap.better_method_score.as_deref();
        let winner_time = gap.better_method_time.as_deref();
        tally.method_1_better_score += (winner_score == Some(m1)) as usize;
        tally.method_2_better_score += (winner_score == Some(m2)) as usize;
        tally.method_1_better_time += (winner_time == Some(m1)) as usize;
        tally.method_2_better_time += (winner_time == Some(m2)) as usize;
    }
    tally
}

pub fn df_to_csv(mut df: DataFrame, path: &Path) -> Result<()> {
    let mut file = fs::File::create(path)?;
    CsvWriter::new(&mut file).finish(&mut df)?;
    Ok(())
}
