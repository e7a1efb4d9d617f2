#![warn(missing_docs)]
//! Compare graph coloring methods from the logs of their runs.
//!
//! Every method is run once per random seed on every instance. The solver writes one csv log
//! per run; this crate reads the final result of every run, summarizes the runs of each method
//! (best score, mean score, time to reach the best score, proven optimality), tests whether
//! the difference between two methods is significant with a paired Wilcoxon signed-rank test
//! and ranks the methods over all instances.
//!
//! Logs are expected under `<outputs_dir>/<method directory>/<instance>_<seed>.csv` and the
//! reference tables under `<instances_dir>/best_scores_<problem>.txt` (`<instance> <score>
//! <*|->`) and `<instances_dir>/instance_info.txt` (`<instance>,<vertices>,<edges>`).
//!
//! Example
//! ```rust
//! use coloring_results::datastructures::*;
//! use coloring_results::table::Table;
//! # use std::path::PathBuf;
//! # use anyhow::Result;
//!
//! fn example() -> Result<()> {
//!     let config = Config {
//!         problem: Problem::Wvcp,
//!         methods: vec![
//!             MethodConfig::new("MCTS", "mcts"),
//!             MethodConfig::new("TabuWeight", "tabu_weight"),
//!         ],
//!         instances: vec!["p06".to_string(), "p07".into()],
//!         instance_list: None,
//!         outputs_dir: PathBuf::from("outputs"),
//!         instances_dir: PathBuf::from("instances"),
//!         out_dir: PathBuf::from("results"),
//!     };
//!     let table = Table::new(&config)?;
//!     for entry in table.leaderboard() {
//!         println!("{}: {}", entry.method, entry.score);
//!     }
//!     Ok(())
//! }
//! ```

/// Configuration and shared types, including the sentinel for missing data.
#[allow(missing_docs)]
pub mod datastructures;

/// Reading of the run logs written by the solver.
#[allow(missing_docs)]
pub mod log_parser;

/// Paired signed-rank test and small numeric helpers.
pub mod statistics;

/// Summary of the runs of one method on one instance.
#[allow(missing_docs)]
pub mod method;

/// Pairwise comparison of two methods on one instance.
#[allow(missing_docs)]
pub mod gap;

/// Best known scores and sizes of the instances.
#[allow(missing_docs)]
pub mod reference;

/// All methods on one instance.
#[allow(missing_docs)]
pub mod instance;

/// All methods on all instances, with rankings and counters.
#[allow(missing_docs)]
pub mod table;
