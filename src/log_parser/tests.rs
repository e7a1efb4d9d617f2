use std::{fs, path::PathBuf};

use super::*;

const MCTS_LOG: &str = "\
#date,problem,instance,method,rand_seed
#2022-03-01 10:00:00,wvcp,g1,mcts,1
turn,time,depth,nb total node,nb current node,height,nb_colors,penalty,score,solution
1,0,0,1,1,0,5,0,14,0:1:2:3:4
12,3,4,37,12,6,4,0,12,0:1:2:3:0
48,7,6,50,1,6,4,0,11,0:1:2:1:0
#2022-03-01 10:02:30
";

#[test]
fn test_last_row_is_the_result() {
    let sample = parse_run_log(MCTS_LOG).unwrap();
    assert_eq!(sample.score, 11);
    assert_eq!(sample.time, 7.0);
    assert_eq!(sample.turn, Some(48));
    assert_eq!(
        sample.counters,
        Some(NodeCounters {
            total: 50,
            current: 1
        })
    );
}

#[test]
fn test_optimality_detection() {
    let sample = parse_run_log(MCTS_LOG).unwrap();
    assert!(sample.optimal);
    assert_eq!(sample.proof_time, Some(150.0));

    let single_node = MCTS_LOG.replace("48,7,6,50,1", "48,7,6,1,1");
    let sample = parse_run_log(&single_node).unwrap();
    assert!(!sample.optimal);
    assert_eq!(sample.proof_time, None);

    let open_tree = MCTS_LOG.replace("48,7,6,50,1", "48,7,6,50,2");
    assert!(!parse_run_log(&open_tree).unwrap().optimal);
}

#[test]
fn test_optimal_without_dates_is_kept() {
    let log = MCTS_LOG.replace("#2022-03-01 10:02:30\n", "");
    let sample = parse_run_log(&log).unwrap();
    assert!(sample.optimal);
    assert_eq!(sample.proof_time, None);
    assert_eq!(sample.score, 11);
}

#[test]
fn test_local_search_log() {
    let log = "\
#date,problem,instance,method,rand_seed
#2022-03-01 10:00:00,wvcp,g1,tabu_weight,3
turn,time,nb_colors,penalty,score,solution
10,2,5,0,30,0:1:2
200,-1,5,0,28,0:2:1
";
    let sample = parse_run_log(log).unwrap();
    assert_eq!(sample.score, 28);
    assert_eq!(sample.time, 0.0);
    assert_eq!(sample.counters, None);
    assert!(!sample.optimal);
}

#[test]
fn test_score_column_fallback() {
    let log = "turn,time,nb_colors,solution\n3,12,9,0:1:2\n";
    assert_eq!(parse_run_log(log).unwrap().score, 9);
    let log = "turn,time,colors\n3,12,9\n";
    assert!(parse_run_log(log).is_err());
}

#[test]
fn test_malformed_logs() {
    assert!(parse_run_log("#only comments\n").is_err());
    assert!(parse_run_log("turn,time,score\n").is_err());
    assert!(parse_run_log("turn,time,score\n1,2,3\n4,5,oops\n").is_err());
}

#[test]
fn test_legacy_log() {
    assert_eq!(
        parse_legacy_log("score,time\n42,17\n").unwrap(),
        Some(RunSample::new(42, 17.0))
    );
    assert_eq!(parse_legacy_log("score,time\ngiveup\n").unwrap(), None);
    assert!(parse_legacy_log("score,time\n").is_err());
    assert!(parse_legacy_log("score,time\nabc,1\n").is_err());
}

#[test]
fn test_discovery_sorts_by_seed() {
    let dir = tempfile::tempdir().unwrap();
    for seed in [1, 2, 10, 9] {
        fs::write(dir.path().join(format!("g1_{seed}.csv")), "").unwrap();
    }
    fs::write(dir.path().join("g1_2.txt"), "").unwrap();
    fs::write(dir.path().join("g1_b_3.csv"), "").unwrap();
    fs::write(dir.path().join("g12_4.csv"), "").unwrap();
    let files = discover_run_logs(dir.path(), "g1").unwrap();
    let names = files
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, ["g1_1.csv", "g1_2.csv", "g1_9.csv", "g1_10.csv"]);
    let legacy = discover_legacy_logs(dir.path(), "g1").unwrap();
    assert_eq!(legacy, vec![dir.path().join("g1_2.txt")]);
}

#[test]
fn test_discovery_in_missing_directory() {
    let files =
        discover_run_logs(&PathBuf::from("data/test/does_not_exist"), "g1")
            .unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_search_duration() {
    let comments = [
        "#date,problem",
        "#2022-03-01 23:59:50,wvcp",
        "#2022-03-02 00:00:20",
    ];
    assert_eq!(search_duration(&comments).unwrap(), 30.0);
    assert!(search_duration(&comments[..2]).is_err());
    assert!(search_duration(&["#date", "#yesterday", "#today"]).is_err());
}
