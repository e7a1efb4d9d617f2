use std::fs;

use super::*;

fn write_log(dir: &Path, instance: &str, seed: u32, score: i64, time: i64) {
    let content = format!(
        "#date,problem,instance,method,rand_seed\n\
         #2022-03-01 10:00:00,wvcp,{instance},tabu,{seed}\n\
         turn,time,nb_colors,penalty,score,solution\n\
         1,0,9,0,{},0:1\n\
         2,{time},8,0,{score},0:1\n\
         #2022-03-01 10:10:00\n",
        score + 5
    );
    fs::write(dir.join(format!("{instance}_{seed}.csv")), content).unwrap();
}

#[test]
fn test_aggregation() {
    let dir = tempfile::tempdir().unwrap();
    write_log(dir.path(), "g1", 0, 10, 5);
    write_log(dir.path(), "g1", 1, 10, 7);
    write_log(dir.path(), "g1", 2, 12, 100);
    let method = MethodRecord::build("tabu", dir.path(), "g1").unwrap();
    assert_eq!(method.best_score, Metric::Value(10));
    assert_eq!(method.mean_score, Metric::Value(10.7));
    assert_eq!(method.mean_best_time, Metric::Value(6.0));
    assert_eq!(method.nb_best, 2);
    assert_eq!(method.nb_runs, 3);
    assert_eq!(method.scores(), vec![10, 10, 12]);
    assert_eq!(method.times(), vec![5.0, 7.0, 100.0]);
    assert!(!method.optimal);
    assert!(!method.is_constant());
}

#[test]
fn test_runs_follow_seed_order() {
    let dir = tempfile::tempdir().unwrap();
    write_log(dir.path(), "g1", 10, 13, 1);
    write_log(dir.path(), "g1", 9, 12, 1);
    write_log(dir.path(), "g1", 1, 11, 1);
    let method = MethodRecord::build("tabu", dir.path(), "g1").unwrap();
    assert_eq!(method.scores(), vec![11, 12, 13]);
}

#[test]
fn test_malformed_run_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_log(dir.path(), "g1", 0, 10, 5);
    fs::write(dir.path().join("g1_1.csv"), "turn,time,score\n1,2,x\n").unwrap();
    fs::write(dir.path().join("g1_2.csv"), "#truncated\n").unwrap();
    let method = MethodRecord::build("tabu", dir.path(), "g1").unwrap();
    assert_eq!(method.nb_runs, 1);
    assert_eq!(method.best_score, Metric::Value(10));
    assert!(method.is_constant());
}

#[test]
fn test_no_valid_run_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("g1_1.csv"), "turn,time,score\n1,2,x\n").unwrap();
    let method = MethodRecord::build("tabu", dir.path(), "g1").unwrap();
    assert_eq!(method.nb_runs, 0);
    assert!(!method.has_data());
    assert_eq!(method.best_score, Metric::Missing);
    assert_eq!(method.mean_score, Metric::Missing);
    assert_eq!(method.mean_best_time, Metric::Missing);
}

#[test]
fn test_missing_directory() {
    let method =
        MethodRecord::build("tabu", Path::new("data/test/nowhere"), "g1")
            .unwrap();
    assert_eq!(method.nb_runs, 0);
    assert_eq!(method.best_score, Metric::Missing);
    assert!(!method.optimal);
}

#[test]
fn test_legacy_fallback() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("g1_1.txt"), "score,time\n25,4\n").unwrap();
    fs::write(dir.path().join("g1_2.txt"), "score,time\ngiveup\n").unwrap();
    fs::write(dir.path().join("g1_3.txt"), "score,time\n27,9\n").unwrap();
    let method = MethodRecord::build("old", dir.path(), "g1").unwrap();
    assert_eq!(method.scores(), vec![25, 27]);
    assert_eq!(method.mean_score, Metric::Value(26.0));
    assert_eq!(method.mean_best_time, Metric::Value(4.0));

    // legacy logs are ignored as soon as a run log exists
    write_log(dir.path(), "g1", 4, 30, 2);
    let method = MethodRecord::build("old", dir.path(), "g1").unwrap();
    assert_eq!(method.scores(), vec![30]);
}

#[test]
fn test_optimality_across_runs() {
    let optimal = RunSample {
        optimal: true,
        proof_time: Some(40.0),
        ..RunSample::new(7, 3.0)
    };
    let unproven = RunSample {
        optimal: true,
        ..RunSample::new(7, 5.0)
    };
    let method = MethodRecord::from_runs(
        "mcts",
        "g1",
        vec![RunSample::new(8, 1.0), optimal, unproven],
    );
    assert!(method.optimal);
    assert_eq!(method.mean_proof_time, Some(40.0));
    assert_eq!(method.mean_best_time, Metric::Value(4.0));
}
