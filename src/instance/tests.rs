use crate::log_parser::RunSample;

use super::*;

fn method(name: &str, scores: &[i64], times: &[f64]) -> MethodRecord {
    let runs = scores
        .iter()
        .zip(times)
        .map(|(&score, &time)| RunSample::new(score, time))
        .collect();
    MethodRecord::from_runs(name, "g1", runs)
}

fn instance(methods: Vec<MethodRecord>) -> InstanceRecord {
    let gaps = methods
        .iter()
        .map(|m| m.name.clone())
        .tuple_combinations()
        .collect_vec();
    InstanceRecord::from_methods(
        "g1",
        InstanceInfo {
            nb_vertices: 30,
            nb_edges: 120,
        },
        BestKnown {
            score: 10,
            optimal: true,
        },
        methods,
        &gaps,
    )
    .unwrap()
}

#[test]
fn test_ties_share_a_tier() {
    let instance = instance(vec![
        method("a", &[5, 5], &[10.0, 10.0]),
        method("b", &[5, 5], &[10.0, 10.0]),
        method("c", &[3, 3], &[3.0, 3.0]),
    ]);
    assert_eq!(
        instance.rank_tiers(),
        vec![vec!["c".to_string()], vec!["a".into(), "b".into()], vec![]]
    );
}

#[test]
fn test_tiers_follow_the_composite_key() {
    let instance = instance(vec![
        method("slow", &[4, 6], &[20.0, 1.0]),
        method("missing", &[], &[]),
        method("fast", &[4, 6], &[2.0, 1.0]),
        method("worse_best", &[5, 5], &[1.0, 1.0]),
        method("missing_too", &[], &[]),
    ]);
    assert_eq!(
        instance.rank_tiers(),
        vec![
            vec!["fast".to_string()],
            vec!["slow".into()],
            vec!["worse_best".into()],
            vec!["missing".into(), "missing_too".into()],
            vec![],
        ]
    );
}

#[test]
fn test_best_found_and_best_mean() {
    let mut instance = instance(vec![
        method("a", &[12, 14], &[1.0, 1.0]),
        method("b", &[11, 17], &[1.0, 1.0]),
        method("c", &[], &[]),
    ]);
    assert_eq!(instance.best_found(), Metric::Value(11));
    assert_eq!(instance.best_mean(), Metric::Value(13.0));
    assert!(instance.reaches_best_mean(instance.method("a").unwrap()));
    assert!(!instance.reaches_best_found(instance.method("c").unwrap()));

    instance.methods.push(method("d", &[9, 9], &[1.0, 1.0]));
    assert_eq!(instance.best_found(), Metric::Value(9));
    assert_eq!(instance.best_mean(), Metric::Value(9.0));
}

#[test]
fn test_all_missing() {
    let instance =
        instance(vec![method("a", &[], &[]), method("b", &[], &[])]);
    assert_eq!(instance.best_found(), Metric::Missing);
    assert!(!instance.reaches_best_found(instance.method("a").unwrap()));
    assert!(!instance.reaches_best_known(instance.method("a").unwrap()));
    assert!(instance.gap("a", "b").unwrap().is_incomparable());
}

#[test]
fn test_classification() {
    let mut proven = method("proven", &[10], &[1.0]);
    proven.optimal = true;
    let instance = instance(vec![
        proven,
        method("new_best", &[9, 12], &[1.0, 1.0]),
        method("best_known", &[10], &[1.0]),
        method("best_found", &[9, 11], &[1.0, 1.0]),
        method("other", &[15], &[1.0]),
        method("none", &[], &[]),
    ]);
    let classes = instance
        .methods
        .iter()
        .map(|m| instance.classify(m))
        .collect_vec();
    assert_eq!(
        classes,
        vec![
            ScoreClass::Optimal,
            ScoreClass::NewBest,
            ScoreClass::BestKnown,
            ScoreClass::NewBest,
            ScoreClass::Other,
            ScoreClass::Missing,
        ]
    );
}

#[test]
fn test_best_found_without_best_known() {
    let instance = instance(vec![
        method("a", &[12], &[1.0]),
        method("b", &[13], &[1.0]),
    ]);
    assert_eq!(
        instance.classify(instance.method("a").unwrap()),
        ScoreClass::BestFound
    );
    assert_eq!(
        instance.classify(instance.method("b").unwrap()),
        ScoreClass::Other
    );
}

#[test]
fn test_gaps_are_built_in_pair_order() {
    let instance = instance(vec![
        method("a", &[10, 11], &[1.0, 1.0]),
        method("b", &[12, 12], &[1.0, 1.0]),
        method("c", &[10, 10], &[1.0, 1.0]),
    ]);
    let pairs = instance
        .gaps
        .iter()
        .map(|gap| (gap.method_1.as_str(), gap.method_2.as_str()))
        .collect_vec();
    assert_eq!(pairs, vec![("a", "b"), ("a", "c"), ("b", "c")]);
    assert!(instance.gap("b", "a").is_none());
}

#[test]
fn test_unknown_method_in_gaps() {
    let result = InstanceRecord::from_methods(
        "g1",
        InstanceInfo {
            nb_vertices: 1,
            nb_edges: 0,
        },
        BestKnown {
            score: 1,
            optimal: false,
        },
        vec![method("a", &[1], &[1.0])],
        &[("a".to_string(), "z".to_string())],
    );
    assert!(result.is_err());
}
