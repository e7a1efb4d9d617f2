use coloring_results::datastructures::*;
use std::path::PathBuf;

/// Config reading the logs and reference tables under `data/test`.
pub fn fixture_config(
    problem: Problem,
    methods: &[&str],
    instances: &[&str],
) -> Config {
    Config {
        problem,
        methods: methods
            .iter()
            .map(|name| MethodConfig::new(name, *name))
            .collect(),
        instances: instances.iter().map(|name| name.to_string()).collect(),
        instance_list: None,
        outputs_dir: PathBuf::from("data/test/outputs"),
        instances_dir: PathBuf::from("data/test/instances"),
        out_dir: PathBuf::from("results"),
    }
}
